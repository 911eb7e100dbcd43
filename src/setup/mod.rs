// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Game setup flow.
//!
//! This module provides:
//! - The player count picker
//! - The song assignment state machine with stale search protection
//! - Screen navigation that owns the setup session

pub mod controller;
pub mod navigation;
pub mod selector;

pub use controller::{
    search_or_empty, FlowState, SearchResponse, SearchTicket, SetupFlowController,
};
pub use navigation::{Navigator, Screen, ScreenChange};
pub use selector::PlayerCountSelector;

use std::time::Duration;

use crate::roster::DEFAULT_PLAYERS;

/// Default time a catalog search may take before it counts as empty
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for setup sessions
#[derive(Debug, Clone, PartialEq)]
pub struct SetupSettings {
    /// Count preselected on the player screen
    pub default_player_count: usize,
    /// Catalog search timeout
    pub search_timeout: Duration,
}

impl Default for SetupSettings {
    fn default() -> Self {
        Self {
            default_player_count: DEFAULT_PLAYERS,
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
        }
    }
}
