// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Screen flow: landing, player count, song selection.
//!
//! The navigator owns the setup session. Moving forward from the player count
//! screen creates a fresh session; moving back from song selection throws it
//! away, locks included.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use super::{PlayerCountSelector, SetupFlowController, SetupSettings};
use crate::catalog::SongCatalogClient;
use crate::error::SetupError;

/// Screens of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Title and carousel
    Landing,
    /// Number of players
    PlayerSelect,
    /// Per-player song locking
    SongSelect,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::Landing => "landing",
            Screen::PlayerSelect => "player-select",
            Screen::SongSelect => "song-select",
        };
        f.write_str(name)
    }
}

/// A completed screen transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenChange {
    pub from: Screen,
    pub to: Screen,
}

impl ScreenChange {
    /// True if this transition leaves the landing screen
    pub fn leaves_landing(&self) -> bool {
        self.from == Screen::Landing && self.to != Screen::Landing
    }

    /// True if this transition arrives at the landing screen
    pub fn enters_landing(&self) -> bool {
        self.to == Screen::Landing && self.from != Screen::Landing
    }
}

/// Drives screen changes and owns the current session
pub struct Navigator {
    screen: Screen,
    selector: PlayerCountSelector,
    session: Option<SetupFlowController>,
    catalog: Arc<dyn SongCatalogClient>,
    settings: SetupSettings,
}

impl Navigator {
    /// Start on the landing screen
    pub fn new(catalog: Arc<dyn SongCatalogClient>, settings: SetupSettings) -> Self {
        let selector =
            PlayerCountSelector::new(settings.default_player_count).unwrap_or_default();
        Self {
            screen: Screen::Landing,
            selector,
            session: None,
            catalog,
            settings,
        }
    }

    /// Screen currently shown
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Player count picker
    pub fn selector(&self) -> &PlayerCountSelector {
        &self.selector
    }

    /// Player count picker, mutable
    pub fn selector_mut(&mut self) -> &mut PlayerCountSelector {
        &mut self.selector
    }

    /// Active setup session, if on the song screen
    pub fn session(&self) -> Option<&SetupFlowController> {
        self.session.as_ref()
    }

    /// Active setup session, mutable
    pub fn session_mut(&mut self) -> Option<&mut SetupFlowController> {
        self.session.as_mut()
    }

    /// Replace the catalog for the current and future sessions
    pub fn set_catalog(&mut self, catalog: Arc<dyn SongCatalogClient>) {
        if let Some(session) = self.session.as_mut() {
            session.set_catalog(Arc::clone(&catalog));
        }
        self.catalog = catalog;
    }

    /// Landing -> player count
    pub fn play(&mut self) -> Option<ScreenChange> {
        if self.screen != Screen::Landing {
            return None;
        }
        Some(self.go(Screen::PlayerSelect))
    }

    /// Player count -> song selection, with a new session
    pub fn start(&mut self) -> Result<Option<ScreenChange>, SetupError> {
        if self.screen != Screen::PlayerSelect {
            return Ok(None);
        }

        let session = SetupFlowController::new(
            self.selector.count(),
            Arc::clone(&self.catalog),
            &self.settings,
        )?;
        self.session = Some(session);
        Ok(Some(self.go(Screen::SongSelect)))
    }

    /// Step back one screen.
    ///
    /// With the song picker open this only closes the picker. Leaving the
    /// song screen discards the session.
    pub fn back(&mut self) -> Option<ScreenChange> {
        match self.screen {
            Screen::Landing => None,
            Screen::PlayerSelect => Some(self.go(Screen::Landing)),
            Screen::SongSelect => {
                if let Some(session) = self.session.as_mut() {
                    if session.dismiss() {
                        return None;
                    }
                }
                if let Some(session) = self.session.take() {
                    info!(
                        locked = session.roster().locked_count(),
                        players = session.player_count(),
                        "setup session discarded"
                    );
                }
                Some(self.go(Screen::PlayerSelect))
            }
        }
    }

    fn go(&mut self, to: Screen) -> ScreenChange {
        let change = ScreenChange {
            from: self.screen,
            to,
        };
        info!(from = %change.from, to = %change.to, "screen change");
        self.screen = to;
        change
    }
}
