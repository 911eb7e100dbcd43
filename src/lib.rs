// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song Roulette: a party game setup front end.
//!
//! The landing screen shows a rotating strip of album covers that never
//! shows the same cover twice at once. Players then pick how many are
//! playing and each locks in one song from a searchable catalog.

pub mod carousel;
pub mod catalog;
pub mod config;
pub mod covers;
pub mod error;
pub mod roster;
pub mod setup;
pub mod ui;

pub use carousel::{CarouselEngine, CarouselEvent, CarouselSettings};
pub use catalog::{EmptyCatalog, SongCatalogClient, SongRef, StaticCatalog};
pub use config::AppConfig;
pub use covers::{Cover, CoverPool, CoverWindow};
pub use error::{CatalogError, CoverWindowError, SetupError};
pub use roster::{PlayerRoster, PlayerSlot, SlotState};
pub use setup::{FlowState, Navigator, Screen, SetupFlowController};
