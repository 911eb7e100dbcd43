// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Rotating cover carousel for the landing screen.
//!
//! The engine owns the visible [`CoverWindow`](crate::covers::CoverWindow)
//! and a single periodic task. Every cycle it scrolls the window by one cover
//! and reports the change as a [`CarouselEvent`]; the presentation layer
//! draws the strip from those events and the [`ScrollAnimation`] they carry.

pub mod animation;
pub mod engine;

pub use animation::ScrollAnimation;
pub use engine::{CarouselEngine, CarouselEvent, CarouselSettings, DEFAULT_CYCLE, EVENT_CAPACITY};
