// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Player count picker.

use std::ops::RangeInclusive;

use crate::error::SetupError;
use crate::roster::{validate_player_count, DEFAULT_PLAYERS, MAX_PLAYERS, MIN_PLAYERS};

/// Wheel-style selector for the number of players
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerCountSelector {
    count: usize,
}

impl PlayerCountSelector {
    /// Create a selector starting at `initial`
    pub fn new(initial: usize) -> Result<Self, SetupError> {
        Ok(Self {
            count: validate_player_count(initial)?,
        })
    }

    /// Currently selected count
    pub fn count(&self) -> usize {
        self.count
    }

    /// Selectable counts
    pub fn choices(&self) -> RangeInclusive<usize> {
        MIN_PLAYERS..=MAX_PLAYERS
    }

    /// Select a specific count
    pub fn set(&mut self, count: usize) -> Result<(), SetupError> {
        self.count = validate_player_count(count)?;
        Ok(())
    }

    /// One more player, stopping at the maximum
    pub fn increment(&mut self) {
        self.count = (self.count + 1).min(MAX_PLAYERS);
    }

    /// One fewer player, stopping at the minimum
    pub fn decrement(&mut self) {
        self.count = self.count.saturating_sub(1).max(MIN_PLAYERS);
    }
}

impl Default for PlayerCountSelector {
    fn default() -> Self {
        Self {
            count: DEFAULT_PLAYERS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_three() {
        let selector = PlayerCountSelector::default();
        assert_eq!(selector.count(), 3);
        assert_eq!(selector.choices(), 3..=9);
    }

    #[test]
    fn test_increment_clamps() {
        let mut selector = PlayerCountSelector::new(8).unwrap();
        selector.increment();
        assert_eq!(selector.count(), 9);
        selector.increment();
        assert_eq!(selector.count(), 9);
    }

    #[test]
    fn test_decrement_clamps() {
        let mut selector = PlayerCountSelector::default();
        selector.decrement();
        assert_eq!(selector.count(), 3);

        selector.set(5).unwrap();
        selector.decrement();
        assert_eq!(selector.count(), 4);
    }

    #[test]
    fn test_set_validates() {
        let mut selector = PlayerCountSelector::default();
        assert!(selector.set(12).is_err());
        assert_eq!(selector.count(), 3);
        assert!(PlayerCountSelector::new(2).is_err());
    }
}
