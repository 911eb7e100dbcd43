// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Player roster.
//!
//! One slot per player. A slot starts unlocked and can be locked exactly once
//! with the song its player picked; after that it never changes.

use std::fmt;

use tracing::info;

use crate::catalog::SongRef;
use crate::error::SetupError;

/// Fewest players a game supports
pub const MIN_PLAYERS: usize = 3;

/// Most players a game supports
pub const MAX_PLAYERS: usize = 9;

/// Player count selected when nothing else was chosen
pub const DEFAULT_PLAYERS: usize = 3;

/// Check a player count against the supported range
pub fn validate_player_count(count: usize) -> Result<usize, SetupError> {
    if (MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
        Ok(count)
    } else {
        Err(SetupError::InvalidPlayerCount {
            count,
            min: MIN_PLAYERS,
            max: MAX_PLAYERS,
        })
    }
}

/// Assignment state of a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    /// No song yet
    Unlocked,
    /// Song committed; final
    Locked(SongRef),
}

/// A single player's song assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSlot {
    index: usize,
    state: SlotState,
}

impl PlayerSlot {
    fn new(index: usize) -> Self {
        Self {
            index,
            state: SlotState::Unlocked,
        }
    }

    /// Position of the slot in the roster (0-based)
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current assignment state
    pub fn state(&self) -> &SlotState {
        &self.state
    }

    /// Check if a song has been committed
    pub fn is_locked(&self) -> bool {
        matches!(self.state, SlotState::Locked(_))
    }

    /// The committed song, if any
    pub fn song(&self) -> Option<&SongRef> {
        match &self.state {
            SlotState::Locked(song) => Some(song),
            SlotState::Unlocked => None,
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            SlotState::Unlocked => write!(f, "Player {}: -", self.index + 1),
            SlotState::Locked(_) => write!(f, "Player {}: locked", self.index + 1),
        }
    }
}

/// Ordered collection of player slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRoster {
    slots: Vec<PlayerSlot>,
}

impl PlayerRoster {
    /// Create a roster of `player_count` unlocked slots
    pub fn create(player_count: usize) -> Result<Self, SetupError> {
        let count = validate_player_count(player_count)?;
        Ok(Self {
            slots: (0..count).map(PlayerSlot::new).collect(),
        })
    }

    /// Commit a song to a slot. Each slot can be locked once.
    pub fn lock(&mut self, index: usize, song: SongRef) -> Result<(), SetupError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(SetupError::IndexOutOfRange { index, len })?;

        if slot.is_locked() {
            return Err(SetupError::SlotAlreadyLocked { index });
        }

        info!(slot = index, song = %song.id, "slot locked");
        slot.state = SlotState::Locked(song);
        Ok(())
    }

    /// True once every slot is locked
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(PlayerSlot::is_locked)
    }

    /// Number of players
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Never true for a valid roster
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Get a slot by index
    pub fn slot(&self, index: usize) -> Option<&PlayerSlot> {
        self.slots.get(index)
    }

    /// All slots in order
    pub fn slots(&self) -> &[PlayerSlot] {
        &self.slots
    }

    /// Number of locked slots
    pub fn locked_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_locked()).count()
    }

    /// Locked slots with their songs, in slot order
    pub fn assignments(&self) -> Vec<(usize, &SongRef)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.song().map(|song| (slot.index, song)))
            .collect()
    }
}
