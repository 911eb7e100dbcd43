// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types shared across the setup flow, the catalog and the carousel.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the roster and the setup controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// Player count outside the supported range
    #[error("invalid player count {count}: must be between {min} and {max}")]
    InvalidPlayerCount { count: usize, min: usize, max: usize },

    /// The slot already has a song committed to it
    #[error("slot {index} is already locked")]
    SlotAlreadyLocked { index: usize },

    /// Slot or result index past the end of the collection
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// An operation that needs the song picker was called while it is closed
    #[error("song picker is not open")]
    NotPicking,
}

/// Errors a song catalog may report.
///
/// The setup controller never propagates these; they turn into an empty
/// result list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog could not be reached or refused the query
    #[error("song search unavailable: {0}")]
    Unavailable(String),

    /// The catalog did not answer in time
    #[error("song search timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors building a cover window from an explicit list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoverWindowError {
    #[error("cover window needs exactly {expected} covers, got {actual}")]
    WrongSize { expected: usize, actual: usize },

    #[error("cover {0} appears more than once in the window")]
    Duplicate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_error_messages() {
        let err = SetupError::InvalidPlayerCount { count: 2, min: 3, max: 9 };
        assert_eq!(
            err.to_string(),
            "invalid player count 2: must be between 3 and 9"
        );

        let err = SetupError::SlotAlreadyLocked { index: 1 };
        assert_eq!(err.to_string(), "slot 1 is already locked");
    }

    #[test]
    fn test_catalog_error_messages() {
        let err = CatalogError::Timeout(Duration::from_millis(250));
        assert!(err.to_string().contains("250ms"));

        let err = CatalogError::Unavailable("offline".to_string());
        assert_eq!(err.to_string(), "song search unavailable: offline");
    }
}
