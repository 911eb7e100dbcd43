// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Cover art identifiers.
//!
//! This module provides the fixed pool of album covers the landing screen
//! draws from, and the window of covers currently visible in the strip.

pub mod window;

pub use window::{CoverWindow, MAX_RESAMPLE_ATTEMPTS, WINDOW_SIZE};

use std::fmt;

/// Number of covers in the standard pool
pub const STANDARD_POOL_SIZE: usize = 48;

/// Name prefix of the bundled cover assets
pub const DEFAULT_COVER_PREFIX: &str = "album";

/// Identifier of a single cover art asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cover(String);

impl Cover {
    /// Create a cover from any asset name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Cover for the n-th bundled album asset (`album{n}`)
    pub fn album(n: usize) -> Self {
        Self::numbered(DEFAULT_COVER_PREFIX, n)
    }

    /// Cover named `{prefix}{n}`
    pub fn numbered(prefix: &str, n: usize) -> Self {
        Self(format!("{}{}", prefix, n))
    }

    /// Asset name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cover {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Cover {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Fixed catalog of covers available to the carousel.
///
/// Entries are unique; duplicates passed to the constructors are dropped
/// keeping the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverPool {
    covers: Vec<Cover>,
}

impl CoverPool {
    /// The bundled 48-cover pool: `album0` .. `album47`
    pub fn standard() -> Self {
        Self::numbered(DEFAULT_COVER_PREFIX, STANDARD_POOL_SIZE)
    }

    /// Pool of `count` covers named `{prefix}0` .. `{prefix}{count-1}`
    pub fn numbered(prefix: &str, count: usize) -> Self {
        Self {
            covers: (0..count).map(|n| Cover::numbered(prefix, n)).collect(),
        }
    }

    /// Build a pool from arbitrary covers
    pub fn from_covers<I>(covers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Cover>,
    {
        let mut unique: Vec<Cover> = Vec::new();
        for cover in covers {
            let cover = cover.into();
            if !unique.contains(&cover) {
                unique.push(cover);
            }
        }
        Self { covers: unique }
    }

    /// Number of distinct covers
    pub fn len(&self) -> usize {
        self.covers.len()
    }

    /// Check if the pool has no covers at all
    pub fn is_empty(&self) -> bool {
        self.covers.is_empty()
    }

    /// Get a cover by position
    pub fn get(&self, index: usize) -> Option<&Cover> {
        self.covers.get(index)
    }

    /// Check if a cover belongs to the pool
    pub fn contains(&self, cover: &Cover) -> bool {
        self.covers.contains(cover)
    }

    /// Iterate over the covers in pool order
    pub fn iter(&self) -> impl Iterator<Item = &Cover> {
        self.covers.iter()
    }

    /// All covers as a slice
    pub fn covers(&self) -> &[Cover] {
        &self.covers
    }
}

impl Default for CoverPool {
    fn default() -> Self {
        Self::standard()
    }
}
