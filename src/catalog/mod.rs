// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song catalog interface.
//!
//! The setup flow only needs one thing from a music catalog: turn a text
//! query into a list of songs. Real catalog services live outside this crate
//! and plug in through [`SongCatalogClient`]. Two implementations ship here:
//! - [`StaticCatalog`] searches an in-memory song list (from config)
//! - [`EmptyCatalog`] never finds anything

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Default cap on results returned by [`StaticCatalog`]
pub const DEFAULT_MAX_RESULTS: usize = 25;

/// A song as returned by a catalog search
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongRef {
    /// Catalog identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Performing artist, when the catalog knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
}

impl SongRef {
    /// Create a song without artist information
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: None,
        }
    }

    /// Attach an artist
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }
}

impl fmt::Display for SongRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.artist {
            Some(artist) => write!(f, "{} - {}", self.title, artist),
            None => f.write_str(&self.title),
        }
    }
}

/// Text search over a music catalog
#[async_trait]
pub trait SongCatalogClient: Send + Sync {
    /// Find songs matching `query`
    async fn search(&self, query: &str) -> Result<Vec<SongRef>, CatalogError>;

    /// Short name for logs
    fn name(&self) -> &str {
        "catalog"
    }
}

/// Catalog backed by a fixed in-memory song list.
///
/// Matches case-insensitively on title or artist substrings, in list order.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    songs: Vec<SongRef>,
    max_results: usize,
}

impl StaticCatalog {
    /// Create a catalog over `songs`
    pub fn new(songs: Vec<SongRef>) -> Self {
        Self {
            songs,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Limit the number of results per query
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Number of songs in the catalog
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Check if the catalog has no songs
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// All songs in catalog order
    pub fn songs(&self) -> &[SongRef] {
        &self.songs
    }

    /// Synchronous form of the search
    pub fn find(&self, query: &str) -> Vec<SongRef> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.songs
            .iter()
            .filter(|song| {
                song.title.to_lowercase().contains(&needle)
                    || song
                        .artist
                        .as_ref()
                        .map(|a| a.to_lowercase().contains(&needle))
                        .unwrap_or(false)
            })
            .take(self.max_results)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SongCatalogClient for StaticCatalog {
    async fn search(&self, query: &str) -> Result<Vec<SongRef>, CatalogError> {
        Ok(self.find(query))
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Catalog that never returns anything
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

#[async_trait]
impl SongCatalogClient for EmptyCatalog {
    async fn search(&self, _query: &str) -> Result<Vec<SongRef>, CatalogError> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "empty"
    }
}
