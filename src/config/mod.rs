// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration for Song Roulette.
//!
//! Settings live in a single YAML (or TOML) file with three sections:
//! `carousel`, `setup` and `catalog`. Every field has a default, so an empty
//! file is a valid configuration.

pub mod watcher;

pub use watcher::{ConfigEvent, ConfigWatcher, validate_config};

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::carousel::CarouselSettings;
use crate::catalog::{SongRef, StaticCatalog};
use crate::covers::{CoverPool, DEFAULT_COVER_PREFIX, STANDARD_POOL_SIZE, WINDOW_SIZE};
use crate::roster::validate_player_count;
use crate::setup::SetupSettings;

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    /// Landing screen carousel
    #[serde(default)]
    pub carousel: CarouselConfig,
    /// Setup flow
    #[serde(default)]
    pub setup: SetupConfig,
    /// Songs for the built-in catalog
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load a configuration file, YAML or TOML by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config = if is_toml(path) {
            Self::from_toml(&contents)?
        } else {
            Self::from_yaml(&contents)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse a configuration from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize configuration to TOML")
    }

    /// Save to a file, YAML or TOML by extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = if is_toml(path) {
            self.to_toml()?
        } else {
            self.to_yaml()?
        };
        fs::write(path, text).with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        let cycle = self.carousel.cycle_seconds;
        if !cycle.is_finite() || cycle <= 0.0 {
            bail!("carousel.cycle_seconds must be a positive number, got {}", cycle);
        }
        if self.carousel.cover_prefix.is_empty() {
            bail!("carousel.cover_prefix must not be empty");
        }
        if self.carousel.pool_size < WINDOW_SIZE {
            warn!(
                pool_size = self.carousel.pool_size,
                window = WINDOW_SIZE,
                "cover pool smaller than the window, carousel will not rotate"
            );
        }

        validate_player_count(self.setup.default_player_count)
            .context("setup.default_player_count")?;
        if self.setup.search_timeout_ms == 0 {
            bail!("setup.search_timeout_ms must be greater than zero");
        }
        if self.setup.max_results == 0 {
            bail!("setup.max_results must be greater than zero");
        }

        for (i, song) in self.catalog.songs.iter().enumerate() {
            if song.id.trim().is_empty() || song.title.trim().is_empty() {
                bail!("catalog.songs[{}] needs both an id and a title", i);
            }
        }
        Ok(())
    }

    /// Cover pool described by the carousel section
    pub fn cover_pool(&self) -> CoverPool {
        CoverPool::numbered(&self.carousel.cover_prefix, self.carousel.pool_size)
    }

    /// Engine settings described by the carousel section
    pub fn carousel_settings(&self) -> CarouselSettings {
        CarouselSettings {
            cycle: Duration::from_secs_f64(self.carousel.cycle_seconds),
            seed: self.carousel.seed,
        }
    }

    /// Session settings described by the setup section
    pub fn setup_settings(&self) -> SetupSettings {
        SetupSettings {
            default_player_count: self.setup.default_player_count,
            search_timeout: Duration::from_millis(self.setup.search_timeout_ms),
        }
    }

    /// In-memory catalog over the configured songs
    pub fn static_catalog(&self) -> StaticCatalog {
        StaticCatalog::new(self.catalog.songs.clone()).with_max_results(self.setup.max_results)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}

/// Carousel configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CarouselConfig {
    /// Seconds per scroll cycle
    #[serde(default = "default_cycle_seconds")]
    pub cycle_seconds: f64,
    /// Number of covers in the pool
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// Asset name prefix; covers are `{prefix}{n}`
    #[serde(default = "default_cover_prefix")]
    pub cover_prefix: String,
    /// Fixed RNG seed for reproducible rotation
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_cycle_seconds() -> f64 {
    2.0
}
fn default_pool_size() -> usize {
    STANDARD_POOL_SIZE
}
fn default_cover_prefix() -> String {
    DEFAULT_COVER_PREFIX.to_string()
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            cycle_seconds: default_cycle_seconds(),
            pool_size: default_pool_size(),
            cover_prefix: default_cover_prefix(),
            seed: None,
        }
    }
}

/// Setup flow configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetupConfig {
    /// Player count preselected on the player screen (3-9)
    #[serde(default = "default_player_count")]
    pub default_player_count: usize,
    /// Catalog search timeout in milliseconds
    #[serde(default = "default_search_timeout_ms")]
    pub search_timeout_ms: u64,
    /// Maximum results shown per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_player_count() -> usize {
    crate::roster::DEFAULT_PLAYERS
}
fn default_search_timeout_ms() -> u64 {
    5000
}
fn default_max_results() -> usize {
    crate::catalog::DEFAULT_MAX_RESULTS
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            default_player_count: default_player_count(),
            search_timeout_ms: default_search_timeout_ms(),
            max_results: default_max_results(),
        }
    }
}

/// Catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    /// Songs searchable from the picker
    #[serde(default)]
    pub songs: Vec<SongRef>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            songs: builtin_songs(),
        }
    }
}

/// Songs available when no catalog is configured
pub fn builtin_songs() -> Vec<SongRef> {
    [
        ("queen-bohemian-rhapsody", "Bohemian Rhapsody", "Queen"),
        ("queen-dont-stop-me-now", "Don't Stop Me Now", "Queen"),
        ("toto-africa", "Africa", "Toto"),
        ("abba-dancing-queen", "Dancing Queen", "ABBA"),
        ("journey-dont-stop-believin", "Don't Stop Believin'", "Journey"),
        ("a-ha-take-on-me", "Take On Me", "a-ha"),
        ("whitney-i-wanna-dance", "I Wanna Dance with Somebody", "Whitney Houston"),
        ("bon-jovi-livin-on-a-prayer", "Livin' on a Prayer", "Bon Jovi"),
        ("the-killers-mr-brightside", "Mr. Brightside", "The Killers"),
        ("outkast-hey-ya", "Hey Ya!", "OutKast"),
        ("fleetwood-mac-dreams", "Dreams", "Fleetwood Mac"),
        ("the-police-roxanne", "Roxanne", "The Police"),
        ("beyonce-single-ladies", "Single Ladies (Put a Ring on It)", "Beyonce"),
        ("nirvana-smells-like-teen-spirit", "Smells Like Teen Spirit", "Nirvana"),
        ("daft-punk-get-lucky", "Get Lucky", "Daft Punk"),
        ("the-dandy-warhols-bohemian-like-you", "Bohemian Like You", "The Dandy Warhols"),
    ]
    .into_iter()
    .map(|(id, title, artist)| SongRef::new(id, title).with_artist(artist))
    .collect()
}
