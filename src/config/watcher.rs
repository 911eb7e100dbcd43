// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! File watcher for hot-reloading the configuration.
//!
//! Edits to the config file (typically the catalog song list) are picked up
//! while the app runs. Modifications are debounced and the file is
//! re-validated before anything is handed to the app.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use super::AppConfig;

/// Default quiet period before a modified file is reloaded
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Events emitted by the config watcher
#[derive(Debug, Clone)]
pub enum ConfigEvent {
    /// Configuration file changed and parsed cleanly
    Reloaded(Box<AppConfig>),
    /// Configuration file changed but is invalid
    Error(String),
    /// A new file appeared in the watched directory
    FileCreated(PathBuf),
    /// A file was removed from the watched directory
    FileDeleted(PathBuf),
}

/// Watches a config file (or a directory of them) for changes
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    event_receiver: Receiver<ConfigEvent>,
    watched_path: PathBuf,
}

impl ConfigWatcher {
    /// Start watching `path`.
    ///
    /// `debounce_ms` defaults to [`DEFAULT_DEBOUNCE_MS`].
    pub fn new<P: AsRef<Path>>(path: P, debounce_ms: Option<u64>) -> Result<Self> {
        let watched_path = path.as_ref().to_path_buf();
        let debounce = Duration::from_millis(debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS));

        let (event_tx, event_rx) = mpsc::channel();
        let (notify_tx, notify_rx): (Sender<Event>, Receiver<Event>) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            },
            Config::default(),
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {}", e))?;

        let mode = if watched_path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&watched_path, mode)
            .map_err(|e| anyhow!("Failed to watch path {:?}: {}", watched_path, e))?;

        info!(path = ?watched_path, debounce_ms = debounce.as_millis() as u64, "watching config");

        let root = watched_path.clone();
        std::thread::spawn(move || debounce_loop(root, notify_rx, event_tx, debounce));

        Ok(Self {
            _watcher: watcher,
            event_receiver: event_rx,
            watched_path,
        })
    }

    /// Try to receive the next config event (non-blocking)
    pub fn try_recv(&self) -> Option<ConfigEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive all pending config events
    pub fn recv_all(&self) -> Vec<ConfigEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Get the path being watched
    pub fn watched_path(&self) -> &Path {
        &self.watched_path
    }
}

/// Collect modify events until the file has been quiet for `debounce`,
/// then reload each touched config file once
fn debounce_loop(
    root: PathBuf,
    notify_rx: Receiver<Event>,
    event_tx: Sender<ConfigEvent>,
    debounce: Duration,
) {
    let mut last_event: Option<Instant> = None;
    let mut pending: Vec<PathBuf> = Vec::new();

    loop {
        match notify_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => match event.kind {
                EventKind::Create(_) => {
                    for path in event.paths {
                        let _ = event_tx.send(ConfigEvent::FileCreated(path));
                    }
                }
                EventKind::Remove(_) => {
                    for path in event.paths {
                        let _ = event_tx.send(ConfigEvent::FileDeleted(path));
                    }
                }
                EventKind::Modify(_) => {
                    for path in event.paths {
                        if !pending.contains(&path) {
                            pending.push(path);
                        }
                    }
                    last_event = Some(Instant::now());
                }
                _ => {}
            },
            Err(RecvTimeoutError::Timeout) => {
                let settled = last_event.map(|t| t.elapsed() >= debounce).unwrap_or(false);
                if !settled {
                    continue;
                }
                for path in pending.drain(..) {
                    if is_config_file(&path) || path == root {
                        let _ = event_tx.send(reload(&path));
                    } else {
                        debug!(path = ?path, "ignoring change to non-config file");
                    }
                }
                last_event = None;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn is_config_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml") | Some("toml")
    )
}

fn reload(path: &Path) -> ConfigEvent {
    match AppConfig::load(path) {
        Ok(config) => {
            info!(path = ?path, songs = config.catalog.songs.len(), "config reloaded");
            ConfigEvent::Reloaded(Box::new(config))
        }
        Err(e) => {
            warn!(path = ?path, error = %e, "config reload failed");
            ConfigEvent::Error(format!("Failed to load {:?}: {:#}", path, e))
        }
    }
}

/// Validate a configuration file without applying it
pub fn validate_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    AppConfig::load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_validate_config() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("roulette.yaml");

        let yaml = r#"
setup:
  default_player_count: 5
catalog:
  songs:
    - id: "toto-africa"
      title: "Africa"
"#;
        fs::write(&file_path, yaml).unwrap();

        let config = validate_config(&file_path).unwrap();
        assert_eq!(config.setup.default_player_count, 5);
        assert_eq!(config.catalog.songs.len(), 1);
    }

    #[test]
    fn test_validate_invalid_config() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.yaml");

        fs::write(&file_path, "this is not valid yaml: [").unwrap();
        assert!(validate_config(&file_path).is_err());

        fs::write(&file_path, "setup:\n  default_player_count: 1\n").unwrap();
        assert!(validate_config(&file_path).is_err());
    }

    #[test]
    fn test_is_config_file() {
        assert!(is_config_file(Path::new("a/roulette.yaml")));
        assert!(is_config_file(Path::new("roulette.yml")));
        assert!(is_config_file(Path::new("roulette.toml")));
        assert!(!is_config_file(Path::new("cover.png")));
        assert!(!is_config_file(Path::new("README")));
    }

    #[test]
    fn test_reload_reports_errors() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("broken.yaml");
        fs::write(&file_path, "carousel:\n  cycle_seconds: -1\n").unwrap();

        match reload(&file_path) {
            ConfigEvent::Error(msg) => assert!(msg.contains("cycle_seconds")),
            other => panic!("expected error event, got {:?}", other),
        }
    }

    #[test]
    fn test_watcher_creation() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("roulette.yaml"), "").unwrap();

        let watcher = ConfigWatcher::new(dir.path(), Some(100)).unwrap();
        assert_eq!(watcher.watched_path(), dir.path());
    }

    #[test]
    fn test_watcher_detects_changes() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("detect.yaml");
        fs::write(&file_path, "setup:\n  default_player_count: 3\n").unwrap();

        let watcher = ConfigWatcher::new(dir.path(), Some(100)).unwrap();
        std::thread::sleep(Duration::from_millis(50));

        let mut file = fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&file_path)
            .unwrap();
        file.write_all(b"setup:\n  default_player_count: 7\n").unwrap();
        file.flush().unwrap();
        drop(file);

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut reloaded = None;
        while reloaded.is_none() && Instant::now() < deadline {
            reloaded = watcher.recv_all().into_iter().find_map(|e| match e {
                ConfigEvent::Reloaded(config) => Some(config),
                _ => None,
            });
            std::thread::sleep(Duration::from_millis(50));
        }

        let config = reloaded.expect("no reload within 5s of the edit");
        assert_eq!(config.setup.default_player_count, 7);
    }
}
