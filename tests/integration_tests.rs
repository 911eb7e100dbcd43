// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for Song Roulette
//!
//! These tests verify that multiple components work together correctly.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::broadcast::error::TryRecvError;

use song_roulette::carousel::{CarouselEngine, CarouselEvent, CarouselSettings};
use song_roulette::catalog::{SongCatalogClient, SongRef, StaticCatalog};
use song_roulette::config::AppConfig;
use song_roulette::covers::{Cover, CoverPool, CoverWindow};
use song_roulette::error::{CatalogError, SetupError};
use song_roulette::roster::PlayerRoster;
use song_roulette::setup::{FlowState, Navigator, Screen, SetupFlowController, SetupSettings};

fn party_catalog() -> Arc<StaticCatalog> {
    Arc::new(StaticCatalog::new(vec![
        SongRef::new("queen-bohemian-rhapsody", "Bohemian Rhapsody").with_artist("Queen"),
        SongRef::new("toto-africa", "Africa").with_artist("Toto"),
        SongRef::new("abba-dancing-queen", "Dancing Queen").with_artist("ABBA"),
        SongRef::new("a-ha-take-on-me", "Take On Me").with_artist("a-ha"),
    ]))
}

async fn search_and_wait(flow: &mut SetupFlowController, query: &str) {
    flow.search(query);
    while flow.is_searching() {
        flow.wait_for_response().await;
    }
}

/// Three players lock songs one after another
#[tokio::test]
async fn test_three_player_setup() {
    let mut flow =
        SetupFlowController::new(3, party_catalog(), &SetupSettings::default()).unwrap();
    assert!(flow.roster().slots().iter().all(|s| !s.is_locked()));

    assert!(flow.select_slot(1).unwrap());
    assert_eq!(flow.state(), FlowState::Picking { slot: 1 });

    search_and_wait(&mut flow, "Bohemian").await;
    assert_eq!(flow.results().len(), 1);
    assert_eq!(flow.results()[0].title, "Bohemian Rhapsody");

    let song = flow.choose_result(0).unwrap();
    assert_eq!(flow.roster().slot(1).unwrap().song(), Some(&song));
    assert_eq!(flow.state(), FlowState::Idle);
    assert!(!flow.is_complete());

    for (slot, query) in [(0, "africa"), (2, "take on")] {
        flow.select_slot(slot).unwrap();
        search_and_wait(&mut flow, query).await;
        flow.choose_result(0).unwrap();
    }

    assert!(flow.is_complete());
    let ids: Vec<&str> = flow
        .roster()
        .assignments()
        .into_iter()
        .map(|(_, song)| song.id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec!["toto-africa", "queen-bohemian-rhapsody", "a-ha-take-on-me"]
    );
}

/// Answers slowly for single-letter queries
struct SlowPrefixCatalog;

#[async_trait]
impl SongCatalogClient for SlowPrefixCatalog {
    async fn search(&self, query: &str) -> Result<Vec<SongRef>, CatalogError> {
        let delay = if query.len() == 1 { 500 } else { 10 };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(vec![SongRef::new(format!("{}-result", query), query)])
    }
}

/// A late answer for an old query never replaces the latest results
#[tokio::test(start_paused = true)]
async fn test_out_of_order_responses() {
    let mut flow = SetupFlowController::new(
        3,
        Arc::new(SlowPrefixCatalog),
        &SetupSettings::default(),
    )
    .unwrap();
    flow.select_slot(0).unwrap();

    flow.search("a");
    flow.search("ab");

    // "ab" answers first
    assert!(flow.wait_for_response().await);
    assert_eq!(flow.results()[0].id, "ab-result");

    // "a" arrives later and is dropped
    assert!(!flow.wait_for_response().await);
    assert_eq!(flow.results().len(), 1);
    assert_eq!(flow.results()[0].id, "ab-result");
}

/// Closing the picker drops whatever is still in flight
#[tokio::test(start_paused = true)]
async fn test_dismiss_invalidates_in_flight_search() {
    let mut flow = SetupFlowController::new(
        3,
        Arc::new(SlowPrefixCatalog),
        &SetupSettings::default(),
    )
    .unwrap();
    flow.select_slot(0).unwrap();
    flow.search("a");
    flow.dismiss();

    flow.select_slot(0).unwrap();
    assert!(!flow.wait_for_response().await);
    assert!(flow.results().is_empty());
}

#[test]
fn test_player_count_boundaries() {
    assert!(matches!(
        PlayerRoster::create(2),
        Err(SetupError::InvalidPlayerCount { count: 2, .. })
    ));
    assert!(PlayerRoster::create(10).is_err());
    assert_eq!(PlayerRoster::create(3).unwrap().len(), 3);
    assert_eq!(PlayerRoster::create(9).unwrap().len(), 9);
}

#[test]
fn test_one_shot_lock() {
    let mut roster = PlayerRoster::create(3).unwrap();
    let a = SongRef::new("a", "A");
    roster.lock(0, a.clone()).unwrap();

    let err = roster.lock(0, SongRef::new("b", "B")).unwrap_err();
    assert_eq!(err, SetupError::SlotAlreadyLocked { index: 0 });
    assert_eq!(roster.slot(0).unwrap().song(), Some(&a));
}

#[test]
fn test_window_stays_distinct() {
    let pool = CoverPool::standard();
    let mut window = CoverWindow::default();
    let mut rng = StdRng::seed_from_u64(2026);

    for _ in 0..2000 {
        let before = window.to_vec();
        let inserted = window.advance(&pool, &mut rng).unwrap();
        assert!(!before.contains(&inserted));

        let unique: HashSet<&Cover> = window.iter().collect();
        assert_eq!(unique.len(), 5);
        assert!(window.iter().all(|c| pool.contains(c)));
    }
}

/// Running engine over a small pool keeps the initial window
#[tokio::test(start_paused = true)]
async fn test_degenerate_pool_engine() {
    let pool = CoverPool::numbered("album", 3);
    let mut engine = CarouselEngine::new(pool, CarouselSettings::default());
    let initial = engine.window();

    engine.start(800.0);
    tokio::time::sleep(Duration::from_secs(11)).await;

    assert_eq!(engine.cycles(), 5);
    assert_eq!(engine.window(), initial);
    engine.stop();
}

/// Events stop for good once the engine is stopped
#[tokio::test(start_paused = true)]
async fn test_engine_events_end_at_stop() {
    let settings = CarouselSettings {
        seed: Some(7),
        ..CarouselSettings::default()
    };
    let mut engine = CarouselEngine::new(CoverPool::standard(), settings);
    let mut events = engine.subscribe();

    engine.start(1024.0);
    tokio::time::sleep(Duration::from_millis(4100)).await;
    engine.stop();

    let mut changes = 0;
    while let Ok(event) = events.try_recv() {
        if let CarouselEvent::WindowChanged { window, .. } = event {
            let unique: HashSet<&Cover> = window.iter().collect();
            assert_eq!(unique.len(), 5);
            changes += 1;
        }
    }
    assert_eq!(changes, 2);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

/// Screen flow owns the session and the carousel follows the landing screen
#[tokio::test]
async fn test_navigation_round_trip() {
    let config = AppConfig::default();
    let mut navigator = Navigator::new(Arc::new(config.static_catalog()), config.setup_settings());
    let mut engine = CarouselEngine::new(config.cover_pool(), config.carousel_settings());
    engine.start(80.0);

    let change = navigator.play().unwrap();
    if change.leaves_landing() {
        engine.stop();
    }
    assert!(!engine.is_running());

    navigator.selector_mut().set(4).unwrap();
    navigator.start().unwrap();
    assert_eq!(navigator.screen(), Screen::SongSelect);

    let session = navigator.session_mut().unwrap();
    session.select_slot(3).unwrap();
    search_and_wait(session, "Bohemian").await;
    assert!(!session.results().is_empty());
    session.choose_result(0).unwrap();

    navigator.back();
    let change = navigator.back().unwrap();
    if change.enters_landing() {
        engine.start(80.0);
    }
    assert!(engine.is_running());
    assert!(navigator.session().is_none());
    engine.stop();
}

#[test]
fn test_config_drives_components() {
    let yaml = r#"
carousel:
  cycle_seconds: 0.5
  pool_size: 12
  cover_prefix: disc
  seed: 9
setup:
  default_player_count: 6
  max_results: 1
catalog:
  songs:
    - id: "one"
      title: "Queen of Hearts"
    - id: "two"
      title: "Dancing Queen"
      artist: "ABBA"
"#;
    let config = AppConfig::from_yaml(yaml).unwrap();

    let pool = config.cover_pool();
    assert_eq!(pool.len(), 12);
    assert!(pool.contains(&Cover::new("disc11")));

    let settings = config.carousel_settings();
    assert_eq!(settings.cycle, Duration::from_millis(500));
    assert_eq!(settings.seed, Some(9));

    let engine = CarouselEngine::new(config.cover_pool(), config.carousel_settings());
    assert!(engine.window().iter().all(|c| pool.contains(c)));

    assert_eq!(config.setup_settings().default_player_count, 6);
    assert_eq!(config.static_catalog().find("queen").len(), 1);
}
