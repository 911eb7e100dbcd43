// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! UI state and key handling, independent of the terminal.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

use crate::carousel::{CarouselEngine, CarouselEvent, ScrollAnimation};
use crate::catalog::SongCatalogClient;
use crate::config::{AppConfig, ConfigEvent, ConfigWatcher};
use crate::covers::CoverWindow;
use crate::setup::{Navigator, Screen, ScreenChange, SetupFlowController};

/// How long a status message stays visible
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Result of handling a key
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    /// Nothing happened
    None,
    /// Quit the application
    Quit,
    /// Moved to another screen
    Navigated(ScreenChange),
    /// Player count changed
    PlayerCount(usize),
    /// Cursor moved
    CursorMoved(usize),
    /// Song picker opened for a slot
    PickerOpened(usize),
    /// Selected slot is already locked
    SlotLocked(usize),
    /// Picker query changed and a search was issued
    Searched(String),
    /// A song was locked into a slot
    SongChosen(usize),
    /// Picker closed without a choice
    PickerDismissed,
}

/// What the carousel strip should show
#[derive(Debug, Clone)]
pub struct StripState {
    pub window: CoverWindow,
    pub animation: Option<ScrollAnimation>,
}

impl StripState {
    /// Current scroll offset in cells
    pub fn offset(&self) -> f64 {
        self.animation.map(|a| a.current_offset()).unwrap_or(0.0)
    }
}

/// Everything the terminal UI needs to draw and react to keys
pub struct UiModel {
    navigator: Navigator,
    carousel: CarouselEngine,
    carousel_events: broadcast::Receiver<CarouselEvent>,
    strip: StripState,
    watcher: Option<ConfigWatcher>,
    viewport_width: f64,
    slot_cursor: usize,
    result_cursor: usize,
    input: String,
    status_message: Option<String>,
    status_time: Option<Instant>,
    show_help: bool,
    running: bool,
}

impl UiModel {
    /// Build the model and start the landing carousel.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: &AppConfig, viewport_width: f64) -> Self {
        let catalog: Arc<dyn SongCatalogClient> = Arc::new(config.static_catalog());
        Self::with_catalog(config, catalog, viewport_width)
    }

    /// Build the model with a specific catalog client
    pub fn with_catalog(
        config: &AppConfig,
        catalog: Arc<dyn SongCatalogClient>,
        viewport_width: f64,
    ) -> Self {
        let navigator = Navigator::new(catalog, config.setup_settings());
        let mut carousel = CarouselEngine::new(config.cover_pool(), config.carousel_settings());
        let carousel_events = carousel.subscribe();
        let strip = StripState {
            window: carousel.window(),
            animation: None,
        };
        carousel.start(viewport_width);

        Self {
            navigator,
            carousel,
            carousel_events,
            strip,
            watcher: None,
            viewport_width,
            slot_cursor: 0,
            result_cursor: 0,
            input: String::new(),
            status_message: None,
            status_time: None,
            show_help: false,
            running: true,
        }
    }

    /// Hot-reload the catalog from a watched config file
    pub fn watch_config(&mut self, watcher: ConfigWatcher) {
        self.watcher = Some(watcher);
    }

    /// Check if the app should keep running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current screen
    pub fn screen(&self) -> Screen {
        self.navigator.screen()
    }

    /// Screen flow and session
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Active setup session
    pub fn session(&self) -> Option<&SetupFlowController> {
        self.navigator.session()
    }

    /// Carousel engine
    pub fn carousel(&self) -> &CarouselEngine {
        &self.carousel
    }

    /// Carousel strip contents
    pub fn strip(&self) -> &StripState {
        &self.strip
    }

    /// Highlighted slot on the song screen
    pub fn slot_cursor(&self) -> usize {
        self.slot_cursor
    }

    /// Highlighted result in the picker
    pub fn result_cursor(&self) -> usize {
        self.result_cursor
    }

    /// Picker search text
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Status line text, if any
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Check if the help overlay is shown
    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Record the width the strip is drawn at
    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    /// Set a status message that will be displayed temporarily
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_time = Some(Instant::now());
    }

    /// Pull in carousel events, search responses and config reloads
    pub fn tick(&mut self) {
        self.drain_carousel_events();

        if let Some(session) = self.navigator.session_mut() {
            if session.poll_responses() {
                self.result_cursor = 0;
            }
        }

        let reloads = self
            .watcher
            .as_ref()
            .map(|w| w.recv_all())
            .unwrap_or_default();
        for event in reloads {
            self.apply_config_event(event);
        }

        if let Some(time) = self.status_time {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
                self.status_time = None;
            }
        }
    }

    fn drain_carousel_events(&mut self) {
        loop {
            match self.carousel_events.try_recv() {
                Ok(CarouselEvent::WindowChanged { window, .. }) => self.strip.window = window,
                Ok(CarouselEvent::CycleStarted { animation, .. }) => {
                    self.strip.animation = Some(animation)
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "carousel events lagged");
                    self.strip.window = self.carousel.window();
                }
                Err(_) => break,
            }
        }
    }

    fn apply_config_event(&mut self, event: ConfigEvent) {
        match event {
            ConfigEvent::Reloaded(config) => {
                let catalog = config.static_catalog();
                let songs = catalog.len();
                self.navigator.set_catalog(Arc::new(catalog));
                self.set_status(format!("Catalog reloaded ({} songs)", songs));
            }
            ConfigEvent::Error(message) => {
                warn!(%message, "config reload rejected");
                self.set_status(message);
            }
            ConfigEvent::FileCreated(_) | ConfigEvent::FileDeleted(_) => {}
        }
    }

    /// Handle a key event
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return self.quit();
        }

        let picking = self.session().map(|s| s.picker_open()).unwrap_or(false);
        if picking {
            return self.handle_picker_key(code);
        }

        match code {
            KeyCode::Char('q') => return self.quit(),
            KeyCode::Char('?') | KeyCode::Char('h') => {
                self.show_help = !self.show_help;
                return KeyAction::None;
            }
            _ => {}
        }

        match self.navigator.screen() {
            Screen::Landing => self.handle_landing_key(code),
            Screen::PlayerSelect => self.handle_player_select_key(code),
            Screen::SongSelect => self.handle_song_select_key(code),
        }
    }

    fn quit(&mut self) -> KeyAction {
        self.running = false;
        self.carousel.stop();
        KeyAction::Quit
    }

    fn handle_landing_key(&mut self, code: KeyCode) -> KeyAction {
        match code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('p') => {
                match self.navigator.play() {
                    Some(change) => self.screen_changed(change),
                    None => KeyAction::None,
                }
            }
            _ => KeyAction::None,
        }
    }

    fn handle_player_select_key(&mut self, code: KeyCode) -> KeyAction {
        let selector = self.navigator.selector_mut();
        match code {
            KeyCode::Up | KeyCode::Right | KeyCode::Char('+') => {
                selector.increment();
                KeyAction::PlayerCount(selector.count())
            }
            KeyCode::Down | KeyCode::Left | KeyCode::Char('-') => {
                selector.decrement();
                KeyAction::PlayerCount(selector.count())
            }
            KeyCode::Char(c @ '3'..='9') => {
                let count = c as usize - '0' as usize;
                match selector.set(count) {
                    Ok(()) => KeyAction::PlayerCount(count),
                    Err(_) => KeyAction::None,
                }
            }
            KeyCode::Enter => match self.navigator.start() {
                Ok(Some(change)) => {
                    self.slot_cursor = 0;
                    self.screen_changed(change)
                }
                Ok(None) => KeyAction::None,
                Err(e) => {
                    self.set_status(e.to_string());
                    KeyAction::None
                }
            },
            KeyCode::Esc | KeyCode::Backspace => self.go_back(),
            _ => KeyAction::None,
        }
    }

    fn handle_song_select_key(&mut self, code: KeyCode) -> KeyAction {
        let players = self.session().map(|s| s.player_count()).unwrap_or(0);
        match code {
            KeyCode::Up => {
                self.slot_cursor = self.slot_cursor.saturating_sub(1);
                KeyAction::CursorMoved(self.slot_cursor)
            }
            KeyCode::Down => {
                if self.slot_cursor + 1 < players {
                    self.slot_cursor += 1;
                }
                KeyAction::CursorMoved(self.slot_cursor)
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < players {
                    self.slot_cursor = index;
                    self.open_picker()
                } else {
                    KeyAction::None
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.open_picker(),
            KeyCode::Esc | KeyCode::Backspace => {
                let action = self.go_back();
                if matches!(action, KeyAction::Navigated(_)) {
                    self.set_status("Song selections discarded");
                }
                action
            }
            _ => KeyAction::None,
        }
    }

    fn open_picker(&mut self) -> KeyAction {
        let index = self.slot_cursor;
        let Some(session) = self.navigator.session_mut() else {
            return KeyAction::None;
        };

        match session.select_slot(index) {
            Ok(true) => {
                self.input.clear();
                self.result_cursor = 0;
                KeyAction::PickerOpened(index)
            }
            Ok(false) => {
                self.set_status(format!("Player {} is already locked in", index + 1));
                KeyAction::SlotLocked(index)
            }
            Err(e) => {
                self.set_status(e.to_string());
                KeyAction::None
            }
        }
    }

    fn handle_picker_key(&mut self, code: KeyCode) -> KeyAction {
        match code {
            KeyCode::Esc => {
                if let Some(session) = self.navigator.session_mut() {
                    session.dismiss();
                }
                self.input.clear();
                KeyAction::PickerDismissed
            }
            KeyCode::Up => {
                self.result_cursor = self.result_cursor.saturating_sub(1);
                KeyAction::CursorMoved(self.result_cursor)
            }
            KeyCode::Down => {
                let results = self.session().map(|s| s.results().len()).unwrap_or(0);
                if self.result_cursor + 1 < results {
                    self.result_cursor += 1;
                }
                KeyAction::CursorMoved(self.result_cursor)
            }
            KeyCode::Enter => self.choose_highlighted(),
            KeyCode::Backspace => {
                self.input.pop();
                self.search()
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.search()
            }
            _ => KeyAction::None,
        }
    }

    fn search(&mut self) -> KeyAction {
        let query = self.input.clone();
        match self.navigator.session_mut() {
            Some(session) => {
                session.search(&query);
                self.result_cursor = 0;
                KeyAction::Searched(query)
            }
            None => KeyAction::None,
        }
    }

    fn choose_highlighted(&mut self) -> KeyAction {
        let cursor = self.result_cursor;
        let Some(session) = self.navigator.session_mut() else {
            return KeyAction::None;
        };
        let Some(slot) = session.active_slot() else {
            return KeyAction::None;
        };

        match session.choose_result(cursor) {
            Ok(_) => {
                let complete = session.is_complete();
                self.input.clear();
                self.result_cursor = 0;
                if complete {
                    self.set_status("All songs locked in. Let the roulette begin!");
                } else {
                    self.set_status(format!("Player {} locked in", slot + 1));
                }
                KeyAction::SongChosen(slot)
            }
            Err(e) => {
                debug!(error = %e, "nothing to choose");
                KeyAction::None
            }
        }
    }

    fn go_back(&mut self) -> KeyAction {
        match self.navigator.back() {
            Some(change) => self.screen_changed(change),
            None => KeyAction::None,
        }
    }

    /// Mount or unmount the carousel as the landing screen comes and goes
    fn screen_changed(&mut self, change: ScreenChange) -> KeyAction {
        if change.leaves_landing() {
            self.carousel.stop();
        } else if change.enters_landing() {
            self.carousel.start(self.viewport_width);
        }
        KeyAction::Navigated(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{SongRef, StaticCatalog};

    fn model() -> UiModel {
        let mut config = AppConfig::default();
        config.carousel.seed = Some(1);
        let catalog = StaticCatalog::new(vec![
            SongRef::new("bohemian", "Bohemian Rhapsody").with_artist("Queen"),
            SongRef::new("africa", "Africa"),
        ]);
        UiModel::with_catalog(&config, Arc::new(catalog), 80.0)
    }

    fn press(model: &mut UiModel, code: KeyCode) -> KeyAction {
        model.handle_key(code, KeyModifiers::NONE)
    }

    fn type_text(model: &mut UiModel, text: &str) {
        for c in text.chars() {
            press(model, KeyCode::Char(c));
        }
    }

    async fn settle(model: &mut UiModel) {
        let session = model.navigator.session_mut().unwrap();
        while session.results().is_empty() {
            session.wait_for_response().await;
        }
    }

    #[tokio::test]
    async fn test_carousel_runs_on_landing_only() {
        let mut model = model();
        assert_eq!(model.screen(), Screen::Landing);
        assert!(model.carousel().is_running());

        let action = press(&mut model, KeyCode::Enter);
        assert!(matches!(action, KeyAction::Navigated(_)));
        assert_eq!(model.screen(), Screen::PlayerSelect);
        assert!(!model.carousel().is_running());

        press(&mut model, KeyCode::Esc);
        assert_eq!(model.screen(), Screen::Landing);
        assert!(model.carousel().is_running());
    }

    #[tokio::test]
    async fn test_player_count_keys() {
        let mut model = model();
        press(&mut model, KeyCode::Enter);

        assert_eq!(press(&mut model, KeyCode::Up), KeyAction::PlayerCount(4));
        assert_eq!(press(&mut model, KeyCode::Char('9')), KeyAction::PlayerCount(9));
        assert_eq!(press(&mut model, KeyCode::Up), KeyAction::PlayerCount(9));
        assert_eq!(press(&mut model, KeyCode::Char('3')), KeyAction::PlayerCount(3));
        assert_eq!(press(&mut model, KeyCode::Down), KeyAction::PlayerCount(3));

        press(&mut model, KeyCode::Enter);
        assert_eq!(model.screen(), Screen::SongSelect);
        assert_eq!(model.session().unwrap().player_count(), 3);
    }

    #[tokio::test]
    async fn test_pick_song_through_keys() {
        let mut model = model();
        press(&mut model, KeyCode::Enter);
        press(&mut model, KeyCode::Enter);

        press(&mut model, KeyCode::Down);
        assert_eq!(press(&mut model, KeyCode::Enter), KeyAction::PickerOpened(1));

        // 'q' is text while the picker is open
        type_text(&mut model, "queen");
        assert!(model.is_running());
        assert_eq!(model.input(), "queen");

        settle(&mut model).await;
        assert_eq!(model.session().unwrap().results().len(), 1);

        assert_eq!(press(&mut model, KeyCode::Enter), KeyAction::SongChosen(1));
        let session = model.session().unwrap();
        assert!(!session.picker_open());
        assert!(session.roster().slot(1).unwrap().is_locked());
        assert_eq!(model.status_message(), Some("Player 2 locked in"));

        assert_eq!(press(&mut model, KeyCode::Enter), KeyAction::SlotLocked(1));
    }

    #[tokio::test]
    async fn test_escape_dismisses_picker_then_discards() {
        let mut model = model();
        press(&mut model, KeyCode::Enter);
        press(&mut model, KeyCode::Enter);
        press(&mut model, KeyCode::Char('2'));
        assert!(model.session().unwrap().picker_open());

        assert_eq!(press(&mut model, KeyCode::Esc), KeyAction::PickerDismissed);
        assert_eq!(model.screen(), Screen::SongSelect);

        assert!(matches!(press(&mut model, KeyCode::Esc), KeyAction::Navigated(_)));
        assert_eq!(model.screen(), Screen::PlayerSelect);
        assert!(model.session().is_none());
        assert_eq!(model.status_message(), Some("Song selections discarded"));
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut quitting = model();
        assert_eq!(press(&mut quitting, KeyCode::Char('q')), KeyAction::Quit);
        assert!(!quitting.is_running());
        assert!(!quitting.carousel().is_running());

        let mut interrupted = model();
        let action = interrupted.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action, KeyAction::Quit);
        assert!(!interrupted.is_running());
    }

    #[tokio::test]
    async fn test_help_toggle() {
        let mut model = model();
        press(&mut model, KeyCode::Char('h'));
        assert!(model.show_help());
        press(&mut model, KeyCode::Char('?'));
        assert!(!model.show_help());
    }

    #[tokio::test]
    async fn test_tick_tracks_carousel_steps() {
        let mut model = model();
        model.carousel.step();
        model.tick();
        assert_eq!(model.strip().window, model.carousel().window());
        assert!(model.strip().animation.is_some());
    }
}
