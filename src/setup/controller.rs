// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song assignment state machine.
//!
//! The controller is either `Idle` or `Picking` a song for one unlocked slot.
//! While picking, every query goes to the catalog tagged with a sequence
//! number; only the response to the latest query is ever displayed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, info, warn};

use super::SetupSettings;
use crate::catalog::{SongCatalogClient, SongRef};
use crate::error::{CatalogError, SetupError};
use crate::roster::PlayerRoster;

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// No picker open
    Idle,
    /// Picker open for `slot`
    Picking { slot: usize },
}

/// A search that has been issued but not answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    /// Sequence number, strictly increasing per controller
    pub seq: u64,
    /// Query text as issued
    pub query: String,
}

/// Catalog answer correlated with the query that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    pub seq: u64,
    pub query: String,
    /// Songs found; empty when the catalog failed
    pub songs: Vec<SongRef>,
}

impl SearchResponse {
    /// Response answering `ticket`
    pub fn answer(ticket: &SearchTicket, songs: Vec<SongRef>) -> Self {
        Self {
            seq: ticket.seq,
            query: ticket.query.clone(),
            songs,
        }
    }
}

/// Run a catalog search, turning failures and timeouts into no results
pub async fn search_or_empty(
    catalog: &dyn SongCatalogClient,
    query: &str,
    timeout: Duration,
) -> Vec<SongRef> {
    match time::timeout(timeout, catalog.search(query)).await {
        Ok(Ok(songs)) => songs,
        Ok(Err(err)) => {
            warn!(catalog = catalog.name(), query, error = %err, "song search failed");
            Vec::new()
        }
        Err(_) => {
            let err = CatalogError::Timeout(timeout);
            warn!(catalog = catalog.name(), query, error = %err, "song search failed");
            Vec::new()
        }
    }
}

/// Game-setup session: roster plus the song picker
pub struct SetupFlowController {
    roster: PlayerRoster,
    state: FlowState,
    catalog: Arc<dyn SongCatalogClient>,
    search_timeout: Duration,
    /// Last sequence number handed out
    last_seq: u64,
    /// Sequence number whose response may still be displayed
    latest: Option<u64>,
    /// Latest search still unanswered
    awaiting: bool,
    query: String,
    results: Vec<SongRef>,
    responses_tx: mpsc::UnboundedSender<SearchResponse>,
    responses_rx: mpsc::UnboundedReceiver<SearchResponse>,
}

impl SetupFlowController {
    /// Start a session for `player_count` players
    pub fn new(
        player_count: usize,
        catalog: Arc<dyn SongCatalogClient>,
        settings: &SetupSettings,
    ) -> Result<Self, SetupError> {
        let roster = PlayerRoster::create(player_count)?;
        let (responses_tx, responses_rx) = mpsc::unbounded_channel();

        info!(players = player_count, catalog = catalog.name(), "setup session created");

        Ok(Self {
            roster,
            state: FlowState::Idle,
            catalog,
            search_timeout: settings.search_timeout,
            last_seq: 0,
            latest: None,
            awaiting: false,
            query: String::new(),
            results: Vec::new(),
            responses_tx,
            responses_rx,
        })
    }

    /// Current state
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Slot the picker is open for
    pub fn active_slot(&self) -> Option<usize> {
        match self.state {
            FlowState::Picking { slot } => Some(slot),
            FlowState::Idle => None,
        }
    }

    /// Check if the song picker is open
    pub fn picker_open(&self) -> bool {
        self.active_slot().is_some()
    }

    /// The roster being filled
    pub fn roster(&self) -> &PlayerRoster {
        &self.roster
    }

    /// Number of players in this session
    pub fn player_count(&self) -> usize {
        self.roster.len()
    }

    /// True once every player has locked a song
    pub fn is_complete(&self) -> bool {
        self.roster.is_complete()
    }

    /// Query text of the latest search
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Results currently displayed in the picker
    pub fn results(&self) -> &[SongRef] {
        &self.results
    }

    /// Sequence number of the search whose answer is awaited or shown
    pub fn latest_search(&self) -> Option<u64> {
        self.latest
    }

    /// True while the latest search has not been answered
    pub fn is_searching(&self) -> bool {
        self.awaiting
    }

    /// Swap the catalog used for future searches
    pub fn set_catalog(&mut self, catalog: Arc<dyn SongCatalogClient>) {
        info!(catalog = catalog.name(), "catalog replaced");
        self.catalog = catalog;
    }

    /// Open the picker for slot `index`.
    ///
    /// Returns `Ok(false)` without changing state when the slot is already
    /// locked or another picker is open.
    pub fn select_slot(&mut self, index: usize) -> Result<bool, SetupError> {
        let slot = self.roster.slot(index).ok_or(SetupError::IndexOutOfRange {
            index,
            len: self.roster.len(),
        })?;

        if let FlowState::Picking { slot: open } = self.state {
            debug!(slot = index, open, "picker already open");
            return Ok(false);
        }

        if slot.is_locked() {
            debug!(slot = index, "slot is locked, ignoring selection");
            return Ok(false);
        }

        self.reset_search();
        self.state = FlowState::Picking { slot: index };
        debug!(slot = index, "picker opened");
        Ok(true)
    }

    /// Register a new query and invalidate every earlier one.
    ///
    /// Returns `None` when the picker is closed.
    pub fn begin_search(&mut self, query: &str) -> Option<SearchTicket> {
        if !self.picker_open() {
            return None;
        }

        self.last_seq += 1;
        self.latest = Some(self.last_seq);
        self.awaiting = true;
        self.query = query.to_string();

        Some(SearchTicket {
            seq: self.last_seq,
            query: self.query.clone(),
        })
    }

    /// Apply a catalog response. Returns true if the displayed results
    /// changed, false if the response was stale and dropped.
    pub fn apply_response(&mut self, response: SearchResponse) -> bool {
        if !self.picker_open() || self.latest != Some(response.seq) {
            debug!(
                seq = response.seq,
                latest = ?self.latest,
                query = %response.query,
                "discarding stale search response"
            );
            return false;
        }

        debug!(seq = response.seq, found = response.songs.len(), "search results applied");
        self.results = response.songs;
        self.awaiting = false;
        true
    }

    /// Search the catalog for `query` in the background.
    ///
    /// The answer is delivered to this controller and applied by
    /// [`poll_responses`](Self::poll_responses) or
    /// [`wait_for_response`](Self::wait_for_response). A blank query clears
    /// the results without asking the catalog. Must be called from within a
    /// Tokio runtime.
    pub fn search(&mut self, query: &str) -> Option<u64> {
        let ticket = self.begin_search(query)?;
        let seq = ticket.seq;

        if ticket.query.trim().is_empty() {
            self.results.clear();
            self.awaiting = false;
            return Some(seq);
        }

        debug!(seq, query = %ticket.query, catalog = self.catalog.name(), "search issued");

        let catalog = Arc::clone(&self.catalog);
        let responses = self.responses_tx.clone();
        let timeout = self.search_timeout;
        tokio::spawn(async move {
            let songs = search_or_empty(catalog.as_ref(), &ticket.query, timeout).await;
            let _ = responses.send(SearchResponse::answer(&ticket, songs));
        });

        Some(seq)
    }

    /// Apply every response that has arrived. Returns true if the displayed
    /// results changed.
    pub fn poll_responses(&mut self) -> bool {
        let mut changed = false;
        while let Ok(response) = self.responses_rx.try_recv() {
            changed |= self.apply_response(response);
        }
        changed
    }

    /// Wait for the next response to arrive and apply it
    pub async fn wait_for_response(&mut self) -> bool {
        match self.responses_rx.recv().await {
            Some(response) => self.apply_response(response),
            None => false,
        }
    }

    /// Lock the `index`-th displayed result into the active slot and close
    /// the picker
    pub fn choose_result(&mut self, index: usize) -> Result<SongRef, SetupError> {
        if !self.picker_open() {
            return Err(SetupError::NotPicking);
        }

        let song = self
            .results
            .get(index)
            .cloned()
            .ok_or(SetupError::IndexOutOfRange {
                index,
                len: self.results.len(),
            })?;

        self.choose_song(song.clone())?;
        Ok(song)
    }

    /// Lock `song` into the active slot and close the picker
    pub fn choose_song(&mut self, song: SongRef) -> Result<(), SetupError> {
        let slot = self.active_slot().ok_or(SetupError::NotPicking)?;
        self.roster.lock(slot, song)?;
        self.close_picker();

        if self.is_complete() {
            info!(players = self.roster.len(), "all songs locked");
        }
        Ok(())
    }

    /// Close the picker without choosing. Returns false if it was not open.
    pub fn dismiss(&mut self) -> bool {
        if !self.picker_open() {
            return false;
        }
        debug!(slot = ?self.active_slot(), "picker dismissed");
        self.close_picker();
        true
    }

    fn close_picker(&mut self) {
        self.state = FlowState::Idle;
        self.reset_search();
    }

    fn reset_search(&mut self) {
        self.latest = None;
        self.awaiting = false;
        self.query.clear();
        self.results.clear();
    }
}
