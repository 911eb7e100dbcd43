// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! The visible strip of covers.
//!
//! A `CoverWindow` always holds exactly [`WINDOW_SIZE`] distinct covers.
//! Advancing the window pushes a fresh cover in at the front and drops the
//! last one, which reads as the strip scrolling by one cover.

use std::collections::VecDeque;

use rand::Rng;

use super::{Cover, CoverPool};
use crate::error::CoverWindowError;

/// Number of covers visible at once
pub const WINDOW_SIZE: usize = 5;

/// Random draws tried before falling back to a direct pick among unused covers
pub const MAX_RESAMPLE_ATTEMPTS: usize = 32;

/// Ordered, duplicate-free strip of visible covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverWindow {
    covers: VecDeque<Cover>,
}

impl CoverWindow {
    /// Create a window from an explicit list of covers
    pub fn new<I>(covers: I) -> Result<Self, CoverWindowError>
    where
        I: IntoIterator,
        I::Item: Into<Cover>,
    {
        let covers: VecDeque<Cover> = covers.into_iter().map(Into::into).collect();

        if covers.len() != WINDOW_SIZE {
            return Err(CoverWindowError::WrongSize {
                expected: WINDOW_SIZE,
                actual: covers.len(),
            });
        }

        for (i, cover) in covers.iter().enumerate() {
            if covers.iter().skip(i + 1).any(|other| other == cover) {
                return Err(CoverWindowError::Duplicate(cover.to_string()));
            }
        }

        Ok(Self { covers })
    }

    /// Number of covers in the window (always [`WINDOW_SIZE`])
    pub fn len(&self) -> usize {
        self.covers.len()
    }

    /// Always false; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.covers.is_empty()
    }

    /// Get the cover at a visible position (0 = front)
    pub fn get(&self, index: usize) -> Option<&Cover> {
        self.covers.get(index)
    }

    /// Check if a cover is currently shown
    pub fn contains(&self, cover: &Cover) -> bool {
        self.covers.contains(cover)
    }

    /// Iterate front to back
    pub fn iter(&self) -> impl Iterator<Item = &Cover> {
        self.covers.iter()
    }

    /// Copy of the covers front to back
    pub fn to_vec(&self) -> Vec<Cover> {
        self.covers.iter().cloned().collect()
    }

    /// Number of pool covers not currently shown
    pub fn unused_in(&self, pool: &CoverPool) -> usize {
        pool.iter().filter(|cover| !self.contains(cover)).count()
    }

    /// Choose a pool cover that is not currently shown.
    ///
    /// Draws uniformly from the whole pool and redraws on a hit, up to
    /// [`MAX_RESAMPLE_ATTEMPTS`] times, then picks uniformly among the unused
    /// covers directly. Returns `None` when the pool is smaller than the
    /// window or every pool cover is already visible.
    pub fn pick_fresh<R: Rng + ?Sized>(&self, pool: &CoverPool, rng: &mut R) -> Option<Cover> {
        if pool.len() < self.len() {
            return None;
        }

        let unused = self.unused_in(pool);
        if unused == 0 {
            return None;
        }

        let covers = pool.covers();
        for _ in 0..MAX_RESAMPLE_ATTEMPTS {
            let candidate = &covers[rng.gen_range(0..covers.len())];
            if !self.contains(candidate) {
                return Some(candidate.clone());
            }
        }

        let nth = rng.gen_range(0..unused);
        pool.iter()
            .filter(|cover| !self.contains(cover))
            .nth(nth)
            .cloned()
    }

    /// First covers of `pool`, or the default window when the pool is
    /// too small to fill one
    pub fn from_pool(pool: &CoverPool) -> Self {
        if pool.len() < WINDOW_SIZE {
            return Self::default();
        }
        Self {
            covers: pool.iter().take(WINDOW_SIZE).cloned().collect(),
        }
    }

    /// Scroll the window by one cover.
    ///
    /// Returns the cover inserted at the front, or `None` if the update was
    /// skipped and the window left untouched.
    pub fn advance<R: Rng + ?Sized>(&mut self, pool: &CoverPool, rng: &mut R) -> Option<Cover> {
        let fresh = self.pick_fresh(pool, rng)?;
        self.covers.pop_back();
        self.covers.push_front(fresh.clone());
        Some(fresh)
    }
}

impl Default for CoverWindow {
    /// `album0` .. `album4`
    fn default() -> Self {
        Self {
            covers: (0..WINDOW_SIZE).map(Cover::album).collect(),
        }
    }
}
