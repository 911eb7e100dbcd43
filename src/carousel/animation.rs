// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Linear scroll offset for one carousel cycle.

use std::time::{Duration, Instant};

/// Offset animation from 0 to `target` over `duration`, linear
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    /// Offset reached at the end of the cycle
    pub target: f64,
    /// Length of the cycle
    pub duration: Duration,
    /// When the cycle started
    pub start_time: Instant,
}

impl ScrollAnimation {
    /// Start a new animation now
    pub fn new(target: f64, duration: Duration) -> Self {
        Self {
            target,
            duration,
            start_time: Instant::now(),
        }
    }

    /// Animation for a viewport: one cover is half the viewport wide
    pub fn for_viewport(viewport_width: f64, duration: Duration) -> Self {
        Self::new(viewport_width / 2.0, duration)
    }

    /// Offset after `elapsed` time into the cycle
    pub fn offset_at(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() || elapsed >= self.duration {
            self.target
        } else {
            let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
            self.target * progress
        }
    }

    /// Offset right now
    pub fn current_offset(&self) -> f64 {
        self.offset_at(self.start_time.elapsed())
    }

    /// Check if the cycle has run its full length
    pub fn is_complete(&self) -> bool {
        self.start_time.elapsed() >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_interpolation() {
        let anim = ScrollAnimation::new(100.0, Duration::from_secs(2));
        assert_eq!(anim.offset_at(Duration::ZERO), 0.0);
        assert!((anim.offset_at(Duration::from_millis(500)) - 25.0).abs() < 1e-9);
        assert!((anim.offset_at(Duration::from_secs(1)) - 50.0).abs() < 1e-9);
        assert_eq!(anim.offset_at(Duration::from_secs(2)), 100.0);
        assert_eq!(anim.offset_at(Duration::from_secs(5)), 100.0);
    }

    #[test]
    fn test_viewport_target_is_half_width() {
        let anim = ScrollAnimation::for_viewport(390.0, Duration::from_secs(2));
        assert_eq!(anim.target, 195.0);
    }

    #[test]
    fn test_zero_duration_jumps_to_target() {
        let anim = ScrollAnimation::new(40.0, Duration::ZERO);
        assert_eq!(anim.offset_at(Duration::ZERO), 40.0);
        assert!(anim.is_complete());
    }

    #[test]
    fn test_current_offset_in_range() {
        let anim = ScrollAnimation::new(80.0, Duration::from_secs(60));
        let offset = anim.current_offset();
        assert!((0.0..=80.0).contains(&offset));
        assert!(!anim.is_complete());
    }
}
