//! Time representation for the timeline.
//!
//! The engine works in seconds as `f64`. Clip positions are snapped to a
//! coarse grid during interaction, so rational arithmetic buys nothing here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A time span with inclusive start and exclusive end, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSpan {
    /// Start time (inclusive)
    pub start: f64,
    /// Duration of the span
    pub duration: f64,
}

impl TimeSpan {
    /// Create a new span from start and duration.
    #[inline]
    pub const fn new(start: f64, duration: f64) -> Self {
        Self { start, duration }
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(self) -> f64 {
        self.start + self.duration
    }

    /// Check if a time is within `[start, end)`.
    #[inline]
    pub fn contains(self, time: f64) -> bool {
        time >= self.start && time < self.end()
    }

    /// Normalized position of `time` inside the span, unclamped.
    ///
    /// Zero-length spans report 0.
    pub fn progress(self, time: f64) -> f64 {
        if self.duration <= 0.0 {
            0.0
        } else {
            (time - self.start) / self.duration
        }
    }

    /// Empty span starting at zero.
    pub const EMPTY: Self = Self {
        start: 0.0,
        duration: 0.0,
    };
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}s, {:.3}s)", self.start, self.end())
    }
}

/// Round `time` to the nearest multiple of `grid`.
///
/// A non-positive grid disables snapping.
#[inline]
pub fn snap_to_grid(time: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return time;
    }
    (time / grid).round() * grid
}
