//! Grid snapping for timeline interactions.

use clipforge_core::config::InteractionConfig;
use clipforge_core::snap_to_grid;

/// Snaps gesture times to a fixed grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnappingEngine {
    pub enabled: bool,
    /// Grid interval in seconds (0 = disabled).
    pub grid: f64,
}

impl SnappingEngine {
    pub fn new(grid: f64) -> Self {
        Self {
            enabled: true,
            grid,
        }
    }

    pub fn from_config(config: &InteractionConfig) -> Self {
        Self::new(config.snap_grid)
    }

    /// `round(t / grid) * grid`, or `t` unchanged when disabled.
    pub fn snap(&self, time: f64) -> f64 {
        if self.enabled {
            snap_to_grid(time, self.grid)
        } else {
            time
        }
    }

    /// Start time for a clip grabbed `offset` seconds from its start and
    /// dragged to `pointer_time`. Never negative.
    pub fn snap_start(&self, pointer_time: f64, offset: f64) -> f64 {
        self.snap((pointer_time - offset).max(0.0))
    }
}

impl Default for SnappingEngine {
    fn default() -> Self {
        Self::from_config(&InteractionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_snapping() {
        let engine = SnappingEngine::default();
        assert_eq!(engine.snap(1.1), 1.0);
        assert_eq!(engine.snap(1.13), 1.25);
        assert_eq!(engine.snap(2.6), 2.5);
    }

    #[test]
    fn test_snapping_disabled() {
        let mut engine = SnappingEngine::default();
        engine.enabled = false;
        assert_eq!(engine.snap(1.13), 1.13);
    }

    #[test]
    fn test_snap_start_never_negative() {
        let engine = SnappingEngine::default();
        assert_eq!(engine.snap_start(0.5, 2.0), 0.0);
        assert_eq!(engine.snap_start(3.4, 1.0), 2.5);
    }
}
