//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::defaults;
use crate::error::{ClipForgeError, Result};

/// Tunables for every engine component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Timeline-view geometry and gesture limits.
    pub interaction: InteractionConfig,

    /// Media synchronization and probing.
    pub media: MediaConfig,

    /// Overlay drawing and hit-testing.
    pub overlay: OverlayConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Pixels per second at zoom 1.0.
    pub pixels_per_second: f64,
    /// Snap grid in seconds.
    pub snap_grid: f64,
    /// Minimum clip duration in seconds.
    pub min_clip_duration: f64,
    /// Minimum distance between a dragged start handle and the clip end.
    pub resize_start_min_span: f64,
    /// Height of one track row in pixels.
    pub track_row_height: f32,
    /// Width of the resize grab zone at each clip edge, in pixels.
    pub trim_edge_width: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Reseek only past this drift, in seconds.
    pub drift_tolerance: f64,
    /// Metadata probe timeout in seconds.
    pub probe_timeout_secs: f64,
    /// Duration substituted when probing fails.
    pub fallback_duration: f64,
    /// `hasAudio` substituted when probing fails.
    pub fallback_has_audio: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub text_padding: f32,
    pub handle_hit_radius: f32,
    pub min_font_size: f32,
    pub slide_distance: f32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "clipforge_media=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            pixels_per_second: defaults::PIXELS_PER_SECOND,
            snap_grid: defaults::SNAP_GRID,
            min_clip_duration: defaults::MIN_CLIP_DURATION,
            resize_start_min_span: defaults::RESIZE_START_MIN_SPAN,
            track_row_height: defaults::TRACK_ROW_HEIGHT,
            trim_edge_width: defaults::TRIM_EDGE_WIDTH,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            drift_tolerance: defaults::DRIFT_TOLERANCE,
            probe_timeout_secs: defaults::PROBE_TIMEOUT_SECS,
            fallback_duration: defaults::FALLBACK_MEDIA_DURATION,
            fallback_has_audio: true,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            text_padding: defaults::TEXT_PADDING,
            handle_hit_radius: defaults::HANDLE_HIT_RADIUS,
            min_font_size: defaults::MIN_FONT_SIZE,
            slide_distance: defaults::SLIDE_DISTANCE,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl EngineConfig {
    /// Load config from `path`, falling back to defaults when it is missing
    /// or unreadable.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::read(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Load config from the standard location.
    pub fn load_default() -> Self {
        Self::load(&Self::default_path())
    }

    /// Strictly read a config file.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ClipForgeError::Serialization(format!("invalid config: {e}")))
    }

    /// Save config to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ClipForgeError::Serialization(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Standard config file location.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("clipforge")
            .join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.interaction.pixels_per_second, 50.0);
        assert_eq!(config.interaction.snap_grid, 0.25);
        assert_eq!(config.media.drift_tolerance, 0.15);
        assert_eq!(config.media.probe_timeout_secs, 10.0);
        assert_eq!(config.overlay.min_font_size, 12.0);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(&dir.path().join("nope.json"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"media":{"drift_tolerance":0.3}}"#).unwrap();
        let config = EngineConfig::load(&path);
        assert_eq!(config.media.drift_tolerance, 0.3);
        assert_eq!(config.media.probe_timeout_secs, 10.0);
        assert_eq!(config.interaction.snap_grid, 0.25);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        let config = EngineConfig::load(&path);
        assert_eq!(config.media.drift_tolerance, 0.15);
        assert!(EngineConfig::read(&path).is_err());
    }

    #[test]
    fn test_save_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = EngineConfig::default();
        config.logging.json = true;
        config.save(&path).unwrap();
        assert!(EngineConfig::read(&path).unwrap().logging.json);
    }
}
