//! ClipForge Core - Foundation types for the timeline engine
//!
//! This crate provides the fundamental types used throughout ClipForge:
//! - Time spans and grid snapping (seconds as `f64`)
//! - Color parsing and blending
//! - The RGBA8 raster surface the compositor draws into
//! - Geometric primitives for overlay hit-testing
//! - Engine configuration

pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod time;

pub use color::Color;
pub use config::{EngineConfig, LoggingConfig};
pub use error::{ClipForgeError, Result};
pub use frame::FrameBuffer;
pub use geometry::{Rect, Vec2};
pub use time::{snap_to_grid, TimeSpan};

/// Default engine constants. `EngineConfig::default()` is built from these.
pub mod defaults {
    /// Timeline pixels per second at zoom 1.0.
    pub const PIXELS_PER_SECOND: f64 = 50.0;

    /// Grid used when snapping dragged clip positions (seconds).
    pub const SNAP_GRID: f64 = 0.25;

    /// No clip may become shorter than this (seconds).
    pub const MIN_CLIP_DURATION: f64 = 0.5;

    /// The start handle cannot be dragged closer than this to the clip end.
    pub const RESIZE_START_MIN_SPAN: f64 = 1.0;

    /// Handles are reseeked only when they drift further than this (seconds).
    pub const DRIFT_TOLERANCE: f64 = 0.15;

    /// Timeline duration never drops below this (seconds).
    pub const MIN_TIMELINE_DURATION: f64 = 1.0;

    /// Metadata probing gives up after this many seconds.
    pub const PROBE_TIMEOUT_SECS: f64 = 10.0;

    /// Substituted duration when probing fails.
    pub const FALLBACK_MEDIA_DURATION: f64 = 5.0;

    /// Padding around text overlays, for both background and bounding box.
    pub const TEXT_PADDING: f32 = 10.0;

    /// Pointer distance that counts as a hit on a transform handle.
    pub const HANDLE_HIT_RADIUS: f32 = 12.0;

    /// Smallest font size reachable through interactive resize.
    pub const MIN_FONT_SIZE: f32 = 12.0;

    /// Height of a single track row in the timeline view.
    pub const TRACK_ROW_HEIGHT: f32 = 48.0;

    /// Width of the grab zone at either end of a clip block.
    pub const TRIM_EDGE_WIDTH: f32 = 8.0;

    /// Offset a slide animation starts from.
    pub const SLIDE_DISTANCE: f32 = 100.0;
}
