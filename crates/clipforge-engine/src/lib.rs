//! ClipForge Engine - playback clock and engine facade
//!
//! Ties the timeline store, media synchronizer, compositor and
//! interaction engine together behind one frame-driven API.

pub mod clock;
pub mod engine;

pub use clock::{ClockState, ManualTimeSource, PlaybackClock, SystemTimeSource, TickToken, TimeSource};
pub use engine::{Engine, FrameReport};
