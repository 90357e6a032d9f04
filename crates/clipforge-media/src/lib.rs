//! ClipForge Media - media sources and playback handles
//!
//! This crate handles:
//! - Metadata probing with timeout and fallback values
//! - The playback handle state machine and backend abstraction
//! - Synchronizing handles to the playback clock
//! - A simulated backend for headless previews and tests

pub mod handle;
pub mod probe;
pub mod sim;
pub mod sync;

pub use handle::{HandleId, HandleState, LoadError, LoadEvent, MediaBackend, PlaybackHandle};
pub use probe::{
    clip_from_media, probe_with_fallback, MediaMetadata, MetadataProber, ProbeOutcome,
    StaticProber,
};
pub use sim::{SimHandleSnapshot, SimulatedBackend};
pub use sync::{MediaSynchronizer, SyncReport};
