//! ClipForge Timeline - Timeline data model
//!
//! Implements the project document and its single writer:
//! - Timelines containing ordered tracks
//! - Tracks containing timed clips with type-tagged properties
//! - A store exposing the closed set of mutations, with undo/redo
//! - Versioned JSON persistence keyed by project id

pub mod clip;
pub mod persistence;
pub mod serialization;
pub mod store;
pub mod timeline;
pub mod track;

pub use clip::{
    Clip, ClipId, ClipKind, ClipPatch, ClipProperties, MediaProps, TextAlign, TextAnimation,
    TextProps, Trim,
};
pub use persistence::{JsonDirRepository, MemoryRepository, TimelineRepository};
pub use serialization::TimelineFile;
pub use store::{Applied, TimelineCommand, TimelineStore, UndoStack};
pub use timeline::{ClipLocation, Repairs, Timeline};
pub use track::{Track, TrackId, TrackKind};
