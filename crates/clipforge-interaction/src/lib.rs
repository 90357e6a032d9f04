//! ClipForge Interaction - pointer-driven timeline editing
//!
//! Maps pointer positions in the timeline view to time and tracks, and
//! turns press/move/release sequences into store mutations:
//! - Drag-move with grid snapping
//! - Start/end edge resize with minimum-duration clamps
//! - Cross-track migration, including the synthetic new-track zone
//! - Track reordering and playhead scrubbing

pub mod gesture;
pub mod layout;
pub mod snapping;
pub mod trim;

pub use gesture::{ClipDrag, Gesture, GestureOutcome, InteractionEngine};
pub use layout::{RowTarget, TimelineLayout};
pub use snapping::SnappingEngine;
pub use trim::{hit_test_resize_edge, ResizeEdge, ResizeLimits, ResizeSession};
