//! ClipForge Render - overlay compositing
//!
//! Draws the non-video layers of a timeline frame: text overlays with
//! their animations and background boxes, image placeholders, and the
//! selection box with transform handles. Text metrics come from a
//! `TextMeasurer` so layout and hit-testing run without a display.

pub mod compositor;
pub mod overlay;
pub mod surface;
pub mod text;

pub use compositor::{Compositor, Layer, RenderStats};
pub use overlay::{
    HandleKind, OverlayGeometry, OverlayHit, TextTransform, TransformHandle, TransformSession,
};
pub use surface::{DrawList, DrawOp, DrawSurface};
pub use text::{
    animation_alpha, animation_offset, MonospaceMeasurer, TextMeasurer, TextMetrics, TextStyle,
};
