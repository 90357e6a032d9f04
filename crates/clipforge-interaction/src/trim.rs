//! Edge-resize handles for timeline clips.

use clipforge_core::{Rect, Vec2};
use clipforge_timeline::{Clip, ClipId};

/// Which edge of a clip is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    /// Moves the start, keeping the end fixed.
    Start,
    /// Changes the duration only.
    End,
}

/// Limits applied while resizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeLimits {
    pub min_duration: f64,
    /// The start edge stops this far before the clip end.
    pub start_min_span: f64,
}

/// Active resize of one clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub clip_id: ClipId,
    pub edge: ResizeEdge,
    pub original_start: f64,
    pub original_duration: f64,
}

impl ResizeSession {
    pub fn new(clip: &Clip, edge: ResizeEdge) -> Self {
        Self {
            clip_id: clip.id,
            edge,
            original_start: clip.start_time,
            original_duration: clip.duration,
        }
    }

    /// New `(start, duration)` with the dragged edge at `time`.
    pub fn resize_to(&self, time: f64, limits: ResizeLimits) -> (f64, f64) {
        let end = self.original_start + self.original_duration;
        match self.edge {
            ResizeEdge::Start => {
                let start = time.max(0.0).min(end - limits.start_min_span).max(0.0);
                (start, (end - start).max(limits.min_duration))
            }
            ResizeEdge::End => {
                let duration = (time - self.original_start).max(limits.min_duration);
                (self.original_start, duration)
            }
        }
    }
}

/// Resize edge under `pos`, if it lies within `edge_width` of either end
/// of `clip_rect`. The start edge wins on narrow clips.
pub fn hit_test_resize_edge(clip_rect: Rect, pos: Vec2, edge_width: f32) -> Option<ResizeEdge> {
    if !clip_rect.contains(pos) {
        return None;
    }
    if pos.x < clip_rect.x + edge_width {
        return Some(ResizeEdge::Start);
    }
    if pos.x >= clip_rect.right() - edge_width {
        return Some(ResizeEdge::End);
    }
    None
}
