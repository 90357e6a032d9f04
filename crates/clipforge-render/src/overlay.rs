//! Text overlay geometry: bounding box, transform handles, hit-testing and
//! interactive move/resize.

use clipforge_core::{Rect, Vec2};
use clipforge_timeline::{TextAlign, TextProps};
use smallvec::SmallVec;

use crate::text::{TextMeasurer, TextStyle};

/// The eight transform handles around a selected overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    Top,
    Right,
    Bottom,
    Left,
}

impl HandleKind {
    pub const CORNERS: [HandleKind; 4] = [
        HandleKind::TopLeft,
        HandleKind::TopRight,
        HandleKind::BottomRight,
        HandleKind::BottomLeft,
    ];

    pub const EDGES: [HandleKind; 4] = [
        HandleKind::Top,
        HandleKind::Right,
        HandleKind::Bottom,
        HandleKind::Left,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            HandleKind::TopLeft
                | HandleKind::TopRight
                | HandleKind::BottomRight
                | HandleKind::BottomLeft
        )
    }

    /// Left/right handles, which resize along x.
    pub fn is_horizontal_edge(self) -> bool {
        matches!(self, HandleKind::Left | HandleKind::Right)
    }

    /// Top/bottom handles, which resize along y.
    pub fn is_vertical_edge(self) -> bool {
        matches!(self, HandleKind::Top | HandleKind::Bottom)
    }
}

/// A handle and where it sits on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformHandle {
    pub kind: HandleKind,
    pub center: Vec2,
}

/// What a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayHit {
    Handle(HandleKind),
    Body,
}

/// Layout of a text overlay at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayGeometry {
    /// Area covered by the glyphs
    pub text_rect: Rect,
    /// `text_rect` grown by the padding; background and selection box
    pub bounds: Rect,
    pub handles: SmallVec<[TransformHandle; 8]>,
}

impl OverlayGeometry {
    /// Lay out a text overlay anchored at `(props.x, props.y) + offset`.
    ///
    /// The anchor is the vertical middle of the text; `align` chooses which
    /// horizontal point of the text sits on it.
    pub fn for_text<M: TextMeasurer + ?Sized>(
        props: &TextProps,
        offset: Vec2,
        measurer: &M,
        padding: f32,
    ) -> Self {
        let style = TextStyle::from_props(props);
        let metrics = measurer.measure(&props.text, &style);
        let anchor = Vec2::new(props.x, props.y) + offset;
        let left = match props.align {
            TextAlign::Left => anchor.x,
            TextAlign::Center => anchor.x - metrics.width * 0.5,
            TextAlign::Right => anchor.x - metrics.width,
        };
        let text_rect = Rect::new(
            left,
            anchor.y - metrics.height * 0.5,
            metrics.width,
            metrics.height,
        );
        Self::from_text_rect(text_rect, padding)
    }

    pub fn from_text_rect(text_rect: Rect, padding: f32) -> Self {
        let bounds = text_rect.expand(padding);
        let handles = HandleKind::CORNERS
            .into_iter()
            .zip(bounds.corners())
            .chain(HandleKind::EDGES.into_iter().zip(bounds.edge_midpoints()))
            .map(|(kind, center)| TransformHandle { kind, center })
            .collect();
        Self {
            text_rect,
            bounds,
            handles,
        }
    }

    /// Handle under `point`, else the body, else nothing.
    ///
    /// Corner handles are circles of `radius`; edge handles are squares of
    /// half-size `radius`.
    pub fn hit_test(&self, point: Vec2, radius: f32) -> Option<OverlayHit> {
        let corner = self
            .handles
            .iter()
            .filter(|h| h.kind.is_corner())
            .find(|h| h.center.distance(point) <= radius);
        if let Some(handle) = corner {
            return Some(OverlayHit::Handle(handle.kind));
        }

        let edge = self.handles.iter().filter(|h| !h.kind.is_corner()).find(|h| {
            let d = (point - h.center).abs();
            d.x <= radius && d.y <= radius
        });
        if let Some(handle) = edge {
            return Some(OverlayHit::Handle(handle.kind));
        }

        self.bounds.contains(point).then_some(OverlayHit::Body)
    }
}

/// Position and size written back by a transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextTransform {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// An in-progress move or resize of a text overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSession {
    pub hit: OverlayHit,
    origin: Vec2,
    start: TextTransform,
    min_size: f32,
}

impl TransformSession {
    pub fn begin(props: &TextProps, hit: OverlayHit, pointer: Vec2, min_size: f32) -> Self {
        Self {
            hit,
            origin: pointer,
            start: TextTransform {
                x: props.x,
                y: props.y,
                size: props.size,
            },
            min_size,
        }
    }

    /// Transform for the pointer at `pointer`, relative to where it went down.
    pub fn update(&self, pointer: Vec2) -> TextTransform {
        let delta = pointer - self.origin;
        match self.hit {
            OverlayHit::Body => TextTransform {
                x: self.start.x + delta.x,
                y: self.start.y + delta.y,
                size: self.start.size,
            },
            OverlayHit::Handle(kind) => {
                let change = if kind.is_corner() {
                    (delta.x + delta.y) * 0.5 * 0.5
                } else if kind.is_horizontal_edge() {
                    delta.x * 0.5
                } else {
                    delta.y * 0.5
                };
                TextTransform {
                    size: (self.start.size + change).max(self.min_size),
                    ..self.start
                }
            }
        }
    }

    pub fn apply(&self, pointer: Vec2, props: &mut TextProps) {
        let t = self.update(pointer);
        props.x = t.x;
        props.y = t.y;
        props.size = t.size;
    }
}
