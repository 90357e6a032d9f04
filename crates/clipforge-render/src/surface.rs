//! Drawing surfaces the compositor can target.

use clipforge_core::{Color, FrameBuffer, Rect, Vec2};

use crate::text::TextStyle;

/// Minimal 2D drawing capability.
pub trait DrawSurface {
    fn size(&self) -> (u32, u32);

    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Draw `text` into `bounds`, the box its measurer laid it out in.
    fn draw_text(&mut self, text: &str, bounds: Rect, style: &TextStyle, color: Color);
}

impl DrawSurface for FrameBuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        FrameBuffer::clear(self, color);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        FrameBuffer::fill_rect(self, rect, color);
    }

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) {
        FrameBuffer::stroke_rect(self, rect, width, color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        FrameBuffer::fill_circle(self, center, radius, color);
    }

    /// Renders each visible glyph as a solid box. `bounds` is split into one
    /// row per line and one column per character of the widest line.
    fn draw_text(&mut self, text: &str, bounds: Rect, _style: &TextStyle, color: Color) {
        let lines: Vec<&str> = text.split('\n').collect();
        let columns = lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0)
            .max(1);
        let advance = bounds.width / columns as f32;
        let line = bounds.height / lines.len() as f32;
        let glyph = Vec2::new(advance * 0.8, line * 0.6);
        let inset = Vec2::new(advance * 0.1, (line - glyph.y) * 0.5);

        for (row, text_line) in lines.iter().enumerate() {
            for (col, ch) in text_line.chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                let cell = bounds.min() + Vec2::new(col as f32 * advance, row as f32 * line);
                let min = cell + inset;
                FrameBuffer::fill_rect(self, Rect::from_corners(min, min + glyph), color);
            }
        }
    }
}

/// One recorded drawing command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Color),
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        width: f32,
        color: Color,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Text {
        text: String,
        bounds: Rect,
        size: f32,
        color: Color,
    },
}

/// Surface that records commands instead of rasterizing them.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<DrawOp>,
}

impl DrawList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// Recorded text commands, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Rect, Color)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text {
                text,
                bounds,
                color,
                ..
            } => Some((text.as_str(), *bounds, *color)),
            _ => None,
        })
    }

    pub fn circle_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::FillCircle { .. }))
            .count()
    }
}

impl DrawSurface for DrawList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) {
        self.ops.push(DrawOp::StrokeRect { rect, width, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ops.push(DrawOp::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, bounds: Rect, style: &TextStyle, color: Color) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            bounds,
            size: style.size,
            color,
        });
    }
}
