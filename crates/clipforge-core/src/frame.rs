//! RGBA8 raster surface in CPU memory.
//!
//! The compositor draws overlay layers into a `FrameBuffer` once per frame.
//! Rows are padded to a 64-byte stride so a host can upload them directly.

use std::io::Write;

use crate::color::Color;
use crate::geometry::{Rect, Vec2};

/// An RGBA8 frame with row padding.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Bytes per row (includes padding)
    pub stride: usize,
    /// Raw pixel data
    pub data: Vec<u8>,
}

impl FrameBuffer {
    /// Create a new transparent frame.
    pub fn new(width: u32, height: u32) -> Self {
        let min_stride = width as usize * 4;
        let stride = (min_stride + 63) & !63;
        Self {
            width,
            height,
            stride,
            data: vec![0u8; stride * height as usize],
        }
    }

    /// Get a row of pixels.
    #[inline]
    pub fn row(&self, y: u32) -> &[[u8; 4]] {
        let start = y as usize * self.stride;
        let end = start + self.width as usize * 4;
        bytemuck::cast_slice(&self.data[start..end])
    }

    /// Get a mutable row of pixels.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [[u8; 4]] {
        let start = y as usize * self.stride;
        let end = start + self.width as usize * 4;
        bytemuck::cast_slice_mut(&mut self.data[start..end])
    }

    /// Read a single pixel; out-of-bounds reads return `None`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.row(y)[x as usize])
    }

    /// Overwrite every pixel with `color` (no blending).
    pub fn clear(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        for y in 0..self.height {
            self.row_mut(y).fill(rgba);
        }
    }

    /// Alpha-blend `color` over a single pixel. Out-of-bounds writes are dropped.
    #[inline]
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let px = &mut self.row_mut(y as u32)[x as usize];
        *px = color.blend_over(*px);
    }

    /// Fill a rectangle, clipped to the frame.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip_bounds(rect) else {
            return;
        };
        for y in y0..y1 {
            let row = self.row_mut(y);
            for px in &mut row[x0 as usize..x1 as usize] {
                *px = color.blend_over(*px);
            }
        }
    }

    /// Outline a rectangle with a stroke of the given width, drawn inside the rect.
    pub fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) {
        let w = width.max(1.0).min(rect.width * 0.5).min(rect.height * 0.5);
        self.fill_rect(Rect::new(rect.x, rect.y, rect.width, w), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - w, rect.width, w), color);
        self.fill_rect(
            Rect::new(rect.x, rect.y + w, w, rect.height - 2.0 * w),
            color,
        );
        self.fill_rect(
            Rect::new(rect.right() - w, rect.y + w, w, rect.height - 2.0 * w),
            color,
        );
    }

    /// Fill a disc centered on `center`.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let bounds = Rect::from_center_size(center, Vec2::splat(radius * 2.0));
        let Some((x0, y0, x1, y1)) = self.clip_bounds(bounds) else {
            return;
        };
        let r2 = radius * radius;
        for y in y0..y1 {
            for x in x0..x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
                if d.length_squared() <= r2 {
                    self.blend_pixel(x as i64, y as i64, color);
                }
            }
        }
    }

    /// Write the frame as a binary PPM (alpha dropped).
    pub fn write_ppm<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        for y in 0..self.height {
            for px in self.row(y) {
                out.write_all(&px[..3])?;
            }
        }
        Ok(())
    }

    fn clip_bounds(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.x.floor().max(0.0);
        let y0 = rect.y.floor().max(0.0);
        let x1 = rect.right().ceil().min(self.width as f32);
        let y1 = rect.bottom().ceil().min(self.height as f32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}
