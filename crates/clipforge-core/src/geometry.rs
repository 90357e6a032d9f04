//! Geometric primitives for overlay placement and hit-testing.

use bytemuck::{Pod, Zeroable};
use glam::Vec2 as GlamVec2;
use serde::{Deserialize, Serialize};

/// 2D vector.
pub type Vec2 = GlamVec2;

/// Axis-aligned rectangle in surface units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two corners.
    pub fn from_corners(min: Vec2, max: Vec2) -> Self {
        Self {
            x: min.x,
            y: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }

    /// Create a rectangle from center and size.
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            x: center.x - size.x * 0.5,
            y: center.y - size.y * 0.5,
            width: size.x,
            height: size.y,
        }
    }

    /// Minimum corner (top-left).
    #[inline]
    pub fn min(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn right(self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(self) -> f32 {
        self.y + self.height
    }

    /// Center point.
    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Check if a point is inside the rectangle (right/bottom edges exclusive).
    #[inline]
    pub fn contains(self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Expand the rectangle by a margin on all sides.
    pub fn expand(self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// The four corners, clockwise from top-left.
    pub fn corners(self) -> [Vec2; 4] {
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.right(), self.y),
            Vec2::new(self.right(), self.bottom()),
            Vec2::new(self.x, self.bottom()),
        ]
    }

    /// Midpoints of the four edges: top, right, bottom, left.
    pub fn edge_midpoints(self) -> [Vec2; 4] {
        let c = self.center();
        [
            Vec2::new(c.x, self.y),
            Vec2::new(self.right(), c.y),
            Vec2::new(c.x, self.bottom()),
            Vec2::new(self.x, c.y),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(rect.contains(Vec2::new(50.0, 50.0)));
        assert!(!rect.contains(Vec2::new(150.0, 50.0)));
    }

    #[test]
    fn test_expand_keeps_center() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        let grown = rect.expand(10.0);
        assert_eq!(grown.center(), rect.center());
        assert_eq!(grown.width, 50.0);
        assert_eq!(grown.height, 60.0);
    }

    #[test]
    fn test_edge_midpoints() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let [top, right, bottom, left] = rect.edge_midpoints();
        assert_eq!(top, Vec2::new(50.0, 0.0));
        assert_eq!(right, Vec2::new(100.0, 25.0));
        assert_eq!(bottom, Vec2::new(50.0, 50.0));
        assert_eq!(left, Vec2::new(0.0, 25.0));
    }
}
