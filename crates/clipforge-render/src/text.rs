//! Text style resolution, measurement and animation curves.

use clipforge_core::Vec2;
use clipforge_timeline::{TextAnimation, TextProps};

/// Font parameters resolved from text clip properties.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub family: String,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl TextStyle {
    pub fn from_props(props: &TextProps) -> Self {
        Self {
            family: props.font_family.clone(),
            size: props.size.max(1.0),
            bold: props.bold,
            italic: props.italic,
        }
    }
}

/// Measured extent of a block of text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub width: f32,
    pub height: f32,
}

/// Supplies font metrics, so layout does not depend on a live display.
pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Fixed-advance metrics: every glyph is `advance` ems wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    /// Glyph advance as a fraction of the font size
    pub advance: f32,
    /// Line height as a fraction of the font size
    pub line_height: f32,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.2,
        }
    }
}

impl MonospaceMeasurer {
    /// Horizontal advance of one glyph at `style`.
    pub fn glyph_advance(&self, style: &TextStyle) -> f32 {
        let weight = if style.bold { 1.1 } else { 1.0 };
        style.size * self.advance * weight
    }

    pub fn line_advance(&self, style: &TextStyle) -> f32 {
        style.size * self.line_height
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let lines = text.split('\n');
        let (count, widest) = lines.fold((0usize, 0usize), |(n, w), line| {
            (n + 1, w.max(line.chars().count()))
        });
        TextMetrics {
            width: widest as f32 * self.glyph_advance(style),
            height: count as f32 * self.line_advance(style),
        }
    }
}

/// Opacity of an animated text overlay at `progress` through its clip.
pub fn animation_alpha(animation: TextAnimation, progress: f64) -> f32 {
    let alpha = match animation {
        TextAnimation::FadeIn => (2.0 * progress).min(1.0),
        TextAnimation::FadeOut => (1.0 - 2.0 * progress).max(0.0),
        _ => 1.0,
    };
    alpha.clamp(0.0, 1.0) as f32
}

/// Position offset of an animated text overlay.
///
/// Slides start `distance` units away and settle at the anchor as
/// progress reaches 1.
pub fn animation_offset(animation: TextAnimation, progress: f64, distance: f32) -> Vec2 {
    let remaining = distance * (1.0 - progress.clamp(0.0, 1.0) as f32);
    match animation {
        TextAnimation::SlideLeft => Vec2::new(remaining, 0.0),
        TextAnimation::SlideRight => Vec2::new(-remaining, 0.0),
        TextAnimation::SlideUp => Vec2::new(0.0, remaining),
        TextAnimation::SlideDown => Vec2::new(0.0, -remaining),
        _ => Vec2::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_in_alpha() {
        assert_eq!(animation_alpha(TextAnimation::FadeIn, 0.0), 0.0);
        assert_eq!(animation_alpha(TextAnimation::FadeIn, 0.25), 0.5);
        assert_eq!(animation_alpha(TextAnimation::FadeIn, 0.5), 1.0);
        assert_eq!(animation_alpha(TextAnimation::FadeIn, 0.9), 1.0);
    }

    #[test]
    fn test_fade_out_alpha() {
        assert_eq!(animation_alpha(TextAnimation::FadeOut, 0.0), 1.0);
        assert_eq!(animation_alpha(TextAnimation::FadeOut, 0.25), 0.5);
        assert_eq!(animation_alpha(TextAnimation::FadeOut, 0.75), 0.0);
        assert_eq!(animation_alpha(TextAnimation::SlideUp, 0.1), 1.0);
    }

    #[test]
    fn test_slide_offsets() {
        assert_eq!(
            animation_offset(TextAnimation::SlideLeft, 0.0, 100.0),
            Vec2::new(100.0, 0.0)
        );
        assert_eq!(
            animation_offset(TextAnimation::SlideUp, 0.5, 100.0),
            Vec2::new(0.0, 50.0)
        );
        assert_eq!(
            animation_offset(TextAnimation::SlideDown, 1.0, 100.0),
            Vec2::ZERO
        );
        assert_eq!(
            animation_offset(TextAnimation::FadeIn, 0.0, 100.0),
            Vec2::ZERO
        );
    }

    #[test]
    fn test_monospace_measure() {
        let style = TextStyle {
            family: "mono".into(),
            size: 10.0,
            bold: false,
            italic: false,
        };
        let m = MonospaceMeasurer::default().measure("abcd\nab", &style);
        assert!((m.width - 24.0).abs() < 1e-4);
        assert!((m.height - 24.0).abs() < 1e-4);
    }
}
