//! Frame compositor for overlay layers.
//!
//! Video and audio clips are presented by their playback handles; the
//! compositor draws everything else (text and image placeholders) on top,
//! back to front, followed by selection decorations.

use std::cmp::Reverse;

use clipforge_core::config::OverlayConfig;
use clipforge_core::{Color, Rect, Vec2};
use clipforge_timeline::{Clip, ClipId, ClipKind, ClipProperties, MediaProps, TextProps, Timeline};
use tracing::debug;

use crate::overlay::{OverlayGeometry, OverlayHit};
use crate::surface::DrawSurface;
use crate::text::{animation_alpha, animation_offset, MonospaceMeasurer, TextMeasurer, TextStyle};

const SELECTION_STROKE: f32 = 2.0;
const HANDLE_DRAW_RADIUS: f32 = 6.0;
const HANDLE_DRAW_SIZE: f32 = 10.0;
const PLACEHOLDER_STROKE: f32 = 2.0;
const PLACEHOLDER_COLOR: Color = Color::new(0.6, 0.6, 0.6, 1.0);

/// An active overlay clip and the index of its track.
#[derive(Debug, Clone, Copy)]
pub struct Layer<'a> {
    pub track_index: usize,
    pub clip: &'a Clip,
}

/// Counts from one `render` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub text: usize,
    pub images: usize,
}

/// Draws the overlay layers of a timeline at a point in time.
pub struct Compositor<M: TextMeasurer = MonospaceMeasurer> {
    measurer: M,
    config: OverlayConfig,
    /// Color the surface is cleared to
    pub background: Color,
}

impl Compositor<MonospaceMeasurer> {
    pub fn new(config: OverlayConfig) -> Self {
        Self::with_measurer(MonospaceMeasurer::default(), config)
    }
}

impl Default for Compositor<MonospaceMeasurer> {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}

impl<M: TextMeasurer> Compositor<M> {
    pub fn with_measurer(measurer: M, config: OverlayConfig) -> Self {
        Self {
            measurer,
            config,
            background: Color::TRANSPARENT,
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    /// Active overlay clips on visible tracks, in draw order (bottom first).
    ///
    /// Track 0 is topmost, so tracks are drawn from the last to the first.
    /// Within a track, later clips draw over earlier ones.
    pub fn layers<'a>(&self, timeline: &'a Timeline, time: f64) -> Vec<Layer<'a>> {
        let mut layers: Vec<Layer<'a>> = timeline
            .active_clips(time)
            .filter(|(_, clip)| matches!(clip.kind(), ClipKind::Text | ClipKind::Image))
            .map(|(track_index, clip)| Layer { track_index, clip })
            .collect();
        layers.sort_by_key(|layer| Reverse(layer.track_index));
        layers
    }

    /// Geometry of a text clip at `time`, including its animation offset.
    pub fn text_geometry(&self, clip: &Clip, time: f64) -> Option<OverlayGeometry> {
        let props = clip.properties.text()?;
        let progress = clip.span().progress(time);
        let offset = animation_offset(props.animation, progress, self.config.slide_distance);
        Some(OverlayGeometry::for_text(
            props,
            offset,
            &self.measurer,
            self.config.text_padding,
        ))
    }

    /// Render the frame at `time`.
    pub fn render<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        timeline: &Timeline,
        time: f64,
        selected: Option<ClipId>,
    ) -> RenderStats {
        surface.clear(self.background);
        let mut stats = RenderStats::default();

        for layer in self.layers(timeline, time) {
            let clip = layer.clip;
            let is_selected = selected == Some(clip.id);
            match &clip.properties {
                ClipProperties::Text(props) => {
                    self.draw_text(surface, clip, props, time, is_selected);
                    stats.text += 1;
                }
                ClipProperties::Image(media) => {
                    self.draw_image_placeholder(surface, timeline, media);
                    stats.images += 1;
                }
                ClipProperties::Video(_) | ClipProperties::Audio(_) => {}
            }
        }

        stats
    }

    /// Topmost overlay under `point` at `time`.
    pub fn hit_test(&self, timeline: &Timeline, time: f64, point: Vec2) -> Option<(ClipId, OverlayHit)> {
        self.layers(timeline, time).into_iter().rev().find_map(|layer| {
            let geometry = self.text_geometry(layer.clip, time)?;
            geometry
                .hit_test(point, self.config.handle_hit_radius)
                .map(|hit| (layer.clip.id, hit))
        })
    }

    fn draw_text<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        clip: &Clip,
        props: &TextProps,
        time: f64,
        selected: bool,
    ) {
        let Some(geometry) = self.text_geometry(clip, time) else {
            return;
        };
        let progress = clip.span().progress(time);
        let alpha = animation_alpha(props.animation, progress);
        let style = TextStyle::from_props(props);

        if let Some(background) = &props.background {
            match Color::parse_hex(background) {
                Ok(color) => surface.fill_rect(geometry.bounds, color.fade(alpha)),
                Err(e) => debug!(clip = %clip.id, error = %e, "ignoring text background"),
            }
        }

        let color = Color::parse_hex(&props.color).unwrap_or_else(|e| {
            debug!(clip = %clip.id, error = %e, "invalid text color, using white");
            Color::WHITE
        });
        surface.draw_text(&props.text, geometry.text_rect, &style, color.fade(alpha));

        if selected {
            draw_selection(surface, &geometry);
        }
    }

    fn draw_image_placeholder<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        timeline: &Timeline,
        media: &MediaProps,
    ) {
        let rect = Rect::new(
            media.x,
            media.y,
            timeline.width as f32 * media.scale,
            timeline.height as f32 * media.scale,
        );
        surface.stroke_rect(rect, PLACEHOLDER_STROKE, PLACEHOLDER_COLOR);
    }
}

fn draw_selection<S: DrawSurface + ?Sized>(surface: &mut S, geometry: &OverlayGeometry) {
    surface.stroke_rect(geometry.bounds, SELECTION_STROKE, Color::SELECTION);
    for handle in &geometry.handles {
        if handle.kind.is_corner() {
            surface.fill_circle(handle.center, HANDLE_DRAW_RADIUS, Color::WHITE);
        } else {
            let square = Rect::from_center_size(handle.center, Vec2::splat(HANDLE_DRAW_SIZE));
            surface.fill_rect(square, Color::WHITE);
        }
    }
}
