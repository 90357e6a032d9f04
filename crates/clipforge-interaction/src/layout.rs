//! Timeline view geometry: pixel/time mapping and track rows.
//!
//! Rows are assigned to non-empty tracks only, in track order. The row
//! just past the last one is the synthetic "new track" drop zone.

use clipforge_core::config::InteractionConfig;
use clipforge_core::{Rect, Vec2};
use clipforge_timeline::{ClipId, Timeline, TrackId};

/// What a row in the timeline view maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTarget {
    Track(TrackId),
    /// Dropping here creates a track first.
    NewTrack,
}

/// Timeline view geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineLayout {
    /// Pixels per second at zoom 1.0
    pub base_pixels_per_second: f64,
    pub zoom: f64,
    pub row_height: f32,
    pub trim_edge_width: f32,
}

impl TimelineLayout {
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            base_pixels_per_second: config.pixels_per_second,
            zoom: 1.0,
            row_height: config.track_row_height,
            trim_edge_width: config.trim_edge_width,
        }
    }

    #[inline]
    pub fn pixels_per_second(&self) -> f64 {
        self.base_pixels_per_second * self.zoom
    }

    /// Time under horizontal position `x`.
    #[inline]
    pub fn time_at(&self, x: f32) -> f64 {
        let pps = self.pixels_per_second();
        if pps <= 0.0 {
            0.0
        } else {
            x as f64 / pps
        }
    }

    #[inline]
    pub fn x_at(&self, time: f64) -> f32 {
        (time * self.pixels_per_second()) as f32
    }

    /// Tracks that own a row, top to bottom.
    pub fn rows(&self, timeline: &Timeline) -> Vec<TrackId> {
        timeline
            .tracks
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| t.id)
            .collect()
    }

    /// Row index under vertical position `y`, if any.
    pub fn row_index_at(&self, y: f32) -> Option<usize> {
        if y < 0.0 || self.row_height <= 0.0 {
            return None;
        }
        Some((y / self.row_height).floor() as usize)
    }

    /// Track or new-track zone under `y`. Anything below the last row
    /// counts as the new-track zone.
    pub fn target_at(&self, timeline: &Timeline, y: f32) -> Option<RowTarget> {
        let index = self.row_index_at(y)?;
        let rows = self.rows(timeline);
        Some(match rows.get(index) {
            Some(id) => RowTarget::Track(*id),
            None => RowTarget::NewTrack,
        })
    }

    /// Row occupied by a clip's track.
    pub fn row_of_clip(&self, timeline: &Timeline, clip: ClipId) -> Option<usize> {
        let track = timeline.track_of(clip)?;
        self.rows(timeline).iter().position(|id| *id == track.id)
    }

    /// Screen rectangle of a clip block.
    pub fn clip_rect(&self, timeline: &Timeline, clip: ClipId) -> Option<Rect> {
        let row = self.row_of_clip(timeline, clip)?;
        let c = timeline.clip(clip)?;
        Some(Rect::new(
            self.x_at(c.start_time),
            row as f32 * self.row_height,
            self.x_at(c.duration),
            self.row_height,
        ))
    }

    /// Topmost-drawn clip under `point`. Later clips in a track win.
    pub fn clip_at(&self, timeline: &Timeline, point: Vec2) -> Option<ClipId> {
        let index = self.row_index_at(point.y)?;
        let track_id = *self.rows(timeline).get(index)?;
        let track = timeline.track(track_id)?;
        track
            .clips
            .iter()
            .rev()
            .find(|c| {
                let x0 = self.x_at(c.start_time);
                let x1 = self.x_at(c.end_time());
                point.x >= x0 && point.x < x1
            })
            .map(|c| c.id)
    }
}

impl Default for TimelineLayout {
    fn default() -> Self {
        Self::new(&InteractionConfig::default())
    }
}
