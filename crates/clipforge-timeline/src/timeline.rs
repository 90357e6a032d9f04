//! The timeline document.

use std::collections::HashSet;

use clipforge_core::defaults;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clip::{Clip, ClipId};
use crate::track::{Track, TrackId, TrackKind};

/// Location of a clip: (track index, clip index within the track).
pub type ClipLocation = (usize, usize);

/// What `Timeline::sanitize` had to change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Repairs {
    /// Clips whose start or duration was out of range
    pub clamped_clips: usize,
    /// Clips that shared an id with an earlier clip
    pub reassigned_clip_ids: usize,
    /// Tracks that shared an id with an earlier track
    pub reassigned_track_ids: usize,
}

impl Repairs {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// The project document: canvas size, frame rate, duration and ordered tracks.
///
/// Track order is compositing order: index 0 is the topmost layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Canvas width
    pub width: u32,
    /// Canvas height
    pub height: u32,
    /// Frame rate
    pub fps: f64,
    /// Derived: latest clip end, floored at 1 second
    pub duration: f64,
    pub tracks: Vec<Track>,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new(width: u32, height: u32, fps: f64) -> Self {
        Self {
            width,
            height,
            fps,
            duration: defaults::MIN_TIMELINE_DURATION,
            tracks: Vec::new(),
        }
    }

    /// Duration implied by the clips: `max(start + duration)`, floored at 1.
    pub fn compute_duration(&self) -> f64 {
        self.tracks
            .iter()
            .map(Track::end_time)
            .fold(defaults::MIN_TIMELINE_DURATION, f64::max)
    }

    /// Re-derive `duration` from the clips. Returns the new duration.
    pub fn recompute_duration(&mut self) -> f64 {
        self.duration = self.compute_duration();
        self.duration
    }

    /// Bring a document from outside the store into a valid state.
    ///
    /// Clamps every clip to `start >= 0` and `duration >= min_clip_duration`,
    /// gives fresh ids to clips and tracks that collide with an earlier one
    /// (first occurrence keeps its id) and re-derives `duration`.
    pub fn sanitize(&mut self, min_clip_duration: f64) -> Repairs {
        let mut repairs = Repairs::default();
        let mut track_ids = HashSet::new();
        let mut clip_ids = HashSet::new();

        for track in &mut self.tracks {
            if !track_ids.insert(track.id) {
                track.id = Uuid::new_v4();
                track_ids.insert(track.id);
                repairs.reassigned_track_ids += 1;
            }
            for clip in &mut track.clips {
                if !clip_ids.insert(clip.id) {
                    clip.id = Uuid::new_v4();
                    clip_ids.insert(clip.id);
                    repairs.reassigned_clip_ids += 1;
                }
                let before = (clip.start_time, clip.duration);
                clip.normalize(min_clip_duration);
                if before != (clip.start_time, clip.duration) {
                    repairs.clamped_clips += 1;
                }
            }
        }

        self.recompute_duration();
        repairs
    }

    /// Locate a clip by id.
    pub fn locate_clip(&self, id: ClipId) -> Option<ClipLocation> {
        self.tracks.iter().enumerate().find_map(|(ti, track)| {
            track.find_clip(id).map(|(ci, _)| (ti, ci))
        })
    }

    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.tracks.iter().find_map(|t| t.find_clip(id).map(|(_, c)| c))
    }

    pub fn clip_mut(&mut self, id: ClipId) -> Option<&mut Clip> {
        self.tracks.iter_mut().find_map(|t| t.find_clip_mut(id))
    }

    /// Track that currently owns the clip.
    pub fn track_of(&self, id: ClipId) -> Option<&Track> {
        self.locate_clip(id).map(|(ti, _)| &self.tracks[ti])
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn track_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    pub fn track_index(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// All clips with their owning track, in track order.
    pub fn clips(&self) -> impl Iterator<Item = (&Track, &Clip)> {
        self.tracks
            .iter()
            .flat_map(|t| t.clips.iter().map(move |c| (t, c)))
    }

    /// Clips active at `time` on visible tracks, with their track index.
    pub fn active_clips(&self, time: f64) -> impl Iterator<Item = (usize, &Clip)> {
        self.tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.visible)
            .flat_map(move |(ti, t)| t.clips_at(time).map(move |c| (ti, c)))
    }

    /// Total number of clips.
    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(Track::clip_count).sum()
    }

    /// A name not used by any existing track.
    pub fn next_track_name(&self) -> String {
        let mut n = self.tracks.len() + 1;
        loop {
            let name = format!("Track {n}");
            if self.tracks.iter().all(|t| t.name != name) {
                return name;
            }
            n += 1;
        }
    }

    /// Append a new empty track and return its id.
    pub fn push_track(&mut self, kind: TrackKind) -> TrackId {
        let track = Track::new(self.next_track_name(), kind);
        let id = track.id;
        self.tracks.push(track);
        id
    }
}

impl Default for Timeline {
    /// Vertical 1080x1920 canvas at 30 fps, the short-form default.
    fn default() -> Self {
        Self::new(1080, 1920, 30.0)
    }
}
