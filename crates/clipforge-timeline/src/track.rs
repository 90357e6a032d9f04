//! Track types for the timeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clip::{Clip, ClipId, ClipKind};

/// Track identifier, unique within a timeline.
pub type TrackId = Uuid;

/// Kind of track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Overlay,
}

impl TrackKind {
    /// Track kind used when a clip needs a fresh track.
    pub fn for_clip(kind: ClipKind) -> Self {
        match kind {
            ClipKind::Video => TrackKind::Video,
            ClipKind::Audio => TrackKind::Audio,
            ClipKind::Text | ClipKind::Image => TrackKind::Overlay,
        }
    }
}

/// An ordered lane of clips. Clips keep their own start times, so array
/// order inside a track carries no timing meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: TrackId,
    /// Track name
    pub name: String,
    /// Track kind
    #[serde(rename = "type")]
    pub kind: TrackKind,
    /// Clips in this track
    pub clips: Vec<Clip>,
    /// Is track locked (rejects drag and resize)
    pub locked: bool,
    /// Hidden tracks are skipped by the synchronizer and the compositor
    pub visible: bool,
}

impl Track {
    /// Create a new empty, unlocked, visible track.
    pub fn new(name: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            clips: Vec::new(),
            locked: false,
            visible: true,
        }
    }

    /// Latest clip end on this track, or 0 when empty.
    pub fn end_time(&self) -> f64 {
        self.clips
            .iter()
            .map(Clip::end_time)
            .fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Append a clip to the track.
    pub fn push_clip(&mut self, clip: Clip) {
        self.clips.push(clip);
    }

    /// Find a clip by id. Returns (index, &Clip).
    pub fn find_clip(&self, id: ClipId) -> Option<(usize, &Clip)> {
        self.clips.iter().enumerate().find(|(_, c)| c.id == id)
    }

    /// Find a clip mutably by id.
    pub fn find_clip_mut(&mut self, id: ClipId) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|c| c.id == id)
    }

    /// Remove a clip by id. Returns the removed clip.
    pub fn remove_clip(&mut self, id: ClipId) -> Option<Clip> {
        let index = self.clips.iter().position(|c| c.id == id)?;
        Some(self.clips.remove(index))
    }

    /// Clips active at `time`, in array order.
    pub fn clips_at(&self, time: f64) -> impl Iterator<Item = &Clip> {
        self.clips.iter().filter(move |c| c.contains(time))
    }

    /// Number of clips in this track.
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }
}
