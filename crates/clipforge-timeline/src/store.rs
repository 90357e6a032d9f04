//! The timeline store: single owner of the `Timeline` and its only writer.
//!
//! Every mutation is a `TimelineCommand`. A command either applies completely
//! and commits a new snapshot (bumping `revision`), or fails and leaves the
//! timeline untouched. Undo/redo keeps whole-document snapshots.

use clipforge_core::{defaults, ClipForgeError, Result};
use tracing::{debug, warn};

use crate::clip::{Clip, ClipId, ClipPatch};
use crate::timeline::{Repairs, Timeline};
use crate::track::{Track, TrackId, TrackKind};

// ── Commands ────────────────────────────────────────────────────

/// A mutation of the timeline.
#[derive(Debug, Clone)]
pub enum TimelineCommand {
    /// Insert into `target`, else the first non-empty track, else track 0,
    /// else a new track.
    AddClip {
        clip: Clip,
        target: Option<TrackId>,
    },
    UpdateClip {
        id: ClipId,
        patch: ClipPatch,
    },
    DeleteClip {
        id: ClipId,
    },
    MoveClip {
        id: ClipId,
        start: f64,
        duration: f64,
    },
    /// Remove from the owning track, append to `track_id`, set start.
    MoveClipToTrack {
        id: ClipId,
        track_id: TrackId,
        start: f64,
    },
    /// Clone with a new id, placed right after the original on its track.
    DuplicateClip {
        id: ClipId,
    },
    /// Swap the array positions of two tracks.
    ReorderTracks {
        dragged: TrackId,
        target: TrackId,
    },
    AddTrack {
        kind: TrackKind,
        name: Option<String>,
    },
    RenameTrack {
        id: TrackId,
        name: String,
    },
    SetTrackLocked {
        id: TrackId,
        locked: bool,
    },
    SetTrackVisible {
        id: TrackId,
        visible: bool,
    },
}

impl TimelineCommand {
    /// Short name for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AddClip { .. } => "add_clip",
            Self::UpdateClip { .. } => "update_clip",
            Self::DeleteClip { .. } => "delete_clip",
            Self::MoveClip { .. } => "move_clip",
            Self::MoveClipToTrack { .. } => "move_clip_to_track",
            Self::DuplicateClip { .. } => "duplicate_clip",
            Self::ReorderTracks { .. } => "reorder_tracks",
            Self::AddTrack { .. } => "add_track",
            Self::RenameTrack { .. } => "rename_track",
            Self::SetTrackLocked { .. } => "set_track_locked",
            Self::SetTrackVisible { .. } => "set_track_visible",
        }
    }
}

/// What a successfully applied command produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Unit,
    Clip(ClipId),
    Track(TrackId),
}

// ── Undo stack ──────────────────────────────────────────────────

/// Snapshot-based undo/redo history.
#[derive(Debug, Clone)]
pub struct UndoStack {
    undo: Vec<Timeline>,
    redo: Vec<Timeline>,
    max_depth: usize,
}

impl UndoStack {
    /// Create a new undo stack with the given maximum depth.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth,
        }
    }

    /// Record the state before a new action. Clears the redo stack.
    pub fn push(&mut self, before: Timeline) {
        self.redo.clear();
        self.undo.push(before);
        if self.undo.len() > self.max_depth {
            self.undo.remove(0);
        }
    }

    fn undo(&mut self, current: Timeline) -> Option<Timeline> {
        let previous = self.undo.pop()?;
        self.redo.push(current);
        Some(previous)
    }

    fn redo(&mut self, current: Timeline) -> Option<Timeline> {
        let next = self.redo.pop()?;
        self.undo.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo.len()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(100)
    }
}

// ── Store ───────────────────────────────────────────────────────

fn log_repairs(repairs: Repairs) {
    if !repairs.is_clean() {
        warn!(?repairs, "timeline repaired on entry to store");
    }
}

/// Owns the timeline and exposes the closed set of mutations.
#[derive(Debug, Clone)]
pub struct TimelineStore {
    timeline: Timeline,
    revision: u64,
    history: UndoStack,
    /// Snapshot taken by `begin_transaction`; commands inside a transaction
    /// share one undo entry.
    transaction: Option<Timeline>,
    min_clip_duration: f64,
}

impl TimelineStore {
    /// Take ownership of a timeline. The timeline is sanitized first, so
    /// clip ranges and ids are valid from the first read.
    pub fn new(mut timeline: Timeline) -> Self {
        log_repairs(timeline.sanitize(defaults::MIN_CLIP_DURATION));
        Self {
            timeline,
            revision: 0,
            history: UndoStack::default(),
            transaction: None,
            min_clip_duration: defaults::MIN_CLIP_DURATION,
        }
    }

    /// Override the minimum clip duration used by all clamps.
    pub fn with_min_clip_duration(mut self, min: f64) -> Self {
        self.min_clip_duration = min;
        log_repairs(self.timeline.sanitize(min));
        self
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Incremented once per committed mutation, undo, redo or replace.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn duration(&self) -> f64 {
        self.timeline.duration
    }

    pub fn min_clip_duration(&self) -> f64 {
        self.min_clip_duration
    }

    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.timeline.clip(id)
    }

    pub fn track_of(&self, id: ClipId) -> Option<&Track> {
        self.timeline.track_of(id)
    }

    /// Clips active at `time` on visible tracks, with their track index.
    pub fn active_clips(&self, time: f64) -> impl Iterator<Item = (usize, &Clip)> {
        self.timeline.active_clips(time)
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Replace the whole document (project load). Clears history.
    pub fn replace(&mut self, mut timeline: Timeline) {
        log_repairs(timeline.sanitize(self.min_clip_duration));
        self.timeline = timeline;
        self.history.clear();
        self.transaction = None;
        self.revision += 1;
        debug!(
            tracks = self.timeline.tracks.len(),
            clips = self.timeline.clip_count(),
            "timeline replaced"
        );
    }

    /// Re-derive `duration` from all clips. Idempotent.
    pub fn recompute_duration(&mut self) -> f64 {
        self.timeline.recompute_duration()
    }

    // ── Transactions ───────────────────────────────────────────

    /// Group the following commands into one undo entry.
    pub fn begin_transaction(&mut self) {
        if self.transaction.is_none() {
            self.transaction = Some(self.timeline.clone());
        }
    }

    /// Close the open transaction. Pushes one undo entry if anything changed.
    pub fn commit_transaction(&mut self) {
        if let Some(before) = self.transaction.take() {
            if before != self.timeline {
                self.history.push(before);
            }
        }
    }

    /// Discard everything applied since `begin_transaction`.
    pub fn rollback_transaction(&mut self) {
        if let Some(before) = self.transaction.take() {
            if before != self.timeline {
                self.timeline = before;
                self.revision += 1;
            }
        }
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    // ── Undo/redo ─────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.commit_transaction();
        match self.history.undo(self.timeline.clone()) {
            Some(previous) => {
                self.timeline = previous;
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.commit_transaction();
        match self.history.redo(self.timeline.clone()) {
            Some(next) => {
                self.timeline = next;
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    // ── Mutations ──────────────────────────────────────────────

    /// Apply a command atomically.
    pub fn apply(&mut self, command: TimelineCommand) -> Result<Applied> {
        let label = command.label();
        let before = self.timeline.clone();
        let min = self.min_clip_duration;

        match execute(&mut self.timeline, command, min) {
            Ok(applied) => {
                self.timeline.recompute_duration();
                if self.transaction.is_none() {
                    self.history.push(before);
                }
                self.revision += 1;
                debug!(
                    command = label,
                    revision = self.revision,
                    duration = self.timeline.duration,
                    "timeline mutated"
                );
                Ok(applied)
            }
            Err(e) => {
                self.timeline = before;
                debug!(command = label, error = %e, "timeline mutation rejected");
                Err(e)
            }
        }
    }

    pub fn add_clip(&mut self, clip: Clip, target: Option<TrackId>) -> Result<ClipId> {
        match self.apply(TimelineCommand::AddClip { clip, target })? {
            Applied::Clip(id) => Ok(id),
            other => Err(unexpected(other)),
        }
    }

    pub fn update_clip(&mut self, id: ClipId, patch: ClipPatch) -> Result<()> {
        self.apply(TimelineCommand::UpdateClip { id, patch }).map(drop)
    }

    pub fn delete_clip(&mut self, id: ClipId) -> Result<()> {
        self.apply(TimelineCommand::DeleteClip { id }).map(drop)
    }

    pub fn move_clip(&mut self, id: ClipId, start: f64, duration: f64) -> Result<()> {
        self.apply(TimelineCommand::MoveClip {
            id,
            start,
            duration,
        })
        .map(drop)
    }

    pub fn move_clip_to_track(&mut self, id: ClipId, track_id: TrackId, start: f64) -> Result<()> {
        self.apply(TimelineCommand::MoveClipToTrack {
            id,
            track_id,
            start,
        })
        .map(drop)
    }

    pub fn duplicate_clip(&mut self, id: ClipId) -> Result<ClipId> {
        match self.apply(TimelineCommand::DuplicateClip { id })? {
            Applied::Clip(id) => Ok(id),
            other => Err(unexpected(other)),
        }
    }

    pub fn reorder_tracks(&mut self, dragged: TrackId, target: TrackId) -> Result<()> {
        self.apply(TimelineCommand::ReorderTracks { dragged, target })
            .map(drop)
    }

    pub fn add_track(&mut self, kind: TrackKind, name: Option<String>) -> Result<TrackId> {
        match self.apply(TimelineCommand::AddTrack { kind, name })? {
            Applied::Track(id) => Ok(id),
            other => Err(unexpected(other)),
        }
    }

    pub fn rename_track(&mut self, id: TrackId, name: impl Into<String>) -> Result<()> {
        self.apply(TimelineCommand::RenameTrack {
            id,
            name: name.into(),
        })
        .map(drop)
    }

    pub fn set_track_locked(&mut self, id: TrackId, locked: bool) -> Result<()> {
        self.apply(TimelineCommand::SetTrackLocked { id, locked })
            .map(drop)
    }

    pub fn set_track_visible(&mut self, id: TrackId, visible: bool) -> Result<()> {
        self.apply(TimelineCommand::SetTrackVisible { id, visible })
            .map(drop)
    }

    pub fn toggle_track_lock(&mut self, id: TrackId) -> Result<()> {
        let locked = self
            .timeline
            .track(id)
            .ok_or_else(|| ClipForgeError::unknown_id("track", id))?
            .locked;
        self.set_track_locked(id, !locked)
    }

    pub fn toggle_track_visibility(&mut self, id: TrackId) -> Result<()> {
        let visible = self
            .timeline
            .track(id)
            .ok_or_else(|| ClipForgeError::unknown_id("track", id))?
            .visible;
        self.set_track_visible(id, !visible)
    }
}

impl Default for TimelineStore {
    fn default() -> Self {
        Self::new(Timeline::default())
    }
}

fn unexpected(applied: Applied) -> ClipForgeError {
    ClipForgeError::Internal(format!("unexpected command result {applied:?}"))
}

fn execute(timeline: &mut Timeline, command: TimelineCommand, min: f64) -> Result<Applied> {
    match command {
        TimelineCommand::AddClip { mut clip, target } => {
            clip.normalize(min);
            if timeline.locate_clip(clip.id).is_some() {
                clip = clip.duplicate();
            }
            let id = clip.id;
            let index = target
                .and_then(|t| timeline.track_index(t))
                .or_else(|| timeline.tracks.iter().position(|t| !t.is_empty()))
                .or(if timeline.tracks.is_empty() { None } else { Some(0) });
            let index = match index {
                Some(i) => i,
                None => {
                    timeline.push_track(TrackKind::for_clip(clip.kind()));
                    timeline.tracks.len() - 1
                }
            };
            timeline.tracks[index].push_clip(clip);
            Ok(Applied::Clip(id))
        }
        TimelineCommand::UpdateClip { id, patch } => {
            let clip = timeline
                .clip_mut(id)
                .ok_or_else(|| ClipForgeError::unknown_id("clip", id))?;
            patch.apply(clip);
            clip.normalize(min);
            Ok(Applied::Unit)
        }
        TimelineCommand::DeleteClip { id } => {
            let (ti, _) = timeline
                .locate_clip(id)
                .ok_or_else(|| ClipForgeError::unknown_id("clip", id))?;
            timeline.tracks[ti].remove_clip(id);
            Ok(Applied::Unit)
        }
        TimelineCommand::MoveClip {
            id,
            start,
            duration,
        } => {
            let clip = timeline
                .clip_mut(id)
                .ok_or_else(|| ClipForgeError::unknown_id("clip", id))?;
            clip.start_time = start;
            clip.duration = duration;
            clip.normalize(min);
            Ok(Applied::Unit)
        }
        TimelineCommand::MoveClipToTrack {
            id,
            track_id,
            start,
        } => {
            let target = timeline
                .track_index(track_id)
                .ok_or_else(|| ClipForgeError::unknown_id("track", track_id))?;
            let (source, _) = timeline
                .locate_clip(id)
                .ok_or_else(|| ClipForgeError::unknown_id("clip", id))?;
            let mut clip = timeline.tracks[source]
                .remove_clip(id)
                .ok_or_else(|| ClipForgeError::unknown_id("clip", id))?;
            clip.start_time = start;
            clip.normalize(min);
            timeline.tracks[target].push_clip(clip);
            Ok(Applied::Unit)
        }
        TimelineCommand::DuplicateClip { id } => {
            let (ti, ci) = timeline
                .locate_clip(id)
                .ok_or_else(|| ClipForgeError::unknown_id("clip", id))?;
            let original = &timeline.tracks[ti].clips[ci];
            let mut copy = original.duplicate();
            copy.start_time = original.end_time();
            let new_id = copy.id;
            timeline.tracks[ti].push_clip(copy);
            Ok(Applied::Clip(new_id))
        }
        TimelineCommand::ReorderTracks { dragged, target } => {
            let from = timeline
                .track_index(dragged)
                .ok_or_else(|| ClipForgeError::unknown_id("track", dragged))?;
            let to = timeline
                .track_index(target)
                .ok_or_else(|| ClipForgeError::unknown_id("track", target))?;
            timeline.tracks.swap(from, to);
            Ok(Applied::Unit)
        }
        TimelineCommand::AddTrack { kind, name } => {
            let id = timeline.push_track(kind);
            if let Some(name) = name {
                if let Some(track) = timeline.tracks.last_mut() {
                    track.name = name;
                }
            }
            Ok(Applied::Track(id))
        }
        TimelineCommand::RenameTrack { id, name } => {
            track_mut(timeline, id)?.name = name;
            Ok(Applied::Unit)
        }
        TimelineCommand::SetTrackLocked { id, locked } => {
            track_mut(timeline, id)?.locked = locked;
            Ok(Applied::Unit)
        }
        TimelineCommand::SetTrackVisible { id, visible } => {
            track_mut(timeline, id)?.visible = visible;
            Ok(Applied::Unit)
        }
    }
}

fn track_mut(timeline: &mut Timeline, id: TrackId) -> Result<&mut Track> {
    timeline
        .track_mut(id)
        .ok_or_else(|| ClipForgeError::unknown_id("track", id))
}
