//! Pointer gestures on the timeline view.
//!
//! A gesture starts on pointer-down, edits the store on every move and
//! finishes on pointer-up. Clip edits made during one gesture are grouped
//! in a store transaction, so a whole drag is a single undo step and a
//! cancelled drag leaves no trace.

use clipforge_core::config::InteractionConfig;
use clipforge_core::{ClipForgeError, Result, Vec2};
use clipforge_timeline::{ClipId, TimelineStore, TrackId, TrackKind};
use tracing::debug;

use crate::layout::{RowTarget, TimelineLayout};
use crate::snapping::SnappingEngine;
use crate::trim::{hit_test_resize_edge, ResizeLimits, ResizeSession};

/// Drag-move of one clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipDrag {
    pub clip_id: ClipId,
    /// Grab position relative to the clip start, in seconds
    pub offset: f64,
    pub origin_track: TrackId,
    /// Row under the pointer, previewing a cross-track migration
    pub hover: Option<RowTarget>,
}

/// The gesture in progress.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Move(ClipDrag),
    Resize(ResizeSession),
    /// Playhead drag; writes only to the clock.
    Scrub,
    TrackReorder {
        dragged: TrackId,
        over: Option<TrackId>,
    },
}

/// Effect of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    None,
    /// Clip start or duration changed.
    Edited,
    /// New playhead time for the clock.
    Scrub(f64),
    Migrated {
        clip: ClipId,
        track: TrackId,
        created_track: bool,
    },
    TracksSwapped,
}

/// Converts pointer input into timeline mutations.
#[derive(Debug, Clone)]
pub struct InteractionEngine {
    pub layout: TimelineLayout,
    pub snapping: SnappingEngine,
    pub limits: ResizeLimits,
    gesture: Gesture,
}

impl InteractionEngine {
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            layout: TimelineLayout::new(config),
            snapping: SnappingEngine::from_config(config),
            limits: ResizeLimits {
                min_duration: config.min_clip_duration,
                start_min_span: config.resize_start_min_span,
            },
            gesture: Gesture::Idle,
        }
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.layout.zoom = zoom;
    }

    /// Migration target currently under the pointer during a clip drag.
    pub fn hover_target(&self) -> Option<RowTarget> {
        match &self.gesture {
            Gesture::Move(drag) => drag.hover,
            _ => None,
        }
    }

    /// Press on a clip block. Edges start a resize, the body a move.
    ///
    /// Returns the grabbed clip, or `None` when nothing was hit or the
    /// clip's track is locked.
    pub fn pointer_down(&mut self, store: &mut TimelineStore, point: Vec2) -> Option<ClipId> {
        if self.is_active() {
            return None;
        }
        let timeline = store.timeline();
        let clip_id = self.layout.clip_at(timeline, point)?;
        let track = timeline.track_of(clip_id)?;
        if track.locked {
            debug!(clip = %clip_id, track = %track.id, "ignoring drag on locked track");
            return None;
        }
        let clip = timeline.clip(clip_id)?;
        let rect = self.layout.clip_rect(timeline, clip_id)?;

        self.gesture = match hit_test_resize_edge(rect, point, self.layout.trim_edge_width) {
            Some(edge) => Gesture::Resize(ResizeSession::new(clip, edge)),
            None => Gesture::Move(ClipDrag {
                clip_id,
                offset: self.layout.time_at(point.x) - clip.start_time,
                origin_track: track.id,
                hover: self.layout.target_at(timeline, point.y),
            }),
        };
        store.begin_transaction();
        debug!(clip = %clip_id, gesture = ?self.gesture, "gesture started");
        Some(clip_id)
    }

    /// Press on the time ruler. Returns the scrubbed time.
    pub fn begin_scrub(&mut self, x: f32) -> Option<f64> {
        if self.is_active() {
            return None;
        }
        self.gesture = Gesture::Scrub;
        Some(self.layout.time_at(x).max(0.0))
    }

    /// Press on a track label.
    pub fn begin_track_drag(&mut self, store: &TimelineStore, track: TrackId) -> bool {
        if self.is_active() || store.timeline().track(track).is_none() {
            return false;
        }
        self.gesture = Gesture::TrackReorder {
            dragged: track,
            over: None,
        };
        true
    }

    /// Label currently under the pointer during a track drag.
    pub fn track_drag_over(&mut self, target: Option<TrackId>) {
        if let Gesture::TrackReorder { over, .. } = &mut self.gesture {
            *over = target;
        }
    }

    pub fn pointer_move(&mut self, store: &mut TimelineStore, point: Vec2) -> Result<GestureOutcome> {
        let result = self.update(store, point);
        if result.is_err() {
            self.abort(store);
        }
        result
    }

    /// Release. Finishes the gesture, migrating a dragged clip when it was
    /// dropped on another row.
    pub fn pointer_up(&mut self, store: &mut TimelineStore, point: Vec2) -> Result<GestureOutcome> {
        let result = self.update(store, point).and_then(|moved| {
            let finished = self.finish(store)?;
            Ok(if finished == GestureOutcome::None {
                moved
            } else {
                finished
            })
        });
        match result {
            Ok(outcome) => {
                if store.in_transaction() {
                    store.commit_transaction();
                }
                self.gesture = Gesture::Idle;
                Ok(outcome)
            }
            Err(e) => {
                self.abort(store);
                Err(e)
            }
        }
    }

    /// Drop the gesture and undo whatever it changed.
    pub fn cancel(&mut self, store: &mut TimelineStore) {
        if self.is_active() {
            debug!(gesture = ?self.gesture, "gesture cancelled");
            self.abort(store);
        }
    }

    fn abort(&mut self, store: &mut TimelineStore) {
        if store.in_transaction() {
            store.rollback_transaction();
        }
        self.gesture = Gesture::Idle;
    }

    fn update(&mut self, store: &mut TimelineStore, point: Vec2) -> Result<GestureOutcome> {
        let time = self.layout.time_at(point.x);
        match &mut self.gesture {
            Gesture::Idle | Gesture::TrackReorder { .. } => Ok(GestureOutcome::None),
            Gesture::Scrub => Ok(GestureOutcome::Scrub(time.max(0.0))),
            Gesture::Move(drag) => {
                let duration = store
                    .clip(drag.clip_id)
                    .map(|c| c.duration)
                    .ok_or_else(|| ClipForgeError::unknown_id("clip", drag.clip_id))?;
                let start = self.snapping.snap_start(time, drag.offset);
                drag.hover = self.layout.target_at(store.timeline(), point.y);
                store.move_clip(drag.clip_id, start, duration)?;
                Ok(GestureOutcome::Edited)
            }
            Gesture::Resize(session) => {
                let (start, duration) = session.resize_to(self.snapping.snap(time), self.limits);
                store.move_clip(session.clip_id, start, duration)?;
                Ok(GestureOutcome::Edited)
            }
        }
    }

    fn finish(&mut self, store: &mut TimelineStore) -> Result<GestureOutcome> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Move(drag) => migrate(store, &drag),
            Gesture::TrackReorder {
                dragged,
                over: Some(target),
            } if target != dragged => {
                store.reorder_tracks(dragged, target)?;
                Ok(GestureOutcome::TracksSwapped)
            }
            _ => Ok(GestureOutcome::None),
        }
    }
}

/// Move a released clip to the hovered row, creating a track for the
/// new-track zone. Locked targets are refused.
fn migrate(store: &mut TimelineStore, drag: &ClipDrag) -> Result<GestureOutcome> {
    let clip = store
        .clip(drag.clip_id)
        .ok_or_else(|| ClipForgeError::unknown_id("clip", drag.clip_id))?;
    let (start, kind) = (clip.start_time, clip.kind());

    let (track, created_track) = match drag.hover {
        None => return Ok(GestureOutcome::None),
        Some(RowTarget::Track(id)) if id == drag.origin_track => return Ok(GestureOutcome::None),
        Some(RowTarget::Track(id)) => {
            if store.timeline().track(id).map_or(true, |t| t.locked) {
                debug!(clip = %drag.clip_id, track = %id, "drop target locked, clip stays");
                return Ok(GestureOutcome::None);
            }
            (id, false)
        }
        Some(RowTarget::NewTrack) => (store.add_track(TrackKind::for_clip(kind), None)?, true),
    };

    store.move_clip_to_track(drag.clip_id, track, start)?;
    debug!(clip = %drag.clip_id, track = %track, created_track, "clip migrated");
    Ok(GestureOutcome::Migrated {
        clip: drag.clip_id,
        track,
        created_track,
    })
}

impl Default for InteractionEngine {
    fn default() -> Self {
        Self::new(&InteractionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipforge_timeline::{Clip, Timeline};

    /// Two video tracks, one clip each: A {0,5} on row 0, B {2,3} on row 1.
    fn setup() -> (TimelineStore, InteractionEngine, ClipId, ClipId) {
        let mut timeline = Timeline::default();
        let t1 = timeline.push_track(TrackKind::Video);
        let t2 = timeline.push_track(TrackKind::Video);
        let a = Clip::video("a.mp4", 0.0, 5.0);
        let b = Clip::video("b.mp4", 2.0, 3.0);
        let ids = (a.id, b.id);
        timeline.track_mut(t1).unwrap().push_clip(a);
        timeline.track_mut(t2).unwrap().push_clip(b);
        (
            TimelineStore::new(timeline),
            InteractionEngine::default(),
            ids.0,
            ids.1,
        )
    }

    fn at(time: f64, row: usize) -> Vec2 {
        Vec2::new((time * 50.0) as f32, row as f32 * 48.0 + 24.0)
    }

    #[test]
    fn test_drag_move_snaps_and_keeps_offset() {
        let (mut store, mut engine, _, b) = setup();
        assert_eq!(engine.pointer_down(&mut store, at(3.0, 1)), Some(b));
        engine.pointer_move(&mut store, at(4.1, 1)).unwrap();
        assert_eq!(store.clip(b).unwrap().start_time, 3.0);
        assert_eq!(store.clip(b).unwrap().duration, 3.0);

        let outcome = engine.pointer_up(&mut store, at(4.2, 1)).unwrap();
        assert_eq!(outcome, GestureOutcome::Edited);
        assert!(!engine.is_active());
        assert_eq!(store.history().undo_count(), 1);
    }

    #[test]
    fn test_drag_move_clamps_at_zero() {
        let (mut store, mut engine, _, b) = setup();
        engine.pointer_down(&mut store, at(3.0, 1));
        engine.pointer_move(&mut store, at(0.2, 1)).unwrap();
        assert_eq!(store.clip(b).unwrap().start_time, 0.0);
    }

    #[test]
    fn test_locked_track_rejects_drag() {
        let (mut store, mut engine, a, _) = setup();
        let track = store.track_of(a).unwrap().id;
        store.set_track_locked(track, true).unwrap();
        assert_eq!(engine.pointer_down(&mut store, at(2.0, 0)), None);
        assert!(!engine.is_active());
    }

    #[test]
    fn test_start_edge_resize_clamps() {
        let (mut store, mut engine, _, b) = setup();
        // Grab the start edge of B {2,3}.
        let grab = at(2.0, 1) + Vec2::new(2.0, 0.0);
        engine.pointer_down(&mut store, grab);
        assert!(matches!(engine.gesture(), Gesture::Resize(_)));
        engine.pointer_up(&mut store, at(4.5, 1)).unwrap();
        let clip = store.clip(b).unwrap();
        assert_eq!((clip.start_time, clip.duration), (4.0, 1.0));
    }

    #[test]
    fn test_end_edge_resize() {
        let (mut store, mut engine, _, b) = setup();
        let grab = at(5.0, 1) - Vec2::new(2.0, 0.0);
        engine.pointer_down(&mut store, grab);
        engine.pointer_up(&mut store, at(7.0, 1)).unwrap();
        let clip = store.clip(b).unwrap();
        assert_eq!((clip.start_time, clip.duration), (2.0, 5.0));
        assert_eq!(store.duration(), 7.0);
    }

    #[test]
    fn test_drop_on_new_track_zone_creates_track() {
        let (mut store, mut engine, a, _) = setup();
        let origin = store.track_of(a).unwrap().id;
        engine.pointer_down(&mut store, at(1.0, 0));
        let outcome = engine.pointer_up(&mut store, at(1.0, 2)).unwrap();

        let GestureOutcome::Migrated {
            track,
            created_track,
            ..
        } = outcome
        else {
            panic!("expected migration, got {outcome:?}");
        };
        assert!(created_track);
        assert_eq!(store.timeline().tracks.len(), 3);
        assert_eq!(store.track_of(a).unwrap().id, track);
        assert!(store.timeline().track(origin).unwrap().is_empty());
        assert_eq!(store.history().undo_count(), 1);
    }

    #[test]
    fn test_drop_on_other_track_migrates() {
        let (mut store, mut engine, a, b) = setup();
        let target = store.track_of(b).unwrap().id;
        engine.pointer_down(&mut store, at(1.0, 0));
        let outcome = engine.pointer_up(&mut store, at(1.0, 1)).unwrap();
        assert!(matches!(outcome, GestureOutcome::Migrated { created_track: false, .. }));
        assert_eq!(store.track_of(a).unwrap().id, target);
    }

    #[test]
    fn test_drop_on_locked_track_stays() {
        let (mut store, mut engine, a, b) = setup();
        let origin = store.track_of(a).unwrap().id;
        let target = store.track_of(b).unwrap().id;
        store.set_track_locked(target, true).unwrap();
        engine.pointer_down(&mut store, at(1.0, 0));
        engine.pointer_up(&mut store, at(1.0, 1)).unwrap();
        assert_eq!(store.track_of(a).unwrap().id, origin);
    }

    #[test]
    fn test_cancel_rolls_back() {
        let (mut store, mut engine, _, b) = setup();
        let before = store.timeline().clone();
        engine.pointer_down(&mut store, at(3.0, 1));
        engine.pointer_move(&mut store, at(6.0, 1)).unwrap();
        engine.cancel(&mut store);
        assert_eq!(store.timeline(), &before);
        assert_eq!(store.clip(b).unwrap().start_time, 2.0);
    }

    #[test]
    fn test_scrub_does_not_touch_store() {
        let (mut store, mut engine, _, _) = setup();
        let revision = store.revision();
        assert_eq!(engine.begin_scrub(100.0), Some(2.0));
        let outcome = engine.pointer_move(&mut store, Vec2::new(-20.0, 0.0)).unwrap();
        assert_eq!(outcome, GestureOutcome::Scrub(0.0));
        engine.pointer_up(&mut store, Vec2::new(150.0, 0.0)).unwrap();
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_track_reorder_swaps_on_release() {
        let (mut store, mut engine, _, _) = setup();
        let first = store.timeline().tracks[0].id;
        let second = store.timeline().tracks[1].id;
        assert!(engine.begin_track_drag(&store, first));
        engine.track_drag_over(Some(second));
        let outcome = engine.pointer_up(&mut store, Vec2::ZERO).unwrap();
        assert_eq!(outcome, GestureOutcome::TracksSwapped);
        assert_eq!(store.timeline().tracks[0].id, second);
        assert_eq!(store.timeline().tracks[1].id, first);
    }

    #[test]
    fn test_deleted_clip_aborts_gesture() {
        let (mut store, mut engine, _, b) = setup();
        engine.pointer_down(&mut store, at(3.0, 1));
        store.rollback_transaction();
        store.delete_clip(b).unwrap();
        assert!(engine.pointer_move(&mut store, at(4.0, 1)).is_err());
        assert!(!engine.is_active());
    }
}
