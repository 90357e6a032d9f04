//! Integration tests for the timeline, its persistence and the editing
//! gestures that drive it.

use clipforge_core::{EngineConfig, Vec2};
use clipforge_engine::{Engine, ManualTimeSource};
use clipforge_interaction::GestureOutcome;
use clipforge_media::SimulatedBackend;
use clipforge_timeline::{
    Clip, ClipId, JsonDirRepository, Timeline, TimelineRepository, TimelineStore, TrackKind,
};

type TestEngine = Engine<SimulatedBackend, ManualTimeSource>;

// ── Helpers ────────────────────────────────────────────────────

const ROW_HEIGHT: f32 = 48.0;
const PIXELS_PER_SECOND: f32 = 50.0;

fn engine_with(timeline: Timeline) -> TestEngine {
    Engine::new(
        EngineConfig::default(),
        timeline,
        SimulatedBackend::new(),
        ManualTimeSource::new(),
    )
}

/// Pointer at `time` seconds, vertically centred on `row`.
fn at(time: f32, row: usize) -> Vec2 {
    Vec2::new(time * PIXELS_PER_SECOND, row as f32 * ROW_HEIGHT + ROW_HEIGHT / 2.0)
}

fn build_project() -> (Timeline, ClipId, ClipId, ClipId) {
    let mut store = TimelineStore::new(Timeline::default());
    let captions = store.add_track(TrackKind::Overlay, None).unwrap();
    let video = store.add_track(TrackKind::Video, None).unwrap();
    let title = store
        .add_clip(Clip::text("Title", 0.5, 2.0), Some(captions))
        .unwrap();
    let intro = store
        .add_clip(Clip::video("media/intro.mp4", 0.0, 5.0), Some(video))
        .unwrap();
    let body = store
        .add_clip(Clip::video("media/body.mp4", 3.0, 4.0), Some(video))
        .unwrap();
    (store.timeline().clone(), title, intro, body)
}

// ── Active set & duration ──────────────────────────────────────

#[test]
fn overlapping_clips_are_both_active() {
    let (timeline, _, intro, body) = build_project();
    let store = TimelineStore::new(timeline);
    let active: Vec<ClipId> = store.active_clips(4.0).map(|(_, clip)| clip.id).collect();
    assert_eq!(active.len(), 2);
    assert!(active.contains(&intro));
    assert!(active.contains(&body));
}

#[test]
fn hidden_track_drops_out_of_active_set() {
    let (timeline, title, _, _) = build_project();
    let mut store = TimelineStore::new(timeline);
    let captions = store.track_of(title).unwrap().id;
    store.toggle_track_visibility(captions).unwrap();
    assert_eq!(store.active_clips(1.0).count(), 1);
}

#[test]
fn duration_tracks_latest_clip_end() {
    let (timeline, _, _, body) = build_project();
    let mut engine = engine_with(timeline);
    assert_eq!(engine.timeline().duration, 7.0);

    engine.move_clip(body, 10.0, 2.0);
    assert_eq!(engine.timeline().duration, 12.0);

    engine.delete_clip(body);
    assert_eq!(engine.timeline().duration, 5.0);
}

#[test]
fn empty_timeline_duration_is_floored() {
    let engine = engine_with(Timeline::default());
    assert_eq!(engine.timeline().duration, 1.0);
}

#[test]
fn duplicate_lands_right_after_original() {
    let (timeline, _, intro, _) = build_project();
    let mut engine = engine_with(timeline);
    let copy = engine.duplicate_clip(intro).unwrap();
    let clip = engine.store().clip(copy).unwrap();
    assert_eq!(clip.start_time, 5.0);
    assert_eq!(
        engine.store().track_of(copy).unwrap().id,
        engine.store().track_of(intro).unwrap().id
    );
}

// ── Gestures through the engine ────────────────────────────────

#[test]
fn drag_to_new_track_zone_creates_track() {
    let (timeline, title, _, _) = build_project();
    let mut engine = engine_with(timeline);
    let origin = engine.store().track_of(title).unwrap().id;

    assert_eq!(engine.pointer_down(at(1.0, 0)), Some(title));
    engine.pointer_move(at(1.5, 2));
    let outcome = engine.pointer_up(at(1.5, 2));

    let GestureOutcome::Migrated {
        clip,
        track,
        created_track,
    } = outcome
    else {
        panic!("expected migration, got {outcome:?}");
    };
    assert_eq!(clip, title);
    assert!(created_track);
    assert_eq!(engine.timeline().tracks.len(), 3);
    assert_eq!(engine.store().track_of(title).unwrap().id, track);
    assert!(engine.timeline().track(origin).unwrap().is_empty());
    assert_eq!(engine.store().clip(title).unwrap().start_time, 1.0);
    assert_eq!(engine.selection(), Some(title));
}

#[test]
fn whole_gesture_undoes_in_one_step() {
    let (timeline, title, _, _) = build_project();
    let mut engine = engine_with(timeline);
    let before = engine.timeline().clone();

    engine.pointer_down(at(1.0, 0));
    engine.pointer_move(at(2.0, 0));
    engine.pointer_move(at(3.0, 2));
    engine.pointer_up(at(3.0, 2));
    assert_ne!(engine.timeline(), &before);

    assert!(engine.undo());
    assert_eq!(engine.timeline(), &before);
    assert_eq!(engine.store().clip(title).unwrap().start_time, 0.5);
}

#[test]
fn start_edge_resize_clamps_before_end() {
    let mut store = TimelineStore::new(Timeline::default());
    let clip = store.add_clip(Clip::video("a.mp4", 2.0, 3.0), None).unwrap();
    let mut engine = engine_with(store.timeline().clone());

    let grab = at(2.0, 0) + Vec2::new(2.0, 0.0);
    assert_eq!(engine.pointer_down(grab), Some(clip));
    engine.pointer_up(at(4.5, 0));

    let resized = engine.store().clip(clip).unwrap();
    assert_eq!((resized.start_time, resized.duration), (4.0, 1.0));
}

#[test]
fn locked_track_ignores_pointer() {
    let (timeline, title, _, _) = build_project();
    let mut engine = engine_with(timeline);
    let captions = engine.store().track_of(title).unwrap().id;
    engine.toggle_track_lock(captions);

    assert_eq!(engine.pointer_down(at(1.0, 0)), None);
    assert_eq!(engine.pointer_up(at(3.0, 0)), GestureOutcome::None);
    assert_eq!(engine.store().clip(title).unwrap().start_time, 0.5);
}

#[test]
fn shrinking_edit_pulls_playhead_back() {
    let (timeline, _, intro, body) = build_project();
    let mut engine = engine_with(timeline);
    engine.seek(6.5);
    engine.delete_clip(body);
    assert_eq!(engine.current_time(), 5.0);
    engine.move_clip(intro, 0.0, 2.0);
    // The title overlay now ends last.
    assert_eq!(engine.current_time(), 2.5);
}

// ── Persistence ────────────────────────────────────────────────

#[test]
fn save_and_reload_preserves_tracks_and_clips() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonDirRepository::new(dir.path());
    let (timeline, _, _, _) = build_project();
    let engine = engine_with(timeline);
    engine.save_project(&repo, "demo").unwrap();

    let loaded = repo.load("demo").unwrap().unwrap();
    let track_ids: Vec<_> = loaded.tracks.iter().map(|t| t.id).collect();
    let expected: Vec<_> = engine.timeline().tracks.iter().map(|t| t.id).collect();
    assert_eq!(track_ids, expected);

    for (saved, reloaded) in engine.timeline().tracks.iter().zip(&loaded.tracks) {
        assert_eq!(saved.clips.len(), reloaded.clips.len());
        for clip in &saved.clips {
            assert!(reloaded.clips.contains(clip));
        }
    }
    assert_eq!(loaded.duration, engine.timeline().duration);
}

#[test]
fn loading_project_resets_playback() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonDirRepository::new(dir.path());
    let (timeline, _, intro, _) = build_project();
    repo.save("short", &timeline).unwrap();

    let mut engine = engine_with(Timeline::default());
    engine.add_clip(Clip::video("other.mp4", 0.0, 20.0), None);
    engine.seek(15.0);
    engine.play();

    assert!(engine.load_project(&repo, "short").unwrap());
    assert_eq!(engine.current_time(), 0.0);
    assert!(!engine.is_playing());
    assert!(engine.store().clip(intro).is_some());
    assert!(!engine.undo());
}

mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn duration_is_latest_end_after_edits(
            clips in prop::collection::vec((0.0f64..30.0, 0.5f64..10.0), 1..8),
            moves in prop::collection::vec((0usize..8, 0.0f64..30.0, 0.0f64..10.0), 0..8),
        ) {
            let mut engine = engine_with(Timeline::default());
            let ids: Vec<ClipId> = clips
                .iter()
                .filter_map(|(start, duration)| {
                    engine.add_clip(Clip::video("a.mp4", *start, *duration), None)
                })
                .collect();
            for (index, start, duration) in moves {
                engine.move_clip(ids[index % ids.len()], start, duration);
            }

            let latest = engine
                .timeline()
                .clips()
                .map(|(_, clip)| clip.end_time())
                .fold(0.0f64, f64::max);
            prop_assert_eq!(engine.timeline().duration, latest.max(1.0));
            for (_, clip) in engine.timeline().clips() {
                prop_assert!(clip.start_time >= 0.0);
                prop_assert!(clip.duration >= 0.5);
            }
        }
    }
}
