//! Integration tests for playback: clock, media handles and compositing
//! driven together through the engine's frame loop.

use clipforge_core::{ClipForgeError, EngineConfig, FrameBuffer};
use clipforge_engine::{Engine, ManualTimeSource};
use clipforge_media::{MediaMetadata, SimulatedBackend, StaticProber};
use clipforge_render::DrawList;
use clipforge_timeline::{Clip, ClipKind, TextAnimation, Timeline};

type TestEngine = Engine<SimulatedBackend, ManualTimeSource>;

fn setup() -> (TestEngine, ManualTimeSource) {
    let time = ManualTimeSource::new();
    let engine = Engine::new(
        EngineConfig::default(),
        Timeline::default(),
        SimulatedBackend::new(),
        time.clone(),
    );
    (engine, time)
}

fn fading_text(animation: TextAnimation, start: f64, duration: f64) -> Clip {
    let mut clip = Clip::text("caption", start, duration);
    if let Some(props) = clip.properties.text_mut() {
        props.x = 540.0;
        props.y = 960.0;
        props.animation = animation;
    }
    clip
}

fn text_alpha(engine: &mut TestEngine) -> Option<f32> {
    let mut list = DrawList::new(1080, 1920);
    engine.frame(&mut list);
    let alpha = list.texts().next().map(|(_, _, color)| color.a);
    alpha
}

// ── Clock ──────────────────────────────────────────────────────

#[test]
fn playback_clamps_at_end_and_pauses_media() {
    let (mut engine, time) = setup();
    engine.add_clip(Clip::video("a.mp4", 0.0, 10.0), None);
    engine.seek(8.0);
    engine.play();
    engine.tick();
    let backend = engine.media().backend();
    let (_, snapshot) = backend.handle_for_source("a.mp4").unwrap();
    assert!(snapshot.playing);

    time.advance(3.0);
    engine.tick();
    assert_eq!(engine.current_time(), 10.0);
    assert!(!engine.is_playing());

    // The clip's interval is half-open, so at t=10 it has left the
    // active set and its handle is gone.
    engine.tick();
    assert_eq!(engine.media().backend().live_handles(), 0);
}

#[test]
fn pause_then_scrub_is_not_overwritten() {
    let (mut engine, time) = setup();
    engine.add_clip(Clip::video("a.mp4", 0.0, 10.0), None);
    engine.play();
    time.advance(2.0);
    engine.tick();
    engine.pause();
    engine.seek(7.0);
    time.advance(1.0);
    engine.tick();
    assert_eq!(engine.current_time(), 7.0);
}

#[test]
fn play_from_end_restarts() {
    let (mut engine, _) = setup();
    engine.add_clip(Clip::video("a.mp4", 0.0, 4.0), None);
    engine.seek(4.0);
    engine.play();
    assert_eq!(engine.current_time(), 0.0);
    assert!(engine.is_playing());
}

// ── Media synchronization ──────────────────────────────────────

#[test]
fn handle_positioned_at_local_time_with_trim() {
    let (mut engine, _) = setup();
    let mut clip = Clip::video("b.mp4", 2.0, 5.0);
    if let Some(media) = clip.properties.media_mut() {
        media.trim.start = 1.5;
    }
    clip.has_audio = false;
    engine.add_clip(clip, None);
    engine.seek(3.0);
    engine.tick();

    let (_, snapshot) = engine.media().backend().handle_for_source("b.mp4").unwrap();
    assert_eq!(snapshot.position, 2.5);
    assert!(snapshot.muted);
    assert!(!snapshot.playing);
}

#[test]
fn one_handle_per_active_clip() {
    let (mut engine, _) = setup();
    engine.add_clip(Clip::video("a.mp4", 0.0, 5.0), None);
    engine.add_clip(Clip::video("b.mp4", 3.0, 4.0), None);
    engine.add_clip(Clip::text("title", 0.0, 5.0), None);

    engine.seek(4.0);
    let report = engine.tick();
    assert_eq!(report.attached, 2);
    assert_eq!(engine.media().attached_count(), 2);

    let again = engine.tick();
    assert_eq!(again.attached, 0);
    assert_eq!(engine.media().backend().live_handles(), 2);

    engine.seek(6.0);
    let later = engine.tick();
    assert_eq!(later.detached, 1);
    assert_eq!(engine.media().backend().released_count(), 1);
}

#[test]
fn failed_media_is_contained() {
    let (mut engine, _) = setup();
    engine.media().backend().fail_source("missing.mp4");
    let missing = engine
        .add_clip(Clip::video("missing.mp4", 0.0, 5.0), None)
        .unwrap();
    engine.add_clip(Clip::text("still here", 0.0, 5.0), None);
    engine.play();

    let mut frame = FrameBuffer::new(1080, 1920);
    let report = engine.frame(&mut frame);
    assert_eq!(report.sync.errored, 1);
    assert_eq!(report.render.text, 1);
    assert!(engine.is_playing());
    assert!(matches!(
        engine.media().load_error(missing),
        Some(ClipForgeError::MediaLoad(_))
    ));
}

// ── Compositing ────────────────────────────────────────────────

#[test]
fn fade_in_alpha_follows_progress() {
    let (mut engine, _) = setup();
    engine.add_clip(fading_text(TextAnimation::FadeIn, 0.0, 3.0), None);
    engine.add_clip(Clip::video("long.mp4", 0.0, 10.0), None);

    engine.seek(0.75);
    assert_eq!(text_alpha(&mut engine), Some(0.5));
    engine.seek(1.5);
    assert_eq!(text_alpha(&mut engine), Some(1.0));
    engine.seek(2.9);
    assert_eq!(text_alpha(&mut engine), Some(1.0));
}

#[test]
fn hidden_overlay_track_is_not_drawn() {
    let (mut engine, _) = setup();
    let id = engine
        .add_clip(fading_text(TextAnimation::None, 0.0, 3.0), None)
        .unwrap();
    let track = engine.store().track_of(id).unwrap().id;
    engine.seek(1.0);
    assert_eq!(text_alpha(&mut engine), Some(1.0));

    engine.toggle_track_visibility(track);
    assert_eq!(text_alpha(&mut engine), None);
}

#[test]
fn selected_text_draws_transform_handles() {
    let (mut engine, _) = setup();
    let id = engine
        .add_clip(fading_text(TextAnimation::None, 0.0, 3.0), None)
        .unwrap();
    engine.select(Some(id));
    let mut list = DrawList::new(1080, 1920);
    engine.frame(&mut list);
    assert_eq!(list.circle_count(), 4);
}

// ── Media drop ─────────────────────────────────────────────────

#[tokio::test]
async fn dropped_media_uses_probed_duration() {
    let (mut engine, _) = setup();
    let mut prober = StaticProber::new();
    prober.insert(
        "clip.mp4",
        MediaMetadata {
            duration: 8.0,
            width: 1080,
            height: 1920,
            has_audio: false,
        },
    );

    let probed = engine
        .add_media(&prober, ClipKind::Video, "clip.mp4", 1.0, None)
        .await
        .unwrap();
    let fallback = engine
        .add_media(&prober, ClipKind::Video, "unknown.mp4", 0.0, None)
        .await
        .unwrap();

    let probed = engine.store().clip(probed).unwrap();
    assert_eq!(probed.duration, 8.0);
    assert!(!probed.has_audio);
    let fallback = engine.store().clip(fallback).unwrap();
    assert_eq!(fallback.duration, 5.0);
    assert!(fallback.has_audio);
    assert_eq!(engine.timeline().duration, 9.0);
}
