//! The engine facade.
//!
//! Owns the timeline store, the playback clock, the media synchronizer,
//! the compositor and the interaction state. Rendering flows
//! store → clock → {synchronizer, compositor}; edits flow
//! interaction → store → duration recompute.
//!
//! Mutations addressed at unknown ids are no-ops here: the store reports
//! them as `InvalidMutation`, which is logged at debug level and dropped.

use clipforge_core::{EngineConfig, Result, Vec2};
use clipforge_interaction::{GestureOutcome, InteractionEngine};
use clipforge_media::{
    clip_from_media, probe_with_fallback, MediaBackend, MediaSynchronizer, MetadataProber,
    SyncReport,
};
use clipforge_render::{Compositor, DrawSurface, OverlayHit, RenderStats, TransformSession};
use clipforge_timeline::{
    Clip, ClipId, ClipKind, ClipPatch, Timeline, TimelineRepository, TimelineStore, TrackId,
    TrackKind,
};
use tracing::{debug, info};

use crate::clock::{PlaybackClock, SystemTimeSource, TimeSource};

/// Result of one `frame` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub time: f64,
    pub playing: bool,
    pub sync: SyncReport,
    pub render: RenderStats,
}

/// An in-progress move/resize of a text overlay on the canvas.
#[derive(Debug, Clone, Copy)]
struct OverlayEdit {
    clip: ClipId,
    session: TransformSession,
}

/// Timeline and compositing engine.
pub struct Engine<B: MediaBackend, T: TimeSource = SystemTimeSource> {
    config: EngineConfig,
    store: TimelineStore,
    clock: PlaybackClock<T>,
    media: MediaSynchronizer<B>,
    compositor: Compositor,
    interaction: InteractionEngine,
    selection: Option<ClipId>,
    overlay_edit: Option<OverlayEdit>,
}

impl<B: MediaBackend, T: TimeSource> Engine<B, T> {
    pub fn new(config: EngineConfig, timeline: Timeline, backend: B, time_source: T) -> Self {
        let store = TimelineStore::new(timeline)
            .with_min_clip_duration(config.interaction.min_clip_duration);
        let media = MediaSynchronizer::with_config(backend, &config.media);
        let compositor = Compositor::new(config.overlay.clone());
        let interaction = InteractionEngine::new(&config.interaction);
        info!(
            tracks = store.timeline().tracks.len(),
            duration = store.duration(),
            "engine created"
        );
        Self {
            config,
            store,
            clock: PlaybackClock::new(time_source),
            media,
            compositor,
            interaction,
            selection: None,
            overlay_edit: None,
        }
    }

    // ── Read access ────────────────────────────────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &TimelineStore {
        &self.store
    }

    pub fn timeline(&self) -> &Timeline {
        self.store.timeline()
    }

    pub fn clock(&self) -> &PlaybackClock<T> {
        &self.clock
    }

    pub fn media(&self) -> &MediaSynchronizer<B> {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut MediaSynchronizer<B> {
        &mut self.media
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn interaction(&self) -> &InteractionEngine {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut InteractionEngine {
        &mut self.interaction
    }

    pub fn current_time(&self) -> f64 {
        self.clock.current_time()
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    pub fn selection(&self) -> Option<ClipId> {
        self.selection
    }

    /// Select a clip; unknown ids clear the selection.
    pub fn select(&mut self, clip: Option<ClipId>) {
        self.selection = clip.filter(|id| self.store.clip(*id).is_some());
    }

    // ── Playback ───────────────────────────────────────────────

    pub fn play(&mut self) {
        let duration = self.store.duration();
        self.clock.play(duration);
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn toggle_playback(&mut self) {
        let duration = self.store.duration();
        self.clock.toggle(duration);
    }

    /// Scrub to `time`, clamped to the timeline.
    pub fn seek(&mut self, time: f64) {
        let time = time.clamp(0.0, self.store.duration());
        self.clock.set_current_time(time);
    }

    /// Advance the clock and reconcile media handles, without drawing.
    pub fn tick(&mut self) -> SyncReport {
        self.clock.advance(self.store.duration());
        self.media.sync(
            self.store.timeline(),
            self.clock.current_time(),
            self.clock.is_playing(),
        )
    }

    /// One render-loop iteration: tick, sync media, composite overlays.
    pub fn frame<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) -> FrameReport {
        let sync = self.tick();
        let time = self.clock.current_time();
        let render = self
            .compositor
            .render(surface, self.store.timeline(), time, self.selection);
        FrameReport {
            time,
            playing: self.clock.is_playing(),
            sync,
            render,
        }
    }

    // ── Mutations ──────────────────────────────────────────────

    pub fn add_clip(&mut self, clip: Clip, target: Option<TrackId>) -> Option<ClipId> {
        let result = self.store.add_clip(clip, target);
        self.commit("add_clip", result)
    }

    pub fn update_clip(&mut self, id: ClipId, patch: ClipPatch) {
        let result = self.store.update_clip(id, patch);
        self.commit("update_clip", result);
    }

    pub fn delete_clip(&mut self, id: ClipId) {
        let result = self.store.delete_clip(id);
        if self.commit("delete_clip", result).is_some() && self.selection == Some(id) {
            self.selection = None;
        }
    }

    pub fn move_clip(&mut self, id: ClipId, start: f64, duration: f64) {
        let result = self.store.move_clip(id, start, duration);
        self.commit("move_clip", result);
    }

    pub fn move_clip_to_track(&mut self, id: ClipId, track: TrackId, start: f64) {
        let result = self.store.move_clip_to_track(id, track, start);
        self.commit("move_clip_to_track", result);
    }

    pub fn duplicate_clip(&mut self, id: ClipId) -> Option<ClipId> {
        let result = self.store.duplicate_clip(id);
        self.commit("duplicate_clip", result)
    }

    pub fn reorder_tracks(&mut self, dragged: TrackId, target: TrackId) {
        let result = self.store.reorder_tracks(dragged, target);
        self.commit("reorder_tracks", result);
    }

    pub fn add_track(&mut self, kind: TrackKind, name: Option<String>) -> Option<TrackId> {
        let result = self.store.add_track(kind, name);
        self.commit("add_track", result)
    }

    pub fn rename_track(&mut self, id: TrackId, name: impl Into<String>) {
        let result = self.store.rename_track(id, name);
        self.commit("rename_track", result);
    }

    pub fn toggle_track_lock(&mut self, id: TrackId) {
        let result = self.store.toggle_track_lock(id);
        self.commit("toggle_track_lock", result);
    }

    pub fn toggle_track_visibility(&mut self, id: TrackId) {
        let result = self.store.toggle_track_visibility(id);
        self.commit("toggle_track_visibility", result);
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.store.undo();
        self.recompute_duration();
        self.prune_selection();
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.store.redo();
        self.recompute_duration();
        self.prune_selection();
        redone
    }

    /// Re-derive the duration and pull the playhead back inside it.
    pub fn recompute_duration(&mut self) -> f64 {
        let duration = self.store.recompute_duration();
        self.clock.clamp_to(duration);
        duration
    }

    fn commit<R>(&mut self, op: &'static str, result: Result<R>) -> Option<R> {
        match result {
            Ok(value) => {
                self.recompute_duration();
                Some(value)
            }
            Err(e) => {
                debug!(op, error = %e, "mutation ignored");
                None
            }
        }
    }

    fn prune_selection(&mut self) {
        if let Some(id) = self.selection {
            if self.store.clip(id).is_none() {
                self.selection = None;
            }
        }
    }

    // ── Media drop ─────────────────────────────────────────────

    /// Probe a dropped source and add it as a clip at `start`. Probe
    /// failures fall back to default metadata.
    pub async fn add_media<P: MetadataProber>(
        &mut self,
        prober: &P,
        kind: ClipKind,
        source: &str,
        start: f64,
        target: Option<TrackId>,
    ) -> Option<ClipId> {
        let outcome = probe_with_fallback(prober, source, &self.config.media).await;
        match clip_from_media(kind, source, start, &outcome.metadata) {
            Ok(clip) => self.add_clip(clip, target),
            Err(e) => {
                debug!(source, error = %e, "media drop ignored");
                None
            }
        }
    }

    // ── Timeline gestures ──────────────────────────────────────

    /// Press in the track area. Selects the grabbed clip.
    pub fn pointer_down(&mut self, point: Vec2) -> Option<ClipId> {
        let clip = self.interaction.pointer_down(&mut self.store, point)?;
        self.selection = Some(clip);
        Some(clip)
    }

    pub fn pointer_move(&mut self, point: Vec2) -> GestureOutcome {
        let result = self.interaction.pointer_move(&mut self.store, point);
        self.apply_gesture("pointer_move", result)
    }

    pub fn pointer_up(&mut self, point: Vec2) -> GestureOutcome {
        let result = self.interaction.pointer_up(&mut self.store, point);
        self.apply_gesture("pointer_up", result)
    }

    /// Press on the time ruler.
    pub fn begin_scrub(&mut self, x: f32) {
        if let Some(time) = self.interaction.begin_scrub(x) {
            self.seek(time);
        }
    }

    pub fn begin_track_drag(&mut self, track: TrackId) -> bool {
        self.interaction.begin_track_drag(&self.store, track)
    }

    pub fn track_drag_over(&mut self, target: Option<TrackId>) {
        self.interaction.track_drag_over(target);
    }

    pub fn cancel_gesture(&mut self) {
        self.interaction.cancel(&mut self.store);
        self.recompute_duration();
    }

    fn apply_gesture(&mut self, op: &'static str, result: Result<GestureOutcome>) -> GestureOutcome {
        match result {
            Ok(GestureOutcome::Scrub(time)) => {
                self.seek(time);
                GestureOutcome::Scrub(self.clock.current_time())
            }
            Ok(GestureOutcome::None) => GestureOutcome::None,
            Ok(outcome) => {
                self.recompute_duration();
                outcome
            }
            Err(e) => {
                debug!(op, error = %e, "gesture aborted");
                self.recompute_duration();
                GestureOutcome::None
            }
        }
    }

    // ── Canvas overlay gestures ────────────────────────────────

    /// Press on the preview canvas. Hits on a text overlay select it and
    /// start a move (body) or font resize (handle).
    pub fn overlay_pointer_down(&mut self, point: Vec2) -> Option<(ClipId, OverlayHit)> {
        let time = self.clock.current_time();
        let Some((clip_id, hit)) = self.compositor.hit_test(self.store.timeline(), time, point)
        else {
            self.selection = None;
            return None;
        };
        self.selection = Some(clip_id);
        let props = self.store.clip(clip_id)?.properties.text()?;
        let session = TransformSession::begin(props, hit, point, self.config.overlay.min_font_size);
        self.store.begin_transaction();
        self.overlay_edit = Some(OverlayEdit {
            clip: clip_id,
            session,
        });
        Some((clip_id, hit))
    }

    pub fn overlay_pointer_move(&mut self, point: Vec2) {
        let Some(edit) = self.overlay_edit else {
            return;
        };
        let Some(mut properties) = self.store.clip(edit.clip).map(|c| c.properties.clone()) else {
            self.overlay_pointer_cancel();
            return;
        };
        if let Some(props) = properties.text_mut() {
            edit.session.apply(point, props);
        }
        let result = self.store.update_clip(
            edit.clip,
            ClipPatch {
                properties: Some(properties),
                ..ClipPatch::default()
            },
        );
        if self.commit("overlay_transform", result).is_none() {
            self.overlay_pointer_cancel();
        }
    }

    pub fn overlay_pointer_up(&mut self, point: Vec2) {
        if self.overlay_edit.is_none() {
            return;
        }
        self.overlay_pointer_move(point);
        if self.overlay_edit.take().is_some() && self.store.in_transaction() {
            self.store.commit_transaction();
        }
    }

    pub fn overlay_pointer_cancel(&mut self) {
        if self.overlay_edit.take().is_some() && self.store.in_transaction() {
            self.store.rollback_transaction();
        }
    }

    // ── Persistence ────────────────────────────────────────────

    /// Replace the timeline with the stored project. Returns `false` when
    /// nothing was stored under `project_id`.
    pub fn load_project<R: TimelineRepository + ?Sized>(
        &mut self,
        repository: &R,
        project_id: &str,
    ) -> Result<bool> {
        let Some(timeline) = repository.load(project_id)? else {
            return Ok(false);
        };
        self.interaction.cancel(&mut self.store);
        self.overlay_edit = None;
        self.clock.pause();
        self.clock.set_current_time(0.0);
        self.store.replace(timeline);
        self.selection = None;
        info!(project_id, duration = self.store.duration(), "project loaded");
        Ok(true)
    }

    pub fn save_project<R: TimelineRepository + ?Sized>(
        &self,
        repository: &R,
        project_id: &str,
    ) -> Result<()> {
        repository.save(project_id, self.store.timeline())
    }

    /// Stop playback and release every media handle.
    pub fn dispose(&mut self) {
        self.clock.pause();
        self.media.dispose();
        info!("engine disposed");
    }
}
