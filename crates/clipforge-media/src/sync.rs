//! Keeps playback handles aligned with the playback clock.

use std::collections::HashMap;

use clipforge_core::config::MediaConfig;
use clipforge_core::ClipForgeError;
use clipforge_timeline::{ClipId, Timeline};
use tracing::{debug, info, warn};

use crate::handle::{HandleId, HandleState, MediaBackend, PlaybackHandle};

/// One attached handle and the clip it plays.
struct MediaSlot {
    source: String,
    handle: Box<dyn PlaybackHandle>,
    state: HandleState,
    error: Option<ClipForgeError>,
}

/// What a single `sync` pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub attached: usize,
    pub detached: usize,
    pub reseeked: usize,
    pub errored: usize,
}

/// Target state for one active playable clip.
struct Target<'a> {
    source: &'a str,
    local_time: f64,
    has_audio: bool,
}

/// Maps each active playable clip to exactly one playback handle.
pub struct MediaSynchronizer<B: MediaBackend> {
    backend: B,
    slots: HashMap<ClipId, MediaSlot>,
    by_handle: HashMap<HandleId, ClipId>,
    drift_tolerance: f64,
}

impl<B: MediaBackend> MediaSynchronizer<B> {
    pub fn new(backend: B, drift_tolerance: f64) -> Self {
        Self {
            backend,
            slots: HashMap::new(),
            by_handle: HashMap::new(),
            drift_tolerance,
        }
    }

    pub fn with_config(backend: B, config: &MediaConfig) -> Self {
        Self::new(backend, config.drift_tolerance)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Number of attached handles.
    pub fn attached_count(&self) -> usize {
        self.slots.len()
    }

    pub fn handle_state(&self, clip: ClipId) -> Option<HandleState> {
        self.slots.get(&clip).map(|s| s.state)
    }

    pub fn handle_id(&self, clip: ClipId) -> Option<HandleId> {
        self.slots.get(&clip).map(|s| s.handle.id())
    }

    /// Why the clip's media failed to load, while its errored handle is attached.
    pub fn load_error(&self, clip: ClipId) -> Option<&ClipForgeError> {
        self.slots.get(&clip).and_then(|s| s.error.as_ref())
    }

    /// Reconcile handles with the timeline at `time`.
    ///
    /// Handles are attached for newly active clips, detached for clips that
    /// left the active set, and loaded handles are muted, drift-corrected
    /// and played or paused to match `playing`.
    pub fn sync(&mut self, timeline: &Timeline, time: f64, playing: bool) -> SyncReport {
        let mut report = SyncReport::default();

        let targets: HashMap<ClipId, Target<'_>> = timeline
            .active_clips(time)
            .filter(|(_, clip)| clip.kind().is_playable())
            .filter_map(|(_, clip)| {
                clip.source().map(|source| {
                    (
                        clip.id,
                        Target {
                            source,
                            local_time: clip.local_time(time),
                            has_audio: clip.has_audio,
                        },
                    )
                })
            })
            .collect();

        let stale: Vec<ClipId> = self
            .slots
            .iter()
            .filter(|(id, slot)| {
                targets
                    .get(id)
                    .map_or(true, |target| target.source != slot.source)
            })
            .map(|(id, _)| *id)
            .collect();
        for id in stale {
            self.detach(id);
            report.detached += 1;
        }

        for (id, target) in &targets {
            if !self.slots.contains_key(id) {
                self.attach(*id, target.source);
                report.attached += 1;
            }
        }

        self.drain_events();

        for (id, target) in &targets {
            let Some(slot) = self.slots.get_mut(id) else {
                continue;
            };
            if slot.state == HandleState::Errored {
                report.errored += 1;
                continue;
            }
            if !slot.state.accepts_transport() {
                continue;
            }

            slot.handle.set_muted(!target.has_audio);

            let drift = (slot.handle.position() - target.local_time).abs();
            if drift > self.drift_tolerance {
                slot.handle.seek(target.local_time);
                report.reseeked += 1;
            }

            if playing && slot.state != HandleState::Playing {
                slot.handle.play();
                slot.state = slot.state.on_play();
                debug!(clip = %id, "handle playing");
            } else if !playing && slot.state != HandleState::Paused {
                slot.handle.pause();
                slot.state = slot.state.on_pause();
                debug!(clip = %id, "handle paused");
            }
        }

        report
    }

    fn attach(&mut self, clip: ClipId, source: &str) {
        let mut handle = self.backend.create_handle();
        handle.load(source);
        debug!(clip = %clip, handle = handle.id(), source, "handle attached");
        self.by_handle.insert(handle.id(), clip);
        self.slots.insert(
            clip,
            MediaSlot {
                source: source.to_string(),
                handle,
                state: HandleState::Loading,
                error: None,
            },
        );
    }

    fn detach(&mut self, clip: ClipId) {
        let Some(mut slot) = self.slots.remove(&clip) else {
            return;
        };
        self.by_handle.remove(&slot.handle.id());
        if slot.state.accepts_transport() {
            slot.handle.pause();
            slot.handle.seek(0.0);
        }
        slot.handle.clear_source();
        debug!(clip = %clip, handle = slot.handle.id(), "handle detached");
        self.backend.release(slot.handle);
    }

    fn drain_events(&mut self) {
        let events: Vec<_> = self.backend.events().try_iter().collect();
        for event in events {
            // Completions for already-released handles are dropped.
            let Some(clip) = self.by_handle.get(&event.handle) else {
                continue;
            };
            let Some(slot) = self.slots.get_mut(clip) else {
                continue;
            };
            match event.result {
                Ok(()) => {
                    slot.state = slot.state.on_loaded(true);
                    debug!(clip = %clip, handle = event.handle, "handle ready");
                }
                Err(e) => {
                    slot.state = slot.state.on_loaded(false);
                    let err = ClipForgeError::from(e);
                    warn!(clip = %clip, source = %slot.source, error = %err, "media load failed");
                    slot.error = Some(err);
                }
            }
        }
    }

    /// Pause, clear and release every live handle.
    pub fn dispose(&mut self) {
        if self.slots.is_empty() {
            return;
        }
        let count = self.slots.len();
        for (_, mut slot) in self.slots.drain() {
            slot.handle.pause();
            slot.handle.clear_source();
            self.backend.release(slot.handle);
        }
        self.by_handle.clear();
        info!(count, "media handles released");
    }
}

impl<B: MediaBackend> Drop for MediaSynchronizer<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}
