//! In-process media backend with no decoding.
//!
//! Handles track position, mute and transport state so the synchronizer
//! can run headless in previews and tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::debug;

use crate::handle::{HandleId, LoadError, LoadEvent, MediaBackend, PlaybackHandle};

/// Observable state of one simulated handle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimHandleSnapshot {
    pub source: Option<String>,
    pub position: f64,
    pub muted: bool,
    pub playing: bool,
    pub seek_count: usize,
}

struct Shared {
    handles: HashMap<HandleId, SimHandleSnapshot>,
    failing: HashSet<String>,
    pending: Vec<(HandleId, String)>,
    auto_complete: bool,
    /// Final state of every released handle, in release order.
    released: Vec<(HandleId, SimHandleSnapshot)>,
    sender: Sender<LoadEvent>,
}

impl Shared {
    fn complete(&mut self, id: HandleId, source: &str) {
        let result = if self.failing.contains(source) {
            Err(LoadError::NotFound(source.to_string()))
        } else {
            Ok(())
        };
        // The receiver lives as long as the backend; a send error only
        // means the backend is gone and nobody is listening.
        let _ = self.sender.send(LoadEvent { handle: id, result });
    }
}

/// Simulated media backend.
pub struct SimulatedBackend {
    shared: Arc<Mutex<Shared>>,
    receiver: Receiver<LoadEvent>,
    next_id: HandleId,
}

impl SimulatedBackend {
    /// Backend whose loads complete immediately.
    pub fn new() -> Self {
        Self::with_auto_complete(true)
    }

    /// Backend whose loads stay pending until `complete_pending` is called.
    pub fn manual() -> Self {
        Self::with_auto_complete(false)
    }

    fn with_auto_complete(auto_complete: bool) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            shared: Arc::new(Mutex::new(Shared {
                handles: HashMap::new(),
                failing: HashSet::new(),
                pending: Vec::new(),
                auto_complete,
                released: Vec::new(),
                sender,
            })),
            receiver,
            next_id: 1,
        }
    }

    /// Make every future load of `source` fail.
    pub fn fail_source(&self, source: impl Into<String>) {
        self.shared.lock().failing.insert(source.into());
    }

    /// Complete all pending loads. Returns how many completed.
    pub fn complete_pending(&self) -> usize {
        let mut shared = self.shared.lock();
        let pending = std::mem::take(&mut shared.pending);
        for (id, source) in &pending {
            shared.complete(*id, source);
        }
        pending.len()
    }

    /// Advance every playing handle by `dt` seconds.
    pub fn advance(&self, dt: f64) {
        for handle in self.shared.lock().handles.values_mut() {
            if handle.playing {
                handle.position += dt;
            }
        }
    }

    /// Force a handle's position, e.g. to simulate drift.
    pub fn set_position(&self, id: HandleId, position: f64) {
        if let Some(handle) = self.shared.lock().handles.get_mut(&id) {
            handle.position = position;
        }
    }

    pub fn snapshot(&self, id: HandleId) -> Option<SimHandleSnapshot> {
        self.shared.lock().handles.get(&id).cloned()
    }

    /// Handle currently loaded with `source`, if any.
    pub fn handle_for_source(&self, source: &str) -> Option<(HandleId, SimHandleSnapshot)> {
        self.shared
            .lock()
            .handles
            .iter()
            .find(|(_, h)| h.source.as_deref() == Some(source))
            .map(|(id, h)| (*id, h.clone()))
    }

    /// Number of handles created and not yet released.
    pub fn live_handles(&self) -> usize {
        self.shared.lock().handles.len()
    }

    pub fn released_count(&self) -> usize {
        self.shared.lock().released.len()
    }

    /// State a handle was in when it was handed back to `release`.
    pub fn released_snapshot(&self, id: HandleId) -> Option<SimHandleSnapshot> {
        self.shared
            .lock()
            .released
            .iter()
            .find(|(released, _)| *released == id)
            .map(|(_, snapshot)| snapshot.clone())
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaBackend for SimulatedBackend {
    fn create_handle(&mut self) -> Box<dyn PlaybackHandle> {
        let id = self.next_id;
        self.next_id += 1;
        self.shared
            .lock()
            .handles
            .insert(id, SimHandleSnapshot::default());
        debug!(handle = id, "simulated handle created");
        Box::new(SimulatedHandle {
            id,
            shared: Arc::clone(&self.shared),
        })
    }

    fn events(&self) -> &Receiver<LoadEvent> {
        &self.receiver
    }

    fn release(&mut self, handle: Box<dyn PlaybackHandle>) {
        let mut shared = self.shared.lock();
        let id = handle.id();
        let snapshot = shared.handles.remove(&id).unwrap_or_default();
        shared.pending.retain(|(pending, _)| *pending != id);
        shared.released.push((id, snapshot));
    }
}

struct SimulatedHandle {
    id: HandleId,
    shared: Arc<Mutex<Shared>>,
}

impl SimulatedHandle {
    fn update(&self, f: impl FnOnce(&mut SimHandleSnapshot)) {
        if let Some(handle) = self.shared.lock().handles.get_mut(&self.id) {
            f(handle);
        }
    }
}

impl PlaybackHandle for SimulatedHandle {
    fn id(&self) -> HandleId {
        self.id
    }

    fn load(&mut self, source: &str) {
        let mut shared = self.shared.lock();
        if let Some(handle) = shared.handles.get_mut(&self.id) {
            handle.source = Some(source.to_string());
            handle.position = 0.0;
            handle.playing = false;
        }
        if shared.auto_complete {
            shared.complete(self.id, source);
        } else {
            shared.pending.push((self.id, source.to_string()));
        }
    }

    fn position(&self) -> f64 {
        self.shared
            .lock()
            .handles
            .get(&self.id)
            .map_or(0.0, |h| h.position)
    }

    fn seek(&mut self, position: f64) {
        self.update(|h| {
            h.position = position;
            h.seek_count += 1;
        });
    }

    fn set_muted(&mut self, muted: bool) {
        self.update(|h| h.muted = muted);
    }

    fn play(&mut self) {
        self.update(|h| h.playing = true);
    }

    fn pause(&mut self) {
        self.update(|h| h.playing = false);
    }

    fn clear_source(&mut self) {
        self.update(|h| {
            h.source = None;
            h.playing = false;
        });
    }
}
