//! Playback handles: one per active playable clip.
//!
//! Loading is asynchronous. Backends report completion through a
//! `LoadEvent` channel that the synchronizer drains once per tick.

use clipforge_core::ClipForgeError;
use crossbeam_channel::Receiver;
use thiserror::Error;

/// Backend-assigned handle identifier.
pub type HandleId = u64;

/// Lifecycle of a playback handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleState {
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
    Errored,
}

impl HandleState {
    /// Whether the handle has finished loading and accepts seek/play/pause.
    pub fn accepts_transport(self) -> bool {
        matches!(self, Self::Ready | Self::Playing | Self::Paused)
    }

    /// State after a load completion event.
    pub fn on_loaded(self, ok: bool) -> Self {
        match (self, ok) {
            (Self::Loading, true) => Self::Ready,
            (Self::Loading, false) => Self::Errored,
            (other, _) => other,
        }
    }

    /// State after a play command.
    pub fn on_play(self) -> Self {
        if self.accepts_transport() {
            Self::Playing
        } else {
            self
        }
    }

    /// State after a pause command.
    pub fn on_pause(self) -> Self {
        if self.accepts_transport() {
            Self::Paused
        } else {
            self
        }
    }
}

/// Reasons a media source failed to load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("source not found: {0}")]
    NotFound(String),

    #[error("unsupported media: {0}")]
    Unsupported(String),

    #[error("decode failed: {0}")]
    Decode(String),
}

impl From<LoadError> for ClipForgeError {
    fn from(err: LoadError) -> Self {
        ClipForgeError::MediaLoad(err.to_string())
    }
}

/// Load completion reported by a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadEvent {
    pub handle: HandleId,
    pub result: std::result::Result<(), LoadError>,
}

/// A single media element. Transport calls before the load completes are
/// the caller's problem; the synchronizer never issues them.
pub trait PlaybackHandle: Send {
    fn id(&self) -> HandleId;

    /// Begin loading `source`. Completion arrives as a `LoadEvent`.
    fn load(&mut self, source: &str);

    /// Current media position in seconds.
    fn position(&self) -> f64;

    fn seek(&mut self, position: f64);

    fn set_muted(&mut self, muted: bool);

    fn play(&mut self);

    fn pause(&mut self);

    /// Detach the media source so the element can be released.
    fn clear_source(&mut self);
}

/// Factory for playback handles.
pub trait MediaBackend {
    fn create_handle(&mut self) -> Box<dyn PlaybackHandle>;

    /// Channel on which load completions arrive.
    fn events(&self) -> &Receiver<LoadEvent>;

    /// Return a handle's resources to the backend.
    fn release(&mut self, handle: Box<dyn PlaybackHandle>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_transitions() {
        assert_eq!(HandleState::Loading.on_loaded(true), HandleState::Ready);
        assert_eq!(HandleState::Loading.on_loaded(false), HandleState::Errored);
        assert_eq!(HandleState::Idle.on_loaded(true), HandleState::Idle);
    }

    #[test]
    fn test_transport_requires_loaded() {
        assert_eq!(HandleState::Loading.on_play(), HandleState::Loading);
        assert_eq!(HandleState::Errored.on_play(), HandleState::Errored);
        assert_eq!(HandleState::Ready.on_play(), HandleState::Playing);
        assert_eq!(HandleState::Playing.on_pause(), HandleState::Paused);
        assert_eq!(HandleState::Paused.on_play(), HandleState::Playing);
    }
}
