//! Playback clock.
//!
//! A two-state virtual clock. While playing, each tick derives the current
//! time from the wall-clock time elapsed since playback was anchored:
//! `time = time_at_play_start + (now - anchor)`. Reaching the timeline
//! duration clamps the time and pauses.
//!
//! Ticks are scheduled through `TickToken`s. Pausing drops the pending
//! token on the spot, so a tick that was already queued by the host is
//! recognised as stale and cannot overwrite a scrub.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::{debug, info};

/// Monotonic wall-clock source, in seconds.
pub trait TimeSource {
    fn now(&self) -> f64;
}

/// Wall clock backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    epoch: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// Hand-driven wall clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Arc<Mutex<f64>>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, seconds: f64) {
        *self.now.lock() += seconds;
    }

    pub fn set(&self, seconds: f64) {
        *self.now.lock() = seconds;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> f64 {
        *self.now.lock()
    }
}

/// Clock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Paused,
    Playing,
}

/// Identifies one scheduled tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

/// The playback clock: the only writer of `current_time` besides scrubbing.
#[derive(Debug, Clone)]
pub struct PlaybackClock<T: TimeSource = SystemTimeSource> {
    source: T,
    state: ClockState,
    current_time: f64,
    time_at_play_start: f64,
    anchor: f64,
    pending: Option<TickToken>,
    next_token: u64,
}

impl<T: TimeSource> PlaybackClock<T> {
    pub fn new(source: T) -> Self {
        let anchor = source.now();
        Self {
            source,
            state: ClockState::Paused,
            current_time: 0.0,
            time_at_play_start: 0.0,
            anchor,
            pending: None,
            next_token: 0,
        }
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == ClockState::Playing
    }

    /// The tick the host should deliver next, if playing.
    pub fn pending_tick(&self) -> Option<TickToken> {
        self.pending
    }

    pub fn time_source(&self) -> &T {
        &self.source
    }

    /// Start playing. At or past the end, playback restarts from 0.
    pub fn play(&mut self, duration: f64) -> TickToken {
        if self.current_time >= duration {
            self.current_time = 0.0;
        }
        self.reanchor();
        self.state = ClockState::Playing;
        info!(time = self.current_time, "playback started");
        self.schedule()
    }

    /// Stop playing and cancel the pending tick.
    pub fn pause(&mut self) {
        if self.state == ClockState::Playing {
            info!(time = self.current_time, "playback paused");
        }
        self.state = ClockState::Paused;
        self.pending = None;
    }

    pub fn toggle(&mut self, duration: f64) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play(duration);
        }
    }

    /// Scrub. Legal in either state; does not change `is_playing`.
    pub fn set_current_time(&mut self, time: f64) {
        self.current_time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        self.reanchor();
    }

    /// Pull the current time back inside a shrunken timeline.
    pub fn clamp_to(&mut self, duration: f64) {
        if self.current_time > duration {
            debug!(from = self.current_time, to = duration, "clock clamped");
            self.set_current_time(duration);
        }
    }

    /// Deliver a scheduled tick. Returns the new time, or `None` for a
    /// stale or cancelled token.
    pub fn tick(&mut self, token: TickToken, duration: f64) -> Option<f64> {
        if self.state != ClockState::Playing || self.pending != Some(token) {
            return None;
        }
        let time = self.time_at_play_start + (self.source.now() - self.anchor);
        if time >= duration {
            self.current_time = duration;
            self.pause();
            info!(duration, "playback reached end");
        } else {
            self.current_time = time;
            self.schedule();
        }
        Some(self.current_time)
    }

    /// Deliver the pending tick, if any.
    pub fn advance(&mut self, duration: f64) -> Option<f64> {
        let token = self.pending?;
        self.tick(token, duration)
    }

    fn reanchor(&mut self) {
        self.time_at_play_start = self.current_time;
        self.anchor = self.source.now();
    }

    fn schedule(&mut self) -> TickToken {
        self.next_token += 1;
        let token = TickToken(self.next_token);
        self.pending = Some(token);
        token
    }
}

impl Default for PlaybackClock<SystemTimeSource> {
    fn default() -> Self {
        Self::new(SystemTimeSource::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> (PlaybackClock<ManualTimeSource>, ManualTimeSource) {
        let source = ManualTimeSource::new();
        (PlaybackClock::new(source.clone()), source)
    }

    #[test]
    fn test_tick_follows_wall_clock() {
        let (mut clock, time) = clock();
        clock.set_current_time(2.0);
        clock.play(10.0);
        time.advance(1.5);
        assert_eq!(clock.advance(10.0), Some(3.5));
        assert!(clock.is_playing());
    }

    #[test]
    fn test_reaching_end_clamps_and_pauses() {
        let (mut clock, time) = clock();
        clock.set_current_time(8.0);
        clock.play(10.0);
        time.advance(3.0);
        assert_eq!(clock.advance(10.0), Some(10.0));
        assert_eq!(clock.current_time(), 10.0);
        assert!(!clock.is_playing());
        assert!(clock.pending_tick().is_none());
    }

    #[test]
    fn test_play_at_end_restarts() {
        let (mut clock, _) = clock();
        clock.set_current_time(10.0);
        clock.play(10.0);
        assert_eq!(clock.current_time(), 0.0);
    }

    #[test]
    fn test_pause_cancels_pending_tick() {
        let (mut clock, time) = clock();
        let token = clock.play(10.0);
        time.advance(1.0);
        clock.pause();
        clock.set_current_time(4.0);
        assert_eq!(clock.tick(token, 10.0), None);
        assert_eq!(clock.current_time(), 4.0);
    }

    #[test]
    fn test_stale_token_ignored() {
        let (mut clock, time) = clock();
        let first = clock.play(10.0);
        time.advance(0.1);
        assert!(clock.tick(first, 10.0).is_some());
        assert_eq!(clock.tick(first, 10.0), None);
    }

    #[test]
    fn test_scrub_while_playing_reanchors() {
        let (mut clock, time) = clock();
        clock.play(10.0);
        time.advance(2.0);
        clock.set_current_time(6.0);
        assert!(clock.is_playing());
        time.advance(1.0);
        assert_eq!(clock.advance(10.0), Some(7.0));
    }

    #[test]
    fn test_clamp_to_shrunk_duration() {
        let (mut clock, _) = clock();
        clock.set_current_time(9.0);
        clock.clamp_to(4.0);
        assert_eq!(clock.current_time(), 4.0);
        clock.clamp_to(6.0);
        assert_eq!(clock.current_time(), 4.0);
    }

    #[test]
    fn test_toggle() {
        let (mut clock, _) = clock();
        clock.toggle(5.0);
        assert!(clock.is_playing());
        clock.toggle(5.0);
        assert!(!clock.is_playing());
    }
}
