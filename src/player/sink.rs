//! Media sink capability and the adapter that owns the active resource.
//!
//! The sink is whatever backend actually decodes and plays audio; it is
//! opaque to this crate. A backend receives commands through [`MediaSink`]
//! and reports completions by sending [`SinkEvent`]s into the channel the
//! embedding application wires to the player's control loop.
//!
//! [`SinkAdapter`] wraps exactly one active resource at a time and stamps
//! every `load` with a fresh [`Generation`] token. Signals carrying a stale
//! token are rejected, so a superseded load can never resurrect old state.

use async_channel::{Receiver, Sender, unbounded};
use tracing::debug;

use crate::player::types::{CurrentTime, ErrorReason};

/// Token identifying one `load` call.
///
/// Tokens are issued monotonically; a backend must echo the token it was
/// given on every signal for that resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Playback primitive implemented by a platform media backend.
///
/// Commands are fire-and-forget; outcomes come back as [`SinkEvent`]s on the
/// signal channel, delivered onto the player's control thread. The backend's
/// own I/O may be asynchronous, but it must never call back concurrently.
pub trait MediaSink: Send {
    /// Begins loading `source`, releasing any prior resource. The backend
    /// reports `Ready`, or `Error`, tagged with `token`.
    fn load(&mut self, source: &str, token: Generation);

    /// Starts or resumes audible playback of the loaded resource.
    fn play(&mut self);

    /// Pauses audible playback without releasing the resource.
    fn pause(&mut self);

    /// Jumps to `position_secs`. Only called once the resource is ready.
    fn seek(&mut self, position_secs: f64);

    /// Stops playback and releases the resource.
    fn stop(&mut self);

    /// Current playback position in seconds.
    fn position_secs(&self) -> f64;

    /// Track duration in seconds, `0.0` while unknown.
    fn duration_secs(&self) -> f64;
}

/// Terminal and readiness signals a backend reports upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkSignal {
    /// The resource is ready to play.
    Ready,
    /// Natural end of the resource.
    Ended,
    /// Loading or playback failed.
    Error(ErrorReason),
}

/// A [`SinkSignal`] stamped with the generation of the load it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkEvent {
    /// Token of the `load` this signal answers.
    pub token: Generation,
    /// The signal itself.
    pub signal: SinkSignal,
}

/// Creates the channel a sink backend uses to report signals.
#[must_use]
pub fn signal_channel() -> (Sender<SinkEvent>, Receiver<SinkEvent>) {
    unbounded()
}

/// Owns the one active playable resource and the cancellation discipline
/// around it.
pub struct SinkAdapter {
    sink: Box<dyn MediaSink>,
    generation: u64,
    loaded: bool,
    ready: bool,
    pending_seek: Option<f64>,
}

impl SinkAdapter {
    /// Wraps `sink` with no resource loaded.
    #[must_use]
    pub fn new(sink: Box<dyn MediaSink>) -> Self {
        Self {
            sink,
            generation: 0,
            loaded: false,
            ready: false,
            pending_seek: None,
        }
    }

    /// Loads `source`, releasing any prior resource first, and returns the
    /// token stamped on the new load. Any in-flight signal for an earlier
    /// load is invalidated.
    pub fn load(&mut self, source: &str) -> Generation {
        if self.loaded {
            self.sink.stop();
        }
        self.generation += 1;
        self.loaded = true;
        self.ready = false;
        self.pending_seek = None;

        let token = Generation(self.generation);
        self.sink.load(source, token);
        token
    }

    /// Stops and releases the active resource, invalidating in-flight
    /// signals. Safe to call with nothing loaded.
    pub fn release(&mut self) {
        if self.loaded {
            self.sink.stop();
        }
        self.generation += 1;
        self.loaded = false;
        self.ready = false;
        self.pending_seek = None;
    }

    /// Whether a signal stamped with `token` belongs to the current load.
    #[must_use]
    pub fn accepts(&self, token: Generation) -> bool {
        self.loaded && token.0 == self.generation
    }

    /// Marks the current load ready and applies the pending seek, if one was
    /// queued while loading.
    pub fn mark_ready(&mut self) {
        self.ready = true;
        if let Some(position) = self.pending_seek.take() {
            debug!(position, "applying pending seek");
            self.sink.seek(position);
        }
    }

    /// Whether the current load has signalled ready.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether a resource is held (ready or still loading).
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Starts audible playback. No-op until the resource is ready.
    pub fn play(&mut self) {
        if self.ready {
            self.sink.play();
        }
    }

    /// Pauses audible playback. No-op with nothing loaded.
    pub fn pause(&mut self) {
        if self.loaded {
            self.sink.pause();
        }
    }

    /// Seeks to `position_secs` once possible: immediately when ready,
    /// otherwise queued (at most one; later requests overwrite earlier ones)
    /// and applied on ready.
    pub fn seek(&mut self, position_secs: f64) {
        let position = position_secs.max(0.0);
        if self.ready {
            self.sink.seek(position);
        } else if self.loaded {
            self.pending_seek = Some(position);
        }
    }

    /// Samples playback progress. Position is clamped to the duration once
    /// the duration is known.
    #[must_use]
    pub fn current_time(&self) -> CurrentTime {
        if !self.loaded {
            return CurrentTime::default();
        }
        let duration = self.sink.duration_secs().max(0.0);
        let mut position = self.sink.position_secs().max(0.0);
        if duration > 0.0 {
            position = position.min(duration);
        }
        CurrentTime { position, duration }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::player::sink::{Generation, MediaSink, SinkAdapter};

    #[derive(Default)]
    struct Recorded {
        calls: Vec<String>,
        last_token: Option<Generation>,
        position: f64,
        duration: f64,
    }

    struct RecordingSink {
        recorded: Arc<Mutex<Recorded>>,
    }

    impl MediaSink for RecordingSink {
        fn load(&mut self, source: &str, token: Generation) {
            let mut recorded = self.recorded.lock();
            recorded.calls.push(format!("load:{source}"));
            recorded.last_token = Some(token);
        }
        fn play(&mut self) {
            self.recorded.lock().calls.push("play".into());
        }
        fn pause(&mut self) {
            self.recorded.lock().calls.push("pause".into());
        }
        fn seek(&mut self, position_secs: f64) {
            self.recorded
                .lock()
                .calls
                .push(format!("seek:{position_secs}"));
        }
        fn stop(&mut self) {
            self.recorded.lock().calls.push("stop".into());
        }
        fn position_secs(&self) -> f64 {
            self.recorded.lock().position
        }
        fn duration_secs(&self) -> f64 {
            self.recorded.lock().duration
        }
    }

    fn adapter() -> (SinkAdapter, Arc<Mutex<Recorded>>) {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let sink = RecordingSink {
            recorded: recorded.clone(),
        };
        (SinkAdapter::new(Box::new(sink)), recorded)
    }

    #[test]
    fn test_load_releases_prior_resource() {
        let (mut adapter, recorded) = adapter();
        adapter.load("a");
        adapter.load("b");
        assert_eq!(
            recorded.lock().calls,
            vec!["load:a", "stop", "load:b"],
            "second load must stop the first resource before acquiring"
        );
    }

    #[test]
    fn test_stale_token_is_rejected() {
        let (mut adapter, _) = adapter();
        let first = adapter.load("a");
        let second = adapter.load("b");
        assert!(!adapter.accepts(first));
        assert!(adapter.accepts(second));
    }

    #[test]
    fn test_release_invalidates_current_token() {
        let (mut adapter, _) = adapter();
        let token = adapter.load("a");
        adapter.release();
        assert!(!adapter.accepts(token));
        assert!(!adapter.is_loaded());
    }

    #[test]
    fn test_pending_seek_applied_once_on_ready() {
        let (mut adapter, recorded) = adapter();
        adapter.load("a");
        adapter.seek(10.0);
        adapter.seek(42.0);
        assert!(!recorded.lock().calls.iter().any(|c| c.starts_with("seek")));

        adapter.mark_ready();
        let calls = recorded.lock().calls.clone();
        assert_eq!(calls.iter().filter(|c| c.starts_with("seek")).count(), 1);
        assert!(calls.contains(&"seek:42".to_string()));
    }

    #[test]
    fn test_seek_is_direct_once_ready() {
        let (mut adapter, recorded) = adapter();
        adapter.load("a");
        adapter.mark_ready();
        adapter.seek(5.0);
        assert!(recorded.lock().calls.contains(&"seek:5".to_string()));
    }

    #[test]
    fn test_play_is_noop_until_ready() {
        let (mut adapter, recorded) = adapter();
        adapter.load("a");
        adapter.play();
        assert!(!recorded.lock().calls.contains(&"play".to_string()));
        adapter.mark_ready();
        adapter.play();
        assert!(recorded.lock().calls.contains(&"play".to_string()));
    }

    #[test]
    fn test_current_time_clamps_to_known_duration() {
        let (mut adapter, recorded) = adapter();
        adapter.load("a");
        {
            let mut r = recorded.lock();
            r.position = 12.5;
            r.duration = 10.0;
        }
        let time = adapter.current_time();
        assert_eq!(time.position, 10.0);
        assert_eq!(time.duration, 10.0);
    }

    #[test]
    fn test_current_time_with_unknown_duration() {
        let (mut adapter, recorded) = adapter();
        adapter.load("a");
        recorded.lock().position = 3.0;
        let time = adapter.current_time();
        assert_eq!(time.position, 3.0);
        assert_eq!(time.duration, 0.0);
    }
}
