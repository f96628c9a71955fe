//! Track player state machine.
//!
//! `TrackPlayer` owns the playback state, the queue, and the sink adapter,
//! and is the only component that mutates any of them. All methods run on
//! one logical control thread; asynchronous sink completions re-enter
//! through [`TrackPlayer::handle_sink_event`] on that same thread.
//!
//! State/queue/repeat-mode live behind shared locks so read-only handles can
//! expose getters without routing through the control loop; the engine
//! remains the single writer.

use std::sync::Arc;

use {
    parking_lot::RwLock,
    tracing::{debug, warn},
};

use crate::{
    config::PlayerSettings,
    error::PlayerError,
    events::{EventBus, PlayerEvent},
    library::{Track, TrackResolver},
    player::{
        queue::PlaybackQueue,
        sink::{MediaSink, SinkAdapter, SinkEvent, SinkSignal},
        types::{ErrorReason, PlayerState, RepeatMode},
    },
};

/// The player core: state machine, queue, and sink orchestration.
///
/// One instance per player. Construct it directly for synchronous embedding
/// (or tests); [`crate::player::service::TrackPlayerService`] wraps it in a
/// control loop for channel-driven use.
pub struct TrackPlayer {
    state: Arc<RwLock<PlayerState>>,
    queue: Arc<RwLock<PlaybackQueue>>,
    repeat_mode: Arc<RwLock<RepeatMode>>,
    sink: SinkAdapter,
    resolver: Box<dyn TrackResolver>,
    events: Arc<EventBus>,
}

impl TrackPlayer {
    /// Creates a stopped player with an empty queue.
    #[must_use]
    pub fn new(
        settings: &PlayerSettings,
        sink: Box<dyn MediaSink>,
        resolver: Box<dyn TrackResolver>,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(PlayerState::Stopped)),
            queue: Arc::new(RwLock::new(PlaybackQueue::new())),
            repeat_mode: Arc::new(RwLock::new(settings.repeat_mode)),
            sink: SinkAdapter::new(sink),
            resolver,
            events: Arc::new(EventBus::new(settings.event_channel_capacity)),
        }
    }

    /// The event bus this player publishes on.
    #[must_use]
    pub fn events(&self) -> Arc<EventBus> {
        self.events.clone()
    }

    /// Current playback state.
    #[must_use]
    pub fn state(&self) -> PlayerState {
        *self.state.read()
    }

    /// Snapshot of the queue.
    #[must_use]
    pub fn queue(&self) -> PlaybackQueue {
        self.queue.read().clone()
    }

    /// The track under the queue cursor.
    #[must_use]
    pub fn current_track(&self) -> Option<Track> {
        self.queue.read().current().cloned()
    }

    /// Active repeat mode.
    #[must_use]
    pub fn repeat_mode(&self) -> RepeatMode {
        *self.repeat_mode.read()
    }

    /// Replaces the repeat mode; takes effect on the next cursor advance.
    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        *self.repeat_mode.write() = mode;
    }

    pub(crate) fn shared_state(&self) -> Arc<RwLock<PlayerState>> {
        self.state.clone()
    }

    pub(crate) fn shared_queue(&self) -> Arc<RwLock<PlaybackQueue>> {
        self.queue.clone()
    }

    pub(crate) fn shared_repeat_mode(&self) -> Arc<RwLock<RepeatMode>> {
        self.repeat_mode.clone()
    }

    /// Plays `track`, or with `None` resumes a paused player / restarts the
    /// queue's current track on a stopped one.
    ///
    /// A given track that is already queued (first slot matching its id)
    /// becomes current; otherwise it is inserted after the cursor and
    /// selected.
    pub fn play(&mut self, track: Option<Track>) {
        match track {
            Some(track) => {
                let target = {
                    let mut queue = self.queue.write();
                    let slot = match queue.position_of_id(&track.id) {
                        Some(slot) => slot,
                        None => {
                            let after = queue.current_index().map(|i| i + 1);
                            queue.insert(track, after)
                        }
                    };
                    queue.select(slot);
                    queue.current().cloned()
                };
                if let Some(track) = target {
                    self.start_track(&track);
                }
            }
            None => match self.state() {
                PlayerState::Paused => self.resume(),
                PlayerState::Stopped => {
                    if let Some(track) = self.current_track() {
                        self.start_track(&track);
                    }
                }
                _ => {}
            },
        }
    }

    /// Pauses playback. Legal from `Playing` and `Buffering`; a no-op
    /// elsewhere (and emits nothing).
    pub fn pause(&mut self) {
        match self.state() {
            PlayerState::Playing => {
                self.sink.pause();
                self.set_state(PlayerState::Paused);
            }
            // The sink is not audible yet; readiness is handled later
            // without starting playback.
            PlayerState::Buffering => self.set_state(PlayerState::Paused),
            _ => {}
        }
    }

    /// Resumes a paused player. A no-op from any other state.
    pub fn resume(&mut self) {
        if self.state() != PlayerState::Paused {
            return;
        }
        if self.sink.is_ready() {
            self.sink.play();
            self.set_state(PlayerState::Playing);
        } else if self.sink.is_loaded() {
            self.set_state(PlayerState::Buffering);
        } else {
            // Paused without a resource: nothing to resume.
            self.set_state(PlayerState::Stopped);
        }
    }

    /// Releases the sink and stops. Legal from any state; the queue and
    /// cursor survive.
    pub fn stop(&mut self) {
        self.sink.release();
        self.set_state(PlayerState::Stopped);
    }

    /// Seeks within the active track; queued until the sink is ready.
    pub fn seek(&mut self, position_secs: f64) {
        self.sink.seek(position_secs);
    }

    /// Advances to the next track under the current repeat mode.
    pub fn skip_next(&mut self) {
        self.advance(true);
    }

    /// Advances to the previous track under the current repeat mode.
    pub fn skip_previous(&mut self) {
        self.advance(false);
    }

    /// Applies a sink completion signal. Signals stamped with a superseded
    /// generation token are discarded.
    pub fn handle_sink_event(&mut self, event: SinkEvent) {
        if !self.sink.accepts(event.token) {
            debug!(token = ?event.token, "discarding stale sink signal");
            return;
        }
        match event.signal {
            SinkSignal::Ready => {
                self.sink.mark_ready();
                // If the user paused while buffering, stay paused; the sink
                // is ready for a later resume.
                if self.state() == PlayerState::Buffering {
                    self.sink.play();
                    self.set_state(PlayerState::Playing);
                }
            }
            SinkSignal::Ended => self.advance(true),
            SinkSignal::Error(reason) => {
                warn!(?reason, "sink reported playback failure");
                self.sink.release();
                self.events.emit(PlayerEvent::Error(reason));
                self.set_state(PlayerState::Stopped);
            }
        }
    }

    /// Emits a progress sample. Only the `Playing` state produces events;
    /// this never mutates playback state.
    pub fn report_time(&self) {
        if self.state() != PlayerState::Playing {
            return;
        }
        self.events
            .emit(PlayerEvent::TimeUpdated(self.sink.current_time()));
    }

    /// Inserts `track` into the queue and returns its slot. Does not start
    /// playback.
    pub fn enqueue(&mut self, track: Track, position: Option<usize>) -> usize {
        self.queue.write().insert(track, position)
    }

    /// Removes the queue slot at `index`.
    ///
    /// Removing the playing slot hands playback to the re-resolved current
    /// track, or stops the player when the queue becomes empty — queue
    /// emptiness and the `Stopped` state never drift apart.
    pub fn remove_track(&mut self, index: usize) -> Result<Track, PlayerError> {
        let (removed, was_current, replacement) = {
            let mut queue = self.queue.write();
            let was_current = queue.current_index() == Some(index);
            let removed = queue
                .remove(index)
                .ok_or(PlayerError::InvalidQueueIndex { index })?;
            (removed, was_current, queue.current().cloned())
        };

        if was_current {
            match replacement {
                Some(track) if self.state() != PlayerState::Stopped => self.start_track(&track),
                Some(_) => {}
                None => {
                    self.sink.release();
                    self.set_state(PlayerState::Stopped);
                }
            }
        }
        Ok(removed)
    }

    /// Empties the queue and stops playback.
    pub fn clear_queue(&mut self) {
        self.queue.write().clear();
        self.sink.release();
        self.set_state(PlayerState::Stopped);
    }

    /// Loads and starts `track`: `Buffering` now, `Playing` once the sink
    /// signals ready. Resolution failure emits one `Error(EmptyResource)`
    /// and returns the player to `Stopped` instead of leaving it buffering.
    fn start_track(&mut self, track: &Track) {
        self.set_state(PlayerState::Buffering);
        match self.resolver.resolve(track) {
            Some(source) if !source.is_empty() => {
                let token = self.sink.load(&source);
                debug!(track = %track.id, ?token, "loading track into sink");
            }
            _ => {
                warn!(track = %track.id, "no playable source resolved");
                self.sink.release();
                self.events
                    .emit(PlayerEvent::Error(ErrorReason::EmptyResource));
                self.set_state(PlayerState::Stopped);
            }
        }
    }

    /// Moves the cursor under the active repeat mode and plays the result.
    /// A non-wrapping mode running off the end releases the sink, stops,
    /// and announces `PlayEnd`. An empty queue is a no-op.
    fn advance(&mut self, forward: bool) {
        if self.queue.read().is_empty() {
            return;
        }
        let mode = self.repeat_mode();
        let next = {
            let mut queue = self.queue.write();
            if forward {
                queue.next(mode)
            } else {
                queue.previous(mode)
            }
        };
        match next {
            Some(track) => self.start_track(&track),
            None => {
                debug!("queue exhausted without wrapping");
                self.sink.release();
                self.set_state(PlayerState::Stopped);
                self.events.emit(PlayerEvent::PlayEnd);
            }
        }
    }

    /// Records a transition and emits `StateChanged` exactly once. Setting
    /// the state it already holds emits nothing.
    fn set_state(&mut self, next: PlayerState) {
        let changed = {
            let mut state = self.state.write();
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        };
        if changed {
            debug!(state = ?next, "player state changed");
            self.events.emit(PlayerEvent::StateChanged(next));
        }
    }
}
