//! Typed publish/subscribe fan-out for player events.
//!
//! Each event tag carries its own payload type and its own subscriber list,
//! so listeners can subscribe to exactly the events they care about. A
//! combined broadcast feed is also available for listeners that want the
//! whole stream as one sum type.
//!
//! Delivery for a single emission follows subscription order; emissions from
//! the single control thread are never reordered or batched. Receivers that
//! have been dropped are pruned on the next emission.

use {
    async_channel::{Receiver, Sender, unbounded},
    parking_lot::Mutex,
    tokio::sync::broadcast,
};

use crate::player::types::{CurrentTime, ErrorReason, PlayerState};

/// Observable player event, one variant per tag with its payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerEvent {
    /// Playback failed; the player has returned to `Stopped`.
    Error(ErrorReason),
    /// The player entered a new state. Emitted exactly once per transition;
    /// idempotent no-op commands emit nothing.
    StateChanged(PlayerState),
    /// Playback progress sampled by the clock, only while `Playing`.
    TimeUpdated(CurrentTime),
    /// The queue was exhausted without wrapping.
    PlayEnd,
}

/// Typed fan-out channel decoupling the player core from its listeners.
pub struct EventBus {
    /// Subscribers for playback failures.
    error_subscribers: Mutex<Vec<Sender<ErrorReason>>>,
    /// Subscribers for state transitions.
    state_subscribers: Mutex<Vec<Sender<PlayerState>>>,
    /// Subscribers for progress updates.
    time_subscribers: Mutex<Vec<Sender<CurrentTime>>>,
    /// Subscribers for queue exhaustion.
    play_end_subscribers: Mutex<Vec<Sender<()>>>,
    /// Combined feed of every event.
    event_tx: broadcast::Sender<PlayerEvent>,
}

impl EventBus {
    /// Creates a bus whose combined feed buffers up to `capacity` events per
    /// lagging subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(capacity.max(1));

        Self {
            error_subscribers: Mutex::new(Vec::new()),
            state_subscribers: Mutex::new(Vec::new()),
            time_subscribers: Mutex::new(Vec::new()),
            play_end_subscribers: Mutex::new(Vec::new()),
            event_tx,
        }
    }

    /// Subscribes to the combined event feed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_tx.subscribe()
    }

    /// Subscribes to playback failures.
    #[must_use]
    pub fn subscribe_errors(&self) -> Receiver<ErrorReason> {
        Self::register(&self.error_subscribers)
    }

    /// Subscribes to state transitions.
    #[must_use]
    pub fn subscribe_state_changes(&self) -> Receiver<PlayerState> {
        Self::register(&self.state_subscribers)
    }

    /// Subscribes to progress updates.
    #[must_use]
    pub fn subscribe_time_updates(&self) -> Receiver<CurrentTime> {
        Self::register(&self.time_subscribers)
    }

    /// Subscribes to queue-exhaustion notifications.
    #[must_use]
    pub fn subscribe_play_end(&self) -> Receiver<()> {
        Self::register(&self.play_end_subscribers)
    }

    /// Publishes `event` to the matching tag subscribers and the combined
    /// feed. Dropping a receiver merely unsubscribes it.
    pub fn emit(&self, event: PlayerEvent) {
        match event {
            PlayerEvent::Error(reason) => Self::fan_out(&self.error_subscribers, reason),
            PlayerEvent::StateChanged(state) => Self::fan_out(&self.state_subscribers, state),
            PlayerEvent::TimeUpdated(time) => Self::fan_out(&self.time_subscribers, time),
            PlayerEvent::PlayEnd => Self::fan_out(&self.play_end_subscribers, ()),
        }

        // No combined-feed subscribers is the common case for embedders that
        // only use per-tag channels.
        let _ = self.event_tx.send(event);
    }

    fn register<T>(subscribers: &Mutex<Vec<Sender<T>>>) -> Receiver<T> {
        let (tx, rx) = unbounded();
        subscribers.lock().push(tx);
        rx
    }

    fn fan_out<T: Clone>(subscribers: &Mutex<Vec<Sender<T>>>, payload: T) {
        // Channels are unbounded, so try_send only fails for closed
        // receivers; those are pruned here.
        subscribers
            .lock()
            .retain(|tx| tx.try_send(payload.clone()).is_ok());
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(16)
    }
}
