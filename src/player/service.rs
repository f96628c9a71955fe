//! Control loop wiring commands, sink signals, and the progress clock.
//!
//! All mutation happens inline in [`TrackPlayerService::run`], on one
//! logical control thread: user commands, sink completion signals, and
//! clock ticks are three branches of the same `select!`. There is no other
//! writer, so no locking discipline beyond the engine's shared read mirrors
//! is needed.

use std::{sync::Arc, thread};

use {
    async_channel::{Receiver, Sender, unbounded},
    parking_lot::RwLock,
    tokio::{runtime::Builder, select, time::Duration},
    tracing::{debug, error, warn},
};

use crate::{
    config::PlayerSettings,
    error::PlayerError,
    events::EventBus,
    library::{Track, TrackResolver},
    player::{
        clock::ProgressClock,
        engine::TrackPlayer,
        queue::PlaybackQueue,
        sink::{MediaSink, SinkEvent},
        types::{PlayerState, RepeatMode},
    },
};

/// Commands accepted by the player control loop.
#[derive(Debug)]
pub enum PlayerCommand {
    /// Play the given track, or resume/restart without one.
    Play(Option<Track>),
    /// Pause playback.
    Pause,
    /// Resume paused playback.
    Resume,
    /// Stop playback and release the sink.
    Stop,
    /// Advance to the next track under the current repeat mode.
    SkipNext,
    /// Advance to the previous track under the current repeat mode.
    SkipPrevious,
    /// Seek within the active track, in seconds.
    Seek(f64),
    /// Insert a track into the queue without starting playback.
    Enqueue {
        /// Track to insert.
        track: Track,
        /// Target slot; appends when `None`.
        position: Option<usize>,
    },
    /// Remove the queue slot at the given index.
    RemoveTrack(usize),
    /// Empty the queue and stop.
    ClearQueue,
    /// Replace the repeat mode.
    SetRepeatMode(RepeatMode),
    /// Stop playback and exit the control loop.
    Shutdown,
}

/// Single-threaded control loop around a [`TrackPlayer`].
pub struct TrackPlayerService {
    player: TrackPlayer,
    control_rx: Receiver<PlayerCommand>,
    sink_rx: Receiver<SinkEvent>,
    clock: ProgressClock,
}

impl TrackPlayerService {
    /// Builds a service and its command handle.
    ///
    /// `sink_rx` is the receiving end of the channel the sink backend
    /// reports its signals on (see [`crate::player::sink::signal_channel`]).
    #[must_use]
    pub fn new(
        settings: &PlayerSettings,
        sink: Box<dyn MediaSink>,
        resolver: Box<dyn TrackResolver>,
        sink_rx: Receiver<SinkEvent>,
    ) -> (Self, PlayerHandle) {
        let (control_tx, control_rx) = unbounded();
        let player = TrackPlayer::new(settings, sink, resolver);

        let handle = PlayerHandle {
            control_tx,
            state: player.shared_state(),
            queue: player.shared_queue(),
            repeat_mode: player.shared_repeat_mode(),
            events: player.events(),
        };
        let clock = ProgressClock::new(Duration::from_millis(settings.tick_interval_ms.max(1)));

        (
            Self {
                player,
                control_rx,
                sink_rx,
                clock,
            },
            handle,
        )
    }

    /// Spawns the control loop on a dedicated thread with its own
    /// current-thread runtime and returns the handle.
    #[must_use]
    pub fn start(
        settings: &PlayerSettings,
        sink: Box<dyn MediaSink>,
        resolver: Box<dyn TrackResolver>,
        sink_rx: Receiver<SinkEvent>,
    ) -> PlayerHandle {
        let (service, handle) = Self::new(settings, sink, resolver, sink_rx);

        thread::spawn(move || match Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime.block_on(service.run()),
            Err(e) => error!("failed to build player control runtime: {e}"),
        });

        handle
    }

    /// Runs the control loop until shutdown or until every command sender
    /// is dropped.
    pub async fn run(mut self) {
        let mut sink_connected = true;
        loop {
            self.clock
                .set_running(self.player.state() == PlayerState::Playing);

            select! {
                command = self.control_rx.recv() => match command {
                    Ok(PlayerCommand::Shutdown) | Err(_) => {
                        debug!("player control loop shutting down");
                        self.player.stop();
                        break;
                    }
                    Ok(command) => self.handle_command(command),
                },
                event = self.sink_rx.recv(), if sink_connected => match event {
                    Ok(event) => self.player.handle_sink_event(event),
                    Err(_) => {
                        warn!("sink signal channel closed");
                        sink_connected = false;
                    }
                },
                _ = self.clock.tick() => self.player.report_time(),
            }
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Play(track) => self.player.play(track),
            PlayerCommand::Pause => self.player.pause(),
            PlayerCommand::Resume => self.player.resume(),
            PlayerCommand::Stop => self.player.stop(),
            PlayerCommand::SkipNext => self.player.skip_next(),
            PlayerCommand::SkipPrevious => self.player.skip_previous(),
            PlayerCommand::Seek(position) => self.player.seek(position),
            PlayerCommand::Enqueue { track, position } => {
                self.player.enqueue(track, position);
            }
            PlayerCommand::RemoveTrack(index) => {
                if let Err(e) = self.player.remove_track(index) {
                    warn!("failed to remove queue slot: {e}");
                }
            }
            PlayerCommand::ClearQueue => self.player.clear_queue(),
            PlayerCommand::SetRepeatMode(mode) => self.player.set_repeat_mode(mode),
            // Handled in the run loop before dispatch.
            PlayerCommand::Shutdown => {}
        }
    }
}

/// Cloneable command and read surface for a running player.
#[derive(Clone)]
pub struct PlayerHandle {
    control_tx: Sender<PlayerCommand>,
    state: Arc<RwLock<PlayerState>>,
    queue: Arc<RwLock<PlaybackQueue>>,
    repeat_mode: Arc<RwLock<RepeatMode>>,
    events: Arc<EventBus>,
}

impl PlayerHandle {
    /// Plays `track`, or resumes/restarts with `None`.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::ControlChannelClosed` if the loop has exited.
    pub async fn play(&self, track: Option<Track>) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Play(track)).await
    }

    /// Pauses playback.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::ControlChannelClosed` if the loop has exited.
    pub async fn pause(&self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Pause).await
    }

    /// Resumes paused playback.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::ControlChannelClosed` if the loop has exited.
    pub async fn resume(&self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Resume).await
    }

    /// Stops playback.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::ControlChannelClosed` if the loop has exited.
    pub async fn stop(&self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Stop).await
    }

    /// Skips to the next track.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::ControlChannelClosed` if the loop has exited.
    pub async fn skip_next(&self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::SkipNext).await
    }

    /// Skips to the previous track.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::ControlChannelClosed` if the loop has exited.
    pub async fn skip_previous(&self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::SkipPrevious).await
    }

    /// Seeks within the active track, in seconds.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::ControlChannelClosed` if the loop has exited.
    pub async fn seek(&self, position_secs: f64) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Seek(position_secs)).await
    }

    /// Inserts a track into the queue without starting playback.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::ControlChannelClosed` if the loop has exited.
    pub async fn enqueue(&self, track: Track, position: Option<usize>) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Enqueue { track, position }).await
    }

    /// Removes the queue slot at `index`.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::ControlChannelClosed` if the loop has exited.
    pub async fn remove_track(&self, index: usize) -> Result<(), PlayerError> {
        self.send(PlayerCommand::RemoveTrack(index)).await
    }

    /// Empties the queue and stops.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::ControlChannelClosed` if the loop has exited.
    pub async fn clear_queue(&self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::ClearQueue).await
    }

    /// Replaces the repeat mode.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::ControlChannelClosed` if the loop has exited.
    pub async fn set_repeat_mode(&self, mode: RepeatMode) -> Result<(), PlayerError> {
        self.send(PlayerCommand::SetRepeatMode(mode)).await
    }

    /// Stops playback and exits the control loop.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::ControlChannelClosed` if the loop already
    /// exited.
    pub async fn shutdown(&self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Shutdown).await
    }

    /// Current playback state.
    #[must_use]
    pub fn current_state(&self) -> PlayerState {
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

    /// The event bus the player publishes on.
    #[must_use]
    pub fn events(&self) -> Arc<EventBus> {
        self.events.clone()
    }

    async fn send(&self, command: PlayerCommand) -> Result<(), PlayerError> {
        self.control_tx
            .send(command)
            .await
            .map_err(|_| PlayerError::ControlChannelClosed)
    }
}
