//! Cadenza is a track player core for embedding in media applications.
//!
//! It owns the playback state machine, the play queue with its repeat
//! modes, and the cancellation discipline around an application-provided
//! media sink. Playback progress and state transitions are published on a
//! typed event bus; the crate never touches audio hardware itself.
//!
//! The usual entry point is [`player::TrackPlayerService::start`], which
//! runs the player on its own control thread and hands back a cloneable
//! [`player::PlayerHandle`]. Applications that already have a single-
//! threaded driver can embed [`player::TrackPlayer`] directly instead.

pub mod config;
pub mod error;
pub mod events;
pub mod library;
pub mod player;

pub use {
    config::{PlayerSettings, SettingsManager},
    error::PlayerError,
    events::{EventBus, PlayerEvent},
    library::{DirectResolver, Track, TrackResolver},
    player::{
        CurrentTime, ErrorReason, MediaSink, PlayerHandle, PlayerState, RepeatMode, TrackPlayer,
        TrackPlayerService, signal_channel,
    },
};
