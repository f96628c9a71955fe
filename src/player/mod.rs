//! Playback core: state machine, queue, sink adapter, and control loop.

pub mod clock;
pub mod engine;
pub mod queue;
pub mod service;
pub mod sink;
pub mod types;

#[cfg(test)]
mod queue_tests;

pub use {
    engine::TrackPlayer,
    queue::PlaybackQueue,
    service::{PlayerCommand, PlayerHandle, TrackPlayerService},
    sink::{Generation, MediaSink, SinkEvent, SinkSignal, signal_channel},
    types::{CurrentTime, ErrorReason, PlayerState, RepeatMode},
};
