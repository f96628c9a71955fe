//! Core playback types: player state, repeat modes, progress, and failure
//! reasons.

use serde::{Deserialize, Serialize};

/// Current playback state of the player.
///
/// Exactly one value holds at any instant. `Stopped` is both the initial and
/// the terminal state: no resource is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    /// No resource is loaded.
    #[default]
    Stopped,
    /// A track is audible and progressing.
    Playing,
    /// Playback is suspended; the resource stays loaded.
    Paused,
    /// A track is loading and not yet ready to play.
    Buffering,
}

/// Queue advance policy, consulted only when moving the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatMode {
    /// Play the queue in order and stop after the last track.
    Sequential,
    /// Pick a pseudo-random track, never immediately repeating the current
    /// one on a forward advance.
    Shuffle,
    /// Advance in order, wrapping at both ends.
    #[default]
    QueueRepeat,
    /// Repeat the current track.
    Loop,
}

/// Playback progress of the active track, in seconds.
///
/// `duration` is `0.0` until the sink has resolved the track's metadata;
/// once it is known, `position` never exceeds it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentTime {
    /// Elapsed playback position.
    pub position: f64,
    /// Total track duration, `0.0` while unknown.
    pub duration: f64,
}

/// Enumerated cause of a playback failure.
///
/// Carried in events, never panicked: playback failures are non-fatal and
/// the player deterministically returns to `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorReason {
    /// No playable source could be resolved for the track.
    EmptyResource,
    /// The sink failed while loading or playing (decode, network, stall).
    SinkFailure,
}
