//! Domain error types using `thiserror`.
//!
//! Playback failures are not errors in this sense: they are reported through
//! the event bus as `PlayerEvent::Error` payloads and leave the player in a
//! consistent `Stopped` state. `PlayerError` covers misuse of the crate's
//! direct API surface.

use thiserror::Error;

/// Errors returned by the player's command surface.
#[derive(Error, Debug)]
pub enum PlayerError {
    /// A queue operation referenced a slot that does not exist.
    #[error("queue index {index} is out of range")]
    InvalidQueueIndex { index: usize },
    /// The player control loop has shut down and no longer accepts commands.
    #[error("player control channel closed")]
    ControlChannelClosed,
}

#[cfg(test)]
mod tests {
    use crate::error::domain::PlayerError;

    #[test]
    fn test_player_error_display() {
        let index_error = PlayerError::InvalidQueueIndex { index: 7 };
        assert_eq!(index_error.to_string(), "queue index 7 is out of range");

        assert_eq!(
            PlayerError::ControlChannelClosed.to_string(),
            "player control channel closed"
        );
    }
}
