//! Track identity and source descriptors.
//!
//! A `Track` identifies one playable item. It is created by the embedding
//! application when enqueued, never mutated in place, and destroyed only by
//! explicit removal from the queue. Duplicate tracks are allowed in a queue
//! and are treated as distinct slots.

use serde::{Deserialize, Serialize};

/// A playable item queued by the embedding application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Stable identifier, unique within its source platform.
    pub id: String,
    /// Source platform that owns this track (e.g. a plugin or backend name).
    pub platform: String,
    /// Display title.
    pub title: String,
    /// Resolvable source descriptor. `None` means nothing playable is known
    /// yet; a resolver may still produce a loadable source from the id.
    pub source: Option<String>,
}

impl Track {
    /// Creates a track without a source descriptor.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        platform: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            platform: platform.into(),
            title: title.into(),
            source: None,
        }
    }

    /// Attaches a source descriptor.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{from_str, to_string};

    use crate::library::models::Track;

    #[test]
    fn test_track_builder() {
        let track = Track::new("t-1", "local", "First").with_source("file:///a.flac");
        assert_eq!(track.id, "t-1");
        assert_eq!(track.platform, "local");
        assert_eq!(track.source.as_deref(), Some("file:///a.flac"));
    }

    #[test]
    fn test_track_serialization() {
        let track = Track::new("t-2", "stream", "Second").with_source("https://cdn/a");
        let serialized = to_string(&track).unwrap();
        let deserialized: Track = from_str(&serialized).unwrap();
        assert_eq!(track, deserialized);
    }
}
