//! Track resolution capability.
//!
//! Resolution turns a queued track's source descriptor into something the
//! media sink can actually load. The real implementation lives in the
//! embedding application's plugin/source layer; the player core only depends
//! on this trait.

use crate::library::models::Track;

/// Turns a track's source descriptor into a sink-loadable source string.
pub trait TrackResolver: Send {
    /// Resolves `track` into a loadable source.
    ///
    /// Returning `None` (or an empty string) marks the track unresolvable;
    /// the player reports this as an empty-resource playback error.
    fn resolve(&self, track: &Track) -> Option<String>;
}

/// Resolver for tracks whose descriptor is already loadable as-is
/// (local paths, direct URLs).
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectResolver;

impl TrackResolver for DirectResolver {
    fn resolve(&self, track: &Track) -> Option<String> {
        track.source.clone()
    }
}

#[cfg(test)]
mod tests {
    use crate::library::{
        models::Track,
        resolver::{DirectResolver, TrackResolver},
    };

    #[test]
    fn test_direct_resolver_passes_source_through() {
        let track = Track::new("t-1", "local", "First").with_source("file:///a.flac");
        assert_eq!(
            DirectResolver.resolve(&track).as_deref(),
            Some("file:///a.flac")
        );
    }

    #[test]
    fn test_direct_resolver_without_source() {
        let track = Track::new("t-2", "local", "Second");
        assert!(DirectResolver.resolve(&track).is_none());
    }
}
