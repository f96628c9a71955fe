//! Play queue with cursor tracking and repeat-mode advance rules.
//!
//! The queue owns its tracks. The cursor is either a valid index or `None`,
//! and `None` only when the queue is empty; every mutation re-establishes
//! that invariant before returning.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{library::Track, player::types::RepeatMode};

/// Ordered sequence of tracks plus the cursor for the current one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaybackQueue {
    tracks: Vec<Track>,
    current_index: Option<usize>,
}

impl PlaybackQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued tracks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the queue holds no tracks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// The queued tracks in order.
    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Cursor position, `None` iff the queue is empty.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// The track under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.tracks.get(i))
    }

    /// First slot holding a track with `id`, if any.
    #[must_use]
    pub fn position_of_id(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Inserts `track` at `position` (clamped; appends when `None`) and
    /// returns the slot it landed in.
    ///
    /// Inserting at or before the cursor shifts the cursor so it keeps
    /// pointing at the same track; inserting into an empty queue makes the
    /// new track current.
    pub fn insert(&mut self, track: Track, position: Option<usize>) -> usize {
        let at = position.unwrap_or(self.tracks.len()).min(self.tracks.len());
        self.tracks.insert(at, track);

        self.current_index = match self.current_index {
            None => Some(at),
            Some(cur) if at <= cur => Some(cur + 1),
            same => same,
        };

        at
    }

    /// Removes the track at `index`, returning it.
    ///
    /// Removing the cursor slot re-resolves the cursor to the element that
    /// was immediately after it, wrapping to the front if the last slot was
    /// removed, or to `None` when the queue becomes empty.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() {
            return None;
        }
        let removed = self.tracks.remove(index);

        self.current_index = match self.current_index {
            None => None,
            Some(cur) if index < cur => Some(cur - 1),
            Some(cur) if index == cur => {
                if self.tracks.is_empty() {
                    None
                } else if cur < self.tracks.len() {
                    Some(cur)
                } else {
                    Some(0)
                }
            }
            same => same,
        };

        Some(removed)
    }

    /// Removes every track and clears the cursor.
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current_index = None;
    }

    /// Moves the cursor to `index`. Returns `false` when out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.current_index = Some(index);
            true
        } else {
            false
        }
    }

    /// Advances the cursor forward under `mode` and returns the new current
    /// track, or `None` when the queue is empty or a non-wrapping mode ran
    /// off the end (the cursor then stays put).
    pub fn next(&mut self, mode: RepeatMode) -> Option<Track> {
        self.step(mode, true)
    }

    /// Advances the cursor backward under `mode`; see [`Self::next`].
    pub fn previous(&mut self, mode: RepeatMode) -> Option<Track> {
        self.step(mode, false)
    }

    fn step(&mut self, mode: RepeatMode, forward: bool) -> Option<Track> {
        if self.tracks.is_empty() {
            return None;
        }
        let len = self.tracks.len();
        let Some(cur) = self.current_index else {
            // Transient cursor loss on a non-empty queue: restart at the front.
            self.current_index = Some(0);
            return self.current().cloned();
        };

        let target = match mode {
            RepeatMode::Loop => Some(cur),
            RepeatMode::QueueRepeat => Some(if forward {
                (cur + 1) % len
            } else {
                (cur + len - 1) % len
            }),
            RepeatMode::Sequential => {
                if forward {
                    (cur + 1 < len).then(|| cur + 1)
                } else {
                    cur.checked_sub(1)
                }
            }
            RepeatMode::Shuffle => Some(self.shuffle_draw(cur, forward)),
        };

        let target = target?;
        self.current_index = Some(target);
        self.tracks.get(target).cloned()
    }

    /// Draws a random slot. Forward draws never repeat the current slot when
    /// two or more tracks are queued; backward draws may land anywhere.
    fn shuffle_draw(&self, cur: usize, forward: bool) -> usize {
        let len = self.tracks.len();
        if len == 1 {
            return cur;
        }
        let mut rng = rand::rng();
        if !forward {
            return rng.random_range(0..len);
        }
        loop {
            let candidate = rng.random_range(0..len);
            if candidate != cur {
                return candidate;
            }
        }
    }
}
