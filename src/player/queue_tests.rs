//! Tests for queue cursor maintenance and repeat-mode advance rules.

#[cfg(test)]
mod tests {
    use crate::{
        library::Track,
        player::{queue::PlaybackQueue, types::RepeatMode},
    };

    fn track(id: &str) -> Track {
        Track::new(id, "local", id).with_source(format!("file:///{id}.flac"))
    }

    fn queue_of(ids: &[&str]) -> PlaybackQueue {
        let mut queue = PlaybackQueue::new();
        for id in ids {
            queue.insert(track(id), None);
        }
        queue
    }

    #[test]
    fn test_empty_queue_has_no_current() {
        let mut queue = PlaybackQueue::new();
        assert!(queue.is_empty());
        assert!(queue.current().is_none());
        assert!(queue.next(RepeatMode::QueueRepeat).is_none());
        assert!(queue.previous(RepeatMode::Loop).is_none());
    }

    #[test]
    fn test_insert_into_empty_queue_sets_cursor() {
        let mut queue = PlaybackQueue::new();
        queue.insert(track("a"), None);
        assert_eq!(queue.current_index(), Some(0));
        assert_eq!(queue.current().unwrap().id, "a");
    }

    #[test]
    fn test_insert_before_cursor_shifts_it() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.select(1);
        queue.insert(track("x"), Some(0));
        assert_eq!(queue.current_index(), Some(2));
        assert_eq!(queue.current().unwrap().id, "b");
    }

    #[test]
    fn test_insert_after_cursor_leaves_it() {
        let mut queue = queue_of(&["a", "b"]);
        queue.select(0);
        queue.insert(track("x"), Some(1));
        assert_eq!(queue.current_index(), Some(0));
        assert_eq!(queue.tracks()[1].id, "x");
    }

    #[test]
    fn test_insert_position_is_clamped() {
        let mut queue = queue_of(&["a"]);
        let at = queue.insert(track("b"), Some(99));
        assert_eq!(at, 1);
    }

    #[test]
    fn test_duplicate_tracks_are_distinct_slots() {
        let mut queue = PlaybackQueue::new();
        queue.insert(track("a"), None);
        queue.insert(track("a"), None);
        assert_eq!(queue.len(), 2);
        queue.select(1);
        queue.remove(1);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn test_remove_before_cursor_shifts_it_down() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.select(2);
        queue.remove(0);
        assert_eq!(queue.current_index(), Some(1));
        assert_eq!(queue.current().unwrap().id, "c");
    }

    #[test]
    fn test_remove_cursor_slot_moves_to_following_track() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.select(1);
        let removed = queue.remove(1).unwrap();
        assert_eq!(removed.id, "b");
        assert_eq!(queue.current().unwrap().id, "c");
    }

    #[test]
    fn test_remove_cursor_at_tail_wraps_to_front() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.select(2);
        queue.remove(2);
        assert_eq!(queue.current().unwrap().id, "a");
    }

    #[test]
    fn test_remove_only_track_clears_cursor() {
        let mut queue = queue_of(&["a"]);
        queue.remove(0);
        assert!(queue.is_empty());
        assert!(queue.current_index().is_none());
        assert!(queue.current().is_none());
    }

    #[test]
    fn test_remove_out_of_range_is_none() {
        let mut queue = queue_of(&["a"]);
        assert!(queue.remove(5).is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_queue_repeat_wraps_both_ends() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.select(1);
        assert_eq!(queue.next(RepeatMode::QueueRepeat).unwrap().id, "c");
        assert_eq!(queue.next(RepeatMode::QueueRepeat).unwrap().id, "a");
        assert_eq!(queue.previous(RepeatMode::QueueRepeat).unwrap().id, "c");
    }

    #[test]
    fn test_queue_repeat_single_track_behaves_like_loop() {
        let mut queue = queue_of(&["a"]);
        assert_eq!(queue.next(RepeatMode::QueueRepeat).unwrap().id, "a");
        assert_eq!(queue.previous(RepeatMode::QueueRepeat).unwrap().id, "a");
    }

    #[test]
    fn test_loop_returns_current_without_moving() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.select(1);
        assert_eq!(queue.next(RepeatMode::Loop).unwrap().id, "b");
        assert_eq!(queue.previous(RepeatMode::Loop).unwrap().id, "b");
        assert_eq!(queue.current_index(), Some(1));
    }

    #[test]
    fn test_sequential_stops_at_both_ends() {
        let mut queue = queue_of(&["a", "b"]);
        queue.select(1);
        assert!(queue.next(RepeatMode::Sequential).is_none());
        // Cursor stays on the last track after exhaustion.
        assert_eq!(queue.current().unwrap().id, "b");

        queue.select(0);
        assert!(queue.previous(RepeatMode::Sequential).is_none());
        assert_eq!(queue.current().unwrap().id, "a");
    }

    #[test]
    fn test_sequential_advances_in_order() {
        let mut queue = queue_of(&["a", "b", "c"]);
        assert_eq!(queue.next(RepeatMode::Sequential).unwrap().id, "b");
        assert_eq!(queue.next(RepeatMode::Sequential).unwrap().id, "c");
        assert_eq!(queue.previous(RepeatMode::Sequential).unwrap().id, "b");
    }

    #[test]
    fn test_shuffle_never_repeats_current_on_next() {
        let mut queue = queue_of(&["a", "b", "c", "d"]);
        for _ in 0..200 {
            let before = queue.current().unwrap().id.clone();
            let after = queue.next(RepeatMode::Shuffle).unwrap();
            assert_ne!(before, after.id);
        }
    }

    #[test]
    fn test_shuffle_single_track_returns_it() {
        let mut queue = queue_of(&["a"]);
        assert_eq!(queue.next(RepeatMode::Shuffle).unwrap().id, "a");
    }

    #[test]
    fn test_shuffle_previous_returns_valid_member() {
        let mut queue = queue_of(&["a", "b", "c"]);
        for _ in 0..50 {
            let track = queue.previous(RepeatMode::Shuffle).unwrap();
            assert!(queue.position_of_id(&track.id).is_some());
            let cursor = queue.current_index().unwrap();
            assert!(cursor < queue.len());
        }
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut queue = queue_of(&["a", "b"]);
        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.current_index().is_none());
    }

    #[test]
    fn test_select_out_of_range_is_rejected() {
        let mut queue = queue_of(&["a"]);
        assert!(!queue.select(3));
        assert_eq!(queue.current_index(), Some(0));
    }
}
