//! Playback queue
//!
//! An ordered list of tracks plus the bookkeeping needed to undo a shuffle.
//! The queue does not store a cursor: the current position is found by
//! matching the current track id against `items`, first match wins, so the
//! same track may be enqueued more than once.
//!
//! ```text
//! items:          [C, A, E, B, D]   <- playback order (shuffled)
//! original_order: [A, B, C, D, E]   <- restored by unshuffle()
//! current:        B (index 3 in items)
//! ```

use crate::shuffle::shuffle_pinned;
use crate::types::Direction;
use rand::Rng;
use wavedeck_core::{RepeatMode, Track};

/// Ordered track list with shuffle bookkeeping
#[derive(Debug, Clone, Default)]
pub struct Queue {
    /// Tracks in playback order
    items: Vec<Track>,

    /// Order captured when shuffle was turned on (empty while unshuffled)
    original_order: Vec<Track>,

    /// Whether `items` is a shuffled permutation of `original_order`
    is_shuffled: bool,

    /// Id of the track being played, if any
    current_id: Option<String>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `track` the current track
    ///
    /// The track does not have to be in the queue.
    pub fn set_current(&mut self, track: &Track) {
        self.current_id = Some(track.id.clone());
    }

    /// Forget the current track
    pub fn clear_current(&mut self) {
        self.current_id = None;
    }

    /// Id of the current track
    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// Append a track
    ///
    /// While shuffled the track is appended to the restore order as well, so
    /// unshuffling keeps it.
    pub fn enqueue(&mut self, track: Track) {
        if self.is_shuffled {
            self.original_order.push(track.clone());
        }
        self.items.push(track);
    }

    /// Remove the first track with `id`
    ///
    /// While shuffled the first occurrence is removed from the restore order
    /// as well. Returns the track removed from `items`.
    pub fn dequeue(&mut self, id: &str) -> Option<Track> {
        let index = self.items.iter().position(|t| t.id == id)?;
        let removed = self.items.remove(index);

        if self.is_shuffled {
            if let Some(pos) = self.original_order.iter().position(|t| t.id == id) {
                self.original_order.remove(pos);
            }
        }

        Some(removed)
    }

    /// Empty the queue
    ///
    /// The shuffle flag survives: tracks added afterwards are shuffled into
    /// the new context.
    pub fn clear(&mut self) {
        self.items.clear();
        self.original_order.clear();
    }

    /// Replace the queue with a fresh listening context
    ///
    /// If shuffle is on, the new tracks are shuffled around the current track.
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.replace_with(tracks, &mut rand::thread_rng());
    }

    /// [`Queue::replace`] with a caller-supplied RNG
    pub fn replace_with<R: Rng + ?Sized>(&mut self, tracks: Vec<Track>, rng: &mut R) {
        self.items = tracks;
        self.original_order.clear();

        if self.is_shuffled {
            self.original_order.clone_from(&self.items);
            let pinned = self.position_of_current();
            shuffle_pinned(&mut self.items, pinned, rng);
        }
    }

    /// Turn shuffle on
    ///
    /// No-op when already shuffled. The current track keeps its index.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::thread_rng());
    }

    /// [`Queue::shuffle`] with a caller-supplied RNG
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.is_shuffled {
            return;
        }

        self.original_order.clone_from(&self.items);
        let pinned = self.position_of_current();
        shuffle_pinned(&mut self.items, pinned, rng);
        self.is_shuffled = true;
    }

    /// Turn shuffle off, restoring the captured order
    pub fn unshuffle(&mut self) {
        if !self.is_shuffled {
            return;
        }

        self.items = std::mem::take(&mut self.original_order);
        self.is_shuffled = false;
    }

    /// Index to move to from the current track
    ///
    /// Does not mutate the queue. `None` means "stay where you are".
    ///
    /// - Empty queue: `None`
    /// - Current track not in the queue: next is index 0, previous is `None`
    /// - Next at the last index: `All` wraps to 0, `One` stays on the current
    ///   index, `Off` stops
    /// - Previous at index 0: `None`
    pub fn advance(&self, direction: Direction, repeat: RepeatMode) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }

        let position = self.position_of_current();
        let last = self.items.len() - 1;

        match (direction, position) {
            (Direction::Next, None) => Some(0),
            (Direction::Next, Some(index)) if index < last => Some(index + 1),
            (Direction::Next, Some(index)) => match repeat {
                RepeatMode::All => Some(0),
                RepeatMode::One => Some(index),
                RepeatMode::Off => None,
            },
            (Direction::Previous, Some(index)) if index > 0 => Some(index - 1),
            (Direction::Previous, _) => None,
        }
    }

    /// Index of the current track (first match by id)
    pub fn position_of_current(&self) -> Option<usize> {
        let id = self.current_id.as_deref()?;
        self.items.iter().position(|t| t.id == id)
    }

    /// Track at `index`
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.items.get(index)
    }

    /// Tracks in playback order
    pub fn items(&self) -> &[Track] {
        &self.items
    }

    /// Order that `unshuffle` restores (empty while unshuffled)
    pub fn original_order(&self) -> &[Track] {
        &self.original_order
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_shuffled(&self) -> bool {
        self.is_shuffled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_test_track(id: &str) -> Track {
        Track::remote(id, format!("Track {}", id), "Test Artist", format!("vid-{}", id))
    }

    fn queue_of(ids: &[&str]) -> Queue {
        let mut queue = Queue::new();
        for id in ids {
            queue.enqueue(create_test_track(id));
        }
        queue
    }

    fn ids(tracks: &[Track]) -> Vec<&str> {
        tracks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn create_queue() {
        let queue = Queue::new();
        assert!(queue.is_empty());
        assert!(!queue.is_shuffled());
        assert_eq!(queue.current_id(), None);
    }

    #[test]
    fn enqueue_preserves_order() {
        let queue = queue_of(&["a", "b", "c"]);
        assert_eq!(ids(queue.items()), vec!["a", "b", "c"]);
    }

    #[test]
    fn dequeue_removes_first_occurrence_only() {
        let mut queue = queue_of(&["a", "b", "a", "c"]);
        let removed = queue.dequeue("a").unwrap();

        assert_eq!(removed.id, "a");
        assert_eq!(ids(queue.items()), vec!["b", "a", "c"]);
    }

    #[test]
    fn dequeue_unknown_id() {
        let mut queue = queue_of(&["a"]);
        assert!(queue.dequeue("zzz").is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn current_is_first_match() {
        let mut queue = queue_of(&["a", "b", "a"]);
        queue.set_current(&create_test_track("a"));
        assert_eq!(queue.position_of_current(), Some(0));
    }

    #[test]
    fn advance_next_and_previous() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.set_current(&create_test_track("b"));

        assert_eq!(queue.advance(Direction::Next, RepeatMode::Off), Some(2));
        assert_eq!(queue.advance(Direction::Previous, RepeatMode::Off), Some(0));
    }

    #[test]
    fn advance_at_end_follows_repeat() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.set_current(&create_test_track("c"));

        assert_eq!(queue.advance(Direction::Next, RepeatMode::Off), None);
        assert_eq!(queue.advance(Direction::Next, RepeatMode::All), Some(0));
        assert_eq!(queue.advance(Direction::Next, RepeatMode::One), Some(2));
    }

    #[test]
    fn previous_at_start_is_noop() {
        let mut queue = queue_of(&["a", "b"]);
        queue.set_current(&create_test_track("a"));

        assert_eq!(queue.advance(Direction::Previous, RepeatMode::All), None);
    }

    #[test]
    fn advance_on_empty_queue() {
        let queue = Queue::new();
        assert_eq!(queue.advance(Direction::Next, RepeatMode::All), None);
        assert_eq!(queue.advance(Direction::Previous, RepeatMode::All), None);
    }

    #[test]
    fn current_not_in_queue_starts_at_zero() {
        let mut queue = queue_of(&["a", "b"]);
        queue.set_current(&create_test_track("elsewhere"));

        assert_eq!(queue.position_of_current(), None);
        assert_eq!(queue.advance(Direction::Next, RepeatMode::Off), Some(0));
        assert_eq!(queue.advance(Direction::Previous, RepeatMode::Off), None);
    }

    #[test]
    fn shuffle_pins_current_and_round_trips() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut queue = queue_of(&["a", "b", "c", "d", "e", "f", "g"]);
        queue.set_current(&create_test_track("d"));
        let before: Vec<String> = queue.items().iter().map(|t| t.id.clone()).collect();

        queue.shuffle_with(&mut rng);
        assert!(queue.is_shuffled());
        assert_eq!(queue.items()[3].id, "d");
        assert_eq!(ids(queue.original_order()), before);

        queue.unshuffle();
        assert!(!queue.is_shuffled());
        assert_eq!(ids(queue.items()), before);
        assert!(queue.original_order().is_empty());
    }

    #[test]
    fn shuffle_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut queue = queue_of(&["a", "b", "c", "d", "e"]);
        queue.shuffle_with(&mut rng);
        let once: Vec<String> = queue.items().iter().map(|t| t.id.clone()).collect();

        queue.shuffle_with(&mut rng);
        assert_eq!(ids(queue.items()), once);
        assert_eq!(ids(queue.original_order()), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn enqueue_while_shuffled_survives_unshuffle() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.shuffle_with(&mut rng);

        queue.enqueue(create_test_track("d"));
        assert_eq!(queue.items().last().unwrap().id, "d");

        queue.unshuffle();
        assert_eq!(ids(queue.items()), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn dequeue_while_shuffled_removes_from_both() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.shuffle_with(&mut rng);

        queue.dequeue("b");
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.original_order().len(), 2);

        queue.unshuffle();
        assert_eq!(ids(queue.items()), vec!["a", "c"]);
    }

    #[test]
    fn clear_keeps_shuffle_flag() {
        let mut queue = queue_of(&["a", "b"]);
        queue.shuffle();
        queue.clear();

        assert!(queue.is_empty());
        assert!(queue.original_order().is_empty());
        assert!(queue.is_shuffled());
    }

    #[test]
    fn replace_while_shuffled_pins_current() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut queue = Queue::new();
        queue.shuffle_with(&mut rng);

        let tracks: Vec<Track> = ["a", "b", "c", "d", "e"].iter().map(|id| create_test_track(id)).collect();
        queue.set_current(&tracks[2]);
        queue.replace_with(tracks, &mut rng);

        assert_eq!(queue.items()[2].id, "c");
        queue.unshuffle();
        assert_eq!(ids(queue.items()), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn replace_unshuffled_keeps_order() {
        let mut queue = queue_of(&["x"]);
        queue.replace(vec![create_test_track("a"), create_test_track("b")]);
        assert_eq!(ids(queue.items()), vec!["a", "b"]);
        assert!(queue.original_order().is_empty());
    }
}
