//! Shuffle algorithm for queue randomization
//!
//! Fisher-Yates over every track except the pinned one, which keeps its index.

use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle `items` in place, leaving `items[pinned]` where it is
///
/// The pinned element is taken out of the pool, the rest is shuffled, and
/// the pinned element is reinserted at its original index. An out-of-range
/// pin is treated as no pin.
pub fn shuffle_pinned<T, R: Rng + ?Sized>(items: &mut Vec<T>, pinned: Option<usize>, rng: &mut R) {
    match pinned.filter(|&index| index < items.len()) {
        Some(index) => {
            let pinned_item = items.remove(index);
            items.shuffle(rng);
            items.insert(index, pinned_item);
        }
        None => items.shuffle(rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn pinned_element_keeps_index() {
        let mut rng = StdRng::seed_from_u64(7);
        for pin in 0..10 {
            let mut items: Vec<u32> = (0..10).collect();
            shuffle_pinned(&mut items, Some(pin), &mut rng);
            assert_eq!(items[pin], pin as u32);
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut items: Vec<u32> = (0..50).collect();
        shuffle_pinned(&mut items, None, &mut rng);

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_changes_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let original: Vec<u32> = (0..20).collect();
        let mut items = original.clone();
        shuffle_pinned(&mut items, Some(3), &mut rng);

        // 19! orderings: identity would mean the rng is not being used
        assert_ne!(items, original);
    }

    #[test]
    fn out_of_range_pin_shuffles_everything() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut items: Vec<u32> = (0..5).collect();
        shuffle_pinned(&mut items, Some(99), &mut rng);
        assert_eq!(items.len(), 5);
    }

    #[test]
    fn trivial_inputs() {
        let mut rng = StdRng::seed_from_u64(0);

        let mut empty: Vec<u32> = Vec::new();
        shuffle_pinned(&mut empty, Some(0), &mut rng);
        assert!(empty.is_empty());

        let mut single = vec![1];
        shuffle_pinned(&mut single, Some(0), &mut rng);
        assert_eq!(single, vec![1]);
    }

    #[test]
    fn every_position_is_reachable() {
        // Element 0 should land in each of the 4 unpinned slots at least once
        let mut rng = StdRng::seed_from_u64(11);
        let mut landed: HashMap<usize, u32> = HashMap::new();

        for _ in 0..400 {
            let mut items: Vec<u32> = (0..5).collect();
            shuffle_pinned(&mut items, Some(2), &mut rng);
            let pos = items.iter().position(|&x| x == 0).unwrap();
            *landed.entry(pos).or_default() += 1;
        }

        assert!(!landed.contains_key(&2));
        for slot in [0, 1, 3, 4] {
            assert!(landed.get(&slot).copied().unwrap_or(0) > 0, "slot {slot} never hit");
        }
    }
}
