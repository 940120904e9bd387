use rand::{Rng, seq::SliceRandom as _};

use crate::core::BlockColor;

/// Shuffle-without-replacement source of block colors.
///
/// The bag starts empty. Drawing from an empty bag first refills it with a
/// freshly shuffled copy of the full color set, so every run of `N` draws
/// aligned to a refill yields each of the `N` configured colors exactly once.
#[derive(Debug, Clone)]
pub struct ColorBag {
    colors: Vec<BlockColor>,
    bag: Vec<BlockColor>,
}

impl ColorBag {
    /// Creates an empty bag over `colors`.
    #[must_use]
    pub fn new(colors: Vec<BlockColor>) -> Self {
        let bag = Vec::with_capacity(colors.len());
        Self { colors, bag }
    }

    /// Number of colors left before the next refill.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bag.len()
    }

    /// Draws the next color, refilling the bag first when it is empty.
    ///
    /// Returns `None` only when the bag was built without any colors.
    pub fn pop<R>(&mut self, rng: &mut R) -> Option<BlockColor>
    where
        R: Rng + ?Sized,
    {
        if self.bag.is_empty() {
            self.refill(rng);
        }
        self.bag.pop()
    }

    /// Throws away the colors left in the bag.
    pub fn discard(&mut self) {
        self.bag.clear();
    }

    fn refill<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.bag.clone_from(&self.colors);
        self.bag.shuffle(rng);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn bag(names: &[&str]) -> ColorBag {
        ColorBag::new(names.iter().copied().map(BlockColor::from).collect())
    }

    #[test]
    fn test_new_bag_is_empty_until_first_draw() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut bag = bag(&["red", "green", "blue"]);
        assert_eq!(bag.remaining(), 0);

        bag.pop(&mut rng).unwrap();
        assert_eq!(bag.remaining(), 2);
    }

    #[test]
    fn test_each_cycle_is_a_permutation() {
        let mut rng = Pcg32::seed_from_u64(42);
        let names = ["a", "b", "c", "d", "e"];
        let mut bag = bag(&names);

        for _ in 0..10 {
            let cycle: HashSet<_> = (0..names.len())
                .map(|_| bag.pop(&mut rng).unwrap())
                .collect();
            assert_eq!(cycle.len(), names.len());
            assert_eq!(bag.remaining(), 0);
        }
    }

    #[test]
    fn test_exhausted_bag_reshuffles_to_full_size() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut bag = bag(&["red", "green", "blue", "cyan"]);
        for _ in 0..4 {
            bag.pop(&mut rng).unwrap();
        }
        assert_eq!(bag.remaining(), 0);

        bag.pop(&mut rng).unwrap();
        assert_eq!(bag.remaining(), 3);
    }

    #[test]
    fn test_discard_forces_refill() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut bag = bag(&["red", "green", "blue"]);
        bag.pop(&mut rng).unwrap();
        bag.discard();
        assert_eq!(bag.remaining(), 0);

        bag.pop(&mut rng).unwrap();
        assert_eq!(bag.remaining(), 2);
    }

    #[test]
    fn test_empty_color_set_yields_nothing() {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut bag = ColorBag::new(Vec::new());
        assert_eq!(bag.pop(&mut rng), None);
    }
}
