use itertools::Itertools;

/// Maps judgment slots to unordered item pairs `(i, j)` with `i < j`,
/// enumerated lexicographically: `(0,1), (0,2), .., (0,n-1), (1,2), ..`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairIndex {
    num_items: usize,
    pairs: Vec<(usize, usize)>,
}

impl PairIndex {
    pub fn new(num_items: usize) -> Self {
        let pairs: Vec<(usize, usize)> = (0..num_items).tuple_combinations().collect();
        debug_assert_eq!(pairs.len(), Self::number_of_pairs(num_items));
        Self { num_items, pairs }
    }

    /// `n * (n - 1) / 2`, the length of every judgment vector over `n` items.
    pub fn number_of_pairs(num_items: usize) -> usize {
        num_items * num_items.saturating_sub(1) / 2
    }

    pub fn num_items(&self) -> usize {
        self.num_items
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The pair judged in `slot`, if the slot exists.
    pub fn get(&self, slot: usize) -> Option<(usize, usize)> {
        self.pairs.get(slot).copied()
    }

    /// The slot in which items `a` and `b` are compared, in either order.
    pub fn slot_of(&self, a: usize, b: usize) -> Option<usize> {
        let (i, j) = if a < b { (a, b) } else { (b, a) };
        if i == j || j >= self.num_items {
            return None;
        }
        // Rows 0..i hold (n-1) + (n-2) + .. + (n-i) slots
        Some(i * (2 * self.num_items - i - 1) / 2 + (j - i - 1))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().copied()
    }
}
