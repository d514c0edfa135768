//! Pair counting for BPE training.
//!
//! Counts every adjacent pair of a token sequence and remembers where each pair
//! first occurs, so the most frequent pair can be chosen deterministically:
//! ties go to the pair whose first occurrence is leftmost.

use ahash::AHashMap;
use bytepair_core::Pair;

/// Count and first position of one pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PairStats {
    count: u64,
    first_index: usize,
}

/// Counter for adjacent pair frequencies in a token sequence.
#[derive(Debug, Clone, Default)]
pub struct PairCounter {
    /// Pair -> count and first occurrence
    pair_counts: AHashMap<Pair, PairStats>,
    /// Distinct pairs in order of first occurrence
    order: Vec<Pair>,
}

impl PairCounter {
    /// Create a new, empty pair counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count all adjacent pairs of `ids`.
    ///
    /// A sequence shorter than two tokens yields an empty counter.
    pub fn count(ids: &[u32]) -> Self {
        let mut counter = Self {
            pair_counts: AHashMap::with_capacity(ids.len().min(1 << 16)),
            order: Vec::new(),
        };
        counter.add_sequence(ids);
        counter
    }

    /// Add the pairs of another sequence.
    ///
    /// First-occurrence positions of newly seen pairs are offset by the number of
    /// pairs already counted, so order across sequences follows insertion order.
    pub fn add_sequence(&mut self, ids: &[u32]) {
        let offset = self.total_pairs() as usize;
        let order = &mut self.order;

        for (i, window) in ids.windows(2).enumerate() {
            let pair = (window[0], window[1]);
            let stats = self.pair_counts.entry(pair).or_insert_with(|| {
                order.push(pair);
                PairStats {
                    count: 0,
                    first_index: offset + i,
                }
            });
            stats.count += 1;
        }
    }

    /// Get the count for a pair (0 if it never occurs).
    pub fn get(&self, pair: Pair) -> u64 {
        self.pair_counts.get(&pair).map_or(0, |stats| stats.count)
    }

    /// Position of the first occurrence of a pair.
    pub fn first_index(&self, pair: Pair) -> Option<usize> {
        self.pair_counts.get(&pair).map(|stats| stats.first_index)
    }

    /// The most frequent pair and its count.
    ///
    /// Among pairs tied for the highest count, the one that occurs first wins.
    /// Returns None if no pair was counted.
    pub fn most_frequent(&self) -> Option<(Pair, u64)> {
        let mut best: Option<(Pair, u64)> = None;

        for &pair in &self.order {
            let count = self.get(pair);
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((pair, count)),
            }
        }

        best
    }

    /// Iterate over `(pair, count)` in order of first occurrence.
    pub fn iter(&self) -> impl Iterator<Item = (Pair, u64)> + '_ {
        self.order.iter().map(move |&pair| (pair, self.get(pair)))
    }

    /// Get the number of distinct pairs.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check whether no pair was counted.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Get the total number of pair occurrences.
    pub fn total_pairs(&self) -> u64 {
        self.pair_counts.values().map(|stats| stats.count).sum()
    }

    /// Clear all data from the counter.
    pub fn clear(&mut self) {
        self.pair_counts.clear();
        self.order.clear();
    }
}
