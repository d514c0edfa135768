//! Merge rule management for BPE.
//!
//! This module provides data structures for storing and accessing BPE merge rules.
//! Rules are kept in learning order and indexed by pair for fast lookup.
//! The sequence rewrite shared by training and encoding lives here too, so
//! both sides apply a rule in exactly the same way.

use crate::core::vocab::BYTE_VOCAB_SIZE;
use crate::error::{Result, TokenizerError};
use ahash::AHashMap;

/// A pair of token IDs that can be merged.
pub type Pair = (u32, u32);

/// Merge rule mapping: pair -> (rank, new_token_id).
///
/// The rank is the position of the rule in learning order (lower rank = higher priority).
pub type MergeMap = AHashMap<Pair, (u32, u32)>;

/// A single learned merge: `pair` is replaced by `new_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeRule {
    /// The adjacent pair of token IDs
    pub pair: Pair,
    /// The token created by merging `pair`
    pub new_id: u32,
}

impl MergeRule {
    /// Create a new merge rule.
    pub fn new(pair: Pair, new_id: u32) -> Self {
        Self { pair, new_id }
    }

    /// Left token of the pair.
    #[inline]
    pub fn left(&self) -> u32 {
        self.pair.0
    }

    /// Right token of the pair.
    #[inline]
    pub fn right(&self) -> u32 {
        self.pair.1
    }
}

/// Ordered collection of BPE merge rules with efficient lookup.
///
/// New IDs run gaplessly from 256 in learning order, so the rank of a rule
/// is always `new_id - 256`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeRules {
    /// Rules in learning order
    rules: Vec<MergeRule>,
    /// Merge rules: pair -> (rank, new_token_id)
    merges: MergeMap,
}

impl MergeRules {
    /// Create a new empty collection of merge rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new collection with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rules: Vec::with_capacity(capacity),
            merges: MergeMap::with_capacity(capacity),
        }
    }

    /// Build a rule table from rules in any order.
    ///
    /// The rules are sorted by new ID, which recovers learning order. Fails if the
    /// new IDs do not form the contiguous run starting at 256, if a new ID is not
    /// strictly greater than both parts of its pair, or if a pair appears twice.
    pub fn from_rules(rules: impl IntoIterator<Item = MergeRule>) -> Result<Self> {
        let mut rules: Vec<MergeRule> = rules.into_iter().collect();
        rules.sort_by_key(|rule| rule.new_id);

        let mut table = Self::with_capacity(rules.len());
        for rule in rules {
            let expected = table.next_id();
            if rule.new_id != expected {
                return Err(TokenizerError::InvalidMerge(format!(
                    "expected new token ID {} for pair ({},{}), found {}",
                    expected,
                    rule.left(),
                    rule.right(),
                    rule.new_id
                )));
            }
            table.push(rule.pair)?;
        }

        Ok(table)
    }

    /// Append a rule for `pair`, assigning it the next token ID.
    ///
    /// Both parts must already exist (be lower than the new ID) and the pair must
    /// not have been learned before.
    pub fn push(&mut self, pair: Pair) -> Result<MergeRule> {
        let new_id = self.next_id();

        if pair.0 >= new_id || pair.1 >= new_id {
            return Err(TokenizerError::InvalidMerge(format!(
                "pair ({},{}) refers to a token not below new ID {}",
                pair.0, pair.1, new_id
            )));
        }
        if let Some(&(_, existing)) = self.merges.get(&pair) {
            return Err(TokenizerError::InvalidMerge(format!(
                "pair ({},{}) already merged into {}",
                pair.0, pair.1, existing
            )));
        }

        let rank = self.rules.len() as u32;
        let rule = MergeRule::new(pair, new_id);
        self.merges.insert(pair, (rank, new_id));
        self.rules.push(rule);

        Ok(rule)
    }

    /// Get the merge rule for a pair.
    ///
    /// Returns Some((rank, new_token_id)) if this pair should be merged,
    /// None otherwise.
    #[inline]
    pub fn get(&self, pair: Pair) -> Option<(u32, u32)> {
        self.merges.get(&pair).copied()
    }

    /// The ID the next learned rule will receive.
    #[inline]
    pub fn next_id(&self) -> u32 {
        (BYTE_VOCAB_SIZE + self.rules.len()) as u32
    }

    /// Rules in learning order.
    pub fn iter(&self) -> std::slice::Iter<'_, MergeRule> {
        self.rules.iter()
    }

    /// Rules in learning order as a slice.
    pub fn as_slice(&self) -> &[MergeRule] {
        &self.rules
    }

    /// Get the number of merge rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no merge rules.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a MergeRules {
    type Item = &'a MergeRule;
    type IntoIter = std::slice::Iter<'a, MergeRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Replace every non-overlapping occurrence of `pair` in `ids` with `new_id`.
///
/// A single left-to-right scan: after a match the scan resumes past the merged
/// element, so `[a, a, a]` with rule `(a, a)` becomes `[new, a]`. The buffer is
/// compacted in place. Returns the number of replacements made.
pub fn merge_pair(ids: &mut Vec<u32>, pair: Pair, new_id: u32) -> usize {
    let len = ids.len();
    let mut read = 0;
    let mut write = 0;
    let mut merged = 0;

    while read < len {
        if read + 1 < len && ids[read] == pair.0 && ids[read + 1] == pair.1 {
            ids[write] = new_id;
            read += 2;
            merged += 1;
        } else {
            ids[write] = ids[read];
            read += 1;
        }
        write += 1;
    }

    ids.truncate(write);
    merged
}
