//! Vocabulary storage and lookup.
//!
//! The vocabulary is a flat arena: entry `i` holds the bytes of token `i`.
//! IDs 0-255 are the raw bytes; every later ID is the concatenation of the
//! two tokens its merge rule joins.

use crate::core::merges::{MergeRule, MergeRules};
use crate::error::{Result, TokenizerError};

/// Number of base tokens, one per byte value.
pub const BYTE_VOCAB_SIZE: usize = 256;

/// Mapping from token ID to the bytes it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    /// Token bytes indexed by ID
    tokens: Vec<Vec<u8>>,
}

impl Vocabulary {
    /// Create the base vocabulary of 256 single-byte tokens.
    pub fn new() -> Self {
        Self::with_capacity(BYTE_VOCAB_SIZE)
    }

    /// Create the base vocabulary with room for `capacity` tokens in total.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut tokens = Vec::with_capacity(capacity.max(BYTE_VOCAB_SIZE));
        tokens.extend((0..=u8::MAX).map(|byte| vec![byte]));
        Self { tokens }
    }

    /// Build a vocabulary from token bytes indexed by ID.
    ///
    /// Fails unless the first 256 entries are exactly the single bytes 0-255.
    /// Merged entries are checked later against the rule table with
    /// [`Vocabulary::verify_merges`].
    pub fn from_tokens(tokens: Vec<Vec<u8>>) -> Result<Self> {
        if tokens.len() < BYTE_VOCAB_SIZE {
            return Err(TokenizerError::InvalidMerge(format!(
                "vocabulary has {} entries, expected at least {}",
                tokens.len(),
                BYTE_VOCAB_SIZE
            )));
        }

        for (id, bytes) in tokens.iter().take(BYTE_VOCAB_SIZE).enumerate() {
            if bytes.as_slice() != [id as u8] {
                return Err(TokenizerError::InvalidMerge(format!(
                    "base token {} must be the single byte {:02x}",
                    id, id
                )));
            }
        }

        Ok(Self { tokens })
    }

    /// Add the token produced by `rule`.
    ///
    /// The rule's new ID must be the next free ID and both parts must exist.
    pub fn add_merge(&mut self, rule: &MergeRule) -> Result<u32> {
        let expected = self.tokens.len() as u32;
        if rule.new_id != expected {
            return Err(TokenizerError::InvalidMerge(format!(
                "merge produces token {}, next free ID is {}",
                rule.new_id, expected
            )));
        }

        let bytes = self.merged_bytes(rule)?;
        self.tokens.push(bytes);

        Ok(rule.new_id)
    }

    /// Check that this vocabulary is exactly the one `merges` builds.
    ///
    /// The sizes must agree and every merged entry must equal the concatenation
    /// of its two parts.
    pub fn verify_merges(&self, merges: &MergeRules) -> Result<()> {
        let expected = BYTE_VOCAB_SIZE + merges.len();
        if self.tokens.len() != expected {
            return Err(TokenizerError::InvalidMerge(format!(
                "vocabulary has {} entries but {} merge rules require {}",
                self.tokens.len(),
                merges.len(),
                expected
            )));
        }

        for rule in merges {
            let bytes = self.merged_bytes(rule)?;
            if self.get(rule.new_id) != Some(bytes.as_slice()) {
                return Err(TokenizerError::InvalidMerge(format!(
                    "token {} is not the concatenation of {} and {}",
                    rule.new_id,
                    rule.left(),
                    rule.right()
                )));
            }
        }

        Ok(())
    }

    /// Get the bytes for a token ID.
    #[inline]
    pub fn get(&self, id: u32) -> Option<&[u8]> {
        self.tokens.get(id as usize).map(Vec::as_slice)
    }

    /// Check whether an ID belongs to this vocabulary.
    #[inline]
    pub fn contains(&self, id: u32) -> bool {
        (id as usize) < self.tokens.len()
    }

    /// Get the size of the vocabulary.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the vocabulary is empty. Never true for a constructed vocabulary.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate over `(id, bytes)` in ascending ID order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u8])> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .map(|(id, bytes)| (id as u32, bytes.as_slice()))
    }

    fn merged_bytes(&self, rule: &MergeRule) -> Result<Vec<u8>> {
        let left = self
            .get(rule.left())
            .ok_or(TokenizerError::UnknownTokenId(rule.left()))?;
        let right = self
            .get(rule.right())
            .ok_or(TokenizerError::UnknownTokenId(rule.right()))?;

        let mut bytes = Vec::with_capacity(left.len() + right.len());
        bytes.extend_from_slice(left);
        bytes.extend_from_slice(right);
        Ok(bytes)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_vocabulary() {
        let vocab = Vocabulary::new();
        assert_eq!(vocab.len(), BYTE_VOCAB_SIZE);
        assert_eq!(vocab.get(0), Some(&[0u8][..]));
        assert_eq!(vocab.get(104), Some(&b"h"[..]));
        assert_eq!(vocab.get(255), Some(&[255u8][..]));
        assert_eq!(vocab.get(256), None);
    }

    #[test]
    fn test_add_merge_concatenates() {
        let mut vocab = Vocabulary::new();
        let mut merges = MergeRules::new();

        let aa = merges.push((97, 97)).unwrap();
        vocab.add_merge(&aa).unwrap();
        let aaa = merges.push((256, 97)).unwrap();
        vocab.add_merge(&aaa).unwrap();

        assert_eq!(vocab.get(256), Some(&b"aa"[..]));
        assert_eq!(vocab.get(257), Some(&b"aaa"[..]));
        assert!(vocab.verify_merges(&merges).is_ok());
    }

    #[test]
    fn test_add_merge_rejects_out_of_order_id() {
        let mut vocab = Vocabulary::new();
        let rule = MergeRule::new((97, 98), 300);
        assert!(vocab.add_merge(&rule).is_err());
        assert_eq!(vocab.len(), BYTE_VOCAB_SIZE);
    }

    #[test]
    fn test_from_tokens_checks_base_bytes() {
        let mut tokens: Vec<Vec<u8>> = (0..=255u8).map(|b| vec![b]).collect();
        assert!(Vocabulary::from_tokens(tokens.clone()).is_ok());

        tokens[65] = b"B".to_vec();
        assert!(Vocabulary::from_tokens(tokens).is_err());

        let short: Vec<Vec<u8>> = (0..10u8).map(|b| vec![b]).collect();
        assert!(Vocabulary::from_tokens(short).is_err());
    }

    #[test]
    fn test_verify_merges_detects_mismatch() {
        let mut tokens: Vec<Vec<u8>> = (0..=255u8).map(|b| vec![b]).collect();
        tokens.push(b"ab".to_vec());
        let vocab = Vocabulary::from_tokens(tokens).unwrap();

        let mut merges = MergeRules::new();
        merges.push((97, 99)).unwrap();
        assert!(vocab.verify_merges(&merges).is_err());

        assert!(vocab.verify_merges(&MergeRules::new()).is_err());
    }
}
