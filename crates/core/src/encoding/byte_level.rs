//! Byte-level BPE encoding.
//!
//! Text is first reduced to its UTF-8 bytes, then learned merges are applied
//! greedily: on every round the pair whose rule was learned earliest is merged
//! everywhere it occurs, which replays the order in which training found them.

use super::bytes::ByteCodec;
use crate::core::{merge_pair, MergeRules, Pair, Vocabulary};
use crate::{Result, TokenizerError};
use std::sync::Arc;

/// Byte-level BPE encoder and decoder.
///
/// Holds shared, read-only references to a trained vocabulary and rule table,
/// so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct ByteLevelEncoder {
    /// Token ID -> bytes
    vocab: Arc<Vocabulary>,
    /// Learned merge rules with ranks
    merges: Arc<MergeRules>,
}

impl ByteLevelEncoder {
    /// Create a new encoder owning its tables.
    pub fn new(vocab: Vocabulary, merges: MergeRules) -> Self {
        Self::with_arcs(Arc::new(vocab), Arc::new(merges))
    }

    /// Create a new encoder sharing existing tables.
    pub fn with_arcs(vocab: Arc<Vocabulary>, merges: Arc<MergeRules>) -> Self {
        Self { vocab, merges }
    }

    /// Encode text to token IDs.
    ///
    /// Bytes that no rule covers stay as raw IDs 0-255.
    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let mut tokens = ByteCodec::encode(text);
        self.apply_bpe_merges(&mut tokens);
        Ok(tokens)
    }

    /// Apply merge rules to a token sequence in place.
    ///
    /// Repeatedly picks the adjacent pair with the lowest rank and rewrites all of
    /// its non-overlapping occurrences, until no adjacent pair has a rule.
    pub fn apply_bpe_merges(&self, tokens: &mut Vec<u32>) {
        while tokens.len() >= 2 {
            let best = tokens
                .windows(2)
                .filter_map(|window| {
                    let pair: Pair = (window[0], window[1]);
                    self.merges.get(pair).map(|(rank, new_id)| (rank, pair, new_id))
                })
                .min_by_key(|&(rank, _, _)| rank);

            match best {
                Some((_, pair, new_id)) => {
                    merge_pair(tokens, pair, new_id);
                }
                None => break,
            }
        }
    }

    /// Decode token IDs back to text.
    ///
    /// Fails only on an ID the vocabulary does not contain; invalid UTF-8 in the
    /// reassembled bytes is replaced with U+FFFD.
    pub fn decode(&self, ids: &[u32]) -> Result<String> {
        let bytes = self.decode_bytes(ids)?;
        Ok(ByteCodec::decode(&bytes))
    }

    /// Decode token IDs to the raw bytes they stand for.
    pub fn decode_bytes(&self, ids: &[u32]) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(ids.len() * 2);

        for &id in ids {
            let token = self
                .vocab
                .get(id)
                .ok_or(TokenizerError::UnknownTokenId(id))?;
            bytes.extend_from_slice(token);
        }

        Ok(bytes)
    }

    /// The vocabulary used for decoding.
    pub fn vocab(&self) -> &Arc<Vocabulary> {
        &self.vocab
    }

    /// The merge rules used for encoding.
    pub fn merges(&self) -> &Arc<MergeRules> {
        &self.merges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rules learned from "aaabdaaabac": aa, aaa, aaab.
    fn trained_tables() -> (Vocabulary, MergeRules) {
        let mut vocab = Vocabulary::new();
        let mut merges = MergeRules::new();
        for pair in [(97, 97), (256, 97), (257, 98)] {
            let rule = merges.push(pair).unwrap();
            vocab.add_merge(&rule).unwrap();
        }
        (vocab, merges)
    }

    #[test]
    fn test_encode_without_merges_yields_bytes() {
        let encoder = ByteLevelEncoder::new(Vocabulary::new(), MergeRules::new());

        let ids = encoder.encode("hello world").unwrap();
        assert_eq!(ids, vec![104, 101, 108, 108, 111, 32, 119, 111, 114, 108, 100]);
        assert_eq!(encoder.decode(&ids).unwrap(), "hello world");
    }

    #[test]
    fn test_encode_applies_rules_in_learning_order() {
        let (vocab, merges) = trained_tables();
        let encoder = ByteLevelEncoder::new(vocab, merges);

        let ids = encoder.encode("aaabdaaabac").unwrap();
        assert_eq!(ids, vec![258, 100, 258, 97, 99]);
        assert_eq!(encoder.decode(&ids).unwrap(), "aaabdaaabac");
    }

    #[test]
    fn test_earlier_rule_wins_over_leftmost_pair() {
        let mut vocab = Vocabulary::new();
        let mut merges = MergeRules::new();
        // (b, c) learned before (a, b)
        for pair in [(98, 99), (97, 98)] {
            let rule = merges.push(pair).unwrap();
            vocab.add_merge(&rule).unwrap();
        }
        let encoder = ByteLevelEncoder::new(vocab, merges);

        // "abc": (a,b) is leftmost but (b,c) has the lower rank
        assert_eq!(encoder.encode("abc").unwrap(), vec![97, 256]);
    }

    #[test]
    fn test_unmerged_bytes_stay_raw() {
        let (vocab, merges) = trained_tables();
        let encoder = ByteLevelEncoder::new(vocab, merges);

        assert_eq!(encoder.encode("xa").unwrap(), vec![120, 97]);
    }

    #[test]
    fn test_empty_input_and_output() {
        let (vocab, merges) = trained_tables();
        let encoder = ByteLevelEncoder::new(vocab, merges);

        assert!(encoder.encode("").unwrap().is_empty());
        assert_eq!(encoder.decode(&[]).unwrap(), "");
    }

    #[test]
    fn test_decode_unknown_id() {
        let encoder = ByteLevelEncoder::new(Vocabulary::new(), MergeRules::new());
        let err = encoder.decode(&[104, 256]).unwrap_err();
        assert!(matches!(err, TokenizerError::UnknownTokenId(256)));
    }

    #[test]
    fn test_decode_replaces_split_codepoint() {
        let encoder = ByteLevelEncoder::new(Vocabulary::new(), MergeRules::new());
        // First byte of "é" alone
        assert_eq!(encoder.decode(&[0xc3]).unwrap(), "\u{fffd}");
    }

    #[test]
    fn test_encoder_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ByteLevelEncoder>();
    }
}
