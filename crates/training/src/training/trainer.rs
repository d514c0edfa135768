//! BPE trainer implementation.
//!
//! Training starts from the UTF-8 bytes of the corpus and repeatedly merges the
//! most frequent adjacent pair into a new token until the target vocabulary
//! size is reached or no pair is left.

use super::counter::PairCounter;
use bytepair_core::{
    merge_pair, ByteCodec, MergeRule, MergeRules, Result, TokenizerError, Vocabulary,
    BYTE_VOCAB_SIZE,
};
use log::{debug, info, warn};
use serde::Serialize;

/// Configuration for BPE training.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingConfig {
    /// Target vocabulary size, including the 256 byte tokens
    pub vocab_size: usize,
    /// Minimum count for a pair to be merged
    pub min_frequency: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            vocab_size: BYTE_VOCAB_SIZE + 20,
            min_frequency: 1,
        }
    }
}

impl TrainingConfig {
    /// Check that the configuration can be trained.
    pub fn validate(&self) -> Result<()> {
        if self.vocab_size < BYTE_VOCAB_SIZE {
            return Err(TokenizerError::InvalidConfig(format!(
                "vocab_size must be at least {}, got {}",
                BYTE_VOCAB_SIZE, self.vocab_size
            )));
        }
        if self.vocab_size > u32::MAX as usize {
            return Err(TokenizerError::InvalidConfig(format!(
                "vocab_size {} does not fit in a u32 token ID",
                self.vocab_size
            )));
        }
        if self.min_frequency == 0 {
            return Err(TokenizerError::InvalidConfig(
                "min_frequency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of merges needed to reach the target size.
    pub fn num_merges(&self) -> usize {
        self.vocab_size.saturating_sub(BYTE_VOCAB_SIZE)
    }
}

/// Summary of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingStats {
    /// Length of the corpus in bytes
    pub original_len: usize,
    /// Length of the corpus in tokens after all merges
    pub compressed_len: usize,
    /// Number of merge rules learned
    pub merges_learned: usize,
    /// Whether training ran out of pairs before reaching the target size
    pub stopped_early: bool,
}

impl TrainingStats {
    /// Bytes per token over the training corpus (0.0 for an empty corpus).
    pub fn compression_ratio(&self) -> f64 {
        if self.compressed_len == 0 {
            return 0.0;
        }
        self.original_len as f64 / self.compressed_len as f64
    }
}

/// Everything a training run produces.
#[derive(Debug, Clone)]
pub struct TrainingOutput {
    /// Token ID -> bytes
    pub vocab: Vocabulary,
    /// Rules in learning order
    pub merges: MergeRules,
    /// Run summary
    pub stats: TrainingStats,
}

/// BPE trainer.
///
/// Trains a byte-level BPE vocabulary from text by iteratively merging the most
/// frequent adjacent pair. Ties are resolved in favour of the pair that occurs
/// first in the current sequence, which makes runs reproducible.
#[derive(Debug, Clone, Default)]
pub struct BpeTrainer {
    /// Configuration
    config: TrainingConfig,
}

impl BpeTrainer {
    /// Create a new BPE trainer with the given configuration.
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Create a new BPE trainer with default configuration.
    pub fn with_vocab_size(vocab_size: usize) -> Self {
        Self::new(TrainingConfig {
            vocab_size,
            ..Default::default()
        })
    }

    /// The trainer configuration.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Start a training session on `text` without running any merge.
    ///
    /// Fails with [`TokenizerError::InvalidConfig`] if the configuration is invalid.
    pub fn start(&self, text: &str) -> Result<TrainingSession> {
        self.config.validate()?;

        let ids = ByteCodec::encode(text);
        debug!(
            "starting BPE training: {} bytes, target vocab size {}",
            ids.len(),
            self.config.vocab_size
        );

        // A corpus of n bytes can yield at most n - 1 merges
        let merges_cap = self.config.num_merges().min(ids.len().saturating_sub(1));

        Ok(TrainingSession {
            original_len: ids.len(),
            ids,
            vocab: Vocabulary::with_capacity(BYTE_VOCAB_SIZE + merges_cap),
            merges: MergeRules::with_capacity(merges_cap),
            target: self.config.vocab_size,
            min_frequency: self.config.min_frequency,
            exhausted: false,
        })
    }

    /// Train on `text` to completion.
    ///
    /// # Returns
    /// The trained vocabulary, merge rules in learning order, and run statistics
    pub fn train(&self, text: &str) -> Result<TrainingOutput> {
        let mut session = self.start(text)?;
        while session.step()?.is_some() {}
        Ok(session.finish())
    }
}

/// An in-progress training run.
///
/// Each call to [`TrainingSession::step`] learns one merge, so callers can stop
/// between iterations.
#[derive(Debug, Clone)]
pub struct TrainingSession {
    /// Working token sequence
    ids: Vec<u32>,
    /// Vocabulary being built
    vocab: Vocabulary,
    /// Rules learned so far
    merges: MergeRules,
    /// Target vocabulary size
    target: usize,
    /// Minimum pair count to keep merging
    min_frequency: u64,
    /// Corpus length in bytes
    original_len: usize,
    /// Set once no mergeable pair is left
    exhausted: bool,
}

impl TrainingSession {
    /// Learn the next merge rule.
    ///
    /// Returns `Ok(None)` once the target size is reached or no pair with at
    /// least `min_frequency` occurrences remains.
    pub fn step(&mut self) -> Result<Option<MergeRule>> {
        if self.is_complete() {
            return Ok(None);
        }

        let counter = PairCounter::count(&self.ids);
        let (pair, count) = match counter.most_frequent() {
            Some((pair, count)) if count >= self.min_frequency => (pair, count),
            _ => {
                self.exhausted = true;
                return Ok(None);
            }
        };

        let rule = self.merges.push(pair)?;
        self.vocab.add_merge(&rule)?;
        merge_pair(&mut self.ids, pair, rule.new_id);

        debug!(
            "merging ({}, {}) into a new token {} ({} occurrences)",
            pair.0, pair.1, rule.new_id, count
        );

        Ok(Some(rule))
    }

    /// Whether further calls to [`TrainingSession::step`] will learn nothing.
    pub fn is_complete(&self) -> bool {
        self.exhausted || self.vocab.len() >= self.target
    }

    /// Current vocabulary size.
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// Current working sequence.
    pub fn tokens(&self) -> &[u32] {
        &self.ids
    }

    /// Rules learned so far.
    pub fn merges(&self) -> &MergeRules {
        &self.merges
    }

    /// Statistics for the run so far.
    pub fn stats(&self) -> TrainingStats {
        TrainingStats {
            original_len: self.original_len,
            compressed_len: self.ids.len(),
            merges_learned: self.merges.len(),
            stopped_early: self.exhausted && self.vocab.len() < self.target,
        }
    }

    /// Finish the run and hand over the learned tables.
    pub fn finish(self) -> TrainingOutput {
        let stats = self.stats();

        if stats.stopped_early {
            warn!(
                "no mergeable pairs left: stopped at vocab size {} (target {})",
                self.vocab.len(),
                self.target
            );
        }
        info!(
            "training complete: {} merges, {} -> {} tokens ({:.2}x)",
            stats.merges_learned,
            stats.original_len,
            stats.compressed_len,
            stats.compression_ratio()
        );

        TrainingOutput {
            vocab: self.vocab,
            merges: self.merges,
            stats,
        }
    }
}
