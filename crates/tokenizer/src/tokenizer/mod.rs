//! Main tokenizer implementation.
//!
//! This module provides the high-level `Tokenizer` struct that ties together
//! training, the byte-level encoder and persistence.

use crate::io::{TokenizerLoader, TokenizerSaver};
use bytepair_core::{ByteCodec, ByteLevelEncoder, MergeRules, Result, Vocabulary};
use bytepair_training::{BpeTrainer, TrainingConfig, TrainingStats};
use std::fmt;
use std::path::Path;

/// Configuration for building a tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Target vocabulary size for training
    pub vocab_size: usize,
    /// Minimum frequency for merges during training
    pub min_frequency: u64,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        let training = TrainingConfig::default();
        Self {
            vocab_size: training.vocab_size,
            min_frequency: training.min_frequency,
        }
    }
}

impl TokenizerConfig {
    /// The training parameters this configuration describes.
    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            vocab_size: self.vocab_size,
            min_frequency: self.min_frequency,
        }
    }
}

/// Builder for creating a tokenizer.
#[derive(Debug, Clone, Default)]
pub struct TokenizerBuilder {
    config: TokenizerConfig,
}

impl TokenizerBuilder {
    /// Create a new tokenizer builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target vocabulary size.
    pub fn vocab_size(mut self, size: usize) -> Self {
        self.config.vocab_size = size;
        self
    }

    /// Set the minimum frequency for merges.
    pub fn min_frequency(mut self, freq: u64) -> Self {
        self.config.min_frequency = freq;
        self
    }

    /// Build the tokenizer.
    ///
    /// Fails if the configuration could never be trained (e.g. a vocabulary
    /// size below 256).
    pub fn build(self) -> Result<Tokenizer> {
        Tokenizer::new(self.config)
    }
}

/// Main tokenizer struct.
///
/// Starts out untrained (every byte is its own token). Once trained or loaded,
/// the vocabulary and merge rules are shared behind `Arc`, so clones are cheap
/// and a tokenizer can serve concurrent readers.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Encoder holding the vocabulary and merge rules
    encoder: ByteLevelEncoder,
    /// Configuration
    config: TokenizerConfig,
}

impl Tokenizer {
    /// Create a new, untrained tokenizer with the given configuration.
    pub fn new(config: TokenizerConfig) -> Result<Self> {
        config.training_config().validate()?;

        Ok(Self {
            encoder: ByteLevelEncoder::new(Vocabulary::new(), MergeRules::new()),
            config,
        })
    }

    /// Create a tokenizer builder.
    pub fn builder() -> TokenizerBuilder {
        TokenizerBuilder::new()
    }

    /// Create a tokenizer from an existing vocabulary and merge rules.
    ///
    /// The two must agree: 256 + rules entries, each merged entry being the
    /// concatenation of its parts.
    pub fn from_parts(vocab: Vocabulary, merges: MergeRules) -> Result<Self> {
        vocab.verify_merges(&merges)?;

        let config = TokenizerConfig {
            vocab_size: vocab.len(),
            ..Default::default()
        };

        Ok(Self {
            encoder: ByteLevelEncoder::new(vocab, merges),
            config,
        })
    }

    /// Train the tokenizer on text data, replacing any previous vocabulary.
    ///
    /// # Arguments
    /// * `text` - Training text data
    pub fn train(&mut self, text: &str) -> Result<TrainingStats> {
        let trainer = BpeTrainer::new(self.config.training_config());
        let output = trainer.train(text)?;

        self.encoder = ByteLevelEncoder::new(output.vocab, output.merges);

        Ok(output.stats)
    }

    /// Train on raw corpus bytes, which must be valid UTF-8.
    pub fn train_bytes(&mut self, bytes: &[u8]) -> Result<TrainingStats> {
        let text = ByteCodec::validate(bytes)?;
        self.train(text)
    }

    /// Encode text to token IDs.
    pub fn encode(&self, text: &str) -> Result<Encoding> {
        let ids = self.encoder.encode(text)?;

        Ok(Encoding {
            ids,
            text: text.to_string(),
        })
    }

    /// Encode raw input bytes, which must be valid UTF-8.
    pub fn encode_bytes(&self, bytes: &[u8]) -> Result<Encoding> {
        let text = ByteCodec::validate(bytes)?;
        self.encode(text)
    }

    /// Decode token IDs back to text.
    ///
    /// Fails on an ID outside the vocabulary; invalid UTF-8 in the result is
    /// replaced with U+FFFD.
    pub fn decode(&self, ids: &[u32]) -> Result<String> {
        self.encoder.decode(ids)
    }

    /// Get the vocabulary size.
    pub fn vocab_size(&self) -> usize {
        self.encoder.vocab().len()
    }

    /// Get a reference to the vocabulary.
    pub fn vocab(&self) -> &Vocabulary {
        self.encoder.vocab()
    }

    /// Get the merge rules in learning order.
    pub fn merges(&self) -> &MergeRules {
        self.encoder.merges()
    }

    /// Whether any merge rule has been learned or loaded.
    pub fn is_trained(&self) -> bool {
        !self.merges().is_empty()
    }

    /// Get the configuration.
    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Save the vocabulary and merge rules to two JSON files.
    pub fn save(&self, vocab_path: &Path, merges_path: &Path) -> Result<()> {
        TokenizerSaver::new(self.vocab(), self.merges()).save(vocab_path, merges_path)
    }

    /// Load a tokenizer from a vocabulary file and a merges file.
    pub fn load(vocab_path: &Path, merges_path: &Path) -> Result<Self> {
        let (vocab, merges) = TokenizerLoader::load(vocab_path, merges_path)?;
        Self::from_parts(vocab, merges)
    }
}

impl fmt::Display for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tokenizer(vocab_size={}, num_merges={})",
            self.vocab_size(),
            self.merges().len()
        )
    }
}

/// Result of encoding text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    /// Token IDs
    pub ids: Vec<u32>,
    /// Original text
    pub text: String,
}

impl Encoding {
    /// Get the number of tokens.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the encoding is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// UTF-8 bytes per token (0.0 for empty input).
    pub fn compression_ratio(&self) -> f64 {
        if self.ids.is_empty() {
            return 0.0;
        }
        self.text.len() as f64 / self.ids.len() as f64
    }
}
