//! Bytepair-training - BPE training infrastructure
//!
//! This crate provides the training loop that learns BPE merge rules from
//! text, producing the vocabulary and ordered rule table consumed by
//! `bytepair-core`'s encoder.
//!
//! # Features
//!
//! - Adjacent pair counting with a reproducible tie-break
//! - Configurable target vocabulary size and minimum pair frequency
//! - Step-wise sessions for callers that want to stop between merges
//!
//! # Example
//!
//! ```rust
//! use bytepair_training::{BpeTrainer, TrainingConfig};
//!
//! let trainer = BpeTrainer::new(TrainingConfig {
//!     vocab_size: 256 + 3,
//!     ..Default::default()
//! });
//! let output = trainer.train("aaabdaaabac")?;
//! assert_eq!(output.merges.len(), 3);
//! # Ok::<(), bytepair_training::TokenizerError>(())
//! ```

pub use bytepair_core::{Result, TokenizerError};

// Training infrastructure
pub mod training;
pub use training::{
    BpeTrainer, PairCounter, TrainingConfig, TrainingOutput, TrainingSession, TrainingStats,
};
