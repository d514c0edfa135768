//! Training infrastructure for BPE tokenizers.
//!
//! This module provides the pair counter and the merge-learning loop.

pub mod counter;
pub mod trainer;

pub use counter::PairCounter;
pub use trainer::{BpeTrainer, TrainingConfig, TrainingOutput, TrainingSession, TrainingStats};
