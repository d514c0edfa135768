//! Core BPE data model.
//!
//! This module contains the vocabulary and merge rule tables shared by
//! training, encoding and persistence.

pub mod merges;
pub mod vocab;

pub use merges::{merge_pair, MergeMap, MergeRule, MergeRules, Pair};
pub use vocab::{Vocabulary, BYTE_VOCAB_SIZE};
