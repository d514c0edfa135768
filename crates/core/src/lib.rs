//! Bytepair-core - Core BPE data model and byte-level codec
//!
//! This crate provides the fundamental data structures for byte-pair
//! encoding (BPE): the vocabulary, the ordered merge-rule table, and the
//! encoder/decoder that applies them to text.
//!
//! # Features
//!
//! - Flat vocabulary arena indexed by token ID
//! - Merge rules kept in learning order with O(1) pair lookup
//! - One sequence rewrite shared by training and encoding
//! - Lossy, total decoding of arbitrary token sequences
//!
//! # Example
//!
//! ```rust
//! use bytepair_core::{ByteLevelEncoder, MergeRules, Vocabulary};
//!
//! let mut vocab = Vocabulary::new();
//! let mut merges = MergeRules::new();
//! let rule = merges.push((b'a' as u32, b'a' as u32))?;
//! vocab.add_merge(&rule)?;
//!
//! let encoder = ByteLevelEncoder::new(vocab, merges);
//! let ids = encoder.encode("aab")?;
//! assert_eq!(ids, vec![256, 98]);
//! assert_eq!(encoder.decode(&ids)?, "aab");
//! # Ok::<(), bytepair_core::TokenizerError>(())
//! ```

pub mod error;
pub use error::{Result, TokenizerError};

// Core BPE data model
pub mod core;
pub use crate::core::{
    merge_pair, MergeMap, MergeRule, MergeRules, Pair, Vocabulary, BYTE_VOCAB_SIZE,
};

// Encoding
pub mod encoding;
pub use encoding::{ByteCodec, ByteLevelEncoder};
