//! Bytepair-tokenizer - High-level tokenizer API
//!
//! This crate provides a user-friendly interface for byte-level BPE,
//! integrating training, the encoder/decoder and persistence into a single
//! `Tokenizer`.
//!
//! # Features
//!
//! - Simple builder pattern for tokenizer configuration
//! - Deterministic training with reproducible merge order
//! - Lossless round-trip for any UTF-8 text
//! - Saving and loading as a vocabulary file plus a merges file
//!
//! # Example
//!
//! ```rust
//! use bytepair_tokenizer::Tokenizer;
//!
//! // Build a tokenizer with configuration
//! let mut tokenizer = Tokenizer::builder()
//!     .vocab_size(256 + 10)
//!     .build()?;
//!
//! tokenizer.train("low lower lowest low lower lowest")?;
//!
//! // Encode text
//! let encoding = tokenizer.encode("lowest")?;
//! println!("{:?}", encoding.ids);
//!
//! // Decode tokens
//! let text = tokenizer.decode(&encoding.ids)?;
//! assert_eq!(text, "lowest");
//! # Ok::<(), bytepair_tokenizer::TokenizerError>(())
//! ```

// Re-export core types
pub use bytepair_core::{MergeRule, MergeRules, Result, TokenizerError, Vocabulary};
pub use bytepair_training::TrainingStats;

// Tokenizer API
pub mod tokenizer;
pub use tokenizer::{Encoding, Tokenizer, TokenizerBuilder, TokenizerConfig};

// IO/Serialization
pub mod io;
pub use io::{TokenizerLoader, TokenizerSaver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
