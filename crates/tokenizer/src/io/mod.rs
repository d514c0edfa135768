//! Serialization and deserialization for BPE models.
//!
//! A trained model is stored as two JSON files: the vocabulary (token ID to
//! hex-encoded bytes) and the merge rules (pair key to new token ID).

pub mod format;
pub mod load;
pub mod save;

pub use format::{MergesFile, OrderedMap, VocabFile};
pub use load::TokenizerLoader;
pub use save::TokenizerSaver;
