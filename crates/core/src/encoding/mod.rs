//! Byte-level encoding for BPE tokenization.
//!
//! - `bytes`: text <-> byte IDs, lossy on the way back
//! - `byte_level`: applies learned merges and inverts them

pub mod byte_level;
pub mod bytes;

pub use byte_level::ByteLevelEncoder;
pub use bytes::ByteCodec;
