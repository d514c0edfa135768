//! Error types for the BPE tokenizer library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the tokenizer library.
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unknown token ID
    #[error("Unknown token ID: {0}")]
    UnknownTokenId(u32),

    /// Input that cannot be reduced to text bytes
    #[error("Unknown input: {0}")]
    UnknownInput(String),

    /// Invalid merge rule or vocabulary entry
    #[error("Invalid merge rule: {0}")]
    InvalidMerge(String),

    /// Malformed persisted vocabulary or merges file
    #[error("Format error in {path}: {reason}")]
    Format { path: PathBuf, reason: String },

    /// I/O error with file context
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TokenizerError {
    /// Build a [`TokenizerError::Format`] for the given file.
    pub fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`TokenizerError::Io`] for the given file.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for tokenizer operations.
pub type Result<T> = std::result::Result<T, TokenizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_names_path() {
        let err = TokenizerError::format("/tmp/merges.json", "duplicate key \"97,97\"");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/merges.json"));
        assert!(msg.contains("duplicate key"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = TokenizerError::io("vocab.json", inner);
        assert!(err.to_string().starts_with("I/O error for vocab.json"));
        assert!(err.source().is_some());
    }
}
