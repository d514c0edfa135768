//! Conversion between text and raw byte token IDs.

use crate::error::{Result, TokenizerError};

/// Text <-> byte conversion used at both ends of the BPE pipeline.
///
/// Text goes in as UTF-8; each byte becomes the token ID with the same value.
/// On the way out, invalid UTF-8 is replaced with U+FFFD rather than rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteCodec;

impl ByteCodec {
    /// Convert text to its UTF-8 bytes as token IDs 0-255.
    pub fn encode(text: &str) -> Vec<u32> {
        text.bytes().map(u32::from).collect()
    }

    /// Reassemble decoded bytes into text, replacing invalid sequences.
    pub fn decode(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    /// Interpret raw input bytes as text.
    ///
    /// Fails with [`TokenizerError::UnknownInput`] if the bytes are not UTF-8.
    pub fn validate(bytes: &[u8]) -> Result<&str> {
        std::str::from_utf8(bytes).map_err(|e| {
            TokenizerError::UnknownInput(format!("input is not valid UTF-8: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_ascii_and_multibyte() {
        assert_eq!(ByteCodec::encode("hi"), vec![104, 105]);
        assert_eq!(ByteCodec::encode("é"), vec![0xc3, 0xa9]);
        assert!(ByteCodec::encode("").is_empty());
    }

    #[test]
    fn test_decode_replaces_invalid_bytes() {
        assert_eq!(ByteCodec::decode(b"ok"), "ok");
        assert_eq!(ByteCodec::decode(&[0x61, 0xff, 0x62]), "a\u{fffd}b");
        // Truncated two-byte sequence
        assert_eq!(ByteCodec::decode(&[0xc3]), "\u{fffd}");
    }

    #[test]
    fn test_validate() {
        assert_eq!(ByteCodec::validate("héllo".as_bytes()).unwrap(), "héllo");
        let err = ByteCodec::validate(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, TokenizerError::UnknownInput(_)));
    }
}
