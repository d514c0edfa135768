//! Format definitions for tokenizer serialization.
//!
//! Both persisted files are flat JSON objects:
//!
//! - vocabulary: `{"<id>": "<lowercase hex of the token bytes>"}`
//! - merges: `{"<left>,<right>": <new id>}`
//!
//! Entries are kept in file order and duplicate keys are preserved, so the
//! loader can reject them instead of silently keeping the last one.

use bytepair_core::Pair;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// A JSON object read or written as an ordered list of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
    /// Key/value pairs in file order
    pub entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    /// Create an empty map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Append an entry.
    pub fn push(&mut self, key: impl Into<String>, value: V) {
        self.entries.push((key.into(), value));
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

/// Vocabulary file: token ID -> hex-encoded bytes.
pub type VocabFile = OrderedMap<String>;

/// Merges file: `"left,right"` -> new token ID.
pub type MergesFile = OrderedMap<u32>;

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = OrderedMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            map.push(key, value);
        }
        Ok(map)
    }
}

/// Encode bytes as lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Writing to a String cannot fail
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}

/// Decode a hex string (either case). Returns None on odd length or a non-hex digit.
pub fn from_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}

/// Format a pair as its merges-file key, `"left,right"`.
pub fn pair_key(pair: Pair) -> String {
    format!("{},{}", pair.0, pair.1)
}

/// Parse a merges-file key. Both parts must be plain decimal integers.
pub fn parse_pair_key(key: &str) -> Option<Pair> {
    let (left, right) = key.split_once(',')?;
    Some((parse_id(left)?, parse_id(right)?))
}

/// Parse a token ID written in canonical decimal form (no sign, no leading zeros).
pub fn parse_id(text: &str) -> Option<u32> {
    let id: u32 = text.parse().ok()?;
    (id.to_string() == text).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(to_hex(b"aa"), "6161");
        assert_eq!(to_hex(&[0x00, 0xff, 0x0a]), "00ff0a");
        assert_eq!(to_hex(&[]), "");

        assert_eq!(from_hex("6161"), Some(b"aa".to_vec()));
        assert_eq!(from_hex("00FF0a"), Some(vec![0x00, 0xff, 0x0a]));
        assert_eq!(from_hex(""), Some(Vec::new()));
        assert_eq!(from_hex("616"), None);
        assert_eq!(from_hex("zz"), None);
        assert_eq!(from_hex("é1"), None);
        assert_eq!(from_hex("+f"), None);
    }

    #[test]
    fn test_pair_key() {
        assert_eq!(pair_key((97, 256)), "97,256");
        assert_eq!(parse_pair_key("97,256"), Some((97, 256)));
        assert_eq!(parse_pair_key("97"), None);
        assert_eq!(parse_pair_key("97,x"), None);
        assert_eq!(parse_pair_key("97, 98"), None);
        assert_eq!(parse_pair_key("1,2,3"), None);
    }

    #[test]
    fn test_parse_id_is_canonical() {
        assert_eq!(parse_id("0"), Some(0));
        assert_eq!(parse_id("256"), Some(256));
        assert_eq!(parse_id("007"), None);
        assert_eq!(parse_id("+7"), None);
        assert_eq!(parse_id("-1"), None);
    }

    #[test]
    fn test_ordered_map_keeps_order_and_duplicates() {
        let json = r#"{"b": 2, "a": 1, "b": 3}"#;
        let map: MergesFile = serde_json::from_str(json).unwrap();

        assert_eq!(
            map.entries,
            vec![("b".to_string(), 2), ("a".to_string(), 1), ("b".to_string(), 3)]
        );
    }

    #[test]
    fn test_ordered_map_serializes_in_order() {
        let mut map = VocabFile::default();
        map.push("10", "0a".to_string());
        map.push("2", "02".to_string());

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"10":"0a","2":"02"}"#);
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(serde_json::from_str::<VocabFile>("[1, 2]").is_err());
        assert!(serde_json::from_str::<MergesFile>(r#"{"1,2": "x"}"#).is_err());
    }
}
