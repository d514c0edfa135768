//! Load functionality for pre-trained tokenizers.
//!
//! Every failure is reported as a format or I/O error naming the file at fault.
//! Learning order of the merge rules is recovered from their new IDs.

use super::format::{from_hex, parse_id, parse_pair_key, MergesFile, VocabFile};
use ahash::AHashSet;
use bytepair_core::{MergeRule, MergeRules, Result, TokenizerError, Vocabulary};
use log::info;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Tokenizer loader - handles loading trained models.
pub struct TokenizerLoader;

impl TokenizerLoader {
    /// Load a vocabulary and its merge rules.
    ///
    /// Besides checking each file on its own, the pair must agree: the vocabulary
    /// holds exactly 256 + rules entries and each merged entry is the
    /// concatenation of its parts.
    pub fn load(vocab_path: &Path, merges_path: &Path) -> Result<(Vocabulary, MergeRules)> {
        let vocab = Self::load_vocab(vocab_path)?;
        let merges = Self::load_merges(merges_path)?;

        vocab
            .verify_merges(&merges)
            .map_err(|e| at_path(merges_path, e))?;

        info!(
            "loaded vocabulary ({} tokens) from {} and merges ({} rules) from {}",
            vocab.len(),
            vocab_path.display(),
            merges.len(),
            merges_path.display()
        );

        Ok((vocab, merges))
    }

    /// Load and validate a vocabulary file.
    pub fn load_vocab(path: &Path) -> Result<Vocabulary> {
        let file: VocabFile = read_json(path)?;

        let mut tokens: Vec<Option<Vec<u8>>> = vec![None; file.len()];
        for (key, hex) in &file.entries {
            let id = parse_id(key)
                .ok_or_else(|| TokenizerError::format(path, format!("invalid token ID {key:?}")))?;
            let slot = tokens.get_mut(id as usize).ok_or_else(|| {
                TokenizerError::format(
                    path,
                    format!("token ID {id} out of range for {} entries", file.len()),
                )
            })?;
            if slot.is_some() {
                return Err(TokenizerError::format(
                    path,
                    format!("duplicate token ID {id}"),
                ));
            }
            let bytes = from_hex(hex).ok_or_else(|| {
                TokenizerError::format(path, format!("token {id}: invalid hex {hex:?}"))
            })?;
            *slot = Some(bytes);
        }

        // With n entries, ids in range and no duplicates, every slot is filled
        let tokens: Vec<Vec<u8>> = tokens.into_iter().flatten().collect();
        Vocabulary::from_tokens(tokens).map_err(|e| at_path(path, e))
    }

    /// Load and validate a merges file.
    pub fn load_merges(path: &Path) -> Result<MergeRules> {
        let file: MergesFile = read_json(path)?;

        let mut seen = AHashSet::with_capacity(file.len());
        let mut rules = Vec::with_capacity(file.len());
        for (key, new_id) in file.entries {
            let pair = parse_pair_key(&key).ok_or_else(|| {
                TokenizerError::format(path, format!("invalid merge key {key:?}"))
            })?;
            if !seen.insert(pair) {
                return Err(TokenizerError::format(
                    path,
                    format!("duplicate merge key {key:?}"),
                ));
            }
            rules.push(MergeRule::new(pair, new_id));
        }

        MergeRules::from_rules(rules).map_err(|e| at_path(path, e))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| TokenizerError::io(path, e))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| TokenizerError::format(path, e.to_string()))
}

/// Attach a file path to a validation error.
fn at_path(path: &Path, err: TokenizerError) -> TokenizerError {
    match err {
        TokenizerError::InvalidMerge(reason) => TokenizerError::format(path, reason),
        TokenizerError::Format { .. } | TokenizerError::Io { .. } => err,
        other => TokenizerError::format(path, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::save::TokenizerSaver;
    use tempfile::TempDir;

    fn base_vocab_json(extra: &[(&str, &str)]) -> String {
        let mut entries: Vec<String> = (0..256)
            .map(|id| format!("\"{id}\": \"{id:02x}\""))
            .collect();
        entries.extend(extra.iter().map(|(k, v)| format!("\"{k}\": \"{v}\"")));
        format!("{{{}}}", entries.join(", "))
    }

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn assert_format_error(result: Result<impl std::fmt::Debug>, expected_path: &Path) {
        match result {
            Err(TokenizerError::Format { path, .. }) => assert_eq!(path, expected_path),
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let vocab_path = dir.path().join("vocab.json");
        let merges_path = dir.path().join("merges.json");

        let mut vocab = Vocabulary::new();
        let mut merges = MergeRules::new();
        for pair in [(104, 101), (108, 108), (256, 257)] {
            let rule = merges.push(pair).unwrap();
            vocab.add_merge(&rule).unwrap();
        }

        TokenizerSaver::new(&vocab, &merges)
            .save(&vocab_path, &merges_path)
            .unwrap();
        let (loaded_vocab, loaded_merges) =
            TokenizerLoader::load(&vocab_path, &merges_path).unwrap();

        assert_eq!(loaded_vocab, vocab);
        assert_eq!(loaded_merges, merges);
    }

    #[test]
    fn test_merge_order_recovered_from_ids() {
        let dir = TempDir::new().unwrap();
        let vocab = base_vocab_json(&[("256", "6161"), ("257", "616161")]);
        let vocab_path = write(&dir, "vocab.json", &vocab);
        // Keys written out of learning order
        let merges_path = write(&dir, "merges.json", r#"{"256,97": 257, "97,97": 256}"#);

        let (_, merges) = TokenizerLoader::load(&vocab_path, &merges_path).unwrap();
        let order: Vec<u32> = merges.iter().map(|rule| rule.new_id).collect();
        assert_eq!(order, vec![256, 257]);
        assert_eq!(merges.get((97, 97)), Some((0, 256)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        match TokenizerLoader::load_vocab(&missing) {
            Err(TokenizerError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected I/O error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "vocab.json", "{\"0\": ");
        assert_format_error(TokenizerLoader::load_vocab(&path), &path);
    }

    #[test]
    fn test_vocab_errors() {
        let dir = TempDir::new().unwrap();

        let gap = write(&dir, "gap.json", &base_vocab_json(&[("257", "6161")]));
        assert_format_error(TokenizerLoader::load_vocab(&gap), &gap);

        let bad_key = write(&dir, "key.json", &base_vocab_json(&[("x", "6161")]));
        assert_format_error(TokenizerLoader::load_vocab(&bad_key), &bad_key);

        let bad_hex = write(&dir, "hex.json", &base_vocab_json(&[("256", "61g1")]));
        assert_format_error(TokenizerLoader::load_vocab(&bad_hex), &bad_hex);

        let dup = write(&dir, "dup.json", &base_vocab_json(&[("255", "ff")]));
        assert_format_error(TokenizerLoader::load_vocab(&dup), &dup);

        let bad_base = write(&dir, "base.json", r#"{"0": "01"}"#);
        assert_format_error(TokenizerLoader::load_vocab(&bad_base), &bad_base);
    }

    #[test]
    fn test_merges_errors() {
        let dir = TempDir::new().unwrap();

        let bad_key = write(&dir, "key.json", r#"{"97-97": 256}"#);
        assert_format_error(TokenizerLoader::load_merges(&bad_key), &bad_key);

        let dup_key = write(&dir, "dup.json", r#"{"97,97": 256, "97,97": 257}"#);
        assert_format_error(TokenizerLoader::load_merges(&dup_key), &dup_key);

        let dup_id = write(&dir, "dupid.json", r#"{"97,97": 256, "98,98": 256}"#);
        assert_format_error(TokenizerLoader::load_merges(&dup_id), &dup_id);

        let gap = write(&dir, "gap.json", r#"{"97,97": 256, "98,98": 258}"#);
        assert_format_error(TokenizerLoader::load_merges(&gap), &gap);

        let not_monotonic = write(&dir, "mono.json", r#"{"97,300": 256}"#);
        assert_format_error(TokenizerLoader::load_merges(&not_monotonic), &not_monotonic);

        let not_int = write(&dir, "int.json", r#"{"97,97": "256"}"#);
        assert_format_error(TokenizerLoader::load_merges(&not_int), &not_int);
    }

    #[test]
    fn test_mismatched_pair_of_files() {
        let dir = TempDir::new().unwrap();
        // Vocab says 256 is "ab", merges say it is "aa"
        let vocab_path = write(&dir, "vocab.json", &base_vocab_json(&[("256", "6162")]));
        let merges_path = write(&dir, "merges.json", r#"{"97,97": 256}"#);
        assert_format_error(TokenizerLoader::load(&vocab_path, &merges_path), &merges_path);

        // Vocab has a merged entry the merges file does not explain
        let merges_path = write(&dir, "empty.json", "{}");
        assert_format_error(TokenizerLoader::load(&vocab_path, &merges_path), &merges_path);
    }
}
