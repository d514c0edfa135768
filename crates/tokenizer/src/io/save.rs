//! Save functionality for trained tokenizers.
//!
//! Writes the vocabulary and merge rules as two pretty-printed JSON files.

use super::format::{pair_key, to_hex, MergesFile, VocabFile};
use bytepair_core::{MergeRules, Result, TokenizerError, Vocabulary};
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Tokenizer saver - handles saving trained models.
pub struct TokenizerSaver<'a> {
    /// Vocabulary reference
    vocab: &'a Vocabulary,
    /// Merge rules reference
    merges: &'a MergeRules,
}

impl<'a> TokenizerSaver<'a> {
    /// Create a new tokenizer saver.
    pub fn new(vocab: &'a Vocabulary, merges: &'a MergeRules) -> Self {
        Self { vocab, merges }
    }

    /// Save the vocabulary and merge rules to two files.
    ///
    /// Parent directories are created as needed.
    pub fn save(&self, vocab_path: &Path, merges_path: &Path) -> Result<()> {
        write_json(vocab_path, &self.serialize_vocab())?;
        write_json(merges_path, &self.serialize_merges())?;

        info!(
            "saved vocabulary ({} tokens) to {} and merges ({} rules) to {}",
            self.vocab.len(),
            vocab_path.display(),
            self.merges.len(),
            merges_path.display()
        );

        Ok(())
    }

    /// Vocabulary in file form, ascending by ID.
    pub fn serialize_vocab(&self) -> VocabFile {
        let mut file = VocabFile::with_capacity(self.vocab.len());
        for (id, bytes) in self.vocab.iter() {
            file.push(id.to_string(), to_hex(bytes));
        }
        file
    }

    /// Merge rules in file form, in learning order.
    pub fn serialize_merges(&self) -> MergesFile {
        let mut file = MergesFile::with_capacity(self.merges.len());
        for rule in self.merges {
            file.push(pair_key(rule.pair), rule.new_id);
        }
        file
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| TokenizerError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| TokenizerError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| TokenizerError::io(path, e.into()))?;
    writer.flush().map_err(|e| TokenizerError::io(path, e))?;

    Ok(())
}
