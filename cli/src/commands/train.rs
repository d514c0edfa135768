//! Train command implementation.

use super::ModelPaths;
use clap::Parser;

/// Train command arguments.
#[derive(Parser)]
pub struct TrainCommand {
    /// Path to the training data file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Target vocabulary size (at least 256)
    #[arg(short = 's', long, default_value_t = 276)]
    pub vocab_size: usize,

    /// Minimum frequency for merges
    #[arg(short, long, default_value_t = 1)]
    pub min_frequency: u64,

    #[command(flatten)]
    pub output: ModelPaths,
}

use anyhow::{Context, Result as AnyhowResult};
use bytepair_tokenizer::Tokenizer;
use log::info;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

pub fn run(cmd: TrainCommand) -> AnyhowResult<()> {
    info!(
        "training tokenizer on {} (vocab size {}, min frequency {})",
        cmd.input.display(),
        cmd.vocab_size,
        cmd.min_frequency
    );

    // Build first so a bad vocab size fails before reading the corpus
    let mut tokenizer = Tokenizer::builder()
        .vocab_size(cmd.vocab_size)
        .min_frequency(cmd.min_frequency)
        .build()?;

    let data = fs::read(&cmd.input)
        .with_context(|| format!("failed to read {}", cmd.input.display()))?;

    let start = Instant::now();
    let stats = tokenizer
        .train_bytes(&data)
        .with_context(|| format!("training data in {}", cmd.input.display()))?;
    println!("Training completed in {:.2}s", start.elapsed().as_secs_f64());
    println!("Final vocab size: {}", tokenizer.vocab_size());
    println!("Original length: {}", stats.original_len);
    println!("Compressed length: {}", stats.compressed_len);
    println!("Compression ratio: {:.2}X", stats.compression_ratio());
    if stats.stopped_early {
        println!("Stopped early: no pairs left to merge");
    }

    tokenizer.save(&cmd.output.vocab, &cmd.output.merges)?;
    println!(
        "Saved vocabulary to {} and merges to {}",
        cmd.output.vocab.display(),
        cmd.output.merges.display()
    );

    Ok(())
}
