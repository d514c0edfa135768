//! Decode command implementation.

use super::ModelPaths;
use clap::Parser;

/// Decode command arguments.
#[derive(Parser)]
pub struct DecodeCommand {
    #[command(flatten)]
    pub model: ModelPaths,

    /// Token IDs to decode (comma-separated, "-" reads stdin)
    #[arg(short, long)]
    pub tokens: String,
}

use super::read_input;
use anyhow::{Context, Result as AnyhowResult};
use bytepair_tokenizer::Tokenizer;

pub fn run(cmd: DecodeCommand) -> AnyhowResult<()> {
    let tokenizer = Tokenizer::load(&cmd.model.vocab, &cmd.model.merges)?;
    let tokens = read_input(&cmd.tokens)?;

    // Parse token IDs
    let ids: Vec<u32> = tokens
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .with_context(|| format!("invalid token ID {s:?}"))
        })
        .collect::<AnyhowResult<Vec<_>>>()?;

    let text = tokenizer.decode(&ids)?;

    println!("{}", text);

    Ok(())
}
