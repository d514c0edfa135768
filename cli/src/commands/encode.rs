//! Encode command implementation.

use super::{read_input, ModelPaths};
use clap::Parser;

/// Encode command arguments.
#[derive(Parser)]
pub struct EncodeCommand {
    #[command(flatten)]
    pub model: ModelPaths,

    /// Text to encode ("-" reads stdin)
    #[arg(short, long)]
    pub input: String,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<String>,
}

use anyhow::Result as AnyhowResult;
use bytepair_tokenizer::Tokenizer;

pub fn run(cmd: EncodeCommand) -> AnyhowResult<()> {
    let tokenizer = Tokenizer::load(&cmd.model.vocab, &cmd.model.merges)?;
    let input_text = read_input(&cmd.input)?;

    let encoding = tokenizer.encode(&input_text)?;

    let ids_str: Vec<String> = encoding.ids.iter().map(|id| id.to_string()).collect();
    let output = ids_str.join(",");

    match &cmd.output {
        Some(path) => {
            std::fs::write(path, &output)?;
            println!("Encoded {} tokens to {}", encoding.len(), path);
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}
