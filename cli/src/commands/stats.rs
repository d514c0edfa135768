//! Stats command implementation.

use super::{read_input, ModelPaths};
use clap::Parser;

/// Stats command arguments.
#[derive(Parser)]
pub struct StatsCommand {
    #[command(flatten)]
    pub model: ModelPaths,

    /// Texts to analyse ("-" reads stdin)
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Print one JSON object per input instead of text
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

use anyhow::Result as AnyhowResult;
use bytepair_tokenizer::Tokenizer;
use serde_json::json;

pub fn run(cmd: StatsCommand) -> AnyhowResult<()> {
    let tokenizer = Tokenizer::load(&cmd.model.vocab, &cmd.model.merges)?;
    println!("{}", tokenizer);

    for input in &cmd.input {
        let text = read_input(input)?;
        let encoding = tokenizer.encode(&text)?;

        if cmd.json {
            let record = json!({
                "text": text,
                "bytes": text.len(),
                "tokens": encoding.len(),
                "ratio": encoding.compression_ratio(),
            });
            println!("{}", record);
        } else {
            println!("{:?}:", text);
            println!("  UTF-8 bytes: {}", text.len());
            println!("  Tokens:      {}", encoding.len());
            println!("  Ratio:       {:.2}x", encoding.compression_ratio());
        }
    }

    Ok(())
}
