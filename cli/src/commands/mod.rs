//! CLI commands for the bytepair tokenizer.

pub mod decode;
pub mod encode;
pub mod stats;
pub mod train;

pub use decode::DecodeCommand;
pub use encode::EncodeCommand;
pub use stats::StatsCommand;
pub use train::TrainCommand;

use clap::Args;
use std::path::PathBuf;

/// Locations of a trained model's two files.
#[derive(Args, Debug, Clone)]
pub struct ModelPaths {
    /// Vocabulary file (token ID -> hex bytes)
    #[arg(long, value_name = "PATH", default_value = "vocab.json")]
    pub vocab: PathBuf,

    /// Merge rules file ("left,right" -> new token ID)
    #[arg(long, value_name = "PATH", default_value = "merges.json")]
    pub merges: PathBuf,
}

/// Read a command input: `-` means stdin, anything else is the text itself.
pub fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        use std::io::Read;
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(input.to_string())
    }
}
