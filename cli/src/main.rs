//! Bytepair CLI - Command-line interface for the BPE tokenizer.
//!
//! This is the main entry point for the `bytepair` command-line tool.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use commands::{DecodeCommand, EncodeCommand, StatsCommand, TrainCommand};
use env_logger::Env;

#[derive(Parser)]
#[command(name = "bytepair")]
#[command(about = "A byte-level BPE tokenizer", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new tokenizer from text data
    Train(TrainCommand),
    /// Encode text to token IDs
    Encode(EncodeCommand),
    /// Decode token IDs back to text
    Decode(DecodeCommand),
    /// Show how well a trained tokenizer compresses some texts
    Stats(StatsCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Train(cmd) => commands::train::run(cmd)?,
        Commands::Encode(cmd) => commands::encode::run(cmd)?,
        Commands::Decode(cmd) => commands::decode::run(cmd)?,
        Commands::Stats(cmd) => commands::stats::run(cmd)?,
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: u8) {
    let level = match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
