//! Palpebra CLI — blink-detection trace tooling.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod models;
mod replay;
mod synth;
mod trace;

#[derive(Parser)]
#[command(name = "palpebra", version, about = "EAR blink-detection toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a recorded landmark trace through the blink tracker.
    Replay(replay::ReplayArgs),
    /// Generate a synthetic landmark trace with embedded blinks.
    Synth(synth::SynthArgs),
    /// Verify cascade model files against a manifest.
    VerifyModels(models::VerifyModelsArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Replay(ref args) => replay::run(args),
        Command::Synth(ref args) => synth::run(args),
        Command::VerifyModels(ref args) => models::run(args),
    }
}
