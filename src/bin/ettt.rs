//! Ephemeral tic-tac-toe CLI
//!
//! Unified interface for:
//! - Training two tabular Q-learning agents through self-play
//! - Replaying greedy games between saved agents

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ettt")]
#[command(version, about = "Self-play Q-learning on tic-tac-toe with expiring pieces", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent pair through self-play
    Train(Box<ephemeral_ttt::cli::commands::train::TrainArgs>),

    /// Replay greedy games between saved agents
    Play(ephemeral_ttt::cli::commands::play::PlayArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => ephemeral_ttt::cli::commands::train::execute(*args),
        Commands::Play(args) => ephemeral_ttt::cli::commands::play::execute(args),
    }
}
