//! qmaze CLI - Tabular Q-learning in procedurally generated mazes
//!
//! This CLI provides:
//! - Headless training with optional observers and summaries
//! - Greedy evaluation of saved agents on fresh mazes
//! - A terminal front-end for playing or watching the agent

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "qmaze")]
#[command(version, about = "Q-learning agent for grid mazes", long_about = None)]
struct Cli {
    /// Log debug events (maze resets, under-filled mazes)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent on generated mazes
    Train(Box<qmaze::cli::commands::train::TrainArgs>),

    /// Evaluate a saved agent greedily on fresh mazes
    Evaluate(qmaze::cli::commands::evaluate::EvaluateArgs),

    /// Play or watch the agent in the terminal
    Play(qmaze::cli::commands::play::PlayArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    match cli.command {
        Commands::Train(args) => qmaze::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => qmaze::cli::commands::evaluate::execute(args),
        Commands::Play(args) => qmaze::cli::commands::play::execute(args),
    }
}
