//! HEXPATH CLI - Command-line interface
//!
//! Commands:
//! - path: cheapest path for one unit to one hex
//! - range: every hex a unit can reach, with non-dominated paths
//! - board: generate a random board file

mod board_cmd;
mod path_cmd;
mod range_cmd;
mod scenario;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexpath")]
#[command(about = "HEXPATH movement path search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the cheapest path to a hex
    Path(path_cmd::PathArgs),
    /// List every reachable hex
    Range(range_cmd::RangeArgs),
    /// Write a random board as JSON
    Board(board_cmd::BoardArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Path(args) => path_cmd::run(args),
        Commands::Range(args) => range_cmd::run(args),
        Commands::Board(args) => board_cmd::run(args),
    }
}
