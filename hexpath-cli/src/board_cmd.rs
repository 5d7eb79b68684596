//! Board command - generate a random board file

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hexpath_core::{HexBoard, TerrainCosts};

use crate::scenario::board_side;

#[derive(Args)]
pub struct BoardArgs {
    #[arg(long, default_value = "16", value_parser = board_side())]
    pub width: i32,

    #[arg(long, default_value = "9", value_parser = board_side())]
    pub height: i32,

    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Output file (stdout if omitted)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Run board command
pub fn run(args: BoardArgs) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let board = HexBoard::random(args.width, args.height, TerrainCosts::default(), &mut rng);

    match &args.output {
        Some(path) => {
            board.save(path)?;
            tracing::info!("Saved {}x{} board to {}", args.width, args.height, path.display());
        }
        None => println!("{}", board.to_json()?),
    }
    Ok(())
}
