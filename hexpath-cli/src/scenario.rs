//! Shared scenario arguments: where the board comes from and who is moving
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 2: load_board(), build_unit(), load_config()
//! - Level 4: argument parsing and JSON summaries

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use hexpath_core::{
    Facing, HexBoard, Location, MovePath, MovementMode, SearchConfig, Step, TerrainCosts, UnitKind,
    UnitState, CAP_IGNORE_WOODS, CAP_LATERAL, CAP_NO_REVERSE,
};

// ============================================================================
// ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ScenarioArgs {
    /// Board JSON file (otherwise a board is generated)
    #[arg(long, value_name = "FILE")]
    pub board: Option<PathBuf>,

    /// Generated board width
    #[arg(long, default_value = "16", value_parser = board_side())]
    pub width: i32,

    /// Generated board height
    #[arg(long, default_value = "9", value_parser = board_side())]
    pub height: i32,

    /// Seed for random terrain; omit for a clear board
    #[arg(long)]
    pub seed: Option<u64>,

    /// Search configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Start hex as X,Y
    #[arg(long, value_parser = parse_location)]
    pub from: Location,

    /// Start facing (0=N .. 5=NW)
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..6))]
    pub facing: u8,

    /// Movement mode
    #[arg(long, value_enum, default_value = "walk")]
    pub mode: ModeArg,

    /// Unit kind
    #[arg(long, value_enum, default_value = "mech")]
    pub kind: KindArg,

    /// Walking MP
    #[arg(long, default_value = "5")]
    pub walk: u32,

    /// Jumping MP
    #[arg(long, default_value = "0")]
    pub jump: u32,

    /// Unit starts prone
    #[arg(long)]
    pub prone: bool,

    /// Unit can side-step
    #[arg(long)]
    pub lateral: bool,

    /// Unit cannot move backward
    #[arg(long)]
    pub no_reverse: bool,

    /// Woods cost the same as clear terrain
    #[arg(long)]
    pub ignore_woods: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Walk,
    Run,
    Jump,
}

impl From<ModeArg> for MovementMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Walk => MovementMode::Walk,
            ModeArg::Run => MovementMode::Run,
            ModeArg::Jump => MovementMode::Jump,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Mech,
    Tank,
    Hover,
    Infantry,
}

/// Largest generated board edge
pub const MAX_BOARD_SIDE: i64 = 1000;

/// Board edge in `1..=MAX_BOARD_SIDE`
pub fn board_side() -> clap::builder::RangedI64ValueParser<i32> {
    clap::value_parser!(i32).range(1..=MAX_BOARD_SIDE)
}

/// Parse "X,Y" into a location
pub fn parse_location(s: &str) -> Result<Location, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", s))?;
    let x = x.trim().parse().map_err(|e| format!("bad X in '{}': {}", s, e))?;
    let y = y.trim().parse().map_err(|e| format!("bad Y in '{}': {}", s, e))?;
    Ok(Location::new(x, y))
}

// ============================================================================
// LEVEL 2 - LOADING
// ============================================================================

impl ScenarioArgs {
    pub fn load_board(&self) -> Result<HexBoard> {
        if let Some(path) = &self.board {
            let board = HexBoard::load(path)?;
            tracing::info!("Loaded {}x{} board from {}", board.width(), board.height(), path.display());
            return Ok(board);
        }
        let board = match self.seed {
            Some(seed) => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                HexBoard::random(self.width, self.height, TerrainCosts::default(), &mut rng)
            }
            None => HexBoard::uniform(self.width, self.height, TerrainCosts::default()),
        };
        tracing::info!("Generated {}x{} board", self.width, self.height);
        Ok(board)
    }

    pub fn load_config(&self) -> Result<SearchConfig> {
        match &self.config {
            Some(path) => SearchConfig::load(path).context("Could not load search configuration"),
            None => Ok(SearchConfig::default()),
        }
    }

    pub fn build_unit(&self) -> UnitState {
        let base = UnitState::mech(1, 0, self.walk);
        let kind = match self.kind {
            KindArg::Mech => UnitKind::Mech,
            KindArg::Tank => UnitKind::Tank,
            KindArg::Hover => UnitKind::Hover,
            KindArg::Infantry => UnitKind::Infantry,
        };
        let mut capabilities = 0;
        if self.lateral {
            capabilities |= CAP_LATERAL;
        }
        if self.no_reverse {
            capabilities |= CAP_NO_REVERSE;
        }
        if self.ignore_woods {
            capabilities |= CAP_IGNORE_WOODS;
        }
        UnitState {
            kind,
            max_climb: if kind == UnitKind::Mech { 2 } else { 1 },
            ..base
        }
        .with_jump(self.jump)
        .with_prone(self.prone)
        .with_capabilities(capabilities)
    }

    pub fn start_facing(&self) -> Facing {
        Facing::new(self.facing)
    }

    pub fn mode(&self) -> MovementMode {
        self.mode.into()
    }
}

// ============================================================================
// LEVEL 4 - OUTPUT
// ============================================================================

/// JSON form of a path
#[derive(Serialize)]
pub struct PathSummary {
    pub end: Location,
    pub facing: String,
    pub mp_used: u32,
    pub hexes_moved: u32,
    pub steps: Vec<Step>,
}

impl From<&MovePath> for PathSummary {
    fn from(path: &MovePath) -> Self {
        Self {
            end: path.final_location(),
            facing: path.final_facing().to_string(),
            mp_used: path.mp_used(),
            hexes_moved: path.hexes_moved(),
            steps: path.steps(),
        }
    }
}
