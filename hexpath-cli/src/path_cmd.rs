//! Path command - cheapest path for one unit to one hex
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: search(), report()

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use hexpath_core::{HexBoard, Location, PathFinder, PathResult, SearchConfig};

use crate::scenario::{parse_location, PathSummary, ScenarioArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PathArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Destination hex as X,Y
    #[arg(long, value_parser = parse_location)]
    pub to: Location,
}

#[derive(Serialize)]
struct PathReport {
    from: Location,
    to: Location,
    status: String,
    expansions: usize,
    path: Option<PathSummary>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run path command
pub fn run(args: PathArgs) -> Result<()> {
    let board = args.scenario.load_board()?;
    let config = args.scenario.load_config()?;

    let result = search(&args, &board, config)?;
    report(&args, &result)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn search(args: &PathArgs, board: &HexBoard, config: SearchConfig) -> Result<PathResult> {
    let unit = args.scenario.build_unit();
    let finder = PathFinder::new(board, config);
    let result = finder.find_path(
        &unit,
        args.scenario.from,
        args.scenario.start_facing(),
        args.to,
        args.scenario.mode(),
    )?;

    match &result.path {
        Some(path) => tracing::info!(
            "Path {} -> {}: {} MP over {} steps",
            args.scenario.from,
            args.to,
            path.mp_used(),
            path.len()
        ),
        None => tracing::info!("No path {} -> {}", args.scenario.from, args.to),
    }
    if result.status.is_cut_off() {
        tracing::warn!("Search was cut off ({:?}); the path may not be optimal", result.status);
    }
    Ok(result)
}

fn report(args: &PathArgs, result: &PathResult) -> Result<()> {
    let report = PathReport {
        from: args.scenario.from,
        to: args.to,
        status: format!("{:?}", result.status),
        expansions: result.expansions,
        path: result.path.as_ref().map(PathSummary::from),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
