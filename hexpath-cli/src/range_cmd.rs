//! Range command - every hex a unit can reach
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: search(), report()
//! - Level 3: summarize()

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use hexpath_core::{HexBoard, Location, PathFinder, ReachableSet, SearchConfig};

use crate::scenario::{PathSummary, ScenarioArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct RangeArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Include full step lists for every path
    #[arg(long)]
    pub steps: bool,
}

#[derive(Serialize)]
struct RangeReport {
    from: Location,
    status: String,
    expansions: usize,
    reachable: Vec<HexEntry>,
}

#[derive(Serialize)]
struct HexEntry {
    location: Location,
    cheapest_mp: u32,
    most_hexes: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    paths: Vec<PathSummary>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run range command
pub fn run(args: RangeArgs) -> Result<()> {
    let board = args.scenario.load_board()?;
    let config = args.scenario.load_config()?;

    let reachable = search(&args, &board, config)?;
    report(&args, &reachable)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn search(args: &RangeArgs, board: &HexBoard, config: SearchConfig) -> Result<ReachableSet> {
    let unit = args.scenario.build_unit();
    let finder = PathFinder::new(board, config);
    let reachable = finder.find_all_paths(
        &unit,
        args.scenario.from,
        args.scenario.start_facing(),
        args.scenario.mode(),
    )?;

    tracing::info!(
        "{} hexes reachable from {} ({} expansions)",
        reachable.len(),
        args.scenario.from,
        reachable.expansions
    );
    if reachable.status.is_cut_off() {
        tracing::warn!("Search was cut off ({:?}); the range may be incomplete", reachable.status);
    }
    Ok(reachable)
}

fn report(args: &RangeArgs, reachable: &ReachableSet) -> Result<()> {
    let report = RangeReport {
        from: args.scenario.from,
        status: format!("{:?}", reachable.status),
        expansions: reachable.expansions,
        reachable: summarize(reachable, args.steps),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn summarize(reachable: &ReachableSet, with_steps: bool) -> Vec<HexEntry> {
    reachable
        .iter()
        .map(|(location, paths)| HexEntry {
            location,
            cheapest_mp: paths.iter().map(|p| p.mp_used()).min().unwrap_or(0),
            most_hexes: paths.iter().map(|p| p.hexes_moved()).max().unwrap_or(0),
            paths: if with_steps {
                paths.iter().map(PathSummary::from).collect()
            } else {
                Vec::new()
            },
        })
        .collect()
}
