//! HEXPATH Core - Movement path search for hex wargames
//!
//! This crate provides the movement core:
//! - Board geometry (flat-topped hexes, offset coordinates, facings)
//! - The board oracle trait and a reference terrain map
//! - Paths, successor generation and legality filters
//! - Comparators and relaxers for shortest-cost and longest-distance goals
//! - A generic best-first search engine and the query API built on it

pub mod board;
pub mod unit;
pub mod step;
pub mod terrain;
pub mod path;
pub mod adjacency;
pub mod filter;
pub mod compare;
pub mod relax;
pub mod engine;
pub mod finder;
pub mod cache;
pub mod config;
pub mod error;

// Re-exports for convenient access
pub use board::{Facing, Location, DIRECTIONS};
pub use unit::{MovementMode, UnitKind, UnitState, CAP_IGNORE_WOODS, CAP_LATERAL, CAP_NO_REVERSE};
pub use step::{Step, StepKind};
pub use terrain::{BoardView, HexBoard, HexTile, Occupant, TerrainCosts, TerrainKind};
pub use path::{MovePath, StateKey};
pub use filter::{FilterChain, PathFilter};
pub use compare::{GoalDirectedComparator, LongestDistanceComparator, MinimumCostComparator, PathComparator};
pub use relax::{dominates, LongestRelaxer, Relaxation, Relaxer, ShortestRelaxer};
pub use engine::{CutOff, SearchContext, SearchEngine, SearchLimits, SearchOutcome, SearchStatus, StopCondition};
pub use finder::{find_all_paths_batch, PathFinder, PathResult, RangeRequest, ReachableSet};
pub use cache::PathCache;
pub use config::SearchConfig;
pub use error::PathError;
