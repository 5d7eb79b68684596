//! Path queries: the entry points callers use
//!
//! - `find_path`: cheapest path to one hex (shortest-cost goal)
//! - `find_all_paths`: non-dominated paths to every reachable hex
//!   (longest-distance goal)
//! - `find_all_paths_batch`: one range query per unit, in parallel with the
//!   `parallel` feature

use crate::board::{Facing, Location};
use crate::compare::{GoalDirectedComparator, LongestDistanceComparator, MinimumCostComparator, PathComparator};
use crate::config::SearchConfig;
use crate::engine::{SearchContext, SearchEngine, SearchLimits, SearchStatus, StopCondition};
use crate::error::{PathError, Result};
use crate::filter::FilterChain;
use crate::path::{MovePath, StateKey};
use crate::relax::{LongestRelaxer, Relaxer, ShortestRelaxer};
use crate::terrain::BoardView;
use crate::unit::{MovementMode, UnitState};
use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// ============================================================================
// RESULTS
// ============================================================================

/// Outcome of a single-destination query
#[derive(Clone, Debug)]
pub struct PathResult {
    /// `None` when the goal cannot be reached: not an error
    pub path: Option<MovePath>,
    pub status: SearchStatus,
    pub expansions: usize,
}

/// Outcome of a range query
#[derive(Clone, Debug)]
pub struct ReachableSet {
    pub status: SearchStatus,
    pub expansions: usize,
    by_location: BTreeMap<Location, Vec<MovePath>>,
    by_state: BTreeMap<StateKey, Vec<MovePath>>,
}

impl ReachableSet {
    /// Non-dominated paths to `location`, cheapest first
    pub fn paths_to(&self, location: Location) -> &[MovePath] {
        self.by_location
            .get(&location)
            .map_or(&[], |paths| paths.as_slice())
    }

    pub fn contains(&self, location: Location) -> bool {
        self.by_location.contains_key(&location)
    }

    pub fn cheapest(&self, location: Location) -> Option<&MovePath> {
        self.paths_to(location).first()
    }

    /// Path to `location` that moved through the most hexes
    pub fn farthest(&self, location: Location) -> Option<&MovePath> {
        self.paths_to(location).last()
    }

    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        self.by_location.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Location, &[MovePath])> + '_ {
        self.by_location.iter().map(|(&loc, paths)| (loc, paths.as_slice()))
    }

    /// Results before merging facings, for callers that care how a unit ends up facing
    pub fn states(&self) -> impl Iterator<Item = (&StateKey, &[MovePath])> + '_ {
        self.by_state.iter().map(|(key, paths)| (key, paths.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.by_location.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_location.is_empty()
    }
}

/// One unit's range query
#[derive(Clone, Debug)]
pub struct RangeRequest {
    pub unit: UnitState,
    pub start: Location,
    pub facing: Facing,
    pub mode: MovementMode,
}

// ============================================================================
// STOP CONDITION
// ============================================================================

/// Goal hex reached in a state where the unit may stop
struct GoalReached {
    goal: Location,
    terminal: FilterChain,
}

impl StopCondition for GoalReached {
    fn should_stop(&self, path: &MovePath, ctx: &SearchContext<'_>) -> bool {
        path.final_location() == self.goal && self.terminal.should_stay(path, ctx)
    }
}

// ============================================================================
// FINDER
// ============================================================================

pub struct PathFinder<'a> {
    board: &'a dyn BoardView,
    config: SearchConfig,
}

impl<'a> PathFinder<'a> {
    pub fn new(board: &'a dyn BoardView, config: SearchConfig) -> Self {
        Self { board, config }
    }

    pub fn board(&self) -> &'a dyn BoardView {
        self.board
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Cheapest path from `start` to `goal`
    pub fn find_path(
        &self,
        unit: &UnitState,
        start: Location,
        facing: Facing,
        goal: Location,
        mode: MovementMode,
    ) -> Result<PathResult> {
        let unit = self.prepare(unit, start, mode)?;
        if !self.board.contains(goal) {
            return Err(PathError::GoalOffBoard(goal));
        }

        let ctx = self.context(&unit);
        let root = MovePath::new(start, facing, unit.prone);
        let result = if self.config.goal_heuristic {
            let comparator = GoalDirectedComparator::new(goal, self.board.min_hex_cost(&unit));
            self.shortest(ctx, comparator, root, goal)
        } else {
            self.shortest(ctx, MinimumCostComparator, root, goal)
        };

        tracing::debug!(
            "find_path {} -> {} for unit {}: {:?}, {}",
            start,
            goal,
            unit.id,
            result.status,
            result
                .path
                .as_ref()
                .map_or("no path".to_string(), |p| format!("{} MP", p.mp_used()))
        );
        Ok(result)
    }

    /// Every hex the unit can end its move in, with the non-dominated paths there
    pub fn find_all_paths(
        &self,
        unit: &UnitState,
        start: Location,
        facing: Facing,
        mode: MovementMode,
    ) -> Result<ReachableSet> {
        let unit = self.prepare(unit, start, mode)?;
        let ctx = self.context(&unit);
        let root = MovePath::new(start, facing, unit.prone);

        let comparator = LongestDistanceComparator;
        let relaxer = LongestRelaxer;
        let outcome = SearchEngine::new(ctx, comparator, relaxer)
            .with_key_by_facing(self.config.key_by_facing)
            .with_limits(self.limits())
            .search(root);
        let status = outcome.status;
        let expansions = outcome.expansions;

        let terminal = FilterChain::terminal();
        let mut records: Vec<(StateKey, Vec<MovePath>)> = outcome.into_records().into_iter().collect();
        records.sort_by_key(|(key, _)| *key);

        let mut by_state = BTreeMap::new();
        let mut by_location: BTreeMap<Location, Vec<MovePath>> = BTreeMap::new();
        for (key, paths) in records {
            let stoppable: Vec<MovePath> = paths
                .into_iter()
                .filter(|path| terminal.should_stay(path, &ctx))
                .collect();
            if stoppable.is_empty() {
                continue;
            }
            let merged = by_location.entry(key.location).or_default();
            for path in &stoppable {
                relaxer.relax(merged, path.clone(), &comparator);
            }
            by_state.insert(key, stoppable);
        }

        tracing::debug!(
            "find_all_paths from {} for unit {}: {:?}, {} hexes reachable",
            start,
            unit.id,
            status,
            by_location.len()
        );

        Ok(ReachableSet {
            status,
            expansions,
            by_location,
            by_state,
        })
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    /// Validate input and pin the unit to the requested mode
    fn prepare(&self, unit: &UnitState, start: Location, mode: MovementMode) -> Result<UnitState> {
        if !self.board.contains(start) {
            return Err(PathError::StartOffBoard(start));
        }
        let unit = unit.clone().with_mode(mode);
        if unit.is_immobile() {
            return Err(PathError::Immobile {
                unit_id: unit.id,
                mode,
            });
        }
        Ok(unit)
    }

    fn context<'u>(&self, unit: &'u UnitState) -> SearchContext<'u>
    where
        'a: 'u,
    {
        SearchContext::new(self.board, unit).with_hazards(self.config.allow_hazards)
    }

    fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_expansions: self.config.max_expansions,
            time_budget: self.config.time_budget(),
        }
    }

    fn shortest<C: PathComparator>(
        &self,
        ctx: SearchContext<'_>,
        comparator: C,
        root: MovePath,
        goal: Location,
    ) -> PathResult {
        let stop = GoalReached {
            goal,
            terminal: FilterChain::terminal(),
        };
        let outcome = SearchEngine::new(ctx, comparator, ShortestRelaxer)
            .with_key_by_facing(self.config.key_by_facing)
            .with_limits(self.limits())
            .with_stop_condition(stop)
            .search(root);

        let terminal = FilterChain::terminal();
        let cmp = MinimumCostComparator;
        let path = outcome
            .records()
            .iter()
            .filter(|(key, _)| key.location == goal)
            .flat_map(|(key, record)| ShortestRelaxer.paths(record).into_iter().map(move |p| (key, p)))
            .filter(|(_, path)| terminal.should_stay(path, &ctx))
            .min_by(|(ka, a), (kb, b)| cmp.compare(a, b).then_with(|| ka.cmp(kb)))
            .map(|(_, path)| path.clone());

        PathResult {
            path,
            status: outcome.status,
            expansions: outcome.expansions,
        }
    }
}

/// Range queries for several units over one shared, read-only board
pub fn find_all_paths_batch<B: BoardView + Sync>(
    board: &B,
    requests: &[RangeRequest],
    config: &SearchConfig,
) -> Vec<Result<ReachableSet>> {
    let run = |request: &RangeRequest| {
        PathFinder::new(board, config.clone()).find_all_paths(
            &request.unit,
            request.start,
            request.facing,
            request.mode,
        )
    };

    #[cfg(feature = "parallel")]
    {
        requests.par_iter().map(run).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        requests.iter().map(run).collect()
    }
}
