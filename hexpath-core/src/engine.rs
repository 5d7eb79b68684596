//! Generic best-first search
//!
//! One engine serves every search goal. The comparator orders the frontier,
//! the relaxer decides what the best-known map keeps, and the filter chain
//! decides which successors may be pushed at all.
//!
//! ## Loop
//! 1. Check budgets (cut off with partial results if exceeded)
//! 2. Pop the lowest-ranked path
//! 3. Relax it into the record for its state; skip it if rejected
//! 4. Check the stop condition
//! 5. Push every legal, not-yet-dominated successor

use crate::adjacency::successors;
use crate::compare::PathComparator;
use crate::filter::FilterChain;
use crate::path::{MovePath, StateKey};
use crate::relax::{Relaxation, Relaxer};
use crate::terrain::BoardView;
use crate::unit::UnitState;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

// ============================================================================
// CONTEXT
// ============================================================================

/// Read-only collaborators shared by the expander and the filters
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub board: &'a dyn BoardView,
    pub unit: &'a UnitState,
    pub allow_hazards: bool,
}

impl<'a> SearchContext<'a> {
    pub fn new(board: &'a dyn BoardView, unit: &'a UnitState) -> Self {
        Self {
            board,
            unit,
            allow_hazards: false,
        }
    }

    pub fn with_hazards(mut self, allow_hazards: bool) -> Self {
        self.allow_hazards = allow_hazards;
        self
    }
}

// ============================================================================
// STATUS
// ============================================================================

/// Why a search stopped before exhausting its frontier
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CutOff {
    ExpansionBudget,
    TimeBudget,
    /// Internal bound on expansions, hit only when the board misbehaves
    SafetyCeiling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    Ready,
    Running,
    /// Frontier empty: every reachable state was settled
    Exhausted,
    /// Budget exceeded: results are valid but may be suboptimal
    CutOff(CutOff),
    /// The stop condition accepted an expanded path
    Satisfied,
}

impl SearchStatus {
    pub fn is_cut_off(self) -> bool {
        matches!(self, SearchStatus::CutOff(_))
    }
}

/// Ends the search early once an expanded path is good enough
pub trait StopCondition {
    fn should_stop(&self, path: &MovePath, ctx: &SearchContext<'_>) -> bool;
}

/// Optional external budgets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_expansions: Option<usize>,
    pub time_budget: Option<Duration>,
}

// ============================================================================
// FRONTIER
// ============================================================================

struct FrontierEntry<K> {
    rank: K,
    seq: u64,
    path: MovePath,
}

impl<K: Ord> PartialEq for FrontierEntry<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: Ord> Eq for FrontierEntry<K> {}

impl<K: Ord> PartialOrd for FrontierEntry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for FrontierEntry<K> {
    // BinaryHeap is a max-heap: lowest rank, then earliest push, comes out first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .rank
            .cmp(&self.rank)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

// ============================================================================
// OUTCOME
// ============================================================================

/// Best-known map as it stood when the search ended
#[derive(Debug)]
pub struct SearchOutcome<T> {
    pub status: SearchStatus,
    pub expansions: usize,
    pub generated: usize,
    records: FxHashMap<StateKey, T>,
}

impl<T> SearchOutcome<T> {
    pub fn records(&self) -> &FxHashMap<StateKey, T> {
        &self.records
    }

    pub fn into_records(self) -> FxHashMap<StateKey, T> {
        self.records
    }
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct SearchEngine<'a, C: PathComparator, R: Relaxer> {
    ctx: SearchContext<'a>,
    comparator: C,
    relaxer: R,
    filters: FilterChain,
    stop: Option<Box<dyn StopCondition + 'a>>,
    limits: SearchLimits,
    key_by_facing: bool,
    key_by_reverse: bool,
    frontier: BinaryHeap<FrontierEntry<C::Rank>>,
    best: FxHashMap<StateKey, R::Record>,
    status: SearchStatus,
    seq: u64,
    expansions: usize,
    generated: usize,
}

impl<'a, C: PathComparator, R: Relaxer> SearchEngine<'a, C, R> {
    pub fn new(ctx: SearchContext<'a>, comparator: C, relaxer: R) -> Self {
        Self {
            ctx,
            comparator,
            relaxer,
            filters: FilterChain::movement(),
            stop: None,
            limits: SearchLimits::default(),
            key_by_facing: true,
            // Paths that backed up may not go past walking MP, so they cannot
            // stand in for paths that did not
            key_by_reverse: ctx.unit.budget() > ctx.unit.walk_mp,
            frontier: BinaryHeap::new(),
            best: FxHashMap::default(),
            status: SearchStatus::Ready,
            seq: 0,
            expansions: 0,
            generated: 0,
        }
    }

    pub fn with_filters(mut self, filters: FilterChain) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_stop_condition<S: StopCondition + 'a>(mut self, stop: S) -> Self {
        self.stop = Some(Box::new(stop));
        self
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_key_by_facing(mut self, key_by_facing: bool) -> Self {
        self.key_by_facing = key_by_facing;
        self
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Seed the frontier with the zero-step path
    pub fn start(&mut self, mut root: MovePath) {
        if self.filters.check(&mut root, &self.ctx) {
            self.push(root);
        }
        self.status = SearchStatus::Ready;
    }

    /// Seed and run to completion
    pub fn search(mut self, root: MovePath) -> SearchOutcome<R::Record> {
        self.start(root);
        self.run()
    }

    /// Drive the search until the frontier empties, a budget runs out or the
    /// stop condition fires
    pub fn run(mut self) -> SearchOutcome<R::Record> {
        self.status = SearchStatus::Running;
        let started = Instant::now();
        let ceiling = self.safety_ceiling();

        while self.status == SearchStatus::Running {
            if self.frontier.is_empty() {
                self.status = SearchStatus::Exhausted;
                break;
            }
            if let Some(reason) = self.cut_off(started, ceiling) {
                self.status = SearchStatus::CutOff(reason);
                break;
            }
            let Some(entry) = self.frontier.pop() else {
                continue;
            };
            self.settle(entry.path);
        }

        tracing::debug!(
            "Search from unit {} finished: {:?}, {} expansions, {} generated, {} states",
            self.ctx.unit.id,
            self.status,
            self.expansions,
            self.generated,
            self.best.len()
        );

        SearchOutcome {
            status: self.status,
            expansions: self.expansions,
            generated: self.generated,
            records: self.best,
        }
    }

    /// Relax a popped path and expand it if it was accepted
    fn settle(&mut self, path: MovePath) {
        if !path.is_legal() {
            return;
        }

        let key = path.state_key(self.key_by_facing, self.key_by_reverse);
        let record = self.best.entry(key).or_default();
        if self.relaxer.relax(record, path.clone(), &self.comparator) == Relaxation::Rejected {
            return;
        }
        self.expansions += 1;
        tracing::trace!(
            "Expanding {} facing {} at {} MP, {} hexes",
            path.final_location(),
            path.final_facing(),
            path.mp_used(),
            path.hexes_moved()
        );

        if let Some(stop) = &self.stop {
            if stop.should_stop(&path, &self.ctx) {
                self.status = SearchStatus::Satisfied;
                return;
            }
        }

        self.expand(&path);
    }

    fn expand(&mut self, path: &MovePath) {
        let candidates: Vec<MovePath> = successors(path, &self.ctx).collect();
        for mut next in candidates {
            self.generated += 1;
            if !self.filters.check(&mut next, &self.ctx) {
                continue;
            }
            let key = next.state_key(self.key_by_facing, self.key_by_reverse);
            if let Some(record) = self.best.get(&key) {
                if self.relaxer.is_dominated(record, &next, &self.comparator) {
                    continue;
                }
            }
            self.push(next);
        }
    }

    fn push(&mut self, path: MovePath) {
        let rank = self.comparator.rank(&path);
        self.seq += 1;
        self.frontier.push(FrontierEntry {
            rank,
            seq: self.seq,
            path,
        });
    }

    fn cut_off(&self, started: Instant, ceiling: usize) -> Option<CutOff> {
        if let Some(max) = self.limits.max_expansions {
            if self.expansions >= max {
                return Some(CutOff::ExpansionBudget);
            }
        }
        if let Some(budget) = self.limits.time_budget {
            if started.elapsed() >= budget {
                return Some(CutOff::TimeBudget);
            }
        }
        if self.expansions >= ceiling {
            tracing::warn!(
                "Search for unit {} hit the safety ceiling of {} expansions; check board step costs",
                self.ctx.unit.id,
                ceiling
            );
            return Some(CutOff::SafetyCeiling);
        }
        None
    }

    /// Every (hex, facing, posture, reversed) state can be accepted at most
    /// once per distinct MP total when costs are honest; allow a margin on top
    fn safety_ceiling(&self) -> usize {
        let states = self.ctx.board.location_count().max(1) * 6 * 2 * 2;
        let budget = self.ctx.unit.budget() as usize + 1;
        states.saturating_mul(budget).saturating_mul(4)
    }
}
