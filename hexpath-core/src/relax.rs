//! Edge relaxation: deciding whether a newly found path to a search state
//! beats what is already known there

use crate::compare::PathComparator;
use crate::path::MovePath;

/// Outcome of offering a path to a record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relaxation {
    Accepted,
    Rejected,
}

pub trait Relaxer {
    /// What the best-known map stores per state
    type Record: Default;

    /// Would `relax` reject this candidate right now? Does not modify the record.
    fn is_dominated<C: PathComparator>(&self, record: &Self::Record, candidate: &MovePath, comparator: &C) -> bool;

    /// Merge the candidate into the record if it earns a place there
    fn relax<C: PathComparator>(&self, record: &mut Self::Record, candidate: MovePath, comparator: &C) -> Relaxation;

    /// Paths currently held by the record
    fn paths<'a>(&self, record: &'a Self::Record) -> Vec<&'a MovePath>;
}

// ============================================================================
// SHORTEST
// ============================================================================

/// Keeps the single best path per state; replaces it only on strict improvement
#[derive(Clone, Copy, Debug, Default)]
pub struct ShortestRelaxer;

impl Relaxer for ShortestRelaxer {
    type Record = Option<MovePath>;

    fn is_dominated<C: PathComparator>(&self, record: &Self::Record, candidate: &MovePath, comparator: &C) -> bool {
        match record {
            Some(best) => comparator.rank(candidate) >= comparator.rank(best),
            None => false,
        }
    }

    fn relax<C: PathComparator>(&self, record: &mut Self::Record, candidate: MovePath, comparator: &C) -> Relaxation {
        if self.is_dominated(record, &candidate, comparator) {
            return Relaxation::Rejected;
        }
        *record = Some(candidate);
        Relaxation::Accepted
    }

    fn paths<'a>(&self, record: &'a Self::Record) -> Vec<&'a MovePath> {
        record.iter().collect()
    }
}

// ============================================================================
// LONGEST
// ============================================================================

/// Keeps every path that is not beaten on both distance and cost
#[derive(Clone, Copy, Debug, Default)]
pub struct LongestRelaxer;

/// `a` reaches at least as far for no more movement points
pub fn dominates(a: &MovePath, b: &MovePath) -> bool {
    a.hexes_moved() >= b.hexes_moved() && a.mp_used() <= b.mp_used()
}

impl Relaxer for LongestRelaxer {
    /// Ordered by the comparator's rank, never two mutually dominating entries
    type Record = Vec<MovePath>;

    fn is_dominated<C: PathComparator>(&self, record: &Self::Record, candidate: &MovePath, _comparator: &C) -> bool {
        record.iter().any(|kept| dominates(kept, candidate))
    }

    fn relax<C: PathComparator>(&self, record: &mut Self::Record, candidate: MovePath, comparator: &C) -> Relaxation {
        if self.is_dominated(record, &candidate, comparator) {
            return Relaxation::Rejected;
        }
        record.retain(|kept| !dominates(&candidate, kept));
        let rank = comparator.rank(&candidate);
        let at = record.partition_point(|kept| comparator.rank(kept) <= rank);
        record.insert(at, candidate);
        Relaxation::Accepted
    }

    fn paths<'a>(&self, record: &'a Self::Record) -> Vec<&'a MovePath> {
        record.iter().collect()
    }
}
