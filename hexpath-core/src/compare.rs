//! Path orderings
//!
//! A comparator turns a path into a rank; the frontier pops the lowest rank
//! first. Ranks are total orders so search order is reproducible.

use crate::board::Location;
use crate::path::MovePath;
use std::cmp::{Ordering, Reverse};

pub trait PathComparator {
    type Rank: Ord + Copy;

    fn rank(&self, path: &MovePath) -> Self::Rank;

    fn compare(&self, a: &MovePath, b: &MovePath) -> Ordering {
        self.rank(a).cmp(&self.rank(b))
    }
}

/// Cheapest first, then fewest steps
#[derive(Clone, Copy, Debug, Default)]
pub struct MinimumCostComparator;

impl PathComparator for MinimumCostComparator {
    type Rank = (u32, u32);

    fn rank(&self, path: &MovePath) -> Self::Rank {
        (path.mp_used(), path.len())
    }
}

/// Cheapest first; at equal cost the path that covered more hexes first
#[derive(Clone, Copy, Debug, Default)]
pub struct LongestDistanceComparator;

impl PathComparator for LongestDistanceComparator {
    type Rank = (u32, Reverse<u32>, u32);

    fn rank(&self, path: &MovePath) -> Self::Rank {
        (path.mp_used(), Reverse(path.hexes_moved()), path.len())
    }
}

/// A*: cost so far plus a lower bound on the cost to reach `goal`
#[derive(Clone, Copy, Debug)]
pub struct GoalDirectedComparator {
    goal: Location,
    per_hex: u32,
}

impl GoalDirectedComparator {
    /// `per_hex` must not exceed the cheapest possible hex-changing step
    pub fn new(goal: Location, per_hex: u32) -> Self {
        Self { goal, per_hex }
    }

    fn estimate(&self, path: &MovePath) -> u32 {
        path.final_location().distance_to(self.goal) * self.per_hex
    }
}

impl PathComparator for GoalDirectedComparator {
    type Rank = (u32, u32, u32);

    fn rank(&self, path: &MovePath) -> Self::Rank {
        (path.mp_used() + self.estimate(path), path.mp_used(), path.len())
    }
}
