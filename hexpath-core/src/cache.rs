//! Memoised single-destination queries
//!
//! The search itself keeps nothing between calls. Callers that ask the same
//! question many times in one turn (AI move generation, UI hover) wrap a
//! finder in a `PathCache`. Entries are dropped when the board's revision
//! changes or on an explicit `invalidate`.

use crate::board::{Facing, Location};
use crate::error::Result;
use crate::finder::PathFinder;
use crate::path::MovePath;
use crate::unit::{MovementMode, UnitState};
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    start: Location,
    facing: Facing,
    goal: Location,
    mode: MovementMode,
    snapshot: u64,
}

#[derive(Debug, Default)]
pub struct PathCache {
    revision: Option<u64>,
    entries: FxHashMap<CacheKey, Option<MovePath>>,
    hits: usize,
    misses: usize,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached `find_path`; searches that were cut off are not remembered
    pub fn find_path(
        &mut self,
        finder: &PathFinder<'_>,
        unit: &UnitState,
        start: Location,
        facing: Facing,
        goal: Location,
        mode: MovementMode,
    ) -> Result<Option<MovePath>> {
        let revision = finder.board().revision();
        if self.revision != Some(revision) {
            self.entries.clear();
            self.revision = Some(revision);
        }

        let key = CacheKey {
            start,
            facing,
            goal,
            mode,
            snapshot: snapshot_hash(unit, finder),
        };
        if let Some(path) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(path.clone());
        }

        self.misses += 1;
        let result = finder.find_path(unit, start, facing, goal, mode)?;
        if !result.status.is_cut_off() {
            self.entries.insert(key, result.path.clone());
        }
        Ok(result.path)
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
        self.revision = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

fn snapshot_hash(unit: &UnitState, finder: &PathFinder<'_>) -> u64 {
    let mut hasher = FxHasher::default();
    unit.hash(&mut hasher);
    finder.config().hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::terrain::{HexBoard, HexTile, TerrainCosts, TerrainKind};

    #[test]
    fn test_repeat_query_hits() {
        let board = HexBoard::uniform(16, 9, TerrainCosts::default());
        let finder = PathFinder::new(&board, SearchConfig::default());
        let unit = UnitState::mech(1, 0, 5);
        let mut cache = PathCache::new();

        let first = cache
            .find_path(&finder, &unit, Location::new(3, 4), Facing::N, Location::new(3, 2), MovementMode::Walk)
            .unwrap();
        let second = cache
            .find_path(&finder, &unit, Location::new(3, 4), Facing::N, Location::new(3, 2), MovementMode::Walk)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }

    #[test]
    fn test_different_unit_state_misses() {
        let board = HexBoard::uniform(16, 9, TerrainCosts::default());
        let finder = PathFinder::new(&board, SearchConfig::default());
        let mut cache = PathCache::new();
        let goal = Location::new(3, 2);

        for unit in [UnitState::mech(1, 0, 5), UnitState::mech(1, 0, 5).with_prone(true)] {
            cache
                .find_path(&finder, &unit, Location::new(3, 4), Facing::N, goal, MovementMode::Walk)
                .unwrap();
        }
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_board_change_invalidates() {
        let mut board = HexBoard::uniform(16, 9, TerrainCosts::default());
        let unit = UnitState::mech(1, 0, 5);
        let mut cache = PathCache::new();
        let (start, goal) = (Location::new(3, 4), Location::new(3, 2));

        {
            let finder = PathFinder::new(&board, SearchConfig::default());
            let path = cache.find_path(&finder, &unit, start, Facing::N, goal, MovementMode::Walk).unwrap();
            assert_eq!(path.map(|p| p.mp_used()), Some(2));
        }

        board.set_tile(Location::new(3, 3), HexTile::new(TerrainKind::Rough, 0));
        let finder = PathFinder::new(&board, SearchConfig::default());
        let path = cache.find_path(&finder, &unit, start, Facing::N, goal, MovementMode::Walk).unwrap();
        assert_eq!(path.map(|p| p.mp_used()), Some(3));
        assert_eq!(cache.hits(), 0);

        cache.invalidate();
        assert!(cache.is_empty());
    }
}
