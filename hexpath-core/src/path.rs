//! Movement paths
//!
//! A `MovePath` is a value: extending it returns a new path that shares the
//! parent's steps through reference-counted links, so cloning and extending
//! are cheap and frontier entries never change once pushed.

use crate::board::{Facing, Location};
use crate::compare::PathComparator;
use crate::step::{Step, StepKind};
use crate::terrain::BoardView;
use crate::unit::UnitState;
use std::cmp::Ordering;
use std::sync::Arc;

#[derive(Debug, PartialEq, Eq)]
struct StepLink {
    step: Step,
    prev: Option<Arc<StepLink>>,
}

impl Drop for StepLink {
    // Unlink iteratively so dropping a very long path cannot overflow the stack
    fn drop(&mut self) {
        let mut prev = self.prev.take();
        while let Some(link) = prev {
            match Arc::try_unwrap(link) {
                Ok(mut inner) => prev = inner.prev.take(),
                Err(_) => break,
            }
        }
    }
}

/// Best-known map key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey {
    pub location: Location,
    pub facing: Option<Facing>,
    pub prone: bool,
    /// Has backed up at least once, which caps the rest of the move at walking MP
    pub reversed: bool,
}

/// An ordered sequence of steps from a unit's start state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovePath {
    origin: Location,
    origin_facing: Facing,
    location: Location,
    facing: Facing,
    prone: bool,
    mp_used: u32,
    hexes_moved: u32,
    len: u32,
    backward_steps: u32,
    legal: bool,
    last: Option<Arc<StepLink>>,
}

impl MovePath {
    /// Zero-step path at the unit's current position
    pub fn new(origin: Location, facing: Facing, prone: bool) -> Self {
        Self {
            origin,
            origin_facing: facing,
            location: origin,
            facing,
            prone,
            mp_used: 0,
            hexes_moved: 0,
            len: 0,
            backward_steps: 0,
            legal: true,
            last: None,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn origin(&self) -> Location {
        self.origin
    }

    pub fn origin_facing(&self) -> Facing {
        self.origin_facing
    }

    pub fn final_location(&self) -> Location {
        self.location
    }

    pub fn final_facing(&self) -> Facing {
        self.facing
    }

    pub fn is_prone(&self) -> bool {
        self.prone
    }

    /// Total movement points spent
    pub fn mp_used(&self) -> u32 {
        self.mp_used
    }

    /// Steps that changed hex (turns and standing up do not count)
    pub fn hexes_moved(&self) -> u32 {
        self.hexes_moved
    }

    /// Number of steps
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn backward_steps(&self) -> u32 {
        self.backward_steps
    }

    /// False once any prefix of this path was rejected by a filter chain
    pub fn is_legal(&self) -> bool {
        self.legal
    }

    pub(crate) fn mark_illegal(&mut self) {
        self.legal = false;
    }

    pub fn last_step(&self) -> Option<&Step> {
        self.last.as_deref().map(|link| &link.step)
    }

    /// Steps in the order they are taken
    pub fn steps(&self) -> Vec<Step> {
        let mut steps = Vec::with_capacity(self.len as usize);
        let mut link = self.last.as_deref();
        while let Some(current) = link {
            steps.push(current.step);
            link = current.prev.as_deref();
        }
        steps.reverse();
        steps
    }

    /// `by_reverse` splits states on whether the path has backed up yet; it
    /// is only needed when the unit may spend more than its walking MP
    pub fn state_key(&self, by_facing: bool, by_reverse: bool) -> StateKey {
        StateKey {
            location: self.location,
            facing: by_facing.then_some(self.facing),
            prone: self.prone,
            reversed: by_reverse && self.backward_steps > 0,
        }
    }

    /// Order two paths under a search goal
    pub fn compare_for_goal<C: PathComparator>(&self, comparator: &C, other: &MovePath) -> Ordering {
        comparator.compare(self, other)
    }

    // ========================================================================
    // EXTENSION
    // ========================================================================

    /// Path with one more step, or `None` if the step cannot be taken from
    /// this path's end state.
    pub fn extend(&self, kind: StepKind, board: &dyn BoardView, unit: &UnitState) -> Option<MovePath> {
        match kind {
            StepKind::GetUp if !self.prone => return None,
            StepKind::GetUp => {}
            _ if self.prone => return None,
            _ => {}
        }

        let (to, facing) = kind.apply(self.location, self.facing);
        if kind.changes_location() && !board.contains(to) {
            return None;
        }

        let raw = board.step_cost(self.location, self.facing, kind, unit);
        let cost = if raw < 0 {
            tracing::warn!(
                "Board returned negative cost {} for {:?} from {}; charging 0",
                raw,
                kind,
                self.location
            );
            0
        } else {
            raw as u32
        };

        let step = Step {
            kind,
            cost,
            from: self.location,
            to,
            facing,
        };

        Some(MovePath {
            origin: self.origin,
            origin_facing: self.origin_facing,
            location: to,
            facing,
            prone: self.prone && kind != StepKind::GetUp,
            mp_used: self.mp_used.saturating_add(cost),
            hexes_moved: self.hexes_moved + u32::from(kind.changes_location()),
            len: self.len + 1,
            backward_steps: self.backward_steps + u32::from(kind == StepKind::Backward),
            legal: self.legal,
            last: Some(Arc::new(StepLink {
                step,
                prev: self.last.clone(),
            })),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{HexBoard, TerrainCosts};

    /// Board that charges whatever it is told to, including nonsense
    struct FixedCost(i32);

    impl BoardView for FixedCost {
        fn contains(&self, location: Location) -> bool {
            location.x.abs() < 10 && location.y.abs() < 10
        }
        fn is_passable(&self, _location: Location, _unit: &UnitState) -> bool {
            true
        }
        fn step_cost(&self, _from: Location, _facing: Facing, _step: StepKind, _unit: &UnitState) -> i32 {
            self.0
        }
        fn location_count(&self) -> usize {
            361
        }
    }

    #[test]
    fn test_zero_step_path() {
        let path = MovePath::new(Location::new(3, 4), Facing::N, false);
        assert_eq!(path.mp_used(), 0);
        assert_eq!(path.hexes_moved(), 0);
        assert!(path.is_empty());
        assert!(path.steps().is_empty());
        assert_eq!(path.final_location(), path.origin());
    }

    #[test]
    fn test_extend_tracks_derived_state() {
        let board = HexBoard::uniform(16, 9, TerrainCosts::default());
        let unit = UnitState::mech(1, 0, 5);
        let start = MovePath::new(Location::new(3, 4), Facing::N, false);

        let path = start
            .extend(StepKind::Forward, &board, &unit)
            .and_then(|p| p.extend(StepKind::TurnRight, &board, &unit))
            .and_then(|p| p.extend(StepKind::Backward, &board, &unit))
            .unwrap();

        assert_eq!(path.len(), 3);
        assert_eq!(path.hexes_moved(), 2);
        assert_eq!(path.mp_used(), 3);
        assert_eq!(path.backward_steps(), 1);
        assert_eq!(path.final_facing(), Facing::NE);
        let kinds: Vec<_> = path.steps().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![StepKind::Forward, StepKind::TurnRight, StepKind::Backward]);

        // Parent is untouched
        assert!(start.is_empty());
    }

    #[test]
    fn test_extend_shares_prefix() {
        let board = HexBoard::uniform(16, 9, TerrainCosts::default());
        let unit = UnitState::mech(1, 0, 5);
        let base = MovePath::new(Location::new(3, 4), Facing::N, false)
            .extend(StepKind::Forward, &board, &unit)
            .unwrap();
        let left = base.extend(StepKind::TurnLeft, &board, &unit).unwrap();
        let right = base.extend(StepKind::TurnRight, &board, &unit).unwrap();

        assert_eq!(left.steps()[0], right.steps()[0]);
        assert_eq!(base.len(), 1);
    }

    #[test]
    fn test_cannot_leave_board() {
        let board = HexBoard::uniform(16, 9, TerrainCosts::default());
        let unit = UnitState::mech(1, 0, 5);
        let edge = MovePath::new(Location::new(3, 1), Facing::N, false);
        assert!(edge.extend(StepKind::Forward, &board, &unit).is_none());
        assert!(edge.extend(StepKind::TurnLeft, &board, &unit).is_some());
    }

    #[test]
    fn test_prone_must_get_up_first() {
        let board = HexBoard::uniform(16, 9, TerrainCosts::default());
        let unit = UnitState::mech(1, 0, 5).with_prone(true);
        let prone = MovePath::new(Location::new(5, 5), Facing::N, true);

        assert!(prone.extend(StepKind::Forward, &board, &unit).is_none());
        let up = prone.extend(StepKind::GetUp, &board, &unit).unwrap();
        assert!(!up.is_prone());
        assert_eq!(up.mp_used(), 2);
        assert_eq!(up.hexes_moved(), 0);
        assert!(up.extend(StepKind::GetUp, &board, &unit).is_none());
    }

    #[test]
    fn test_cost_never_decreases() {
        let unit = UnitState::mech(1, 0, 5);
        for cost in [-3, 0, 2] {
            let board = FixedCost(cost);
            let mut path = MovePath::new(Location::new(0, 0), Facing::N, false);
            for kind in StepKind::GROUND {
                let before = path.mp_used();
                path = path.extend(kind, &board, &unit).unwrap();
                assert!(path.mp_used() >= before);
            }
        }
    }

    #[test]
    fn test_state_key() {
        let path = MovePath::new(Location::new(2, 2), Facing::S, false);
        assert_eq!(path.state_key(true, true).facing, Some(Facing::S));
        assert_eq!(path.state_key(false, true).facing, None);
    }

    #[test]
    fn test_state_key_tracks_reversing() {
        let board = HexBoard::uniform(16, 9, TerrainCosts::default());
        let unit = UnitState::mech(1, 0, 5);
        let start = MovePath::new(Location::new(5, 5), Facing::N, false);
        let backed = start
            .extend(StepKind::Backward, &board, &unit)
            .and_then(|p| p.extend(StepKind::Forward, &board, &unit))
            .unwrap();

        assert_eq!(backed.final_location(), start.final_location());
        assert!(backed.state_key(true, true).reversed);
        assert_ne!(backed.state_key(true, true), start.state_key(true, true));
        assert_eq!(backed.state_key(true, false), start.state_key(true, false));
    }
}
