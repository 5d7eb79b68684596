//! Errors surfaced to callers of the path finders
//!
//! Only invalid input is an error. An unreachable goal or an exhausted
//! search budget come back as ordinary results.

use crate::board::Location;
use crate::unit::MovementMode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("Start location {0} is not on the board")]
    StartOffBoard(Location),

    #[error("Goal location {0} is not on the board")]
    GoalOffBoard(Location),

    #[error("Unit {unit_id} cannot move in {mode:?} mode")]
    Immobile { unit_id: u32, mode: MovementMode },
}

pub type Result<T> = std::result::Result<T, PathError>;
