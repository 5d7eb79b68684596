//! Atomic movement steps

use crate::board::{Facing, Location, FORWARD_LEFT, FORWARD_RIGHT};
use serde::{Deserialize, Serialize};

/// Step kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    /// Side-step into the forward-left hex, keeping facing
    LateralLeft,
    /// Side-step into the forward-right hex, keeping facing
    LateralRight,
    /// One hex of a jump in an absolute direction; the unit ends facing it
    Jump(Facing),
    /// Stand up from prone
    GetUp,
}

impl StepKind {
    /// Walking/running step kinds in the order they are offered
    pub const GROUND: [StepKind; 4] = [
        StepKind::Forward,
        StepKind::TurnLeft,
        StepKind::TurnRight,
        StepKind::Backward,
    ];

    pub const LATERAL: [StepKind; 2] = [StepKind::LateralLeft, StepKind::LateralRight];

    /// Location and facing after taking this step
    pub fn apply(self, location: Location, facing: Facing) -> (Location, Facing) {
        match self {
            StepKind::Forward => (location.neighbor(facing), facing),
            StepKind::Backward => (location.neighbor(facing.opposite()), facing),
            StepKind::TurnLeft => (location, facing.turn_left()),
            StepKind::TurnRight => (location, facing.turn_right()),
            StepKind::LateralLeft => (location.neighbor(facing.relative(FORWARD_LEFT)), facing),
            StepKind::LateralRight => (location.neighbor(facing.relative(FORWARD_RIGHT)), facing),
            StepKind::Jump(direction) => (location.neighbor(direction), direction),
            StepKind::GetUp => (location, facing),
        }
    }

    /// Whether the step moves the unit into another hex
    pub fn changes_location(self) -> bool {
        !matches!(self, StepKind::TurnLeft | StepKind::TurnRight | StepKind::GetUp)
    }

    pub fn is_turn(self) -> bool {
        matches!(self, StepKind::TurnLeft | StepKind::TurnRight)
    }

    pub fn is_lateral(self) -> bool {
        matches!(self, StepKind::LateralLeft | StepKind::LateralRight)
    }

    pub fn is_jump(self) -> bool {
        matches!(self, StepKind::Jump(_))
    }

    /// A step that walks, runs or side-steps into a new hex (not a jump)
    pub fn is_ground_move(self) -> bool {
        self.changes_location() && !self.is_jump()
    }
}

/// A step as applied to a path, with the cost it was charged
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    pub kind: StepKind,
    pub cost: u32,
    pub from: Location,
    pub to: Location,
    pub facing: Facing,
}
