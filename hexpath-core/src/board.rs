//! Hex board geometry with offset coordinates
//!
//! Hexes are flat-topped. Columns run along `x`, rows along `y`, and odd
//! columns sit half a hex lower than even ones. Neighbour and distance
//! calculations go through axial coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=N, 1=NE, 2=SE, 3=S, 4=SW, 5=NW
pub const DIRECTIONS: [(i32, i32); 6] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // NW
];

/// Relative directions from facing
pub const FORWARD: u8 = 0;
pub const FORWARD_RIGHT: u8 = 1;
pub const BACK_RIGHT: u8 = 2;
pub const BACKWARD: u8 = 3;
pub const BACK_LEFT: u8 = 4;
pub const FORWARD_LEFT: u8 = 5;

/// A hex on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn to_axial(self) -> (i32, i32) {
        let q = self.x;
        let r = self.y - (self.x - (self.x & 1)) / 2;
        (q, r)
    }

    fn from_axial(q: i32, r: i32) -> Self {
        Self::new(q, r + (q - (q & 1)) / 2)
    }

    /// Distance between two hexes, in hexes
    pub fn distance_to(&self, other: Location) -> u32 {
        let (q1, r1) = self.to_axial();
        let (q2, r2) = other.to_axial();
        let dq = (q1 - q2).abs();
        let dr = (r1 - r2).abs();
        let ds = ((q1 + r1) - (q2 + r2)).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// Get neighbor in an absolute direction
    pub fn neighbor(&self, direction: Facing) -> Location {
        let (q, r) = self.to_axial();
        let (dq, dr) = DIRECTIONS[direction.index()];
        Location::from_axial(q + dq, r + dr)
    }

    /// All six neighbours, indexed by direction
    pub fn adjacent(&self) -> [Location; 6] {
        Facing::ALL.map(|dir| self.neighbor(dir))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the six hex directions a unit can face
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Facing(u8);

impl Facing {
    pub const N: Facing = Facing(0);
    pub const NE: Facing = Facing(1);
    pub const SE: Facing = Facing(2);
    pub const S: Facing = Facing(3);
    pub const SW: Facing = Facing(4);
    pub const NW: Facing = Facing(5);

    pub const ALL: [Facing; 6] = [
        Facing::N,
        Facing::NE,
        Facing::SE,
        Facing::S,
        Facing::SW,
        Facing::NW,
    ];

    /// Build a facing from any integer, wrapping modulo 6
    pub const fn new(direction: u8) -> Self {
        Facing(direction % 6)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Absolute direction for a direction relative to this facing
    pub const fn relative(self, relative: u8) -> Facing {
        Facing::new(self.0 + relative % 6)
    }

    pub const fn turn_left(self) -> Facing {
        self.relative(FORWARD_LEFT)
    }

    pub const fn turn_right(self) -> Facing {
        self.relative(FORWARD_RIGHT)
    }

    pub const fn opposite(self) -> Facing {
        self.relative(BACKWARD)
    }

    /// Number of single turns needed to get from this facing to `other`
    pub fn turns_to(self, other: Facing) -> u8 {
        let diff = (other.0 + 6 - self.0) % 6;
        diff.min(6 - diff)
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [&str; 6] = ["N", "NE", "SE", "S", "SW", "NW"];
        f.write_str(NAMES[self.index()])
    }
}
