//! Board collaborator: the cost/legality oracle the search consults,
//! plus a reference map implementation

use crate::board::{Facing, Location};
use crate::step::StepKind;
use crate::unit::{UnitKind, UnitState, CAP_IGNORE_WOODS};
use anyhow::Context;
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// ORACLE
// ============================================================================

/// Read-only view of the board for the duration of a search.
///
/// `step_cost` must never be negative. The search clamps negative costs to
/// zero and logs them, but the result is then no longer meaningful.
pub trait BoardView {
    /// Whether the hex is on the board
    fn contains(&self, location: Location) -> bool;

    /// Whether the unit may occupy or walk through the hex
    fn is_passable(&self, location: Location, unit: &UnitState) -> bool;

    /// Movement points charged for taking `step` from `from` with `facing`
    fn step_cost(&self, from: Location, facing: Facing, step: StepKind, unit: &UnitState) -> i32;

    /// Number of hexes on the board
    fn location_count(&self) -> usize;

    fn neighbor(&self, location: Location, direction: Facing) -> Option<Location> {
        let next = location.neighbor(direction);
        self.contains(next).then_some(next)
    }

    fn adjacent(&self, location: Location) -> Vec<Location> {
        Facing::ALL
            .iter()
            .filter_map(|&dir| self.neighbor(location, dir))
            .collect()
    }

    fn elevation(&self, _location: Location) -> i32 {
        0
    }

    fn occupant(&self, _location: Location) -> Option<Occupant> {
        None
    }

    fn is_hazardous(&self, _location: Location, _unit: &UnitState) -> bool {
        false
    }

    /// A lower bound on the cost of any location-changing step for the unit
    fn min_hex_cost(&self, _unit: &UnitState) -> u32 {
        0
    }

    /// Bumped whenever the board changes
    fn revision(&self) -> u64 {
        0
    }
}

// ============================================================================
// TERRAIN
// ============================================================================

/// Terrain type of a hex
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    Clear,
    Pavement,
    Rough,
    LightWoods,
    HeavyWoods,
    ShallowWater,
    DeepWater,
    Swamp,
    Ice,
    Impassable,
}

impl TerrainKind {
    pub fn is_woods(self) -> bool {
        matches!(self, TerrainKind::LightWoods | TerrainKind::HeavyWoods)
    }

    pub fn is_water(self) -> bool {
        matches!(self, TerrainKind::ShallowWater | TerrainKind::DeepWater)
    }

    /// Entering is legal but may bog the unit down or send it skidding
    pub fn is_hazardous(self) -> bool {
        matches!(self, TerrainKind::Swamp | TerrainKind::Ice)
    }

    fn passable_for(self, kind: UnitKind) -> bool {
        match (self, kind) {
            (TerrainKind::Impassable, _) => false,
            (TerrainKind::DeepWater, UnitKind::Mech | UnitKind::Hover) => true,
            (TerrainKind::DeepWater, _) => false,
            (TerrainKind::ShallowWater, UnitKind::Tank) => false,
            (TerrainKind::HeavyWoods, UnitKind::Tank | UnitKind::Hover) => false,
            (TerrainKind::LightWoods, UnitKind::Hover) => false,
            _ => true,
        }
    }
}

/// A single hex of the map
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexTile {
    pub terrain: TerrainKind,
    #[serde(default)]
    pub elevation: i32,
}

impl HexTile {
    pub const fn new(terrain: TerrainKind, elevation: i32) -> Self {
        Self { terrain, elevation }
    }

    pub const fn clear() -> Self {
        Self::new(TerrainKind::Clear, 0)
    }
}

/// A unit standing on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub unit_id: u32,
    pub side: u8,
    pub location: Location,
}

/// Movement point cost table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainCosts {
    pub turn: u32,
    pub get_up: u32,
    pub jump: u32,
    pub per_level: u32,
    pub clear: u32,
    pub pavement: u32,
    pub rough: u32,
    pub light_woods: u32,
    pub heavy_woods: u32,
    pub shallow_water: u32,
    pub deep_water: u32,
    pub swamp: u32,
    pub ice: u32,
}

impl Default for TerrainCosts {
    fn default() -> Self {
        Self {
            turn: 1,
            get_up: 2,
            jump: 1,
            per_level: 1,
            clear: 1,
            pavement: 1,
            rough: 2,
            light_woods: 2,
            heavy_woods: 3,
            shallow_water: 2,
            deep_water: 4,
            swamp: 2,
            ice: 1,
        }
    }
}

impl TerrainCosts {
    /// Every hex costs 1 and turning is free
    pub fn flat() -> Self {
        let costs = Self {
            turn: 0,
            ..Self::default()
        };
        Self {
            rough: costs.clear,
            light_woods: costs.clear,
            heavy_woods: costs.clear,
            shallow_water: costs.clear,
            deep_water: costs.clear,
            swamp: costs.clear,
            ..costs
        }
    }

    pub fn with_turn(mut self, turn: u32) -> Self {
        self.turn = turn;
        self
    }

    fn terrain(&self, terrain: TerrainKind) -> u32 {
        match terrain {
            TerrainKind::Clear | TerrainKind::Impassable => self.clear,
            TerrainKind::Pavement => self.pavement,
            TerrainKind::Rough => self.rough,
            TerrainKind::LightWoods => self.light_woods,
            TerrainKind::HeavyWoods => self.heavy_woods,
            TerrainKind::ShallowWater => self.shallow_water,
            TerrainKind::DeepWater => self.deep_water,
            TerrainKind::Swamp => self.swamp,
            TerrainKind::Ice => self.ice,
        }
    }

    /// Cost of entering a hex of the given terrain
    fn entry(&self, terrain: TerrainKind, unit: &UnitState) -> u32 {
        if terrain.is_woods() && unit.has(CAP_IGNORE_WOODS) {
            return self.clear;
        }
        if unit.kind == UnitKind::Hover && (terrain.is_water() || terrain == TerrainKind::Swamp) {
            return self.clear;
        }
        self.terrain(terrain)
    }

    fn cheapest_entry(&self) -> u32 {
        [
            self.clear,
            self.pavement,
            self.rough,
            self.light_woods,
            self.heavy_woods,
            self.shallow_water,
            self.deep_water,
            self.swamp,
            self.ice,
        ]
        .into_iter()
        .min()
        .unwrap_or(0)
    }
}

// ============================================================================
// REFERENCE BOARD
// ============================================================================

/// Rectangular map with columns `1..=width` and rows `1..=height`
#[derive(Clone, Debug)]
pub struct HexBoard {
    width: i32,
    height: i32,
    tiles: Vec<HexTile>,
    costs: TerrainCosts,
    occupants: FxHashMap<Location, Occupant>,
    revision: u64,
}

/// On-disk form of a board
#[derive(Serialize, Deserialize)]
struct BoardFile {
    width: i32,
    height: i32,
    tiles: Vec<HexTile>,
    #[serde(default)]
    costs: TerrainCosts,
    #[serde(default)]
    occupants: Vec<Occupant>,
}

impl HexBoard {
    /// Board of clear, flat hexes
    pub fn uniform(width: i32, height: i32, costs: TerrainCosts) -> Self {
        let count = width.max(0) as usize * height.max(0) as usize;
        Self {
            width,
            height,
            tiles: vec![HexTile::clear(); count],
            costs,
            occupants: FxHashMap::default(),
            revision: 0,
        }
    }

    /// Board with randomly scattered terrain and gentle elevation
    pub fn random<R: Rng>(width: i32, height: i32, costs: TerrainCosts, rng: &mut R) -> Self {
        let mut board = Self::uniform(width, height, costs);
        for tile in board.tiles.iter_mut() {
            let terrain = match rng.gen_range(0..100) {
                0..=49 => TerrainKind::Clear,
                50..=54 => TerrainKind::Pavement,
                55..=66 => TerrainKind::Rough,
                67..=76 => TerrainKind::LightWoods,
                77..=82 => TerrainKind::HeavyWoods,
                83..=88 => TerrainKind::ShallowWater,
                89..=91 => TerrainKind::DeepWater,
                92..=94 => TerrainKind::Swamp,
                95..=96 => TerrainKind::Ice,
                _ => TerrainKind::Impassable,
            };
            *tile = HexTile::new(terrain, rng.gen_range(0..=2));
        }
        board
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn costs(&self) -> &TerrainCosts {
        &self.costs
    }

    fn index(&self, location: Location) -> Option<usize> {
        if !self.contains(location) {
            return None;
        }
        Some(((location.y - 1) * self.width + (location.x - 1)) as usize)
    }

    pub fn tile(&self, location: Location) -> Option<&HexTile> {
        self.index(location).map(|i| &self.tiles[i])
    }

    /// Replace a hex; returns false if it is off the board
    pub fn set_tile(&mut self, location: Location, tile: HexTile) -> bool {
        match self.index(location) {
            Some(i) => {
                self.tiles[i] = tile;
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Put a unit on the board, replacing whatever stood there
    pub fn place(&mut self, occupant: Occupant) {
        self.occupants.retain(|_, o| o.unit_id != occupant.unit_id);
        self.occupants.insert(occupant.location, occupant);
        self.revision += 1;
    }

    pub fn remove_unit(&mut self, unit_id: u32) {
        self.occupants.retain(|_, o| o.unit_id != unit_id);
        self.revision += 1;
    }

    /// All hexes in row-major order
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        (1..=self.height).flat_map(move |y| (1..=self.width).map(move |x| Location::new(x, y)))
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read board file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse board file {}", path.display()))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let file: BoardFile = serde_json::from_str(content)?;
        let expected = file.width.max(0) as usize * file.height.max(0) as usize;
        if file.tiles.len() != expected {
            anyhow::bail!(
                "Board is {}x{} but lists {} tiles (expected {})",
                file.width,
                file.height,
                file.tiles.len(),
                expected
            );
        }
        let mut board = Self {
            width: file.width,
            height: file.height,
            tiles: file.tiles,
            costs: file.costs,
            occupants: FxHashMap::default(),
            revision: 0,
        };
        for occupant in file.occupants {
            if !board.contains(occupant.location) {
                anyhow::bail!("Unit {} is placed off the board at {}", occupant.unit_id, occupant.location);
            }
            board.place(occupant);
        }
        board.revision = 0;
        Ok(board)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        let mut occupants: Vec<Occupant> = self.occupants.values().copied().collect();
        occupants.sort_by_key(|o| o.unit_id);
        let file = BoardFile {
            width: self.width,
            height: self.height,
            tiles: self.tiles.clone(),
            costs: self.costs.clone(),
            occupants,
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl BoardView for HexBoard {
    fn contains(&self, location: Location) -> bool {
        (1..=self.width).contains(&location.x) && (1..=self.height).contains(&location.y)
    }

    fn is_passable(&self, location: Location, unit: &UnitState) -> bool {
        self.tile(location)
            .is_some_and(|tile| tile.terrain.passable_for(unit.kind))
    }

    fn step_cost(&self, from: Location, facing: Facing, step: StepKind, unit: &UnitState) -> i32 {
        let cost = match step {
            StepKind::TurnLeft | StepKind::TurnRight if unit.is_jumping() => 0,
            StepKind::TurnLeft | StepKind::TurnRight => self.costs.turn,
            StepKind::GetUp => self.costs.get_up,
            StepKind::Jump(_) => self.costs.jump,
            StepKind::Forward
            | StepKind::Backward
            | StepKind::LateralLeft
            | StepKind::LateralRight => {
                let (to, _) = step.apply(from, facing);
                match self.tile(to) {
                    Some(tile) => {
                        let climb = (tile.elevation - self.elevation(from)).unsigned_abs();
                        self.costs.entry(tile.terrain, unit) + climb * self.costs.per_level
                    }
                    None => self.costs.clear,
                }
            }
        };
        cost as i32
    }

    fn location_count(&self) -> usize {
        self.tiles.len()
    }

    fn elevation(&self, location: Location) -> i32 {
        self.tile(location).map_or(0, |tile| tile.elevation)
    }

    fn occupant(&self, location: Location) -> Option<Occupant> {
        self.occupants.get(&location).copied()
    }

    fn is_hazardous(&self, location: Location, unit: &UnitState) -> bool {
        if unit.kind == UnitKind::Hover {
            return false;
        }
        self.tile(location)
            .is_some_and(|tile| tile.terrain.is_hazardous())
    }

    fn min_hex_cost(&self, unit: &UnitState) -> u32 {
        if unit.is_jumping() {
            self.costs.jump
        } else {
            self.costs.cheapest_entry()
        }
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::MovementMode;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_bounds_are_one_based() {
        let board = HexBoard::uniform(16, 9, TerrainCosts::default());
        assert!(board.contains(Location::new(1, 1)));
        assert!(board.contains(Location::new(16, 9)));
        assert!(!board.contains(Location::new(0, 3)));
        assert!(!board.contains(Location::new(17, 3)));
        assert_eq!(board.location_count(), 144);
        assert_eq!(board.locations().count(), 144);
    }

    #[test]
    fn test_corner_has_fewer_neighbors() {
        let board = HexBoard::uniform(16, 9, TerrainCosts::default());
        assert!(board.adjacent(Location::new(1, 1)).len() < 6);
        assert_eq!(board.adjacent(Location::new(5, 5)).len(), 6);
    }

    #[test]
    fn test_step_costs() {
        let mut board = HexBoard::uniform(8, 8, TerrainCosts::default());
        let from = Location::new(4, 4);
        board.set_tile(from.neighbor(Facing::N), HexTile::new(TerrainKind::HeavyWoods, 1));
        let mech = UnitState::mech(1, 0, 5);

        assert_eq!(board.step_cost(from, Facing::N, StepKind::TurnLeft, &mech), 1);
        assert_eq!(board.step_cost(from, Facing::N, StepKind::Forward, &mech), 4);
        assert_eq!(board.step_cost(from, Facing::N, StepKind::Backward, &mech), 1);

        let strider = mech.clone().with_capabilities(CAP_IGNORE_WOODS);
        assert_eq!(board.step_cost(from, Facing::N, StepKind::Forward, &strider), 2);

        let jumper = mech.with_jump(4).with_mode(MovementMode::Jump);
        assert_eq!(board.step_cost(from, Facing::N, StepKind::TurnLeft, &jumper), 0);
        assert_eq!(board.step_cost(from, Facing::N, StepKind::Jump(Facing::N), &jumper), 1);
    }

    #[test]
    fn test_passability_by_kind() {
        let mut board = HexBoard::uniform(8, 8, TerrainCosts::default());
        let water = Location::new(2, 2);
        board.set_tile(water, HexTile::new(TerrainKind::DeepWater, 0));
        let mech = UnitState::mech(1, 0, 5);
        let tank = UnitState::tank(2, 0, 5);
        let hover = UnitState { kind: UnitKind::Hover, ..tank.clone() };

        assert!(board.is_passable(water, &mech));
        assert!(!board.is_passable(water, &tank));
        assert!(board.is_passable(water, &hover));
        assert!(!board.is_passable(Location::new(0, 0), &mech));
    }

    #[test]
    fn test_mutation_bumps_revision() {
        let mut board = HexBoard::uniform(4, 4, TerrainCosts::default());
        assert_eq!(board.revision(), 0);
        board.set_tile(Location::new(1, 1), HexTile::new(TerrainKind::Rough, 0));
        board.place(Occupant { unit_id: 7, side: 1, location: Location::new(2, 2) });
        assert_eq!(board.revision(), 2);
        assert!(!board.set_tile(Location::new(9, 9), HexTile::clear()));
        assert_eq!(board.revision(), 2);
    }

    #[test]
    fn test_json_round_trip_keeps_units() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut board = HexBoard::random(6, 5, TerrainCosts::default(), &mut rng);
        board.place(Occupant { unit_id: 3, side: 1, location: Location::new(2, 3) });

        let loaded = HexBoard::from_json(&board.to_json().unwrap()).unwrap();
        assert_eq!(loaded.width(), 6);
        assert_eq!(loaded.tile(Location::new(4, 4)), board.tile(Location::new(4, 4)));
        assert_eq!(loaded.occupant(Location::new(2, 3)).map(|o| o.unit_id), Some(3));
    }

    #[test]
    fn test_rejects_wrong_tile_count() {
        let json = r#"{"width": 2, "height": 2, "tiles": [{"terrain": "clear"}]}"#;
        assert!(HexBoard::from_json(json).is_err());
    }
}
