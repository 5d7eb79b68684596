//! Unit movement state consumed by the search

use serde::{Deserialize, Serialize};

/// Capability bitmasks
pub const CAP_NO_REVERSE: u16 = 1 << 0;   // Cannot use backward steps
pub const CAP_LATERAL: u16 = 1 << 1;      // Can side-step (quads)
pub const CAP_IGNORE_WOODS: u16 = 1 << 2; // Woods cost the same as clear

/// Movement mode for one move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementMode {
    Walk,
    Run,
    Jump,
}

/// Unit kind, drives terrain passability
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Mech,
    Tank,
    Hover,
    Infantry,
}

/// Read-only snapshot of a unit for the duration of one search
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitState {
    pub id: u32,
    pub side: u8,
    pub kind: UnitKind,
    pub mode: MovementMode,
    pub walk_mp: u32,
    pub run_mp: u32,
    pub jump_mp: u32,
    /// Largest elevation change allowed on a single ground step
    pub max_climb: i32,
    #[serde(default)]
    pub capabilities: u16,
    #[serde(default)]
    pub prone: bool,
    #[serde(default)]
    pub immobile: bool,
}

impl UnitState {
    /// A walking mech with the usual 3/2 run ratio and no jump jets
    pub fn mech(id: u32, side: u8, walk_mp: u32) -> Self {
        Self {
            id,
            side,
            kind: UnitKind::Mech,
            mode: MovementMode::Walk,
            walk_mp,
            run_mp: (walk_mp * 3).div_ceil(2),
            jump_mp: 0,
            max_climb: 2,
            capabilities: 0,
            prone: false,
            immobile: false,
        }
    }

    pub fn tank(id: u32, side: u8, cruise_mp: u32) -> Self {
        Self {
            kind: UnitKind::Tank,
            max_climb: 1,
            ..Self::mech(id, side, cruise_mp)
        }
    }

    pub fn with_mode(mut self, mode: MovementMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_jump(mut self, jump_mp: u32) -> Self {
        self.jump_mp = jump_mp;
        self
    }

    pub fn with_capabilities(mut self, capabilities: u16) -> Self {
        self.capabilities |= capabilities;
        self
    }

    pub fn with_prone(mut self, prone: bool) -> Self {
        self.prone = prone;
        self
    }

    pub fn has(&self, capability: u16) -> bool {
        self.capabilities & capability != 0
    }

    /// Movement points available in the current mode
    pub fn budget(&self) -> u32 {
        self.budget_for(self.mode)
    }

    pub fn budget_for(&self, mode: MovementMode) -> u32 {
        match mode {
            MovementMode::Walk => self.walk_mp,
            MovementMode::Run => self.run_mp,
            MovementMode::Jump => self.jump_mp,
        }
    }

    pub fn is_jumping(&self) -> bool {
        self.mode == MovementMode::Jump
    }

    /// Whether the unit cannot move at all in the current mode
    pub fn is_immobile(&self) -> bool {
        self.immobile || self.budget() == 0
    }
}
