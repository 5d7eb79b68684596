//! Search configuration

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Knobs shared by every search a `PathFinder` runs
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Treat the same hex at different facings as different search states
    pub key_by_facing: bool,
    /// Stop after this many accepted expansions
    pub max_expansions: Option<usize>,
    /// Stop after this much wall-clock time
    pub time_budget_ms: Option<u64>,
    /// Order the shortest-path frontier by cost plus distance to the goal
    pub goal_heuristic: bool,
    /// Allow paths through and into hazardous terrain
    pub allow_hazards: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            key_by_facing: true,
            max_expansions: None,
            time_budget_ms: None,
            goal_heuristic: true,
            allow_hazards: false,
        }
    }
}

impl SearchConfig {
    /// Limit the number of accepted expansions
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }

    /// Limit wall-clock time
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget_ms = Some(budget.as_millis() as u64);
        self
    }

    pub fn with_key_by_facing(mut self, key_by_facing: bool) -> Self {
        self.key_by_facing = key_by_facing;
        self
    }

    pub fn with_goal_heuristic(mut self, goal_heuristic: bool) -> Self {
        self.goal_heuristic = goal_heuristic;
        self
    }

    pub fn with_hazards(mut self, allow_hazards: bool) -> Self {
        self.allow_hazards = allow_hazards;
        self
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }

    /// Load from JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read search config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse search config {}", path.display()))?;
        Ok(config)
    }
}
