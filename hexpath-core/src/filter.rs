//! Legality filters
//!
//! Each filter looks at the last step and the cumulative state of a path and
//! says whether it may stay. Filters are pure, so the chain's answer does not
//! depend on their order; cheap ones go first.

use crate::engine::SearchContext;
use crate::path::MovePath;
use crate::step::StepKind;
use crate::unit::{CAP_LATERAL, CAP_NO_REVERSE};

pub trait PathFilter {
    fn should_stay(&self, path: &MovePath, ctx: &SearchContext<'_>) -> bool;

    fn name(&self) -> &'static str;
}

/// Logical AND of filters
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn PathFilter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules applied to every path while it is being extended
    pub fn movement() -> Self {
        Self::new()
            .with(MaxMpFilter)
            .with(CapabilityFilter)
            .with(PassabilityFilter)
            .with(ElevationFilter)
            .with(StackingFilter)
            .with(HazardFilter)
    }

    /// Rules a path must also meet to end where it is
    pub fn terminal() -> Self {
        Self::new().with(LandingFilter).with(EndStackingFilter)
    }

    pub fn with<F: PathFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn push(&mut self, filter: Box<dyn PathFilter>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn should_stay(&self, path: &MovePath, ctx: &SearchContext<'_>) -> bool {
        self.filters.iter().all(|f| f.should_stay(path, ctx))
    }

    /// Like `should_stay`, but marks the path illegal when it fails
    pub fn check(&self, path: &mut MovePath, ctx: &SearchContext<'_>) -> bool {
        if let Some(filter) = self.filters.iter().find(|f| !f.should_stay(path, ctx)) {
            tracing::trace!("{} rejected path ending at {}", filter.name(), path.final_location());
            path.mark_illegal();
            return false;
        }
        true
    }
}

/// Last step, if it walked, ran or side-stepped into a new hex
fn ground_move(path: &MovePath) -> Option<(crate::board::Location, crate::board::Location)> {
    path.last_step()
        .filter(|step| step.kind.is_ground_move())
        .map(|step| (step.from, step.to))
}

// ============================================================================
// MOVEMENT FILTERS
// ============================================================================

/// Path fits the unit's movement points for its mode
pub struct MaxMpFilter;

impl PathFilter for MaxMpFilter {
    fn should_stay(&self, path: &MovePath, ctx: &SearchContext<'_>) -> bool {
        path.mp_used() <= ctx.unit.budget()
    }

    fn name(&self) -> &'static str {
        "max-mp"
    }
}

/// Unit-type restrictions on step kinds
pub struct CapabilityFilter;

impl PathFilter for CapabilityFilter {
    fn should_stay(&self, path: &MovePath, ctx: &SearchContext<'_>) -> bool {
        let Some(step) = path.last_step() else {
            return true;
        };
        match step.kind {
            StepKind::Backward if ctx.unit.has(CAP_NO_REVERSE) => return false,
            kind if kind.is_lateral() && !ctx.unit.has(CAP_LATERAL) => return false,
            StepKind::Jump(_) if !ctx.unit.is_jumping() => return false,
            _ => {}
        }
        // Backing up is only allowed at walking speed
        path.backward_steps() == 0 || path.mp_used() <= ctx.unit.walk_mp
    }

    fn name(&self) -> &'static str {
        "capability"
    }
}

/// Ground steps only enter hexes the unit can stand in
pub struct PassabilityFilter;

impl PathFilter for PassabilityFilter {
    fn should_stay(&self, path: &MovePath, ctx: &SearchContext<'_>) -> bool {
        ground_move(path).map_or(true, |(_, to)| ctx.board.is_passable(to, ctx.unit))
    }

    fn name(&self) -> &'static str {
        "passability"
    }
}

/// Ground steps climb or drop no more than the unit's limit
pub struct ElevationFilter;

impl PathFilter for ElevationFilter {
    fn should_stay(&self, path: &MovePath, ctx: &SearchContext<'_>) -> bool {
        ground_move(path).map_or(true, |(from, to)| {
            (ctx.board.elevation(to) - ctx.board.elevation(from)).abs() <= ctx.unit.max_climb
        })
    }

    fn name(&self) -> &'static str {
        "elevation"
    }
}

/// Ground steps never enter a hex held by another side
pub struct StackingFilter;

impl PathFilter for StackingFilter {
    fn should_stay(&self, path: &MovePath, ctx: &SearchContext<'_>) -> bool {
        ground_move(path).map_or(true, |(_, to)| {
            ctx.board
                .occupant(to)
                .map_or(true, |o| o.side == ctx.unit.side || o.unit_id == ctx.unit.id)
        })
    }

    fn name(&self) -> &'static str {
        "stacking"
    }
}

/// Ground steps avoid hazardous terrain unless the search allows it
pub struct HazardFilter;

impl PathFilter for HazardFilter {
    fn should_stay(&self, path: &MovePath, ctx: &SearchContext<'_>) -> bool {
        ctx.allow_hazards
            || ground_move(path).map_or(true, |(_, to)| !ctx.board.is_hazardous(to, ctx.unit))
    }

    fn name(&self) -> &'static str {
        "hazard"
    }
}

// ============================================================================
// TERMINAL FILTERS
// ============================================================================

/// The final hex is somewhere the unit may stop, which matters for jumps
pub struct LandingFilter;

impl PathFilter for LandingFilter {
    fn should_stay(&self, path: &MovePath, ctx: &SearchContext<'_>) -> bool {
        if path.is_empty() {
            return true;
        }
        let end = path.final_location();
        ctx.board.is_passable(end, ctx.unit)
            && (ctx.allow_hazards || !ctx.board.is_hazardous(end, ctx.unit))
    }

    fn name(&self) -> &'static str {
        "landing"
    }
}

/// No other unit stands in the final hex
pub struct EndStackingFilter;

impl PathFilter for EndStackingFilter {
    fn should_stay(&self, path: &MovePath, ctx: &SearchContext<'_>) -> bool {
        ctx.board
            .occupant(path.final_location())
            .map_or(true, |o| o.unit_id == ctx.unit.id)
    }

    fn name(&self) -> &'static str {
        "end-stacking"
    }
}
