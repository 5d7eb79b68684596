//! Successor generation
//!
//! Offers every step kind that makes sense for the unit's mode and posture.
//! Legality is left to the filter chain and cycles to the relaxer.

use crate::board::Facing;
use crate::engine::SearchContext;
use crate::path::MovePath;
use crate::step::StepKind;
use crate::unit::CAP_LATERAL;

/// Candidate step kinds from the end of `path`
pub fn candidate_steps(path: &MovePath, ctx: &SearchContext<'_>) -> Vec<StepKind> {
    if path.is_prone() {
        return if ctx.unit.is_jumping() {
            Vec::new()
        } else {
            vec![StepKind::GetUp]
        };
    }

    if ctx.unit.is_jumping() {
        let mut steps: Vec<StepKind> = Facing::ALL.iter().map(|&dir| StepKind::Jump(dir)).collect();
        steps.push(StepKind::TurnLeft);
        steps.push(StepKind::TurnRight);
        return steps;
    }

    let mut steps = StepKind::GROUND.to_vec();
    if ctx.unit.has(CAP_LATERAL) {
        steps.extend(StepKind::LATERAL);
    }
    steps
}

/// Paths one step longer than `path`
pub fn successors<'a>(path: &'a MovePath, ctx: &'a SearchContext<'a>) -> impl Iterator<Item = MovePath> + 'a {
    candidate_steps(path, ctx)
        .into_iter()
        .filter_map(move |kind| path.extend(kind, ctx.board, ctx.unit))
}
