use crate::cnf::Literal;
use crate::solver::heuristic::literal_with_phase;
use crate::solver::state::State;
use ordered_float::NotNan;
use std::cmp::Reverse;

/// Highest activity wins, ties go to the lowest variable index. The activity
/// array itself is bumped by conflict analysis, so there is nothing to keep in
/// sync when the bandit swaps heuristics mid-solve.
pub fn decide(state: &State) -> Option<Literal> {
    let best = (1..=state.num_vars)
        .filter(|var| state.vars[*var].is_none())
        .max_by_key(|var| {
            (
                NotNan::new(state.activity[*var]).unwrap(),
                Reverse(*var),
            )
        })?;
    Some(literal_with_phase(state, best, true))
}
