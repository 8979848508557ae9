use crate::cnf::Literal;
use crate::solver::heuristic::literal_with_phase;
use crate::solver::state::State;

/// Dynamic largest individual sum: counts, per polarity, in how many not yet
/// satisfied clauses each unassigned variable occurs and branches on the
/// literal with the largest count.
pub fn decide(state: &State) -> Option<Literal> {
    let mut pos_count = vec![0usize; state.num_vars + 1];
    let mut neg_count = vec![0usize; state.num_vars + 1];
    for clause in state.clause_database.clauses() {
        if clause.is_satisfied(&state.vars) {
            continue;
        }
        for lit in &clause.literals {
            if lit.positive() {
                pos_count[lit.id()] += 1;
            } else {
                neg_count[lit.id()] += 1;
            }
        }
    }

    let mut best = None;
    let mut best_count = -1_i64;
    let mut best_sign = true;
    for var in 1..=state.num_vars {
        if state.vars[var].is_some() {
            continue;
        }
        let (count, sign) = if pos_count[var] >= neg_count[var] {
            (pos_count[var], true)
        } else {
            (neg_count[var], false)
        };
        if count as i64 > best_count {
            best_count = count as i64;
            best = Some(var);
            best_sign = sign;
        }
    }
    best.map(|var| literal_with_phase(state, var, best_sign))
}
