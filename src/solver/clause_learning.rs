use crate::cnf::{Clause, ClauseId, Literal, VarId};
use crate::solver::state::State;
use crate::solver::trail::{AssignmentReason, Trail};
use fnv::FnvHashSet;

#[derive(Debug, Default, Clone)]
pub struct ClauseLearner {}

impl ClauseLearner {
    /// First-UIP conflict analysis. Resolves the falsified clause against the
    /// reasons of current-level literals in reverse trail order until a single
    /// current-level literal remains. Returns the learned clause (asserting
    /// literal at index 0, a backjump-level literal at index 1) and the
    /// backjump level. Assumes the conflict is above decision level 0.
    pub fn analyse_conflict(
        &mut self,
        state: &mut State,
        trail: &Trail,
        conflict_clause_id: ClauseId,
    ) -> (Clause, usize) {
        debug_assert!(trail.decision_level > 0);
        let current_level = trail.decision_level;
        let mut seen: FnvHashSet<VarId> = FnvHashSet::default();
        let mut learned: Vec<Literal> = vec![];
        let mut counter = 0;
        let mut backtrack_level = 0;

        // literals assigned at level 0 are permanently false and drop out
        for &lit in &state.clause_database[conflict_clause_id].literals {
            let var = lit.id();
            if trail.var_level[var] == 0 {
                continue;
            }
            if seen.insert(var) {
                if trail.var_level[var] == current_level {
                    counter += 1;
                } else {
                    backtrack_level = backtrack_level.max(trail.var_level[var]);
                    learned.push(lit);
                }
            }
        }

        let mut idx = trail.assignment_stack.len();
        let asserting = loop {
            debug_assert!(idx > 0, "conflict analysis exhausted the trail");
            idx -= 1;
            let assignment = &trail.assignment_stack[idx];
            let var = assignment.literal.id();
            if !seen.contains(&var) {
                continue;
            }
            if counter == 1 {
                break -assignment.literal;
            }
            let reason_id = match assignment.reason {
                AssignmentReason::Forced(clause_id) => clause_id,
                AssignmentReason::Heuristic => {
                    panic!("resolved past the first UIP into a decision")
                }
            };
            for &lit in &state.clause_database[reason_id].literals {
                let other_var = lit.id();
                if other_var == var || trail.var_level[other_var] == 0 {
                    continue;
                }
                if seen.insert(other_var) {
                    if trail.var_level[other_var] == current_level {
                        counter += 1;
                    } else {
                        backtrack_level = backtrack_level.max(trail.var_level[other_var]);
                        learned.push(lit);
                    }
                }
            }
            seen.remove(&var);
            counter -= 1;
        };

        let mut literals = Vec::with_capacity(learned.len() + 1);
        literals.push(asserting);
        literals.extend(learned);

        // The second watch must sit at the backjump level, otherwise the
        // watches go stale immediately after the jump.
        if literals.len() > 1 {
            let second = literals
                .iter()
                .position(|lit| trail.var_level[lit.id()] == backtrack_level)
                .expect("learned clause lost its backjump-level literal");
            literals.swap(1, second);
        }

        let lbd = literals
            .iter()
            .map(|lit| trail.var_level[lit.id()])
            .collect::<FnvHashSet<_>>()
            .len();

        debug_assert!(backtrack_level < current_level);
        debug_assert!(lbd <= literals.len());
        debug_assert_eq!(
            literals
                .iter()
                .filter(|lit| trail.var_level[lit.id()] == current_level)
                .count(),
            1
        );

        state.record_lbd(lbd);
        state.bump_activities(&literals);

        (Clause::from_literals_and_lbd(literals, lbd), backtrack_level)
    }
}
