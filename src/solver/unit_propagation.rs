use crate::cnf::ClauseId;
use crate::solver::literal_watching::WatchUpdate;
use crate::solver::state::State;
use crate::solver::trail::{AssignmentReason, Trail};

/// Boolean constraint propagation. Processes the trail as a FIFO from the
/// first un-propagated index: for each trail literal the watch list of its
/// complement is drained, watches are relocated, and forced literals are
/// enqueued in trail order. Returns the first falsified clause, or None once
/// a fixed point is reached.
pub fn propagate(state: &mut State, trail: &mut Trail) -> Option<ClauseId> {
    while trail.propagated < trail.assignment_stack.len() {
        let lit = trail.assignment_stack[trail.propagated].literal;
        trail.propagated += 1;
        let false_lit = -lit;

        let watched = std::mem::take(state.literal_watcher.watch_list_mut(false_lit));
        let mut conflict = None;
        for &clause_id in watched.iter() {
            // after a conflict the remaining clauses keep their old watch
            if conflict.is_some() {
                state.literal_watcher.add_watch(false_lit, clause_id);
                continue;
            }

            let update = {
                let State {
                    clause_database,
                    literal_watcher,
                    vars,
                    ..
                } = state;
                literal_watcher.update_clause(
                    &mut clause_database[clause_id],
                    clause_id,
                    false_lit,
                    vars,
                )
            };

            match update {
                WatchUpdate::FoundNewWatch => {}
                WatchUpdate::Satisfied => {
                    state.literal_watcher.add_watch(false_lit, clause_id);
                }
                WatchUpdate::Unit(unit) => {
                    state.literal_watcher.add_watch(false_lit, clause_id);
                    let enqueued = trail.enqueue(state, unit, AssignmentReason::Forced(clause_id));
                    debug_assert!(enqueued, "unit literal {} was already falsified", unit);
                }
                WatchUpdate::Conflict => {
                    state.literal_watcher.add_watch(false_lit, clause_id);
                    conflict = Some(clause_id);
                }
            }
        }

        if conflict.is_some() {
            return conflict;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnf::{Clause, Literal};

    #[test]
    fn test_propagates_unit_chain() {
        let clauses = vec![Clause::from("-1 2"), Clause::from("-2 3")];
        let mut state = State::init(clauses, 3);
        let mut trail = Trail::new(3);

        trail.new_decision_level();
        trail.enqueue(&mut state, Literal::new(1), AssignmentReason::Heuristic);
        let conflict = propagate(&mut state, &mut trail);

        assert_eq!(conflict, None);
        assert_eq!(state.vars[2], Some(true));
        assert_eq!(state.vars[3], Some(true));
        assert_eq!(state.stats.num_propagations, 2);
        assert_eq!(trail.propagated, trail.assignment_stack.len());
        assert_eq!(
            trail.assignment_stack[1],
            crate::solver::trail::Assignment::forced(Literal::new(2), 1, 0)
        );
        state.verify_watches();
    }

    #[test]
    fn test_detects_conflict() {
        let clauses = vec![Clause::from("-1 2"), Clause::from("-1 -2")];
        let mut state = State::init(clauses, 2);
        let mut trail = Trail::new(2);

        trail.new_decision_level();
        trail.enqueue(&mut state, Literal::new(1), AssignmentReason::Heuristic);
        let conflict = propagate(&mut state, &mut trail);

        assert_eq!(conflict, Some(1));
    }

    #[test]
    fn test_satisfied_clauses_keep_their_watches() {
        let clauses = vec![Clause::from("1 2 3")];
        let mut state = State::init(clauses, 3);
        let mut trail = Trail::new(3);

        trail.new_decision_level();
        trail.enqueue(&mut state, Literal::new(2), AssignmentReason::Heuristic);
        trail.new_decision_level();
        trail.enqueue(&mut state, Literal::new(-1), AssignmentReason::Heuristic);
        assert_eq!(propagate(&mut state, &mut trail), None);

        state.verify_watches();
        // no propagation happened, the clause was already satisfied
        assert_eq!(state.stats.num_propagations, 0);
    }

    #[test]
    fn test_propagation_restores_watch_integrity() {
        let clauses = vec![Clause::from("1 2 3"), Clause::from("-2 -3 4"), Clause::from("-1 -4")];
        let mut state = State::init(clauses, 4);
        let mut trail = Trail::new(4);

        trail.new_decision_level();
        trail.enqueue(&mut state, Literal::new(-1), AssignmentReason::Heuristic);
        trail.new_decision_level();
        trail.enqueue(&mut state, Literal::new(-2), AssignmentReason::Heuristic);
        let conflict = propagate(&mut state, &mut trail);

        assert_eq!(conflict, None);
        assert_eq!(state.vars[3], Some(true));
        state.verify_watches();
    }
}
