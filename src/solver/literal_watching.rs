use crate::cnf::{Clause, ClauseId, Literal};

#[derive(Debug, Default, Clone)]
pub struct VarWatch {
    pub pos: Vec<ClauseId>,
    pub neg: Vec<ClauseId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WatchUpdate {
    FoundNewWatch,
    Satisfied,
    Unit(Literal),
    Conflict,
}

/// Maps each literal to the clauses watching it. A clause of length >= 2 is
/// watched by its first two literals, a unit clause by its only literal.
#[derive(Debug, Clone)]
pub struct LiteralWatcher {
    pub var_watches: Vec<VarWatch>,
}

impl LiteralWatcher {
    pub fn new(clauses: &[Clause], num_vars: usize) -> Self {
        let mut watcher = LiteralWatcher {
            var_watches: vec![VarWatch::default(); num_vars + 1],
        };
        for (clause_id, clause) in clauses.iter().enumerate() {
            watcher.add_clause(clause, clause_id);
        }
        watcher
    }

    pub fn add_clause(&mut self, clause: &Clause, clause_id: ClauseId) {
        for lit in clause.literals.iter().take(2) {
            self.add_watch(*lit, clause_id);
        }
    }

    pub fn add_watch(&mut self, lit: Literal, clause_id: ClauseId) {
        if lit.positive() {
            self.var_watches[lit.id()].pos.push(clause_id);
        } else {
            self.var_watches[lit.id()].neg.push(clause_id);
        }
    }

    pub fn watch_list_mut(&mut self, lit: Literal) -> &mut Vec<ClauseId> {
        if lit.positive() {
            &mut self.var_watches[lit.id()].pos
        } else {
            &mut self.var_watches[lit.id()].neg
        }
    }

    pub fn watch_list(&self, lit: Literal) -> &[ClauseId] {
        if lit.positive() {
            &self.var_watches[lit.id()].pos
        } else {
            &self.var_watches[lit.id()].neg
        }
    }

    /// Reacts to `false_lit` becoming false in `clause`. Moves the watch to a
    /// non-false replacement if one exists; otherwise the clause is satisfied,
    /// unit, or a conflict. Except for FoundNewWatch the caller re-adds the
    /// watch on `false_lit`.
    pub fn update_clause(
        &mut self,
        clause: &mut Clause,
        clause_id: ClauseId,
        false_lit: Literal,
        vars: &[Option<bool>],
    ) -> WatchUpdate {
        debug_assert!(false_lit.is_false(vars));

        if clause.literals.len() == 1 {
            return WatchUpdate::Conflict;
        }

        // keep the falsified watch at index 1, the other watch at index 0
        if clause.literals[0] == false_lit {
            clause.literals.swap(0, 1);
        }
        debug_assert_eq!(clause.literals[1], false_lit);

        let other = clause.literals[0];
        if other.is_true(vars) {
            return WatchUpdate::Satisfied;
        }

        for i in 2..clause.literals.len() {
            if clause.literals[i].non_false(vars) {
                clause.literals.swap(1, i);
                self.add_watch(clause.literals[1], clause_id);
                return WatchUpdate::FoundNewWatch;
            }
        }

        if vars[other.id()].is_none() {
            WatchUpdate::Unit(other)
        } else {
            WatchUpdate::Conflict
        }
    }
}
