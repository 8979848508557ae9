use crate::cnf::{Clause, Literal, SolutionAssignment, VarId};
use crate::solver::clause_database::ClauseDatabase;
use crate::solver::literal_watching::LiteralWatcher;
use crate::solver::statistics::StateStatistics;
use std::collections::VecDeque;

pub const ACTIVITY_DECAY: f64 = 0.95;
const ACTIVITY_LIMIT: f64 = 1e100;
const ACTIVITY_RESCALE: f64 = 1e-100;
const LBD_WINDOW: usize = 100;

#[derive(Debug, Clone)]
pub struct State {
    pub vars: Vec<Option<bool>>,
    pub var_phases: Vec<Option<bool>>,
    pub activity: Vec<f64>,
    pub act_inc: f64,
    pub recent_lbd: VecDeque<usize>,
    pub clause_database: ClauseDatabase,
    pub literal_watcher: LiteralWatcher,
    pub num_vars: usize,
    pub stats: StateStatistics,
}

impl State {
    pub fn init(clauses: Vec<Clause>, num_vars: usize) -> Self {
        State {
            vars: vec![None; num_vars + 1],
            var_phases: vec![None; num_vars + 1],
            activity: vec![0.0; num_vars + 1],
            act_inc: 1.0,
            recent_lbd: VecDeque::with_capacity(LBD_WINDOW),
            literal_watcher: LiteralWatcher::new(&clauses, num_vars),
            stats: StateStatistics::new(clauses.len(), num_vars),
            clause_database: ClauseDatabase::init(clauses),
            num_vars,
        }
    }

    /// Bumps every variable of a learned clause and sharpens the increment.
    /// Rescaling divides all activities and the increment by the same factor,
    /// so the activity ranking is unchanged.
    pub fn bump_activities(&mut self, literals: &[Literal]) {
        let mut max_activity: f64 = 0.0;
        for lit in literals {
            let var = lit.id();
            self.activity[var] += self.act_inc;
            max_activity = max_activity.max(self.activity[var]);
        }
        self.act_inc /= ACTIVITY_DECAY;
        if max_activity > ACTIVITY_LIMIT {
            for activity in self.activity.iter_mut() {
                *activity *= ACTIVITY_RESCALE;
            }
            self.act_inc *= ACTIVITY_RESCALE;
        }
    }

    pub fn record_lbd(&mut self, lbd: usize) {
        if self.recent_lbd.len() == LBD_WINDOW {
            self.recent_lbd.pop_front();
        }
        self.recent_lbd.push_back(lbd);
    }

    pub fn satisfied_ratio(&self) -> f64 {
        let satisfied = self
            .clause_database
            .clauses()
            .iter()
            .filter(|clause| clause.is_satisfied(&self.vars))
            .count();
        satisfied as f64 / self.clause_database.len().max(1) as f64
    }

    pub fn get_assignment(&self) -> SolutionAssignment {
        let mut result = SolutionAssignment::new();
        for (id, val) in self.vars.iter().enumerate().skip(1) {
            if let Some(val) = val {
                result.insert(id as VarId, *val);
            }
        }
        result
    }

    /// Verifies the watched-literal invariant: every clause of length >= 2
    /// appears in exactly the watch lists of its first two literals, a unit
    /// clause in the watch list of its only literal.
    pub fn verify_watches(&self) {
        for clause_id in self.clause_database.iter() {
            let clause = &self.clause_database[clause_id];
            for (i, lit) in clause.literals.iter().enumerate() {
                let watch_count = self
                    .literal_watcher
                    .watch_list(*lit)
                    .iter()
                    .filter(|id| **id == clause_id)
                    .count();
                let expected = usize::from(i < 2);
                assert_eq!(
                    watch_count, expected,
                    "clause {} watched {} times by literal {}",
                    clause_id, watch_count, lit
                );
            }
        }
    }
}
