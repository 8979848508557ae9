use crate::cnf::{Clause, Literal};
use crate::solver::heuristic::literal_with_phase;
use crate::solver::state::State;

/// Jeroslow-Wang: every clause contributes 2^-|C| to the weight of each of
/// its literals, so short clauses dominate. The weights are computed once
/// over the initial clause set and folded in incrementally as clauses are
/// learned.
pub struct JwWeights {
    pos_w: Vec<f64>,
    neg_w: Vec<f64>,
}

impl JwWeights {
    pub fn init(state: &State) -> Self {
        let mut weights = JwWeights {
            pos_w: vec![0.0; state.num_vars + 1],
            neg_w: vec![0.0; state.num_vars + 1],
        };
        for clause in state.clause_database.clauses() {
            weights.clause_added(clause);
        }
        weights
    }

    pub fn clause_added(&mut self, clause: &Clause) {
        let weight = 2.0_f64.powi(-(clause.literals.len().max(1) as i32));
        for lit in &clause.literals {
            if lit.positive() {
                self.pos_w[lit.id()] += weight;
            } else {
                self.neg_w[lit.id()] += weight;
            }
        }
    }

    pub fn decide(&self, state: &State) -> Option<Literal> {
        let mut best = None;
        let mut best_score = -1.0;
        let mut best_sign = true;
        for var in 1..=state.num_vars {
            if state.vars[var].is_some() {
                continue;
            }
            let pos = self.pos_w[var];
            let neg = self.neg_w[var];
            let (score, sign) = if pos >= neg { (pos, true) } else { (neg, false) };
            if score > best_score {
                best_score = score;
                best = Some(var);
                best_sign = sign;
            }
        }
        best.map(|var| literal_with_phase(state, var, best_sign))
    }
}
