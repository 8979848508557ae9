pub mod dlis;
pub mod jw;
pub mod random;
pub mod vsids;

use crate::cnf::{Clause, Literal, VarId};
use crate::solver::state::State;
use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HeuristicType {
    Vsids,
    Jw,
    Dlis,
    Random,
}

impl HeuristicType {
    pub fn name(&self) -> &'static str {
        match self {
            HeuristicType::Vsids => "vsids",
            HeuristicType::Jw => "jw",
            HeuristicType::Dlis => "dlis",
            HeuristicType::Random => "random",
        }
    }

    pub fn create(&self, state: &State, seed: u64) -> Heuristic {
        match self {
            HeuristicType::Vsids => Heuristic::Vsids,
            HeuristicType::Jw => Heuristic::JeroslowWang(jw::JwWeights::init(state)),
            HeuristicType::Dlis => Heuristic::Dlis,
            HeuristicType::Random => Heuristic::Random(StdRng::seed_from_u64(seed)),
        }
    }
}

impl std::fmt::Display for HeuristicType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One branching strategy. Only Jeroslow-Wang and Random carry state: JW owns
/// its incremental literal weights, Random its rng. The rl solver holds all
/// four at once and the bandit picks which one drives `decide`.
pub enum Heuristic {
    Vsids,
    JeroslowWang(jw::JwWeights),
    Dlis,
    Random(StdRng),
}

impl Heuristic {
    pub fn kind(&self) -> HeuristicType {
        match self {
            Heuristic::Vsids => HeuristicType::Vsids,
            Heuristic::JeroslowWang(_) => HeuristicType::Jw,
            Heuristic::Dlis => HeuristicType::Dlis,
            Heuristic::Random(_) => HeuristicType::Random,
        }
    }

    /// Picks the next decision literal, or None once every variable is
    /// assigned.
    pub fn decide(&mut self, state: &State) -> Option<Literal> {
        match self {
            Heuristic::Vsids => vsids::decide(state),
            Heuristic::JeroslowWang(weights) => weights.decide(state),
            Heuristic::Dlis => dlis::decide(state),
            Heuristic::Random(rng) => random::decide(state, rng),
        }
    }

    pub fn clause_added(&mut self, clause: &Clause) {
        if let Heuristic::JeroslowWang(weights) = self {
            weights.clause_added(clause);
        }
    }
}

/// Saved phase wins over the heuristic's own sign preference.
pub(crate) fn literal_with_phase(state: &State, var: VarId, preferred_sign: bool) -> Literal {
    Literal::from_value(var, state.var_phases[var].unwrap_or(preferred_sign))
}
