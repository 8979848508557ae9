use crate::solver::heuristic::HeuristicType;
use clap::ValueEnum;
use std::time::Duration;

pub const DEFAULT_EPOCH_SIZE: usize = 50;
pub const DEFAULT_RESTART_INTERVAL: usize = 200;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SolverMode {
    /// Bandit-controlled heuristic selection, re-evaluated every epoch.
    Rl,
    /// One fixed branching heuristic for the whole solve.
    Baseline,
}

impl SolverMode {
    pub fn name(&self) -> &'static str {
        match self {
            SolverMode::Rl => "rl",
            SolverMode::Baseline => "baseline",
        }
    }
}

impl std::fmt::Display for SolverMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: SolverMode,
    /// Branching heuristic for baseline mode; ignored in rl mode.
    pub heuristic: HeuristicType,
    /// Conflicts per epoch.
    pub epoch_size: usize,
    /// Conflicts per restart, 0 disables restarting.
    pub restart_interval: usize,
    /// Per-epoch CSV log destination.
    pub log_file: Option<String>,
    /// Cooperative deadline, checked in the search loop. Used by the
    /// benchmark harness; the solver returns Verdict::Timeout when it fires.
    pub timeout: Option<Duration>,
    /// Seed for the random heuristic and the bandit tie-break.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: SolverMode::Rl,
            heuristic: HeuristicType::Vsids,
            epoch_size: DEFAULT_EPOCH_SIZE,
            restart_interval: DEFAULT_RESTART_INTERVAL,
            log_file: None,
            timeout: None,
            seed: DEFAULT_SEED,
        }
    }
}

impl Config {
    pub fn baseline(heuristic: HeuristicType) -> Self {
        Config {
            mode: SolverMode::Baseline,
            heuristic,
            ..Default::default()
        }
    }
}
