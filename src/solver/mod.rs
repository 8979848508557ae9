pub mod clause_database;
pub mod clause_learning;
pub mod config;
pub mod epoch;
pub mod features;
pub mod heuristic;
pub mod literal_watching;
pub mod progress;
pub mod restarts;
pub mod state;
pub mod statistics;
pub mod trail;
pub mod unit_propagation;

use crate::bandit::LinUcb;
use crate::cnf::{Clause, Literal, SolutionAssignment, Verdict};
use crate::csv_log::CsvLogger;
use crate::solver::clause_learning::ClauseLearner;
use crate::solver::config::{Config, SolverMode};
use crate::solver::epoch::{epoch_fieldnames, EpochController};
use crate::solver::heuristic::{Heuristic, HeuristicType};
use crate::solver::progress::Progress;
use crate::solver::restarts::Restarter;
use crate::solver::state::State;
use crate::solver::statistics::StateStatistics;
use crate::solver::trail::{AssignmentReason, Trail};
use crate::solver::unit_propagation::propagate;

pub const LINUCB_ALPHA: f64 = 0.3;

/// Bandit arm order; CSV rows and progress lines name arms by these.
const ARM_ORDER: [HeuristicType; 4] = [
    HeuristicType::Vsids,
    HeuristicType::Jw,
    HeuristicType::Dlis,
    HeuristicType::Random,
];

pub struct Solver {
    config: Config,
    state: State,
    trail: Trail,
    clause_learner: ClauseLearner,
    restarter: Restarter,
    heuristics: Vec<Heuristic>,
    current_arm: usize,
    agent: Option<LinUcb>,
    epoch: EpochController,
    logger: Option<CsvLogger>,
    progress: Progress,
}

impl Solver {
    pub fn new(clauses: Vec<Clause>, num_vars: usize, config: Config) -> Result<Self, String> {
        let state = State::init(clauses, num_vars);
        let heuristics = match config.mode {
            SolverMode::Rl => ARM_ORDER
                .iter()
                .map(|kind| kind.create(&state, config.seed))
                .collect(),
            SolverMode::Baseline => vec![config.heuristic.create(&state, config.seed)],
        };
        let logger = match &config.log_file {
            Some(path) => Some(CsvLogger::open(path, &epoch_fieldnames())?),
            None => None,
        };
        Ok(Solver {
            trail: Trail::new(num_vars),
            clause_learner: ClauseLearner::default(),
            restarter: Restarter::init(config.restart_interval),
            epoch: EpochController::new(config.epoch_size),
            heuristics,
            current_arm: 0,
            agent: None,
            logger,
            progress: Progress::new(),
            state,
            config,
        })
    }

    pub fn solve(&mut self) -> Verdict {
        self.state.stats.start_timing();
        let deadline = self.config.timeout.map(|t| std::time::Instant::now() + t);

        if self
            .state
            .clause_database
            .clauses()
            .iter()
            .any(|clause| clause.literals.is_empty())
        {
            self.state.stats.stop_timing();
            return Verdict::Unsat;
        }
        if self.state.clause_database.is_empty() {
            self.state.stats.stop_timing();
            return Verdict::Sat(self.solution());
        }

        if self.config.mode == SolverMode::Rl {
            let context = features::context(&self.state, 0, 0, 0, features::ELAPSED_EPSILON);
            self.agent = Some(LinUcb::new(
                self.heuristics.len(),
                context.len(),
                LINUCB_ALPHA,
                self.config.seed,
            ));
        }
        self.open_epoch();

        // original unit clauses force their literal at level 0; a
        // contradicting pair is already the terminal conflict
        if !self.enqueue_initial_units() {
            self.state.stats.num_conflicts += 1;
            self.close_epoch(true);
            self.state.stats.stop_timing();
            return Verdict::Unsat;
        }

        loop {
            if let Some(deadline) = deadline {
                if std::time::Instant::now() >= deadline {
                    self.state.stats.stop_timing();
                    return Verdict::Timeout;
                }
            }

            if let Some(conflict_clause_id) = propagate(&mut self.state, &mut self.trail) {
                self.state.stats.num_conflicts += 1;
                let (mode, heuristic) = (self.mode_label(), self.heuristic_name());
                self.progress.print_conflict_if_necessary(
                    &self.state.stats,
                    self.trail.decision_level,
                    mode,
                    heuristic,
                );

                if self.trail.decision_level == 0 {
                    self.close_epoch(true);
                    self.state.stats.stop_timing();
                    return Verdict::Unsat;
                }

                let (learned, assertion_level) = self.clause_learner.analyse_conflict(
                    &mut self.state,
                    &self.trail,
                    conflict_clause_id,
                );
                self.trail.backtrack(&mut self.state, assertion_level);

                let asserting = learned.literals[0];
                let learned_id = self
                    .state
                    .clause_database
                    .add_clause(learned, &mut self.state.literal_watcher);
                for heuristic in &mut self.heuristics {
                    heuristic.clause_added(&self.state.clause_database[learned_id]);
                }
                self.trail
                    .enqueue(&mut self.state, asserting, AssignmentReason::Forced(learned_id));

                if self.restarter.check_if_restart_necessary(
                    self.state.stats.num_conflicts,
                    self.trail.decision_level,
                ) {
                    self.trail.backtrack(&mut self.state, 0);
                    self.state.stats.num_restarts += 1;
                }

                if self.epoch.due(self.state.stats.num_conflicts) {
                    self.close_epoch(false);
                    self.open_epoch();
                }
            } else if let Some(literal) = self.pick_branch_literal() {
                self.trail.new_decision_level();
                self.trail
                    .enqueue(&mut self.state, literal, AssignmentReason::Heuristic);
                let (mode, heuristic) = (self.mode_label(), self.heuristic_name());
                self.progress.print_decision_if_stale(
                    &self.state.stats,
                    self.trail.decision_level,
                    mode,
                    heuristic,
                );
            } else {
                self.close_epoch(true);
                self.state.stats.stop_timing();
                return Verdict::Sat(self.solution());
            }
        }
    }

    pub fn stats(&self) -> &StateStatistics {
        &self.state.stats
    }

    pub fn learned_clauses(&self) -> usize {
        self.state.clause_database.learned_count()
    }

    fn open_epoch(&mut self) {
        if let Some(agent) = self.agent.as_mut() {
            self.current_arm = self.epoch.open(&self.state, agent);
        }
    }

    fn close_epoch(&mut self, solved: bool) {
        let heuristic_name = self.heuristics[self.current_arm].kind().name();
        match self.agent.as_mut() {
            Some(agent) => self.epoch.close(
                &self.state,
                agent,
                heuristic_name,
                solved,
                self.logger.as_ref(),
            ),
            None => {
                self.epoch
                    .log_baseline_epoch(&self.state, heuristic_name, self.logger.as_ref())
            }
        }
    }

    fn enqueue_initial_units(&mut self) -> bool {
        for clause_id in 0..self.state.clause_database.original_count() {
            if self.state.clause_database[clause_id].literals.len() == 1 {
                let literal = self.state.clause_database[clause_id].literals[0];
                if !self
                    .trail
                    .enqueue(&mut self.state, literal, AssignmentReason::Forced(clause_id))
                {
                    return false;
                }
            }
        }
        true
    }

    fn pick_branch_literal(&mut self) -> Option<Literal> {
        if let Some(literal) = self.heuristics[self.current_arm].decide(&self.state) {
            return Some(literal);
        }
        // fallback: first unassigned variable, saved phase or true
        let var = (1..=self.state.num_vars).find(|var| self.state.vars[*var].is_none())?;
        Some(Literal::from_value(
            var,
            self.state.var_phases[var].unwrap_or(true),
        ))
    }

    fn heuristic_name(&self) -> &'static str {
        self.heuristics[self.current_arm].kind().name()
    }

    fn mode_label(&self) -> &'static str {
        match self.config.mode {
            SolverMode::Rl => "rl",
            SolverMode::Baseline => "baseline",
        }
    }

    fn solution(&self) -> SolutionAssignment {
        let mut assignment = self.state.get_assignment();
        for var in 1..=self.state.num_vars {
            assignment.entry(var).or_insert(true);
        }
        assignment
    }
}
