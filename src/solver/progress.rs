use crate::solver::statistics::StateStatistics;
use colored::Colorize;

const PRINT_INTERVAL: std::time::Duration = std::time::Duration::from_secs(2);
const CONFLICT_PRINT_INTERVAL: usize = 50;

/// Throttled stdout progress: one line per 50 conflicts or 2 seconds,
/// whichever comes first. All lines are DIMACS comments.
pub struct Progress {
    time_of_last_print: std::time::Instant,
}

impl Progress {
    pub fn new() -> Self {
        Progress {
            time_of_last_print: std::time::Instant::now(),
        }
    }

    pub fn print_conflict_if_necessary(
        &mut self,
        stats: &StateStatistics,
        decision_level: usize,
        mode: &str,
        heuristic: &str,
    ) {
        if stats.num_conflicts % CONFLICT_PRINT_INTERVAL == 0
            || self.time_of_last_print.elapsed() > PRINT_INTERVAL
        {
            self.print_line(stats, decision_level, mode, heuristic);
        }
    }

    pub fn print_decision_if_stale(
        &mut self,
        stats: &StateStatistics,
        decision_level: usize,
        mode: &str,
        heuristic: &str,
    ) {
        if self.time_of_last_print.elapsed() > PRINT_INTERVAL {
            self.print_line(stats, decision_level, mode, heuristic);
        }
    }

    fn print_line(
        &mut self,
        stats: &StateStatistics,
        decision_level: usize,
        mode: &str,
        heuristic: &str,
    ) {
        let tag = format!("[{}]", mode);
        println!(
            "c {} lvl={} conflicts={} decisions={} propagations={} restarts={} heuristic={}",
            tag.as_str().truecolor(120, 120, 120),
            decision_level,
            stats.num_conflicts,
            stats.num_decisions,
            stats.num_propagations,
            stats.num_restarts,
            heuristic.cyan(),
        );
        self.time_of_last_print = std::time::Instant::now();
    }
}

impl Default for Progress {
    fn default() -> Self {
        Progress::new()
    }
}
