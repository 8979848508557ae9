use crate::solver::state::State;

/// Context dimension seen by the bandit: the features below, in order.
pub const NUM_FEATURES: usize = 11;

const MAX_ACTIVITY_EPSILON: f64 = 1e-9;
pub const ELAPSED_EPSILON: f64 = 1e-3;

/// Snapshots eleven scalars describing recent solver dynamics, each clamped
/// into [0, 1]. The `since_*` arguments are deltas since the current epoch
/// began; at epoch open they are all zero.
pub fn context(
    state: &State,
    since_conflicts: usize,
    since_decisions: usize,
    since_props: usize,
    since_time_secs: f64,
) -> Vec<f64> {
    let (avg_lbd, var_lbd, glue_ratio) = lbd_summary(state);

    let conflict_rate = since_conflicts as f64 / since_time_secs.max(ELAPSED_EPSILON);

    let activities = &state.activity[1..];
    let max_act = if activities.is_empty() {
        1.0
    } else {
        activities.iter().cloned().fold(0.0, f64::max)
    };
    let mean_act = activities.iter().sum::<f64>() / state.num_vars.max(1) as f64;
    let var_act = activities
        .iter()
        .map(|a| (a - mean_act) * (a - mean_act))
        .sum::<f64>()
        / state.num_vars.max(1) as f64;
    let std_act = var_act.max(0.0).sqrt();
    let mean_act_norm = mean_act / max_act.max(MAX_ACTIVITY_EPSILON);
    let std_act_norm = std_act / max_act.max(MAX_ACTIVITY_EPSILON);

    let total_clauses = state.clause_database.len();
    let learned_ratio = state.clause_database.learned_count() as f64 / total_clauses.max(1) as f64;
    let clause_var_ratio = total_clauses as f64 / state.num_vars.max(1) as f64;
    let restart_rate = state.stats.num_restarts as f64 / state.stats.num_conflicts.max(1) as f64;
    let prop_rate = since_props as f64 / since_decisions.max(1) as f64;
    let sat_ratio = state.satisfied_ratio();

    vec![
        (avg_lbd / 20.0).min(1.0),
        (var_lbd / 100.0).min(1.0),
        glue_ratio,
        (conflict_rate / 100.0).min(1.0),
        mean_act_norm.min(1.0),
        std_act_norm.min(1.0),
        learned_ratio,
        (clause_var_ratio / 10.0).min(1.0),
        restart_rate.min(1.0),
        (prop_rate / 100.0).min(1.0),
        sat_ratio,
    ]
}

/// Mean LBD of the rolling window, used by the epoch reward as well.
pub fn average_lbd(state: &State) -> f64 {
    if state.recent_lbd.is_empty() {
        return 0.0;
    }
    state.recent_lbd.iter().sum::<usize>() as f64 / state.recent_lbd.len() as f64
}

fn lbd_summary(state: &State) -> (f64, f64, f64) {
    if state.recent_lbd.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let len = state.recent_lbd.len() as f64;
    let avg = average_lbd(state);
    let variance = state
        .recent_lbd
        .iter()
        .map(|lbd| (*lbd as f64 - avg) * (*lbd as f64 - avg))
        .sum::<f64>()
        / len;
    let glue = state.recent_lbd.iter().filter(|lbd| **lbd <= 2).count() as f64 / len;
    (avg, variance, glue)
}
