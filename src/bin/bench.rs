use banditsat::cnf::Verdict;
use banditsat::csv_log::CsvLogger;
use banditsat::dimacs::clauses_from_dimacs_file;
use banditsat::solver::config::{Config, SolverMode, DEFAULT_EPOCH_SIZE, DEFAULT_RESTART_INTERVAL};
use banditsat::solver::heuristic::HeuristicType;
use banditsat::solver::Solver;
use clap::Parser;
use colored::Colorize;
use prettytable::{row, Table};
use std::time::Duration;
use walkdir::WalkDir;

/// Runs every CNF instance in a directory through the selected solver modes
/// with a per-instance wall-clock timeout and collects the results in a CSV.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing .cnf (or .cnf.gz) files
    #[arg(long)]
    cnf_dir: String,

    /// Output CSV file
    #[arg(long, default_value = "benchmark_results.csv")]
    output: String,

    /// Timeout per instance in seconds
    #[arg(long, default_value_t = 300)]
    timeout: u64,

    /// Conflicts per epoch
    #[arg(long, default_value_t = DEFAULT_EPOCH_SIZE)]
    epoch: usize,

    /// Conflicts per restart, 0 disables restarting
    #[arg(long, default_value_t = DEFAULT_RESTART_INTERVAL)]
    restart: usize,

    /// Heuristic for baseline runs
    #[arg(long, value_enum, default_value_t = HeuristicType::Vsids)]
    baseline_heuristic: HeuristicType,

    /// Modes to run per instance
    #[arg(long, value_enum, num_args = 1.., default_values_t = vec![SolverMode::Rl, SolverMode::Baseline])]
    modes: Vec<SolverMode>,
}

const RESULT_FIELDS: [&str; 9] = [
    "instance",
    "mode",
    "heuristic",
    "status",
    "time",
    "conflicts",
    "decisions",
    "propagations",
    "restarts",
];

struct InstanceResult {
    instance: String,
    mode: SolverMode,
    heuristic: HeuristicType,
    status: String,
    time: f64,
    conflicts: usize,
    decisions: usize,
    propagations: usize,
    restarts: usize,
}

impl InstanceResult {
    fn solved(&self) -> bool {
        self.status == "SAT" || self.status == "UNSAT"
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.instance.clone(),
            self.mode.name().to_string(),
            self.heuristic.name().to_string(),
            self.status.clone(),
            format!("{:.4}", self.time),
            self.conflicts.to_string(),
            self.decisions.to_string(),
            self.propagations.to_string(),
            self.restarts.to_string(),
        ]
    }
}

fn main() {
    let args = Args::parse();

    let mut cnf_files: Vec<String> = WalkDir::new(&args.cnf_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().display().to_string())
        .filter(|path| path.ends_with(".cnf") || path.ends_with(".cnf.gz"))
        .collect();
    cnf_files.sort();

    if cnf_files.is_empty() {
        eprintln!("No .cnf files found in {}", args.cnf_dir);
        std::process::exit(1);
    }

    // fresh results file per benchmark run
    let _ = std::fs::remove_file(&args.output);
    let logger = match CsvLogger::open(&args.output, &RESULT_FIELDS) {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("cannot open {}: {}", args.output, err);
            std::process::exit(1);
        }
    };

    println!("Found {} CNF files", cnf_files.len());
    println!(
        "Timeout: {}s, Epoch: {}, Restart: {}, Baseline heuristic: {}",
        args.timeout,
        args.epoch,
        args.restart,
        args.baseline_heuristic.name()
    );

    let total_runs = cnf_files.len() * args.modes.len();
    let mut results = vec![];
    let mut current_run = 0;

    for path in &cnf_files {
        for &mode in &args.modes {
            current_run += 1;
            print!(
                "[{}/{}] Running {} ({})... ",
                current_run,
                total_runs,
                path,
                mode.name()
            );
            let _ = std::io::Write::flush(&mut std::io::stdout());
            let result = run_instance(path, mode, &args);
            println!(
                "{} in {:.2}s (conflicts={})",
                colorize_status(&result.status),
                result.time,
                result.conflicts
            );
            logger.log(&result.to_row());
            results.push(result);
        }
    }

    println!("\nResults written to {}", args.output);
    print_summary(&args.modes, &results);
}

fn run_instance(path: &str, mode: SolverMode, args: &Args) -> InstanceResult {
    let instance = std::path::Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string());
    let mut result = InstanceResult {
        instance,
        mode,
        heuristic: args.baseline_heuristic,
        status: "TIMEOUT".to_string(),
        time: args.timeout as f64,
        conflicts: 0,
        decisions: 0,
        propagations: 0,
        restarts: 0,
    };

    let cnf = match clauses_from_dimacs_file(path) {
        Ok(cnf) => cnf,
        Err(err) => {
            result.status = format!("ERROR: {}", err);
            return result;
        }
    };

    let config = Config {
        mode,
        heuristic: args.baseline_heuristic,
        epoch_size: args.epoch,
        restart_interval: args.restart,
        timeout: Some(Duration::from_secs(args.timeout)),
        ..Config::default()
    };
    let mut solver = match Solver::new(cnf.clauses, cnf.num_vars, config) {
        Ok(solver) => solver,
        Err(err) => {
            result.status = format!("ERROR: {}", err);
            return result;
        }
    };

    let start = std::time::Instant::now();
    let verdict = solver.solve();
    let elapsed = start.elapsed().as_secs_f64();

    result.status = match verdict {
        Verdict::Sat(_) => "SAT".to_string(),
        Verdict::Unsat => "UNSAT".to_string(),
        Verdict::Timeout => "TIMEOUT".to_string(),
    };
    if verdict != Verdict::Timeout {
        result.time = elapsed;
    }
    result.conflicts = solver.stats().num_conflicts;
    result.decisions = solver.stats().num_decisions;
    result.propagations = solver.stats().num_propagations;
    result.restarts = solver.stats().num_restarts;
    result
}

fn colorize_status(status: &str) -> colored::ColoredString {
    match status {
        "SAT" => status.green(),
        "UNSAT" => status.blue(),
        "TIMEOUT" => status.yellow(),
        _ => status.red(),
    }
}

fn print_summary(modes: &[SolverMode], results: &[InstanceResult]) {
    let mut table = Table::new();
    table.set_format(*prettytable::format::consts::FORMAT_NO_COLSEP);
    table.set_titles(row![b -> "Mode", "Solved", "Avg time"]);
    for &mode in modes {
        let mode_results: Vec<&InstanceResult> =
            results.iter().filter(|r| r.mode == mode).collect();
        let solved: Vec<&&InstanceResult> =
            mode_results.iter().filter(|r| r.solved()).collect();
        let avg_time = solved.iter().map(|r| r.time).sum::<f64>() / solved.len().max(1) as f64;
        table.add_row(row![
            mode.name(),
            format!("{}/{}", solved.len(), mode_results.len()),
            format!("{:.2}s", avg_time)
        ]);
    }
    table.printstd();
}
