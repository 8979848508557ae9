use banditsat::cnf::{check_assignment, Clause, Verdict};
use banditsat::dimacs::{clauses_from_dimacs, clauses_from_dimacs_file, solution_to_dimacs};
use banditsat::solver::config::{Config, SolverMode, DEFAULT_EPOCH_SIZE, DEFAULT_RESTART_INTERVAL};
use banditsat::solver::heuristic::HeuristicType;
use banditsat::solver::Solver;
use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bandit-controlled solver or fixed-heuristic baseline
    #[arg(long, value_enum, default_value_t = SolverMode::Rl)]
    mode: SolverMode,

    /// Branching heuristic, used only in baseline mode
    #[arg(long, value_enum, default_value_t = HeuristicType::Vsids)]
    heuristic: HeuristicType,

    /// DIMACS CNF file (.cnf or .cnf.gz); a built-in example if omitted
    #[arg(long)]
    cnf: Option<String>,

    /// Conflicts per epoch
    #[arg(long, default_value_t = DEFAULT_EPOCH_SIZE)]
    epoch: usize,

    /// Conflicts per restart, 0 disables restarting
    #[arg(long, default_value_t = DEFAULT_RESTART_INTERVAL)]
    restart: usize,

    /// Per-epoch CSV log destination
    #[arg(long)]
    log: Option<String>,
}

const EXAMPLE_DIMACS: &str = "c Example\np cnf 3 2\n1 -2 0\n-1 2 3 0\n";

fn main() {
    let args = Args::parse();

    let parsed = match &args.cnf {
        Some(path) => clauses_from_dimacs_file(path),
        None => clauses_from_dimacs(EXAMPLE_DIMACS.to_string()),
    };
    let cnf = match parsed {
        Ok(cnf) => cnf,
        Err(err) => {
            eprintln!("c parse error: {}", err);
            std::process::exit(1);
        }
    };

    let config = Config {
        mode: args.mode,
        heuristic: args.heuristic,
        epoch_size: args.epoch,
        restart_interval: args.restart,
        log_file: args.log.clone(),
        ..Config::default()
    };

    let clauses = cnf.clauses.clone();
    let mut solver = match Solver::new(cnf.clauses, cnf.num_vars, config) {
        Ok(solver) => solver,
        Err(err) => {
            eprintln!("c {}", err);
            std::process::exit(1);
        }
    };
    let verdict = solver.solve();

    println!("{}", create_output(&args, &clauses, &verdict, &solver));
}

fn create_output(args: &Args, clauses: &[Clause], verdict: &Verdict, solver: &Solver) -> String {
    let mut output = format!("c {}", BANNER);
    output.push_str(&format!(
        "\nFile\n{}\n",
        args.cnf.as_deref().unwrap_or("<built-in example>")
    ));
    output.push_str(&format!(
        "\n{}\n",
        solver.stats().to_table(solver.learned_clauses())
    ));
    if let Verdict::Sat(assignment) = verdict {
        if check_assignment(clauses, assignment) {
            output.push_str("Solution has been verified and is correct\n");
        } else {
            output.push_str("WRONG SOLUTION\n");
        }
    }

    output = output.replace('\n', "\nc ");
    let solution = match verdict {
        Verdict::Sat(assignment) => solution_to_dimacs(Some(assignment)),
        Verdict::Unsat => solution_to_dimacs(None),
        Verdict::Timeout => String::from("s UNKNOWN"),
    };
    output.push_str(&format!("\n{}", solution));
    output
}

const BANNER: &str = r#"
    _                     _ _ _            _
   | |__   __ _ _ __   __| (_) |_ ___  __ _| |_
   | '_ \ / _` | '_ \ / _` | | __/ __|/ _` | __|
   | |_) | (_| | | | | (_| | | |_\__ \ (_| | |_
   |_.__/ \__,_|_| |_|\__,_|_|\__|___/\__,_|\__|
"#;
