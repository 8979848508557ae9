use banditsat::cnf::{check_assignment, Clause, Literal, Verdict};
use banditsat::dimacs::{clauses_from_dimacs, clauses_to_dimacs};
use banditsat::solver::config::Config;
use banditsat::solver::heuristic::HeuristicType;
use banditsat::solver::Solver;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALL_HEURISTICS: [HeuristicType; 4] = [
    HeuristicType::Vsids,
    HeuristicType::Jw,
    HeuristicType::Dlis,
    HeuristicType::Random,
];

fn solve(clauses: &[Clause], num_vars: usize, config: Config) -> (Verdict, Solver) {
    let mut solver = Solver::new(clauses.to_vec(), num_vars, config).unwrap();
    let verdict = solver.solve();
    (verdict, solver)
}

fn brute_force_sat(clauses: &[Clause], num_vars: usize) -> bool {
    (0_u32..1 << num_vars).any(|bits| {
        clauses.iter().all(|clause| {
            clause.literals.iter().any(|lit| {
                let value = (bits >> (lit.id() - 1)) & 1 == 1;
                value == lit.positive()
            })
        })
    })
}

fn random_3sat(num_vars: usize, num_clauses: usize, seed: u64) -> Vec<Clause> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_clauses)
        .map(|_| {
            let mut vars = vec![];
            while vars.len() < 3 {
                let var = rng.gen_range(1..=num_vars);
                if !vars.contains(&var) {
                    vars.push(var);
                }
            }
            let literals = vars
                .into_iter()
                .map(|var| Literal::from_value(var, rng.gen_bool(0.5)))
                .collect::<Vec<_>>();
            Clause::from(literals)
        })
        .collect()
}

#[test]
fn end_to_end_example_is_sat() {
    let cnf = clauses_from_dimacs("p cnf 3 2\n1 -2 0\n-1 2 3 0\n".to_string()).unwrap();
    let (verdict, _) = solve(&cnf.clauses, cnf.num_vars, Config::default());
    match verdict {
        Verdict::Sat(assignment) => assert!(check_assignment(&cnf.clauses, &assignment)),
        other => panic!("expected SAT, got {:?}", other),
    }
}

#[test]
fn end_to_end_contradicting_units() {
    let cnf = clauses_from_dimacs("p cnf 1 2\n1 0\n-1 0\n".to_string()).unwrap();
    let (verdict, solver) = solve(&cnf.clauses, cnf.num_vars, Config::default());
    assert!(verdict.is_unsat());
    assert_eq!(solver.stats().num_decisions, 0);
    assert_eq!(solver.stats().num_conflicts, 1);
}

#[test]
fn end_to_end_single_clause() {
    let cnf = clauses_from_dimacs("p cnf 2 1\n1 2 0\n".to_string()).unwrap();
    let (verdict, solver) = solve(&cnf.clauses, cnf.num_vars, Config::default());
    match verdict {
        Verdict::Sat(assignment) => assert!(check_assignment(&cnf.clauses, &assignment)),
        other => panic!("expected SAT, got {:?}", other),
    }
    assert!(solver.stats().num_decisions <= 2);
}

#[test]
fn all_heuristics_and_modes_agree_on_random_3sat() {
    // 20 variables at clause/variable ratio 4.0
    let clauses = random_3sat(20, 80, 1234);

    let (rl_verdict, _) = solve(&clauses, 20, Config::default());
    let expected_sat = rl_verdict.is_sat();
    if let Verdict::Sat(assignment) = &rl_verdict {
        assert!(check_assignment(&clauses, assignment));
    }

    for heuristic in ALL_HEURISTICS {
        let (verdict, _) = solve(&clauses, 20, Config::baseline(heuristic));
        match verdict {
            Verdict::Sat(assignment) => {
                assert!(expected_sat, "{} found SAT, rl found UNSAT", heuristic.name());
                assert!(check_assignment(&clauses, &assignment));
            }
            Verdict::Unsat => assert!(!expected_sat, "{} found UNSAT", heuristic.name()),
            Verdict::Timeout => panic!("unexpected timeout"),
        }
    }
}

#[test]
fn verdicts_match_brute_force_on_small_instances() {
    for seed in 0..10 {
        let num_vars = 8;
        let clauses = random_3sat(num_vars, 36, seed);
        let expected = brute_force_sat(&clauses, num_vars);
        for heuristic in ALL_HEURISTICS {
            let (verdict, _) = solve(&clauses, num_vars, Config::baseline(heuristic));
            assert_eq!(
                verdict.is_sat(),
                expected,
                "heuristic {} disagrees with brute force on seed {}",
                heuristic.name(),
                seed
            );
        }
        let (verdict, _) = solve(&clauses, num_vars, Config::default());
        assert_eq!(verdict.is_sat(), expected, "rl disagrees on seed {}", seed);
    }
}

#[test]
fn deterministic_heuristics_reproduce_counts() {
    let clauses = random_3sat(16, 70, 99);
    for heuristic in ALL_HEURISTICS {
        let mut config = Config::baseline(heuristic);
        config.restart_interval = 0;
        let (first_verdict, first) = solve(&clauses, 16, config.clone());
        let (second_verdict, second) = solve(&clauses, 16, config);
        assert_eq!(first_verdict.is_sat(), second_verdict.is_sat());
        assert_eq!(first.stats().num_conflicts, second.stats().num_conflicts);
        assert_eq!(first.stats().num_decisions, second.stats().num_decisions);
        assert_eq!(
            first.stats().num_propagations,
            second.stats().num_propagations
        );
    }
}

#[test]
fn epoch_accounting_sums_to_total_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("epochs.csv");

    // an unsatisfiable instance with plenty of conflicts
    let cnf = clauses_from_dimacs(pigeonhole_dimacs(4, 3)).unwrap();
    let mut config = Config {
        epoch_size: 5,
        log_file: Some(path.to_str().unwrap().to_string()),
        ..Config::default()
    };
    config.restart_interval = 0;
    let (verdict, solver) = solve(&cnf.clauses, cnf.num_vars, config);
    assert!(verdict.is_unsat());

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    let header: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(header[0], "epoch");
    assert_eq!(header.len(), 22);

    let logged_conflicts: usize = lines
        .map(|line| line.split(',').nth(3).unwrap().parse::<usize>().unwrap())
        .sum();
    assert_eq!(logged_conflicts, solver.stats().num_conflicts);
}

#[test]
fn baseline_log_rows_have_empty_reward() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("epochs.csv");

    let cnf = clauses_from_dimacs(pigeonhole_dimacs(3, 2)).unwrap();
    let config = Config {
        log_file: Some(path.to_str().unwrap().to_string()),
        ..Config::baseline(HeuristicType::Jw)
    };
    let (verdict, _) = solve(&cnf.clauses, cnf.num_vars, config);
    assert!(verdict.is_unsat());

    let content = std::fs::read_to_string(&path).unwrap();
    let rows: Vec<&str> = content.lines().skip(1).collect();
    assert!(!rows.is_empty());
    for row in rows {
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields[1], "jw");
        assert_eq!(fields[2], "");
    }
}

#[test]
fn zero_timeout_reports_timeout() {
    let cnf = clauses_from_dimacs(pigeonhole_dimacs(4, 3)).unwrap();
    let config = Config {
        timeout: Some(std::time::Duration::ZERO),
        ..Config::default()
    };
    let (verdict, _) = solve(&cnf.clauses, cnf.num_vars, config);
    assert_eq!(verdict, Verdict::Timeout);
}

#[test]
fn dimacs_roundtrip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("formula.cnf");
    let original = "p cnf 4 3\n1 -2 0\n-1 2 3 0\n-3 4 0\n";
    std::fs::write(&path, original).unwrap();

    let parsed = banditsat::dimacs::clauses_from_dimacs_file(path.to_str().unwrap()).unwrap();
    let serialized = clauses_to_dimacs(&parsed.clauses, parsed.num_vars);
    let reparsed = clauses_from_dimacs(serialized).unwrap();

    assert_eq!(parsed.num_vars, reparsed.num_vars);
    assert_eq!(
        parsed
            .clauses
            .iter()
            .map(|c| c.literals.clone())
            .collect::<Vec<_>>(),
        reparsed
            .clauses
            .iter()
            .map(|c| c.literals.clone())
            .collect::<Vec<_>>()
    );
}

fn pigeonhole_dimacs(pigeons: usize, holes: usize) -> String {
    let var = |i: usize, j: usize| (i - 1) * holes + j;
    let mut clauses: Vec<String> = vec![];
    for i in 1..=pigeons {
        let lits: Vec<String> = (1..=holes).map(|j| var(i, j).to_string()).collect();
        clauses.push(format!("{} 0", lits.join(" ")));
    }
    for j in 1..=holes {
        for i in 1..=pigeons {
            for k in (i + 1)..=pigeons {
                clauses.push(format!("-{} -{} 0", var(i, j), var(k, j)));
            }
        }
    }
    format!(
        "p cnf {} {}\n{}\n",
        pigeons * holes,
        clauses.len(),
        clauses.join("\n")
    )
}
