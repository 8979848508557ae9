pub mod bandit;
pub mod cnf;
pub mod csv_log;
pub mod dimacs;
pub mod solver;
