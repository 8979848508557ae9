use flate2::read::GzDecoder;
use std::io::Read;
use std::path::Path;

use crate::cnf::{Clause, Literal, SolutionAssignment, VarId};
use itertools::Itertools;

pub struct DimacsFile {
    pub num_vars: usize,
    pub clauses: Vec<Clause>,
}

pub fn clauses_from_dimacs_file(path: &str) -> Result<DimacsFile, String> {
    if !Path::new(path).exists() {
        return Err(format!("File {} not found", path));
    }

    clauses_from_dimacs(if path.ends_with(".gz") {
        let file = std::fs::File::open(path).map_err(|err| err.to_string())?;
        let mut decoder = GzDecoder::new(file);
        let mut result_string = String::new();
        decoder
            .read_to_string(&mut result_string)
            .map_err(|e| e.to_string())?;
        result_string
    } else {
        std::fs::read_to_string(path).map_err(|e| e.to_string())?
    })
}

/// Parses a DIMACS CNF string. Comment lines start with `c` (or `%`, found in
/// some benchmark sets). The header declares the variable count; the declared
/// clause count is advisory and not checked. Clauses are all remaining tokens
/// split at each `0`, so a clause may span lines; empty clauses produced by
/// stray terminators are discarded.
pub fn clauses_from_dimacs(input: String) -> Result<DimacsFile, String> {
    let file_content: Vec<String> = input
        .lines()
        .map(str::trim)
        .map(String::from)
        .filter(|line| !line.starts_with('c'))
        .filter(|line| !line.starts_with('%'))
        .filter(|line| !line.is_empty())
        .collect();

    // parse header
    let header = file_content
        .first()
        .ok_or("File was empty")?
        .split_whitespace()
        .collect::<Vec<&str>>();

    if header.len() != 4 || header[0] != "p" || header[1] != "cnf" {
        return Err("Invalid DIMACS header".to_string());
    }
    let num_vars = header[2].parse::<usize>().map_err(|err| err.to_string())?;
    let _num_clauses = header[3].parse::<usize>().map_err(|err| err.to_string())?;

    let literals = file_content
        .iter()
        .skip(1)
        .join(" ")
        .split_whitespace()
        .map(|lit| {
            lit.parse::<Literal>()
                .map_err(|_| format!("Invalid literal '{}'", lit))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut clauses = literals
        .split(|lit| lit.id() == 0)
        .filter(|clause| !clause.is_empty())
        .map(|clause| clause.to_vec())
        .collect_vec();

    // literals within a clause are distinct
    for clause in clauses.iter_mut() {
        let mut kept = Vec::with_capacity(clause.len());
        for lit in clause.iter() {
            if !kept.contains(lit) {
                kept.push(*lit);
            }
        }
        *clause = kept;
    }

    let max_var_in_clauses = clauses
        .iter()
        .flat_map(|clause| clause.iter().map(|lit| lit.id()))
        .max()
        .unwrap_or(0);

    Ok(DimacsFile {
        clauses: clauses.into_iter().map(Clause::from).collect_vec(),
        num_vars: num_vars.max(max_var_in_clauses),
    })
}

pub fn clauses_to_dimacs(clauses: &[Clause], num_vars: usize) -> String {
    let mut out = format!("p cnf {} {}\n", num_vars, clauses.len());
    for clause in clauses {
        for lit in &clause.literals {
            out.push_str(&format!("{} ", lit));
        }
        out.push_str("0\n");
    }
    out
}

pub fn solution_to_dimacs(solution: Option<&SolutionAssignment>) -> String {
    let assignment = match solution {
        None => return String::from("s UNSATISFIABLE"),
        Some(assignment) => assignment,
    };
    let mut dimacs = String::from("s SATISFIABLE\nv ");
    let sorted_vars = assignment
        .iter()
        .sorted_by_key(|(var_id, _)| **var_id)
        .collect_vec();
    for (var_id, value) in sorted_vars {
        dimacs.push_str(&format!("{}{} ", if *value { "" } else { "-" }, var_id));
    }
    dimacs.push('0');
    dimacs
}
