#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A reader for the DIMACS CNF file format.
//!
//! - Lines starting with `c` are comments.
//! - The problem line `p cnf <variables> <clauses>` is checked for shape; its
//!   counts are only used to log a mismatch.
//! - Every other line holds integer literals; a `0` terminates the current
//!   clause, so clauses may span lines and a bare `0` is the empty clause.
//! - A line starting with `%` ends the input.
//!
//! Variable `n` is named `"n"` in the resulting [`Cnf`], so the literal `-3`
//! becomes `-3` in textual notation as well.

use crate::sat::cnf::{Cnf, CnfClause, NamedLiteral};
use crate::sat::error::{Error, Result};
use crate::sat::log::targets;
use std::io::{self, BufRead};
use std::path::Path;

/// Parses DIMACS data from `reader`.
///
/// # Errors
///
/// [`Error::Io`] if reading fails and [`Error::Dimacs`] for a malformed
/// problem line or a token that is not an integer.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Cnf> {
    let mut cnf = Cnf::default();
    let mut current: Vec<NamedLiteral> = Vec::new();
    let mut declared = None;

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let number = number + 1;
        let mut parts = line.split_whitespace().peekable();

        match parts.peek() {
            Some(&"%") => break,
            None | Some(&"c") => {}
            Some(&"p") => declared = Some(parse_problem_line(&line, number)?),
            Some(_) => {
                for token in parts {
                    let value: i64 = token.parse().map_err(|e| Error::Dimacs {
                        line: number,
                        message: format!("'{token}' is not a literal: {e}"),
                    })?;

                    if value == 0 {
                        cnf.push(CnfClause::new(std::mem::take(&mut current)));
                    } else {
                        current.push(NamedLiteral::new(value.unsigned_abs().to_string(), value > 0));
                    }
                }
            }
        }
    }

    if !current.is_empty() {
        cnf.push(CnfClause::new(current));
    }

    if let Some((vars, clauses)) = declared {
        let found = cnf.vars().len();
        if found > vars || cnf.len() != clauses {
            log::warn!(
                target: targets::PARSE,
                "Problem line declares {vars} variables and {clauses} clauses, found {found} and {}",
                cnf.len()
            );
        }
    }

    log::debug!(target: targets::PARSE, "Read {} clauses", cnf.len());
    Ok(cnf)
}

fn parse_problem_line(line: &str, number: usize) -> Result<(usize, usize)> {
    let malformed = || Error::Dimacs {
        line: number,
        message: format!("malformed problem line '{line}'"),
    };

    match line.split_whitespace().collect::<Vec<_>>().as_slice() {
        ["p", "cnf", vars, clauses] => Ok((
            vars.parse().map_err(|_| malformed())?,
            clauses.parse().map_err(|_| malformed())?,
        )),
        _ => Err(malformed()),
    }
}

/// Reads and parses a DIMACS file.
///
/// # Errors
///
/// See [`parse_dimacs`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Cnf> {
    let file = std::fs::File::open(path)?;
    parse_dimacs(io::BufReader::new(file))
}
