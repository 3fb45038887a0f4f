//! Error types for structural misuse of the solver API.
//!
//! Unsatisfiability is never reported through this type: it is an ordinary
//! result, see [`Solution`](crate::sat::solver::Solution).

use crate::sat::clause::ClauseRef;
use thiserror::Error;

/// Errors raised when the theory, a clause, or textual input is used incorrectly.
#[derive(Debug, Error)]
pub enum Error {
    /// A variable name was looked up that the theory does not know.
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    /// A watch was requested on a literal that does not occur in the clause.
    #[error("literal `{literal}` is not a member of clause {clause}")]
    NotAMember { literal: String, clause: ClauseRef },

    /// Clauses have exactly two watch slots.
    #[error("watch slot {0} is out of range, only slots 0 and 1 exist")]
    InvalidWatchSlot(usize),

    /// Both watch slots of a clause would reference the same literal.
    #[error("clause {clause} already watches `{literal}` in its other slot")]
    DuplicateWatch { literal: String, clause: ClauseRef },

    /// `unset_literal` was called with nothing on the trail.
    #[error("cannot unset a literal, the trail is empty")]
    EmptyTrail,

    /// A literal was made true while its variable holds the opposite value.
    #[error("variable `{0}` is already assigned the opposite value")]
    ConflictingAssignment(String),

    /// A token of the textual clause notation could not be read as a literal.
    #[error("malformed literal `{0}`")]
    MalformedLiteral(String),

    /// A DIMACS line could not be parsed.
    #[error("DIMACS line {line}: {message}")]
    Dimacs { line: usize, message: String },

    /// I/O error while reading input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
