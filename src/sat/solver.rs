#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Result, statistics and configuration types shared by solvers.

use crate::sat::assignment::Valuation;
use std::fmt::{Display, Formatter};

/// Outcome of a complete search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    /// A valuation of every variable of the theory satisfying every clause.
    Satisfiable(Valuation),
    Unsatisfiable,
}

impl Solution {
    #[must_use]
    pub const fn is_sat(&self) -> bool {
        matches!(self, Self::Satisfiable(_))
    }

    #[must_use]
    pub const fn valuation(&self) -> Option<&Valuation> {
        match self {
            Self::Satisfiable(v) => Some(v),
            Self::Unsatisfiable => None,
        }
    }

    #[must_use]
    pub fn into_valuation(self) -> Option<Valuation> {
        match self {
            Self::Satisfiable(v) => Some(v),
            Self::Unsatisfiable => None,
        }
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satisfiable(_) => write!(f, "SATISFIABLE"),
            Self::Unsatisfiable => write!(f, "UNSATISFIABLE"),
        }
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    pub decisions: usize,
    /// Literals assigned by unit propagation.
    pub propagations: usize,
    pub conflicts: usize,
    /// Decisions flipped after a conflict.
    pub backtracks: usize,
}

/// How the next decision variable is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariableOrder {
    /// Lowest unassigned variable, i.e. the first one seen in the clauses.
    #[default]
    Fixed,
    /// A fixed permutation drawn from `seed` when the search starts.
    Random { seed: u64 },
}

/// Value tried first for a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase(pub bool);

impl Default for Phase {
    fn default() -> Self {
        Self(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverConfig {
    pub variable_order: VariableOrder,
    pub phase: Phase,
}

pub trait Solver {
    /// Runs the search to completion.
    fn solve(&mut self) -> Solution;

    /// Counters of the most recent search.
    fn stats(&self) -> SearchStats;
}
