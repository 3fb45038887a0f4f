//! Propositional satisfiability: Tseitin encoding of formulas into CNF and a
//! DPLL solver driven by two watched literals per clause.
//!
//! ```
//! use propsat::sat::dpll::SatSolver;
//! use propsat::sat::formula::Formula;
//! use propsat::sat::solver::Solver;
//!
//! let f = Formula::and([
//!     Formula::implies(Formula::var("rain"), Formula::var("wet")),
//!     Formula::var("rain"),
//! ]);
//! let solution = SatSolver::from_cnf(&f.to_cnf()).solve();
//! assert_eq!(solution.valuation().unwrap().get("wet"), Some(true));
//! ```

/// Literals, clauses, the theory, the encoder and the search.
pub mod sat;
