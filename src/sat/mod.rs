#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
pub mod assignment;
pub mod clause;
pub mod cnf;
pub mod dimacs;
pub mod dpll;
pub mod error;
pub mod formula;
pub mod literal;
pub mod log;
pub mod solver;
pub mod theory;
pub mod trail;
pub mod tseitin;
pub mod variable_selection;
pub mod watch;
