#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! DPLL search over a [`Theory`] with watched-literal unit propagation.
//!
//! The search is iterative. Pending unit clauses are processed in FIFO order
//! until none are left or a clause is falsified. Without a conflict an
//! unassigned variable is picked and assigned as a *decision*, remembering
//! the trail length before it. On a conflict decisions are popped, undoing the
//! trail down to their recorded length, until one is found that has not been
//! flipped yet; it is then assigned the opposite value. A conflict with no
//! such decision left means the theory is unsatisfiable.
//!
//! ```
//! use propsat::sat::dpll::SatSolver;
//! use propsat::sat::solver::Solver;
//! use propsat::sat::theory::Theory;
//!
//! let theory = Theory::parse(["a b c", "-b"]).unwrap();
//! let solution = SatSolver::new(theory).solve();
//! let valuation = solution.valuation().unwrap();
//! assert_eq!(valuation.get("b"), Some(false));
//! ```

use crate::sat::assignment::Valuation;
use crate::sat::clause::UnitClause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::{Literal, Variable};
use crate::sat::log::targets;
use crate::sat::solver::{SearchStats, Solution, Solver, SolverConfig};
use crate::sat::theory::Theory;
use crate::sat::variable_selection::{Selector, VariableSelection};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Decision {
    literal: Literal,
    /// Trail length just before `literal` was assigned.
    trail_len: usize,
    flipped: bool,
}

#[derive(Debug, Clone)]
pub struct SatSolver {
    theory: Theory,
    config: SolverConfig,
    selector: Selector,
    decisions: Vec<Decision>,
    pending: VecDeque<UnitClause>,
    stats: SearchStats,
}

impl SatSolver {
    #[must_use]
    pub fn new(theory: Theory) -> Self {
        Self::with_config(theory, SolverConfig::default())
    }

    #[must_use]
    pub fn from_cnf(cnf: &Cnf) -> Self {
        Self::new(Theory::from_cnf(cnf))
    }

    #[must_use]
    pub fn with_config(theory: Theory, config: SolverConfig) -> Self {
        let selector = Selector::from_order(config.variable_order, theory.num_vars());
        Self {
            theory,
            config,
            selector,
            decisions: Vec::new(),
            pending: VecDeque::new(),
            stats: SearchStats::default(),
        }
    }

    #[must_use]
    pub const fn theory(&self) -> &Theory {
        &self.theory
    }

    #[must_use]
    pub fn into_theory(self) -> Theory {
        self.theory
    }

    #[must_use]
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Like [`Solver::solve`], but gives up with `None` instead of making
    /// decision number `max_decisions + 1`.
    pub fn solve_within(&mut self, max_decisions: usize) -> Option<Solution> {
        self.search(Some(max_decisions))
    }

    fn search(&mut self, max_decisions: Option<usize>) -> Option<Solution> {
        self.theory.reset();
        self.decisions.clear();
        self.pending.clear();
        self.stats = SearchStats::default();
        self.selector = Selector::from_order(self.config.variable_order, self.theory.num_vars());

        log::debug!(
            target: targets::SEARCH,
            "Solving {} variables, {} clauses",
            self.theory.num_vars(),
            self.theory.num_clauses()
        );

        let mut consistent = self.theory.init_watched(&mut self.pending);

        loop {
            if consistent && self.propagate() {
                let Some(var) = self.selector.pick(self.theory.assignment()) else {
                    return Some(self.finish(Solution::Satisfiable(self.theory.valuation())));
                };

                if max_decisions.is_some_and(|max| self.stats.decisions >= max) {
                    log::info!(target: targets::SEARCH, "Decision budget spent: {:?}", self.stats);
                    return None;
                }

                consistent = self.decide(var);
                continue;
            }

            self.stats.conflicts += 1;
            match self.backtrack() {
                Some(ok) => consistent = ok,
                None => return Some(self.finish(Solution::Unsatisfiable)),
            }
        }
    }

    fn finish(&self, solution: Solution) -> Solution {
        log::info!(target: targets::SEARCH, "{solution} after {:?}", self.stats);
        solution
    }

    /// Assigns pending units until none are left. `false` on a conflict.
    fn propagate(&mut self) -> bool {
        while let Some(unit) = self.pending.pop_front() {
            match self.theory.value(unit.literal) {
                Some(true) => {}
                Some(false) => {
                    log::trace!(target: targets::PROPAGATION, "Clause {} is falsified", unit.clause);
                    return false;
                }
                None => {
                    self.stats.propagations += 1;
                    if !self.theory.set_literal(unit.literal, &mut self.pending) {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn decide(&mut self, var: Variable) -> bool {
        let literal = Literal::new(var, self.config.phase.0);
        self.stats.decisions += 1;
        self.decisions.push(Decision {
            literal,
            trail_len: self.theory.trail_len(),
            flipped: false,
        });

        log::debug!(
            target: targets::SEARCH,
            "Decision {} at depth {}",
            self.theory.named(literal),
            self.decisions.len()
        );

        self.theory.set_literal(literal, &mut self.pending)
    }

    /// Flips the most recent unflipped decision.
    ///
    /// `None` if every decision has been flipped already, otherwise whether
    /// assigning the flipped literal stayed consistent.
    fn backtrack(&mut self) -> Option<bool> {
        self.pending.clear();

        while let Some(decision) = self.decisions.pop() {
            self.theory.unset_to(decision.trail_len);
            if decision.flipped {
                continue;
            }

            let literal = decision.literal.negated();
            self.decisions.push(Decision {
                literal,
                flipped: true,
                ..decision
            });
            self.stats.backtracks += 1;

            log::debug!(
                target: targets::BACKTRACK,
                "Flipping to {} at depth {}",
                self.theory.named(literal),
                self.decisions.len()
            );

            return Some(self.theory.set_literal(literal, &mut self.pending));
        }

        None
    }
}

impl Solver for SatSolver {
    fn solve(&mut self) -> Solution {
        self.search(None)
            .unwrap_or_else(|| unreachable!("search without a decision budget always finishes"))
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }
}

/// Solves `cnf` with the default configuration.
#[must_use]
pub fn solve_cnf(cnf: &Cnf) -> Solution {
    SatSolver::from_cnf(cnf).solve()
}

/// Whether `valuation` satisfies every clause of `theory`.
#[must_use]
pub fn check_valuation(theory: &Theory, valuation: &Valuation) -> bool {
    theory.to_cnf().verify(valuation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::solver::{Phase, VariableOrder};

    fn solve(clauses: &[&str]) -> Solution {
        SatSolver::new(Theory::parse(clauses).unwrap()).solve()
    }

    #[test]
    fn test_single_literal() {
        let solution = solve(&["a"]);
        assert_eq!(solution.valuation().unwrap().get("a"), Some(true));
    }

    #[test]
    fn test_complementary_units() {
        assert_eq!(solve(&["a", "-a"]), Solution::Unsatisfiable);
    }

    #[test]
    fn test_empty_clause() {
        assert_eq!(solve(&[""]), Solution::Unsatisfiable);
        assert_eq!(solve(&["", "p"]), Solution::Unsatisfiable);
    }

    #[test]
    fn test_empty_theory() {
        let solution = solve(&[]);
        assert!(solution.valuation().unwrap().is_empty());
    }

    #[test]
    fn test_chain_is_solved_by_propagation() {
        let mut solver = SatSolver::new(Theory::parse(["-a b", "-b c", "-c d", "-d e", "a"]).unwrap());
        let solution = solver.solve();

        assert_eq!(solution.valuation().unwrap().to_string(), "a b c d e");
        assert_eq!(solver.stats().decisions, 0);
        assert_eq!(solver.stats().propagations, 5);
    }

    #[test]
    fn test_backtracking_counts() {
        let mut solver = SatSolver::new(Theory::parse(["-a b", "-a -b"]).unwrap());
        let solution = solver.solve();

        assert_eq!(solution.valuation().unwrap().get("a"), Some(false));
        let stats = solver.stats();
        assert_eq!(stats.conflicts, 1);
        assert_eq!(stats.backtracks, 1);
    }

    #[test]
    fn test_phase_false_first() {
        let config = SolverConfig {
            phase: Phase(false),
            ..SolverConfig::default()
        };
        let mut solver = SatSolver::with_config(Theory::parse(["a b"]).unwrap(), config);
        let solution = solver.solve();
        assert_eq!(solution.valuation().unwrap().to_string(), "-a b");
    }

    #[test]
    fn test_random_order_still_correct() {
        let clauses = ["a b c", "-a -b", "-b -c", "-a -c", "a -c"];
        for seed in 0..8 {
            let config = SolverConfig {
                variable_order: VariableOrder::Random { seed },
                ..SolverConfig::default()
            };
            let theory = Theory::parse(clauses).unwrap();
            let mut solver = SatSolver::with_config(theory, config);
            let solution = solver.solve();
            assert!(check_valuation(solver.theory(), solution.valuation().unwrap()));
        }
    }

    #[test]
    fn test_solve_twice() {
        let mut solver = SatSolver::new(Theory::parse(["a b", "-a"]).unwrap());
        let first = solver.solve();
        let second = solver.solve();
        assert_eq!(first, second);
    }

    #[test]
    fn test_solve_within_budget() {
        let theory = Theory::parse(["a b c d"]).unwrap();
        let mut solver = SatSolver::new(theory);
        assert_eq!(solver.solve_within(0), None);
        assert!(solver.solve_within(4).is_some_and(|s| s.is_sat()));
    }
}
