#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The clause database of one solve session.
//!
//! A [`Theory`] owns the variables (and their names), the clauses, the current
//! three-valued assignment, the reverse watch index and the trail. All watch
//! moves go through [`Theory::set_watch`] or [`Theory::find_new_watch`], which
//! update the clause slot and the index together, so for every literal the
//! clauses listed by [`Theory::watched_in`] are exactly the clauses with a slot
//! on that literal.
//!
//! Propagation is driven from outside: [`Theory::set_literal`] reports the
//! clauses that become unit as a direct consequence of one assignment, and the
//! caller decides when to assign their forced literals. The search in
//! [`dpll`](crate::sat::dpll) does exactly that.
//!
//! ```
//! use propsat::sat::theory::Theory;
//!
//! let mut theory = Theory::parse(["a b c", "-b"]).unwrap();
//! let mut units = Vec::new();
//! assert!(theory.init_watched(&mut units));
//! assert_eq!(units.len(), 1);
//!
//! let a = theory.literal("a", false).unwrap();
//! assert!(theory.set_literal(a, &mut units));
//! ```

use crate::sat::assignment::{Assignment, Valuation};
use crate::sat::clause::{Clause, ClauseRef, UnitClause};
use crate::sat::cnf::{Cnf, CnfClause, NamedLiteral};
use crate::sat::error::{Error, Result};
use crate::sat::literal::{Literal, Variable};
use crate::sat::log::targets;
use crate::sat::trail::Trail;
use crate::sat::watch::{WatchList, WatchedLiterals};
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Default)]
pub struct Theory {
    names: Vec<String>,
    lookup: FxHashMap<String, Variable>,
    clauses: Vec<Clause>,
    assignment: Assignment,
    watches: WatchedLiterals,
    trail: Trail,
}

impl Theory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns every variable of `cnf` in order of first appearance and adds its clauses.
    #[must_use]
    pub fn from_cnf(cnf: &Cnf) -> Self {
        let mut theory = Self::new();
        for clause in cnf {
            theory.add_named_clause(clause);
        }
        theory
    }

    /// Builds a theory from clauses in textual notation, one clause per item.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedLiteral`] if a token is not a literal.
    pub fn parse<I, S>(clauses: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::from_cnf(&Cnf::parse(clauses)?))
    }

    /// Returns the variable called `name`, creating it if needed.
    pub fn variable(&mut self, name: &str) -> Variable {
        if let Some(&var) = self.lookup.get(name) {
            return var;
        }

        #[allow(clippy::cast_possible_truncation)]
        let var = self.names.len() as Variable;
        self.names.push(name.to_string());
        self.lookup.insert(name.to_string(), var);
        self.assignment.grow();
        self.watches.grow();
        var
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Variable> {
        self.lookup.get(name).copied()
    }

    /// The literal of an existing variable.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownVariable`] if no variable is called `name`.
    pub fn literal(&self, name: &str, polarity: bool) -> Result<Literal> {
        self.lookup(name)
            .map(|var| Literal::new(var, polarity))
            .ok_or_else(|| Error::UnknownVariable(name.to_string()))
    }

    /// Resolves a literal in textual notation, e.g. `-b`.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedLiteral`] or [`Error::UnknownVariable`].
    pub fn parse_literal(&self, token: &str) -> Result<Literal> {
        let named: NamedLiteral = token.parse()?;
        self.literal(named.name(), named.polarity())
    }

    #[must_use]
    pub fn name(&self, var: Variable) -> &str {
        &self.names[var as usize]
    }

    #[must_use]
    pub fn named(&self, lit: Literal) -> NamedLiteral {
        NamedLiteral::new(self.name(lit.variable()), lit.polarity())
    }

    pub fn variables(&self) -> impl Iterator<Item = (Variable, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (i as Variable, n.as_str()))
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.names.len()
    }

    /// Adds a clause, returning its handle. Watches are set by [`Self::init_watched`].
    pub fn add_clause(&mut self, literals: impl IntoIterator<Item = Literal>) -> ClauseRef {
        let clause = Clause::new(literals);
        debug_assert!(
            clause
                .iter()
                .all(|l| (l.variable() as usize) < self.num_vars())
        );
        self.clauses.push(clause);
        self.clauses.len() - 1
    }

    pub fn add_named_clause(&mut self, clause: &CnfClause) -> ClauseRef {
        let literals = clause
            .iter()
            .map(|l| Literal::new(self.variable(l.name()), l.polarity()))
            .collect_vec();
        self.add_clause(literals)
    }

    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    #[must_use]
    pub fn clause(&self, clause: ClauseRef) -> &Clause {
        &self.clauses[clause]
    }

    #[must_use]
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub const fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    #[must_use]
    pub fn value(&self, lit: Literal) -> Option<bool> {
        self.assignment.literal_value(lit)
    }

    #[must_use]
    pub fn is_true(&self, lit: Literal) -> bool {
        self.assignment.is_true(lit)
    }

    #[must_use]
    pub fn is_false(&self, lit: Literal) -> bool {
        self.assignment.is_false(lit)
    }

    #[must_use]
    pub fn is_set(&self, lit: Literal) -> bool {
        self.assignment.is_set(lit)
    }

    /// Makes `lit` true without touching the trail or the watches.
    ///
    /// Meant for driving [`Self::find_new_watch`] by hand; the search uses
    /// [`Self::set_literal`].
    ///
    /// # Errors
    ///
    /// [`Error::ConflictingAssignment`] if `lit` is currently false.
    pub fn assign(&mut self, lit: Literal) -> Result<()> {
        if self.is_false(lit) {
            return Err(Error::ConflictingAssignment(
                self.name(lit.variable()).to_string(),
            ));
        }
        self.assignment.assign(lit);
        Ok(())
    }

    /// Clears the value of `var` without touching the trail.
    pub fn unassign(&mut self, var: Variable) {
        self.assignment.unassign(var);
    }

    #[must_use]
    pub fn trail(&self) -> &[Literal] {
        self.trail.as_slice()
    }

    #[must_use]
    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    /// Clauses currently watching `lit`.
    #[must_use]
    pub fn watched_in(&self, lit: Literal) -> &[ClauseRef] {
        &self.watches[lit]
    }

    /// Puts watch `slot` of `clause` on `lit`, moving the clause between watch lists.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidWatchSlot`] unless `slot` is 0 or 1,
    /// [`Error::NotAMember`] if `lit` is not in the clause and
    /// [`Error::DuplicateWatch`] if the other slot already watches `lit`.
    pub fn set_watch(&mut self, clause: ClauseRef, slot: usize, lit: Literal) -> Result<()> {
        if slot > 1 {
            return Err(Error::InvalidWatchSlot(slot));
        }

        let c = &self.clauses[clause];
        let Some(position) = c.position(lit) else {
            return Err(Error::NotAMember {
                literal: self.named(lit).to_string(),
                clause,
            });
        };

        if c.watch(slot) == Some(lit) {
            return Ok(());
        }

        if c.watch(1 - slot) == Some(lit) {
            return Err(Error::DuplicateWatch {
                literal: self.named(lit).to_string(),
                clause,
            });
        }

        self.move_watch(clause, slot, position);
        Ok(())
    }

    fn move_watch(&mut self, clause: ClauseRef, slot: usize, position: usize) {
        let c = &mut self.clauses[clause];
        let previous = c.set_watch_position(slot, position);
        let current = c[position];

        if let Some(previous) = previous {
            self.watches.unwatch(previous, clause);
        }
        self.watches.watch(current, clause);

        log::trace!(target: targets::WATCH, "Clause {clause} slot {slot}: {previous:?} -> {current:?}");
    }

    /// Replaces the watch on `falsified`, which has just become false.
    ///
    /// Scans the unwatched literals in clause order for one that is true or
    /// unset and moves the watch there. Returns `false`, leaving the watches
    /// as they are, if there is none or if `falsified` is not watched by
    /// `clause`. The caller tells the cases apart through the other watch:
    /// unset means unit, false means conflict, true means satisfied.
    pub fn find_new_watch(&mut self, clause: ClauseRef, falsified: Literal) -> bool {
        let c = &self.clauses[clause];
        let Some(slot) = c.watch_slot(falsified) else {
            debug_assert!(false, "clause {clause} does not watch {falsified:?}");
            return false;
        };

        match c.find_replacement(&self.assignment) {
            Some(position) => {
                self.move_watch(clause, slot, position);
                true
            }
            None => false,
        }
    }

    /// Sets up the watches of every clause.
    ///
    /// Clauses with at least two literals watch their first two; a single
    /// literal clause is reported in `units`. Returns `false` if the theory
    /// holds an empty clause.
    pub fn init_watched(&mut self, units: &mut impl Extend<UnitClause>) -> bool {
        let mut consistent = true;

        for clause in 0..self.clauses.len() {
            match self.clauses[clause].len() {
                0 => {
                    log::debug!(target: targets::WATCH, "Clause {clause} is empty");
                    consistent = false;
                }
                1 => {
                    let literal = self.clauses[clause][0];
                    units.extend(std::iter::once(UnitClause { clause, literal }));
                }
                _ => {
                    for lit in self.clauses[clause].clear_watches().into_iter().flatten() {
                        self.watches.unwatch(lit, clause);
                    }
                    self.move_watch(clause, 0, 0);
                    self.move_watch(clause, 1, 1);
                }
            }
        }

        consistent
    }

    /// Makes `lit` true, records it on the trail and repairs the watches of
    /// every clause that was watching `!lit`.
    ///
    /// Clauses that cannot be repaired and whose other watch is unset are
    /// reported in `units`. Returns `false` as soon as a clause is found with
    /// both watches false; `lit` stays assigned either way.
    ///
    /// # Panics
    ///
    /// If `lit` is already assigned.
    pub fn set_literal(&mut self, lit: Literal, units: &mut impl Extend<UnitClause>) -> bool {
        assert!(
            !self.is_set(lit),
            "set_literal({}) on an assigned variable",
            self.named(lit)
        );

        self.assignment.assign(lit);
        self.trail.push(lit);
        log::trace!(target: targets::PROPAGATION, "{} -> true", self.named(lit));

        let falsified = lit.negated();
        let watchers: WatchList = self.watches[falsified].clone();

        for clause in watchers {
            if self.find_new_watch(clause, falsified) {
                continue;
            }

            let other = self.clauses[clause].other_watch(falsified);
            match other.map(|o| (o, self.value(o))) {
                Some((_, Some(true))) => {}
                Some((literal, None)) => {
                    log::trace!(target: targets::PROPAGATION, "Clause {clause} is unit on {}", self.named(literal));
                    units.extend(std::iter::once(UnitClause { clause, literal }));
                }
                Some((_, Some(false))) | None => {
                    log::trace!(target: targets::PROPAGATION, "Clause {clause} is falsified");
                    return false;
                }
            }
        }

        true
    }

    /// Undoes the most recent assignment on the trail and returns its literal.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTrail`] if nothing is assigned.
    pub fn unset_literal(&mut self) -> Result<Literal> {
        let lit = self.trail.pop().ok_or(Error::EmptyTrail)?;
        self.assignment.unassign(lit.variable());
        log::trace!(target: targets::BACKTRACK, "{} -> unset", self.named(lit));
        Ok(lit)
    }

    /// Undoes assignments until the trail holds `len` literals.
    pub fn unset_to(&mut self, len: usize) {
        while self.trail.len() > len {
            if self.unset_literal().is_err() {
                break;
            }
        }
    }

    /// Undoes every assignment made through the trail.
    pub fn reset(&mut self) {
        self.unset_to(0);
    }

    /// Assigned variables by name. Total once every variable is assigned.
    #[must_use]
    pub fn valuation(&self) -> Valuation {
        self.variables()
            .filter_map(|(var, name)| self.assignment.var_value(var).map(|b| (name, b)))
            .collect()
    }

    /// Every clause that is unit under the current assignment, by a full scan.
    #[must_use]
    pub fn unit_clauses(&self) -> Vec<UnitClause> {
        self.clauses
            .iter()
            .enumerate()
            .filter_map(|(clause, c)| {
                c.unit_literal(&self.assignment)
                    .map(|literal| UnitClause { clause, literal })
            })
            .collect()
    }

    /// Whether the watch index agrees with the clause slots, in both directions.
    #[must_use]
    pub fn watches_consistent(&self) -> bool {
        (0..self.num_vars() as Variable)
            .flat_map(|var| [Literal::positive(var), Literal::negative(var)])
            .all(|lit| {
                let expected = self
                    .clauses
                    .iter()
                    .positions(|c| c.watched().contains(&Some(lit)))
                    .collect_vec();
                let actual = self.watched_in(lit).iter().copied().sorted().collect_vec();
                expected == actual
            })
    }

    /// The clauses back in named form.
    #[must_use]
    pub fn to_cnf(&self) -> Cnf {
        self.clauses
            .iter()
            .map(|c| c.iter().map(|&l| self.named(l)).collect())
            .collect()
    }
}

impl Display for Theory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_cnf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn lit(t: &Theory, token: &str) -> Literal {
        t.parse_literal(token).unwrap()
    }

    #[test]
    fn test_parse_interns_in_order() {
        let t = Theory::parse(["b a", "-c b"]).unwrap();
        assert_eq!(t.num_vars(), 3);
        assert_eq!(t.num_clauses(), 2);
        assert_eq!(t.lookup("b"), Some(0));
        assert_eq!(t.lookup("a"), Some(1));
        assert_eq!(t.lookup("c"), Some(2));
        assert_eq!(t.to_string(), "b a; -c b");
    }

    #[test]
    fn test_unknown_variable() {
        let t = Theory::parse(["a"]).unwrap();
        assert!(matches!(t.literal("b", true), Err(Error::UnknownVariable(n)) if n == "b"));
    }

    #[test]
    fn test_set_watch_errors() {
        let mut t = Theory::parse(["a b", "c"]).unwrap();
        let a = lit(&t, "a");
        let c = lit(&t, "c");

        assert!(matches!(t.set_watch(0, 2, a), Err(Error::InvalidWatchSlot(2))));
        assert!(matches!(t.set_watch(0, 0, c), Err(Error::NotAMember { clause: 0, .. })));

        t.set_watch(0, 0, a).unwrap();
        assert!(matches!(t.set_watch(0, 1, a), Err(Error::DuplicateWatch { .. })));
        assert!(t.watches_consistent());
    }

    #[test]
    fn test_assign_conflict() {
        let mut t = Theory::parse(["a"]).unwrap();
        let a = lit(&t, "a");

        t.assign(a).unwrap();
        t.assign(a).unwrap();
        assert!(matches!(t.assign(!a), Err(Error::ConflictingAssignment(n)) if n == "a"));
    }

    #[test]
    fn test_unset_on_empty_trail() {
        let mut t = Theory::parse(["a"]).unwrap();
        assert!(matches!(t.unset_literal(), Err(Error::EmptyTrail)));
    }

    #[test]
    fn test_init_watched_reports_units_and_empty() {
        let mut t = Theory::parse(["a b c", "-b", "d"]).unwrap();
        let mut units = Vec::new();
        assert!(t.init_watched(&mut units));
        assert_eq!(
            units,
            vec![
                UnitClause { clause: 1, literal: lit(&t, "-b") },
                UnitClause { clause: 2, literal: lit(&t, "d") },
            ]
        );
        assert_eq!(t.clause(0).watched(), [Some(lit(&t, "a")), Some(lit(&t, "b"))]);
        assert!(t.watches_consistent());

        let mut t = Theory::parse(["a b", ""]).unwrap();
        assert!(!t.init_watched(&mut Vec::new()));
    }

    #[test]
    fn test_set_literal_reports_direct_units_only() {
        let mut t = Theory::parse(["a b", "-b c", "-c d"]).unwrap();
        let mut units = HashSet::new();
        assert!(t.init_watched(&mut units));
        assert!(units.is_empty());

        assert!(t.set_literal(lit(&t, "-a"), &mut units));
        assert_eq!(units, HashSet::from([UnitClause { clause: 0, literal: lit(&t, "b") }]));

        units.clear();
        assert!(t.set_literal(lit(&t, "b"), &mut units));
        assert_eq!(units, HashSet::from([UnitClause { clause: 1, literal: lit(&t, "c") }]));
        assert!(t.watches_consistent());
    }

    #[test]
    fn test_set_literal_conflict() {
        let mut t = Theory::parse(["a b"]).unwrap();
        assert!(t.init_watched(&mut Vec::new()));
        assert!(t.set_literal(lit(&t, "-a"), &mut Vec::new()));
        assert!(!t.set_literal(lit(&t, "-b"), &mut Vec::new()));
        assert!(t.is_true(lit(&t, "-b")));
    }

    #[test]
    fn test_tautology_is_satisfied_not_unit() {
        let mut t = Theory::parse(["a -a"]).unwrap();
        let mut units = Vec::new();
        assert!(t.init_watched(&mut units));
        assert!(t.set_literal(lit(&t, "a"), &mut units));
        assert!(units.is_empty());
    }

    #[test]
    fn test_unset_restores_assignment() {
        let mut t = Theory::parse(["a b c", "-a d"]).unwrap();
        assert!(t.init_watched(&mut Vec::new()));
        let before = t.assignment().clone();

        for token in ["-a", "-b", "d"] {
            let l = lit(&t, token);
            t.set_literal(l, &mut Vec::new());
        }
        assert_eq!(t.trail_len(), 3);

        t.unset_to(0);
        assert_eq!(t.assignment(), &before);
        assert!(t.trail().is_empty());
    }

    #[test]
    fn test_valuation_only_reports_assigned() {
        let mut t = Theory::parse(["a b"]).unwrap();
        t.init_watched(&mut Vec::new());
        t.set_literal(lit(&t, "-b"), &mut Vec::new());
        assert_eq!(t.valuation().to_string(), "-b");
    }
}
