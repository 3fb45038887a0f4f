#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Clauses and their two watch slots.
//!
//! A [`Clause`] only records *which* of its literals are watched. The reverse
//! direction, from a literal to the clauses watching it, lives in
//! [`WatchedLiterals`](crate::sat::watch::WatchedLiterals) and is owned by the
//! [`Theory`](crate::sat::theory::Theory), which is the only place that moves
//! watches so that both directions stay in step.

use crate::sat::assignment::Assignment;
use crate::sat::literal::Literal;
use core::ops::Index;
use smallvec::SmallVec;

/// Handle of a clause inside its theory.
pub type ClauseRef = usize;

/// Literal storage, inline for short clauses.
pub type Literals = SmallVec<[Literal; 8]>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Clause {
    literals: Literals,
    watched: [Option<usize>; 2],
}

/// A clause whose only unset literal is forced true by the others being false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitClause {
    pub clause: ClauseRef,
    pub literal: Literal,
}

impl Clause {
    /// Builds a clause, dropping repeated occurrences of the same literal.
    ///
    /// Order of first occurrence is kept; it decides the watch scan order.
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> Self {
        let mut lits = Literals::new();
        for lit in literals {
            if !lits.contains(&lit) {
                lits.push(lit);
            }
        }

        Self {
            literals: lits,
            watched: [None, None],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    #[must_use]
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    #[must_use]
    pub fn contains(&self, lit: Literal) -> bool {
        self.literals.contains(&lit)
    }

    #[must_use]
    pub fn position(&self, lit: Literal) -> Option<usize> {
        self.literals.iter().position(|&l| l == lit)
    }

    /// The literals in watch slots 0 and 1.
    #[must_use]
    pub fn watched(&self) -> [Option<Literal>; 2] {
        self.watched.map(|p| p.map(|i| self.literals[i]))
    }

    #[must_use]
    pub fn watch(&self, slot: usize) -> Option<Literal> {
        self.watched[slot].map(|i| self.literals[i])
    }

    #[must_use]
    pub fn watch_position(&self, slot: usize) -> Option<usize> {
        self.watched[slot]
    }

    /// Which slot, if any, currently watches `lit`.
    #[must_use]
    pub fn watch_slot(&self, lit: Literal) -> Option<usize> {
        (0..2).find(|&slot| self.watch(slot) == Some(lit))
    }

    /// The literal watched by the slot that is not watching `lit`.
    #[must_use]
    pub fn other_watch(&self, lit: Literal) -> Option<Literal> {
        self.watch_slot(lit).and_then(|slot| self.watch(1 - slot))
    }

    /// Points `slot` at `position`, returning the literal it watched before.
    ///
    /// Only the clause side is updated; callers must update the watch index.
    pub(crate) fn set_watch_position(&mut self, slot: usize, position: usize) -> Option<Literal> {
        debug_assert!(position < self.len());
        debug_assert_ne!(self.watched[1 - slot], Some(position));

        let previous = self.watch(slot);
        self.watched[slot] = Some(position);
        previous
    }

    /// Empties both slots, returning what they watched.
    pub(crate) fn clear_watches(&mut self) -> [Option<Literal>; 2] {
        let previous = self.watched();
        self.watched = [None, None];
        previous
    }

    /// First literal, in clause order, that is not watched and not false.
    #[must_use]
    pub fn find_replacement(&self, assignment: &Assignment) -> Option<usize> {
        self.literals
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.watched.contains(&Some(*i)))
            .find(|(_, l)| !assignment.is_false(**l))
            .map(|(i, _)| i)
    }

    #[must_use]
    pub fn is_satisfied(&self, assignment: &Assignment) -> bool {
        self.literals.iter().any(|&l| assignment.is_true(l))
    }

    #[must_use]
    pub fn is_falsified(&self, assignment: &Assignment) -> bool {
        self.literals.iter().all(|&l| assignment.is_false(l))
    }

    /// The forced literal if exactly one literal is unset and every other one is false.
    #[must_use]
    pub fn unit_literal(&self, assignment: &Assignment) -> Option<Literal> {
        let mut unset = None;
        for &lit in &self.literals {
            match assignment.literal_value(lit) {
                Some(true) => return None,
                Some(false) => {}
                None if unset.is_some() => return None,
                None => unset = Some(lit),
            }
        }
        unset
    }
}

impl Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Literal;
    type IntoIter = core::slice::Iter<'a, Literal>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.iter()
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<T: IntoIterator<Item = Literal>>(iter: T) -> Self {
        Self::new(iter)
    }
}
