#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::sat::clause::ClauseRef;
use crate::sat::literal::Literal;
use smallvec::SmallVec;
use std::ops::Index;

pub type WatchList = SmallVec<[ClauseRef; 6]>;

/// Reverse watch index: for every literal, the clauses with a slot on it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchedLiterals(Vec<WatchList>);

impl WatchedLiterals {
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self(vec![WatchList::new(); num_vars * 2])
    }

    /// Adds the two (empty) lists of a new variable.
    pub fn grow(&mut self) {
        self.0.push(WatchList::new());
        self.0.push(WatchList::new());
    }

    pub fn watch(&mut self, lit: Literal, clause: ClauseRef) {
        let list = &mut self.0[lit.index()];
        debug_assert!(!list.contains(&clause));
        list.push(clause);
    }

    pub fn unwatch(&mut self, lit: Literal, clause: ClauseRef) {
        self.0[lit.index()].retain(|c| *c != clause);
    }

    pub fn clear(&mut self) {
        self.0.iter_mut().for_each(SmallVec::clear);
    }
}

impl Index<Literal> for WatchedLiterals {
    type Output = WatchList;

    fn index(&self, index: Literal) -> &Self::Output {
        &self.0[index.index()]
    }
}
