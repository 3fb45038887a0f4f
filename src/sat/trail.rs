#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use crate::sat::literal::Literal;
use std::ops::Index;

/// Chronological stack of literals made true, undone strictly from the top.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trail(Vec<Literal>);

impl Index<usize> for Trail {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl Trail {
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self(Vec::with_capacity(num_vars))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.0.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<Literal> {
        self.0.last().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Literal] {
        &self.0
    }

    pub fn push(&mut self, lit: Literal) {
        self.0.push(lit);
    }

    pub fn pop(&mut self) -> Option<Literal> {
        self.0.pop()
    }
}
