#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Propositional formulas as an owned tree.

use crate::sat::assignment::Valuation;
use crate::sat::cnf::Cnf;
use crate::sat::tseitin::TseitinEncoder;
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    Variable(String),
    Negation(Box<Formula>),
    Conjunction(Vec<Formula>),
    Disjunction(Vec<Formula>),
    Implication(Box<Formula>, Box<Formula>),
    Equivalence(Box<Formula>, Box<Formula>),
}

impl Formula {
    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(f: Self) -> Self {
        Self::Negation(Box::new(f))
    }

    pub fn and(fs: impl IntoIterator<Item = Self>) -> Self {
        Self::Conjunction(fs.into_iter().collect())
    }

    pub fn or(fs: impl IntoIterator<Item = Self>) -> Self {
        Self::Disjunction(fs.into_iter().collect())
    }

    #[must_use]
    pub fn implies(a: Self, b: Self) -> Self {
        Self::Implication(Box::new(a), Box::new(b))
    }

    #[must_use]
    pub fn iff(a: Self, b: Self) -> Self {
        Self::Equivalence(Box::new(a), Box::new(b))
    }

    /// Direct children, left to right.
    #[must_use]
    pub fn subformulas(&self) -> Vec<&Self> {
        match self {
            Self::Variable(_) => Vec::new(),
            Self::Negation(a) => vec![a.as_ref()],
            Self::Conjunction(fs) | Self::Disjunction(fs) => fs.iter().collect(),
            Self::Implication(a, b) | Self::Equivalence(a, b) => vec![a.as_ref(), b.as_ref()],
        }
    }

    /// Names of the atoms occurring in the formula.
    #[must_use]
    pub fn vars(&self) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(f) = stack.pop() {
            if let Self::Variable(name) = f {
                vars.insert(name.clone());
            }
            stack.extend(f.subformulas());
        }
        vars
    }

    /// Moves the direct children out into `out`, leaving empty conjunctions behind.
    fn detach_children(&mut self, out: &mut Vec<Self>) {
        let take = |f: &mut Box<Self>| std::mem::replace(f.as_mut(), Self::Conjunction(Vec::new()));
        match self {
            Self::Variable(_) => {}
            Self::Negation(a) => out.push(take(a)),
            Self::Conjunction(fs) | Self::Disjunction(fs) => out.append(fs),
            Self::Implication(a, b) | Self::Equivalence(a, b) => {
                out.push(take(a));
                out.push(take(b));
            }
        }
    }

    /// Truth value under `valuation`, `None` if some atom is missing from it.
    #[must_use]
    pub fn eval(&self, valuation: &Valuation) -> Option<bool> {
        match self {
            Self::Variable(name) => valuation.get(name),
            Self::Negation(a) => a.eval(valuation).map(|b| !b),
            Self::Conjunction(fs) => fs.iter().try_fold(true, |acc, f| Some(acc & f.eval(valuation)?)),
            Self::Disjunction(fs) => fs.iter().try_fold(false, |acc, f| Some(acc | f.eval(valuation)?)),
            Self::Implication(a, b) => Some(!a.eval(valuation)? || b.eval(valuation)?),
            Self::Equivalence(a, b) => Some(a.eval(valuation)? == b.eval(valuation)?),
        }
    }

    /// Equisatisfiable clause set; the first clause asserts the whole formula.
    ///
    /// Auxiliary variables are named `_x1`, `_x2`, ... skipping the formula's own atoms.
    #[must_use]
    pub fn to_cnf(&self) -> Cnf {
        TseitinEncoder::new().encode(self)
    }
}

/// Tears the tree down with an explicit stack.
impl Drop for Formula {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.detach_children(&mut stack);
        while let Some(mut f) = stack.pop() {
            f.detach_children(&mut stack);
        }
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Variable(name) => write!(f, "{name}"),
            Self::Negation(a) => write!(f, "-{a}"),
            Self::Conjunction(fs) => write!(f, "({})", fs.iter().join("&")),
            Self::Disjunction(fs) => write!(f, "({})", fs.iter().join("|")),
            Self::Implication(a, b) => write!(f, "({a}->{b})"),
            Self::Equivalence(a, b) => write!(f, "({a}<->{b})"),
        }
    }
}
