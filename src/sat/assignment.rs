#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::sat::literal::{Literal, Variable};
use core::ops::Index;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash, PartialOrd, Ord)]
pub enum VarState {
    #[default]
    Unassigned,
    Assigned(bool),
}

impl VarState {
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        !self.is_assigned()
    }

    #[must_use]
    pub const fn is_true(self) -> bool {
        matches!(self, Self::Assigned(true))
    }

    #[must_use]
    pub const fn is_false(self) -> bool {
        matches!(self, Self::Assigned(false))
    }

    #[must_use]
    pub const fn value(self) -> Option<bool> {
        match self {
            Self::Assigned(b) => Some(b),
            Self::Unassigned => None,
        }
    }
}

/// Three-valued state of every variable of a theory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment(Vec<VarState>);

impl Index<Variable> for Assignment {
    type Output = VarState;

    fn index(&self, index: Variable) -> &Self::Output {
        &self.0[index as usize]
    }
}

impl Assignment {
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self(vec![VarState::Unassigned; num_vars])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Makes room for one more, unassigned, variable.
    pub fn grow(&mut self) {
        self.0.push(VarState::Unassigned);
    }

    /// Assigns the variable of `lit` so that `lit` becomes true.
    pub fn assign(&mut self, lit: Literal) {
        self.0[lit.variable() as usize] = VarState::Assigned(lit.polarity());
    }

    pub fn unassign(&mut self, var: Variable) {
        self.0[var as usize] = VarState::Unassigned;
    }

    #[must_use]
    pub fn var_value(&self, var: Variable) -> Option<bool> {
        self.0.get(var as usize).and_then(|s| s.value())
    }

    /// `Some(true)` if `lit` is true, `Some(false)` if false, `None` if its variable is unset.
    #[must_use]
    pub fn literal_value(&self, lit: Literal) -> Option<bool> {
        self.var_value(lit.variable()).map(|b| b == lit.polarity())
    }

    #[must_use]
    pub fn is_true(&self, lit: Literal) -> bool {
        self.literal_value(lit) == Some(true)
    }

    #[must_use]
    pub fn is_false(&self, lit: Literal) -> bool {
        self.literal_value(lit) == Some(false)
    }

    #[must_use]
    pub fn is_set(&self, lit: Literal) -> bool {
        self.literal_value(lit).is_some()
    }

    #[must_use]
    pub fn all_assigned(&self) -> bool {
        self.0.iter().all(|s| s.is_assigned())
    }

    pub fn unassigned(&self) -> impl Iterator<Item = Variable> + '_ {
        self.0
            .iter()
            .positions(|s| s.is_unassigned())
            .map(|i| i as Variable)
    }
}

/// A truth value for each named variable, as reported for a satisfiable theory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Valuation(BTreeMap<String, bool>);

impl Valuation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: bool) {
        self.0.insert(name.into(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        self.0.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Restriction to the given names; names missing from `self` are skipped.
    #[must_use]
    pub fn restrict<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Self {
        names
            .into_iter()
            .filter_map(|n| self.get(n).map(|b| (n, b)))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for Valuation {
    fn from_iter<T: IntoIterator<Item = (S, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Display for Valuation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = self
            .0
            .iter()
            .map(|(name, value)| if *value { name.clone() } else { format!("-{name}") })
            .join(" ");
        write!(f, "{s}")
    }
}
