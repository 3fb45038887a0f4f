#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Clause sets over *named* variables.
//!
//! This is the exchange format between the Tseitin encoder, the textual and
//! DIMACS readers and the [`Theory`](crate::sat::theory::Theory), which
//! interns the names into dense [`Variable`](crate::sat::literal::Variable)s.
//!
//! The textual notation writes a clause as literal tokens separated by
//! whitespace or `∨`, each a variable name optionally prefixed by `-`:
//!
//! ```text
//! a -b c        (a ∨ ¬b ∨ c)
//! a ∨ -b        (a ∨ ¬b)
//! ()            the empty clause
//! ```
//!
//! A whole CNF separates clauses by newlines or `;`.

use crate::sat::assignment::Valuation;
use crate::sat::error::{Error, Result};
use crate::sat::log::targets;
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A variable name with a polarity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedLiteral {
    name: String,
    polarity: bool,
}

impl NamedLiteral {
    pub fn new(name: impl Into<String>, polarity: bool) -> Self {
        Self {
            name: name.into(),
            polarity,
        }
    }

    pub fn positive(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    pub fn negative(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn polarity(&self) -> bool {
        self.polarity
    }

    #[must_use]
    pub fn negated(&self) -> Self {
        Self::new(self.name.clone(), !self.polarity)
    }

    /// Truth value under `valuation`, `None` if the variable is missing.
    #[must_use]
    pub fn value(&self, valuation: &Valuation) -> Option<bool> {
        valuation.get(&self.name).map(|b| b == self.polarity)
    }
}

impl Display for NamedLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.polarity {
            write!(f, "{}", self.name)
        } else {
            write!(f, "-{}", self.name)
        }
    }
}

impl FromStr for NamedLiteral {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        let (name, polarity) = token
            .strip_prefix('-')
            .map_or((token, true), |rest| (rest, false));

        let malformed = name.is_empty()
            || name.starts_with('-')
            || name.chars().any(|c| c.is_whitespace() || c == '∨' || c == ';');

        if malformed {
            return Err(Error::MalformedLiteral(token.to_string()));
        }

        Ok(Self::new(name, polarity))
    }
}

/// A disjunction of named literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CnfClause(Vec<NamedLiteral>);

impl CnfClause {
    #[must_use]
    pub const fn new(literals: Vec<NamedLiteral>) -> Self {
        Self(literals)
    }

    #[must_use]
    pub fn unit(literal: NamedLiteral) -> Self {
        Self(vec![literal])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedLiteral> {
        self.0.iter()
    }

    #[must_use]
    pub fn literals(&self) -> &[NamedLiteral] {
        &self.0
    }

    /// Whether some literal is true under `valuation`.
    #[must_use]
    pub fn is_satisfied_by(&self, valuation: &Valuation) -> bool {
        self.0.iter().any(|l| l.value(valuation) == Some(true))
    }
}

impl FromIterator<NamedLiteral> for CnfClause {
    fn from_iter<T: IntoIterator<Item = NamedLiteral>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Display for CnfClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "()")
        } else {
            write!(f, "{}", self.0.iter().join(" "))
        }
    }
}

impl FromStr for CnfClause {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim() == "()" {
            return Ok(Self::default());
        }

        s.split(|c: char| c.is_whitespace() || c == '∨')
            .filter(|token| !token.is_empty())
            .map(NamedLiteral::from_str)
            .collect()
    }
}

/// An ordered clause list.
///
/// For a Tseitin encoding the first clause is the unit clause asserting the
/// encoded formula, see [`tseitin`](crate::sat::tseitin).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Cnf(Vec<CnfClause>);

impl Cnf {
    #[must_use]
    pub const fn new(clauses: Vec<CnfClause>) -> Self {
        Self(clauses)
    }

    /// Parses one clause per item in textual notation.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedLiteral`] for the first token that is not a literal.
    pub fn parse<I, S>(clauses: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cnf: Self = clauses
            .into_iter()
            .map(|c| c.as_ref().parse::<CnfClause>())
            .collect::<Result<_>>()?;

        log::trace!(target: targets::PARSE, "Parsed {} clauses: {cnf}", cnf.len());
        Ok(cnf)
    }

    pub fn push(&mut self, clause: CnfClause) {
        self.0.push(clause);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CnfClause> {
        self.0.iter()
    }

    #[must_use]
    pub fn clauses(&self) -> &[CnfClause] {
        &self.0
    }

    /// Splits off the leading clause, the root unit of a Tseitin encoding.
    #[must_use]
    pub fn split_first(&self) -> Option<(&CnfClause, &[CnfClause])> {
        self.0.split_first()
    }

    /// Names of all variables, sorted.
    #[must_use]
    pub fn vars(&self) -> BTreeSet<&str> {
        self.0
            .iter()
            .flat_map(CnfClause::iter)
            .map(NamedLiteral::name)
            .collect()
    }

    /// Whether every clause is satisfied by `valuation`.
    #[must_use]
    pub fn verify(&self, valuation: &Valuation) -> bool {
        self.0.iter().all(|c| c.is_satisfied_by(valuation))
    }

    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.0.iter().map(CnfClause::len).sum()
    }
}

impl FromIterator<CnfClause> for Cnf {
    fn from_iter<T: IntoIterator<Item = CnfClause>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<CnfClause> for Cnf {
    fn extend<T: IntoIterator<Item = CnfClause>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Cnf {
    type Item = CnfClause;
    type IntoIter = std::vec::IntoIter<CnfClause>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Cnf {
    type Item = &'a CnfClause;
    type IntoIter = std::slice::Iter<'a, CnfClause>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Cnf {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("; "))
    }
}

impl FromStr for Cnf {
    type Err = Error;

    /// Clauses separated by newlines or `;`; blank pieces are skipped, so the
    /// empty clause has to be written `()`.
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(
            s.split(['\n', ';'])
                .map(str::trim)
                .filter(|piece| !piece.is_empty()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal() {
        assert_eq!("a".parse::<NamedLiteral>().unwrap(), NamedLiteral::positive("a"));
        assert_eq!("-x1".parse::<NamedLiteral>().unwrap(), NamedLiteral::negative("x1"));
        assert!(matches!("-".parse::<NamedLiteral>(), Err(Error::MalformedLiteral(_))));
        assert!(matches!("--a".parse::<NamedLiteral>(), Err(Error::MalformedLiteral(_))));
    }

    #[test]
    fn test_parse_clause_separators() {
        let clause: CnfClause = "a ∨ -b  c".parse().unwrap();
        assert_eq!(
            clause.literals(),
            &[
                NamedLiteral::positive("a"),
                NamedLiteral::negative("b"),
                NamedLiteral::positive("c")
            ]
        );
        assert_eq!(clause.to_string(), "a -b c");
    }

    #[test]
    fn test_empty_clause() {
        let clause: CnfClause = "".parse().unwrap();
        assert!(clause.is_empty());
        assert_eq!(clause.to_string(), "()");
        assert!("()".parse::<CnfClause>().unwrap().is_empty());
    }

    #[test]
    fn test_cnf_from_str_and_display() {
        let cnf: Cnf = "a b\n-a; ()".parse().unwrap();
        assert_eq!(cnf.len(), 3);
        assert!(cnf.clauses()[2].is_empty());
        assert_eq!(cnf.to_string(), "a b; -a; ()");
        assert_eq!(cnf.vars().into_iter().collect_vec(), vec!["a", "b"]);
        assert_eq!(cnf.num_literals(), 3);
    }

    #[test]
    fn test_parse_keeps_empty_items_as_empty_clauses() {
        let cnf = Cnf::parse(["", "p"]).unwrap();
        assert_eq!(cnf.len(), 2);
        assert!(cnf.clauses()[0].is_empty());
    }

    #[test]
    fn test_verify() {
        let cnf: Cnf = "a b c; -b".parse().unwrap();
        let good: Valuation = [("a", true), ("b", false), ("c", false)].into_iter().collect();
        let bad: Valuation = [("a", false), ("b", false), ("c", false)].into_iter().collect();

        assert!(cnf.verify(&good));
        assert!(!cnf.verify(&bad));
    }
}
