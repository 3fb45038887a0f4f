#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Tseitin encoding of a [`Formula`] into an equisatisfiable [`Cnf`].
//!
//! Every connective node gets a fresh variable `X` together with clauses
//! forcing `X` to agree with the connective applied to the encodings of its
//! children. Atoms encode as themselves. The result starts with the unit
//! `(X)` of the root, which asserts the formula, followed by the clauses of
//! every node in pre-order.
//!
//! For `X ↔ ¬A`:       `(X ∨ A)`, `(¬A ∨ ¬X)`
//!
//! For `X ↔ A1 ∧ … ∧ An`: `(¬X ∨ Ai)` for each `i`, `(X ∨ ¬A1 ∨ … ∨ ¬An)`
//!
//! For `X ↔ A1 ∨ … ∨ An`: `(¬Ai ∨ X)` for each `i`, `(¬X ∨ A1 ∨ … ∨ An)`
//!
//! For `X ↔ (A → B)`:  `(¬X ∨ ¬A ∨ B)`, `(¬B ∨ X)`, `(A ∨ X)`
//!
//! Equivalences are encoded as `(A → B) ∧ (B → A)`.

use crate::sat::cnf::{Cnf, CnfClause, NamedLiteral};
use crate::sat::formula::Formula;
use crate::sat::log::targets;
use itertools::Itertools;
use std::collections::BTreeSet;

pub const DEFAULT_PREFIX: &str = "_x";

/// Hands out auxiliary names and encodes formulas.
///
/// Auxiliary names skip the atoms of every formula encoded so far, and the
/// counter keeps running across [`encode`](Self::encode) calls. An atom of a
/// later formula that equals a name already handed out cannot be renamed:
/// `encode` warns about it and [`is_auxiliary`](Self::is_auxiliary) reports it.
#[derive(Debug, Clone)]
pub struct TseitinEncoder {
    prefix: String,
    counter: usize,
    reserved: BTreeSet<String>,
    issued: BTreeSet<String>,
}

impl Default for TseitinEncoder {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }
}

/// Connective of a node once equivalences are expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Atom,
    Not,
    And,
    Or,
    Implies,
}

/// A node still to be numbered. `A ↔ B` becomes a conjunction of two
/// `Implies` nodes borrowing the same operands.
#[derive(Debug, Clone, Copy)]
enum Node<'a> {
    Formula(&'a Formula),
    Implies(&'a Formula, &'a Formula),
}

impl<'a> Node<'a> {
    const fn shape(self) -> Shape {
        match self {
            Self::Formula(Formula::Variable(_)) => Shape::Atom,
            Self::Formula(Formula::Negation(_)) => Shape::Not,
            Self::Formula(Formula::Conjunction(_) | Formula::Equivalence(..)) => Shape::And,
            Self::Formula(Formula::Disjunction(_)) => Shape::Or,
            Self::Formula(Formula::Implication(..)) | Self::Implies(..) => Shape::Implies,
        }
    }

    fn children(self) -> Vec<Self> {
        match self {
            Self::Formula(Formula::Equivalence(a, b)) => vec![Self::Implies(a, b), Self::Implies(b, a)],
            Self::Formula(f) => f.subformulas().into_iter().map(Self::Formula).collect(),
            Self::Implies(a, b) => vec![Self::Formula(a), Self::Formula(b)],
        }
    }
}

/// A numbered node: its literal and the indices of its children.
#[derive(Debug)]
struct Entry {
    literal: NamedLiteral,
    shape: Shape,
    children: Vec<usize>,
}

impl TseitinEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
            reserved: BTreeSet::new(),
            issued: BTreeSet::new(),
        }
    }

    /// Number of auxiliary variables handed out so far.
    #[must_use]
    pub fn num_fresh(&self) -> usize {
        self.issued.len()
    }

    /// Whether `name` was handed out as an auxiliary variable by this encoder.
    #[must_use]
    pub fn is_auxiliary(&self, name: &str) -> bool {
        self.issued.contains(name)
    }

    /// Encodes `formula` without recursing, so nesting depth is bounded only by memory.
    ///
    /// Nodes are numbered in pre-order, then every node's clauses are emitted
    /// in that order after the root's unit clause.
    pub fn encode(&mut self, formula: &Formula) -> Cnf {
        let atoms = formula.vars();
        for atom in atoms.iter().filter(|a| self.issued.contains(*a)) {
            log::warn!(
                target: targets::ENCODING,
                "Atom {atom} is also an auxiliary variable of an earlier encoding"
            );
        }
        self.reserved.extend(atoms);

        let entries = self.number(formula);
        let root = entries[0].literal.clone();

        let mut clauses = vec![CnfClause::unit(root.clone())];
        for entry in &entries {
            let subs = entry.children.iter().map(|&c| &entries[c].literal).collect_vec();
            Self::definition(entry, &subs, &mut clauses);
        }

        log::debug!(
            target: targets::ENCODING,
            "Encoded {} nodes as {root}: {} clauses, {} auxiliary variables so far",
            entries.len(),
            clauses.len(),
            self.num_fresh()
        );
        Cnf::new(clauses)
    }

    fn fresh(&mut self) -> NamedLiteral {
        loop {
            self.counter += 1;
            let name = format!("{}{}", self.prefix, self.counter);
            if !self.reserved.contains(&name) {
                self.issued.insert(name.clone());
                return NamedLiteral::positive(name);
            }
        }
    }

    /// Pre-order numbering with an explicit stack; atoms keep their own name.
    fn number(&mut self, formula: &Formula) -> Vec<Entry> {
        let mut entries: Vec<Entry> = Vec::new();
        let mut stack = vec![(Node::Formula(formula), None::<usize>)];

        while let Some((node, parent)) = stack.pop() {
            let index = entries.len();
            if let Some(p) = parent {
                entries[p].children.push(index);
            }

            let literal = match node {
                Node::Formula(Formula::Variable(name)) => NamedLiteral::positive(name.clone()),
                _ => self.fresh(),
            };
            entries.push(Entry {
                literal,
                shape: node.shape(),
                children: Vec::new(),
            });

            stack.extend(node.children().into_iter().rev().map(|c| (c, Some(index))));
        }
        entries
    }

    /// Clauses forcing the entry's literal to agree with its connective.
    fn definition(entry: &Entry, subs: &[&NamedLiteral], out: &mut Vec<CnfClause>) {
        let x = &entry.literal;

        match (entry.shape, subs) {
            (Shape::Atom, _) => return,
            (Shape::Not, [a]) => {
                out.push(CnfClause::new(vec![x.clone(), (*a).clone()]));
                out.push(CnfClause::new(vec![a.negated(), x.negated()]));
            }
            (Shape::And, _) => {
                out.extend(subs.iter().map(|a| CnfClause::new(vec![x.negated(), (*a).clone()])));
                out.push(
                    std::iter::once(x.clone())
                        .chain(subs.iter().map(|a| a.negated()))
                        .collect(),
                );
            }
            (Shape::Or, _) => {
                out.extend(subs.iter().map(|a| CnfClause::new(vec![a.negated(), x.clone()])));
                out.push(
                    std::iter::once(x.negated())
                        .chain(subs.iter().map(|&a| a.clone()))
                        .collect(),
                );
            }
            (Shape::Implies, [a, b]) => {
                out.push(CnfClause::new(vec![x.negated(), a.negated(), (*b).clone()]));
                out.push(CnfClause::new(vec![b.negated(), x.clone()]));
                out.push(CnfClause::new(vec![(*a).clone(), x.clone()]));
            }
            (shape, _) => unreachable!("{shape:?} node with {} children", subs.len()),
        }

        log::trace!(
            target: targets::ENCODING,
            "{x} <-> {:?}({})",
            entry.shape,
            subs.iter().join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::assignment::Valuation;
    use itertools::Itertools;

    fn a() -> Formula {
        Formula::var("a")
    }

    fn b() -> Formula {
        Formula::var("b")
    }

    fn c() -> Formula {
        Formula::var("c")
    }

    /// Every total valuation of `names`, in binary counting order.
    fn valuations(names: &[&str]) -> Vec<Valuation> {
        (0..1u32 << names.len())
            .map(|bits| {
                names
                    .iter()
                    .enumerate()
                    .map(|(i, &n)| (n, bits >> i & 1 == 1))
                    .collect()
            })
            .collect()
    }

    /// For every valuation of the atoms, the formula holds iff some extension
    /// to the auxiliary variables satisfies the encoding.
    fn check_equisatisfiable(f: &Formula) {
        let cnf = f.to_cnf();
        let atoms = f.vars();
        let all = cnf.vars().into_iter().chain(atoms.iter().map(String::as_str)).unique().collect_vec();
        assert!(all.len() <= 16, "too many variables for enumeration: {}", all.len());

        let models = valuations(&all).into_iter().filter(|v| cnf.verify(v)).collect_vec();
        for v in valuations(&atoms.iter().map(String::as_str).collect_vec()) {
            let expected = f.eval(&v) == Some(true);
            let extended = models
                .iter()
                .any(|m| atoms.iter().all(|n| m.get(n) == v.get(n)));
            assert_eq!(extended, expected, "{f} under {v}: encoding {cnf}");
        }
    }

    #[test]
    fn test_variable_is_its_own_unit() {
        assert_eq!(a().to_cnf().to_string(), "a");
    }

    #[test]
    fn test_negation_clauses() {
        assert_eq!(Formula::not(a()).to_cnf().to_string(), "_x1; _x1 a; -a -_x1");
    }

    #[test]
    fn test_conjunction_clauses() {
        let cnf = Formula::and([a(), b()]).to_cnf();
        assert_eq!(cnf.to_string(), "_x1; -_x1 a; -_x1 b; _x1 -a -b");
    }

    #[test]
    fn test_disjunction_clauses() {
        let cnf = Formula::or([a(), b()]).to_cnf();
        assert_eq!(cnf.to_string(), "_x1; -a _x1; -b _x1; -_x1 a b");
    }

    #[test]
    fn test_implication_clauses() {
        let cnf = Formula::implies(a(), b()).to_cnf();
        assert_eq!(cnf.to_string(), "_x1; -_x1 -a b; -b _x1; a _x1");
    }

    #[test]
    fn test_children_units_are_stripped() {
        let cnf = Formula::not(Formula::not(a())).to_cnf();
        assert_eq!(cnf.to_string(), "_x1; _x1 _x2; -_x2 -_x1; _x2 a; -a -_x2");
        assert_eq!(cnf.iter().filter(|c| c.len() == 1).count(), 1);
    }

    #[test]
    fn test_fresh_names_skip_atoms() {
        let cnf = Formula::and([Formula::var("_x1"), Formula::var("_x3")]).to_cnf();
        assert_eq!(cnf.clauses()[0].to_string(), "_x2");
        assert!(!cnf.vars().contains("_x4"));
    }

    #[test]
    fn test_counter_runs_across_calls() {
        let mut encoder = TseitinEncoder::with_prefix("t");
        encoder.encode(&Formula::not(a()));
        let second = encoder.encode(&Formula::not(b()));
        assert_eq!(second.clauses()[0].to_string(), "t2");
        assert_eq!(encoder.num_fresh(), 2);
    }

    #[test]
    fn test_auxiliary_names_are_tracked() {
        let mut encoder = TseitinEncoder::new();
        encoder.encode(&Formula::not(a()));
        assert!(encoder.is_auxiliary("_x1"));
        assert!(!encoder.is_auxiliary("a"));

        // `_x1` is now an atom as well; new auxiliaries steer clear of it.
        let cnf = encoder.encode(&Formula::and([Formula::var("_x1"), b()]));
        assert_eq!(cnf.clauses()[0].to_string(), "_x2");
        assert!(encoder.is_auxiliary("_x1"));
        assert_eq!(encoder.num_fresh(), 2);
    }

    #[test]
    fn test_equivalence_expands_to_two_implications() {
        let cnf = Formula::iff(a(), b()).to_cnf();
        assert_eq!(
            cnf.to_string(),
            "_x1; -_x1 _x2; -_x1 _x3; _x1 -_x2 -_x3; -_x2 -a b; -b _x2; a _x2; -_x3 -b a; -a _x3; b _x3"
        );
    }

    #[test]
    fn test_repeated_subformula_gets_independent_variables() {
        let sub = Formula::not(a());
        let cnf = Formula::and([sub.clone(), sub]).to_cnf();
        assert!(cnf.vars().is_superset(&["_x1", "_x2", "_x3"].into_iter().collect()));
    }

    #[test]
    fn test_empty_connectives() {
        check_equisatisfiable(&Formula::and([]));
        check_equisatisfiable(&Formula::or([]));
        check_equisatisfiable(&Formula::not(Formula::or([])));
    }

    #[test]
    fn test_connectives_equisatisfiable() {
        for f in [
            Formula::not(a()),
            Formula::and([a(), b(), c()]),
            Formula::or([a(), b(), c()]),
            Formula::implies(a(), b()),
            Formula::iff(a(), b()),
            Formula::and([a()]),
            Formula::or([Formula::not(a())]),
        ] {
            check_equisatisfiable(&f);
        }
    }

    #[test]
    fn test_nested_equisatisfiable() {
        for f in [
            Formula::iff(Formula::and([a(), Formula::not(b())]), Formula::or([c(), a()])),
            Formula::implies(Formula::or([a(), b()]), Formula::not(Formula::and([b(), c()]))),
            Formula::or([Formula::and([a(), b()]), Formula::and([Formula::not(a()), c()])]),
            Formula::not(Formula::iff(a(), Formula::not(a()))),
            Formula::and([a(), Formula::not(a())]),
        ] {
            check_equisatisfiable(&f);
        }
    }
}
