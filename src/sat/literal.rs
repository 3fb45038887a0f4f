#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use core::ops::{Neg, Not};

/// Dense index of a variable inside one [`Theory`](crate::sat::theory::Theory).
pub type Variable = u32;

/// A variable together with a polarity, packed as `2 * var + negative`.
///
/// Literals are plain values, so the literal for a given `(variable, polarity)`
/// pair is the same wherever it is built and `==` doubles as identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Literal(u32);

impl Literal {
    #[must_use]
    pub const fn new(var: Variable, polarity: bool) -> Self {
        if polarity {
            Self(var * 2)
        } else {
            Self(var * 2 + 1)
        }
    }

    #[must_use]
    pub const fn positive(var: Variable) -> Self {
        Self::new(var, true)
    }

    #[must_use]
    pub const fn negative(var: Variable) -> Self {
        Self::new(var, false)
    }

    #[must_use]
    pub const fn variable(self) -> Variable {
        self.0 / 2
    }

    /// `true` for the asserted literal `x`, `false` for `¬x`.
    #[must_use]
    pub const fn polarity(self) -> bool {
        self.0 % 2 == 0
    }

    #[must_use]
    pub const fn is_negated(self) -> bool {
        !self.polarity()
    }

    /// The complementary literal.
    #[must_use]
    pub const fn negated(self) -> Self {
        Self(self.0 ^ 1)
    }

    /// Position of this literal in per-literal tables such as the watch index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl Not for &Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        self.negated()
    }
}
