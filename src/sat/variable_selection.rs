#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use crate::sat::assignment::Assignment;
use crate::sat::literal::Variable;
use crate::sat::solver::VariableOrder;

pub trait VariableSelection {
    /// The next variable to decide on, `None` once every variable is assigned.
    fn pick(&self, assignment: &Assignment) -> Option<Variable>;
}

/// Lowest-numbered unassigned variable first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedOrder;

impl VariableSelection for FixedOrder {
    fn pick(&self, assignment: &Assignment) -> Option<Variable> {
        assignment.unassigned().next()
    }
}

/// Variables in a shuffled but reproducible order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RandomOrder(Vec<Variable>);

impl RandomOrder {
    #[must_use]
    pub fn with_seed(num_vars: usize, seed: u64) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let mut order: Vec<Variable> = (0..num_vars as Variable).collect();
        fastrand::Rng::with_seed(seed).shuffle(&mut order);
        Self(order)
    }

    #[must_use]
    pub fn order(&self) -> &[Variable] {
        &self.0
    }
}

impl VariableSelection for RandomOrder {
    fn pick(&self, assignment: &Assignment) -> Option<Variable> {
        self.0
            .iter()
            .copied()
            .find(|&v| assignment[v].is_unassigned())
    }
}

/// The selector named by a [`VariableOrder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Fixed(FixedOrder),
    Random(RandomOrder),
}

impl Selector {
    #[must_use]
    pub fn from_order(order: VariableOrder, num_vars: usize) -> Self {
        match order {
            VariableOrder::Fixed => Self::Fixed(FixedOrder),
            VariableOrder::Random { seed } => Self::Random(RandomOrder::with_seed(num_vars, seed)),
        }
    }
}

impl VariableSelection for Selector {
    fn pick(&self, assignment: &Assignment) -> Option<Variable> {
        match self {
            Self::Fixed(s) => s.pick(assignment),
            Self::Random(s) => s.pick(assignment),
        }
    }
}
