//! A single variable scaled by a coefficient.

use crate::variable::Variable;
use std::fmt;

/// A `(variable, coefficient)` pair.
///
/// Terms are immutable values; the arithmetic operators produce new terms and
/// expressions rather than mutating their operands.
#[derive(Clone, Debug, PartialEq)]
pub struct Term {
    /// The variable being scaled.
    pub variable: Variable,
    /// The scale factor.
    pub coefficient: f64,
}

impl Term {
    /// Create a term from a variable and a coefficient.
    #[must_use]
    pub fn new(variable: Variable, coefficient: f64) -> Term {
        Term {
            variable,
            coefficient,
        }
    }
}

impl From<Variable> for Term {
    fn from(variable: Variable) -> Term {
        Term::new(variable, 1.0)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coefficient == 1.0 {
            write!(f, "{}", self.variable)
        } else {
            write!(f, "{} * {}", self.coefficient, self.variable)
        }
    }
}
