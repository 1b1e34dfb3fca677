//! Linear expressions: a bag of terms plus a constant.

use crate::term::Term;
use crate::variable::Variable;
use smallvec::{smallvec, SmallVec};
use std::fmt;

/// The inline capacity for term storage. Layout expressions rarely combine
/// more than a handful of variables.
pub(crate) type TermVec = SmallVec<[Term; 4]>;

/// A linear combination of variables plus a scalar constant.
///
/// An expression places no uniqueness requirement on its variables; the same
/// variable may appear in several terms. Duplicates are collapsed when the
/// expression is wrapped into a [`Constraint`](crate::Constraint).
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    terms: TermVec,
    constant: f64,
}

impl Expression {
    /// Create an expression from terms and a constant.
    #[must_use]
    pub fn new(terms: impl IntoIterator<Item = Term>, constant: f64) -> Expression {
        Expression {
            terms: terms.into_iter().collect(),
            constant,
        }
    }

    /// An expression holding only a constant.
    #[must_use]
    pub fn from_constant(constant: f64) -> Expression {
        Expression {
            terms: SmallVec::new(),
            constant,
        }
    }

    /// The terms of this expression, in insertion order.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// The scalar constant of this expression.
    #[must_use]
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Whether the expression contains no terms at all.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Collapse duplicate variables by summing their coefficients, keeping
    /// the first occurrence's position. Zero sums are retained; the solver
    /// prunes near-zero coefficients when it builds its rows.
    #[must_use]
    pub(crate) fn reduced(self) -> Expression {
        let mut terms = TermVec::new();
        for term in self.terms {
            match terms.iter().position(|t| t.variable == term.variable) {
                Some(i) => terms[i].coefficient += term.coefficient,
                None => terms.push(term),
            }
        }
        Expression {
            terms,
            constant: self.constant,
        }
    }

    /// Append another expression, consuming both.
    pub(crate) fn append(&mut self, other: Expression) {
        self.constant += other.constant;
        self.terms.extend(other.terms);
    }

    /// Scale every coefficient and the constant.
    pub(crate) fn scale(&mut self, factor: f64) {
        self.constant *= factor;
        for term in &mut self.terms {
            term.coefficient *= factor;
        }
    }
}

impl From<f64> for Expression {
    fn from(constant: f64) -> Expression {
        Expression::from_constant(constant)
    }
}

impl From<Term> for Expression {
    fn from(term: Term) -> Expression {
        Expression {
            terms: smallvec![term],
            constant: 0.0,
        }
    }
}

impl From<Variable> for Expression {
    fn from(variable: Variable) -> Expression {
        Expression::from(Term::from(variable))
    }
}

impl From<&Variable> for Expression {
    fn from(variable: &Variable) -> Expression {
        Expression::from(variable.clone())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for term in &self.terms {
            write!(f, "{term} + ")?;
        }
        write!(f, "{}", self.constant)
    }
}
