//! Constraints: an expression related to zero at a given strength.

use crate::expression::Expression;
use crate::strength::Strength;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_CONSTRAINT_ID: AtomicU64 = AtomicU64::new(1);

/// The relation between a constraint's expression and zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelationalOperator {
    /// `expression <= 0`
    LessOrEqual,
    /// `expression == 0`
    Equal,
    /// `expression >= 0`
    GreaterOrEqual,
}

impl fmt::Display for RelationalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelationalOperator::LessOrEqual => "<=",
            RelationalOperator::Equal => "==",
            RelationalOperator::GreaterOrEqual => ">=",
        })
    }
}

/// A linear constraint `expression OP 0` with a strength.
///
/// Like [`Variable`](crate::Variable), a `Constraint` is a clonable handle
/// with identity semantics: a solver tracks the handle it was given, and
/// re-adding a clone of a tracked constraint reports a duplicate while a
/// structurally identical constraint built separately is a distinct one.
///
/// The expression is canonicalized at construction: coefficients of duplicate
/// variables are summed, keeping the first occurrence's position. The
/// strength is clipped into `[OPTIONAL, REQUIRED]` and is immutable
/// afterwards; [`Constraint::with_strength`] derives a new constraint rather
/// than mutating this one.
#[derive(Clone, Debug)]
pub struct Constraint(Arc<ConstraintInner>);

#[derive(Debug)]
struct ConstraintInner {
    id: u64,
    expression: Expression,
    op: RelationalOperator,
    strength: Strength,
}

impl Constraint {
    /// Create a constraint relating `expression` to zero.
    #[must_use]
    pub fn new(
        expression: impl Into<Expression>,
        op: RelationalOperator,
        strength: Strength,
    ) -> Constraint {
        Constraint(Arc::new(ConstraintInner {
            id: NEXT_CONSTRAINT_ID.fetch_add(1, Ordering::Relaxed),
            expression: expression.into().reduced(),
            op,
            strength: strength.clip(),
        }))
    }

    /// The canonicalized expression.
    #[must_use]
    pub fn expression(&self) -> &Expression {
        &self.0.expression
    }

    /// The relational operator.
    #[must_use]
    pub fn op(&self) -> RelationalOperator {
        self.0.op
    }

    /// The strength of this constraint.
    #[must_use]
    pub fn strength(&self) -> Strength {
        self.0.strength
    }

    /// The process-unique identity of this constraint handle.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// Derive a constraint with the same expression and operator at a
    /// different strength. The result is a new constraint handle; the
    /// original keeps its identity and its strength.
    #[must_use]
    pub fn with_strength(&self, strength: Strength) -> Constraint {
        Constraint(Arc::new(ConstraintInner {
            id: NEXT_CONSTRAINT_ID.fetch_add(1, Ordering::Relaxed),
            expression: self.0.expression.clone(),
            op: self.0.op,
            strength: strength.clip(),
        }))
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Constraint) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Constraint {}

impl Hash for Constraint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} 0 | strength = {}",
            self.0.expression, self.0.op, self.0.strength
        )
    }
}

/// Relational sugar for building constraints out of anything
/// expression-like.
///
/// The trait is implemented for every type convertible to an [`Expression`]:
/// variables, terms, expressions, and plain numbers. All three methods build
/// a constraint at [`Strength::REQUIRED`]; chain
/// [`Constraint::with_strength`] for a weaker one.
pub trait Constrainable: Into<Expression> + Sized {
    /// Build `self == rhs`.
    #[must_use]
    fn equal_to(self, rhs: impl Into<Expression>) -> Constraint {
        Constraint::new(
            self.into() - rhs.into(),
            RelationalOperator::Equal,
            Strength::REQUIRED,
        )
    }

    /// Build `self <= rhs`.
    #[must_use]
    fn less_or_equal(self, rhs: impl Into<Expression>) -> Constraint {
        Constraint::new(
            self.into() - rhs.into(),
            RelationalOperator::LessOrEqual,
            Strength::REQUIRED,
        )
    }

    /// Build `self >= rhs`.
    #[must_use]
    fn greater_or_equal(self, rhs: impl Into<Expression>) -> Constraint {
        Constraint::new(
            self.into() - rhs.into(),
            RelationalOperator::GreaterOrEqual,
            Strength::REQUIRED,
        )
    }
}

impl<T: Into<Expression>> Constrainable for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Term;
    use crate::variable::Variable;

    #[test]
    fn construction_canonicalizes_duplicates() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let expr = Expression::new(
            [
                Term::new(x.clone(), 1.0),
                Term::new(y.clone(), 2.0),
                Term::new(x.clone(), 4.0),
            ],
            -3.0,
        );
        let cn = Constraint::new(expr, RelationalOperator::Equal, Strength::REQUIRED);
        assert_eq!(cn.expression().terms().len(), 2);
        assert_eq!(cn.expression().terms()[0].coefficient, 5.0);
        assert_eq!(cn.expression().terms()[1].coefficient, 2.0);
    }

    #[test]
    fn identity_semantics() {
        let x = Variable::new("x");
        let a = x.clone().equal_to(1.0);
        let b = x.equal_to(1.0);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn with_strength_derives_a_new_handle() {
        let x = Variable::new("x");
        let required = x.equal_to(10.0);
        let weak = required.with_strength(Strength::WEAK);
        assert_ne!(required, weak);
        assert!(required.strength().is_required());
        assert_eq!(weak.strength(), Strength::WEAK);
        assert_eq!(weak.expression(), required.expression());
    }

    #[test]
    fn strengths_are_clipped() {
        let x = Variable::new("x");
        let cn = Constraint::new(
            x,
            RelationalOperator::Equal,
            Strength::from_value(9.0e12),
        );
        assert!(cn.strength().is_required());
    }

    #[test]
    fn display_format() {
        let x = Variable::new("x");
        let cn = Constraint::new(
            Expression::from(x) - 10.0,
            RelationalOperator::LessOrEqual,
            Strength::WEAK,
        );
        assert_eq!(cn.to_string(), "x + -10 <= 0 | strength = WEAK");
    }
}
