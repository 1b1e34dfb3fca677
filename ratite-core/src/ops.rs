//! Arithmetic operators for building linear expressions.
//!
//! Only linearity-preserving combinations are implemented: variables, terms,
//! and expressions can be scaled by scalars and added to each other, and
//! nothing else. A product of two variables or a division by an expression is
//! rejected by the type system instead of failing at run time.
//!
//! Dividing by a zero scalar is not detectable here and produces non-finite
//! coefficients; callers validating untrusted input should check divisors
//! themselves.

use crate::expression::Expression;
use crate::term::Term;
use crate::variable::Variable;
use std::ops::{Add, Div, Mul, Neg, Sub};

// Scaling a variable produces a term.

impl Mul<f64> for Variable {
    type Output = Term;
    fn mul(self, rhs: f64) -> Term {
        Term::new(self, rhs)
    }
}

impl Mul<f64> for &Variable {
    type Output = Term;
    fn mul(self, rhs: f64) -> Term {
        Term::new(self.clone(), rhs)
    }
}

impl Mul<Variable> for f64 {
    type Output = Term;
    fn mul(self, rhs: Variable) -> Term {
        Term::new(rhs, self)
    }
}

impl Mul<&Variable> for f64 {
    type Output = Term;
    fn mul(self, rhs: &Variable) -> Term {
        Term::new(rhs.clone(), self)
    }
}

impl Div<f64> for Variable {
    type Output = Term;
    fn div(self, rhs: f64) -> Term {
        Term::new(self, 1.0 / rhs)
    }
}

impl Div<f64> for &Variable {
    type Output = Term;
    fn div(self, rhs: f64) -> Term {
        Term::new(self.clone(), 1.0 / rhs)
    }
}

impl Neg for Variable {
    type Output = Term;
    fn neg(self) -> Term {
        Term::new(self, -1.0)
    }
}

impl Neg for &Variable {
    type Output = Term;
    fn neg(self) -> Term {
        Term::new(self.clone(), -1.0)
    }
}

// Scaling terms and expressions.

impl Mul<f64> for Term {
    type Output = Term;
    fn mul(self, rhs: f64) -> Term {
        Term::new(self.variable, self.coefficient * rhs)
    }
}

impl Mul<Term> for f64 {
    type Output = Term;
    fn mul(self, rhs: Term) -> Term {
        rhs * self
    }
}

impl Div<f64> for Term {
    type Output = Term;
    fn div(self, rhs: f64) -> Term {
        Term::new(self.variable, self.coefficient / rhs)
    }
}

impl Neg for Term {
    type Output = Term;
    fn neg(self) -> Term {
        Term::new(self.variable, -self.coefficient)
    }
}

impl Mul<f64> for Expression {
    type Output = Expression;
    fn mul(mut self, rhs: f64) -> Expression {
        self.scale(rhs);
        self
    }
}

impl Mul<Expression> for f64 {
    type Output = Expression;
    fn mul(self, rhs: Expression) -> Expression {
        rhs * self
    }
}

impl Div<f64> for Expression {
    type Output = Expression;
    fn div(self, rhs: f64) -> Expression {
        self * (1.0 / rhs)
    }
}

impl Neg for Expression {
    type Output = Expression;
    fn neg(self) -> Expression {
        self * -1.0
    }
}

// Sums. Anything expression-like can be added to anything expression-like;
// the generic right-hand side covers scalars, variables, terms, and
// expressions in one impl per left-hand type.

impl<T: Into<Expression>> Add<T> for Expression {
    type Output = Expression;
    fn add(mut self, rhs: T) -> Expression {
        self.append(rhs.into());
        self
    }
}

impl<T: Into<Expression>> Add<T> for Term {
    type Output = Expression;
    fn add(self, rhs: T) -> Expression {
        Expression::from(self) + rhs
    }
}

impl<T: Into<Expression>> Add<T> for Variable {
    type Output = Expression;
    fn add(self, rhs: T) -> Expression {
        Expression::from(self) + rhs
    }
}

impl<T: Into<Expression>> Add<T> for &Variable {
    type Output = Expression;
    fn add(self, rhs: T) -> Expression {
        Expression::from(self) + rhs
    }
}

impl Add<Variable> for f64 {
    type Output = Expression;
    fn add(self, rhs: Variable) -> Expression {
        Expression::from(self) + rhs
    }
}

impl Add<&Variable> for f64 {
    type Output = Expression;
    fn add(self, rhs: &Variable) -> Expression {
        Expression::from(self) + rhs
    }
}

impl Add<Term> for f64 {
    type Output = Expression;
    fn add(self, rhs: Term) -> Expression {
        Expression::from(self) + rhs
    }
}

impl Add<Expression> for f64 {
    type Output = Expression;
    fn add(self, rhs: Expression) -> Expression {
        Expression::from(self) + rhs
    }
}

// Differences, as sums of the negated right-hand side.

impl<T: Into<Expression>> Sub<T> for Expression {
    type Output = Expression;
    fn sub(mut self, rhs: T) -> Expression {
        self.append(-rhs.into());
        self
    }
}

impl<T: Into<Expression>> Sub<T> for Term {
    type Output = Expression;
    fn sub(self, rhs: T) -> Expression {
        Expression::from(self) - rhs
    }
}

impl<T: Into<Expression>> Sub<T> for Variable {
    type Output = Expression;
    fn sub(self, rhs: T) -> Expression {
        Expression::from(self) - rhs
    }
}

impl<T: Into<Expression>> Sub<T> for &Variable {
    type Output = Expression;
    fn sub(self, rhs: T) -> Expression {
        Expression::from(self) - rhs
    }
}

impl Sub<Variable> for f64 {
    type Output = Expression;
    fn sub(self, rhs: Variable) -> Expression {
        Expression::from(self) - rhs
    }
}

impl Sub<&Variable> for f64 {
    type Output = Expression;
    fn sub(self, rhs: &Variable) -> Expression {
        Expression::from(self) - rhs
    }
}

impl Sub<Term> for f64 {
    type Output = Expression;
    fn sub(self, rhs: Term) -> Expression {
        Expression::from(self) - rhs
    }
}

impl Sub<Expression> for f64 {
    type Output = Expression;
    fn sub(self, rhs: Expression) -> Expression {
        Expression::from(self) - rhs
    }
}

#[cfg(test)]
mod tests {
    use crate::{Expression, Term, Variable};

    #[test]
    fn scaling_builds_terms() {
        let x = Variable::new("x");
        assert_eq!(&x * 2.0, Term::new(x.clone(), 2.0));
        assert_eq!(3.0 * &x, Term::new(x.clone(), 3.0));
        assert_eq!(&x / 4.0, Term::new(x.clone(), 0.25));
        assert_eq!(-&x, Term::new(x, -1.0));
    }

    #[test]
    fn sums_accumulate_terms_and_constants() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let expr = &x * 2.0 + 3.0 + (&y - 1.0);
        assert_eq!(expr.terms().len(), 2);
        assert_eq!(expr.terms()[0], Term::new(x, 2.0));
        assert_eq!(expr.terms()[1], Term::new(y, 1.0));
        assert_eq!(expr.constant(), 2.0);
    }

    #[test]
    fn scalar_left_hand_side() {
        let x = Variable::new("x");
        let expr = 10.0 - &x;
        assert_eq!(expr.terms()[0].coefficient, -1.0);
        assert_eq!(expr.constant(), 10.0);
    }

    #[test]
    fn expression_scaling_distributes() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let expr = (&x + &y + 4.0) / 2.0;
        assert_eq!(expr.terms()[0].coefficient, 0.5);
        assert_eq!(expr.terms()[1].coefficient, 0.5);
        assert_eq!(expr.constant(), 2.0);
    }

    #[test]
    fn negation_flips_every_sign() {
        let x = Variable::new("x");
        let expr: Expression = -(&x * 2.0 + 5.0);
        assert_eq!(expr.terms()[0].coefficient, -2.0);
        assert_eq!(expr.constant(), -5.0);
    }
}
