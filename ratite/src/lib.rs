//! ratite - an incremental constraint solver for UI and figure layout.
//!
//! ratite solves systems of linear equalities and inequalities over real
//! variables, where each constraint carries a [`Strength`]. Required
//! constraints always hold; weaker constraints are satisfied as well as
//! possible, strongest band first. The solver is incremental: constraints and
//! edit variables can be added, removed, and re-suggested after a solution
//! exists, and each mutation costs far less than solving from scratch. That
//! makes it a good fit for layout, where constraints relate coordinates and
//! sizes and a drag gesture updates one value sixty times a second.
//!
//! # Building constraints
//!
//! Constraints are written with ordinary arithmetic on [`Variable`]s plus the
//! relational methods of [`Constrainable`]:
//!
//! ```
//! use ratite::{Constrainable, Solver, Strength, Variable};
//!
//! let left = Variable::new("left");
//! let width = Variable::new("width");
//! let right = Variable::new("right");
//!
//! let mut solver = Solver::new();
//! solver.add_constraints([
//!     right.clone().equal_to(left.clone() + width.clone()),
//!     left.clone().equal_to(0.0),
//!     width.clone().greater_or_equal(80.0),
//!     width.clone().equal_to(200.0).with_strength(Strength::WEAK),
//! ])?;
//!
//! solver.update_variables();
//! assert_eq!(solver.value(&width), 200.0);
//! assert_eq!(solver.value(&right), 200.0);
//! # Ok::<(), ratite::AddConstraintError>(())
//! ```
//!
//! # Driving values interactively
//!
//! Registering an edit variable lets the caller feed it a stream of
//! suggested values; the solver pulls the rest of the system along:
//!
//! ```
//! use ratite::{Constrainable, Solver, Strength, Variable};
//!
//! let midpoint = Variable::new("midpoint");
//! let left = Variable::new("left");
//! let right = Variable::new("right");
//!
//! let mut solver = Solver::new();
//! solver.add_constraints([
//!     (midpoint.clone() * 2.0).equal_to(left.clone() + right.clone()),
//!     left.clone().equal_to(0.0),
//! ]).unwrap();
//! solver.add_edit_variable(&midpoint, Strength::STRONG).unwrap();
//!
//! solver.suggest_value(&midpoint, 150.0).unwrap();
//! solver.update_variables();
//! assert_eq!(solver.value(&right), 300.0);
//!
//! solver.suggest_value(&midpoint, 80.0).unwrap();
//! solver.update_variables();
//! assert_eq!(solver.value(&right), 160.0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub use ratite_core::{
    Constrainable, Constraint, Expression, RelationalOperator, Strength, Term, Variable,
};
pub use ratite_solver::{
    error, AddConstraintError, AddEditVariableError, RemoveConstraintError,
    RemoveEditVariableError, Solver, SolverStats, SuggestValueError,
};
