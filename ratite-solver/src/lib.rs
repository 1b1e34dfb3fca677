//! Incremental Cassowary simplex engine.
//!
//! This crate holds the solver half of ratite: the sparse tableau, the
//! symbol bookkeeping, and the two-phase simplex that keeps the system
//! optimal and feasible across incremental edits. The constraint-building
//! vocabulary lives in `ratite-core`; most users depend on the `ratite`
//! facade, which re-exports both.
//!
//! # Examples
//!
//! ```
//! use ratite_core::{Constrainable, Variable};
//! use ratite_solver::Solver;
//!
//! let x = Variable::new("x");
//! let mut solver = Solver::new();
//! solver.add_constraint((x.clone() + 2.0).equal_to(20.0))?;
//! solver.update_variables();
//! assert_eq!(solver.value(&x), 18.0);
//! # Ok::<(), ratite_solver::AddConstraintError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
mod row;
mod solver;
mod symbol;

pub use error::{
    AddConstraintError, AddEditVariableError, RemoveConstraintError, RemoveEditVariableError,
    SuggestValueError,
};
pub use solver::{Solver, SolverStats};
