//! Core value types for the ratite constraint solver.
//!
//! This crate provides the vocabulary used to describe linear layout
//! constraints:
//!
//! - [`Variable`]: a named external unknown, identified by handle rather than
//!   by name
//! - [`Term`] and [`Expression`]: linear combinations of variables plus a
//!   constant, built with ordinary arithmetic operators
//! - [`RelationalOperator`] and [`Constraint`]: an expression related to zero
//!   at a given [`Strength`]
//! - [`Strength`]: the priority algebra that ranks non-required constraints
//!
//! Everything here is a plain value. Feeding constraints to a solver and
//! reading variable values back is the job of the `ratite-solver` crate.
//!
//! # Examples
//!
//! ```
//! use ratite_core::{Constrainable, Strength, Variable};
//!
//! let width = Variable::new("width");
//! let left = Variable::new("left");
//! let right = Variable::new("right");
//!
//! // right == left + width, at required strength.
//! let fill = right.clone().equal_to(left + width.clone());
//! assert!(fill.strength().is_required());
//!
//! // width >= 100, but only as a medium preference.
//! let min_width = width
//!     .greater_or_equal(100.0)
//!     .with_strength(Strength::MEDIUM);
//! assert_eq!(min_width.strength(), Strength::MEDIUM);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constraint;
pub mod expression;
mod ops;
pub mod strength;
pub mod term;
pub mod variable;

pub use constraint::{Constrainable, Constraint, RelationalOperator};
pub use expression::Expression;
pub use strength::Strength;
pub use term::Term;
pub use variable::Variable;
