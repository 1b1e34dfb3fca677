//! Error types returned by solver operations.
//!
//! Every public operation has its own error enum listing exactly the ways it
//! can fail. Recoverable failures leave the solver unchanged. The
//! `UnboundedObjective` and `InternalSolverError` variants are different:
//! they indicate a corrupted tableau, after which the solver must be
//! discarded.

use thiserror::Error;

/// Failure of [`Solver::add_constraint`](crate::Solver::add_constraint).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddConstraintError {
    /// The same constraint handle is already tracked by the solver.
    #[error("the constraint has already been added to the solver")]
    DuplicateConstraint,
    /// The constraint is required and cannot be satisfied together with the
    /// required constraints already in the tableau.
    #[error("the required constraint cannot be satisfied")]
    UnsatisfiableConstraint,
    /// The objective became unbounded while re-optimizing.
    #[error("the objective is unbounded")]
    UnboundedObjective,
    /// The tableau reached a state the solver cannot recover from.
    #[error("internal solver error: {0}")]
    InternalSolverError(&'static str),
}

/// Failure of [`Solver::remove_constraint`](crate::Solver::remove_constraint).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveConstraintError {
    /// The constraint was never added to the solver.
    #[error("the constraint is unknown to the solver")]
    UnknownConstraint,
    /// No tableau row can serve as the pivot target for the constraint's
    /// marker symbol.
    #[error("failed to find a leaving row for the constraint marker")]
    FailedToFindLeavingRow,
    /// The objective became unbounded while re-optimizing.
    #[error("the objective is unbounded")]
    UnboundedObjective,
    /// The tableau reached a state the solver cannot recover from.
    #[error("internal solver error: {0}")]
    InternalSolverError(&'static str),
}

/// Failure of [`Solver::add_edit_variable`](crate::Solver::add_edit_variable).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddEditVariableError {
    /// The variable is already registered for editing.
    #[error("the variable is already an edit variable")]
    DuplicateEditVariable,
    /// Edit variables must be weaker than required.
    #[error("an edit variable cannot have the required strength")]
    BadRequiredStrength,
}

/// Failure of
/// [`Solver::remove_edit_variable`](crate::Solver::remove_edit_variable).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveEditVariableError {
    /// The variable was never registered for editing.
    #[error("the variable is not an edit variable")]
    UnknownEditVariable,
}

/// Failure of [`Solver::suggest_value`](crate::Solver::suggest_value).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestValueError {
    /// The variable was never registered for editing.
    #[error("the variable is not an edit variable")]
    UnknownEditVariable,
    /// Dual optimization could not restore feasibility.
    #[error("internal solver error: {0}")]
    InternalSolverError(&'static str),
}

/// Pivot-level failures, mapped into the public error enums by each
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PivotError {
    /// Primal optimization found no exit row for an entering symbol.
    Unbounded,
    /// Dual optimization found no entering symbol for an infeasible row.
    DualFailed,
}
