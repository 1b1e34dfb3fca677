//! The incremental Cassowary solver.
//!
//! The tableau is a map from basic symbol to [`Row`], kept optimal and
//! feasible between any two public calls. Adding a constraint turns it into a
//! row, picks a subject to solve for (falling back to an artificial variable
//! when no natural subject exists), and re-optimizes with the primal simplex.
//! Suggesting a value for an edit variable shifts row constants and restores
//! feasibility with the dual simplex, which is what makes repeated
//! suggestions cheap.

use crate::error::{
    AddConstraintError, AddEditVariableError, PivotError, RemoveConstraintError,
    RemoveEditVariableError, SuggestValueError,
};
use crate::row::{near_zero, Row};
use crate::symbol::{Symbol, SymbolKind, Tag};
use ratite_core::{Constraint, Expression, RelationalOperator, Strength, Variable};
use rustc_hash::FxHashMap;
use std::fmt;
use tracing::{debug, trace};

/// Bookkeeping for one edit variable.
#[derive(Debug)]
struct EditInfo {
    tag: Tag,
    constraint: Constraint,
    constant: f64,
}

/// The solver-owned record for one external variable.
#[derive(Debug)]
struct VarData {
    symbol: Symbol,
    value: f64,
}

/// Which objective row an optimization pass minimizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Objective,
    Artificial,
}

/// Counters accumulated over the lifetime of a solver.
#[derive(Debug, Clone, Default)]
pub struct SolverStats {
    /// Constraints successfully added.
    pub constraints_added: u64,
    /// Constraints successfully removed.
    pub constraints_removed: u64,
    /// Pivots performed by primal optimization.
    pub primal_pivots: u64,
    /// Pivots performed by dual optimization.
    pub dual_pivots: u64,
}

/// An incremental solver for systems of weighted linear constraints.
///
/// Constraints and edit variables may be added, removed, and re-suggested
/// after a solution exists; each mutation re-optimizes only as much of the
/// tableau as it disturbed. Call [`update_variables`](Solver::update_variables)
/// to publish the current solution, then read it with
/// [`value`](Solver::value).
#[derive(Debug)]
pub struct Solver {
    cns: FxHashMap<Constraint, Tag>,
    rows: FxHashMap<Symbol, Row>,
    vars: FxHashMap<Variable, VarData>,
    edits: FxHashMap<Variable, EditInfo>,
    infeasible_rows: Vec<Symbol>,
    objective: Row,
    artificial: Option<Row>,
    next_symbol_id: u64,
    stats: SolverStats,
}

impl Solver {
    /// Create an empty solver.
    #[must_use]
    pub fn new() -> Solver {
        Solver {
            cns: FxHashMap::default(),
            rows: FxHashMap::default(),
            vars: FxHashMap::default(),
            edits: FxHashMap::default(),
            infeasible_rows: Vec::new(),
            objective: Row::new(),
            artificial: None,
            next_symbol_id: 0,
            stats: SolverStats::default(),
        }
    }

    /// Add a constraint to the solver and re-optimize.
    ///
    /// # Errors
    ///
    /// [`AddConstraintError::DuplicateConstraint`] if this constraint handle
    /// is already tracked, [`AddConstraintError::UnsatisfiableConstraint`] if
    /// the constraint is required and conflicts with the required constraints
    /// already present. Either way the solver is left as it was.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), AddConstraintError> {
        if self.cns.contains_key(&constraint) {
            return Err(AddConstraintError::DuplicateConstraint);
        }
        debug!(%constraint, "adding constraint");

        // Building the row reserves symbols for the constraint's variables.
        // Those may linger in the var map if the constraint turns out to be
        // unsatisfiable; they are almost always reused by later constraints,
        // so no cleanup is attempted.
        let (mut row, tag) = self.create_row(&constraint);
        let mut subject = row.choose_subject(&tag);

        // A row of nothing but dummies is either a redundant required
        // equality (constant zero, the dummy marker may enter the basis) or
        // an unsatisfiable one.
        if subject.is_invalid() && row.all_dummies() {
            if !near_zero(row.constant()) {
                return Err(AddConstraintError::UnsatisfiableConstraint);
            }
            subject = tag.marker;
        }

        // Without a natural subject the row can only enter through an
        // artificial variable.
        if subject.is_invalid() {
            if !self
                .add_with_artificial_variable(row)
                .map_err(|_| AddConstraintError::UnboundedObjective)?
            {
                return Err(AddConstraintError::UnsatisfiableConstraint);
            }
        } else {
            row.solve_for(subject);
            self.substitute(subject, &row);
            self.rows.insert(subject, row);
        }

        self.cns.insert(constraint, tag);
        self.stats.constraints_added += 1;

        // Optimizing after every insertion keeps the average system small
        // and the solver in a consistent state.
        self.optimize(Target::Objective).map_err(|err| match err {
            PivotError::Unbounded => AddConstraintError::UnboundedObjective,
            PivotError::DualFailed => {
                AddConstraintError::InternalSolverError("dual failure during primal optimization")
            }
        })
    }

    /// Add every constraint from an iterator, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// The first error reported by [`add_constraint`](Solver::add_constraint);
    /// constraints before the failing one stay in the solver.
    pub fn add_constraints(
        &mut self,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Result<(), AddConstraintError> {
        for constraint in constraints {
            self.add_constraint(constraint)?;
        }
        Ok(())
    }

    /// Remove a previously added constraint and re-optimize.
    ///
    /// # Errors
    ///
    /// [`RemoveConstraintError::UnknownConstraint`] if the constraint was
    /// never added, [`RemoveConstraintError::FailedToFindLeavingRow`] if its
    /// marker cannot be pivoted out. Either way the solver is left as it was.
    pub fn remove_constraint(
        &mut self,
        constraint: &Constraint,
    ) -> Result<(), RemoveConstraintError> {
        let Some(&tag) = self.cns.get(constraint) else {
            return Err(RemoveConstraintError::UnknownConstraint);
        };
        debug!(%constraint, "removing constraint");

        // When the marker is non-basic, pick the row to pivot it into before
        // touching anything, so a failure leaves the solver unchanged.
        let leaving = if self.rows.contains_key(&tag.marker) {
            None
        } else {
            match self.marker_leaving_symbol(tag.marker) {
                Some(symbol) => Some(symbol),
                None => return Err(RemoveConstraintError::FailedToFindLeavingRow),
            }
        };

        self.cns.remove(constraint);

        // The error effects must leave the objective before any pivoting;
        // substituting into a still-penalized objective would corrupt its
        // coefficients.
        self.remove_constraint_effects(constraint, &tag);

        if self.rows.remove(&tag.marker).is_none() {
            if let Some(leaving) = leaving {
                if let Some(mut row) = self.rows.remove(&leaving) {
                    row.solve_for_pair(leaving, tag.marker);
                    self.substitute(tag.marker, &row);
                }
            }
        }

        self.stats.constraints_removed += 1;
        self.optimize(Target::Objective).map_err(|err| match err {
            PivotError::Unbounded => RemoveConstraintError::UnboundedObjective,
            PivotError::DualFailed => {
                RemoveConstraintError::InternalSolverError("dual failure during primal optimization")
            }
        })
    }

    /// Whether the given constraint handle is tracked by this solver.
    #[must_use]
    pub fn has_constraint(&self, constraint: &Constraint) -> bool {
        self.cns.contains_key(constraint)
    }

    /// Register a variable whose value will be driven through
    /// [`suggest_value`](Solver::suggest_value).
    ///
    /// Internally this adds the equality `variable == 0` at the given
    /// strength, which must be below [`Strength::REQUIRED`].
    ///
    /// # Errors
    ///
    /// [`AddEditVariableError::DuplicateEditVariable`] if the variable is
    /// already editable, [`AddEditVariableError::BadRequiredStrength`] if the
    /// clipped strength is required.
    pub fn add_edit_variable(
        &mut self,
        variable: &Variable,
        strength: Strength,
    ) -> Result<(), AddEditVariableError> {
        if self.edits.contains_key(variable) {
            return Err(AddEditVariableError::DuplicateEditVariable);
        }
        let strength = strength.clip();
        if strength.is_required() {
            return Err(AddEditVariableError::BadRequiredStrength);
        }
        let constraint = Constraint::new(
            variable.clone(),
            RelationalOperator::Equal,
            strength,
        );
        self.add_constraint(constraint.clone())
            .expect("an edit equality below required strength is always satisfiable");
        let tag = self
            .cns
            .get(&constraint)
            .copied()
            .expect("the edit constraint was just added");
        self.edits.insert(
            variable.clone(),
            EditInfo {
                tag,
                constraint,
                constant: 0.0,
            },
        );
        Ok(())
    }

    /// Remove a variable from the set of edit variables.
    ///
    /// # Errors
    ///
    /// [`RemoveEditVariableError::UnknownEditVariable`] if the variable was
    /// never registered.
    pub fn remove_edit_variable(
        &mut self,
        variable: &Variable,
    ) -> Result<(), RemoveEditVariableError> {
        let Some(info) = self.edits.remove(variable) else {
            return Err(RemoveEditVariableError::UnknownEditVariable);
        };
        self.remove_constraint(&info.constraint)
            .expect("the edit constraint is tracked while its edit variable is");
        Ok(())
    }

    /// Whether the variable is currently registered for editing.
    #[must_use]
    pub fn has_edit_variable(&self, variable: &Variable) -> bool {
        self.edits.contains_key(variable)
    }

    /// Suggest a value for an edit variable and restore feasibility.
    ///
    /// The delta against the previous suggestion is pushed through every row
    /// holding the edit constraint's symbols; rows whose constants turn
    /// negative are queued and repaired by dual optimization.
    ///
    /// # Errors
    ///
    /// [`SuggestValueError::UnknownEditVariable`] if the variable was never
    /// registered, leaving the solver unchanged.
    pub fn suggest_value(
        &mut self,
        variable: &Variable,
        value: f64,
    ) -> Result<(), SuggestValueError> {
        let (tag, delta) = {
            let Some(info) = self.edits.get_mut(variable) else {
                return Err(SuggestValueError::UnknownEditVariable);
            };
            let delta = value - info.constant;
            info.constant = value;
            (info.tag, delta)
        };
        debug!(variable = %variable, value, "suggesting value");

        if let Some(row) = self.rows.get_mut(&tag.marker) {
            // The positive error variable is basic; shift it directly.
            if row.add(-delta) < 0.0 {
                self.infeasible_rows.push(tag.marker);
            }
        } else if let Some(row) = self.rows.get_mut(&tag.other) {
            // The negative error variable is basic; shift it directly.
            if row.add(delta) < 0.0 {
                self.infeasible_rows.push(tag.other);
            }
        } else {
            // Otherwise push the delta through every row holding the marker.
            for (&basic, row) in self.rows.iter_mut() {
                let coefficient = row.coefficient_for(tag.marker);
                if coefficient != 0.0
                    && row.add(delta * coefficient) < 0.0
                    && !basic.is_external()
                {
                    self.infeasible_rows.push(basic);
                }
            }
        }

        self.dual_optimize().map_err(|_| {
            SuggestValueError::InternalSolverError(
                "dual optimization found no entering symbol for an infeasible row",
            )
        })
    }

    /// Publish the current solution into the solver's variable records.
    ///
    /// Each registered variable takes the constant of the row its symbol is
    /// basic in, or zero when the symbol is non-basic.
    pub fn update_variables(&mut self) {
        for data in self.vars.values_mut() {
            data.value = match self.rows.get(&data.symbol) {
                Some(row) => row.constant(),
                None => 0.0,
            };
        }
    }

    /// The value of a variable as of the last
    /// [`update_variables`](Solver::update_variables), or zero for a variable
    /// this solver has never seen.
    #[must_use]
    pub fn value(&self, variable: &Variable) -> f64 {
        self.vars.get(variable).map_or(0.0, |data| data.value)
    }

    /// Evaluate an expression against the published variable values.
    #[must_use]
    pub fn expression_value(&self, expression: &Expression) -> f64 {
        let terms: f64 = expression
            .terms()
            .iter()
            .map(|term| term.coefficient * self.value(&term.variable))
            .sum();
        terms + expression.constant()
    }

    /// Counters accumulated since the solver was created.
    #[must_use]
    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    /// Forget every constraint, variable, and edit variable.
    ///
    /// Reusing a reset solver is cheaper than building a fresh one when the
    /// whole system changes, since the map storage is retained.
    pub fn reset(&mut self) {
        debug!("resetting solver");
        self.cns.clear();
        self.rows.clear();
        self.vars.clear();
        self.edits.clear();
        self.infeasible_rows.clear();
        self.objective = Row::new();
        self.artificial = None;
        self.next_symbol_id = 0;
    }

    fn new_symbol(&mut self, kind: SymbolKind) -> Symbol {
        self.next_symbol_id += 1;
        Symbol::new(self.next_symbol_id, kind)
    }

    /// The external symbol for a variable, created on first sight.
    fn external_symbol(&mut self, variable: &Variable) -> Symbol {
        if let Some(data) = self.vars.get(variable) {
            return data.symbol;
        }
        let symbol = self.new_symbol(SymbolKind::External);
        self.vars
            .insert(variable.clone(), VarData { symbol, value: 0.0 });
        symbol
    }

    /// Translate a constraint into a row plus its tracking tag.
    ///
    /// Terms with near-zero coefficients are skipped. A term whose external
    /// symbol is currently basic contributes that symbol's row instead of the
    /// symbol itself, so a fresh row never mentions a basic symbol. The
    /// comparator then decides the bookkeeping columns: inequalities get a
    /// slack marker (plus an error column when not required), non-required
    /// equalities get a pair of error columns, and required equalities get a
    /// dummy marker that can never pivot. Error columns are charged to the
    /// objective at the constraint's strength. The finished row is flipped if
    /// needed so its constant is non-negative.
    fn create_row(&mut self, constraint: &Constraint) -> (Row, Tag) {
        let expression = constraint.expression();
        let mut row = Row::with_constant(expression.constant());
        for term in expression.terms() {
            if near_zero(term.coefficient) {
                continue;
            }
            let symbol = self.external_symbol(&term.variable);
            if let Some(basic_row) = self.rows.get(&symbol) {
                row.insert_row(basic_row, term.coefficient);
            } else {
                row.insert_symbol(symbol, term.coefficient);
            }
        }

        let strength = constraint.strength();
        let tag = match constraint.op() {
            RelationalOperator::LessOrEqual | RelationalOperator::GreaterOrEqual => {
                let coefficient = if constraint.op() == RelationalOperator::LessOrEqual {
                    1.0
                } else {
                    -1.0
                };
                let marker = self.new_symbol(SymbolKind::Slack);
                row.insert_symbol(marker, coefficient);
                if strength < Strength::REQUIRED {
                    let error = self.new_symbol(SymbolKind::Error);
                    row.insert_symbol(error, -coefficient);
                    self.objective.insert_symbol(error, strength.value());
                    Tag {
                        marker,
                        other: error,
                    }
                } else {
                    Tag {
                        marker,
                        other: Symbol::invalid(),
                    }
                }
            }
            RelationalOperator::Equal => {
                if strength < Strength::REQUIRED {
                    let errplus = self.new_symbol(SymbolKind::Error);
                    let errminus = self.new_symbol(SymbolKind::Error);
                    row.insert_symbol(errplus, -1.0);
                    row.insert_symbol(errminus, 1.0);
                    self.objective.insert_symbol(errplus, strength.value());
                    self.objective.insert_symbol(errminus, strength.value());
                    Tag {
                        marker: errplus,
                        other: errminus,
                    }
                } else {
                    let dummy = self.new_symbol(SymbolKind::Dummy);
                    row.insert_symbol(dummy, 1.0);
                    Tag {
                        marker: dummy,
                        other: Symbol::invalid(),
                    }
                }
            }
        };

        // Basic rows keep non-negative constants.
        if row.constant() < 0.0 {
            row.reverse_sign();
        }
        (row, tag)
    }

    /// Install a row that offered no natural subject, via a fresh artificial
    /// variable. Returns whether the artificial objective reached zero, which
    /// is the test for the constraint being satisfiable.
    fn add_with_artificial_variable(&mut self, row: Row) -> Result<bool, PivotError> {
        let art = self.new_symbol(SymbolKind::Slack);
        self.rows.insert(art, row.clone());
        self.artificial = Some(row);

        let optimize_result = self.optimize(Target::Artificial);
        let success = match &self.artificial {
            Some(artificial) => near_zero(artificial.constant()),
            None => false,
        };
        self.artificial = None;
        optimize_result?;

        // If the artificial variable stayed basic, pivot its row onto some
        // pivotable symbol before dropping it. A constant row means the
        // artificial column is already gone from the rest of the tableau.
        if let Some(mut art_row) = self.rows.remove(&art) {
            if art_row.is_empty() {
                return Ok(success);
            }
            let entering = art_row.any_pivotable();
            if entering.is_invalid() {
                return Ok(false);
            }
            art_row.solve_for_pair(art, entering);
            self.substitute(entering, &art_row);
            self.rows.insert(entering, art_row);
        }

        for row in self.rows.values_mut() {
            row.remove_symbol(art);
        }
        self.objective.remove_symbol(art);
        Ok(success)
    }

    /// Replace a parametric symbol with a row throughout the tableau, the
    /// objective, and the artificial objective when present. Non-external
    /// rows whose constants turn negative are queued as infeasible.
    fn substitute(&mut self, symbol: Symbol, row: &Row) {
        for (&basic, basic_row) in self.rows.iter_mut() {
            basic_row.substitute(symbol, row);
            if !basic.is_external() && basic_row.constant() < 0.0 {
                self.infeasible_rows.push(basic);
            }
        }
        self.objective.substitute(symbol, row);
        if let Some(artificial) = self.artificial.as_mut() {
            artificial.substitute(symbol, row);
        }
    }

    /// Phase-2 primal simplex: pivot until the target objective has no
    /// entering symbol left.
    fn optimize(&mut self, target: Target) -> Result<(), PivotError> {
        loop {
            let entering = match target {
                Target::Objective => self.objective.entering_symbol(),
                Target::Artificial => match &self.artificial {
                    Some(artificial) => artificial.entering_symbol(),
                    None => Symbol::invalid(),
                },
            };
            if entering.is_invalid() {
                return Ok(());
            }
            let Some((leaving, mut row)) = self.take_leaving_row(entering) else {
                return Err(PivotError::Unbounded);
            };
            trace!(%entering, %leaving, "primal pivot");
            row.solve_for_pair(leaving, entering);
            self.substitute(entering, &row);
            self.rows.insert(entering, row);
            self.stats.primal_pivots += 1;
        }
    }

    /// Drain the infeasible queue, newest first, restoring feasibility while
    /// preserving optimality.
    fn dual_optimize(&mut self) -> Result<(), PivotError> {
        while let Some(leaving) = self.infeasible_rows.pop() {
            let entering = match self.rows.get(&leaving) {
                Some(row) if row.constant() < 0.0 => self.objective.dual_entering_symbol(row),
                _ => continue,
            };
            if entering.is_invalid() {
                return Err(PivotError::DualFailed);
            }
            let Some(mut row) = self.rows.remove(&leaving) else {
                continue;
            };
            trace!(%entering, %leaving, "dual pivot");
            row.solve_for_pair(leaving, entering);
            self.substitute(entering, &row);
            self.rows.insert(entering, row);
            self.stats.dual_pivots += 1;
        }
        Ok(())
    }

    /// The exit row for a primal pivot: among non-external rows with a
    /// negative coefficient for the entering symbol, the one minimizing
    /// `-constant / coefficient`. `None` means the objective is unbounded.
    fn take_leaving_row(&mut self, entering: Symbol) -> Option<(Symbol, Row)> {
        let mut ratio = f64::INFINITY;
        let mut found = None;
        for (&symbol, row) in &self.rows {
            if symbol.is_external() {
                continue;
            }
            let coefficient = row.coefficient_for(entering);
            if coefficient < 0.0 {
                let r = -row.constant() / coefficient;
                if r < ratio {
                    ratio = r;
                    found = Some(symbol);
                }
            }
        }
        found.and_then(|symbol| self.rows.remove(&symbol).map(|row| (symbol, row)))
    }

    /// The row to pivot a non-basic marker into so it can be dropped.
    ///
    /// Three candidate classes, best first: restricted rows with a negative
    /// coefficient for the marker (minimizing `-constant / coefficient`),
    /// restricted rows with a positive coefficient (minimizing
    /// `constant / coefficient`), and finally any external row mentioning the
    /// marker.
    fn marker_leaving_symbol(&self, marker: Symbol) -> Option<Symbol> {
        let mut r1 = f64::INFINITY;
        let mut r2 = f64::INFINITY;
        let mut first = None;
        let mut second = None;
        let mut third = None;
        for (&symbol, row) in &self.rows {
            let coefficient = row.coefficient_for(marker);
            if coefficient == 0.0 {
                continue;
            }
            if symbol.is_external() {
                third = Some(symbol);
            } else if coefficient < 0.0 {
                let r = -row.constant() / coefficient;
                if r < r1 {
                    r1 = r;
                    first = Some(symbol);
                }
            } else {
                let r = row.constant() / coefficient;
                if r < r2 {
                    r2 = r;
                    second = Some(symbol);
                }
            }
        }
        first.or(second).or(third)
    }

    /// Subtract an error marker's strength-weighted contribution from the
    /// objective.
    fn remove_constraint_effects(&mut self, constraint: &Constraint, tag: &Tag) {
        if tag.marker.is_error() {
            self.remove_marker_effects(tag.marker, constraint.strength());
        } else if tag.other.is_error() {
            self.remove_marker_effects(tag.other, constraint.strength());
        }
    }

    fn remove_marker_effects(&mut self, marker: Symbol, strength: Strength) {
        if let Some(row) = self.rows.get(&marker) {
            self.objective.insert_row(row, -strength.value());
        } else {
            self.objective.insert_symbol(marker, -strength.value());
        }
    }
}

impl Default for Solver {
    fn default() -> Solver {
        Solver::new()
    }
}

impl fmt::Display for Solver {
    /// A human-readable dump of the tableau, for debugging layout systems.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Objective")?;
        writeln!(f, "---------")?;
        writeln!(f, "{}", self.objective)?;
        writeln!(f)?;
        writeln!(f, "Tableau")?;
        writeln!(f, "-------")?;
        for (symbol, row) in &self.rows {
            writeln!(f, "{symbol} | {row}")?;
        }
        writeln!(f)?;
        writeln!(f, "Infeasible")?;
        writeln!(f, "----------")?;
        for symbol in &self.infeasible_rows {
            writeln!(f, "{symbol}")?;
        }
        writeln!(f)?;
        writeln!(f, "Variables")?;
        writeln!(f, "---------")?;
        for (variable, data) in &self.vars {
            writeln!(f, "{variable} = {}", data.symbol)?;
        }
        writeln!(f)?;
        writeln!(f, "Edit Variables")?;
        writeln!(f, "--------------")?;
        for variable in self.edits.keys() {
            writeln!(f, "{variable}")?;
        }
        writeln!(f)?;
        writeln!(f, "Constraints")?;
        writeln!(f, "-----------")?;
        for constraint in self.cns.keys() {
            writeln!(f, "{constraint}")?;
        }
        Ok(())
    }
}
