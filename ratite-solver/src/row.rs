//! Sparse tableau rows and their symbolic algebra.
//!
//! A row represents the equation `constant + Σ cᵢ·sᵢ = 0`. Cells never hold a
//! near-zero coefficient: every mutation that could produce one removes the
//! cell instead, which keeps the tableau sparse and the pivot arithmetic away
//! from denormal noise.

use crate::symbol::{Symbol, Tag};
use rustc_hash::FxHashMap;
use std::fmt;

/// The uniform tolerance for "near zero" checks on coefficients and
/// constants.
pub(crate) const EPSILON: f64 = 1.0e-8;

/// Whether a value lies within [`EPSILON`] of zero.
pub(crate) fn near_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// A sparse linear form: a constant plus a symbol-to-coefficient map.
#[derive(Clone, Debug, Default)]
pub(crate) struct Row {
    constant: f64,
    cells: FxHashMap<Symbol, f64>,
}

impl Row {
    pub(crate) fn new() -> Row {
        Row::default()
    }

    pub(crate) fn with_constant(constant: f64) -> Row {
        Row {
            constant,
            cells: FxHashMap::default(),
        }
    }

    pub(crate) fn constant(&self) -> f64 {
        self.constant
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Accumulate into the constant, returning the new value.
    pub(crate) fn add(&mut self, delta: f64) -> f64 {
        self.constant += delta;
        self.constant
    }

    /// Add `coefficient` to the symbol's cell, removing the cell when the sum
    /// lands near zero.
    pub(crate) fn insert_symbol(&mut self, symbol: Symbol, coefficient: f64) {
        let combined = self.coefficient_for(symbol) + coefficient;
        if near_zero(combined) {
            self.cells.remove(&symbol);
        } else {
            self.cells.insert(symbol, combined);
        }
    }

    /// Add `other` scaled by `coefficient` into this row, cell by cell.
    pub(crate) fn insert_row(&mut self, other: &Row, coefficient: f64) {
        self.constant += other.constant * coefficient;
        for (&symbol, &other_coeff) in &other.cells {
            self.insert_symbol(symbol, other_coeff * coefficient);
        }
    }

    pub(crate) fn remove_symbol(&mut self, symbol: Symbol) {
        self.cells.remove(&symbol);
    }

    /// Negate the constant and every cell.
    pub(crate) fn reverse_sign(&mut self) {
        self.constant = -self.constant;
        for coefficient in self.cells.values_mut() {
            *coefficient = -*coefficient;
        }
    }

    /// Solve the row for `symbol`.
    ///
    /// Rewrites `c + a·symbol + Σ bᵢ·sᵢ = 0` as
    /// `symbol = -c/a - Σ (bᵢ/a)·sᵢ`: the symbol leaves the cells and the
    /// remaining row is scaled by `-1/a`. The symbol must be present.
    pub(crate) fn solve_for(&mut self, symbol: Symbol) {
        debug_assert!(self.cells.contains_key(&symbol));
        if let Some(coefficient) = self.cells.remove(&symbol) {
            let factor = -1.0 / coefficient;
            self.constant *= factor;
            for value in self.cells.values_mut() {
                *value *= factor;
            }
        }
    }

    /// Solve a row of the form `lhs = b·rhs + c` for `rhs`. The left-hand
    /// symbol must not be present; the right-hand symbol must be.
    pub(crate) fn solve_for_pair(&mut self, lhs: Symbol, rhs: Symbol) {
        self.insert_symbol(lhs, -1.0);
        self.solve_for(rhs);
    }

    /// The coefficient for a symbol, or zero when absent.
    pub(crate) fn coefficient_for(&self, symbol: Symbol) -> f64 {
        self.cells.get(&symbol).copied().unwrap_or(0.0)
    }

    /// Replace `symbol` with the given row scaled by the symbol's former
    /// coefficient. A no-op when the symbol is absent.
    pub(crate) fn substitute(&mut self, symbol: Symbol, row: &Row) {
        if let Some(coefficient) = self.cells.remove(&symbol) {
            self.insert_row(row, coefficient);
        }
    }

    /// Pick the symbol to solve a freshly created constraint row for.
    ///
    /// Precedence: any external symbol in the row; then the tag's marker if
    /// it is pivotable with a negative coefficient; then the tag's other
    /// symbol under the same condition; otherwise invalid.
    pub(crate) fn choose_subject(&self, tag: &Tag) -> Symbol {
        for &symbol in self.cells.keys() {
            if symbol.is_external() {
                return symbol;
            }
        }
        if tag.marker.is_pivotable() && self.coefficient_for(tag.marker) < 0.0 {
            return tag.marker;
        }
        if tag.other.is_pivotable() && self.coefficient_for(tag.other) < 0.0 {
            return tag.other;
        }
        Symbol::invalid()
    }

    /// Whether every cell symbol is a dummy.
    pub(crate) fn all_dummies(&self) -> bool {
        self.cells.keys().all(|symbol| symbol.is_dummy())
    }

    /// The first slack or error symbol in the row, or invalid.
    pub(crate) fn any_pivotable(&self) -> Symbol {
        self.cells
            .keys()
            .copied()
            .find(|symbol| symbol.is_pivotable())
            .unwrap_or_else(Symbol::invalid)
    }

    /// The entering symbol for a primal optimization step: the first
    /// non-dummy cell with a negative coefficient, or invalid when the
    /// objective is at its minimum.
    pub(crate) fn entering_symbol(&self) -> Symbol {
        for (&symbol, &coefficient) in &self.cells {
            if !symbol.is_dummy() && coefficient < 0.0 {
                return symbol;
            }
        }
        Symbol::invalid()
    }

    /// The entering symbol for a dual optimization step, with `self` as the
    /// objective: among the infeasible row's non-dummy cells with positive
    /// coefficients, the one minimizing objective-coefficient over
    /// row-coefficient.
    pub(crate) fn dual_entering_symbol(&self, infeasible: &Row) -> Symbol {
        let mut entering = Symbol::invalid();
        let mut ratio = f64::INFINITY;
        for (&symbol, &coefficient) in &infeasible.cells {
            if coefficient > 0.0 && !symbol.is_dummy() {
                let r = self.coefficient_for(symbol) / coefficient;
                if r < ratio {
                    ratio = r;
                    entering = symbol;
                }
            }
        }
        entering
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.constant)?;
        for (symbol, coefficient) in &self.cells {
            write!(f, " + {coefficient} * {symbol}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolKind;

    fn sym(id: u64, kind: SymbolKind) -> Symbol {
        Symbol::new(id, kind)
    }

    #[test]
    fn insert_symbol_accumulates_and_prunes() {
        let mut row = Row::new();
        let s = sym(1, SymbolKind::Slack);
        row.insert_symbol(s, 2.0);
        assert_eq!(row.coefficient_for(s), 2.0);
        row.insert_symbol(s, 3.0);
        assert_eq!(row.coefficient_for(s), 5.0);
        row.insert_symbol(s, -5.0);
        assert_eq!(row.coefficient_for(s), 0.0);
        assert!(row.is_empty());
    }

    #[test]
    fn insert_row_scales_constant_and_cells() {
        let s1 = sym(1, SymbolKind::Slack);
        let s2 = sym(2, SymbolKind::Slack);
        let mut other = Row::with_constant(3.0);
        other.insert_symbol(s1, 2.0);
        other.insert_symbol(s2, -1.0);

        let mut row = Row::with_constant(1.0);
        row.insert_symbol(s1, 1.0);
        row.insert_row(&other, 2.0);

        assert_eq!(row.constant(), 7.0);
        assert_eq!(row.coefficient_for(s1), 5.0);
        assert_eq!(row.coefficient_for(s2), -2.0);
    }

    #[test]
    fn reverse_sign_negates_everything() {
        let s = sym(1, SymbolKind::External);
        let mut row = Row::with_constant(4.0);
        row.insert_symbol(s, -2.0);
        row.reverse_sign();
        assert_eq!(row.constant(), -4.0);
        assert_eq!(row.coefficient_for(s), 2.0);
    }

    #[test]
    fn solve_for_rescales_by_negative_inverse() {
        // 10 + 2x - 4y = 0 solved for x: x = -5 + 2y
        let x = sym(1, SymbolKind::External);
        let y = sym(2, SymbolKind::External);
        let mut row = Row::with_constant(10.0);
        row.insert_symbol(x, 2.0);
        row.insert_symbol(y, -4.0);
        row.solve_for(x);
        assert_eq!(row.constant(), -5.0);
        assert_eq!(row.coefficient_for(x), 0.0);
        assert_eq!(row.coefficient_for(y), 2.0);
    }

    #[test]
    fn solve_for_pair_introduces_lhs() {
        // x = 2y + 6 solved for y: y = x/2 - 3
        let x = sym(1, SymbolKind::External);
        let y = sym(2, SymbolKind::External);
        let mut row = Row::with_constant(6.0);
        row.insert_symbol(y, 2.0);
        row.solve_for_pair(x, y);
        assert_eq!(row.constant(), -3.0);
        assert_eq!(row.coefficient_for(x), 0.5);
    }

    #[test]
    fn substitute_replaces_symbol_with_row() {
        // row: 1 + 3x; x = 2 - y  =>  7 - 3y
        let x = sym(1, SymbolKind::External);
        let y = sym(2, SymbolKind::External);
        let mut row = Row::with_constant(1.0);
        row.insert_symbol(x, 3.0);
        let mut sub = Row::with_constant(2.0);
        sub.insert_symbol(y, -1.0);
        row.substitute(x, &sub);
        assert_eq!(row.constant(), 7.0);
        assert_eq!(row.coefficient_for(x), 0.0);
        assert_eq!(row.coefficient_for(y), -3.0);
    }

    #[test]
    fn substitute_ignores_absent_symbols() {
        let x = sym(1, SymbolKind::External);
        let mut row = Row::with_constant(1.0);
        let sub = Row::with_constant(9.0);
        row.substitute(x, &sub);
        assert_eq!(row.constant(), 1.0);
    }

    #[test]
    fn choose_subject_prefers_external() {
        let v = sym(1, SymbolKind::External);
        let s = sym(2, SymbolKind::Slack);
        let mut row = Row::new();
        row.insert_symbol(v, 1.0);
        row.insert_symbol(s, -1.0);
        let tag = Tag {
            marker: s,
            other: Symbol::invalid(),
        };
        assert_eq!(row.choose_subject(&tag), v);
    }

    #[test]
    fn choose_subject_takes_negative_pivotable_marker() {
        let s = sym(1, SymbolKind::Slack);
        let e = sym(2, SymbolKind::Error);
        let mut row = Row::new();
        row.insert_symbol(s, 1.0);
        row.insert_symbol(e, -1.0);
        let tag = Tag { marker: s, other: e };
        // Marker has a positive coefficient, so the other symbol wins.
        assert_eq!(row.choose_subject(&tag), e);
    }

    #[test]
    fn choose_subject_gives_up_on_dummies() {
        let d = sym(1, SymbolKind::Dummy);
        let mut row = Row::new();
        row.insert_symbol(d, 1.0);
        let tag = Tag {
            marker: d,
            other: Symbol::invalid(),
        };
        assert!(row.choose_subject(&tag).is_invalid());
        assert!(row.all_dummies());
    }

    #[test]
    fn entering_symbol_skips_dummies_and_positives() {
        let d = sym(1, SymbolKind::Dummy);
        let s = sym(2, SymbolKind::Slack);
        let mut row = Row::new();
        row.insert_symbol(d, -1.0);
        row.insert_symbol(s, 1.0);
        assert!(row.entering_symbol().is_invalid());
        row.insert_symbol(s, -2.0);
        assert_eq!(row.entering_symbol(), s);
    }

    #[test]
    fn dual_entering_minimizes_objective_ratio() {
        let s1 = sym(1, SymbolKind::Slack);
        let s2 = sym(2, SymbolKind::Slack);
        let mut objective = Row::new();
        objective.insert_symbol(s1, 4.0);
        objective.insert_symbol(s2, 1.0);

        let mut infeasible = Row::with_constant(-2.0);
        infeasible.insert_symbol(s1, 2.0);
        infeasible.insert_symbol(s2, 1.0);

        // ratios: s1 -> 4/2 = 2, s2 -> 1/1 = 1
        assert_eq!(objective.dual_entering_symbol(&infeasible), s2);
    }

    #[test]
    fn any_pivotable_finds_slack_or_error() {
        let d = sym(1, SymbolKind::Dummy);
        let e = sym(2, SymbolKind::Error);
        let mut row = Row::new();
        row.insert_symbol(d, 1.0);
        assert!(row.any_pivotable().is_invalid());
        row.insert_symbol(e, 1.0);
        assert_eq!(row.any_pivotable(), e);
    }
}
