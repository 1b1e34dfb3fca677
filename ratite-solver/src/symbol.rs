//! Internal identities for tableau columns.

use std::fmt;

/// The role a symbol plays in the tableau.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum SymbolKind {
    /// The "no such symbol" sentinel used in return positions.
    Invalid,
    /// A column backing a caller-visible variable.
    External,
    /// A column introduced to turn an inequality into an equality.
    Slack,
    /// A column whose objective coefficient penalizes violating a
    /// non-required constraint.
    Error,
    /// A column carrying a required equality without entering the objective.
    Dummy,
}

/// An opaque tableau column identity.
///
/// Symbols compare by id; the kind is immutable metadata fixed at creation.
/// Ids are allocated per solver, so symbols from different solvers never
/// collide within the solver that made them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Symbol {
    id: u64,
    kind: SymbolKind,
}

impl Symbol {
    pub(crate) fn new(id: u64, kind: SymbolKind) -> Symbol {
        Symbol { id, kind }
    }

    /// The sentinel returned when no symbol qualifies.
    pub(crate) fn invalid() -> Symbol {
        Symbol {
            id: 0,
            kind: SymbolKind::Invalid,
        }
    }

    pub(crate) fn kind(self) -> SymbolKind {
        self.kind
    }

    pub(crate) fn is_invalid(self) -> bool {
        self.kind == SymbolKind::Invalid
    }

    pub(crate) fn is_external(self) -> bool {
        self.kind == SymbolKind::External
    }

    pub(crate) fn is_error(self) -> bool {
        self.kind == SymbolKind::Error
    }

    pub(crate) fn is_dummy(self) -> bool {
        self.kind == SymbolKind::Dummy
    }

    /// Slack and error symbols may be pivoted into the basis.
    pub(crate) fn is_pivotable(self) -> bool {
        matches!(self.kind, SymbolKind::Slack | SymbolKind::Error)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self.kind {
            SymbolKind::Invalid => 'i',
            SymbolKind::External => 'v',
            SymbolKind::Slack => 's',
            SymbolKind::Error => 'e',
            SymbolKind::Dummy => 'd',
        };
        write!(f, "{letter}{}", self.id)
    }
}

/// The pair of symbols tracking one constraint through the tableau.
///
/// `marker` is never invalid for a live constraint; `other` is invalid
/// whenever the constraint needed only one bookkeeping symbol.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Tag {
    pub(crate) marker: Symbol,
    pub(crate) other: Symbol,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_by_id() {
        let a = Symbol::new(1, SymbolKind::Slack);
        let b = Symbol::new(2, SymbolKind::Slack);
        assert_ne!(a, b);
        assert_eq!(a, Symbol::new(1, SymbolKind::Slack));
    }

    #[test]
    fn kind_predicates() {
        assert!(Symbol::invalid().is_invalid());
        assert!(Symbol::new(3, SymbolKind::Slack).is_pivotable());
        assert!(Symbol::new(4, SymbolKind::Error).is_pivotable());
        assert!(!Symbol::new(5, SymbolKind::Dummy).is_pivotable());
        assert!(!Symbol::new(6, SymbolKind::External).is_pivotable());
    }

    #[test]
    fn display_is_kind_letter_plus_id() {
        assert_eq!(Symbol::new(7, SymbolKind::External).to_string(), "v7");
        assert_eq!(Symbol::new(8, SymbolKind::Dummy).to_string(), "d8");
    }
}
