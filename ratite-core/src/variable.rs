//! External solver variables.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_VARIABLE_ID: AtomicU64 = AtomicU64::new(1);

/// A named real-valued unknown.
///
/// A `Variable` is a cheap clonable handle. Equality and hashing use the
/// handle identity assigned at construction, never the name, so two variables
/// that happen to share a name are still distinct unknowns while every clone
/// refers to the same one.
///
/// The variable itself holds no value. A solver that has seen the variable
/// owns its current value; read it back with `Solver::value` after
/// `Solver::update_variables`.
#[derive(Clone, Debug)]
pub struct Variable(Arc<VariableInner>);

#[derive(Debug)]
struct VariableInner {
    id: u64,
    name: String,
}

impl Variable {
    /// Create a new variable with a display name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Variable {
        Variable(Arc::new(VariableInner {
            id: NEXT_VARIABLE_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
        }))
    }

    /// The display name given at construction.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The process-unique identity of this variable.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.0.id
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Variable) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_not_name() {
        let a = Variable::new("x");
        let b = Variable::new("x");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn clones_share_identity() {
        let a = Variable::new("width");
        let b = a.clone();
        assert_eq!(a.id(), b.id());
        assert_eq!(a, b);
    }
}
