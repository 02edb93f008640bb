//! The symbolic abstract domain.
//!
//! Each variable is tracked as a [`SymbolicValue`]: an initialization
//! state, nullability bits, an optional known constant, and a taint
//! flag. The lattice has finite height, so the pointwise join used at
//! merge points guarantees the worklist converges.

/// Initialization/allocation state of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarState {
    Uninitialized,
    Initialized,
    NullPtr,
    NonNull,
    Freed,
    #[default]
    Unknown,
}

/// Per-variable abstract state at a program point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SymbolicValue {
    pub state: VarState,
    pub may_be_null: bool,
    pub definitely_null: bool,
    /// Known constant value, when the variable was assigned a literal.
    pub constant_value: Option<i64>,
    /// Marked when the value derives from external input.
    pub tainted: bool,
}

impl SymbolicValue {
    /// A freshly initialized, non-null value.
    pub fn initialized() -> Self {
        Self {
            state: VarState::Initialized,
            ..Self::default()
        }
    }

    /// A declared-but-unassigned value.
    pub fn uninitialized() -> Self {
        Self {
            state: VarState::Uninitialized,
            ..Self::default()
        }
    }

    /// A value known to be null.
    pub fn null() -> Self {
        Self {
            state: VarState::NullPtr,
            may_be_null: true,
            definitely_null: true,
            ..Self::default()
        }
    }

    /// An initialized value with a known constant.
    pub fn constant(value: i64) -> Self {
        Self {
            state: VarState::Initialized,
            constant_value: Some(value),
            ..Self::default()
        }
    }

    /// Pointwise join with another state. Disagreement coarsens:
    /// states become `Unknown`, `may_be_null` is OR-joined,
    /// `definitely_null` is AND-joined, constants survive only when
    /// equal.
    pub fn join(&self, other: &SymbolicValue) -> SymbolicValue {
        SymbolicValue {
            state: if self.state == other.state {
                self.state
            } else {
                VarState::Unknown
            },
            may_be_null: self.may_be_null || other.may_be_null,
            definitely_null: self.definitely_null && other.definitely_null,
            constant_value: match (self.constant_value, other.constant_value) {
                (Some(a), Some(b)) if a == b => Some(a),
                _ => None,
            },
            tainted: self.tainted || other.tainted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_equal_states() {
        let a = SymbolicValue::constant(3);
        assert_eq!(a.join(&a.clone()), a);
    }

    #[test]
    fn test_join_disagreeing_states_coarsen() {
        let a = SymbolicValue::initialized();
        let b = SymbolicValue::uninitialized();
        let j = a.join(&b);
        assert_eq!(j.state, VarState::Unknown);
    }

    #[test]
    fn test_join_nullability() {
        let a = SymbolicValue::null();
        let b = SymbolicValue::initialized();
        let j = a.join(&b);
        assert!(j.may_be_null);
        assert!(!j.definitely_null);
    }

    #[test]
    fn test_join_constants() {
        let a = SymbolicValue::constant(1);
        let b = SymbolicValue::constant(2);
        assert_eq!(a.join(&b).constant_value, None);
        assert_eq!(a.join(&a.clone()).constant_value, Some(1));
    }
}
