//! Diagnostic codes for categorizing compiler errors and warnings.
//!
//! Codes are part of the user-visible contract: they appear in square
//! brackets in rendered diagnostics (`file:3:7: error: [UNINIT-READ] ...`)
//! and downstream tooling greps for them. The set is closed; adding a
//! code is an interface change.

/// A stable code identifying a class of diagnostic.
///
/// # Examples
///
/// ```
/// use lppc_util::diagnostic::DiagnosticCode;
///
/// assert_eq!(DiagnosticCode::NULL_DEREF.as_str(), "NULL-DEREF");
/// assert_eq!(DiagnosticCode::MOD_CYCLE.as_str(), "MOD-CYCLE");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode(&'static str);

impl DiagnosticCode {
    /// Create a code from its stable name.
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The stable name, as rendered inside square brackets.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    // =========================================================================
    // LEXICAL AND SYNTACTIC CODES
    // =========================================================================

    /// Syntax error reported by the parser.
    pub const SYNTAX: Self = Self::new("SYNTAX");
    /// Missing or malformed `#pragma paradigm` directive.
    pub const PRAGMA: Self = Self::new("PRAGMA");

    // =========================================================================
    // FLOW ANALYSIS CODES
    // =========================================================================

    /// Null pointer dereference.
    pub const NULL_DEREF: Self = Self::new("NULL-DEREF");
    /// Division whose right operand provably evaluates to zero.
    pub const DIV_BY_ZERO: Self = Self::new("DIV-BY-ZERO");
    /// Read of a variable that was declared but never assigned.
    pub const UNINIT_READ: Self = Self::new("UNINIT-READ");
    /// Constant arithmetic exceeding 32-bit integer bounds.
    pub const INT_OVERFLOW: Self = Self::new("INT-OVERFLOW");
    /// Allocation that is never freed on some path to function exit.
    pub const MEM_LEAK: Self = Self::new("MEM-LEAK");
    /// Statement unreachable from the function entry.
    pub const DEAD_CODE: Self = Self::new("DEAD-CODE");
    /// Constant index beyond a fixed array bound.
    pub const BUFFER_OVERFLOW: Self = Self::new("BUFFER-OVERFLOW");

    // =========================================================================
    // PARADIGM ENFORCEMENT CODES
    // =========================================================================

    /// Construct forbidden under `#pragma paradigm functional`.
    pub const PARADIGM_FUNC: Self = Self::new("PARADIGM-FUNC");
    /// Construct discouraged under `#pragma paradigm imperative`.
    pub const PARADIGM_IMP: Self = Self::new("PARADIGM-IMP");
    /// Style advice under `#pragma paradigm golfed`.
    pub const PARADIGM_GOLF: Self = Self::new("PARADIGM-GOLF");

    // =========================================================================
    // MODULE CODES
    // =========================================================================

    /// Import specifier did not resolve to a file.
    pub const MOD_NOT_FOUND: Self = Self::new("MOD-NOT-FOUND");
    /// Cyclic import chain.
    pub const MOD_CYCLE: Self = Self::new("MOD-CYCLE");
}

impl std::fmt::Debug for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DiagnosticCode({})", self.0)
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str() {
        assert_eq!(DiagnosticCode::DIV_BY_ZERO.as_str(), "DIV-BY-ZERO");
        assert_eq!(DiagnosticCode::DEAD_CODE.as_str(), "DEAD-CODE");
        assert_eq!(DiagnosticCode::PARADIGM_FUNC.as_str(), "PARADIGM-FUNC");
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(DiagnosticCode::MEM_LEAK.to_string(), "MEM-LEAK");
    }

    #[test]
    fn test_debug() {
        assert_eq!(
            format!("{:?}", DiagnosticCode::NULL_DEREF),
            "DiagnosticCode(NULL-DEREF)"
        );
    }

    #[test]
    fn test_code_equality() {
        assert_eq!(DiagnosticCode::SYNTAX, DiagnosticCode::new("SYNTAX"));
        assert_ne!(DiagnosticCode::SYNTAX, DiagnosticCode::PRAGMA);
    }
}
