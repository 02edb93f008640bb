//! Error types for C++ emission.
//!
//! The emitter assumes a valid AST; these errors mark broken pipeline
//! invariants rather than user mistakes, and surface as proper errors
//! instead of panics.

use thiserror::Error;

/// Error type for C++ code emission.
#[derive(Debug, Error)]
pub enum EmitError {
    /// An `autopattern` statement survived to emission. Expansion is
    /// the parser's job; reaching here means the pipeline skipped it.
    #[error("Unexpanded autopattern '{0}' reached the transpiler")]
    UnexpandedAutoPattern(String),

    /// Internal error - indicates a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for emission operations.
pub type Result<T> = std::result::Result<T, EmitError>;
