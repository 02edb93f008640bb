//! Fluent builder for diagnostics.
//!
//! Phases that attach codes, notes and function context read better with
//! a builder than with positional constructors. `build()` produces the
//! [`Diagnostic`]; `emit()` builds and pushes into a [`Handler`] in one
//! step.

use crate::span::Span;

use super::{Diagnostic, DiagnosticCode, Handler, Level};

/// Fluent builder for [`Diagnostic`] values.
///
/// # Examples
///
/// ```
/// use lppc_util::diagnostic::{DiagnosticBuilder, DiagnosticCode, Level};
/// use lppc_util::Span;
///
/// let diag = DiagnosticBuilder::warning("Potential memory leak")
///     .code(DiagnosticCode::MEM_LEAK)
///     .span(Span::new(12, 1))
///     .note("Variable: buffer")
///     .build();
///
/// assert_eq!(diag.level, Level::Warning);
/// assert_eq!(diag.notes, vec!["Variable: buffer"]);
/// ```
#[derive(Debug)]
pub struct DiagnosticBuilder {
    level: Level,
    message: String,
    span: Span,
    code: Option<DiagnosticCode>,
    function: Option<String>,
    notes: Vec<String>,
    helps: Vec<String>,
}

impl DiagnosticBuilder {
    /// Start building a diagnostic at the given level.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            span: Span::DUMMY,
            code: None,
            function: None,
            notes: Vec::new(),
            helps: Vec::new(),
        }
    }

    /// Start building an error.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    /// Start building a warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    /// Set the source location.
    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Set the stable code.
    pub fn code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Record the enclosing function.
    pub fn function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Attach a note line.
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Attach a help line.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.helps.push(help.into());
        self
    }

    /// Finish building.
    pub fn build(self) -> Diagnostic {
        Diagnostic {
            level: self.level,
            message: self.message,
            span: self.span,
            code: self.code,
            function: self.function,
            notes: self.notes,
            helps: self.helps,
        }
    }

    /// Build and emit into the handler.
    pub fn emit(self, handler: &Handler) {
        handler.emit_diagnostic(self.build());
    }
}
