//! Diagnostic module - Error and warning reporting infrastructure.
//!
//! Every phase of the pipeline reports through this module. The model:
//!
//! - [`Level`]: Error / Warning / Note / Help.
//! - [`DiagnosticCode`]: the closed set of stable bracketed codes.
//! - [`Diagnostic`]: one report - level, message, position, optional
//!   code, optional enclosing function, attached notes and helps.
//! - [`Handler`]: the collecting sink shared across phases. Phases never
//!   abort on user error; they emit and continue.
//! - [`DiagnosticBuilder`]: fluent construction.
//!
//! Rendering follows the fixed surface format
//! `file:line:column: severity: [CODE] message`, one extra
//! `file:line:column: note: ...` line per note.
//!
//! # Examples
//!
//! ```
//! use lppc_util::diagnostic::{DiagnosticBuilder, DiagnosticCode, Handler};
//! use lppc_util::Span;
//!
//! let handler = Handler::new();
//! DiagnosticBuilder::error("Division by zero detected")
//!     .code(DiagnosticCode::DIV_BY_ZERO)
//!     .span(Span::new(2, 18))
//!     .function("g")
//!     .note("Right operand can be zero")
//!     .emit(&handler);
//!
//! assert_eq!(handler.error_count(), 1);
//! ```

mod builder;
mod codes;

pub use builder::DiagnosticBuilder;
pub use codes::DiagnosticCode;

use std::cell::RefCell;
use std::fmt;

use crate::span::Span;

/// Diagnostic severity level.
///
/// # Examples
///
/// ```
/// use lppc_util::diagnostic::Level;
///
/// assert_eq!(format!("{}", Level::Error), "error");
/// assert_eq!(format!("{}", Level::Warning), "warning");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// A suggestion for fixing an issue.
    Help,
    /// Additional information about a diagnostic.
    Note,
    /// A warning that doesn't prevent transpilation.
    Warning,
    /// An error that aborts the pipeline at the driver boundary.
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
            Level::Help => write!(f, "help"),
        }
    }
}

/// A diagnostic message with severity and location.
///
/// # Examples
///
/// ```
/// use lppc_util::diagnostic::{Diagnostic, Level};
/// use lppc_util::Span;
///
/// let diag = Diagnostic::error("unexpected token", Span::DUMMY);
/// assert_eq!(diag.level, Level::Error);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Diagnostic severity level.
    pub level: Level,
    /// Main diagnostic message.
    pub message: String,
    /// Source location.
    pub span: Span,
    /// Optional stable diagnostic code.
    pub code: Option<DiagnosticCode>,
    /// Enclosing function, when known.
    pub function: Option<String>,
    /// Additional notes for context.
    pub notes: Vec<String>,
    /// Help suggestions for fixing the issue.
    pub helps: Vec<String>,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            message: message.into(),
            span,
            code: None,
            function: None,
            notes: Vec::new(),
            helps: Vec::new(),
        }
    }

    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, message, span)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Warning, message, span)
    }

    /// Set the diagnostic code.
    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Record the enclosing function.
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Add a note to the diagnostic.
    ///
    /// # Examples
    ///
    /// ```
    /// use lppc_util::diagnostic::Diagnostic;
    /// use lppc_util::Span;
    ///
    /// let diag = Diagnostic::error("type mismatch", Span::DUMMY)
    ///     .with_note("expected `int`")
    ///     .with_note("found `string`");
    /// assert_eq!(diag.notes.len(), 2);
    /// ```
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Add a help suggestion.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.helps.push(help.into());
        self
    }

    /// Render in the surface format, one line per note.
    ///
    /// Format: `file:line:column: severity: [CODE] message in function 'f'`
    /// followed by `file:line:column: note: ...` lines.
    ///
    /// # Examples
    ///
    /// ```
    /// use lppc_util::diagnostic::{Diagnostic, DiagnosticCode};
    /// use lppc_util::Span;
    ///
    /// let diag = Diagnostic::error("Division by zero detected", Span::new(2, 18))
    ///     .with_code(DiagnosticCode::DIV_BY_ZERO)
    ///     .with_function("g");
    /// assert_eq!(
    ///     diag.render("main.l"),
    ///     "main.l:2:18: error: [DIV-BY-ZERO] Division by zero detected in function 'g'"
    /// );
    /// ```
    pub fn render(&self, file: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{}:{}:{}: {}: ",
            file, self.span.line, self.span.column, self.level
        ));
        if let Some(code) = self.code {
            out.push_str(&format!("[{}] ", code));
        }
        out.push_str(&self.message);
        if let Some(func) = &self.function {
            out.push_str(&format!(" in function '{}'", func));
        }
        for note in &self.notes {
            out.push_str(&format!(
                "\n{}:{}:{}: note: {}",
                file, self.span.line, self.span.column, note
            ));
        }
        for help in &self.helps {
            out.push_str(&format!(
                "\n{}:{}:{}: help: {}",
                file, self.span.line, self.span.column, help
            ));
        }
        out
    }
}

/// Handler for collecting and reporting diagnostics.
///
/// The `Handler` is the single sink shared by lexer, parser, resolver and
/// analyzer for one compilation. Interior mutability keeps the emitting
/// side `&self` so a phase holding the AST immutably can still report.
///
/// Diagnostics keep their emission order, which phases arrange to be
/// source order; the driver relies on that for deterministic output.
///
/// # Examples
///
/// ```
/// use lppc_util::diagnostic::{Diagnostic, Handler};
/// use lppc_util::Span;
///
/// let handler = Handler::new();
/// handler.emit_diagnostic(Diagnostic::error("unexpected token", Span::DUMMY));
///
/// assert!(handler.has_errors());
/// assert_eq!(handler.error_count(), 1);
/// ```
pub struct Handler {
    /// Collected diagnostics.
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create a new handler.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Emit a pre-built diagnostic.
    pub fn emit_diagnostic(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Create a diagnostic builder for an error at `span`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lppc_util::diagnostic::{DiagnosticCode, Handler};
    /// use lppc_util::Span;
    ///
    /// let handler = Handler::new();
    /// handler
    ///     .build_error(Span::DUMMY, "Expected expression")
    ///     .code(DiagnosticCode::SYNTAX)
    ///     .emit(&handler);
    /// assert!(handler.has_errors());
    /// ```
    pub fn build_error(&self, span: Span, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::error(message).span(span)
    }

    /// Create a diagnostic builder for a warning at `span`.
    pub fn build_warning(&self, span: Span, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::warning(message).span(span)
    }

    /// Check if any errors have been reported.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Warning)
            .count()
    }

    /// Get all diagnostics, in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Clear all diagnostics.
    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_display() {
        assert_eq!(format!("{}", Level::Error), "error");
        assert_eq!(format!("{}", Level::Warning), "warning");
        assert_eq!(format!("{}", Level::Note), "note");
        assert_eq!(format!("{}", Level::Help), "help");
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Error > Level::Warning);
        assert!(Level::Warning > Level::Note);
    }

    #[test]
    fn test_diagnostic_error() {
        let diag = Diagnostic::error("error message", Span::DUMMY);
        assert_eq!(diag.level, Level::Error);
        assert_eq!(diag.message, "error message");
    }

    #[test]
    fn test_diagnostic_with_code() {
        let diag =
            Diagnostic::error("test", Span::DUMMY).with_code(DiagnosticCode::UNINIT_READ);
        assert_eq!(diag.code, Some(DiagnosticCode::UNINIT_READ));
    }

    #[test]
    fn test_diagnostic_with_note() {
        let diag = Diagnostic::error("test", Span::DUMMY)
            .with_note("note 1")
            .with_note("note 2");
        assert_eq!(diag.notes, vec!["note 1", "note 2"]);
    }

    #[test]
    fn test_render_basic() {
        let diag = Diagnostic::warning("Dead code detected", Span::new(9, 5))
            .with_code(DiagnosticCode::DEAD_CODE);
        assert_eq!(
            diag.render("x.l"),
            "x.l:9:5: warning: [DEAD-CODE] Dead code detected"
        );
    }

    #[test]
    fn test_render_with_function_and_notes() {
        let diag = Diagnostic::error("Use of uninitialized variable: 'x'", Span::new(2, 12))
            .with_code(DiagnosticCode::UNINIT_READ)
            .with_function("f")
            .with_note("Variable declared but never assigned a value");
        let rendered = diag.render("main.l");
        assert!(rendered
            .starts_with("main.l:2:12: error: [UNINIT-READ] Use of uninitialized variable: 'x' in function 'f'"));
        assert!(rendered.ends_with("main.l:2:12: note: Variable declared but never assigned a value"));
    }

    #[test]
    fn test_render_without_code() {
        let diag = Diagnostic::error("plain", Span::new(1, 1));
        assert_eq!(diag.render("a.l"), "a.l:1:1: error: plain");
    }

    #[test]
    fn test_handler_counts() {
        let handler = Handler::new();
        assert!(!handler.has_errors());
        handler.emit_diagnostic(Diagnostic::error("e", Span::DUMMY));
        handler.emit_diagnostic(Diagnostic::warning("w", Span::DUMMY));
        assert_eq!(handler.error_count(), 1);
        assert_eq!(handler.warning_count(), 1);
        assert!(handler.has_errors());
    }

    #[test]
    fn test_handler_clear() {
        let handler = Handler::new();
        handler.emit_diagnostic(Diagnostic::error("e", Span::DUMMY));
        handler.clear();
        assert!(!handler.has_errors());
        assert!(handler.diagnostics().is_empty());
    }

    #[test]
    fn test_handler_preserves_order() {
        let handler = Handler::new();
        handler.emit_diagnostic(Diagnostic::error("first", Span::new(1, 1)));
        handler.emit_diagnostic(Diagnostic::warning("second", Span::new(2, 1)));
        let diags = handler.diagnostics();
        assert_eq!(diags[0].message, "first");
        assert_eq!(diags[1].message, "second");
    }

    #[test]
    fn test_handler_build_error() {
        let handler = Handler::new();
        handler
            .build_error(Span::new(4, 2), "test error")
            .code(DiagnosticCode::SYNTAX)
            .emit(&handler);

        let diags = handler.diagnostics();
        assert_eq!(diags[0].code, Some(DiagnosticCode::SYNTAX));
        assert_eq!(diags[0].span, Span::new(4, 2));
    }
}
