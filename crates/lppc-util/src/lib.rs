//! lppc-util - Shared infrastructure for the L++ compiler.
//!
//! This crate holds the pieces every phase of the pipeline needs:
//!
//! - [`span`]: source locations (line/column pairs attached to tokens,
//!   AST nodes and diagnostics).
//! - [`diagnostic`]: the diagnostic model (levels, stable codes, the
//!   collecting [`Handler`] and the fluent [`DiagnosticBuilder`]).
//! - [`modules`]: the import resolver and module dependency graph with
//!   cycle detection.
//!
//! Design rule shared by all of it: no component in the core pipeline
//! aborts on user error. Phases push [`Diagnostic`]s into a [`Handler`]
//! and keep going; only the driver looks at the accumulated set and
//! decides whether to stop.
//!
//! # Examples
//!
//! ```
//! use lppc_util::{Handler, Span};
//! use lppc_util::diagnostic::DiagnosticCode;
//!
//! let handler = Handler::new();
//! handler
//!     .build_error(Span::new(3, 7), "use of uninitialized variable: 'x'")
//!     .code(DiagnosticCode::UNINIT_READ)
//!     .emit(&handler);
//!
//! assert!(handler.has_errors());
//! ```

pub mod diagnostic;
pub mod modules;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, Level};
pub use modules::{FileProbe, FsProbe, ModuleGraph, ModuleResolver, ResolveError};
pub use span::Span;
