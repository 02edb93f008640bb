//! lppc-sem - Static Analyzer (Flow Analysis)
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! The analyzer is intraprocedural: per function it builds a
//! control-flow graph, runs a monotone dataflow analysis to a fixpoint
//! over a symbolic abstract domain, and reports what it can prove.
//!
//! ```text
//! AST ──▶ [CFG construction] ──▶ [worklist fixpoint] ──▶ [checks] ──▶ diagnostics
//! ```
//!
//! ============================================================================
//! THE DOMAIN
//! ============================================================================
//!
//! Each variable maps to a symbolic value: an initialization state
//! (Uninitialized / Initialized / NullPtr / NonNull / Freed / Unknown),
//! nullability bits, an optional known constant, and a taint flag. The
//! merge operator is a pointwise join - disagreement coarsens to
//! Unknown, `may_be_null` ORs, constants drop on conflict - so the
//! lattice has finite height and the worklist terminates in at most
//! `|CFG| x height` iterations.
//!
//! ============================================================================
//! CHECKS
//! ============================================================================
//!
//! | Check              | Code            | Severity | Trigger                                  |
//! |--------------------|-----------------|----------|------------------------------------------|
//! | Null dereference   | NULL-DEREF      | Error    | use of a definitely-null variable        |
//! | Null dereference   | NULL-DEREF      | Warning  | use of a may-be-null variable            |
//! | Uninitialized read | UNINIT-READ     | Error    | use of a declared-but-unassigned name    |
//! | Division by zero   | DIV-BY-ZERO     | Error    | `/` with provably-zero right operand     |
//! | Integer overflow   | INT-OVERFLOW    | Warning  | constant `+`/`*` beyond 32-bit bounds    |
//! | Memory leak        | MEM-LEAK        | Warning  | allocation never freed at function exit  |
//! | Dead code          | DEAD-CODE       | Warning  | CFG statement node unreachable           |
//! | Buffer overflow    | BUFFER-OVERFLOW | Error    | constant index past a fixed array bound  |
//! | Paradigm           | PARADIGM-*      | varies   | construct vs. declared paradigm          |
//!
//! The analyzer is conservative by design: silent on unknown, noisy
//! only on provable violations. It never aborts; results are
//! deterministic given the same AST (functions in program order, nodes
//! in id order).

pub mod analysis;
pub mod cfg;
pub mod paradigm;
pub mod symbolic;

#[cfg(test)]
mod edge_cases;

pub use analysis::StaticAnalyzer;
pub use cfg::{Cfg, CfgNode, CfgNodeKind};
pub use symbolic::{SymbolicValue, VarState};

use lppc_par::ast::Program;
use lppc_util::{Diagnostic, Handler};

/// Analyze a program and return the diagnostics produced.
///
/// Convenience wrapper when no shared handler is in play.
///
/// # Examples
///
/// ```
/// use lppc_lex::Lexer;
/// use lppc_par::parse;
/// use lppc_sem::analyze;
///
/// let (program, _) = parse(Lexer::tokenize(
///     "#pragma paradigm hybrid\nfn f() -> int { let x: int; return x; }",
/// ));
/// let diagnostics = analyze(&program);
/// assert!(diagnostics.iter().any(|d| d.message.contains("uninitialized")));
/// ```
pub fn analyze(program: &Program) -> Vec<Diagnostic> {
    let handler = Handler::new();
    StaticAnalyzer::new(&handler).analyze(program);
    handler.diagnostics()
}
