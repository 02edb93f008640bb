//! Paradigm conformance checks.
//!
//! The `#pragma paradigm` directive is informational for analysis, not
//! a type-system feature; conformance reporting is what it buys:
//!
//! - `functional`: classes and mutable bindings are violations
//!   (`PARADIGM-FUNC`, Error).
//! - `imperative`: classes are discouraged (`PARADIGM-IMP`, Warning).
//! - `golfed`: long names draw style notes (`PARADIGM-GOLF`, Note).
//! - `hybrid` and `oop` accept everything.

use lppc_par::ast::{ParadigmMode, Program, Stmt};
use lppc_util::diagnostic::{DiagnosticBuilder, DiagnosticCode};
use lppc_util::{Handler, Level};

/// Names longer than this draw golfed-mode style notes.
const GOLFED_NAME_LIMIT: usize = 8;

/// Check a program against its declared paradigm.
pub fn check(program: &Program, handler: &Handler) {
    match program.paradigm {
        ParadigmMode::Functional => check_functional(program, handler),
        ParadigmMode::Imperative => check_imperative(program, handler),
        ParadigmMode::Golfed => check_golfed(program, handler),
        ParadigmMode::Hybrid | ParadigmMode::Oop => {}
    }
}

fn check_functional(program: &Program, handler: &Handler) {
    for class in &program.classes {
        handler
            .build_error(
                class.span,
                format!(
                    "Class '{}' is not allowed in functional paradigm",
                    class.name
                ),
            )
            .code(DiagnosticCode::PARADIGM_FUNC)
            .note("Functional mode forbids classes and inheritance")
            .emit(handler);
    }

    for func in &program.functions {
        for stmt in &func.body {
            check_functional_stmt(stmt, &func.name, handler);
        }
    }
}

fn check_functional_stmt(stmt: &Stmt, function: &str, handler: &Handler) {
    match stmt {
        Stmt::VarDecl(decl) if decl.ty.starts_with("mut ") => {
            handler
                .build_error(
                    decl.span,
                    format!(
                        "Mutable binding '{}' is not allowed in functional paradigm",
                        decl.name
                    ),
                )
                .code(DiagnosticCode::PARADIGM_FUNC)
                .function(function)
                .note("Functional mode requires immutable bindings")
                .emit(handler);
        }
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => {
            for s in then_branch.iter().chain(else_branch) {
                check_functional_stmt(s, function, handler);
            }
        }
        Stmt::While { body, .. }
        | Stmt::For { body, .. }
        | Stmt::ForIn { body, .. }
        | Stmt::DoWhile { body, .. } => {
            for s in body {
                check_functional_stmt(s, function, handler);
            }
        }
        _ => {}
    }
}

fn check_imperative(program: &Program, handler: &Handler) {
    for class in &program.classes {
        handler
            .build_warning(
                class.span,
                format!(
                    "Class '{}' is discouraged in imperative paradigm",
                    class.name
                ),
            )
            .code(DiagnosticCode::PARADIGM_IMP)
            .note("Prefer plain functions and explicit control flow")
            .emit(handler);
    }
}

fn check_golfed(program: &Program, handler: &Handler) {
    for func in &program.functions {
        if func.name.len() > GOLFED_NAME_LIMIT {
            DiagnosticBuilder::new(
                Level::Note,
                format!("Function name '{}' is long for golfed mode", func.name),
            )
            .span(func.span)
            .code(DiagnosticCode::PARADIGM_GOLF)
            .emit(handler);
        }
    }
}
