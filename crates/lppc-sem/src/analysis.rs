//! The intraprocedural flow analysis.
//!
//! Per function: build the CFG, run a worklist fixpoint over the
//! symbolic domain, then walk the (reachable) nodes in id order and
//! check each statement's expressions against the state flowing into
//! its node. Reporting order therefore tracks source order, which keeps
//! diagnostics deterministic across runs.
//!
//! The analyzer is conservative: silent on unknown, noisy only on
//! provable violations. It never aborts; everything lands in the
//! shared diagnostic handler.

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use lppc_par::ast::{ClassDecl, Expr, Function, Program, Stmt, VarDecl};
use lppc_util::diagnostic::DiagnosticCode;
use lppc_util::{Handler, Span};
use rustc_hash::FxHashMap;

use crate::cfg::{Cfg, CfgNodeKind};
use crate::paradigm;
use crate::symbolic::{SymbolicValue, VarState};

/// Functions treated as allocation routines for leak reporting.
const ALLOC_FNS: &[&str] = &["alloc", "malloc", "allocate"];
/// Functions treated as release routines.
const FREE_FNS: &[&str] = &["free", "release", "dealloc"];

type Env = IndexMap<String, SymbolicValue>;

/// The static analyzer. One instance per compilation; state below is
/// reset per function.
pub struct StaticAnalyzer<'a> {
    handler: &'a Handler,
    current_function: String,
    /// Fixed sizes of arrays declared in the current function.
    array_sizes: FxHashMap<String, usize>,
    /// Names bound to an allocation call, with the allocation site.
    allocated: IndexMap<String, Span>,
    /// Names passed to a release routine.
    freed: IndexSet<String>,
}

impl<'a> StaticAnalyzer<'a> {
    pub fn new(handler: &'a Handler) -> Self {
        Self {
            handler,
            current_function: String::new(),
            array_sizes: FxHashMap::default(),
            allocated: IndexMap::new(),
            freed: IndexSet::new(),
        }
    }

    /// Analyze a whole program: paradigm conformance, then every
    /// function and method.
    pub fn analyze(&mut self, program: &Program) {
        paradigm::check(program, self.handler);

        for func in &program.functions {
            self.analyze_function(func);
        }
        for class in &program.classes {
            self.analyze_class(class);
        }
    }

    fn analyze_class(&mut self, class: &ClassDecl) {
        if let Some(ctor) = &class.constructor {
            self.analyze_function(ctor);
        }
        for method in &class.methods {
            self.analyze_function(method);
        }
    }

    /// CFG, fixpoint, then checks.
    pub fn analyze_function(&mut self, func: &Function) {
        self.current_function = func.name.clone();
        self.array_sizes.clear();
        self.allocated.clear();
        self.freed.clear();

        let mut cfg = Cfg::build(&func.body);

        // Parameters enter initialized.
        let mut initial = Env::new();
        for param in &func.params {
            initial.insert(param.name.clone(), SymbolicValue::initialized());
        }
        if let Some(rest) = &func.rest_param {
            initial.insert(rest.clone(), SymbolicValue::initialized());
        }

        run_dataflow(&mut cfg, initial);

        let reachable = cfg.reachable();

        for node in &cfg.nodes {
            if !reachable[node.id] {
                if node.kind == CfgNodeKind::Statement {
                    if let Some(stmt) = node.stmt {
                        self.report_warning(
                            DiagnosticCode::DEAD_CODE,
                            "Dead code detected: statement is unreachable",
                            stmt_span(stmt),
                            &[],
                        );
                    }
                }
                continue;
            }

            if let Some(cond) = node.condition {
                self.check_expr(cond, &node.state_in);
            }
            match node.kind {
                CfgNodeKind::Statement => {
                    if let Some(stmt) = node.stmt {
                        self.check_stmt(stmt, &node.state_in);
                    }
                }
                CfgNodeKind::Branch => {
                    // Switch scrutinee, case values and guards have no
                    // node of their own.
                    if let Some(Stmt::Switch { condition, cases }) = node.stmt {
                        self.check_expr(condition, &node.state_in);
                        for case in cases {
                            if let Some(value) = &case.value {
                                self.check_expr(value, &node.state_in);
                            }
                            if let Some(guard) = &case.guard {
                                self.check_expr(guard, &node.state_in);
                            }
                        }
                    }
                }
                CfgNodeKind::LoopHead => match node.stmt {
                    Some(Stmt::ForIn { iterable, .. }) => {
                        self.check_expr(iterable, &node.state_in);
                    }
                    Some(Stmt::For {
                        increment: Some(inc),
                        ..
                    }) => {
                        self.check_expr(inc, &node.state_in);
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        self.check_memory_leaks();
    }

    // ── Statement checks ───────────────────────────────────────────────

    fn check_stmt(&mut self, stmt: &Stmt, env: &Env) {
        match stmt {
            Stmt::VarDecl(decl) => self.check_var_decl(decl, env),
            Stmt::QuantumVarDecl { states, .. } => {
                for state in states {
                    self.check_expr(state, env);
                }
            }
            Stmt::Assignment { name, value, span } => {
                self.check_expr(value, env);
                if let Expr::Call { function, .. } = value {
                    if ALLOC_FNS.contains(&function.as_str()) {
                        self.allocated.insert(name.clone(), *span);
                    }
                }
            }
            Stmt::Destructuring { source, .. } => self.check_expr(source, env),
            Stmt::Return(Some(value)) => self.check_expr(value, env),
            Stmt::Expr(expr) => {
                self.check_expr(expr, env);
                // free(p) marks p released.
                if let Expr::Call {
                    function,
                    arguments,
                } = expr
                {
                    if FREE_FNS.contains(&function.as_str()) {
                        for arg in arguments {
                            if let Expr::Identifier { name, .. } = arg {
                                self.freed.insert(name.clone());
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn check_var_decl(&mut self, decl: &VarDecl, env: &Env) {
        if let Some(init) = &decl.initializer {
            self.check_expr(init, env);

            if let Expr::Call { function, .. } = init {
                if ALLOC_FNS.contains(&function.as_str()) {
                    self.allocated.insert(decl.name.clone(), decl.span);
                }
            }
        }
        if decl.is_array_type {
            if let Some(size) = decl.array_size {
                self.array_sizes.insert(decl.name.clone(), size);
            }
        }
    }

    // ── Expression checks ──────────────────────────────────────────────

    fn check_expr(&mut self, expr: &Expr, env: &Env) {
        match expr {
            Expr::Identifier { name, span } => {
                self.check_identifier_use(name, *span, env);
            }

            Expr::Binary {
                left,
                op,
                right,
                span,
            } => {
                self.check_expr(left, env);
                self.check_expr(right, env);
                if op == "/" {
                    self.check_division(right, *span, env);
                }
                if op == "+" || op == "*" {
                    self.check_overflow(op, left, right, *span, env);
                }
            }

            Expr::Index {
                object,
                index,
                is_dot,
                span,
                ..
            } => {
                self.check_expr(object, env);
                self.check_expr(index, env);
                if !is_dot {
                    self.check_buffer_overflow(object, index, *span, env);
                }
            }

            Expr::Lambda { params, body, .. } => {
                // Lambda parameters shadow outer bindings.
                let mut inner = env.clone();
                for param in params {
                    inner.insert(param.name.clone(), SymbolicValue::initialized());
                }
                self.check_expr(body, &inner);
            }

            Expr::ListComprehension {
                expr,
                variable,
                range,
                predicates,
            } => {
                self.check_expr(range, env);
                let mut inner = env.clone();
                inner.insert(variable.clone(), SymbolicValue::initialized());
                for pred in predicates {
                    self.check_expr(pred, &inner);
                }
                self.check_expr(expr, &inner);
            }

            Expr::TemplateLiteral { interpolations, .. } => {
                for interp in interpolations {
                    self.check_expr(interp, env);
                }
            }
            Expr::Unary { operand, .. } | Expr::Postfix { operand, .. } => {
                self.check_expr(operand, env);
            }
            Expr::Range { start, end, step } => {
                self.check_expr(start, env);
                self.check_expr(end, env);
                if let Some(step) = step {
                    self.check_expr(step, env);
                }
            }
            Expr::Map { iterable, func } => {
                self.check_expr(iterable, env);
                self.check_expr(func, env);
            }
            Expr::Filter {
                iterable,
                predicate,
            } => {
                self.check_expr(iterable, env);
                self.check_expr(predicate, env);
            }
            Expr::Reduce {
                iterable,
                func,
                initial,
            } => {
                self.check_expr(iterable, env);
                self.check_expr(func, env);
                if let Some(initial) = initial {
                    self.check_expr(initial, env);
                }
            }
            Expr::IterateWhile {
                start,
                condition,
                step_fn,
            }
            | Expr::IterateStep {
                start,
                condition,
                step_fn,
            } => {
                self.check_expr(start, env);
                self.check_expr(condition, env);
                self.check_expr(step_fn, env);
            }
            Expr::AutoIterate { start, limit, .. } => {
                self.check_expr(start, env);
                self.check_expr(limit, env);
            }
            Expr::Call { arguments, .. } | Expr::QuantumMethodCall { args: arguments, .. } => {
                for arg in arguments {
                    self.check_expr(arg, env);
                }
            }
            Expr::TernaryIf {
                condition,
                then_expr,
                else_expr,
            } => {
                self.check_expr(condition, env);
                self.check_expr(then_expr, env);
                if let Some(else_expr) = else_expr {
                    self.check_expr(else_expr, env);
                }
            }
            Expr::Pipeline { initial, stages } => {
                self.check_expr(initial, env);
                for stage in stages {
                    self.check_expr(stage, env);
                }
            }
            Expr::Composition { functions } => {
                for func in functions {
                    self.check_expr(func, env);
                }
            }
            Expr::Array(items) | Expr::Tuple(items) => {
                for item in items {
                    self.check_expr(item, env);
                }
            }
            Expr::Spread(inner)
            | Expr::Await(inner)
            | Expr::Throw(inner)
            | Expr::TypeOf(inner) => self.check_expr(inner, env),
            Expr::Object(props) => {
                for (_, value) in props {
                    self.check_expr(value, env);
                }
            }
            Expr::Match { scrutinee, cases } => {
                self.check_expr(scrutinee, env);
                for (pattern, result) in cases {
                    self.check_expr(pattern, env);
                    self.check_expr(result, env);
                }
            }
            Expr::Cast { expr, .. } => self.check_expr(expr, env),
            Expr::InstanceOf { expr, .. } => self.check_expr(expr, env),
            Expr::Yield(Some(inner)) => self.check_expr(inner, env),

            _ => {}
        }
    }

    fn check_identifier_use(&mut self, name: &str, span: Span, env: &Env) {
        let Some(value) = env.get(name) else {
            return;
        };

        if value.definitely_null {
            self.report_error(
                DiagnosticCode::NULL_DEREF,
                &format!("Null pointer dereference: '{name}' is definitely null"),
                span,
                &["Variable was set to null earlier"],
            );
        } else if value.may_be_null {
            self.report_warning(
                DiagnosticCode::NULL_DEREF,
                &format!("Potential null pointer dereference: '{name}' may be null"),
                span,
                &["Consider checking for null before use"],
            );
        }

        if value.state == VarState::Uninitialized {
            self.report_error(
                DiagnosticCode::UNINIT_READ,
                &format!("Use of uninitialized variable: '{name}'"),
                span,
                &["Variable declared but never assigned a value"],
            );
        }
    }

    /// Division by zero: report only when the right operand provably
    /// evaluates to zero; unknown stays silent.
    fn check_division(&mut self, right: &Expr, span: Span, env: &Env) {
        if eval_expr(right, env).constant_value == Some(0) {
            self.report_error(
                DiagnosticCode::DIV_BY_ZERO,
                "Division by zero detected",
                span,
                &["Right operand can be zero"],
            );
        }
    }

    /// Constant `+`/`*` exceeding 32-bit bounds.
    fn check_overflow(&mut self, op: &str, left: &Expr, right: &Expr, span: Span, env: &Env) {
        let (Some(l), Some(r)) = (
            eval_expr(left, env).constant_value,
            eval_expr(right, env).constant_value,
        ) else {
            return;
        };

        let result = if op == "+" {
            l.checked_add(r)
        } else {
            l.checked_mul(r)
        };

        let overflows = match result {
            Some(v) => v > i64::from(i32::MAX) || v < i64::from(i32::MIN),
            None => true,
        };
        if overflows {
            self.report_warning(
                DiagnosticCode::INT_OVERFLOW,
                "Integer overflow in arithmetic operation",
                span,
                &["Result exceeds 32-bit integer bounds"],
            );
        }
    }

    /// Constant index at or beyond a known fixed array size.
    fn check_buffer_overflow(&mut self, object: &Expr, index: &Expr, span: Span, env: &Env) {
        let Expr::Identifier { name, .. } = object else {
            return;
        };
        let Some(&size) = self.array_sizes.get(name) else {
            return;
        };
        let Some(idx) = eval_expr(index, env).constant_value else {
            return;
        };
        if idx < 0 || idx as usize >= size {
            self.report_error(
                DiagnosticCode::BUFFER_OVERFLOW,
                &format!("Index {idx} is out of bounds for '{name}' of size {size}"),
                span,
                &["Accessing past a fixed array bound is undefined behavior"],
            );
        }
    }

    fn check_memory_leaks(&mut self) {
        let leaks: Vec<(String, Span)> = self
            .allocated
            .iter()
            .filter(|(name, _)| !self.freed.contains(*name))
            .map(|(name, span)| (name.clone(), *span))
            .collect();
        for (name, span) in leaks {
            self.report_warning(
                DiagnosticCode::MEM_LEAK,
                "Potential memory leak: allocated memory never freed",
                span,
                &[&format!("Variable: {name}")],
            );
        }
    }

    // ── Reporting ──────────────────────────────────────────────────────

    fn report_error(&self, code: DiagnosticCode, message: &str, span: Span, notes: &[&str]) {
        let mut builder = self
            .handler
            .build_error(span, message)
            .code(code)
            .function(&self.current_function);
        for note in notes {
            builder = builder.note(*note);
        }
        builder.emit(self.handler);
    }

    fn report_warning(&self, code: DiagnosticCode, message: &str, span: Span, notes: &[&str]) {
        let mut builder = self
            .handler
            .build_warning(span, message)
            .code(code)
            .function(&self.current_function);
        for note in notes {
            builder = builder.note(*note);
        }
        builder.emit(self.handler);
    }
}

// ── Dataflow ───────────────────────────────────────────────────────────

/// Worklist fixpoint: merge predecessor outputs, apply the transfer
/// function, requeue successors on change. Terminates because the
/// lattice has finite height and the join is monotone.
fn run_dataflow(cfg: &mut Cfg<'_>, initial: Env) {
    cfg.nodes[cfg.entry].state_out = initial;

    let mut worklist: VecDeque<usize> = (0..cfg.nodes.len()).collect();
    let mut queued: Vec<bool> = vec![true; cfg.nodes.len()];

    while let Some(id) = worklist.pop_front() {
        queued[id] = false;

        // Merge incoming states.
        let preds = cfg.nodes[id].preds.clone();
        if !preds.is_empty() {
            let mut merged = Env::new();
            for pred in preds {
                for (name, value) in cfg.nodes[pred].state_out.clone() {
                    match merged.get_mut(&name) {
                        Some(existing) => *existing = existing.join(&value),
                        None => {
                            merged.insert(name, value);
                        }
                    }
                }
            }
            cfg.nodes[id].state_in = merged;
        }

        if cfg.nodes[id].kind == CfgNodeKind::Entry {
            // Entry keeps its seeded parameter state.
            continue;
        }

        // Transfer. Loop heads carry their statement too, which is how
        // a for-in loop variable enters the state.
        let mut out = cfg.nodes[id].state_in.clone();
        if let Some(stmt) = cfg.nodes[id].stmt {
            transfer(stmt, &mut out);
        }

        if out != cfg.nodes[id].state_out {
            cfg.nodes[id].state_out = out;
            for succ in cfg.nodes[id].succs.clone() {
                if !queued[succ] {
                    queued[succ] = true;
                    worklist.push_back(succ);
                }
            }
        }
    }
}

/// Statement effect on the symbolic state.
fn transfer(stmt: &Stmt, env: &mut Env) {
    match stmt {
        Stmt::VarDecl(decl) => {
            let value = match &decl.initializer {
                Some(init) => value_of_initializer(init, env),
                None => SymbolicValue::uninitialized(),
            };
            env.insert(decl.name.clone(), value);
        }
        Stmt::QuantumVarDecl { name, .. } => {
            env.insert(name.clone(), SymbolicValue::initialized());
        }
        Stmt::Assignment { name, value, .. } => {
            env.insert(name.clone(), value_of_initializer(value, env));
        }
        Stmt::Destructuring { targets, .. } => {
            for target in targets {
                env.insert(target.clone(), SymbolicValue::initialized());
            }
        }
        Stmt::ForIn { variable, .. } => {
            env.insert(variable.clone(), SymbolicValue::initialized());
        }
        _ => {}
    }
}

/// State a binding takes from its right-hand side. Assigning from an
/// uninitialized or unknown source still initializes the binding; only
/// nullness and constants carry over.
fn value_of_initializer(init: &Expr, env: &Env) -> SymbolicValue {
    let evaluated = eval_expr(init, env);
    match evaluated.state {
        VarState::NullPtr | VarState::Initialized => evaluated,
        _ => SymbolicValue::initialized(),
    }
}

/// Best-effort constant evaluation over the symbolic state.
///
/// `x - x` folds to zero even when `x` itself is unknown; that is what
/// makes `n / (n - n)` a provable division by zero.
fn eval_expr(expr: &Expr, env: &Env) -> SymbolicValue {
    match expr {
        Expr::Number(n) => SymbolicValue::constant(*n as i64),
        Expr::Null => SymbolicValue::null(),
        Expr::Str(_) | Expr::Bool(_) => SymbolicValue::initialized(),
        Expr::Identifier { name, .. } => env.get(name).cloned().unwrap_or_default(),
        Expr::Unary { op, operand } if op == "-" => {
            let inner = eval_expr(operand, env);
            SymbolicValue {
                constant_value: inner.constant_value.map(|v| -v),
                ..inner
            }
        }
        Expr::Binary {
            left, op, right, ..
        } => {
            // Self-cancelling subtraction is provably zero.
            if op == "-" {
                if let (
                    Expr::Identifier { name: a, .. },
                    Expr::Identifier { name: b, .. },
                ) = (&**left, &**right)
                {
                    if a == b {
                        return SymbolicValue::constant(0);
                    }
                }
            }

            let l = eval_expr(left, env).constant_value;
            let r = eval_expr(right, env).constant_value;
            let folded = match (l, r, op.as_str()) {
                (Some(a), Some(b), "+") => a.checked_add(b),
                (Some(a), Some(b), "-") => a.checked_sub(b),
                (Some(a), Some(b), "*") => a.checked_mul(b),
                (Some(a), Some(b), "/") if b != 0 => Some(a / b),
                (Some(a), Some(b), "%") if b != 0 => Some(a % b),
                _ => None,
            };
            match folded {
                Some(v) => SymbolicValue::constant(v),
                None => SymbolicValue::initialized(),
            }
        }
        Expr::Cast { expr, .. } => eval_expr(expr, env),
        _ => SymbolicValue::default(),
    }
}

/// Best-available position for a statement, for diagnostics that point
/// at whole statements.
fn stmt_span(stmt: &Stmt) -> Span {
    match stmt {
        Stmt::VarDecl(decl) => decl.span,
        Stmt::QuantumVarDecl { span, .. } => *span,
        Stmt::Assignment { span, .. } => *span,
        Stmt::Return(Some(expr)) | Stmt::Expr(expr) => expr.span(),
        _ => Span::DUMMY,
    }
}
