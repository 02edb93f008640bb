//! The C++ emitter.
//!
//! A single pass over the AST writing C++17 source text, with an
//! indentation counter for statement context and plain inline emission
//! for expressions. Constructs with no direct C++ spelling lower to
//! immediately-invoked lambdas (IIFEs): ranges, map/filter/reduce, the
//! iterate forms, list comprehensions, match, nullish coalescing and
//! optional chaining.
//!
//! Name uniquing for generated temporaries (`__comp_N`, `__match_N`,
//! rest-parameter aliases) uses per-instance counters.

use lppc_par::ast::{
    CaseClause, ClassDecl, DestructureKind, Expr, Function, InterfaceDecl, Program, Stmt,
    TypeDecl, VarDecl,
};

use crate::error::{EmitError, Result};
use crate::patterns::{pattern_macro, PATTERNS_HEADER};
use crate::preamble::PREAMBLE;
use crate::types::{convert_method_signature, map_operator, map_type};

/// The AST-to-C++ transpiler.
///
/// # Examples
///
/// ```
/// use lppc_lex::Lexer;
/// use lppc_par::parse;
/// use lppc_gen::Transpiler;
///
/// let (program, _) = parse(Lexer::tokenize(
///     "#pragma paradigm hybrid\nfn main() -> int { return 0; }",
/// ));
/// let cpp = Transpiler::new().transpile(&program).unwrap();
/// assert!(cpp.contains("int main() {"));
/// ```
pub struct Transpiler {
    out: String,
    indent_level: usize,
    lambda_counter: usize,
    match_counter: usize,
}

impl Transpiler {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            indent_level: 0,
            lambda_counter: 0,
            match_counter: 0,
        }
    }

    /// Emit the preamble plus the whole program.
    pub fn transpile(mut self, program: &Program) -> Result<String> {
        if let Some(name) = find_unexpanded_autopattern(program) {
            return Err(EmitError::UnexpandedAutoPattern(name.to_string()));
        }

        self.out.push_str(PREAMBLE);

        // Imports first
        for import in &program.imports {
            self.emit_stmt(import);
        }

        // Pattern classes pull in the companion macro header once.
        if program
            .classes
            .iter()
            .any(|c| c.design_pattern.is_some())
        {
            self.write_line(&format!("#include \"{PATTERNS_HEADER}\""));
            self.write_line("");
        }

        for ty in &program.types {
            self.emit_type_decl(ty);
            self.write_line("");
        }

        for enum_decl in &program.enums {
            self.emit_stmt(enum_decl);
            self.write_line("");
        }

        for iface in &program.interfaces {
            self.emit_interface(iface);
            self.write_line("");
        }

        for class in &program.classes {
            self.emit_class(class);
            self.write_line("");
        }

        for func in &program.functions {
            self.emit_function(func);
        }

        Ok(self.out)
    }

    // ── Output helpers ─────────────────────────────────────────────────

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn indent(&mut self) {
        for _ in 0..self.indent_level {
            self.out.push_str("    ");
        }
    }

    fn write_line(&mut self, line: &str) {
        self.indent();
        self.out.push_str(line);
        self.out.push('\n');
    }

    /// Emit an expression into a side buffer and return its text.
    fn capture_expr(&mut self, expr: &Expr) -> String {
        let start = self.out.len();
        self.emit_expr(expr);
        self.out.split_off(start)
    }

    // ── Expressions ────────────────────────────────────────────────────

    fn emit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Number(n) => self.push(&format_number(*n)),

            Expr::Str(s) => {
                let escaped = escape_string(s);
                self.push(&format!("\"{escaped}\""));
            }

            Expr::TemplateLiteral {
                strings,
                interpolations,
            } => {
                // `a ${x} b` => (std::string("a") + to-string(x) + std::string("b"))
                self.push("(");
                for (i, part) in strings.iter().enumerate() {
                    if i > 0 {
                        self.push(" + ");
                    }
                    let escaped = escape_string(part);
                    self.push(&format!("std::string(\"{escaped}\")"));

                    if i < interpolations.len() {
                        self.push(" + ([&]() { auto __val = ");
                        self.emit_expr(&interpolations[i]);
                        self.push("; if constexpr (std::is_arithmetic_v<decltype(__val)>) return std::to_string(__val); else return std::string(__val); })()");
                    }
                }
                self.push(")");
            }

            Expr::Bool(b) => self.push(if *b { "true" } else { "false" }),
            Expr::Null => self.push("nullptr"),
            Expr::Identifier { name, .. } => self.push(name),

            Expr::Binary {
                left, op, right, ..
            } => {
                // a ?? b: guarded on pointer-ness so non-pointers pass through.
                if op == "??" {
                    self.push("([&]() { auto __tmp = ");
                    self.emit_expr(left);
                    self.push("; if constexpr (std::is_pointer_v<decltype(__tmp)>) return __tmp != nullptr ? __tmp : ");
                    self.emit_expr(right);
                    self.push("; else return __tmp; })()");
                    return;
                }

                self.push("(");
                self.emit_expr(left);
                self.push(&format!(" {} ", map_operator(op)));
                self.emit_expr(right);
                self.push(")");
            }

            Expr::Unary { op, operand } => {
                self.push(map_operator(op));
                self.emit_expr(operand);
            }

            Expr::Postfix { operand, op } => {
                self.emit_expr(operand);
                self.push(op);
            }

            Expr::Call {
                function,
                arguments,
            } => {
                self.push(function);
                self.push("(");
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.emit_expr(arg);
                }
                self.push(")");
            }

            Expr::Lambda {
                params,
                body,
                rest_param,
                ..
            } => self.emit_lambda(params, body, rest_param.as_deref()),

            Expr::TernaryIf {
                condition,
                then_expr,
                else_expr,
            } => {
                let then_text = self.capture_expr(then_expr);
                self.push("(");
                self.emit_expr(condition);
                self.push(" ? ");
                self.push(&then_text);
                self.push(" : ");
                match else_expr {
                    Some(else_expr) => self.emit_expr(else_expr),
                    // No else arm: default-construct the then type.
                    None => self.push(&format!("decltype({then_text}){{}}")),
                }
                self.push(")");
            }

            Expr::Pipeline { initial, stages } => {
                // a |> f |> g  =>  g(f(a)), built outermost-first.
                for stage in stages.iter().rev() {
                    self.emit_expr(stage);
                    self.push("(");
                }
                self.emit_expr(initial);
                for _ in stages {
                    self.push(")");
                }
            }

            Expr::Composition { functions } => {
                // f . g . h  =>  [](auto __x) { return f(g(h(__x))); }
                self.push("[]( auto __x ) { return ");
                for func in functions {
                    self.emit_expr(func);
                    self.push("(");
                }
                self.push("__x");
                for _ in functions {
                    self.push(")");
                }
                self.push("; }");
            }

            Expr::Range { start, end, step } => {
                self.push("([&]() { std::vector<int> __range; int __start = ");
                self.emit_expr(start);
                self.push("; int __end = ");
                self.emit_expr(end);
                self.push("; int __step = ");
                match step {
                    Some(step) => self.emit_expr(step),
                    None => self.push("1"),
                }
                self.push("; if (__step > 0) { for (int i = __start; i <= __end; i += __step) __range.push_back(i); }");
                self.push(" else { for (int i = __start; i >= __end; i += __step) __range.push_back(i); }");
                self.push(" return __range; })()");
            }

            Expr::Map { iterable, func } => {
                self.push("([&]() { std::vector<decltype((");
                self.emit_expr(func);
                self.push(")(std::declval<std::decay_t<decltype(");
                self.emit_expr(iterable);
                self.push(")>::value_type>()))> __result; for (auto& __item : ");
                self.emit_expr(iterable);
                self.push(") { __result.push_back((");
                self.emit_expr(func);
                self.push(")(__item)); } return __result; })()");
            }

            Expr::Filter {
                iterable,
                predicate,
            } => {
                self.push("([&]() { std::remove_reference_t<decltype(");
                self.emit_expr(iterable);
                self.push(")> __result; for (auto& __item : ");
                self.emit_expr(iterable);
                self.push(") { if ((");
                self.emit_expr(predicate);
                self.push(")(__item)) { __result.push_back(__item); } } return __result; })()");
            }

            Expr::Reduce {
                iterable,
                func,
                initial,
            } => {
                self.push("([&]() { auto __acc = ");
                match initial {
                    Some(initial) => self.emit_expr(initial),
                    None => {
                        self.push("std::decay_t<decltype(");
                        self.emit_expr(iterable);
                        self.push(")>::value_type{}");
                    }
                }
                self.push("; for (auto& __item : ");
                self.emit_expr(iterable);
                self.push(") { __acc = (");
                self.emit_expr(func);
                self.push(")(__acc, __item); } return __acc; })()");
            }

            Expr::IterateWhile {
                start,
                condition,
                step_fn,
            } => {
                self.push("([&]() { std::vector<decltype(");
                self.emit_expr(start);
                self.push(")> __result; auto __current = ");
                self.emit_expr(start);
                self.push("; while ((");
                self.emit_expr(condition);
                self.push(")(__current)) { __result.push_back(__current); __current = (");
                self.emit_expr(step_fn);
                self.push(")(__current); } return __result; })()");
            }

            Expr::AutoIterate {
                start,
                limit,
                is_increment,
            } => {
                self.push("([&]() { std::vector<int> __result; int __current = ");
                self.emit_expr(start);
                self.push("; int __limit = ");
                self.emit_expr(limit);
                self.push("; ");
                if *is_increment {
                    self.push(
                        "while (__current < __limit) { __result.push_back(__current); __current++; }",
                    );
                } else {
                    self.push(
                        "while (__current > __limit) { __result.push_back(__current); __current--; }",
                    );
                }
                self.push(" return __result; })()");
            }

            Expr::IterateStep {
                start,
                step_fn,
                condition,
            } => {
                self.push("([&]() { std::vector<decltype(");
                self.emit_expr(start);
                self.push(")> __result; auto __current = ");
                self.emit_expr(start);
                self.push("; while ((");
                self.emit_expr(condition);
                self.push(")(__current)) { __result.push_back(__current); __current = (");
                self.emit_expr(step_fn);
                self.push(")(__current); } return __result; })()");
            }

            Expr::Array(elements) => self.emit_array(elements),
            Expr::Tuple(elements) => {
                self.push("std::make_tuple(");
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.emit_expr(elem);
                }
                self.push(")");
            }

            Expr::ListComprehension {
                expr,
                variable,
                range,
                predicates,
            } => self.emit_comprehension(expr, variable, range, predicates),

            Expr::Spread(inner) => {
                // Spreads outside array literals have no C++ equivalent.
                self.push("/* SPREAD: ");
                self.emit_expr(inner);
                self.push(" */");
            }

            Expr::Index {
                object,
                index,
                is_dot,
                is_optional,
                ..
            } => {
                if *is_optional {
                    // obj?.prop => (obj != nullptr ? obj->prop : nullptr)
                    self.push("([&]() { auto __obj = ");
                    self.emit_expr(object);
                    self.push("; return __obj != nullptr ? __obj->");
                    self.emit_expr(index);
                    self.push(" : nullptr; })()");
                    return;
                }
                self.emit_expr(object);
                if *is_dot {
                    self.push(".");
                    self.emit_expr(index);
                } else {
                    self.push("[");
                    self.emit_expr(index);
                    self.push("]");
                }
            }

            Expr::Object(properties) => {
                self.push("std::map<std::string, std::any>{");
                for (i, (key, value)) in properties.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.push(&format!("{{\"{key}\", "));
                    self.emit_expr(value);
                    self.push("}");
                }
                self.push("}");
            }

            Expr::Match { scrutinee, cases } => {
                let match_var = format!("__match_{}", self.match_counter);
                self.match_counter += 1;

                self.push(&format!("([&]() {{ auto {match_var} = "));
                self.emit_expr(scrutinee);
                self.push("; ");

                for (i, (pattern, result)) in cases.iter().enumerate() {
                    if i > 0 {
                        self.push(" else ");
                    }
                    self.push(&format!("if ({match_var} == "));
                    self.emit_expr(pattern);
                    self.push(") { return ");
                    self.emit_expr(result);
                    self.push("; }");
                }
                // Fallthrough keeps the IIFE well-typed when no case hits.
                if let Some((_, first_result)) = cases.first() {
                    self.push(" return decltype(");
                    self.emit_expr(first_result);
                    self.push("){};");
                }
                self.push(" })()");
            }

            Expr::Cast { expr, target_type } => {
                self.push(&format!("static_cast<{}>(", map_type(target_type)));
                self.emit_expr(expr);
                self.push(")");
            }

            Expr::Await(inner) => {
                // Blocking join on a std::future.
                self.push("(");
                self.emit_expr(inner);
                self.push(").get()");
            }

            Expr::Throw(inner) => {
                self.push("throw ");
                self.emit_expr(inner);
            }

            Expr::Yield(value) => {
                self.push("co_yield ");
                if let Some(value) = value {
                    self.emit_expr(value);
                }
            }

            Expr::TypeOf(inner) => {
                self.push("typeid(");
                self.emit_expr(inner);
                self.push(").name()");
            }

            Expr::InstanceOf { expr, type_name } => {
                self.push(&format!("dynamic_cast<{}*>(", map_type(type_name)));
                self.emit_expr(expr);
                self.push(") != nullptr");
            }

            Expr::QuantumMethodCall { var, method, args } => match method.as_str() {
                "observe" => self.push(&format!("{var}.observe()")),
                "reset" => self.push(&format!("{var}.reset()")),
                "map" | "entangle" => {
                    self.push(&format!("{var}.{method}("));
                    if let Some(arg) = args.first() {
                        self.emit_expr(arg);
                    }
                    self.push(")");
                }
                other => {
                    self.push(&format!("{var}.{other}("));
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            self.push(", ");
                        }
                        self.emit_expr(arg);
                    }
                    self.push(")");
                }
            },
        }
    }

    fn emit_lambda(&mut self, params: &[lppc_par::ast::Param], body: &Expr, rest: Option<&str>) {
        self.push("[](");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            if param.ty.is_empty() {
                self.push("auto ");
            } else {
                let mapped = map_type(&param.ty);
                if mapped == param.ty && !is_builtin_cpp_type(&mapped) {
                    self.push("auto ");
                } else {
                    self.push(&mapped);
                    self.push(" ");
                }
            }
            self.push(&param.name);
        }
        if let Some(rest) = rest {
            if !params.is_empty() {
                self.push(", ");
            }
            self.push(&format!("auto... {rest}"));
        }
        self.push(") { ");
        if let Some(rest) = rest {
            self.push(&format!("auto {rest}_vec = std::vector{{{rest}...}}; "));
        }
        self.push("return ");
        self.emit_expr(body);
        self.push("; }");
    }

    fn emit_array(&mut self, elements: &[Expr]) {
        let has_spread = elements.iter().any(|e| matches!(e, Expr::Spread(_)));

        if !has_spread {
            if elements.is_empty() {
                self.push("std::vector<int>{}");
                return;
            }
            self.push("std::vector<decltype(");
            self.emit_expr(&elements[0]);
            self.push(")>{");
            for (i, elem) in elements.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.emit_expr(elem);
            }
            self.push("}");
            return;
        }

        // Spread form: seed the vector from the first element, insert
        // ranges for spreads, push_back the rest.
        self.push("([&]() { ");
        let mut first = true;
        for elem in elements {
            match elem {
                Expr::Spread(inner) => {
                    if first {
                        self.push("auto __arr = ");
                        self.emit_expr(inner);
                        self.push("; ");
                    } else {
                        self.push("__arr.insert(__arr.end(), (");
                        self.emit_expr(inner);
                        self.push(").begin(), (");
                        self.emit_expr(inner);
                        self.push(").end()); ");
                    }
                }
                other => {
                    if first {
                        self.push("std::vector<decltype(");
                        self.emit_expr(other);
                        self.push(")> __arr; __arr.push_back(");
                        self.emit_expr(other);
                        self.push("); ");
                    } else {
                        self.push("__arr.push_back(");
                        self.emit_expr(other);
                        self.push("); ");
                    }
                }
            }
            first = false;
        }
        self.push("return __arr; })()");
    }

    fn emit_comprehension(
        &mut self,
        expr: &Expr,
        variable: &str,
        range: &Expr,
        predicates: &[Expr],
    ) {
        // [x*2 | x in 0..10, x > 3] lowers to a loop over the range.
        let temp = format!("__comp_{}", self.lambda_counter);
        self.lambda_counter += 1;

        let Expr::Range { start, end, step } = range else {
            // Only range-based comprehensions have a loop lowering.
            self.push("std::vector<int>{}");
            return;
        };

        self.push("([&]() { std::vector<decltype(");
        self.emit_expr(expr);
        self.push(&format!(")> {temp}; "));

        self.push(&format!("for (auto {variable} = "));
        self.emit_expr(start);
        self.push(&format!("; {variable} <= "));
        self.emit_expr(end);
        self.push("; ");
        match step {
            Some(step) => {
                self.push(&format!("{variable} += "));
                self.emit_expr(step);
            }
            None => self.push(&format!("++{variable}")),
        }
        self.push(") { ");

        if !predicates.is_empty() {
            self.push("if (");
            for (i, pred) in predicates.iter().enumerate() {
                if i > 0 {
                    self.push(" && ");
                }
                self.emit_expr(pred);
            }
            self.push(") { ");
        }

        self.push(&format!("{temp}.push_back("));
        self.emit_expr(expr);
        self.push("); ");

        if !predicates.is_empty() {
            self.push("} ");
        }

        self.push(&format!("}} return {temp}; }})()"));
    }

    // ── Statements ─────────────────────────────────────────────────────

    fn emit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => self.emit_var_decl(decl),

            Stmt::QuantumVarDecl {
                name,
                ty,
                states,
                weights,
                ..
            } => {
                self.indent();
                let element_type = quantum_element_type(ty, states);
                self.push(&format!("QuantumVar<{element_type}> {name}({{"));
                for (i, state) in states.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.emit_expr(state);
                }
                self.push("}");
                if let Some(weights) = weights {
                    self.push(", {");
                    for (i, w) in weights.iter().enumerate() {
                        if i > 0 {
                            self.push(", ");
                        }
                        self.push(&format!("{w}"));
                    }
                    self.push("}");
                }
                self.push(");\n");
            }

            Stmt::Assignment { name, value, .. } => {
                self.indent();
                self.push(&format!("{name} = "));
                self.emit_expr(value);
                self.push(";\n");
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.indent();
                self.push("if (");
                self.emit_expr(condition);
                self.push(") {\n");

                self.indent_level += 1;
                for stmt in then_branch {
                    self.emit_stmt(stmt);
                }
                self.indent_level -= 1;

                if !else_branch.is_empty() {
                    self.write_line("} else {");
                    self.indent_level += 1;
                    for stmt in else_branch {
                        self.emit_stmt(stmt);
                    }
                    self.indent_level -= 1;
                }

                self.write_line("}");
            }

            Stmt::While { condition, body } => {
                self.indent();
                self.push("while (");
                self.emit_expr(condition);
                self.push(") {\n");

                self.indent_level += 1;
                for stmt in body {
                    self.emit_stmt(stmt);
                }
                self.indent_level -= 1;
                self.write_line("}");
            }

            Stmt::Switch { condition, cases } => {
                self.indent();
                self.push("switch (");
                self.emit_expr(condition);
                self.push(") {\n");

                self.indent_level += 1;
                for case in cases {
                    self.emit_case(case);
                }
                self.indent_level -= 1;
                self.write_line("}");
            }

            Stmt::For {
                initializer,
                condition,
                increment,
                body,
            } => {
                self.indent();
                self.push("for (");
                if let Some(init) = initializer.as_deref() {
                    match init {
                        Stmt::VarDecl(decl) => {
                            self.push(&format!("{} {}", declared_cpp_type(decl), decl.name));
                            if let Some(init_expr) = &decl.initializer {
                                self.push(" = ");
                                self.emit_expr(init_expr);
                            }
                        }
                        Stmt::Expr(expr) => self.emit_expr(expr),
                        _ => {}
                    }
                }
                self.push("; ");
                if let Some(cond) = condition {
                    self.emit_expr(cond);
                }
                self.push("; ");
                if let Some(inc) = increment {
                    self.emit_expr(inc);
                }
                self.push(") {\n");

                self.indent_level += 1;
                for stmt in body {
                    self.emit_stmt(stmt);
                }
                self.indent_level -= 1;
                self.write_line("}");
            }

            Stmt::ForIn {
                variable,
                iterable,
                body,
            } => {
                self.indent();
                self.push(&format!("for (auto {variable} : "));
                self.emit_expr(iterable);
                self.push(") {\n");

                self.indent_level += 1;
                for stmt in body {
                    self.emit_stmt(stmt);
                }
                self.indent_level -= 1;
                self.write_line("}");
            }

            Stmt::DoWhile { body, condition } => {
                self.write_line("do {");
                self.indent_level += 1;
                for stmt in body {
                    self.emit_stmt(stmt);
                }
                self.indent_level -= 1;
                self.indent();
                self.push("} while (");
                self.emit_expr(condition);
                self.push(");\n");
            }

            Stmt::TryCatch {
                try_block,
                catch_var,
                catch_block,
                finally_block,
            } => {
                self.write_line("try {");
                self.indent_level += 1;
                for stmt in try_block {
                    self.emit_stmt(stmt);
                }
                self.indent_level -= 1;

                self.indent();
                if catch_var.is_empty() {
                    self.push("} catch (...) {\n");
                } else {
                    self.push(&format!("}} catch (const std::exception& {catch_var}) {{\n"));
                }

                self.indent_level += 1;
                for stmt in catch_block {
                    self.emit_stmt(stmt);
                }
                self.indent_level -= 1;
                self.write_line("}");

                // Finally has no C++ clause; the block runs unguarded
                // after the try/catch.
                if !finally_block.is_empty() {
                    self.write_line("{");
                    self.indent_level += 1;
                    for stmt in finally_block {
                        self.emit_stmt(stmt);
                    }
                    self.indent_level -= 1;
                    self.write_line("}");
                }
            }

            Stmt::Destructuring {
                targets,
                source,
                kind,
            } => self.emit_destructuring(targets, source, *kind),

            Stmt::Enum { name, values } => {
                self.indent();
                self.push(&format!("enum {name} {{\n"));
                self.indent_level += 1;
                for (i, (value_name, value)) in values.iter().enumerate() {
                    self.indent();
                    self.push(&format!("{value_name} = {value}"));
                    if i < values.len() - 1 {
                        self.push(",");
                    }
                    self.push("\n");
                }
                self.indent_level -= 1;
                self.write_line("};");
            }

            Stmt::Break => self.write_line("break;"),
            Stmt::Continue => self.write_line("continue;"),

            Stmt::Return(value) => {
                self.indent();
                self.push("return");
                if let Some(value) = value {
                    self.push(" ");
                    self.emit_expr(value);
                }
                self.push(";\n");
            }

            Stmt::Import { module, .. } => {
                self.write_line(&format!("#include \"{module}.hpp\""));
            }

            Stmt::Export { declaration } => {
                // Exports surface through headers; emit the declaration
                // marker's payload if one is attached.
                if let Some(decl) = declaration {
                    self.emit_stmt(decl);
                }
            }

            // Rejected during validation; nothing reaches here.
            Stmt::AutoPattern { .. } => {}

            Stmt::Expr(expr) => {
                self.indent();
                self.emit_expr(expr);
                self.push(";\n");
            }
        }
    }

    fn emit_case(&mut self, case: &CaseClause) {
        self.indent();
        match &case.value {
            Some(value) => {
                self.push("case ");
                self.emit_expr(value);
                self.push(":\n");
            }
            None => self.push("default:\n"),
        }

        self.indent_level += 1;
        if let Some(guard) = &case.guard {
            self.indent();
            self.push("if (");
            self.emit_expr(guard);
            self.push(") {\n");
            self.indent_level += 1;
            for stmt in &case.statements {
                self.emit_stmt(stmt);
            }
            self.indent_level -= 1;
            self.write_line("}");
        } else {
            for stmt in &case.statements {
                self.emit_stmt(stmt);
            }
        }
        self.indent_level -= 1;
    }

    fn emit_var_decl(&mut self, decl: &VarDecl) {
        self.indent();

        if !decl.union_types.is_empty() {
            // Union type: int | string -> std::variant<int, std::string>
            self.push("std::variant<");
            for (i, ty) in decl.union_types.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.push(&map_type(ty));
            }
            self.push(&format!("> {}", decl.name));
        } else if decl.is_array_type {
            match decl.array_size {
                // Fixed-size: int[10] -> std::array<int, 10>
                Some(size) => self.push(&format!(
                    "std::array<{}, {}> {}",
                    map_type(&decl.ty),
                    size,
                    decl.name
                )),
                // Dynamic: int[] -> std::vector<int>
                None => self.push(&format!(
                    "std::vector<{}> {}",
                    map_type(&decl.ty),
                    decl.name
                )),
            }
        } else if decl.is_nullable {
            // Nullable: int? -> std::optional<int>
            self.push(&format!(
                "std::optional<{}> {}",
                map_type(&decl.ty),
                decl.name
            ));
        } else {
            self.push(&format!("{} {}", declared_cpp_type(decl), decl.name));
        }

        if let Some(init) = &decl.initializer {
            self.push(" = ");
            self.emit_expr(init);
        }
        self.push(";\n");
    }

    fn emit_destructuring(&mut self, targets: &[String], source: &Expr, kind: DestructureKind) {
        match kind {
            DestructureKind::Tuple => {
                self.indent();
                self.push("auto __tuple_tmp = ");
                self.emit_expr(source);
                self.push(";\n");
                for (i, target) in targets.iter().enumerate() {
                    self.write_line(&format!("auto {target} = std::get<{i}>(__tuple_tmp);"));
                }
            }
            DestructureKind::Array => {
                self.indent();
                self.push("auto __tmp = ");
                self.emit_expr(source);
                self.push(";\n");
                for (i, target) in targets.iter().enumerate() {
                    self.write_line(&format!("auto {target} = __tmp[{i}];"));
                }
            }
            DestructureKind::Object => {
                self.indent();
                self.push("auto __tmp = ");
                self.emit_expr(source);
                self.push(";\n");
                for target in targets {
                    self.write_line(&format!("auto {target} = __tmp[\"{target}\"];"));
                }
            }
        }
    }

    // ── Declarations ───────────────────────────────────────────────────

    fn emit_function(&mut self, func: &Function) {
        let needs_template = !func.generic_params.is_empty() || func.rest_param.is_some();

        if needs_template {
            self.indent();
            self.push("template<");
            for (i, param) in func.generic_params.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.push(&format!("typename {param}"));
            }
            if func.rest_param.is_some() {
                if !func.generic_params.is_empty() {
                    self.push(", ");
                }
                self.push("typename... RestArgs");
            }
            self.push(">\n");
        }

        self.indent();
        if func.is_generator {
            // co_yield in the body relies on host coroutine support.
            self.push(&format!(
                "/* generator */ {} {}(",
                map_type(&func.return_type),
                func.name
            ));
        } else if func.is_async {
            self.push(&format!(
                "std::future<{}> {}(",
                map_type(&func.return_type),
                func.name
            ));
        } else {
            self.push(&format!("{} {}(", map_type(&func.return_type), func.name));
        }

        for (i, param) in func.params.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push(&format!("{} {}", map_type(&param.ty), param.name));
        }
        if let Some(rest) = &func.rest_param {
            if !func.params.is_empty() {
                self.push(", ");
            }
            self.push(&format!("RestArgs... {rest}"));
        }
        self.push(") {\n");

        self.indent_level += 1;

        // Rest parameters become a vector, reachable under their
        // original name through a macro alias that is undone at the end
        // of the function body.
        let rest_macro = func.rest_param.as_ref().map(|rest| {
            let unique = format!("{}_{}", func.name, self.lambda_counter);
            self.lambda_counter += 1;
            let macro_name = format!("__LPP_REST_{rest}_{unique}");
            let vec_name = format!("__rest_vec_{rest}_{unique}");
            self.write_line("// Convert variadic pack to vector for iteration");
            self.write_line(&format!("auto {vec_name} = std::vector{{{rest}...}};"));
            self.write_line(&format!("#define {macro_name} {vec_name}"));
            self.write_line(&format!("#define {rest} {macro_name}"));
            macro_name
        });

        if func.is_async {
            self.write_line("return std::async(std::launch::async, [&]() {");
            self.indent_level += 1;
        }

        for stmt in &func.body {
            self.emit_stmt(stmt);
        }

        if func.is_async && func.return_type == "void" {
            self.write_line("return;");
        }

        if let (Some(rest), Some(macro_name)) = (&func.rest_param, &rest_macro) {
            self.write_line(&format!("#undef {rest}"));
            self.write_line(&format!("#undef {macro_name}"));
        }

        if func.is_async {
            self.indent_level -= 1;
            self.write_line("});");
        }

        self.indent_level -= 1;
        self.write_line("}");
    }

    fn emit_constructor(&mut self, class_name: &str, ctor: &Function) {
        self.indent();
        self.push(&format!("{class_name}("));
        for (i, param) in ctor.params.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push(&format!("{} {}", map_type(&param.ty), param.name));
        }
        self.push(") {\n");
        self.indent_level += 1;
        for stmt in &ctor.body {
            self.emit_stmt(stmt);
        }
        self.indent_level -= 1;
        self.write_line("}");
    }

    fn emit_class(&mut self, class: &ClassDecl) {
        let heading = match &class.base {
            Some(base) => format!("class {} : public {} {{", class.name, base),
            None => format!("class {} {{", class.name),
        };
        self.write_line(&heading);

        if let Some(pattern) = &class.design_pattern {
            self.write_line(&format!("// AUTO-GENERATED: {pattern} Pattern"));
            self.write_line(&pattern_macro(pattern, &class.name));
        }

        self.write_line("public:");
        self.indent_level += 1;

        for prop in &class.properties {
            self.write_line(&format!("{} {};", map_type(&prop.ty), prop.name));
        }
        self.write_line("");

        if let Some(ctor) = &class.constructor {
            self.emit_constructor(&class.name, ctor);
            self.write_line("");
        }

        for method in &class.methods {
            self.emit_function(method);
            self.write_line("");
        }

        self.indent_level -= 1;
        self.write_line("};");
    }

    fn emit_interface(&mut self, iface: &InterfaceDecl) {
        // Interface -> abstract class with pure-virtual methods.
        self.write_line(&format!("class {} {{", iface.name));
        self.write_line("public:");
        self.indent_level += 1;
        self.write_line(&format!("virtual ~{}() = default;", iface.name));
        self.write_line("");

        for (_, signature) in &iface.methods {
            let cpp_signature = convert_method_signature(signature);
            self.write_line(&format!("virtual {cpp_signature} = 0;"));
        }

        self.indent_level -= 1;
        self.write_line("};");
    }

    fn emit_type_decl(&mut self, decl: &TypeDecl) {
        self.write_line(&format!("// ADT: {}", decl.name));

        let template_prefix = if decl.type_params.is_empty() {
            String::new()
        } else {
            let params: Vec<String> = decl
                .type_params
                .iter()
                .map(|p| format!("typename {p}"))
                .collect();
            format!("template<{}>\n", params.join(", "))
        };

        // One struct per variant.
        for (ctor, fields) in &decl.variants {
            // Variants with generic fields need the parameters in scope.
            let generic = fields
                .iter()
                .any(|f| decl.type_params.contains(f));
            if generic {
                self.indent();
                self.push(&template_prefix);
            }
            self.write_line(&format!("struct {ctor} {{"));
            self.indent_level += 1;
            for (i, field) in fields.iter().enumerate() {
                self.write_line(&format!("{} _{};", map_type(field), i));
            }
            self.indent_level -= 1;
            self.write_line("};");
        }

        // The variant alias.
        if !template_prefix.is_empty() {
            self.indent();
            self.push(&template_prefix);
        }
        self.write_line(&format!("using {} = std::variant<", decl.name));
        self.indent_level += 1;
        for (i, (ctor, fields)) in decl.variants.iter().enumerate() {
            let generic = fields.iter().any(|f| decl.type_params.contains(f));
            let spelled = if generic {
                format!("{}<{}>", ctor, decl.type_params.join(", "))
            } else {
                ctor.clone()
            };
            let comma = if i < decl.variants.len() - 1 { "," } else { "" };
            self.write_line(&format!("{spelled}{comma}"));
        }
        self.indent_level -= 1;
        self.write_line(">;");
    }
}

impl Default for Transpiler {
    fn default() -> Self {
        Self::new()
    }
}

// ── Free helpers ───────────────────────────────────────────────────────

/// The C++ type for a plain declaration. Annotated types map directly;
/// `auto` declarations take their type from the initializer when the
/// literal shape makes it obvious, and stay `auto` otherwise.
fn declared_cpp_type(decl: &VarDecl) -> String {
    let mapped = map_type(&decl.ty);
    if mapped != "auto" {
        return mapped;
    }
    match decl.initializer.as_ref().and_then(infer_literal_type) {
        Some(ty) => ty.to_string(),
        None => "auto".to_string(),
    }
}

/// Obvious literal types: integer/float literals, strings, bools, and
/// arithmetic over them.
fn infer_literal_type(expr: &Expr) -> Option<&'static str> {
    match expr {
        Expr::Number(n) => Some(if n.fract() == 0.0 { "int" } else { "double" }),
        Expr::Str(_) | Expr::TemplateLiteral { .. } => Some("std::string"),
        Expr::Bool(_) => Some("bool"),
        Expr::Unary { op, operand } if op == "-" => infer_literal_type(operand),
        Expr::Binary {
            left, op, right, ..
        } if matches!(op.as_str(), "+" | "-" | "*" | "/" | "%" | "**") => {
            match (infer_literal_type(left), infer_literal_type(right)) {
                (Some("int"), Some("int")) => Some("int"),
                (Some(a), Some(b))
                    if (a == "int" || a == "double") && (b == "int" || b == "double") =>
                {
                    Some("double")
                }
                _ => None,
            }
        }
        Expr::Cast { target_type, .. } => match map_type(target_type).as_str() {
            "int" => Some("int"),
            "double" => Some("double"),
            "bool" => Some("bool"),
            "std::string" => Some("std::string"),
            _ => None,
        },
        _ => None,
    }
}

/// Numbers print integral when they are integral.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Escape a string literal's contents for a C++ source file. The
/// lexeme holds the already-unescaped text (except `\0`, kept escaped).
fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    // The lexer keeps \0 as backslash-zero; undo the double escape.
    out.replace("\\\\0", "\\0")
}

fn is_builtin_cpp_type(ty: &str) -> bool {
    matches!(ty, "int" | "double" | "bool" | "void" | "auto") || ty == "std::string"
}

/// Element type for a quantum declaration: the annotation when given,
/// otherwise inferred from the first state.
fn quantum_element_type(ty: &str, states: &[Expr]) -> String {
    if ty != "auto" {
        return map_type(ty);
    }
    match states.first() {
        Some(Expr::Str(_)) => "std::string".to_string(),
        Some(Expr::Number(n)) if n.fract() != 0.0 => "double".to_string(),
        Some(Expr::Bool(_)) => "bool".to_string(),
        _ => "int".to_string(),
    }
}

fn find_unexpanded_autopattern(program: &Program) -> Option<&str> {
    fn scan(stmts: &[Stmt]) -> Option<&str> {
        for stmt in stmts {
            match stmt {
                Stmt::AutoPattern { class_name, .. } => return Some(class_name),
                Stmt::If {
                    then_branch,
                    else_branch,
                    ..
                } => {
                    if let Some(found) = scan(then_branch).or_else(|| scan(else_branch)) {
                        return Some(found);
                    }
                }
                Stmt::While { body, .. }
                | Stmt::For { body, .. }
                | Stmt::ForIn { body, .. }
                | Stmt::DoWhile { body, .. } => {
                    if let Some(found) = scan(body) {
                        return Some(found);
                    }
                }
                _ => {}
            }
        }
        None
    }

    for func in &program.functions {
        if let Some(found) = scan(&func.body) {
            return Some(found);
        }
    }
    scan(&program.enums)
        .or_else(|| scan(&program.imports))
        .or_else(|| scan(&program.exports))
}
