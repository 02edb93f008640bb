//! lppc-par - AST node definitions.
//!
//! The AST is a strict ownership tree: every node is owned by exactly
//! one parent through `Box`/`Vec`, nothing is shared, and there are no
//! back pointers. The parser builds it once; analyzer and transpiler
//! consume it read-only.
//!
//! Operators and type names are plain strings. The precedence table and
//! the transpiler's type mapping are the authority on what they mean;
//! the AST just carries them.

use lppc_util::Span;

/// Paradigm modes for file-level enforcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParadigmMode {
    /// Default: all features allowed.
    Hybrid,
    /// Immutability, pure functions, no classes.
    Functional,
    /// Performance-oriented, explicit control flow.
    Imperative,
    /// Object-oriented with classes and inheritance.
    Oop,
    /// Code golf: minimal syntax.
    Golfed,
}

impl ParadigmMode {
    /// Parse a mode word from a pragma directive.
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "hybrid" => Some(ParadigmMode::Hybrid),
            "functional" => Some(ParadigmMode::Functional),
            "imperative" => Some(ParadigmMode::Imperative),
            "oop" => Some(ParadigmMode::Oop),
            "golfed" => Some(ParadigmMode::Golfed),
            _ => None,
        }
    }
}

/// A `(name, type)` parameter or property pair. The type string is
/// empty when omitted (inferred).
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    /// `` `text ${expr} more` `` - static parts interleaved with
    /// interpolations; `strings.len() == interpolations.len() + 1`.
    TemplateLiteral {
        strings: Vec<String>,
        interpolations: Vec<Expr>,
    },
    Bool(bool),
    /// `null` / `undefined` - lowers to `nullptr`.
    Null,
    Identifier {
        name: String,
        span: Span,
    },
    Binary {
        left: Box<Expr>,
        op: String,
        right: Box<Expr>,
        span: Span,
    },
    Unary {
        op: String,
        operand: Box<Expr>,
    },
    /// `x++` / `x--`.
    Postfix {
        operand: Box<Expr>,
        op: String,
    },
    /// `start..end` or `start..end..step` (also `~` spelling).
    Range {
        start: Box<Expr>,
        end: Box<Expr>,
        step: Option<Box<Expr>>,
    },
    /// `arr @ fn`
    Map {
        iterable: Box<Expr>,
        func: Box<Expr>,
    },
    /// `arr ? |x| cond`
    Filter {
        iterable: Box<Expr>,
        predicate: Box<Expr>,
    },
    /// `arr \ |acc, x| expr`
    Reduce {
        iterable: Box<Expr>,
        func: Box<Expr>,
        initial: Option<Box<Expr>>,
    },
    /// `start !! condition $ stepFn`
    IterateWhile {
        start: Box<Expr>,
        condition: Box<Expr>,
        step_fn: Box<Expr>,
    },
    /// `start !!< limit` (increment) / `start !!> limit` (decrement).
    AutoIterate {
        start: Box<Expr>,
        limit: Box<Expr>,
        is_increment: bool,
    },
    /// `start ~> stepFn !! condition`
    IterateStep {
        start: Box<Expr>,
        step_fn: Box<Expr>,
        condition: Box<Expr>,
    },
    Call {
        function: String,
        arguments: Vec<Expr>,
    },
    /// `x -> e`, `(a, b) => e`, `|x| e`; type strings empty when
    /// inferred.
    Lambda {
        params: Vec<Param>,
        body: Box<Expr>,
        return_type: String,
        rest_param: Option<String>,
    },
    /// `?cond -> a $ b`; the else arm is optional.
    TernaryIf {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Option<Box<Expr>>,
    },
    /// `a |> f |> g`
    Pipeline {
        initial: Box<Expr>,
        stages: Vec<Expr>,
    },
    /// `f . g . h` - listed in reading order.
    Composition {
        functions: Vec<Expr>,
    },
    Array(Vec<Expr>),
    Tuple(Vec<Expr>),
    /// `[expr | var in range, predicates...]`
    ListComprehension {
        expr: Box<Expr>,
        variable: String,
        range: Box<Expr>,
        predicates: Vec<Expr>,
    },
    /// `...expr` inside an array literal.
    Spread(Box<Expr>),
    /// `obj.prop` / `obj?.prop` (`is_dot`) or `arr[index]`.
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        is_dot: bool,
        is_optional: bool,
        span: Span,
    },
    /// `{key: value, shorthand}`
    Object(Vec<(String, Expr)>),
    /// `match expr { case pattern -> result ... }`
    Match {
        scrutinee: Box<Expr>,
        cases: Vec<(Expr, Expr)>,
    },
    /// `x as T`
    Cast {
        expr: Box<Expr>,
        target_type: String,
    },
    Await(Box<Expr>),
    Throw(Box<Expr>),
    Yield(Option<Box<Expr>>),
    TypeOf(Box<Expr>),
    InstanceOf {
        expr: Box<Expr>,
        type_name: String,
    },
    /// `q.observe()`, `q.map(f)`, `q.reset()`, `entangle(q, f)`.
    QuantumMethodCall {
        var: String,
        method: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Shorthand for an identifier without a useful position.
    pub fn ident(name: impl Into<String>) -> Expr {
        Expr::Identifier {
            name: name.into(),
            span: Span::DUMMY,
        }
    }

    /// Position of this expression, when one was recorded.
    pub fn span(&self) -> Span {
        match self {
            Expr::Identifier { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Index { span, .. } => *span,
            _ => Span::DUMMY,
        }
    }
}

/// How a destructuring statement takes its source apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestructureKind {
    /// `let [a, b] = arr;`
    Array,
    /// `let {x, y} = obj;`
    Object,
    /// `let (a, b) = tuple;`
    Tuple,
}

/// A variable declaration with its type annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    /// Annotated type, `"auto"` when inferred; `mut ` prefix marks
    /// mutable bindings.
    pub ty: String,
    pub initializer: Option<Expr>,
    /// `T[]` / `T[N]` annotation.
    pub is_array_type: bool,
    /// Fixed size for `T[N]`; `None` for dynamic arrays.
    pub array_size: Option<usize>,
    /// `T?` annotation.
    pub is_nullable: bool,
    /// `A | B | C` annotation; empty when not a union.
    pub union_types: Vec<String>,
    pub span: Span,
}

impl VarDecl {
    /// A plain declaration with inferred type.
    pub fn new(name: impl Into<String>, initializer: Option<Expr>, span: Span) -> Self {
        Self {
            name: name.into(),
            ty: "auto".into(),
            initializer,
            is_array_type: false,
            array_size: None,
            is_nullable: false,
            union_types: Vec::new(),
            span,
        }
    }
}

/// One arm of a switch statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    /// `None` for the default case.
    pub value: Option<Expr>,
    /// Optional `when` guard.
    pub guard: Option<Expr>,
    pub statements: Vec<Stmt>,
    pub is_default: bool,
}

/// Statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDecl),
    /// `quantum let x = [states];` or weighted `{v: p, ...}`. Weights,
    /// when present, are normalized to sum 1 and have one entry per
    /// state.
    QuantumVarDecl {
        name: String,
        ty: String,
        states: Vec<Expr>,
        weights: Option<Vec<f64>>,
        span: Span,
    },
    Assignment {
        name: String,
        value: Expr,
        span: Span,
    },
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Vec<Stmt>,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
    },
    Switch {
        condition: Expr,
        cases: Vec<CaseClause>,
    },
    /// Classic `for (init; cond; inc)`. The initializer, when present,
    /// is a `VarDecl` or `Expr` statement.
    For {
        initializer: Option<Box<Stmt>>,
        condition: Option<Expr>,
        increment: Option<Expr>,
        body: Vec<Stmt>,
    },
    ForIn {
        variable: String,
        iterable: Expr,
        body: Vec<Stmt>,
    },
    DoWhile {
        body: Vec<Stmt>,
        condition: Expr,
    },
    TryCatch {
        try_block: Vec<Stmt>,
        catch_var: String,
        catch_block: Vec<Stmt>,
        finally_block: Vec<Stmt>,
    },
    Destructuring {
        targets: Vec<String>,
        source: Expr,
        kind: DestructureKind,
    },
    Enum {
        name: String,
        values: Vec<(String, i64)>,
    },
    Break,
    Continue,
    Return(Option<Expr>),
    Import {
        names: Vec<String>,
        module: String,
        import_all: bool,
    },
    /// Export marker; the exported declaration itself is parsed into
    /// the regular program vectors.
    Export {
        declaration: Option<Box<Stmt>>,
    },
    /// `autopattern Kind Name;` before expansion. The parser expands
    /// these into classes; the variant survives only for tooling that
    /// wants the pre-expansion form.
    AutoPattern {
        problem: String,
        class_name: String,
        resolved: String,
    },
    Expr(Expr),
}

/// A function or method.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: String,
    pub body: Vec<Stmt>,
    /// Name of the trailing `...rest` parameter, if any.
    pub rest_param: Option<String>,
    pub is_async: bool,
    /// Set when the body contains a `yield`.
    pub is_generator: bool,
    pub is_getter: bool,
    pub is_setter: bool,
    /// `fn foo<T, U>(...)`.
    pub generic_params: Vec<String>,
    pub span: Span,
}

impl Function {
    /// A plain function; flags default to off.
    pub fn new(
        name: impl Into<String>,
        params: Vec<Param>,
        return_type: impl Into<String>,
        body: Vec<Stmt>,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            return_type: return_type.into(),
            body,
            rest_param: None,
            is_async: false,
            is_generator: false,
            is_getter: false,
            is_setter: false,
            generic_params: Vec::new(),
            span: Span::DUMMY,
        }
    }
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub base: Option<String>,
    pub properties: Vec<Param>,
    pub methods: Vec<Function>,
    pub constructor: Option<Box<Function>>,
    /// Design pattern name when generated by `autopattern` or marked
    /// with `@pattern`; drives the macro hook in emitted C++.
    pub design_pattern: Option<String>,
    pub span: Span,
}

/// An interface declaration: method names with their signature strings.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: String,
    /// `(name, signature)` pairs, signature like `"add(int, int) -> int"`.
    pub methods: Vec<(String, String)>,
}

/// An algebraic data type: `type Option<T> = Some(T) | None;`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub type_params: Vec<String>,
    /// `(constructor, field types)` per variant.
    pub variants: Vec<(String, Vec<String>)>,
}

/// A parsed program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub paradigm: ParadigmMode,
    pub imports: Vec<Stmt>,
    pub exports: Vec<Stmt>,
    pub functions: Vec<Function>,
    pub classes: Vec<ClassDecl>,
    pub interfaces: Vec<InterfaceDecl>,
    pub types: Vec<TypeDecl>,
    pub enums: Vec<Stmt>,
}

impl Program {
    /// An empty program in the given mode.
    pub fn empty(paradigm: ParadigmMode) -> Self {
        Self {
            paradigm,
            imports: Vec::new(),
            exports: Vec::new(),
            functions: Vec::new(),
            classes: Vec::new(),
            interfaces: Vec::new(),
            types: Vec::new(),
            enums: Vec::new(),
        }
    }
}

/// Whether any statement in the slice contains a `yield` expression.
/// Used to flag generator functions after their body is parsed.
pub fn contains_yield(stmts: &[Stmt]) -> bool {
    stmts.iter().any(stmt_has_yield)
}

fn stmt_has_yield(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::VarDecl(v) => v.initializer.as_ref().is_some_and(expr_has_yield),
        Stmt::QuantumVarDecl { states, .. } => states.iter().any(expr_has_yield),
        Stmt::Assignment { value, .. } => expr_has_yield(value),
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            expr_has_yield(condition) || contains_yield(then_branch) || contains_yield(else_branch)
        }
        Stmt::While { condition, body } => expr_has_yield(condition) || contains_yield(body),
        Stmt::Switch { condition, cases } => {
            expr_has_yield(condition)
                || cases.iter().any(|c| {
                    c.value.as_ref().is_some_and(expr_has_yield)
                        || c.guard.as_ref().is_some_and(expr_has_yield)
                        || contains_yield(&c.statements)
                })
        }
        Stmt::For {
            initializer,
            condition,
            increment,
            body,
        } => {
            initializer.as_deref().is_some_and(stmt_has_yield)
                || condition.as_ref().is_some_and(expr_has_yield)
                || increment.as_ref().is_some_and(expr_has_yield)
                || contains_yield(body)
        }
        Stmt::ForIn { iterable, body, .. } => expr_has_yield(iterable) || contains_yield(body),
        Stmt::DoWhile { body, condition } => contains_yield(body) || expr_has_yield(condition),
        Stmt::TryCatch {
            try_block,
            catch_block,
            finally_block,
            ..
        } => {
            contains_yield(try_block)
                || contains_yield(catch_block)
                || contains_yield(finally_block)
        }
        Stmt::Destructuring { source, .. } => expr_has_yield(source),
        Stmt::Return(value) => value.as_ref().is_some_and(expr_has_yield),
        Stmt::Expr(e) => expr_has_yield(e),
        _ => false,
    }
}

fn expr_has_yield(expr: &Expr) -> bool {
    match expr {
        Expr::Yield(_) => true,
        Expr::TemplateLiteral { interpolations, .. } => interpolations.iter().any(expr_has_yield),
        Expr::Binary { left, right, .. } => expr_has_yield(left) || expr_has_yield(right),
        Expr::Unary { operand, .. } | Expr::Postfix { operand, .. } => expr_has_yield(operand),
        Expr::Range { start, end, step } => {
            expr_has_yield(start)
                || expr_has_yield(end)
                || step.as_deref().is_some_and(expr_has_yield)
        }
        Expr::Map { iterable, func } => expr_has_yield(iterable) || expr_has_yield(func),
        Expr::Filter {
            iterable,
            predicate,
        } => expr_has_yield(iterable) || expr_has_yield(predicate),
        Expr::Reduce {
            iterable,
            func,
            initial,
        } => {
            expr_has_yield(iterable)
                || expr_has_yield(func)
                || initial.as_deref().is_some_and(expr_has_yield)
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
        } => expr_has_yield(start) || expr_has_yield(condition) || expr_has_yield(step_fn),
        Expr::AutoIterate { start, limit, .. } => expr_has_yield(start) || expr_has_yield(limit),
        Expr::Call { arguments, .. } => arguments.iter().any(expr_has_yield),
        Expr::Lambda { body, .. } => expr_has_yield(body),
        Expr::TernaryIf {
            condition,
            then_expr,
            else_expr,
        } => {
            expr_has_yield(condition)
                || expr_has_yield(then_expr)
                || else_expr.as_deref().is_some_and(expr_has_yield)
        }
        Expr::Pipeline { initial, stages } => {
            expr_has_yield(initial) || stages.iter().any(expr_has_yield)
        }
        Expr::Composition { functions } => functions.iter().any(expr_has_yield),
        Expr::Array(items) | Expr::Tuple(items) => items.iter().any(expr_has_yield),
        Expr::ListComprehension {
            expr,
            range,
            predicates,
            ..
        } => {
            expr_has_yield(expr)
                || expr_has_yield(range)
                || predicates.iter().any(expr_has_yield)
        }
        Expr::Spread(inner) | Expr::Await(inner) | Expr::Throw(inner) | Expr::TypeOf(inner) => {
            expr_has_yield(inner)
        }
        Expr::Index { object, index, .. } => expr_has_yield(object) || expr_has_yield(index),
        Expr::Object(props) => props.iter().any(|(_, v)| expr_has_yield(v)),
        Expr::Match { scrutinee, cases } => {
            expr_has_yield(scrutinee)
                || cases
                    .iter()
                    .any(|(p, r)| expr_has_yield(p) || expr_has_yield(r))
        }
        Expr::Cast { expr, .. } => expr_has_yield(expr),
        Expr::InstanceOf { expr, .. } => expr_has_yield(expr),
        Expr::QuantumMethodCall { args, .. } => args.iter().any(expr_has_yield),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paradigm_from_word() {
        assert_eq!(ParadigmMode::from_word("hybrid"), Some(ParadigmMode::Hybrid));
        assert_eq!(ParadigmMode::from_word("oop"), Some(ParadigmMode::Oop));
        assert_eq!(ParadigmMode::from_word("quantum"), None);
    }

    #[test]
    fn test_contains_yield_in_nested_body() {
        let body = vec![Stmt::While {
            condition: Expr::Bool(true),
            body: vec![Stmt::Expr(Expr::Yield(Some(Box::new(Expr::Number(1.0)))))],
        }];
        assert!(contains_yield(&body));
        assert!(!contains_yield(&[Stmt::Return(Some(Expr::Number(1.0)))]));
    }

    #[test]
    fn test_expr_span_defaults_to_dummy() {
        assert_eq!(Expr::Number(1.0).span(), Span::DUMMY);
        let ident = Expr::Identifier {
            name: "x".into(),
            span: Span::new(3, 4),
        };
        assert_eq!(ident.span(), Span::new(3, 4));
    }
}
