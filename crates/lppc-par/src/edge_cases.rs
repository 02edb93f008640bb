//! Edge case tests for the parser: disambiguation points, recovery,
//! and the syntactic rewrites.

use lppc_lex::Lexer;

use crate::ast::{DestructureKind, Expr, Program, Stmt};
use crate::parse;

fn parse_ok(source: &str) -> Program {
    let (program, diags) = parse(Lexer::tokenize(source));
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    program
}

fn body_of(source: &str) -> Vec<Stmt> {
    let src = format!("#pragma paradigm hybrid\nfn f() -> int {{ {source} }}");
    parse_ok(&src).functions.remove(0).body
}

fn first_expr(source: &str) -> Expr {
    match body_of(&format!("let x = {source};")).remove(0) {
        Stmt::VarDecl(decl) => decl.initializer.expect("initializer"),
        other => panic!("expected var decl, got {other:?}"),
    }
}

// ── Precedence ─────────────────────────────────────────────────────────

#[test]
fn math_mode_precedence() {
    // 1 + 2 * 3 parses as 1 + (2 * 3)
    let expr = first_expr("1 + 2 * 3");
    match expr {
        Expr::Binary { op, right, .. } => {
            assert_eq!(op, "+");
            assert!(matches!(*right, Expr::Binary { ref op, .. } if op == "*"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn power_is_right_associative() {
    // 2 ** 3 ** 2 parses as 2 ** (3 ** 2)
    let expr = first_expr("2 ** 3 ** 2");
    match expr {
        Expr::Binary { op, right, .. } => {
            assert_eq!(op, "**");
            assert!(matches!(*right, Expr::Binary { ref op, .. } if op == "**"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn subtraction_is_left_associative() {
    // 10 - 3 - 2 parses as (10 - 3) - 2
    let expr = first_expr("10 - 3 - 2");
    match expr {
        Expr::Binary { op, left, .. } => {
            assert_eq!(op, "-");
            assert!(matches!(*left, Expr::Binary { ref op, .. } if op == "-"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

// ── Ranges and symbolic operators ──────────────────────────────────────

#[test]
fn range_with_step() {
    let expr = first_expr("0..5..1");
    match expr {
        Expr::Range { start, end, step } => {
            assert_eq!(*start, Expr::Number(0.0));
            assert_eq!(*end, Expr::Number(5.0));
            assert_eq!(step.as_deref(), Some(&Expr::Number(1.0)));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn tilde_range_spelling() {
    assert!(matches!(first_expr("1~10"), Expr::Range { step: None, .. }));
}

#[test]
fn map_operator() {
    let expr = first_expr("xs @ (x -> x * 2)");
    match expr {
        Expr::Map { iterable, func } => {
            assert!(matches!(*iterable, Expr::Identifier { .. }));
            assert!(matches!(*func, Expr::Lambda { .. }));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn filter_with_pipe_lambda() {
    let expr = first_expr("xs ? |x| x > 2");
    match expr {
        Expr::Filter { predicate, .. } => match *predicate {
            Expr::Lambda { ref params, .. } => assert_eq!(params[0].name, "x"),
            ref other => panic!("expected lambda predicate, got {other:?}"),
        },
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn reduce_with_two_param_lambda() {
    let expr = first_expr("xs \\ |acc, x| acc + x");
    match expr {
        Expr::Reduce { func, initial, .. } => {
            assert!(initial.is_none());
            assert!(matches!(*func, Expr::Lambda { ref params, .. } if params.len() == 2));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn iterate_while_and_step_forms() {
    assert!(matches!(
        first_expr("1 !! (x -> x < 100) $ (x -> x * 2)"),
        Expr::IterateWhile { .. }
    ));
    assert!(matches!(
        first_expr("1 ~> (x -> x + 1) !! (x -> x < 10)"),
        Expr::IterateStep { .. }
    ));
    assert!(matches!(
        first_expr("0 !!< 10"),
        Expr::AutoIterate { is_increment: true, .. }
    ));
    assert!(matches!(
        first_expr("10 !!> 0"),
        Expr::AutoIterate { is_increment: false, .. }
    ));
}

// ── Pipelines, composition, ternary ────────────────────────────────────

#[test]
fn pipeline_stages() {
    let expr = first_expr("5 |> inc |> double");
    match expr {
        Expr::Pipeline { initial, stages } => {
            assert_eq!(*initial, Expr::Number(5.0));
            assert_eq!(stages.len(), 2);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn composition_of_uncalled_identifiers() {
    let expr = first_expr("f . g . h");
    match expr {
        Expr::Composition { functions } => assert_eq!(functions.len(), 3),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn method_call_is_not_composition() {
    let expr = first_expr("obj.total(1)");
    match expr {
        Expr::Index { index, is_dot, .. } => {
            assert!(is_dot);
            assert!(matches!(*index, Expr::Call { ref function, .. } if function == "total"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn ternary_if_with_else() {
    let expr = first_expr("?a > 1 -> 2 $ 3");
    assert!(matches!(expr, Expr::TernaryIf { else_expr: Some(_), .. }));
}

#[test]
fn nullish_and_optional_chaining() {
    assert!(matches!(
        first_expr("a ?? b"),
        Expr::Binary { ref op, .. } if op == "??"
    ));
    assert!(matches!(
        first_expr("a?.b"),
        Expr::Index { is_optional: true, .. }
    ));
}

// ── Literals and comprehensions ────────────────────────────────────────

#[test]
fn array_with_spread() {
    let expr = first_expr("[1, ...rest, 2]");
    match expr {
        Expr::Array(items) => {
            assert_eq!(items.len(), 3);
            assert!(matches!(items[1], Expr::Spread(_)));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn list_comprehension_with_predicates() {
    let expr = first_expr("[x * 2 | x in 0..10, x > 3, x < 9]");
    match expr {
        Expr::ListComprehension {
            variable,
            predicates,
            ..
        } => {
            assert_eq!(variable, "x");
            assert_eq!(predicates.len(), 2);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn trailing_comma_forces_tuple() {
    assert!(matches!(first_expr("(1, 2)"), Expr::Tuple(ref v) if v.len() == 2));
    assert!(matches!(first_expr("(1)"), Expr::Number(_)));
    assert!(matches!(first_expr("()"), Expr::Tuple(ref v) if v.is_empty()));
}

#[test]
fn empty_paren_lambda() {
    assert!(matches!(
        first_expr("() -> 42"),
        Expr::Lambda { ref params, .. } if params.is_empty()
    ));
}

#[test]
fn template_literal_interpolation() {
    let expr = first_expr("`Hello ${name} done`");
    match expr {
        Expr::TemplateLiteral {
            strings,
            interpolations,
        } => {
            assert_eq!(strings.len(), interpolations.len() + 1);
            assert_eq!(strings[0], "Hello");
            assert_eq!(strings[1], "done");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn match_expression_cases() {
    let expr = first_expr("match n { case 1 -> 10; case 2 -> 20; }");
    match expr {
        Expr::Match { cases, .. } => assert_eq!(cases.len(), 2),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn object_literal_shorthand() {
    let expr = first_expr("{name: n, age}");
    match expr {
        Expr::Object(props) => {
            assert_eq!(props[0].0, "name");
            assert_eq!(props[1].0, "age");
            assert!(matches!(props[1].1, Expr::Identifier { ref name, .. } if name == "age"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

// ── Generic calls ──────────────────────────────────────────────────────

#[test]
fn generic_call_is_recognized_and_type_args_dropped() {
    let expr = first_expr("identity<int>(5)");
    match expr {
        Expr::Call {
            function,
            arguments,
        } => {
            assert_eq!(function, "identity");
            assert_eq!(arguments.len(), 1);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn less_than_is_not_a_generic_call() {
    let expr = first_expr("a < b");
    assert!(matches!(expr, Expr::Binary { ref op, .. } if op == "<"));
}

// ── Statements ─────────────────────────────────────────────────────────

#[test]
fn destructuring_forms() {
    for (src, kind) in [
        ("let [a, b] = arr;", DestructureKind::Array),
        ("let {x, y} = obj;", DestructureKind::Object),
        ("let (p, q) = tup;", DestructureKind::Tuple),
    ] {
        match body_of(src).remove(0) {
            Stmt::Destructuring { kind: k, targets, .. } => {
                assert_eq!(k, kind);
                assert_eq!(targets.len(), 2);
            }
            other => panic!("{src}: unexpected {other:?}"),
        }
    }
}

#[test]
fn var_decl_type_annotations() {
    let Stmt::VarDecl(d) = body_of("let xs: int[10];").remove(0) else {
        panic!()
    };
    assert!(d.is_array_type);
    assert_eq!(d.array_size, Some(10));

    let Stmt::VarDecl(d) = body_of("let v: int[];").remove(0) else {
        panic!()
    };
    assert!(d.is_array_type);
    assert_eq!(d.array_size, None);

    let Stmt::VarDecl(d) = body_of("let n: int?;").remove(0) else {
        panic!()
    };
    assert!(d.is_nullable);

    let Stmt::VarDecl(d) = body_of("let u: int | string;").remove(0) else {
        panic!()
    };
    assert_eq!(d.union_types, vec!["int".to_string(), "string".to_string()]);
}

#[test]
fn compound_assignment_desugars() {
    match body_of("x += 5;").remove(0) {
        Stmt::Assignment { name, value, .. } => {
            assert_eq!(name, "x");
            assert!(matches!(value, Expr::Binary { ref op, .. } if op == "+"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn for_in_and_classic_for() {
    assert!(matches!(
        body_of("for (x in xs) { print(x); }").remove(0),
        Stmt::ForIn { .. }
    ));
    match body_of("for (let i = 0; i < 10; i++) { print(i); }").remove(0) {
        Stmt::For { initializer, condition, increment, .. } => {
            assert!(matches!(initializer.as_deref(), Some(Stmt::VarDecl(_))));
            assert!(condition.is_some());
            assert!(matches!(increment, Some(Expr::Postfix { .. })));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn do_while_and_try_catch_finally() {
    assert!(matches!(
        body_of("do { x = x + 1; } while (x < 3);").remove(0),
        Stmt::DoWhile { .. }
    ));
    match body_of("try { risky(); } catch (e) { print(e); } finally { cleanup(); }").remove(0) {
        Stmt::TryCatch {
            catch_var,
            finally_block,
            ..
        } => {
            assert_eq!(catch_var, "e");
            assert_eq!(finally_block.len(), 1);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn switch_case_with_guard() {
    let stmt = body_of("switch (n) { case 1 when n > 0: break; default: break; }").remove(0);
    match stmt {
        Stmt::Switch { cases, .. } => {
            assert!(cases[0].guard.is_some());
            assert!(cases[1].is_default);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn quantum_declarations() {
    match body_of("quantum let q = [1, 2, 3];").remove(0) {
        Stmt::QuantumVarDecl { states, weights, .. } => {
            assert_eq!(states.len(), 3);
            assert!(weights.is_none());
        }
        other => panic!("unexpected {other:?}"),
    }

    match body_of("quantum let q = {1: 1, 2: 3};").remove(0) {
        Stmt::QuantumVarDecl { weights, .. } => {
            let w = weights.expect("normalized weights");
            assert_eq!(w.len(), 2);
            assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            assert!((w[0] - 0.25).abs() < 1e-9);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn quantum_methods_and_entangle() {
    assert!(matches!(
        body_of("let v = q.observe();").remove(0),
        Stmt::VarDecl(d) if matches!(
            d.initializer,
            Some(Expr::QuantumMethodCall { ref method, .. }) if method == "observe"
        )
    ));
    assert!(matches!(
        first_expr("entangle(q, (x -> x * 2))"),
        Expr::QuantumMethodCall { ref method, ref args, .. }
            if method == "entangle" && args.len() == 1
    ));
}

// ── Top-level declarations ─────────────────────────────────────────────

#[test]
fn imports_and_exports() {
    let program = parse_ok(
        "#pragma paradigm hybrid\nimport { sqrt, pow } from \"math\";\nexport fn f() -> int { return 1; }",
    );
    assert_eq!(program.imports.len(), 1);
    assert!(matches!(
        &program.imports[0],
        Stmt::Import { names, module, .. } if names.len() == 2 && module == "math"
    ));
    assert_eq!(program.exports.len(), 1);
    assert_eq!(program.functions.len(), 1);
}

#[test]
fn interface_signatures() {
    let program = parse_ok(
        "#pragma paradigm hybrid\ninterface Shape { area() -> float; scaled(factor: float) -> Shape; }",
    );
    let iface = &program.interfaces[0];
    assert_eq!(iface.methods[0].1, "area() -> float");
    assert_eq!(iface.methods[1].1, "scaled(float) -> Shape");
}

#[test]
fn adt_with_generics() {
    let program = parse_ok("#pragma paradigm hybrid\ntype Option<T> = Some(T) | None;");
    let decl = &program.types[0];
    assert_eq!(decl.type_params, vec!["T".to_string()]);
    assert_eq!(decl.variants.len(), 2);
    assert_eq!(decl.variants[0].0, "Some");
    assert_eq!(decl.variants[0].1, vec!["T".to_string()]);
    assert!(decl.variants[1].1.is_empty());
}

#[test]
fn autopattern_expands_into_a_class() {
    let program = parse_ok("#pragma paradigm oop\nautopattern Observer News;");
    assert_eq!(program.classes.len(), 1);
    let class = &program.classes[0];
    assert_eq!(class.name, "News");
    assert_eq!(class.design_pattern.as_deref(), Some("Observer"));
}

#[test]
fn class_with_everything() {
    let src = "#pragma paradigm oop\n\
               class Dog extends Animal {\n\
                 let name: string;\n\
                 constructor(name: string) { print(name); }\n\
                 fn speak() -> void { print(name); }\n\
                 get fn nickname() -> string { return name; }\n\
               }";
    let program = parse_ok(src);
    let class = &program.classes[0];
    assert_eq!(class.base.as_deref(), Some("Animal"));
    assert_eq!(class.properties[0].name, "name");
    assert!(class.constructor.is_some());
    assert_eq!(class.methods.len(), 2);
    assert!(class.methods[1].is_getter);
}

#[test]
fn async_and_generator_flags() {
    let program = parse_ok(
        "#pragma paradigm hybrid\n\
         async fn fetchIt() -> int { return 1; }\n\
         fn gen() -> int { yield 1; }",
    );
    assert!(program.functions[0].is_async);
    assert!(!program.functions[0].is_generator);
    assert!(program.functions[1].is_generator);
}

#[test]
fn rest_parameter() {
    let program =
        parse_ok("#pragma paradigm hybrid\nfn sum(first: int, ...rest) -> int { return first; }");
    let f = &program.functions[0];
    assert_eq!(f.params.len(), 1);
    assert_eq!(f.rest_param.as_deref(), Some("rest"));
}

#[test]
fn scenario_a_full_shape() {
    // `let x = 2 + 3 * 4;` has initializer Binary(+, 2, Binary(*, 3, 4)).
    let program = parse_ok(
        "#pragma paradigm hybrid\nfn main() -> int { let x = 2 + 3 * 4; return x; }",
    );
    let Stmt::VarDecl(decl) = &program.functions[0].body[0] else {
        panic!("expected var decl");
    };
    let Some(Expr::Binary { op, left, right, .. }) = &decl.initializer else {
        panic!("expected binary initializer");
    };
    assert_eq!(op, "+");
    assert_eq!(**left, Expr::Number(2.0));
    match &**right {
        Expr::Binary { op, left, right, .. } => {
            assert_eq!(op, "*");
            assert_eq!(**left, Expr::Number(3.0));
            assert_eq!(**right, Expr::Number(4.0));
        }
        other => panic!("unexpected {other:?}"),
    }
}
