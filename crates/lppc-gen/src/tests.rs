//! Emitter tests: the lowering table, scenario shapes, and the
//! preamble invariant.

use lppc_lex::Lexer;
use lppc_par::parse;

use crate::preamble::PREAMBLE;
use crate::Transpiler;

fn transpile_src(source: &str) -> String {
    let (program, diags) = parse(Lexer::tokenize(source));
    assert!(diags.is_empty(), "parse errors: {diags:?}");
    Transpiler::new().transpile(&program).expect("emit")
}

fn transpile_body(body: &str) -> String {
    transpile_src(&format!(
        "#pragma paradigm hybrid\nfn main() -> int {{ {body} }}"
    ))
}

// ── Preamble ───────────────────────────────────────────────────────────

#[test]
fn preamble_is_byte_identical_across_inputs() {
    let a = transpile_src("#pragma paradigm hybrid\nfn a() -> int { return 1; }");
    let b = transpile_src("#pragma paradigm oop\nclass C { x: int; }");
    assert!(a.starts_with(PREAMBLE));
    assert!(b.starts_with(PREAMBLE));
    assert_eq!(&a[..PREAMBLE.len()], &b[..PREAMBLE.len()]);
}

// ── Scenario shapes ────────────────────────────────────────────────────

#[test]
fn scenario_a_arithmetic() {
    let cpp = transpile_body("let x = 2 + 3 * 4; return x;");
    assert!(cpp.contains("int x = (2 + (3 * 4));"), "{cpp}");
}

#[test]
fn scenario_d_range() {
    let cpp = transpile_body("let r = 0..5..1; return 0;");
    assert!(cpp.contains("std::vector<int> __range"), "{cpp}");
    assert!(cpp.contains("int __start = 0"), "{cpp}");
    assert!(cpp.contains("int __end = 5"), "{cpp}");
    assert!(cpp.contains("int __step = 1"), "{cpp}");
    assert!(cpp.contains("if (__step > 0)"), "{cpp}");
}

#[test]
fn scenario_e_pipeline() {
    let cpp = transpile_body("return 5 |> inc |> double;");
    assert!(cpp.contains("double(inc(5))"), "{cpp}");
}

#[test]
fn scenario_f_autopattern_observer() {
    let cpp = transpile_src("#pragma paradigm oop\nautopattern Observer News;");
    assert!(cpp.contains("class News {"), "{cpp}");
    assert!(cpp.contains("vector<Observer*> observers;"), "{cpp}");
    assert!(cpp.contains("void attach(Observer* observer)"), "{cpp}");
    assert!(cpp.contains("void notify()"), "{cpp}");
    assert!(cpp.contains("LPP_PATTERN_OBSERVER(News)"), "{cpp}");
    assert!(cpp.contains("#include \"lpp_patterns.hpp\""), "{cpp}");
}

// ── Expression lowerings ───────────────────────────────────────────────

#[test]
fn ternary_if() {
    let cpp = transpile_body("return ?1 > 0 -> 2 $ 3;");
    assert!(cpp.contains("((1 > 0) ? 2 : 3)"), "{cpp}");
}

#[test]
fn composition_is_an_iife() {
    let cpp = transpile_body("let f = mul2 . add5; return f(10);");
    assert!(
        cpp.contains("[]( auto __x ) { return mul2(add5(__x)); }"),
        "{cpp}"
    );
}

#[test]
fn template_literal_concatenates() {
    let cpp = transpile_body("let s = `total ${n}`; return 0;");
    assert!(cpp.contains("std::string(\"total\")"), "{cpp}");
    assert!(cpp.contains("std::to_string(__val)"), "{cpp}");
}

#[test]
fn map_filter_reduce_are_iifes() {
    let cpp = transpile_body(
        "let a = xs @ (x -> x * 2); let b = xs ? |x| x > 1; let c = xs \\ |acc, x| acc + x; return 0;",
    );
    assert!(cpp.contains("__result.push_back((")); // map/filter bodies
    assert!(cpp.contains("__acc = ("), "{cpp}");
}

#[test]
fn iterate_forms() {
    let cpp = transpile_body("let a = 0 !!< 5; let b = 10 !!> 5; return 0;");
    assert!(cpp.contains("while (__current < __limit)"), "{cpp}");
    assert!(cpp.contains("while (__current > __limit)"), "{cpp}");
}

#[test]
fn list_comprehension() {
    let cpp = transpile_body("let xs = [x * 2 | x in 0..10, x > 3]; return 0;");
    assert!(cpp.contains("__comp_0"), "{cpp}");
    assert!(cpp.contains("for (auto x = 0; x <= 10; ++x)"), "{cpp}");
    assert!(cpp.contains("if ((x > 3))"), "{cpp}");
}

#[test]
fn array_with_spread_uses_insert() {
    let cpp = transpile_body("let xs = [1, ...rest, 2]; return 0;");
    assert!(cpp.contains("__arr.insert(__arr.end(), ("), "{cpp}");
    assert!(cpp.contains("__arr.push_back(2)"), "{cpp}");
}

#[test]
fn tuples_and_destructuring() {
    let cpp = transpile_body("let t = (1, 2, 3); let (a, b, c) = t; return a;");
    assert!(cpp.contains("std::make_tuple(1, 2, 3)"), "{cpp}");
    assert!(cpp.contains("auto a = std::get<0>(__tuple_tmp);"), "{cpp}");
    assert!(cpp.contains("auto c = std::get<2>(__tuple_tmp);"), "{cpp}");
}

#[test]
fn array_and_object_destructuring() {
    let cpp = transpile_body("let [a, b] = arr; let {x, y} = obj; return 0;");
    assert!(cpp.contains("auto a = __tmp[0];"), "{cpp}");
    assert!(cpp.contains("auto x = __tmp[\"x\"];"), "{cpp}");
}

#[test]
fn match_lowers_to_if_chain() {
    let cpp = transpile_body("return match n { case 1 -> 10; case 2 -> 20; };");
    assert!(cpp.contains("auto __match_0 = n;"), "{cpp}");
    assert!(cpp.contains("if (__match_0 == 1) { return 10; }"), "{cpp}");
    assert!(cpp.contains("else if (__match_0 == 2) { return 20; }"), "{cpp}");
}

#[test]
fn cast_await_typeof_instanceof() {
    let cpp = transpile_body(
        "let a = x as int; let b = await fut; let c = typeof a; let d = p instanceof Widget; return 0;",
    );
    assert!(cpp.contains("static_cast<int>(x)"), "{cpp}");
    assert!(cpp.contains("(fut).get()"), "{cpp}");
    assert!(cpp.contains("typeid(a).name()"), "{cpp}");
    assert!(cpp.contains("dynamic_cast<Widget*>(p) != nullptr"), "{cpp}");
}

#[test]
fn nullish_and_optional_chaining() {
    let cpp = transpile_body("let a = p ?? q; let b = p?.name; return 0;");
    assert!(cpp.contains("std::is_pointer_v<decltype(__tmp)>"), "{cpp}");
    assert!(cpp.contains("__obj != nullptr ? __obj->name : nullptr"), "{cpp}");
}

// ── Statement lowerings ────────────────────────────────────────────────

#[test]
fn typed_var_decls() {
    let cpp = transpile_body(
        "let a: int[10]; let b: int[]; let c: float?; let d: int | string; return 0;",
    );
    assert!(cpp.contains("std::array<int, 10> a;"), "{cpp}");
    assert!(cpp.contains("std::vector<int> b;"), "{cpp}");
    assert!(cpp.contains("std::optional<double> c;"), "{cpp}");
    assert!(cpp.contains("std::variant<int, std::string> d;"), "{cpp}");
}

#[test]
fn control_flow_statements() {
    let cpp = transpile_body(
        "if (x > 0) { y = 1; } else { y = 2; } while (y < 5) { y++; } do { y--; } while (y > 0); return y;",
    );
    assert!(cpp.contains("if ((x > 0)) {"), "{cpp}");
    assert!(cpp.contains("} else {"), "{cpp}");
    assert!(cpp.contains("while ((y < 5)) {"), "{cpp}");
    assert!(cpp.contains("} while ((y > 0));"), "{cpp}");
}

#[test]
fn classic_for_and_for_in() {
    let cpp = transpile_body("for (let i = 0; i < 3; i++) { print(i); } for (v in xs) { print(v); } return 0;");
    assert!(cpp.contains("for (int i = 0; (i < 3); i++) {"), "{cpp}");
    assert!(cpp.contains("for (auto v : xs) {"), "{cpp}");
}

#[test]
fn try_catch_finally() {
    let cpp = transpile_body("try { risky(); } catch (e) { print(1); } finally { print(2); } return 0;");
    assert!(cpp.contains("} catch (const std::exception& e) {"), "{cpp}");
    // The finally block survives as an unguarded scope.
    assert!(cpp.contains("print(2);"), "{cpp}");
}

#[test]
fn switch_with_guard() {
    let cpp = transpile_body("switch (n) { case 1 when n > 0: break; default: break; } return 0;");
    assert!(cpp.contains("case 1:"), "{cpp}");
    assert!(cpp.contains("if ((n > 0)) {"), "{cpp}");
    assert!(cpp.contains("default:"), "{cpp}");
}

#[test]
fn enums_and_imports() {
    let cpp = transpile_src(
        "#pragma paradigm hybrid\nimport { a } from \"utils\";\nfn f() -> int { enum Color { Red, Green = 5, Blue } return 0; }",
    );
    assert!(cpp.contains("#include \"utils.hpp\""), "{cpp}");
    assert!(cpp.contains("Red = 0,"), "{cpp}");
    assert!(cpp.contains("Green = 5,"), "{cpp}");
    assert!(cpp.contains("Blue = 6"), "{cpp}");
}

// ── Declarations ───────────────────────────────────────────────────────

#[test]
fn async_function_wraps_in_std_async() {
    let cpp = transpile_src("#pragma paradigm hybrid\nasync fn work() -> int { return 7; }");
    assert!(cpp.contains("std::future<int> work() {"), "{cpp}");
    assert!(
        cpp.contains("return std::async(std::launch::async, [&]() {"),
        "{cpp}"
    );
}

#[test]
fn rest_parameter_macro_scaffolding() {
    let cpp =
        transpile_src("#pragma paradigm hybrid\nfn sum(...rest) -> int { return 0; }");
    assert!(cpp.contains("template<typename... RestArgs>"), "{cpp}");
    assert!(cpp.contains("RestArgs... rest"), "{cpp}");
    assert!(cpp.contains("auto __rest_vec_rest_sum_0 = std::vector{rest...};"), "{cpp}");
    assert!(cpp.contains("#define rest __LPP_REST_rest_sum_0"), "{cpp}");
    assert!(cpp.contains("#undef rest"), "{cpp}");
    assert!(cpp.contains("#undef __LPP_REST_rest_sum_0"), "{cpp}");
}

#[test]
fn generic_function_gets_template_header() {
    let cpp = transpile_src(
        "#pragma paradigm hybrid\nfn identity<T>(x: T) -> T { return x; }",
    );
    assert!(cpp.contains("template<typename T>"), "{cpp}");
    assert!(cpp.contains("T identity(T x) {"), "{cpp}");
}

#[test]
fn generator_function_is_marked() {
    let cpp = transpile_src("#pragma paradigm hybrid\nfn g() -> int { yield 1; yield 2; }");
    assert!(cpp.contains("/* generator */ int g("), "{cpp}");
    assert!(cpp.contains("co_yield 1;"), "{cpp}");
}

#[test]
fn interface_lowers_to_abstract_class() {
    let cpp = transpile_src(
        "#pragma paradigm oop\ninterface Shape { area() -> float; name() -> string; }",
    );
    assert!(cpp.contains("class Shape {"), "{cpp}");
    assert!(cpp.contains("virtual ~Shape() = default;"), "{cpp}");
    assert!(cpp.contains("virtual double area() = 0;"), "{cpp}");
    assert!(cpp.contains("virtual std::string name() = 0;"), "{cpp}");
}

#[test]
fn adt_lowers_to_variant() {
    let cpp = transpile_src("#pragma paradigm hybrid\ntype Shape = Circle(float) | Square(float);");
    assert!(cpp.contains("struct Circle {"), "{cpp}");
    assert!(cpp.contains("double _0;"), "{cpp}");
    assert!(cpp.contains("using Shape = std::variant<"), "{cpp}");
}

#[test]
fn generic_adt_gets_template_alias() {
    let cpp = transpile_src("#pragma paradigm hybrid\ntype Option<T> = Some(T) | None;");
    assert!(cpp.contains("template<typename T>"), "{cpp}");
    assert!(cpp.contains("using Option = std::variant<"), "{cpp}");
    assert!(cpp.contains("Some<T>,"), "{cpp}");
    assert!(cpp.contains("None"), "{cpp}");
}

#[test]
fn class_with_inheritance_and_constructor() {
    let cpp = transpile_src(
        "#pragma paradigm oop\nclass Dog extends Animal { let name: string; constructor(name: string) { print(name); } fn speak() -> void { print(name); } }",
    );
    assert!(cpp.contains("class Dog : public Animal {"), "{cpp}");
    assert!(cpp.contains("std::string name;"), "{cpp}");
    assert!(cpp.contains("Dog(std::string name) {"), "{cpp}");
    assert!(cpp.contains("void speak() {"), "{cpp}");
}

#[test]
fn quantum_declarations_and_methods() {
    let cpp = transpile_body(
        "quantum let q = [1, 2, 3]; quantum let w = {1: 1, 2: 3}; let v = q.observe(); let e = entangle(q, (x -> x * 2)); return v;",
    );
    assert!(cpp.contains("QuantumVar<int> q({1, 2, 3});"), "{cpp}");
    assert!(cpp.contains("QuantumVar<int> w({1, 2}, {0.25, 0.75});"), "{cpp}");
    assert!(cpp.contains("q.observe()"), "{cpp}");
    assert!(cpp.contains("q.entangle("), "{cpp}");
}

#[test]
fn unique_names_across_matches_and_comprehensions() {
    let cpp = transpile_body(
        "let a = match x { case 1 -> 1; }; let b = match y { case 2 -> 2; }; return 0;",
    );
    assert!(cpp.contains("__match_0"), "{cpp}");
    assert!(cpp.contains("__match_1"), "{cpp}");
}

#[test]
fn string_escapes_in_output() {
    let cpp = transpile_body(r#"let s = "line\nquote\"end"; return 0;"#);
    assert!(cpp.contains(r#""line\nquote\"end""#), "{cpp}");
}
