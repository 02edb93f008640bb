//! Auto-pattern expansion.
//!
//! `autopattern ProblemKind ClassName;` is a parser-time rewrite: the
//! problem keyword is categorized against a fixed table into one of the
//! known design patterns, and a class skeleton (properties plus method
//! stubs) is synthesized for it. The table and the generated member
//! sets are part of the language contract - user code compiles against
//! the generated members, so both the keyword matching (first match in
//! table order wins) and the skeletons must stay stable.
//!
//! Pattern families:
//!
//! - creational: Singleton, AbstractFactory, Builder, Factory, Prototype
//! - structural: Adapter, Bridge, Composite, Decorator, Facade,
//!   Flyweight, Proxy
//! - behavioral: ChainOfResponsibility, Command, Iterator, Mediator,
//!   Memento, Observer, State, Strategy, TemplateMethod, Visitor,
//!   Interpreter
//! - functional: Monad, Functor, Applicative, Monoid, Foldable,
//!   Traversable, Lens, Either, Maybe, StateMonad, Reader, Writer, IO,
//!   Free, Continuation, Comonad, Zipper, Church, AlgebraicEffect,
//!   Morphism
//!
//! Unmatched problem kinds default to Factory.

use lppc_util::Span;

use crate::ast::{ClassDecl, Expr, Function, Param, Stmt};

/// Categorize a problem keyword into a pattern name.
///
/// First match wins, in the fixed order below; some keywords appear in
/// several lists and resolve to the earlier pattern (`Config` is
/// Singleton, `Traverse` is Iterator, `Extend` is Decorator, `Handler`
/// is ChainOfResponsibility, `Effect` is IO, `Lambda` is Church).
///
/// # Examples
///
/// ```
/// use lppc_par::autopattern::resolve_pattern;
///
/// assert_eq!(resolve_pattern("NotifyListeners"), "Observer");
/// assert_eq!(resolve_pattern("ConfigStore"), "Singleton");
/// assert_eq!(resolve_pattern("Widget"), "Factory");
/// ```
pub fn resolve_pattern(problem: &str) -> &'static str {
    let has = |kw: &str| problem.contains(kw);

    // ==================== CREATIONAL PATTERNS (5) ====================
    if has("Singleton") || has("Config") || has("Settings") || has("Global") {
        "Singleton"
    } else if has("AbstractFactory") || has("FamilyOf") {
        "AbstractFactory"
    } else if has("Builder") || has("Construct") || has("StepByStep") {
        "Builder"
    } else if has("Factory") || has("Create") || has("Instantiate") {
        "Factory"
    } else if has("Prototype") || has("Clone") || has("Copy") {
        "Prototype"
    }
    // ==================== STRUCTURAL PATTERNS (7) ====================
    else if has("Adapter") || has("Wrapper") || has("Convert") {
        "Adapter"
    } else if has("Bridge") || has("Decouple") || has("Abstraction") {
        "Bridge"
    } else if has("Composite") || has("Tree") || has("Hierarchy") {
        "Composite"
    } else if has("Decorator") || has("Enhance") || has("Extend") {
        "Decorator"
    } else if has("Facade") || has("Simplify") || has("Unified") {
        "Facade"
    } else if has("Flyweight") || has("Shared") || has("Pool") {
        "Flyweight"
    } else if has("Proxy") || has("Surrogate") || has("Placeholder") {
        "Proxy"
    }
    // ==================== BEHAVIORAL PATTERNS (11) ====================
    else if has("Chain") || has("Handler") || has("Request") {
        "ChainOfResponsibility"
    } else if has("Command") || has("Action") || has("Execute") {
        "Command"
    } else if has("Iterator") || has("Traverse") || has("Collection") {
        "Iterator"
    } else if has("Mediator") || has("Coordinate") || has("Central") {
        "Mediator"
    } else if has("Memento") || has("Snapshot") || has("Undo") {
        "Memento"
    } else if has("Observer") || has("Notify") || has("Event") || has("Subscribe") {
        "Observer"
    } else if has("State") || has("Context") || has("Mode") {
        "State"
    } else if has("Strategy") || has("Algorithm") || has("Policy") {
        "Strategy"
    } else if has("Template") || has("Skeleton") || has("Hook") {
        "TemplateMethod"
    } else if has("Visitor") || has("Operation") || has("Element") {
        "Visitor"
    } else if has("Interpreter") || has("Grammar") || has("Language") {
        "Interpreter"
    }
    // ==================== FUNCTIONAL PATTERNS (20) ====================
    else if has("Monad") || has("Compose") || has("Bind") || has("FlatMap") {
        "Monad"
    } else if has("Functor") || has("Mappable") || has("Transform") {
        "Functor"
    } else if has("Applicative") || has("Apply") || has("Lift") {
        "Applicative"
    } else if has("Monoid") || has("Combine") || has("Concat") || has("Semigroup") {
        "Monoid"
    } else if has("Foldable") || has("Reduce") || has("Fold") {
        "Foldable"
    } else if has("Traversable") || has("Traverse") || has("Sequence") {
        "Traversable"
    } else if has("Lens") || has("Optic") || has("Focus") || has("View") {
        "Lens"
    } else if has("Either") || has("Result") || has("LeftRight") {
        "Either"
    } else if has("Maybe") || has("Option") || has("Optional") || has("Some") {
        "Maybe"
    } else if has("StateMonad") || has("StateFn") || has("ImmutableState") {
        "StateMonad"
    } else if has("Reader") || has("Environment") || has("Dependency") {
        "Reader"
    } else if has("Writer") || has("Logger") || has("Log") {
        "Writer"
    } else if has("IO") || has("Effect") || has("SideEffect") {
        "IO"
    } else if has("Free") || has("AST") || has("Program") {
        "Free"
    } else if has("Continuation") || has("CPS") || has("Callback") {
        "Continuation"
    } else if has("Comonad") || has("Extract") || has("Extend") {
        "Comonad"
    } else if has("Zipper") || has("Cursor") || has("Navigate") {
        "Zipper"
    } else if has("Church") || has("Encoding") || has("Lambda") {
        "Church"
    } else if has("Algebraic") || has("Effect") || has("Handler") {
        "AlgebraicEffect"
    } else if has("Catamorphism") || has("Anamorphism") || has("Unfold") || has("Recursion") {
        "Morphism"
    } else {
        // Default when no keyword matches.
        "Factory"
    }
}

fn prop(name: &str, ty: &str) -> Param {
    Param::new(name, ty)
}

fn method(name: &str, params: Vec<Param>, ret: &str) -> Function {
    Function::new(name, params, ret, Vec::new())
}

fn method_with_body(name: &str, params: Vec<Param>, ret: &str, body: Vec<Stmt>) -> Function {
    Function::new(name, params, ret, body)
}

/// Expand an `autopattern` declaration into its class skeleton.
///
/// # Examples
///
/// ```
/// use lppc_par::autopattern::expand_auto_pattern;
///
/// let class = expand_auto_pattern("Observer", "News");
/// assert_eq!(class.design_pattern.as_deref(), Some("Observer"));
/// assert!(class.properties.iter().any(|p| p.name == "observers"));
/// assert!(class.methods.iter().any(|m| m.name == "attach"));
/// assert!(class.methods.iter().any(|m| m.name == "notify"));
/// ```
pub fn expand_auto_pattern(problem: &str, class_name: &str) -> ClassDecl {
    let pattern = resolve_pattern(problem);

    let mut properties = Vec::new();
    let mut methods = Vec::new();

    match pattern {
        // ==================== CREATIONAL ====================
        "Singleton" => {
            properties.push(prop("instance", &format!("{class_name}*")));
            methods.push(method_with_body(
                "getInstance",
                Vec::new(),
                &format!("{class_name}*"),
                vec![Stmt::Return(Some(Expr::ident("instance")))],
            ));
        }
        "Factory" => {
            properties.push(prop("products", "map<string, Product*>"));
            methods.push(method_with_body(
                "create",
                vec![prop("type", "string")],
                "Product*",
                vec![Stmt::Return(None)],
            ));
        }
        "AbstractFactory" => {
            properties.push(prop("factories", "map<string, Factory*>"));
            methods.push(method("createProductA", Vec::new(), "ProductA*"));
            methods.push(method("createProductB", Vec::new(), "ProductB*"));
        }
        "Builder" => {
            properties.push(prop("product", "Product*"));
            methods.push(method("buildPartA", Vec::new(), "void"));
            methods.push(method("getResult", Vec::new(), "Product*"));
        }
        "Prototype" => {
            methods.push(method("clone", Vec::new(), &format!("{class_name}*")));
        }

        // ==================== STRUCTURAL ====================
        "Adapter" => {
            properties.push(prop("adaptee", "Adaptee*"));
            methods.push(method("request", Vec::new(), "void"));
        }
        "Bridge" => {
            properties.push(prop("implementor", "Implementor*"));
            methods.push(method("operation", Vec::new(), "void"));
        }
        "Composite" => {
            properties.push(prop("children", "vector<Component*>"));
            methods.push(method("add", vec![prop("component", "Component*")], "void"));
            methods.push(method("operation", Vec::new(), "void"));
        }
        "Decorator" => {
            properties.push(prop("component", "Component*"));
            methods.push(method("operation", Vec::new(), "void"));
        }
        "Facade" => {
            properties.push(prop("subsystem1", "Subsystem1*"));
            properties.push(prop("subsystem2", "Subsystem2*"));
            methods.push(method("operation", Vec::new(), "void"));
        }
        "Flyweight" => {
            properties.push(prop("intrinsicState", "string"));
            properties.push(prop("pool", "map<string, Flyweight*>"));
            methods.push(method(
                "operation",
                vec![prop("extrinsicState", "string")],
                "void",
            ));
        }
        "Proxy" => {
            properties.push(prop("realSubject", "RealSubject*"));
            methods.push(method("request", Vec::new(), "void"));
        }

        // ==================== BEHAVIORAL ====================
        "ChainOfResponsibility" => {
            properties.push(prop("successor", "Handler*"));
            methods.push(method(
                "handleRequest",
                vec![prop("request", "Request*")],
                "void",
            ));
        }
        "Command" => {
            properties.push(prop("receiver", "Receiver*"));
            methods.push(method("execute", Vec::new(), "void"));
            methods.push(method("undo", Vec::new(), "void"));
        }
        "Iterator" => {
            properties.push(prop("collection", "Collection*"));
            properties.push(prop("current", "int"));
            methods.push(method("next", Vec::new(), "Item*"));
            methods.push(method("hasNext", Vec::new(), "bool"));
        }
        "Mediator" => {
            properties.push(prop("colleagues", "vector<Colleague*>"));
            methods.push(method(
                "notify",
                vec![prop("sender", "Colleague*"), prop("event", "string")],
                "void",
            ));
        }
        "Memento" => {
            properties.push(prop("state", "string"));
            methods.push(method("save", Vec::new(), "Memento*"));
            methods.push(method("restore", vec![prop("memento", "Memento*")], "void"));
        }
        "Observer" => {
            properties.push(prop("observers", "vector<Observer*>"));
            methods.push(method("attach", vec![prop("observer", "Observer*")], "void"));
            methods.push(method("notify", Vec::new(), "void"));
        }
        "State" => {
            properties.push(prop("state", "State*"));
            methods.push(method("handle", Vec::new(), "void"));
            methods.push(method("setState", vec![prop("newState", "State*")], "void"));
        }
        "Strategy" => {
            properties.push(prop("strategy", "Strategy*"));
            methods.push(method("execute", Vec::new(), "void"));
        }
        "TemplateMethod" => {
            methods.push(method("templateMethod", Vec::new(), "void"));
            methods.push(method("step1", Vec::new(), "void"));
            methods.push(method("step2", Vec::new(), "void"));
        }
        "Visitor" => {
            methods.push(method("visit", vec![prop("element", "Element*")], "void"));
        }
        "Interpreter" => {
            properties.push(prop("context", "Context*"));
            methods.push(method("interpret", Vec::new(), "void"));
        }

        // ==================== FUNCTIONAL ====================
        "Monad" => {
            properties.push(prop("value", "T"));
            methods.push(method(
                "bind",
                vec![prop("f", "function<Monad<U>(T)>")],
                "Monad<U>",
            ));
            methods.push(method("pure", vec![prop("x", "T")], "Monad<T>"));
        }
        "Functor" => {
            properties.push(prop("value", "T"));
            methods.push(method(
                "map",
                vec![prop("f", "function<U(T)>")],
                "Functor<U>",
            ));
        }
        "Applicative" => {
            properties.push(prop("value", "T"));
            methods.push(method(
                "apply",
                vec![prop("f", "Applicative<function<U(T)>>")],
                "Applicative<U>",
            ));
            methods.push(method("pure", vec![prop("x", "T")], "Applicative<T>"));
        }
        "Monoid" => {
            properties.push(prop("value", "T"));
            methods.push(method(
                "combine",
                vec![prop("other", "Monoid<T>")],
                "Monoid<T>",
            ));
            methods.push(method("empty", Vec::new(), "Monoid<T>"));
        }
        "Foldable" => {
            properties.push(prop("container", "Container<T>"));
            methods.push(method(
                "foldLeft",
                vec![prop("init", "U"), prop("f", "function<U(U, T)>")],
                "U",
            ));
            methods.push(method(
                "foldRight",
                vec![prop("init", "U"), prop("f", "function<U(T, U)>")],
                "U",
            ));
        }
        "Traversable" => {
            properties.push(prop("container", "Container<T>"));
            methods.push(method(
                "traverse",
                vec![prop("f", "function<Applicative<U>(T)>")],
                "Applicative<Container<U>>",
            ));
            methods.push(method("sequence", Vec::new(), "Applicative<Container<T>>"));
        }
        "Lens" => {
            properties.push(prop("getter", "function<T(S)>"));
            properties.push(prop("setter", "function<S(S, T)>"));
            methods.push(method("view", vec![prop("s", "S")], "T"));
            methods.push(method("set", vec![prop("s", "S"), prop("t", "T")], "S"));
            methods.push(method(
                "over",
                vec![prop("s", "S"), prop("f", "function<T(T)>")],
                "S",
            ));
        }
        "Either" => {
            properties.push(prop("value", "variant<L, R>"));
            properties.push(prop("isLeft", "bool"));
            methods.push(method("left", vec![prop("l", "L")], "Either<L, R>"));
            methods.push(method("right", vec![prop("r", "R")], "Either<L, R>"));
            methods.push(method(
                "fold",
                vec![
                    prop("onLeft", "function<T(L)>"),
                    prop("onRight", "function<T(R)>"),
                ],
                "T",
            ));
        }
        "Maybe" => {
            properties.push(prop("value", "optional<T>"));
            methods.push(method("just", vec![prop("x", "T")], "Maybe<T>"));
            methods.push(method("nothing", Vec::new(), "Maybe<T>"));
            methods.push(method("getOrElse", vec![prop("defaultValue", "T")], "T"));
        }
        "StateMonad" => {
            properties.push(prop("runState", "function<pair<A, S>(S)>"));
            methods.push(method(
                "bind",
                vec![prop("f", "function<State<B, S>(A)>")],
                "State<B, S>",
            ));
            methods.push(method("get", Vec::new(), "State<S, S>"));
            methods.push(method("put", vec![prop("newState", "S")], "State<void, S>"));
        }
        "Reader" => {
            properties.push(prop("runReader", "function<A(R)>"));
            methods.push(method("ask", Vec::new(), "Reader<R, R>"));
            methods.push(method(
                "local",
                vec![prop("f", "function<R(R)>")],
                "Reader<R, A>",
            ));
        }
        "Writer" => {
            properties.push(prop("value", "A"));
            properties.push(prop("log", "W"));
            methods.push(method("tell", vec![prop("msg", "W")], "Writer<void, W>"));
            methods.push(method("listen", Vec::new(), "Writer<pair<A, W>, W>"));
        }
        "IO" => {
            properties.push(prop("action", "function<A()>"));
            methods.push(method("unsafePerformIO", Vec::new(), "A"));
            methods.push(method(
                "bind",
                vec![prop("f", "function<IO<B>(A)>")],
                "IO<B>",
            ));
        }
        "Free" => {
            properties.push(prop("tree", "variant<Pure<A>, Impure<F, Free<F, A>>>"));
            methods.push(method("pure", vec![prop("a", "A")], "Free<F, A>"));
            methods.push(method("impure", vec![prop("f", "F<Free<F, A>>")], "Free<F, A>"));
            methods.push(method(
                "interpret",
                vec![prop("interpreter", "function<M<A>(F<A>)>")],
                "M<A>",
            ));
        }
        "Continuation" => {
            properties.push(prop("runCont", "function<R(function<R(A)>)>"));
            methods.push(method(
                "callCC",
                vec![prop("f", "function<Cont<R, A>(function<Cont<R, B>(A)>)>")],
                "Cont<R, A>",
            ));
            methods.push(method(
                "bind",
                vec![prop("f", "function<Cont<R, B>(A)>")],
                "Cont<R, B>",
            ));
        }
        "Comonad" => {
            properties.push(prop("value", "W<A>"));
            methods.push(method("extract", Vec::new(), "A"));
            methods.push(method(
                "extend",
                vec![prop("f", "function<B(W<A>)>")],
                "W<B>",
            ));
            methods.push(method("duplicate", Vec::new(), "W<W<A>>"));
        }
        "Zipper" => {
            properties.push(prop("left", "vector<T>"));
            properties.push(prop("focus", "T"));
            properties.push(prop("right", "vector<T>"));
            methods.push(method("moveLeft", Vec::new(), "Zipper<T>"));
            methods.push(method("moveRight", Vec::new(), "Zipper<T>"));
            methods.push(method(
                "update",
                vec![prop("f", "function<T(T)>")],
                "Zipper<T>",
            ));
        }
        "Church" => {
            properties.push(prop(
                "churchEncoding",
                "function<R(function<R(A)>, function<R()>)>",
            ));
            methods.push(method(
                "fold",
                vec![
                    prop("onValue", "function<R(A)>"),
                    prop("onEmpty", "function<R()>"),
                ],
                "R",
            ));
            methods.push(method("encode", vec![prop("value", "A")], "Church<A>"));
        }
        "AlgebraicEffect" => {
            properties.push(prop("effect", "Effect"));
            properties.push(prop("handler", "function<A(Effect)>"));
            methods.push(method("perform", vec![prop("eff", "Effect")], "A"));
            methods.push(method(
                "handle",
                vec![prop("h", "function<B(Effect)>")],
                "B",
            ));
        }
        "Morphism" => {
            properties.push(prop("algebra", "function<A(F<A>)>"));
            properties.push(prop("coalgebra", "function<F<A>(A)>"));
            methods.push(method(
                "cata",
                vec![prop("alg", "function<A(F<A>)>"), prop("structure", "Fix<F>")],
                "A",
            ));
            methods.push(method(
                "ana",
                vec![prop("coalg", "function<F<A>(A)>"), prop("seed", "A")],
                "Fix<F>",
            ));
            methods.push(method(
                "hylo",
                vec![
                    prop("alg", "function<B(F<B>)>"),
                    prop("coalg", "function<F<A>(A)>"),
                    prop("seed", "A"),
                ],
                "B",
            ));
        }
        _ => unreachable!("resolve_pattern only returns known patterns"),
    }

    ClassDecl {
        name: class_name.to_string(),
        base: None,
        properties,
        methods,
        constructor: None,
        design_pattern: Some(pattern.to_string()),
        span: Span::DUMMY,
    }
}
