//! Lexer throughput benchmark.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lppc_lex::Lexer;

fn sample_program() -> String {
    let unit = r#"
fn fib(n: int) -> int {
    let a = 0;
    let b = 1;
    for (let i = 0; i < n; i++) {
        let t = a + b;
        a = b;
        b = t;
    }
    return a;
}

fn pipeline_demo() -> int {
    let xs = [1, 2, 3, 4, 5];
    let doubled = xs @ (x -> x * 2);
    let total = doubled \ ((acc, x) -> acc + x);
    return total |> inc |> double;
}
"#;
    let mut src = String::from("#pragma paradigm hybrid\n");
    for _ in 0..64 {
        src.push_str(unit);
    }
    src
}

fn bench_tokenize(c: &mut Criterion) {
    let source = sample_program();
    c.bench_function("tokenize_64_units", |b| {
        b.iter(|| Lexer::tokenize(black_box(&source)))
    });
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
