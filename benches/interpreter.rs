//! Interpreter benchmarks for itlang.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use itlang::interpreter::Interpreter;
use itlang::lexer::Scanner;
use itlang::parser::Parser;
use std::fs;

/// Run an itlang program from source code.
fn run_program(source: &str) {
    let tokens = Scanner::new(source).scan_tokens().expect("lexer error");
    let mut parser = Parser::new(tokens);
    let program = parser.parse().expect("parser error");

    let mut interpreter = Interpreter::with_output(std::io::sink());
    interpreter.interpret(&program).expect("runtime error");
}

fn load_program(name: &str) -> String {
    let path = format!("benches/programs/{}.it", name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("failed to read {}", path))
}

fn fibonacci_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("fibonacci");
    let source = load_program("fib_recursive");

    group.bench_function("recursive_fib18", |b| {
        b.iter(|| run_program(black_box(&source)))
    });

    group.finish();
}

fn loop_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("loops");
    let sum = load_program("loop_sum");
    let higher_order = load_program("higher_order");

    group.bench_function("sum_10000", |b| b.iter(|| run_program(black_box(&sum))));
    group.bench_function("higher_order_2000", |b| {
        b.iter(|| run_program(black_box(&higher_order)))
    });

    group.finish();
}

/// Benchmark lexing and parsing only (no execution).
fn parsing_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    let source = load_program("fib_recursive").repeat(50);

    group.bench_function("parse_fib_x50", |b| {
        b.iter(|| {
            let tokens = Scanner::new(black_box(&source)).scan_tokens().unwrap();
            let mut parser = Parser::new(tokens);
            parser.parse().unwrap()
        })
    });

    group.finish();
}

/// Parameterized fibonacci benchmark for different N values.
fn fibonacci_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("fib_scaling");

    for n in [10, 15, 20].iter() {
        let source = format!(
            r#"
let fib = fn(n) {{
    if (n <= 1) {{
        return n;
    }}
    return fib(n - 1) + fib(n - 2);
}};
let result = fib({});
"#,
            n
        );

        group.bench_with_input(BenchmarkId::new("recursive", n), &source, |b, src| {
            b.iter(|| run_program(black_box(src)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    fibonacci_benchmarks,
    loop_benchmarks,
    parsing_benchmarks,
    fibonacci_scaling,
);

criterion_main!(benches);
