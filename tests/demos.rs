//! One integration test per example program under `demos/`, driving the public `run_source`
//! entry point with a captured in-memory writer and asserting on the exact stdout produced.
use std::fs;

fn run(path: &str) -> String {
    let source = fs::read_to_string(path).unwrap_or_else(|e| panic!("reading {path}: {e}"));
    let mut out = Vec::new();
    lox::run_source(&source, &mut out).unwrap_or_else(|e| panic!("running {path}: {e}"));
    String::from_utf8(out).expect("lox only ever writes utf8 to stdout")
}

#[test]
fn arithmetic() {
    assert_eq!(run("demos/arithmetic.lox"), "7\n");
}

#[test]
fn counter_closure() {
    assert_eq!(run("demos/counter.lox"), "1\n2\n3\n");
}

#[test]
fn static_scope() {
    assert_eq!(run("demos/static_scope.lox"), "global\nglobal\n");
}

#[test]
fn inheritance() {
    assert_eq!(run("demos/inheritance.lox"), "A\nB\n");
}

#[test]
fn initializer() {
    assert_eq!(run("demos/initializer.lox"), "42\n");
}

#[test]
fn fibonacci() {
    assert_eq!(run("demos/fibonacci.lox"), "0\n1\n1\n2\n3\n5\n8\n13\n");
}

#[test]
fn type_error_aborts_with_a_runtime_error() {
    let source = fs::read_to_string("demos/type_error.lox").expect("reading demos/type_error.lox");
    let mut out = Vec::new();
    let err = lox::run_source(&source, &mut out).expect_err("adding a string and a number should fail");
    assert_eq!(err.exit_code(), 70);
    assert!(err.to_string().contains("Operands must be"));
}
