//! Driver-level behavior for the three static error classes: each aborts before evaluation ever
//! starts and maps to exit code 65.
fn exit_code(source: &str) -> i32 {
    let mut out = Vec::new();
    lox::run_source(source, &mut out)
        .expect_err("source should fail before evaluation")
        .exit_code()
}

#[test]
fn unterminated_string_is_a_lex_error() {
    assert_eq!(exit_code("print \"oops;"), 65);
}

#[test]
fn missing_semicolon_is_a_parse_error() {
    assert_eq!(exit_code("print 1"), 65);
}

#[test]
fn reading_a_variable_in_its_own_initializer_is_a_resolve_error() {
    assert_eq!(exit_code("{ var a = a; }"), 65);
}

#[test]
fn invalid_assignment_target_is_a_parse_error() {
    assert_eq!(exit_code("1 = 2;"), 65);
}

#[test]
fn runtime_error_exits_70() {
    let mut out = Vec::new();
    let err = lox::run_source("print nil + 1;", &mut out).expect_err("nil + number should fail at runtime");
    assert_eq!(err.exit_code(), 70);
}
