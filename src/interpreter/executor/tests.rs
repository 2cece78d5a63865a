use pretty_assertions::assert_eq;

use crate::error::RuntimeError;
use crate::interpreter::executor::MAX_CALL_DEPTH;
use crate::interpreter::{ControlFlow, Interpreter, Value};
use crate::lexer::Scanner;
use crate::parser::Parser;

fn program(source: &str) -> crate::ast::Program {
    let tokens = Scanner::new(source).scan_tokens().unwrap();
    Parser::new(tokens).parse().unwrap()
}

fn eval(source: &str) -> Value {
    Interpreter::with_output(Vec::new())
        .interpret(&program(source))
        .unwrap()
}

fn eval_err(source: &str) -> RuntimeError {
    Interpreter::with_output(Vec::new())
        .interpret(&program(source))
        .unwrap_err()
}

fn eval_with_output(source: &str) -> (Value, String) {
    let mut interpreter = Interpreter::with_output(Vec::new());
    let value = interpreter.interpret(&program(source)).unwrap();
    let output = String::from_utf8(interpreter.into_output()).unwrap();
    (value, output)
}

#[test]
fn test_precedence() {
    assert_eq!(eval("1+2*3;"), Value::Int(7));
    assert_eq!(eval("(1+2)*3;"), Value::Int(9));
    assert_eq!(eval("1+2+3+4==4+3+2+1;"), Value::Bool(true));
    assert_eq!(eval("!false==true;"), Value::Bool(true));
    assert_eq!(eval("-1+2;"), Value::Int(1));
}

#[test]
fn test_floor_division() {
    assert_eq!(eval("50/20;"), Value::Int(2));
    assert_eq!(eval("-7/2;"), Value::Int(-4));
    assert_eq!(eval("20/(10-6);"), Value::Int(5));
}

#[test]
fn test_division_by_zero() {
    assert!(matches!(eval_err("1/0;"), RuntimeError::DivisionByZero(_)));
}

#[test]
fn test_overflow_is_an_error() {
    assert!(matches!(
        eval_err("9223372036854775807 + 1;"),
        RuntimeError::IntegerOverflow(_)
    ));
}

#[test]
fn test_equality_does_not_coerce() {
    assert!(matches!(eval_err("1==true;"), RuntimeError::TypeError { .. }));
    assert!(matches!(eval_err("1<false;"), RuntimeError::TypeError { .. }));
    assert!(matches!(eval_err("-true;"), RuntimeError::TypeError { .. }));
    assert!(matches!(eval_err("!1;"), RuntimeError::TypeError { .. }));
}

#[test]
fn test_null_is_not_an_operand() {
    let err = eval_err("let f = fn() { ; }; f() + 1;");
    match err {
        RuntimeError::TypeError { message, .. } => {
            assert_eq!(message, "cannot apply '+' to null and int")
        }
        other => panic!("Expected type error, got {other:?}"),
    }
}

#[test]
fn test_empty_statement_yields_null() {
    assert_eq!(eval("1;;"), Value::Null);
}

#[test]
fn test_nested_return_short_circuits() {
    assert_eq!(
        eval("if (10>1) { if(10>1) {return 10;} return 1; }"),
        Value::Int(10)
    );
    assert_eq!(eval("1; return 2;3;"), Value::Int(2));
}

#[test]
fn test_return_ends_loop() {
    assert_eq!(
        eval("let i = 0; while(true) {i=i+1; if (i==100){return i;}}"),
        Value::Int(100)
    );
    assert_eq!(eval("while(true){return 123;}return 321;"), Value::Int(123));
}

#[test]
fn test_while_counts() {
    assert_eq!(
        eval("let i = 0; let s = 0; while (i < 5) { i = i + 1; s = s + i; } s;"),
        Value::Int(15)
    );
}

#[test]
fn test_call_absorbs_return() {
    assert_eq!(
        eval("let add = fn(a,b) {return a+b;}; add(2,3);"),
        Value::Int(5)
    );
    assert_eq!(
        eval("let add = fn(a,b) {return a+b;}; let c = add(2,3); c * 2;"),
        Value::Int(10)
    );
}

#[test]
fn test_recursion() {
    assert_eq!(
        eval("let fa = fn(n) {if(n==0){return 1;}else{return fa(n-1)*n;}}; fa(6);"),
        Value::Int(720)
    );
}

#[test]
fn test_immediate_call() {
    assert_eq!(eval("fn(a, b) {return a*10+b;} (5,6);"), Value::Int(56));
    assert_eq!(eval("let a = 5; fn(b) {return a*10+b;} (6);"), Value::Int(56));
}

#[test]
fn test_functions_as_arguments() {
    assert_eq!(
        eval(
            "let a = 5; let f5 = fn(b) {return a*10+b;}; let b = 7; \
             let f7 = fn(d, f) {return b*100 + f(d);}; f7(6, f5);"
        ),
        Value::Int(756)
    );
    assert_eq!(
        eval("let max = fn(x,y) {if(x>y){return x;}else{return y;}}; max(5, 10);"),
        Value::Int(10)
    );
}

#[test]
fn test_call_without_return_yields_last_value() {
    assert_eq!(eval("let f = fn(x) { x * 2; }; f(4);"), Value::Int(8));
}

#[test]
fn test_arity_mismatch_binds_shorter_list() {
    assert_eq!(eval("let f = fn(a) { return a; }; f(1, 2);"), Value::Int(1));
    assert!(matches!(
        eval_err("let f = fn(a, b) { return b; }; f(1);"),
        RuntimeError::UndefinedVariable(..)
    ));
}

#[test]
fn test_arguments_see_earlier_parameters() {
    assert_eq!(eval("let f = fn(a, b) { return b; }; f(5, a);"), Value::Int(5));
    assert!(matches!(
        eval_err("let f = fn(a, b) { return a; }; f(b, 1);"),
        RuntimeError::UndefinedVariable(name, _) if name == "b"
    ));
}

#[test]
fn test_runaway_recursion_is_an_error() {
    let mut interpreter = Interpreter::with_output(Vec::new());
    let depth = interpreter.environment().depth();
    let err = interpreter
        .interpret(&program("let f = fn(n) { return f(n + 1); }; f(0);"))
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::StackOverflow {
            depth: MAX_CALL_DEPTH,
            ..
        }
    ));
    assert_eq!(interpreter.environment().depth(), depth);

    // The counter unwinds with the error, so the next run starts from zero.
    assert_eq!(
        interpreter
            .interpret(&program(
                "let g = fn(n) { if (n == 0) { return 0; } return g(n - 1); }; g(100);"
            ))
            .unwrap(),
        Value::Int(0)
    );
}

#[test]
fn test_dynamic_scoping() {
    // `g` sees the caller's `x`, not a captured one.
    assert_eq!(
        eval("let g = fn() { return x; }; let h = fn(x) { return g(); }; h(42);"),
        Value::Int(42)
    );
}

#[test]
fn test_redefinition_in_same_scope() {
    assert!(matches!(
        eval_err("let a = 1; let a = 2;"),
        RuntimeError::Redefinition(..)
    ));
    assert_eq!(eval("let a = 1; { let a = 2; a; }"), Value::Int(2));
}

#[test]
fn test_block_scope_is_popped() {
    assert!(matches!(
        eval_err("{ let a = 1; } a;"),
        RuntimeError::UndefinedVariable(..)
    ));
}

#[test]
fn test_assign_requires_binding() {
    assert!(matches!(
        eval_err("b = 1;"),
        RuntimeError::UndefinedVariable(..)
    ));
    assert_eq!(eval("let a = 1; { a = 3; } a;"), Value::Int(3));
}

#[test]
fn test_calling_non_function() {
    assert!(matches!(
        eval_err("let a = 1; a(2);"),
        RuntimeError::NotCallable("int", _)
    ));
}

#[test]
fn test_condition_must_be_bool() {
    assert!(matches!(
        eval_err("if (1) { 2; }"),
        RuntimeError::TypeError { .. }
    ));
    assert!(matches!(
        eval_err("while (0) { 2; }"),
        RuntimeError::TypeError { .. }
    ));
}

#[test]
fn test_println_writes_bound_arguments() {
    let (value, output) = eval_with_output("println(1+2); println(true); println(4, 5);");
    assert_eq!(output, "3\ntrue\n4\n");
    assert_eq!(value, Value::Int(4));
}

#[test]
fn test_println_output_follows_call_site_name() {
    // An alias of the builtin is silent.
    let (value, output) = eval_with_output("let p = println; p(7);");
    assert_eq!(output, "");
    assert_eq!(value, Value::Int(7));

    // A program function bound as `println` still prints what it binds.
    let (value, output) = eval_with_output("let println = fn(x) { return x + 1; }; println(1);");
    assert_eq!(output, "1\n");
    assert_eq!(value, Value::Int(2));
}

#[test]
fn test_frames_restored_after_error() {
    let mut interpreter = Interpreter::with_output(Vec::new());
    let depth = interpreter.environment().depth();
    assert!(interpreter
        .interpret(&program("let f = fn(x) { { return x / 0; } }; f(1);"))
        .is_err());
    assert_eq!(interpreter.environment().depth(), depth);
}

#[test]
fn test_step_limit_stops_runaway_loop() {
    let mut interpreter = Interpreter::with_output(Vec::new()).with_step_limit(Some(1_000));
    let err = interpreter
        .interpret(&program("while (true) { }"))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::StepLimitExceeded(1_000)));
}

#[test]
fn test_session_keeps_bindings() {
    let mut interpreter = Interpreter::with_output(Vec::new());
    interpreter
        .interpret_session(&program("let a = 40;"))
        .unwrap();
    let flow = interpreter.interpret_session(&program("a + 2;")).unwrap();
    assert_eq!(flow, ControlFlow::Normal);
    assert_eq!(interpreter.last_value(), &Value::Int(42));

    let flow = interpreter.interpret_session(&program("return a;")).unwrap();
    assert_eq!(flow, ControlFlow::Return(Value::Int(40)));
}
