//! The bytecode VM agrees with the tree-walking interpreter on the subset
//! it compiles.

use pretty_assertions::assert_eq;

use itlang::bytecode::{Compiler, OpCode, Vm};
use itlang::error::{ItlangError, VmError};
use itlang::interpreter::{Interpreter, Value};
use itlang::{compile, parse, run_with_options, RunOptions, RunOutcome};

/// Evaluate `expr` on both backends. The VM runs the compiled statement with
/// its trailing POPI removed so the value stays on the stack.
fn both(expr: &str) -> (Value, i32) {
    let source = format!("{expr};");
    let program = parse(&source).unwrap();
    let tree = Interpreter::with_output(Vec::new())
        .interpret(&program)
        .unwrap();

    let mut compiled = Compiler::new().compile(&program).unwrap();
    let mut code = compiled.code.as_bytes().to_vec();
    assert_eq!(code.pop(), Some(OpCode::PopI as u8));
    compiled.code = Default::default();
    for byte in code {
        compiled.code.push_byte(byte);
    }
    let stack = Vm::new(&compiled).run().unwrap();
    assert_eq!(stack.len(), 1, "{expr}");
    (tree, stack[0])
}

#[test]
fn expressions_agree() {
    for expr in [
        "42",
        "-17",
        "1+2*3",
        "(1+2)*3",
        "7/2",
        "-7/2",
        "7/-2",
        "100-99-1",
        "2*3*4/5",
        "1<2",
        "2<=1",
        "3>3",
        "3>=3",
        "4==4",
        "4!=4",
        "true==false",
        "!true",
        "!(1+1==2)",
        "-(-(5))",
    ] {
        let (tree, word) = both(expr);
        assert_eq!(tree.as_word(), Some(i64::from(word)), "{expr}");
    }
}

#[test]
fn statement_programs_leave_empty_stack() {
    for source in [
        ";23;;46;",
        "if (2+3>5) {1;} else {2;}",
        "{ 1; { 2; } } if (true) { } else { 3; }",
    ] {
        assert_eq!(
            run_with_options(source, RunOptions::bytecode()).unwrap(),
            RunOutcome::Stack(vec![])
        );
    }
}

#[test]
fn division_errors_match() {
    assert!(matches!(
        run_with_options("5/(2-2);", RunOptions::default()),
        Err(ItlangError::Runtime(_))
    ));
    assert!(matches!(
        run_with_options("5/(2-2);", RunOptions::bytecode()),
        Err(ItlangError::Vm(VmError::DivisionByZero { .. }))
    ));
}

#[test]
fn listing_of_a_branch() {
    let program = compile("if (2+3>5) {1;} else {2;}").unwrap();
    assert_eq!(
        itlang::disassemble(&program),
        "0000 LOADI      0 (2)\n\
         0003 LOADI      4 (3)\n\
         0006 ADDI\n\
         0007 LOADI      8 (5)\n\
         0010 GTI\n\
         0011 JUMPF      -> 0021\n\
         0014 LOADI      12 (1)\n\
         0017 POPI\n\
         0018 JUMP       -> 0025\n\
         0021 LOADI      16 (2)\n\
         0024 POPI\n"
    );
}
