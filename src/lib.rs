//! itlang: a small imperative language with first-class functions.
//!
//! This is the library root that exports all modules.
//!
//! # Execution Modes
//!
//! itlang supports two execution modes:
//! - **Tree-walk interpreter**: the whole language, dynamic scoping, `println`
//! - **Bytecode VM**: the integer/boolean expression subset plus `if`/`else`

#![allow(clippy::result_large_err)]

pub mod ast;
pub mod bytecode;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod numeric;
pub mod parser;
pub mod repl;
pub mod span;
pub mod stack;

use std::sync::Once;

use error::ItlangError;
use interpreter::Value;

/// Execution mode for running itlang programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Tree-walking interpreter
    #[default]
    TreeWalk,
    /// Bytecode virtual machine
    Bytecode,
}

/// Options for a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: ExecutionMode,
    /// Abort after this many statements (tree walk) or instructions (VM).
    pub max_steps: Option<u64>,
}

impl RunOptions {
    pub fn bytecode() -> Self {
        Self {
            mode: ExecutionMode::Bytecode,
            ..Self::default()
        }
    }
}

/// What a finished run left behind.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The interpreter's last value.
    Value(Value),
    /// The VM's final operand stack.
    Stack(Vec<i32>),
}

/// Run an itlang program from source code using the default execution mode.
pub fn run(source: &str) -> Result<RunOutcome, ItlangError> {
    run_with_options(source, RunOptions::default())
}

/// Run an itlang program with full control over execution options.
pub fn run_with_options(source: &str, options: RunOptions) -> Result<RunOutcome, ItlangError> {
    let program = parse(source)?;

    match options.mode {
        ExecutionMode::TreeWalk => {
            let mut interpreter =
                interpreter::Interpreter::new().with_step_limit(options.max_steps);
            let value = interpreter.interpret(&program)?;
            Ok(RunOutcome::Value(value))
        }
        ExecutionMode::Bytecode => {
            let compiled = bytecode::Compiler::new().compile(&program)?;
            run_bytecode(&compiled, options.max_steps)
        }
    }
}

/// Run already compiled bytecode on a fresh VM.
pub fn run_bytecode(
    program: &bytecode::BytecodeProgram,
    max_steps: Option<u64>,
) -> Result<RunOutcome, ItlangError> {
    let stack = bytecode::Vm::new(program)
        .with_step_limit(max_steps)
        .run()?;
    Ok(RunOutcome::Stack(stack))
}

/// Run an itlang program from a file path.
pub fn run_file(path: &std::path::Path, options: RunOptions) -> Result<RunOutcome, ItlangError> {
    let source = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "loaded source file");
    run_with_options(&source, options)
}

/// Parse source code into an AST without executing.
pub fn parse(source: &str) -> Result<ast::Program, ItlangError> {
    let tokens = lexer::Scanner::new(source).scan_tokens()?;
    let program = parser::Parser::new(tokens).parse()?;
    Ok(program)
}

/// Compile source code to bytecode without executing.
pub fn compile(source: &str) -> Result<bytecode::BytecodeProgram, ItlangError> {
    let program = parse(source)?;
    Ok(bytecode::Compiler::new().compile(&program)?)
}

/// Disassemble compiled bytecode to a string.
pub fn disassemble(program: &bytecode::BytecodeProgram) -> String {
    bytecode::disassemble(program)
}

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`. Does nothing when
/// the variable is unset.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
