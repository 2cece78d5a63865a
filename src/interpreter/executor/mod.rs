//! Tree-walking interpreter for itlang.

mod calls;
mod expressions;
mod operators;
mod statements;

#[cfg(test)]
mod tests;

use std::io::{self, Write};
use std::rc::Rc;

use crate::ast::*;
use crate::error::RuntimeError;
use crate::interpreter::environment::Environment;
use crate::interpreter::value::{Builtin, Function, Value};

pub(crate) type RuntimeResult<T> = Result<T, RuntimeError>;

/// Calls nested deeper than this fail with `RuntimeError::StackOverflow`.
pub const MAX_CALL_DEPTH: usize = 4096;

/// How execution of a statement ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    /// Continue with the next statement.
    Normal,
    /// A `return` ran; unwind to the nearest call (or the program root).
    Return(Value),
}

/// The itlang interpreter.
///
/// Output of `println` goes to `W`, stdout by default.
pub struct Interpreter<W: Write = io::Stdout> {
    pub(crate) environment: Environment,
    /// Value of the most recently evaluated expression.
    pub(crate) last_value: Value,
    pub(crate) output: W,
    step_limit: Option<u64>,
    steps: u64,
    /// Number of calls currently executing.
    call_depth: usize,
    session_open: bool,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(output: W) -> Self {
        let mut environment = Environment::new();
        let println = Builtin::Println;
        environment.define(
            println.name(),
            Value::Function(Rc::new(Function::builtin(println))),
        );

        Self {
            environment,
            last_value: Value::Null,
            output,
            step_limit: None,
            steps: 0,
            call_depth: 0,
            session_open: false,
        }
    }

    /// Abort any single `interpret` call after `limit` statements and loop
    /// iterations.
    pub fn with_step_limit(mut self, limit: Option<u64>) -> Self {
        self.step_limit = limit;
        self
    }

    /// Run a program in a fresh scope and return its last value.
    pub fn interpret(&mut self, program: &Program) -> RuntimeResult<Value> {
        self.steps = 0;
        self.execute_block(&program.statements)?;
        tracing::debug!(steps = self.steps, "program finished");
        Ok(self.last_value.clone())
    }

    /// Run a program in a scope that persists across calls, so bindings
    /// from one REPL line are visible to the next.
    pub fn interpret_session(&mut self, program: &Program) -> RuntimeResult<ControlFlow> {
        self.steps = 0;
        if !self.session_open {
            self.environment.push_frame();
            self.session_open = true;
        }
        let depth = self.environment.depth();
        let result = self.execute_statements(&program.statements);
        while self.environment.depth() > depth {
            self.environment.pop_frame();
        }
        result
    }

    pub fn last_value(&self) -> &Value {
        &self.last_value
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Execute statements in a new frame. The frame is popped on every exit
    /// path, errors included.
    pub(crate) fn execute_block(&mut self, statements: &[Stmt]) -> RuntimeResult<ControlFlow> {
        self.environment.push_frame();
        let result = self.execute_statements(statements);
        self.environment.pop_frame();
        result
    }

    fn execute_statements(&mut self, statements: &[Stmt]) -> RuntimeResult<ControlFlow> {
        for stmt in statements {
            if let ControlFlow::Return(value) = self.execute(stmt)? {
                return Ok(ControlFlow::Return(value));
            }
        }
        Ok(ControlFlow::Normal)
    }

    /// Count one unit of work against the step limit.
    pub(crate) fn tick(&mut self) -> RuntimeResult<()> {
        self.steps += 1;
        match self.step_limit {
            Some(limit) if self.steps > limit => Err(RuntimeError::StepLimitExceeded(limit)),
            _ => Ok(()),
        }
    }
}
