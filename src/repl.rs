//! Line-oriented REPL over a persistent interpreter session.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::error::ItlangError;
use crate::interpreter::{ControlFlow, Interpreter, Value};
use crate::lexer;

pub const PROMPT: &str = "it >> ";

/// What the REPL should show for one line of input.
#[derive(Debug)]
pub enum Reply {
    /// Blank input or a `null` result.
    Silent,
    Value(Value),
    /// Output of a `:tokens` or `:ast` command.
    Text(String),
    Error(ItlangError),
    /// `:q` or a top-level `return`.
    Exit(Option<Value>),
}

pub struct Repl<W: Write = io::Stdout> {
    interpreter: Interpreter<W>,
}

impl Repl {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Repl<W> {
    /// A REPL whose `println` output goes to `output`.
    pub fn with_output(output: W) -> Self {
        Self {
            interpreter: Interpreter::with_output(output),
        }
    }

    pub fn with_step_limit(mut self, limit: Option<u64>) -> Self {
        self.interpreter = self.interpreter.with_step_limit(limit);
        self
    }

    pub fn interpreter(&self) -> &Interpreter<W> {
        &self.interpreter
    }

    /// Evaluate one line. Bindings persist between lines.
    pub fn eval_line(&mut self, line: &str) -> Reply {
        let line = line.trim();
        if line.is_empty() {
            return Reply::Silent;
        }
        if line == ":q" {
            return Reply::Exit(None);
        }
        if let Some(code) = line.strip_prefix(":tokens") {
            let tokens: Vec<String> = lexer::tokenize(code)
                .iter()
                .map(|token| format!("{:?}", token.kind))
                .collect();
            return Reply::Text(tokens.join("\n"));
        }
        if let Some(code) = line.strip_prefix(":ast") {
            return match crate::parse(code) {
                Ok(program) => Reply::Text(program.to_string()),
                Err(err) => Reply::Error(err),
            };
        }

        let program = match crate::parse(line) {
            Ok(program) => program,
            Err(err) => return Reply::Error(err),
        };
        match self.interpreter.interpret_session(&program) {
            Ok(ControlFlow::Return(value)) => Reply::Exit(Some(value)),
            Ok(ControlFlow::Normal) => match self.interpreter.last_value() {
                Value::Null => Reply::Silent,
                value => Reply::Value(value.clone()),
            },
            Err(err) => Reply::Error(err.into()),
        }
    }

    /// Read lines from `input` until `:q`, a top-level `return`, or end of
    /// input. Prompts, results and errors go to `out`.
    pub fn run<R: BufRead, O: Write>(&mut self, input: R, out: &mut O) -> io::Result<()> {
        let mut lines = input.lines();
        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;

            let Some(line) = lines.next().transpose()? else {
                writeln!(out)?;
                return Ok(());
            };

            match self.eval_line(&line) {
                Reply::Silent => {}
                Reply::Value(value) => writeln!(out, "{}", value)?,
                Reply::Text(text) => writeln!(out, "{}", text)?,
                Reply::Error(err) => writeln!(out, "{} {}", "Error:".red().bold(), err)?,
                Reply::Exit(value) => {
                    if let Some(value) = value {
                        writeln!(out, "{}", value)?;
                    }
                    return Ok(());
                }
            }
        }
    }
}
