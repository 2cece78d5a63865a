//! Statement execution.

use std::io::Write;

use crate::ast::*;
use crate::error::RuntimeError;
use crate::interpreter::value::Value;

use super::{ControlFlow, Interpreter, RuntimeResult};

impl<W: Write> Interpreter<W> {
    /// Execute a statement, returning control flow information.
    pub(crate) fn execute(&mut self, stmt: &Stmt) -> RuntimeResult<ControlFlow> {
        self.tick()?;
        match &stmt.kind {
            StmtKind::Empty => {
                self.last_value = Value::Null;
                Ok(ControlFlow::Normal)
            }

            StmtKind::Expression(expr) => {
                self.last_value = self.evaluate(expr)?;
                Ok(ControlFlow::Normal)
            }

            StmtKind::Let { name, value } => {
                let value = self.evaluate(value)?;
                self.last_value = value.clone();
                if !self.environment.define(name, value) {
                    return Err(RuntimeError::redefinition(name, stmt.span));
                }
                Ok(ControlFlow::Normal)
            }

            StmtKind::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.last_value = value.clone();
                if !self.environment.assign(name, value) {
                    return Err(RuntimeError::undefined_variable(name, stmt.span));
                }
                Ok(ControlFlow::Normal)
            }

            StmtKind::Return(value) => {
                let value = self.evaluate(value)?;
                self.last_value = value.clone();
                Ok(ControlFlow::Return(value))
            }

            StmtKind::If {
                condition,
                consequence,
                alternative,
            } => {
                if self.evaluate_condition(condition)? {
                    self.execute_block(&consequence.statements)
                } else {
                    self.execute_block(&alternative.statements)
                }
            }

            StmtKind::While { condition, body } => {
                while self.evaluate_condition(condition)? {
                    if let ControlFlow::Return(value) = self.execute_block(&body.statements)? {
                        return Ok(ControlFlow::Return(value));
                    }
                    self.tick()?;
                }
                Ok(ControlFlow::Normal)
            }

            StmtKind::Block(block) => self.execute_block(&block.statements),
        }
    }

    fn evaluate_condition(&mut self, condition: &Expr) -> RuntimeResult<bool> {
        let value = self.evaluate(condition)?;
        self.last_value = value.clone();
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::type_error(
                format!("condition must be bool, found {}", other.type_name()),
                condition.span,
            )),
        }
    }
}
