//! Expression evaluation.

use std::io::Write;
use std::rc::Rc;

use crate::ast::*;
use crate::error::RuntimeError;
use crate::interpreter::value::{Function, Value};
use crate::stack::ensure_sufficient_stack;

use super::{Interpreter, RuntimeResult};

impl<W: Write> Interpreter<W> {
    pub(crate) fn evaluate(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        ensure_sufficient_stack(|| match &expr.kind {
            ExprKind::IntLiteral(n) => Ok(Value::Int(*n)),
            ExprKind::BoolLiteral(b) => Ok(Value::Bool(*b)),

            ExprKind::Identifier(name) => self
                .environment
                .get(name)
                .ok_or_else(|| RuntimeError::undefined_variable(name, expr.span)),

            ExprKind::Prefix { operator, operand } => {
                self.evaluate_prefix(*operator, operand, expr.span)
            }

            ExprKind::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, *operator, right, expr.span),

            ExprKind::FuncLiteral(func) => {
                Ok(Value::Function(Rc::new(Function::new(Rc::clone(func)))))
            }

            ExprKind::FuncCall { callee, arguments } => {
                self.evaluate_call(callee, arguments, expr.span)
            }
        })
    }
}
