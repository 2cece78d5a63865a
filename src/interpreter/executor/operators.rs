//! Binary and prefix operator evaluation.
//!
//! Arithmetic and ordering apply to integers only. Equality applies to two
//! integers or two booleans. Every other combination, `null` included, is a
//! type error.

use std::io::Write;

use crate::ast::*;
use crate::error::RuntimeError;
use crate::interpreter::value::Value;
use crate::numeric::floor_div;
use crate::span::Span;

use super::{Interpreter, RuntimeResult};

impl<W: Write> Interpreter<W> {
    pub(crate) fn evaluate_binary(
        &mut self,
        left: &Expr,
        op: BinaryOp,
        right: &Expr,
        span: Span,
    ) -> RuntimeResult<Value> {
        let left_val = self.evaluate(left)?;
        let right_val = self.evaluate(right)?;

        match op {
            BinaryOp::Add => self.eval_arithmetic(op, &left_val, &right_val, span, i64::checked_add),
            BinaryOp::Subtract => {
                self.eval_arithmetic(op, &left_val, &right_val, span, i64::checked_sub)
            }
            BinaryOp::Multiply => {
                self.eval_arithmetic(op, &left_val, &right_val, span, i64::checked_mul)
            }
            BinaryOp::Divide => self.eval_divide(&left_val, &right_val, span),
            BinaryOp::Equal => self
                .values_equal(op, &left_val, &right_val, span)
                .map(Value::Bool),
            BinaryOp::NotEqual => self
                .values_equal(op, &left_val, &right_val, span)
                .map(|equal| Value::Bool(!equal)),
            BinaryOp::Less => self.compare_values(op, &left_val, &right_val, span, |a, b| a < b),
            BinaryOp::LessEqual => {
                self.compare_values(op, &left_val, &right_val, span, |a, b| a <= b)
            }
            BinaryOp::Greater => self.compare_values(op, &left_val, &right_val, span, |a, b| a > b),
            BinaryOp::GreaterEqual => {
                self.compare_values(op, &left_val, &right_val, span, |a, b| a >= b)
            }
        }
    }

    pub(crate) fn evaluate_prefix(
        &mut self,
        op: PrefixOp,
        operand: &Expr,
        span: Span,
    ) -> RuntimeResult<Value> {
        let value = self.evaluate(operand)?;
        match (op, &value) {
            (PrefixOp::Negate, Value::Int(n)) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::integer_overflow(span)),
            (PrefixOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            _ => Err(RuntimeError::type_error(
                format!("cannot apply '{}' to {}", op, value.type_name()),
                span,
            )),
        }
    }

    fn eval_arithmetic(
        &self,
        op: BinaryOp,
        left: &Value,
        right: &Value,
        span: Span,
        apply: fn(i64, i64) -> Option<i64>,
    ) -> RuntimeResult<Value> {
        match (left, right) {
            (Value::Int(a), Value::Int(b)) => apply(*a, *b)
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::integer_overflow(span)),
            _ => Err(operand_error(op, left, right, span)),
        }
    }

    fn eval_divide(&self, left: &Value, right: &Value, span: Span) -> RuntimeResult<Value> {
        match (left, right) {
            (Value::Int(_), Value::Int(0)) => Err(RuntimeError::division_by_zero(span)),
            (Value::Int(a), Value::Int(b)) => floor_div(*a, *b)
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::integer_overflow(span)),
            _ => Err(operand_error(BinaryOp::Divide, left, right, span)),
        }
    }

    /// Equality for two values of the same comparable type.
    fn values_equal(
        &self,
        op: BinaryOp,
        left: &Value,
        right: &Value,
        span: Span,
    ) -> RuntimeResult<bool> {
        match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(a == b),
            (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
            _ => Err(operand_error(op, left, right, span)),
        }
    }

    fn compare_values<F>(
        &self,
        op: BinaryOp,
        left: &Value,
        right: &Value,
        span: Span,
        compare: F,
    ) -> RuntimeResult<Value>
    where
        F: Fn(i64, i64) -> bool,
    {
        match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Bool(compare(*a, *b))),
            _ => Err(operand_error(op, left, right, span)),
        }
    }
}

fn operand_error(op: BinaryOp, left: &Value, right: &Value, span: Span) -> RuntimeError {
    RuntimeError::type_error(
        format!(
            "cannot apply '{}' to {} and {}",
            op,
            left.type_name(),
            right.type_name()
        ),
        span,
    )
}
