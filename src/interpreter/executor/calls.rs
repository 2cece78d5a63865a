//! Function call evaluation.

use std::io::Write;
use std::rc::Rc;

use crate::ast::{Callee, Expr};
use crate::error::RuntimeError;
use crate::interpreter::value::{Builtin, Function, Value};
use crate::span::Span;
use crate::stack::ensure_sufficient_stack;

use super::{ControlFlow, Interpreter, RuntimeResult, MAX_CALL_DEPTH};

impl<W: Write> Interpreter<W> {
    /// Evaluate a function call expression.
    pub(crate) fn evaluate_call(
        &mut self,
        callee: &Callee,
        arguments: &[Expr],
        span: Span,
    ) -> RuntimeResult<Value> {
        let function = match callee {
            Callee::Identifier(name) => match self.environment.get(name) {
                Some(Value::Function(function)) => function,
                Some(other) => return Err(RuntimeError::not_callable(other.type_name(), span)),
                None => return Err(RuntimeError::undefined_variable(name, span)),
            },
            Callee::Literal(literal) => Rc::new(Function::new(Rc::clone(literal))),
        };
        self.last_value = Value::Function(Rc::clone(&function));

        // Printing follows the name at the call site, whatever it is bound to.
        let prints =
            matches!(callee, Callee::Identifier(name) if name == Builtin::Println.name());

        ensure_sufficient_stack(|| self.call_function(&function, arguments, prints, span))
    }

    fn call_function(
        &mut self,
        function: &Function,
        arguments: &[Expr],
        prints: bool,
        span: Span,
    ) -> RuntimeResult<Value> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::StackOverflow {
                depth: MAX_CALL_DEPTH,
                span,
            });
        }
        tracing::trace!(
            params = ?function.params(),
            depth = self.call_depth,
            line = span.line,
            "call"
        );

        self.call_depth += 1;
        self.environment.push_frame();
        let result = self.bind_and_run(function, arguments, prints, span);
        self.environment.pop_frame();
        self.call_depth -= 1;

        match result? {
            ControlFlow::Return(value) => {
                self.last_value = value.clone();
                Ok(value)
            }
            ControlFlow::Normal => Ok(self.last_value.clone()),
        }
    }

    /// Evaluate each argument inside the call frame and bind it before
    /// evaluating the next, so later arguments see earlier parameters.
    /// Extra arguments are never evaluated; missing ones stay unbound.
    fn bind_and_run(
        &mut self,
        function: &Function,
        arguments: &[Expr],
        prints: bool,
        span: Span,
    ) -> RuntimeResult<ControlFlow> {
        for (param, arg) in function.params().iter().zip(arguments) {
            let value = self.evaluate(arg)?;
            if prints {
                writeln!(self.output, "{}", value)?;
            }
            self.last_value = value.clone();
            if !self.environment.define(param, value) {
                return Err(RuntimeError::redefinition(param, span));
            }
        }
        self.execute_block(&function.body().statements)
    }
}
