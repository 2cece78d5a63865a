//! Runtime values for the itlang interpreter.

use std::fmt;
use std::rc::Rc;

use crate::ast::{Block, FuncLiteral};
use crate::span::Span;

/// A runtime value in itlang.
#[derive(Debug, Clone)]
pub enum Value {
    /// Integer value
    Int(i64),
    /// Boolean value
    Bool(bool),
    /// Result of statements that produce no value
    Null,
    /// Function value
    Function(Rc<Function>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Null => "null",
            Value::Function(_) => "Function",
        }
    }

    /// The VM word encoding of this value, if it has one.
    pub fn as_word(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Null | Value::Function(_) => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
            Value::Function(func) => write!(f, "fn({})", func.params().join(", ")),
        }
    }
}

/// Functions provided by the interpreter itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Pre-bound to the name `println`. The output comes from calling
    /// through that name, so the function itself does nothing.
    Println,
}

impl Builtin {
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Println => "println",
        }
    }

    fn params(self) -> &'static [&'static str] {
        match self {
            Builtin::Println => &["obj"],
        }
    }
}

/// A callable function: the literal it was created from, plus a marker
/// for built-ins. Functions capture no environment.
#[derive(Debug)]
pub struct Function {
    pub literal: Rc<FuncLiteral>,
    pub builtin: Option<Builtin>,
}

impl Function {
    pub fn new(literal: Rc<FuncLiteral>) -> Self {
        Self {
            literal,
            builtin: None,
        }
    }

    /// A built-in with an empty body, called through the ordinary call path.
    pub fn builtin(builtin: Builtin) -> Self {
        let literal = FuncLiteral {
            params: builtin.params().iter().map(|p| p.to_string()).collect(),
            body: Block::empty(Span::default()),
            span: Span::default(),
        };
        Self {
            literal: Rc::new(literal),
            builtin: Some(builtin),
        }
    }

    pub fn params(&self) -> &[String] {
        &self.literal.params
    }

    pub fn body(&self) -> &Block {
        &self.literal.body
    }
}
