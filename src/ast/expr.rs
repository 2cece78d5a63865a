//! Expression AST nodes.

use std::rc::Rc;

use crate::ast::stmt::Block;
use crate::lexer::TokenKind;
use crate::span::Span;

/// An expression in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// All expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Integer literal: 42
    IntLiteral(i64),
    /// Boolean literal: true, false
    BoolLiteral(bool),

    /// Variable reference: foo
    Identifier(String),

    /// Prefix operation: -x, !x
    Prefix {
        operator: PrefixOp,
        operand: Box<Expr>,
    },

    /// Binary operation: a + b
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },

    /// Function literal: fn(a, b) { ... }
    ///
    /// Shared so that function values created at runtime point at the
    /// same body instead of copying it.
    FuncLiteral(Rc<FuncLiteral>),

    /// Function call: foo(a, b) or fn(a) { ... }(1)
    FuncCall {
        callee: Callee,
        arguments: Vec<Expr>,
    },
}

/// Parameters and body of a function literal.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncLiteral {
    pub params: Vec<String>,
    pub body: Block,
    pub span: Span,
}

/// What a call invokes.
#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    /// Looked up by name when the call runs.
    Identifier(String),
    /// Immediately invoked literal.
    Literal(Rc<FuncLiteral>),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl BinaryOp {
    pub fn from_token(kind: &TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Subtract),
            TokenKind::Star => Some(BinaryOp::Multiply),
            TokenKind::Slash => Some(BinaryOp::Divide),
            TokenKind::EqualEqual => Some(BinaryOp::Equal),
            TokenKind::BangEqual => Some(BinaryOp::NotEqual),
            TokenKind::Less => Some(BinaryOp::Less),
            TokenKind::LessEqual => Some(BinaryOp::LessEqual),
            TokenKind::Greater => Some(BinaryOp::Greater),
            TokenKind::GreaterEqual => Some(BinaryOp::GreaterEqual),
            _ => None,
        }
    }

    pub fn token(self) -> TokenKind {
        match self {
            BinaryOp::Add => TokenKind::Plus,
            BinaryOp::Subtract => TokenKind::Minus,
            BinaryOp::Multiply => TokenKind::Star,
            BinaryOp::Divide => TokenKind::Slash,
            BinaryOp::Equal => TokenKind::EqualEqual,
            BinaryOp::NotEqual => TokenKind::BangEqual,
            BinaryOp::Less => TokenKind::Less,
            BinaryOp::LessEqual => TokenKind::LessEqual,
            BinaryOp::Greater => TokenKind::Greater,
            BinaryOp::GreaterEqual => TokenKind::GreaterEqual,
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Negate,
    Not,
}

impl PrefixOp {
    pub fn token(self) -> TokenKind {
        match self {
            PrefixOp::Negate => TokenKind::Minus,
            PrefixOp::Not => TokenKind::Bang,
        }
    }
}

impl std::fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}
