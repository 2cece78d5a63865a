//! Statement AST nodes.

use crate::ast::expr::Expr;
use crate::span::Span;

/// A statement in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Empty statement: ;
    Empty,

    /// Variable declaration: let x = expr;
    Let { name: String, value: Expr },

    /// Assignment to an existing variable: x = expr;
    Assign { name: String, value: Expr },

    /// Return statement: return expr;
    Return(Expr),

    /// If statement: if (cond) { ... } else { ... }
    ///
    /// A missing `else` is an empty alternative block.
    If {
        condition: Expr,
        consequence: Block,
        alternative: Block,
    },

    /// While loop: while (cond) { ... }
    While { condition: Expr, body: Block },

    /// Nested block: { statements }
    Block(Block),

    /// Expression statement: expr;
    Expression(Expr),
}

/// An ordered sequence of statements with its own scope.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(statements: Vec<Stmt>, span: Span) -> Self {
        Self { statements, span }
    }

    /// The block standing in for a missing `else`.
    pub fn empty(span: Span) -> Self {
        Self {
            statements: Vec::new(),
            span,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// A complete program: the root block, without surrounding braces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }
}
