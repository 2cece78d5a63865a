//! Abstract Syntax Tree for itlang.

pub mod expr;
pub mod render;
pub mod stmt;

pub use expr::{BinaryOp, Callee, Expr, ExprKind, FuncLiteral, PrefixOp};
pub use stmt::{Block, Program, Stmt, StmtKind};
