//! Re-serialization of AST nodes back into tokens.
//!
//! Every binary and prefix expression is wrapped in parentheses unless it
//! sits directly in statement position (after `let x =`, after `return`,
//! inside an `if`/`while` condition, or as a call argument). Feeding the
//! tokens back through the parser yields a tree with the same tokens.

use std::fmt;

use crate::ast::expr::{Callee, Expr, ExprKind, FuncLiteral};
use crate::ast::stmt::{Block, Program, Stmt, StmtKind};
use crate::lexer::TokenKind;

impl Expr {
    pub fn tokens(&self) -> Vec<TokenKind> {
        let mut out = Vec::new();
        self.write_tokens(&mut out, true);
        out
    }

    fn write_tokens(&self, out: &mut Vec<TokenKind>, parenthesize: bool) {
        match &self.kind {
            ExprKind::IntLiteral(n) => out.push(TokenKind::IntLiteral(*n)),
            ExprKind::BoolLiteral(b) => out.push(TokenKind::BoolLiteral(*b)),
            ExprKind::Identifier(name) => out.push(TokenKind::Identifier(name.clone())),
            ExprKind::Prefix { operator, operand } => {
                if parenthesize {
                    out.push(TokenKind::LeftParen);
                }
                out.push(operator.token());
                operand.write_tokens(out, true);
                if parenthesize {
                    out.push(TokenKind::RightParen);
                }
            }
            ExprKind::Binary {
                left,
                operator,
                right,
            } => {
                if parenthesize {
                    out.push(TokenKind::LeftParen);
                }
                left.write_tokens(out, true);
                out.push(operator.token());
                right.write_tokens(out, true);
                if parenthesize {
                    out.push(TokenKind::RightParen);
                }
            }
            ExprKind::FuncLiteral(func) => func.write_tokens(out),
            ExprKind::FuncCall { callee, arguments } => {
                match callee {
                    Callee::Identifier(name) => out.push(TokenKind::Identifier(name.clone())),
                    Callee::Literal(func) => func.write_tokens(out),
                }
                out.push(TokenKind::LeftParen);
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        out.push(TokenKind::Comma);
                    }
                    arg.write_tokens(out, false);
                }
                out.push(TokenKind::RightParen);
            }
        }
    }
}

impl FuncLiteral {
    fn write_tokens(&self, out: &mut Vec<TokenKind>) {
        out.push(TokenKind::Fn);
        out.push(TokenKind::LeftParen);
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                out.push(TokenKind::Comma);
            }
            out.push(TokenKind::Identifier(param.clone()));
        }
        out.push(TokenKind::RightParen);
        self.body.write_tokens(out);
    }
}

impl Stmt {
    pub fn tokens(&self) -> Vec<TokenKind> {
        let mut out = Vec::new();
        self.write_tokens(&mut out);
        out
    }

    fn write_tokens(&self, out: &mut Vec<TokenKind>) {
        match &self.kind {
            StmtKind::Empty => out.push(TokenKind::Semicolon),
            StmtKind::Let { name, value } => {
                out.push(TokenKind::Let);
                out.push(TokenKind::Identifier(name.clone()));
                out.push(TokenKind::Equal);
                value.write_tokens(out, false);
                out.push(TokenKind::Semicolon);
            }
            StmtKind::Assign { name, value } => {
                out.push(TokenKind::Identifier(name.clone()));
                out.push(TokenKind::Equal);
                value.write_tokens(out, false);
                out.push(TokenKind::Semicolon);
            }
            StmtKind::Return(value) => {
                out.push(TokenKind::Return);
                value.write_tokens(out, false);
                out.push(TokenKind::Semicolon);
            }
            StmtKind::If {
                condition,
                consequence,
                alternative,
            } => {
                out.push(TokenKind::If);
                write_condition(condition, out);
                consequence.write_tokens(out);
                out.push(TokenKind::Else);
                alternative.write_tokens(out);
            }
            StmtKind::While { condition, body } => {
                out.push(TokenKind::While);
                write_condition(condition, out);
                body.write_tokens(out);
            }
            StmtKind::Block(block) => block.write_tokens(out),
            StmtKind::Expression(expr) => {
                expr.write_tokens(out, false);
                out.push(TokenKind::Semicolon);
            }
        }
    }
}

fn write_condition(condition: &Expr, out: &mut Vec<TokenKind>) {
    out.push(TokenKind::LeftParen);
    condition.write_tokens(out, false);
    out.push(TokenKind::RightParen);
}

impl Block {
    pub fn tokens(&self) -> Vec<TokenKind> {
        let mut out = Vec::new();
        self.write_tokens(&mut out);
        out
    }

    fn write_tokens(&self, out: &mut Vec<TokenKind>) {
        out.push(TokenKind::LeftBrace);
        for stmt in &self.statements {
            stmt.write_tokens(out);
        }
        out.push(TokenKind::RightBrace);
    }
}

impl Program {
    /// Tokens of every top-level statement, without braces or a trailing `Eof`.
    pub fn tokens(&self) -> Vec<TokenKind> {
        let mut out = Vec::new();
        for stmt in &self.statements {
            stmt.write_tokens(&mut out);
        }
        out
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}
