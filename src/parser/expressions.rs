//! Expression parsing using precedence climbing.

use std::rc::Rc;

use crate::ast::*;
use crate::lexer::TokenKind;
use crate::span::Span;

use super::core::{ParseResult, Parser};
use super::precedence::{get_precedence, Precedence};

impl Parser {
    pub(crate) fn expression(&mut self) -> ParseResult<Expr> {
        self.parse_precedence(Precedence::Lowest)
    }

    /// Combine left operands with following operators while they bind
    /// tighter than `min_precedence`.
    pub(crate) fn parse_precedence(&mut self, min_precedence: Precedence) -> ParseResult<Expr> {
        let mut left = self.parse_left_operand()?;

        loop {
            let precedence = get_precedence(&self.peek().kind);
            if precedence <= min_precedence {
                break;
            }
            left = self.parse_infix(left, precedence)?;
        }

        Ok(left)
    }

    fn parse_left_operand(&mut self) -> ParseResult<Expr> {
        self.nested(Self::left_operand)
    }

    fn left_operand(&mut self) -> ParseResult<Expr> {
        let start_span = self.current_span();

        match self.peek().kind.clone() {
            TokenKind::IntLiteral(n) => {
                self.advance();
                Ok(Expr::new(ExprKind::IntLiteral(n), start_span))
            }
            TokenKind::BoolLiteral(b) => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolLiteral(b), start_span))
            }

            TokenKind::Identifier(name) => {
                self.advance();
                if self.check(&TokenKind::LeftParen) {
                    self.finish_call(Callee::Identifier(name), start_span)
                } else {
                    Ok(Expr::new(ExprKind::Identifier(name), start_span))
                }
            }

            TokenKind::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(expr)
            }

            TokenKind::Minus => self.prefix_expr(PrefixOp::Negate, start_span),
            TokenKind::Bang => self.prefix_expr(PrefixOp::Not, start_span),

            TokenKind::Fn => {
                let func = Rc::new(self.func_literal()?);
                if self.check(&TokenKind::LeftParen) {
                    self.finish_call(Callee::Literal(func), start_span)
                } else {
                    let span = func.span;
                    Ok(Expr::new(ExprKind::FuncLiteral(func), span))
                }
            }

            _ => Err(self.unexpected("expression")),
        }
    }

    /// A prefix operator applies to the next left operand only, so
    /// `-1 + 2` is `(-1) + 2`.
    fn prefix_expr(&mut self, operator: PrefixOp, start_span: Span) -> ParseResult<Expr> {
        self.advance();
        let operand = self.parse_left_operand()?;
        let span = start_span.merge(&operand.span);
        Ok(Expr::new(
            ExprKind::Prefix {
                operator,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_infix(&mut self, left: Expr, precedence: Precedence) -> ParseResult<Expr> {
        let Some(operator) = BinaryOp::from_token(&self.peek().kind) else {
            return Err(self.unexpected("binary operator"));
        };
        self.advance();

        let right = self.parse_precedence(precedence)?;
        let span = left.span.merge(&right.span);
        Ok(Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            },
            span,
        ))
    }

    /// `fn ( params ) { body }`
    fn func_literal(&mut self) -> ParseResult<FuncLiteral> {
        let start_span = self.current_span();
        self.expect(&TokenKind::Fn)?;
        self.expect(&TokenKind::LeftParen)?;

        let mut params = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            params.push(self.expect_identifier()?);
            while self.match_token(&TokenKind::Comma) {
                params.push(self.expect_identifier()?);
            }
        }
        self.expect(&TokenKind::RightParen)?;

        let body = self.block()?;
        let span = start_span.merge(&body.span);
        Ok(FuncLiteral { params, body, span })
    }

    fn finish_call(&mut self, callee: Callee, start_span: Span) -> ParseResult<Expr> {
        self.expect(&TokenKind::LeftParen)?;
        let arguments = self.parse_arguments()?;
        self.expect(&TokenKind::RightParen)?;

        let span = start_span.merge(&self.previous_span());
        Ok(Expr::new(ExprKind::FuncCall { callee, arguments }, span))
    }

    pub(crate) fn parse_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        let mut arguments = Vec::new();

        if !self.check(&TokenKind::RightParen) {
            arguments.push(self.expression()?);
            while self.match_token(&TokenKind::Comma) {
                arguments.push(self.expression()?);
            }
        }

        Ok(arguments)
    }
}
