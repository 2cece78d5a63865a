//! Statement parsing: let, assignment, if, while, return, blocks.

use crate::ast::*;
use crate::lexer::TokenKind;

use super::core::{ParseResult, Parser};

impl Parser {
    pub(crate) fn statement(&mut self) -> ParseResult<Stmt> {
        match &self.peek().kind {
            TokenKind::Let => self.let_statement(),
            TokenKind::Return => self.return_statement(),
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::LeftBrace => self.block_statement(),
            TokenKind::Semicolon => {
                let token = self.advance();
                Ok(Stmt::new(StmtKind::Empty, token.span))
            }
            TokenKind::Identifier(_) if self.peek_nth(1).kind == TokenKind::Equal => {
                self.assign_statement()
            }
            _ => self.expression_statement(),
        }
    }

    fn let_statement(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        self.expect(&TokenKind::Let)?;
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::Equal)?;
        let value = self.expression()?;
        self.expect(&TokenKind::Semicolon)?;

        let span = start_span.merge(&self.previous_span());
        Ok(Stmt::new(StmtKind::Let { name, value }, span))
    }

    fn assign_statement(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::Equal)?;
        let value = self.expression()?;
        self.expect(&TokenKind::Semicolon)?;

        let span = start_span.merge(&self.previous_span());
        Ok(Stmt::new(StmtKind::Assign { name, value }, span))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        self.expect(&TokenKind::Return)?;
        let value = self.expression()?;
        self.expect(&TokenKind::Semicolon)?;

        let span = start_span.merge(&self.previous_span());
        Ok(Stmt::new(StmtKind::Return(value), span))
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        self.expect(&TokenKind::If)?;

        let condition = self.expression()?;
        let consequence = self.block()?;
        let alternative = if self.match_token(&TokenKind::Else) {
            self.block()?
        } else {
            Block::empty(self.previous_span())
        };

        let span = start_span.merge(&self.previous_span());
        Ok(Stmt::new(
            StmtKind::If {
                condition,
                consequence,
                alternative,
            },
            span,
        ))
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        self.expect(&TokenKind::While)?;

        let condition = self.expression()?;
        let body = self.block()?;

        let span = start_span.merge(&self.previous_span());
        Ok(Stmt::new(StmtKind::While { condition, body }, span))
    }

    fn block_statement(&mut self) -> ParseResult<Stmt> {
        let block = self.block()?;
        let span = block.span;
        Ok(Stmt::new(StmtKind::Block(block), span))
    }

    /// `{ statement* }`
    pub(crate) fn block(&mut self) -> ParseResult<Block> {
        self.nested(Self::block_body)
    }

    fn block_body(&mut self) -> ParseResult<Block> {
        let start_span = self.current_span();
        self.expect(&TokenKind::LeftBrace)?;

        let mut statements = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.statement()?);
        }

        self.expect(&TokenKind::RightBrace)?;
        Ok(Block::new(statements, start_span.merge(&self.previous_span())))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        let expr = self.expression()?;
        self.expect(&TokenKind::Semicolon)?;

        let span = start_span.merge(&self.previous_span());
        Ok(Stmt::new(StmtKind::Expression(expr), span))
    }
}
