//! Bytecode compiler: lowers the integer/boolean subset of the AST.

use crate::ast::{BinaryOp, Expr, ExprKind, PrefixOp, Program, Stmt, StmtKind};
use crate::bytecode::chunk::BytecodeProgram;
use crate::bytecode::instruction::OpCode;
use crate::error::CompileError;
use crate::span::Span;
use crate::stack::ensure_sufficient_stack;

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// The bytecode compiler.
#[derive(Debug, Default)]
pub struct Compiler {
    program: BytecodeProgram,
}

impl Compiler {
    /// Create a new compiler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a program, consuming the compiler.
    pub fn compile(mut self, program: &Program) -> CompileResult<BytecodeProgram> {
        self.compile_statements(&program.statements)?;

        tracing::debug!(
            code_bytes = self.program.code.len(),
            constant_bytes = self.program.constants.len(),
            "compiled program"
        );
        Ok(self.program)
    }

    fn compile_statements(&mut self, statements: &[Stmt]) -> CompileResult<()> {
        for stmt in statements {
            self.compile_statement(stmt)?;
        }
        Ok(())
    }

    fn compile_statement(&mut self, stmt: &Stmt) -> CompileResult<()> {
        match &stmt.kind {
            StmtKind::Empty => self.emit_op(OpCode::Noop),
            StmtKind::Expression(expr) => {
                self.compile_expression(expr)?;
                self.emit_op(OpCode::PopI);
            }
            StmtKind::Block(block) => self.compile_statements(&block.statements)?,
            StmtKind::If {
                condition,
                consequence,
                alternative,
            } => {
                self.compile_expression(condition)?;
                let else_jump = self.emit_jump(OpCode::JumpF);
                self.compile_statements(&consequence.statements)?;
                let end_jump = self.emit_jump(OpCode::Jump);
                self.patch_jump(else_jump, stmt.span)?;
                self.compile_statements(&alternative.statements)?;
                self.patch_jump(end_jump, stmt.span)?;
            }
            StmtKind::Let { .. } => return Err(CompileError::unsupported("let", stmt.span)),
            StmtKind::Assign { .. } => {
                return Err(CompileError::unsupported("assignment", stmt.span))
            }
            StmtKind::Return(_) => return Err(CompileError::unsupported("return", stmt.span)),
            StmtKind::While { .. } => return Err(CompileError::unsupported("while", stmt.span)),
        }
        Ok(())
    }

    fn compile_expression(&mut self, expr: &Expr) -> CompileResult<()> {
        ensure_sufficient_stack(|| self.compile_expression_kind(expr))
    }

    fn compile_expression_kind(&mut self, expr: &Expr) -> CompileResult<()> {
        match &expr.kind {
            ExprKind::IntLiteral(value) => {
                let word = i32::try_from(*value).map_err(|_| CompileError::ConstantOutOfRange {
                    value: *value,
                    span: expr.span,
                })?;
                let address = self.program.add_constant(word);
                let operand = operand("constant address", address, expr.span)?;
                self.emit_op(OpCode::LoadI);
                self.program.write_u16(operand);
            }
            ExprKind::BoolLiteral(true) => self.emit_op(OpCode::PushBT),
            ExprKind::BoolLiteral(false) => self.emit_op(OpCode::PushBF),
            ExprKind::Prefix { operator, operand } => {
                self.compile_expression(operand)?;
                self.emit_op(match operator {
                    PrefixOp::Negate => OpCode::MinusI,
                    PrefixOp::Not => OpCode::BangB,
                });
            }
            ExprKind::Binary {
                left,
                operator,
                right,
            } => {
                self.compile_expression(left)?;
                self.compile_expression(right)?;
                self.emit_op(binary_opcode(*operator));
            }
            ExprKind::Identifier(_) => {
                return Err(CompileError::unsupported("identifier", expr.span))
            }
            ExprKind::FuncLiteral(_) => {
                return Err(CompileError::unsupported("function literal", expr.span))
            }
            ExprKind::FuncCall { .. } => {
                return Err(CompileError::unsupported("function call", expr.span))
            }
        }
        Ok(())
    }

    // ===== Bytecode emission =====

    fn emit_op(&mut self, op: OpCode) {
        self.program.write_op(op);
    }

    /// Emit a jump with a placeholder target. Returns the operand offset to
    /// hand back to `patch_jump`.
    fn emit_jump(&mut self, op: OpCode) -> usize {
        self.emit_op(op);
        let offset = self.program.current_offset();
        self.program.write_u16(0xFFFF);
        offset
    }

    /// Point the jump whose operand sits at `offset` to the current end of code.
    fn patch_jump(&mut self, offset: usize, span: Span) -> CompileResult<()> {
        let target = operand("jump target", self.program.current_offset(), span)?;
        if !self.program.patch_u16(offset, target) {
            return Err(CompileError::InvalidJumpPatch { offset, span });
        }
        Ok(())
    }
}

fn binary_opcode(op: BinaryOp) -> OpCode {
    match op {
        BinaryOp::Add => OpCode::AddI,
        BinaryOp::Subtract => OpCode::SubI,
        BinaryOp::Multiply => OpCode::MulI,
        BinaryOp::Divide => OpCode::DivI,
        BinaryOp::Equal => OpCode::EqI,
        BinaryOp::NotEqual => OpCode::NeqI,
        BinaryOp::Greater => OpCode::GtI,
        BinaryOp::GreaterEqual => OpCode::GteI,
        BinaryOp::Less => OpCode::LtI,
        BinaryOp::LessEqual => OpCode::LteI,
    }
}

fn operand(what: &'static str, value: usize, span: Span) -> CompileResult<u16> {
    u16::try_from(value).map_err(|_| CompileError::OperandOverflow { what, value, span })
}
