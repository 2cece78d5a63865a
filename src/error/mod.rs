//! Error types for all compilation and execution phases.

use crate::lexer::Token;
use crate::span::Span;
use thiserror::Error;

/// Lexer errors.
#[derive(Debug, Error)]
pub enum LexerError {
    #[error("Unexpected character '{0}' at {1}")]
    UnexpectedChar(char, Span),

    #[error("Invalid number '{0}' at {1}")]
    InvalidNumber(String, Span),
}

impl LexerError {
    pub fn unexpected_char(c: char, span: Span) -> Self {
        Self::UnexpectedChar(c, span)
    }

    pub fn invalid_number(s: String, span: Span) -> Self {
        Self::InvalidNumber(s, span)
    }

    /// Classify the lexeme of an illegal token.
    pub fn from_illegal(lexeme: &str, span: Span) -> Self {
        match lexeme.chars().next() {
            Some(c) if c.is_ascii_digit() => Self::invalid_number(lexeme.to_string(), span),
            Some(c) => Self::unexpected_char(c, span),
            None => Self::unexpected_char('\0', span),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedChar(_, span) => *span,
            Self::InvalidNumber(_, span) => *span,
        }
    }
}

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Unexpected token '{found}', expected {expected} at {}", .found.span)]
    UnexpectedToken { expected: String, found: Token },

    #[error("Nesting deeper than {limit} levels at {}", .found.span)]
    NestingTooDeep { limit: usize, found: Token },
}

impl ParserError {
    pub fn unexpected_token(expected: impl Into<String>, found: Token) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found,
        }
    }

    /// The token the parser could not accept.
    pub fn token(&self) -> &Token {
        match self {
            Self::UnexpectedToken { found, .. } => found,
            Self::NestingTooDeep { found, .. } => found,
        }
    }

    pub fn span(&self) -> Span {
        self.token().span
    }
}

/// Bytecode compilation errors.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{construct} is not supported by the bytecode backend at {span}")]
    Unsupported {
        construct: &'static str,
        span: Span,
    },

    #[error("Integer literal {value} does not fit in a VM word at {span}")]
    ConstantOutOfRange { value: i64, span: Span },

    #[error("{what} {value} exceeds the 2-byte operand range at {span}")]
    OperandOverflow {
        what: &'static str,
        value: usize,
        span: Span,
    },

    #[error("No jump operand at code offset {offset} to patch at {span}")]
    InvalidJumpPatch { offset: usize, span: Span },
}

impl CompileError {
    pub fn unsupported(construct: &'static str, span: Span) -> Self {
        Self::Unsupported { construct, span }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Unsupported { span, .. } => *span,
            Self::ConstantOutOfRange { span, .. } => *span,
            Self::OperandOverflow { span, .. } => *span,
            Self::InvalidJumpPatch { span, .. } => *span,
        }
    }
}

/// Runtime errors raised by the tree-walking interpreter.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Division by zero at {0}")]
    DivisionByZero(Span),

    #[error("Integer overflow at {0}")]
    IntegerOverflow(Span),

    #[error("Undefined variable '{0}' at {1}")]
    UndefinedVariable(String, Span),

    #[error("Variable '{0}' is already defined in this scope at {1}")]
    Redefinition(String, Span),

    #[error("Cannot call non-function value of type {0} at {1}")]
    NotCallable(&'static str, Span),

    #[error("Type error: {message} at {span}")]
    TypeError { message: String, span: Span },

    #[error("Stack overflow: more than {depth} nested calls at {span}")]
    StackOverflow { depth: usize, span: Span },

    #[error("Step limit of {0} exceeded")]
    StepLimitExceeded(u64),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl RuntimeError {
    pub fn division_by_zero(span: Span) -> Self {
        Self::DivisionByZero(span)
    }

    pub fn integer_overflow(span: Span) -> Self {
        Self::IntegerOverflow(span)
    }

    pub fn undefined_variable(name: impl Into<String>, span: Span) -> Self {
        Self::UndefinedVariable(name.into(), span)
    }

    pub fn redefinition(name: impl Into<String>, span: Span) -> Self {
        Self::Redefinition(name.into(), span)
    }

    pub fn not_callable(type_name: &'static str, span: Span) -> Self {
        Self::NotCallable(type_name, span)
    }

    pub fn type_error(message: impl Into<String>, span: Span) -> Self {
        Self::TypeError {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::DivisionByZero(span) => Some(*span),
            Self::IntegerOverflow(span) => Some(*span),
            Self::UndefinedVariable(_, span) => Some(*span),
            Self::Redefinition(_, span) => Some(*span),
            Self::NotCallable(_, span) => Some(*span),
            Self::TypeError { span, .. } => Some(*span),
            Self::StackOverflow { span, .. } => Some(*span),
            Self::StepLimitExceeded(_) | Self::Output(_) => None,
        }
    }
}

/// Faults raised by the bytecode virtual machine. Each carries the
/// instruction pointer of the faulting instruction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VmError {
    #[error("Unknown opcode {opcode:#04x} at ip {ip}")]
    UnknownOpcode { opcode: u8, ip: usize },

    #[error("Truncated operand for {mnemonic} at ip {ip}")]
    TruncatedInstruction { mnemonic: &'static str, ip: usize },

    #[error("Constant address {address} out of range at ip {ip}")]
    BadConstantAddress { address: usize, ip: usize },

    #[error("Stack underflow at ip {ip}")]
    StackUnderflow { ip: usize },

    #[error("BANGB expects 0 or 1, found {value} at ip {ip}")]
    NotABoolean { value: i32, ip: usize },

    #[error("Division by zero at ip {ip}")]
    DivisionByZero { ip: usize },

    #[error("Integer overflow at ip {ip}")]
    IntegerOverflow { ip: usize },

    #[error("Step limit of {0} exceeded")]
    StepLimitExceeded(u64),
}

/// A unified error type for all phases.
#[derive(Debug, Error)]
pub enum ItlangError {
    #[error("Lexer error: {0}")]
    Lexer(#[from] LexerError),

    #[error("Parser error: {0}")]
    Parser(#[from] ParserError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("VM error: {0}")]
    Vm(#[from] VmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
