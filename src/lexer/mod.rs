//! Lexer module for itlang.

pub mod scanner;
pub mod token;

pub use scanner::Scanner;
pub use token::{Token, TokenKind};

/// Tokenize `source`. The result ends with an `Eof` token, or with an
/// `Illegal` token at the first unrecognized input.
pub fn tokenize(source: &str) -> Vec<Token> {
    Scanner::new(source).collect()
}
