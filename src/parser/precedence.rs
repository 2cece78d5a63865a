//! Operator precedence for precedence climbing.

use crate::lexer::TokenKind;

/// Binding power of binary operators (higher = tighter binding).
///
/// Everything that is not a binary operator, closing and terminating
/// tokens included, sits at `Lowest` and ends the current expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest = 0,
    Equality = 1,       // == !=
    Comparison = 2,     // < <= > >=
    Additive = 3,       // + -
    Multiplicative = 4, // * /
}

pub fn get_precedence(kind: &TokenKind) -> Precedence {
    match kind {
        TokenKind::EqualEqual | TokenKind::BangEqual => Precedence::Equality,
        TokenKind::Less | TokenKind::LessEqual | TokenKind::Greater | TokenKind::GreaterEqual => {
            Precedence::Comparison
        }
        TokenKind::Plus | TokenKind::Minus => Precedence::Additive,
        TokenKind::Star | TokenKind::Slash => Precedence::Multiplicative,
        _ => Precedence::Lowest,
    }
}
