//! Parser module for itlang.

mod core;
mod expressions;
mod precedence;
mod statements;


pub use self::core::{ParseResult, Parser, MAX_NESTING};
pub use self::precedence::{get_precedence, Precedence};
