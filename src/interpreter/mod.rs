//! Interpreter module for itlang.

pub mod environment;
pub mod executor;
pub mod value;

pub use environment::Environment;
pub use executor::{ControlFlow, Interpreter};
pub use value::{Builtin, Function, Value};
