//! Bytecode backend for itlang.
//!
//! Covers the integer/boolean subset of the language: literals, prefix and
//! binary operators, blocks and `if`/`else`. Anything else is rejected by the
//! compiler.
//!
//! # Architecture
//!
//! - `instruction`: OpCode definitions and operand widths
//! - `chunk`: byte buffer, constant pool and the compiled program
//! - `compiler`: lowers the AST with jump backpatching
//! - `vm`: stack machine over `i32` words
//! - `disassembler`: listing output for `--disassemble`

pub mod chunk;
pub mod compiler;
pub mod disassembler;
pub mod instruction;
pub mod vm;

pub use chunk::{ByteBuffer, BytecodeProgram, ConstantPool};
pub use compiler::{CompileResult, Compiler};
pub use disassembler::{disassemble, Disassembly};
pub use instruction::{OpCode, ADDRESS_WIDTH, WORD_WIDTH};
pub use vm::{Vm, VmResult};
