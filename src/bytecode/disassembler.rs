//! Bytecode disassembler for debugging.

use std::fmt;

use crate::bytecode::chunk::BytecodeProgram;
use crate::bytecode::instruction::OpCode;

/// Disassemble a compiled program into one line per instruction.
pub fn disassemble(program: &BytecodeProgram) -> String {
    Disassembly(program).to_string()
}

/// Display adapter producing the disassembler listing.
pub struct Disassembly<'a>(pub &'a BytecodeProgram);

impl fmt::Display for Disassembly<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let program = self.0;
        let mut offset = 0;
        while offset < program.code.len() {
            offset = instruction(program, offset, f)?;
        }
        Ok(())
    }
}

/// Write the instruction at `offset` and return the offset of the next one.
fn instruction(
    program: &BytecodeProgram,
    offset: usize,
    f: &mut fmt::Formatter<'_>,
) -> Result<usize, fmt::Error> {
    write!(f, "{:04} ", offset)?;

    let byte = program.code.get(offset).unwrap_or_default();
    let Some(op) = OpCode::from_u8(byte) else {
        writeln!(f, "<unknown {:#04x}>", byte)?;
        return Ok(offset + 1);
    };

    if op.operand_size() == 0 {
        writeln!(f, "{}", op)?;
        return Ok(offset + 1);
    }

    let Some(operand) = program.read_u16(offset + 1) else {
        writeln!(f, "{:<10} <truncated>", op.mnemonic())?;
        return Ok(program.code.len());
    };

    match op {
        OpCode::LoadI => match program.constants.get(usize::from(operand)) {
            Some(value) => writeln!(f, "{:<10} {} ({})", op.mnemonic(), operand, value)?,
            None => writeln!(f, "{:<10} {} (?)", op.mnemonic(), operand)?,
        },
        _ => writeln!(f, "{:<10} -> {:04}", op.mnemonic(), operand)?,
    }
    Ok(offset + op.length())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::Compiler;
    use pretty_assertions::assert_eq;

    fn compile(source: &str) -> BytecodeProgram {
        let tokens = crate::lexer::Scanner::new(source).scan_tokens().unwrap();
        let program = crate::parser::Parser::new(tokens).parse().unwrap();
        Compiler::new().compile(&program).unwrap()
    }

    #[test]
    fn test_constant_listing() {
        assert_eq!(
            disassemble(&compile("42 + -1;")),
            "0000 LOADI      0 (42)\n\
             0003 LOADI      4 (1)\n\
             0006 MINUSI\n\
             0007 ADDI\n\
             0008 POPI\n"
        );
    }

    #[test]
    fn test_jump_targets() {
        assert_eq!(
            disassemble(&compile("if (true) {;} else {false;}")),
            "0000 PUSHBT\n\
             0001 JUMPF      -> 0008\n\
             0004 NOOP\n\
             0005 JUMP       -> 0010\n\
             0008 PUSHBF\n\
             0009 POPI\n"
        );
    }

    #[test]
    fn test_malformed_code() {
        let mut program = BytecodeProgram::new();
        program.code.push_byte(0xEE);
        program.code.push_byte(OpCode::Jump as u8);
        program.code.push_byte(0);
        assert_eq!(
            disassemble(&program),
            "0000 <unknown 0xee>\n0001 JUMP       <truncated>\n"
        );
    }
}
