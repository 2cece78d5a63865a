//! Bytecode instruction definitions for the itlang VM.

/// Width in bytes of a constant-pool address or jump target operand.
pub const ADDRESS_WIDTH: usize = 2;

/// Width in bytes of one integer in the constant pool and on the VM stack.
pub const WORD_WIDTH: usize = 4;

/// Opcodes for the bytecode virtual machine.
///
/// Operands follow the opcode byte as big-endian integers. Booleans are
/// the words 1 and 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    /// Do nothing
    Noop = 0,
    /// Push the word stored at a constant-pool byte offset: LOADI <address:u16>
    LoadI = 1,
    /// left + right
    AddI = 2,
    /// left - right
    SubI = 3,
    /// left * right
    MulI = 4,
    /// left / right, rounded toward negative infinity
    DivI = 5,
    /// Discard the top word
    PopI = 6,
    /// Push 1
    PushBT = 7,
    /// Push 0
    PushBF = 8,
    /// left == right
    EqI = 9,
    /// left != right
    NeqI = 10,
    /// left > right
    GtI = 11,
    /// left >= right
    GteI = 12,
    /// left < right
    LtI = 13,
    /// left <= right
    LteI = 14,
    /// Negate the top word
    MinusI = 15,
    /// Flip a 0/1 word; anything else faults
    BangB = 16,
    /// Unconditional jump: JUMP <address:u16>
    Jump = 17,
    /// Pop; jump if the word is zero: JUMPF <address:u16>
    JumpF = 18,
}

impl OpCode {
    /// Every opcode, indexed by its byte.
    pub const ALL: [OpCode; 19] = [
        OpCode::Noop,
        OpCode::LoadI,
        OpCode::AddI,
        OpCode::SubI,
        OpCode::MulI,
        OpCode::DivI,
        OpCode::PopI,
        OpCode::PushBT,
        OpCode::PushBF,
        OpCode::EqI,
        OpCode::NeqI,
        OpCode::GtI,
        OpCode::GteI,
        OpCode::LtI,
        OpCode::LteI,
        OpCode::MinusI,
        OpCode::BangB,
        OpCode::Jump,
        OpCode::JumpF,
    ];

    /// Widths of the operands that follow the opcode byte.
    pub fn operand_widths(self) -> &'static [usize] {
        match self {
            OpCode::LoadI | OpCode::Jump | OpCode::JumpF => &[ADDRESS_WIDTH],
            _ => &[],
        }
    }

    /// Get the number of operand bytes for this opcode.
    pub fn operand_size(self) -> usize {
        self.operand_widths().iter().sum()
    }

    /// Total encoded length, opcode byte included.
    pub fn length(self) -> usize {
        1 + self.operand_size()
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Noop => "NOOP",
            OpCode::LoadI => "LOADI",
            OpCode::AddI => "ADDI",
            OpCode::SubI => "SUBI",
            OpCode::MulI => "MULI",
            OpCode::DivI => "DIVI",
            OpCode::PopI => "POPI",
            OpCode::PushBT => "PUSHBT",
            OpCode::PushBF => "PUSHBF",
            OpCode::EqI => "EQI",
            OpCode::NeqI => "NEQI",
            OpCode::GtI => "GTI",
            OpCode::GteI => "GTEI",
            OpCode::LtI => "LTI",
            OpCode::LteI => "LTEI",
            OpCode::MinusI => "MINUSI",
            OpCode::BangB => "BANGB",
            OpCode::Jump => "JUMP",
            OpCode::JumpF => "JUMPF",
        }
    }

    /// Convert from u8 to OpCode.
    pub fn from_u8(byte: u8) -> Option<OpCode> {
        OpCode::ALL.get(usize::from(byte)).copied()
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> u8 {
        op as u8
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_roundtrip() {
        for op in OpCode::ALL {
            assert_eq!(OpCode::from_u8(op as u8), Some(op));
        }
    }

    #[test]
    fn test_invalid_opcode() {
        assert!(OpCode::from_u8(OpCode::ALL.len() as u8).is_none());
        assert!(OpCode::from_u8(255).is_none());
    }

    #[test]
    fn test_lengths() {
        assert_eq!(OpCode::Noop.length(), 1);
        assert_eq!(OpCode::AddI.length(), 1);
        assert_eq!(OpCode::LoadI.length(), 3);
        assert_eq!(OpCode::Jump.length(), 3);
        assert_eq!(OpCode::JumpF.length(), 3);
    }
}
