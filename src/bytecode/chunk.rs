//! Compiled bytecode: the instruction stream and its constant pool.

use crate::bytecode::instruction::{OpCode, WORD_WIDTH};

/// A growable byte buffer with big-endian integer access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    bytes: Vec<u8>,
}

impl ByteBuffer {
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn get(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    pub fn push_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Append the low `width` bytes of `value`, most significant first.
    pub fn push_uint(&mut self, value: u64, width: usize) {
        for i in (0..width).rev() {
            self.bytes.push((value >> (8 * i)) as u8);
        }
    }

    /// Read a `width`-byte big-endian integer at `offset`.
    pub fn read_uint(&self, offset: usize, width: usize) -> Option<u64> {
        let end = offset.checked_add(width)?;
        let slice = self.bytes.get(offset..end)?;
        Some(
            slice
                .iter()
                .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte)),
        )
    }

    /// Overwrite `width` bytes at `offset` with `value`. Returns false if the
    /// range is outside the buffer.
    pub fn patch_uint(&mut self, offset: usize, value: u64, width: usize) -> bool {
        let Some(end) = offset.checked_add(width) else {
            return false;
        };
        let Some(slice) = self.bytes.get_mut(offset..end) else {
            return false;
        };
        for (i, byte) in slice.iter_mut().enumerate() {
            *byte = (value >> (8 * (width - 1 - i))) as u8;
        }
        true
    }
}

/// Flat pool of 4-byte big-endian integers, addressed by byte offset.
/// Values are appended as-is; duplicates are not merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantPool {
    bytes: ByteBuffer,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value and return its byte offset.
    pub fn add(&mut self, value: i32) -> usize {
        let address = self.bytes.len();
        self.bytes.push_uint(u64::from(value as u32), WORD_WIDTH);
        address
    }

    pub fn get(&self, address: usize) -> Option<i32> {
        self.bytes
            .read_uint(address, WORD_WIDTH)
            .map(|word| word as u32 as i32)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_bytes()
    }
}

/// A compiled program ready for the VM.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BytecodeProgram {
    /// The bytecode instructions.
    pub code: ByteBuffer,
    /// The constant pool.
    pub constants: ConstantPool,
}

impl BytecodeProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write an opcode.
    pub fn write_op(&mut self, op: OpCode) {
        self.code.push_byte(op.into());
    }

    /// Write a 16-bit operand (big-endian).
    pub fn write_u16(&mut self, value: u16) {
        self.code.push_uint(u64::from(value), 2);
    }

    /// Read a 16-bit operand at offset.
    pub fn read_u16(&self, offset: usize) -> Option<u16> {
        self.code.read_uint(offset, 2).map(|value| value as u16)
    }

    /// Overwrite a 16-bit operand in place.
    pub fn patch_u16(&mut self, offset: usize, value: u16) -> bool {
        self.code.patch_uint(offset, u64::from(value), 2)
    }

    /// Add a constant to the pool and return its byte offset.
    pub fn add_constant(&mut self, value: i32) -> usize {
        self.constants.add(value)
    }

    /// Get the current offset in the code.
    pub fn current_offset(&self) -> usize {
        self.code.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_layout() {
        let mut buffer = ByteBuffer::new();
        buffer.push_uint(0x0102, 2);
        buffer.push_uint(0xA0B0C0D0, 4);
        assert_eq!(buffer.as_bytes(), &[0x01, 0x02, 0xA0, 0xB0, 0xC0, 0xD0]);
        assert_eq!(buffer.read_uint(2, 4), Some(0xA0B0C0D0));
        assert_eq!(buffer.read_uint(4, 4), None);
    }

    #[test]
    fn test_patch_in_place() {
        let mut buffer = ByteBuffer::new();
        buffer.push_byte(9);
        buffer.push_uint(0xFFFF, 2);
        assert!(buffer.patch_uint(1, 0x0010, 2));
        assert_eq!(buffer.as_bytes(), &[9, 0x00, 0x10]);
        assert!(!buffer.patch_uint(2, 0, 2));
    }

    #[test]
    fn test_constant_pool_offsets() {
        let mut pool = ConstantPool::new();
        assert_eq!(pool.add(7), 0);
        assert_eq!(pool.add(7), 4);
        assert_eq!(pool.add(-2), 8);
        assert_eq!(pool.get(4), Some(7));
        assert_eq!(pool.get(8), Some(-2));
        assert_eq!(pool.get(9), None);
        assert_eq!(&pool.as_bytes()[8..], &[0xFF, 0xFF, 0xFF, 0xFE]);
    }

    #[test]
    fn test_program_operands() {
        let mut program = BytecodeProgram::new();
        program.write_op(OpCode::Jump);
        program.write_u16(0xFFFF);
        assert!(program.patch_u16(1, 3));
        assert_eq!(program.code.as_bytes(), &[OpCode::Jump as u8, 0x00, 0x03]);
        assert_eq!(program.read_u16(1), Some(3));
        assert_eq!(program.current_offset(), 3);
    }
}
