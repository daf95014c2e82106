use crate::memory::MemoryAccess;

/// An instruction as seen at a given address.
///
/// Only the instruction byte is captured at fetch time; operands are read
/// through memory on demand so handlers touch exactly the bytes they use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Opcode {
    offset: u16,
    instruction: u8,
}

impl Opcode {
    pub fn read<M: MemoryAccess + ?Sized>(memory: &M, offset: u16) -> Self {
        Self {
            offset,
            instruction: memory.read_byte(offset),
        }
    }

    #[inline]
    pub fn offset(self) -> u16 {
        self.offset
    }

    #[inline]
    pub fn instruction(self) -> u8 {
        self.instruction
    }

    /// 8-bit immediate operand.
    #[inline]
    pub fn byte<M: MemoryAccess + ?Sized>(self, memory: &M) -> u8 {
        memory.read_byte(self.offset.wrapping_add(1))
    }

    /// 8-bit immediate operand as a two's-complement displacement.
    #[inline]
    pub fn signed_byte<M: MemoryAccess + ?Sized>(self, memory: &M) -> i8 {
        self.byte(memory) as i8
    }

    /// 16-bit immediate operand, in the same byte order as stack words
    /// (the byte right after the instruction is the high byte).
    #[inline]
    pub fn word<M: MemoryAccess + ?Sized>(self, memory: &M) -> u16 {
        memory.read_word(self.offset.wrapping_add(1))
    }

    /// Address right after this instruction when it is `size` bytes long.
    #[inline]
    pub fn next(self, size: u16) -> u16 {
        self.offset.wrapping_add(size)
    }
}
