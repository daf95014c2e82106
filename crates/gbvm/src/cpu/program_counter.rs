use crate::memory::MemoryAccess;

use super::Opcode;

/// The 16-bit PC register.
///
/// All arithmetic wraps at 0xFFFF.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ProgramCounter(u16);

impl ProgramCounter {
    pub const fn new(offset: u16) -> Self {
        Self(offset)
    }

    #[inline]
    pub const fn offset(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn increment(&mut self, n: u16) {
        self.0 = self.0.wrapping_add(n);
    }

    #[inline]
    pub fn decrement(&mut self, n: u16) {
        self.0 = self.0.wrapping_sub(n);
    }

    #[inline]
    pub fn jump(&mut self, addr: u16) {
        self.0 = addr;
    }

    /// Decode view of the instruction at PC. PC itself does not move.
    #[inline]
    pub fn fetch<M: MemoryAccess + ?Sized>(self, memory: &M) -> Opcode {
        Opcode::read(memory, self.0)
    }
}
