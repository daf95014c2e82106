use crate::memory::MemoryAccess;

use super::{Cpu, Flags, Reg16, Reg8};

/// Operand index 6 in the r8 encoding: the byte at (HL).
pub(super) const HL_INDIRECT: u8 = 6;

/// r8 operand encoding used throughout the opcode tables:
/// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
const R8: [Option<Reg8>; 8] = [
    Some(Reg8::B),
    Some(Reg8::C),
    Some(Reg8::D),
    Some(Reg8::E),
    Some(Reg8::H),
    Some(Reg8::L),
    None,
    Some(Reg8::A),
];

/// rp encoding (16-bit loads, INC/DEC, ADD HL): BC, DE, HL, SP.
const RP: [Reg16; 4] = [Reg16::BC, Reg16::DE, Reg16::HL, Reg16::SP];

/// rp2 encoding (PUSH/POP): BC, DE, HL, AF.
const RP2: [Reg16; 4] = [Reg16::BC, Reg16::DE, Reg16::HL, Reg16::AF];

impl Cpu {
    #[inline]
    pub(super) fn read_r8<M: MemoryAccess>(&self, memory: &M, index: u8) -> u8 {
        match R8[(index & 0x07) as usize] {
            Some(reg) => self.regs.get(reg),
            None => memory.read_byte(self.regs.hl()),
        }
    }

    #[inline]
    pub(super) fn write_r8<M: MemoryAccess>(&mut self, memory: &mut M, index: u8, value: u8) {
        match R8[(index & 0x07) as usize] {
            Some(reg) => self.regs.set(reg, value),
            None => memory.write_byte(self.regs.hl(), value),
        }
    }

    #[inline]
    pub(super) fn read_rp(&self, index: u8) -> u16 {
        self.regs.get16(RP[(index & 0x03) as usize])
    }

    #[inline]
    pub(super) fn write_rp(&mut self, index: u8, value: u16) {
        self.regs.set16(RP[(index & 0x03) as usize], value);
    }

    #[inline]
    pub(super) fn read_rp2(&self, index: u8) -> u16 {
        self.regs.get16(RP2[(index & 0x03) as usize])
    }

    #[inline]
    pub(super) fn write_rp2(&mut self, index: u8, value: u16) {
        self.regs.set16(RP2[(index & 0x03) as usize], value);
    }

    /// NZ, Z, NC, C.
    #[inline]
    pub(super) fn condition(&self, cc: u8) -> bool {
        match cc & 0x03 {
            0 => !self.get_flag(Flags::Z),
            1 => self.get_flag(Flags::Z),
            2 => !self.get_flag(Flags::C),
            _ => self.get_flag(Flags::C),
        }
    }

    /// Stack grows downward: SP drops by two, then the word is stored at the
    /// new SP.
    #[inline]
    pub(super) fn push_word<M: MemoryAccess>(&mut self, memory: &mut M, value: u16) {
        self.regs.sp = self.regs.sp.wrapping_sub(2);
        memory.write_word(self.regs.sp, value);
    }

    #[inline]
    pub(super) fn pop_word<M: MemoryAccess>(&mut self, memory: &M) -> u16 {
        let value = memory.read_word(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(2);
        value
    }
}
