use crate::cpu::helpers::HL_INDIRECT;
use crate::cpu::{Cpu, Executed, Opcode};
use crate::memory::MemoryAccess;

/// Base of the high page used by LDH and LD (C).
const HIGH_PAGE: u16 = 0xFF00;

impl Cpu {
    pub(super) fn exec_ld_rr_d16<M: MemoryAccess>(&mut self, memory: &M, op: Opcode) -> Executed {
        let rp = (op.instruction() >> 4) & 0x03;
        let value = op.word(memory);
        self.write_rp(rp, value);
        Executed::advance(3, 12)
    }

    pub(super) fn exec_ld_r_d8<M: MemoryAccess>(&mut self, memory: &mut M, op: Opcode) -> Executed {
        let dst = (op.instruction() >> 3) & 0x07;
        let value = op.byte(memory);
        self.write_r8(memory, dst, value);
        Executed::advance(2, if dst == HL_INDIRECT { 12 } else { 8 })
    }

    /// LD r, r' for 0x40–0x7F (HALT is decoded before this).
    pub(super) fn exec_ld_r_r<M: MemoryAccess>(&mut self, memory: &mut M, op: Opcode) -> Executed {
        debug_assert!((0x40..=0x7F).contains(&op.instruction()) && op.instruction() != 0x76);
        let dst = (op.instruction() >> 3) & 0x07;
        let src = op.instruction() & 0x07;
        let value = self.read_r8(memory, src);
        self.write_r8(memory, dst, value);

        if dst == HL_INDIRECT || src == HL_INDIRECT {
            Executed::advance(1, 8)
        } else {
            Executed::advance(1, 4)
        }
    }

    /// LD (BC),A / LD (DE),A / LD (HL+),A / LD (HL-),A
    pub(super) fn exec_ld_indirect_a<M: MemoryAccess>(&mut self, memory: &mut M, op: Opcode) -> Executed {
        let addr = self.indirect_address(op.instruction());
        memory.write_byte(addr, self.regs.a());
        Executed::advance(1, 8)
    }

    /// LD A,(BC) / LD A,(DE) / LD A,(HL+) / LD A,(HL-)
    pub(super) fn exec_ld_a_indirect<M: MemoryAccess>(&mut self, memory: &M, op: Opcode) -> Executed {
        let addr = self.indirect_address(op.instruction());
        self.regs.set_a(memory.read_byte(addr));
        Executed::advance(1, 8)
    }

    /// Address for the (BC)/(DE)/(HL+)/(HL-) group, applying the HL
    /// post-increment or post-decrement.
    fn indirect_address(&mut self, opcode: u8) -> u16 {
        match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            _ => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(super) fn exec_ld_a16_sp<M: MemoryAccess>(&mut self, memory: &mut M, op: Opcode) -> Executed {
        let addr = op.word(memory);
        memory.write_word(addr, self.regs.sp);
        Executed::advance(3, 20)
    }

    /// LDH (a8),A (0xE0) / LDH A,(a8) (0xF0)
    pub(super) fn exec_ldh_a8<M: MemoryAccess>(&mut self, memory: &mut M, op: Opcode) -> Executed {
        let addr = HIGH_PAGE + op.byte(memory) as u16;
        if op.instruction() == 0xE0 {
            memory.write_byte(addr, self.regs.a());
        } else {
            self.regs.set_a(memory.read_byte(addr));
        }
        Executed::advance(2, 12)
    }

    /// LD (C),A (0xE2) / LD A,(C) (0xF2)
    pub(super) fn exec_ldh_c<M: MemoryAccess>(&mut self, memory: &mut M, op: Opcode) -> Executed {
        let addr = HIGH_PAGE + self.regs.c() as u16;
        if op.instruction() == 0xE2 {
            memory.write_byte(addr, self.regs.a());
        } else {
            self.regs.set_a(memory.read_byte(addr));
        }
        Executed::advance(1, 8)
    }

    /// LD (a16),A (0xEA) / LD A,(a16) (0xFA)
    pub(super) fn exec_ld_a16_a<M: MemoryAccess>(&mut self, memory: &mut M, op: Opcode) -> Executed {
        let addr = op.word(memory);
        if op.instruction() == 0xEA {
            memory.write_byte(addr, self.regs.a());
        } else {
            self.regs.set_a(memory.read_byte(addr));
        }
        Executed::advance(3, 16)
    }

    pub(super) fn exec_ld_sp_hl(&mut self) -> Executed {
        self.regs.sp = self.regs.hl();
        Executed::advance(1, 8)
    }

    pub(super) fn exec_ld_hl_sp_r8<M: MemoryAccess>(&mut self, memory: &M, op: Opcode) -> Executed {
        let offset = op.signed_byte(memory);
        let result = self.alu_add16_signed(self.regs.sp, offset);
        self.regs.set_hl(result);
        Executed::advance(2, 12)
    }
}
