use crate::cpu::helpers::HL_INDIRECT;
use crate::cpu::{Cpu, Executed, Opcode};
use crate::memory::MemoryAccess;

impl Cpu {
    pub(super) fn exec_inc8_reg<M: MemoryAccess>(&mut self, memory: &mut M, op: Opcode) -> Executed {
        let reg = (op.instruction() >> 3) & 0x07;
        let value = self.read_r8(memory, reg);
        let result = self.alu_inc8(value);
        self.write_r8(memory, reg, result);

        Executed::advance(1, if reg == HL_INDIRECT { 12 } else { 4 })
    }

    pub(super) fn exec_dec8_reg<M: MemoryAccess>(&mut self, memory: &mut M, op: Opcode) -> Executed {
        let reg = (op.instruction() >> 3) & 0x07;
        let value = self.read_r8(memory, reg);
        let result = self.alu_dec8(value);
        self.write_r8(memory, reg, result);

        Executed::advance(1, if reg == HL_INDIRECT { 12 } else { 4 })
    }

    /// 16-bit INC/DEC leave the flags alone.
    pub(super) fn exec_inc16_rr(&mut self, op: Opcode) -> Executed {
        let rp = op.instruction() >> 4;
        let value = self.read_rp(rp).wrapping_add(1);
        self.write_rp(rp, value);
        Executed::advance(1, 8)
    }

    pub(super) fn exec_dec16_rr(&mut self, op: Opcode) -> Executed {
        let rp = op.instruction() >> 4;
        let value = self.read_rp(rp).wrapping_sub(1);
        self.write_rp(rp, value);
        Executed::advance(1, 8)
    }
}
