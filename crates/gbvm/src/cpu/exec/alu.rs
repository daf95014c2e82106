use crate::cpu::alu::Shift;
use crate::cpu::helpers::HL_INDIRECT;
use crate::cpu::{Cpu, Executed, Flags, Opcode};
use crate::memory::MemoryAccess;

impl Cpu {
    pub(super) fn exec_alu_reg_group<M: MemoryAccess>(&mut self, memory: &M, op: Opcode) -> Executed {
        debug_assert!((0x80..=0xBF).contains(&op.instruction()));
        let operation = (op.instruction() >> 3) & 0x07;
        let src = op.instruction() & 0x07;
        let value = self.read_r8(memory, src);

        self.alu_op(operation, value);

        Executed::advance(1, if src == HL_INDIRECT { 8 } else { 4 })
    }

    pub(super) fn exec_alu_imm<M: MemoryAccess>(&mut self, memory: &M, op: Opcode) -> Executed {
        let operation = (op.instruction() >> 3) & 0x07;
        let value = op.byte(memory);

        self.alu_op(operation, value);

        Executed::advance(2, 8)
    }

    /// RLCA / RRCA / RLA / RRA: the CB rotates applied to A, except that Z
    /// is always cleared.
    pub(super) fn exec_rotate_a(&mut self, op: Opcode) -> Executed {
        debug_assert!(matches!(op.instruction(), 0x07 | 0x0F | 0x17 | 0x1F));
        let shift = Shift::from_index(op.instruction() >> 3);
        let result = self.alu_shift(shift, self.regs.a());
        self.regs.set_a(result);
        self.set_flag(Flags::Z, false);
        Executed::advance(1, 4)
    }

    pub(super) fn exec_add_hl_rr(&mut self, op: Opcode) -> Executed {
        debug_assert!(matches!(op.instruction(), 0x09 | 0x19 | 0x29 | 0x39));
        let value = self.read_rp(op.instruction() >> 4);
        self.alu_add16_hl(value);
        Executed::advance(1, 8)
    }

    pub(super) fn exec_add_sp_r8<M: MemoryAccess>(&mut self, memory: &M, op: Opcode) -> Executed {
        let offset = op.signed_byte(memory);
        self.regs.sp = self.alu_add16_signed(self.regs.sp, offset);
        Executed::advance(2, 16)
    }

    pub(super) fn exec_daa(&mut self) -> Executed {
        self.alu_daa();
        Executed::advance(1, 4)
    }

    pub(super) fn exec_cpl(&mut self) -> Executed {
        self.regs.set_a(!self.regs.a());
        self.set_flag(Flags::H, true);
        self.set_flag(Flags::N, true);
        Executed::advance(1, 4)
    }

    pub(super) fn exec_scf(&mut self) -> Executed {
        self.set_flag(Flags::C, true);
        self.set_flag(Flags::H, false);
        self.set_flag(Flags::N, false);
        Executed::advance(1, 4)
    }

    pub(super) fn exec_ccf(&mut self) -> Executed {
        let carry = self.get_flag(Flags::C);
        self.set_flag(Flags::C, !carry);
        self.set_flag(Flags::H, false);
        self.set_flag(Flags::N, false);
        Executed::advance(1, 4)
    }
}
