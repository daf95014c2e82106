use crate::cpu::{Cpu, Executed, Opcode};
use crate::memory::MemoryAccess;

impl Cpu {
    /// Relative jump. The displacement is relative to the address right
    /// after the two-byte instruction.
    pub(super) fn exec_jr<M: MemoryAccess>(&mut self, memory: &M, op: Opcode, taken: bool) -> Executed {
        if taken {
            let displacement = op.signed_byte(memory);
            let target = op.next(2).wrapping_add_signed(displacement as i16);
            Executed::jump(target, 12)
        } else {
            Executed::advance(2, 8)
        }
    }

    pub(super) fn exec_jr_cc<M: MemoryAccess>(&mut self, memory: &M, op: Opcode) -> Executed {
        debug_assert!(matches!(op.instruction(), 0x20 | 0x28 | 0x30 | 0x38));
        let taken = self.condition(op.instruction() >> 3);
        self.exec_jr(memory, op, taken)
    }

    pub(super) fn exec_jp_a16<M: MemoryAccess>(&mut self, memory: &M, op: Opcode) -> Executed {
        Executed::jump(op.word(memory), 16)
    }

    pub(super) fn exec_jp_cc<M: MemoryAccess>(&mut self, memory: &M, op: Opcode) -> Executed {
        debug_assert!(matches!(op.instruction(), 0xC2 | 0xCA | 0xD2 | 0xDA));
        if self.condition(op.instruction() >> 3) {
            self.exec_jp_a16(memory, op)
        } else {
            Executed::advance(3, 12)
        }
    }

    pub(super) fn exec_jp_hl(&mut self) -> Executed {
        Executed::jump(self.regs.hl(), 4)
    }
}
