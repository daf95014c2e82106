use crate::cpu::{Cpu, Effect, Executed, Opcode};
use crate::memory::MemoryAccess;

impl Cpu {
    pub(super) fn exec_push_rr<M: MemoryAccess>(&mut self, memory: &mut M, op: Opcode) -> Executed {
        debug_assert!(matches!(op.instruction(), 0xC5 | 0xD5 | 0xE5 | 0xF5));
        let value = self.read_rp2(op.instruction() >> 4);
        self.push_word(memory, value);
        Executed::advance(1, 16)
    }

    /// POP AF drops the low nibble of F along the way.
    pub(super) fn exec_pop_rr<M: MemoryAccess>(&mut self, memory: &M, op: Opcode) -> Executed {
        debug_assert!(matches!(op.instruction(), 0xC1 | 0xD1 | 0xE1 | 0xF1));
        let value = self.pop_word(memory);
        self.write_rp2(op.instruction() >> 4, value);
        Executed::advance(1, 12)
    }

    pub(super) fn exec_call_a16<M: MemoryAccess>(&mut self, memory: &mut M, op: Opcode) -> Executed {
        let target = op.word(memory);
        self.push_word(memory, op.next(3));
        Executed::jump(target, 24)
    }

    pub(super) fn exec_call_cc<M: MemoryAccess>(&mut self, memory: &mut M, op: Opcode) -> Executed {
        if self.condition(op.instruction() >> 3) {
            self.exec_call_a16(memory, op)
        } else {
            Executed::advance(3, 12)
        }
    }

    pub(super) fn exec_ret<M: MemoryAccess>(&mut self, memory: &M) -> Executed {
        let target = self.pop_word(memory);
        Executed::jump(target, 16)
    }

    pub(super) fn exec_ret_cc<M: MemoryAccess>(&mut self, memory: &M, op: Opcode) -> Executed {
        if self.condition(op.instruction() >> 3) {
            let target = self.pop_word(memory);
            Executed::jump(target, 20)
        } else {
            Executed::advance(1, 8)
        }
    }

    pub(super) fn exec_reti<M: MemoryAccess>(&mut self, memory: &M) -> Executed {
        self.exec_ret(memory).with_effect(Effect::EnableInterruptsNow)
    }

    pub(super) fn exec_rst<M: MemoryAccess>(&mut self, memory: &mut M, op: Opcode) -> Executed {
        self.push_word(memory, op.next(1));
        Executed::jump((op.instruction() & 0x38) as u16, 16)
    }
}
