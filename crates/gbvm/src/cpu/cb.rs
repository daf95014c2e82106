use crate::memory::MemoryAccess;

use super::alu::Shift;
use super::helpers::HL_INDIRECT;
use super::{Cpu, Executed, Flags, Opcode};

/// Cost of fetching the 0xCB prefix itself.
const CB_PREFIX_CYCLES: u32 = 4;

impl Cpu {
    /// 0xCB: read the byte after the prefix and run it through the CB table.
    /// The instruction is two bytes long and costs the prefix plus whatever
    /// the CB handler reports.
    pub(super) fn exec_cb<M: MemoryAccess>(&mut self, memory: &mut M, op: Opcode) -> Executed {
        let cb = op.byte(memory);
        let cycles = self.exec_cb_instruction(memory, cb);
        Executed::advance(2, CB_PREFIX_CYCLES + cycles)
    }

    /// Handle CB-prefixed instructions (bit operations, shifts, and rotates).
    ///
    /// Returns the cycles spent after the prefix: 4 on a register, 8 for
    /// `BIT n,(HL)`, 12 for the read-modify-write forms on (HL).
    fn exec_cb_instruction<M: MemoryAccess>(&mut self, memory: &mut M, cb: u8) -> u32 {
        let x = cb >> 6;
        let y = (cb >> 3) & 0x07;
        let z = cb & 0x07;
        let value = self.read_r8(memory, z);

        match x {
            // Rotates and shifts.
            0 => {
                let result = self.alu_shift(Shift::from_index(y), value);
                self.write_r8(memory, z, result);
            }
            // BIT y, r
            1 => {
                let carry = self.get_flag(Flags::C);
                self.clear_flags();
                self.set_flag(Flags::Z, value & (1 << y) == 0);
                self.set_flag(Flags::H, true);
                self.set_flag(Flags::C, carry);
                return if z == HL_INDIRECT { 8 } else { 4 };
            }
            // RES y, r
            2 => self.write_r8(memory, z, value & !(1 << y)),
            // SET y, r
            _ => self.write_r8(memory, z, value | (1 << y)),
        }

        if z == HL_INDIRECT {
            12
        } else {
            4
        }
    }
}
