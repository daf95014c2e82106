mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use crate::memory::MemoryAccess;
use crate::EmulationFault;

use super::{Cpu, Opcode};

/// Where execution continues after an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextPc {
    /// Fall through to the next instruction, `size` bytes further on.
    Advance(u16),
    /// Continue at an absolute address.
    Jump(u16),
}

/// Machine-level state change requested by an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// EI: IME becomes set once the *next* instruction has completed.
    EnableInterrupts,
    /// RETI: IME becomes set immediately.
    EnableInterruptsNow,
    /// DI: IME is cleared immediately and a pending EI is cancelled.
    DisableInterrupts,
    Halt,
    Stop,
}

/// Outcome of one executed instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Executed {
    /// Elapsed T-cycles, always a multiple of 4.
    pub cycles: u32,
    pub next: NextPc,
    pub effect: Option<Effect>,
}

impl Executed {
    #[inline]
    pub(crate) const fn advance(size: u16, cycles: u32) -> Self {
        Self {
            cycles,
            next: NextPc::Advance(size),
            effect: None,
        }
    }

    #[inline]
    pub(crate) const fn jump(target: u16, cycles: u32) -> Self {
        Self {
            cycles,
            next: NextPc::Jump(target),
            effect: None,
        }
    }

    #[inline]
    pub(crate) const fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }
}

impl Cpu {
    /// Decode and execute a single opcode.
    ///
    /// This is the primary opcode table. Bytes with no instruction assigned
    /// fall through to the last arm, which reports the fault before any
    /// register or memory has been touched.
    pub(super) fn exec_opcode<M: MemoryAccess>(
        &mut self,
        memory: &mut M,
        op: Opcode,
    ) -> Result<Executed, EmulationFault> {
        let executed = match op.instruction() {
            // NOP
            0x00 => Executed::advance(1, 4),

            // LD rr, d16
            0x01 | 0x11 | 0x21 | 0x31 => self.exec_ld_rr_d16(memory, op),

            // LD (BC/DE/HL±), A
            0x02 | 0x12 | 0x22 | 0x32 => self.exec_ld_indirect_a(memory, op),

            // LD A, (BC/DE/HL±)
            0x0A | 0x1A | 0x2A | 0x3A => self.exec_ld_a_indirect(memory, op),

            // INC rr / DEC rr
            0x03 | 0x13 | 0x23 | 0x33 => self.exec_inc16_rr(op),
            0x0B | 0x1B | 0x2B | 0x3B => self.exec_dec16_rr(op),

            // INC r / DEC r (and (HL))
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
                self.exec_inc8_reg(memory, op)
            }
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
                self.exec_dec8_reg(memory, op)
            }

            // LD r, d8 (and LD (HL), d8)
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
                self.exec_ld_r_d8(memory, op)
            }

            // RLCA / RRCA / RLA / RRA
            0x07 | 0x0F | 0x17 | 0x1F => self.exec_rotate_a(op),

            // LD (a16), SP
            0x08 => self.exec_ld_a16_sp(memory, op),

            // ADD HL, rr
            0x09 | 0x19 | 0x29 | 0x39 => self.exec_add_hl_rr(op),

            // STOP
            0x10 => self.exec_stop(),

            // JR r8 / JR cc, r8
            0x18 => self.exec_jr(memory, op, true),
            0x20 | 0x28 | 0x30 | 0x38 => self.exec_jr_cc(memory, op),

            0x27 => self.exec_daa(),
            0x2F => self.exec_cpl(),
            0x37 => self.exec_scf(),
            0x3F => self.exec_ccf(),

            // HALT sits in the middle of the LD r, r' block.
            0x76 => self.exec_halt(),

            // LD r, r'
            0x40..=0x7F => self.exec_ld_r_r(memory, op),

            // ADD/ADC/SUB/SBC/AND/XOR/OR/CP r
            0x80..=0xBF => self.exec_alu_reg_group(memory, op),

            // RET cc / RET / RETI
            0xC0 | 0xC8 | 0xD0 | 0xD8 => self.exec_ret_cc(memory, op),
            0xC9 => self.exec_ret(memory),
            0xD9 => self.exec_reti(memory),

            // POP rr / PUSH rr
            0xC1 | 0xD1 | 0xE1 | 0xF1 => self.exec_pop_rr(memory, op),
            0xC5 | 0xD5 | 0xE5 | 0xF5 => self.exec_push_rr(memory, op),

            // JP cc, a16 / JP a16 / JP (HL)
            0xC2 | 0xCA | 0xD2 | 0xDA => self.exec_jp_cc(memory, op),
            0xC3 => self.exec_jp_a16(memory, op),
            0xE9 => self.exec_jp_hl(),

            // CALL cc, a16 / CALL a16
            0xC4 | 0xCC | 0xD4 | 0xDC => self.exec_call_cc(memory, op),
            0xCD => self.exec_call_a16(memory, op),

            // ALU d8
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
                self.exec_alu_imm(memory, op)
            }

            // RST n
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => self.exec_rst(memory, op),

            // CB prefix: secondary table.
            0xCB => self.exec_cb(memory, op),

            // LDH (a8), A / LDH A, (a8)
            0xE0 | 0xF0 => self.exec_ldh_a8(memory, op),

            // LD (C), A / LD A, (C)
            0xE2 | 0xF2 => self.exec_ldh_c(memory, op),

            // LD (a16), A / LD A, (a16)
            0xEA | 0xFA => self.exec_ld_a16_a(memory, op),

            // ADD SP, r8 / LD HL, SP+r8 / LD SP, HL
            0xE8 => self.exec_add_sp_r8(memory, op),
            0xF8 => self.exec_ld_hl_sp_r8(memory, op),
            0xF9 => self.exec_ld_sp_hl(),

            0xF3 => self.exec_di(),
            0xFB => self.exec_ei(),

            // Opcode holes: D3, DB, DD, E3, E4, EB, EC, ED, F4, FC, FD.
            opcode => {
                return Err(EmulationFault::UnhandledOpcode {
                    opcode,
                    offset: op.offset(),
                })
            }
        };

        Ok(executed)
    }
}
