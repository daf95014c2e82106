//! LR35902 execution engine.
//!
//! Decoding is an exhaustive `match` over the instruction byte (and a second
//! one over the byte after a `0xCB` prefix). Handlers never move PC
//! themselves: each returns an [`Executed`] describing its cost and where
//! execution continues, and [`Cpu::step`] applies that exactly once.

mod alu;
mod cb;
mod exec;
mod helpers;
mod opcode;
mod program_counter;
mod regs;

pub use exec::{Effect, Executed, NextPc};
pub use opcode::Opcode;
pub use program_counter::ProgramCounter;
pub use regs::{Flags, Reg16, Reg8, RegisterSnapshot, Registers};

use crate::memory::MemoryAccess;
use crate::EmulationFault;

/// Game Boy CPU core: the register file plus the instruction handlers.
///
/// Machine-level state that instructions only *request* changes to (IME,
/// HALT/STOP) is owned by [`crate::Vm`] and driven through [`Effect`]s.
#[derive(Clone, Debug, Default)]
pub struct Cpu {
    pub regs: Registers,
}

impl Cpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero all registers, PC included.
    pub fn reset(&mut self) {
        self.regs.clear();
    }

    /// Register values the DMG boot ROM leaves behind when it jumps to the
    /// cartridge entry point at 0x0100 (Pan Docs, "Power Up Sequence").
    pub fn apply_post_boot_state(&mut self) {
        self.regs.set_af(0x01B0);
        self.regs.set_bc(0x0013);
        self.regs.set_de(0x00D8);
        self.regs.set_hl(0x014D);
        self.regs.sp = 0xFFFE;
        self.regs.pc.jump(0x0100);
    }

    #[inline]
    pub fn get_flag(&self, flag: Flags) -> bool {
        self.regs.flag(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flags, value: bool) {
        self.regs.set_flag(flag, value);
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.regs.clear_flags();
    }

    /// Fetch the instruction at PC, execute it and move PC past it (or to the
    /// jump target).
    ///
    /// On an unhandled opcode nothing is modified, PC included.
    pub fn step<M: MemoryAccess>(&mut self, memory: &mut M) -> Result<Executed, EmulationFault> {
        let op = self.regs.pc.fetch(memory);
        let executed = self.execute(memory, op)?;
        match executed.next {
            NextPc::Advance(size) => self.regs.pc.increment(size),
            NextPc::Jump(target) => self.regs.pc.jump(target),
        }
        Ok(executed)
    }

    /// Execute `op` against the registers and `memory` without touching PC.
    pub fn execute<M: MemoryAccess>(
        &mut self,
        memory: &mut M,
        op: Opcode,
    ) -> Result<Executed, EmulationFault> {
        let executed = self.exec_opcode(memory, op)?;
        log::trace!(
            "exec 0x{:02X} at 0x{:04X}: {} cycles",
            op.instruction(),
            op.offset(),
            executed.cycles
        );
        Ok(executed)
    }
}
