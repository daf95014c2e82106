use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::cpu::{Cpu, RegisterSnapshot};
use crate::memory::{MemoryAccess, Mmu};

/// Copy of the state a host needs to draw a debugger view or a tile dump.
///
/// Everything is owned, so a snapshot can be sent across threads while the
/// machine keeps running.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub registers: RegisterSnapshot,
    /// Instruction byte at PC, as the CPU would fetch it.
    pub instruction: u8,
    /// Tile data block 0x8000-0x87FF.
    pub tiles_low: Vec<u8>,
    /// Tile data block 0x8800-0x8FFF.
    pub tiles_high: Vec<u8>,
    /// BGP, the background palette register.
    pub palette: u8,
}

impl Snapshot {
    pub const TILES_LOW: RangeInclusive<u16> = 0x8000..=0x87FF;
    pub const TILES_HIGH: RangeInclusive<u16> = 0x8800..=0x8FFF;
    pub const PALETTE: u16 = 0xFF47;

    pub fn capture(cpu: &Cpu, mmu: &Mmu) -> Self {
        let pc = cpu.regs.pc;
        Self {
            registers: cpu.regs.snapshot(),
            instruction: pc.fetch(mmu).instruction(),
            tiles_low: mmu.memory().window(Self::TILES_LOW).to_vec(),
            tiles_high: mmu.memory().window(Self::TILES_HIGH).to_vec(),
            palette: mmu.read_byte(Self::PALETTE),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
