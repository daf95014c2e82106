use std::ops::RangeInclusive;

use super::{MemoryAccess, MEMORY_SIZE};

/// Start of internal work RAM.
const WRAM_START: u16 = 0xC000;
/// End (exclusive) of the part of work RAM that has an echo.
const WRAM_ECHOED_END: u16 = 0xDE00;
/// Echo RAM window.
const ECHO_START: u16 = 0xE000;
const ECHO_END: u16 = 0xFE00;

/// Flat 64 KiB RAM with the C000/E000 echo.
///
/// E000–FDFF addresses the same internal RAM as C000–DDFF: a byte written to
/// either address shows up at both. The echo is kept by mirroring on write,
/// so reads from either side need no translation.
#[derive(Clone)]
pub struct Memory {
    ram: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Self {
            ram: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    /// Zero every byte.
    pub fn clear(&mut self) {
        self.ram.fill(0);
    }

    /// Borrow an inclusive range of RAM, e.g. for tile data snapshots.
    ///
    /// A reversed range borrows nothing.
    pub fn window(&self, range: RangeInclusive<u16>) -> &[u8] {
        let (start, end) = range.into_inner();
        if start > end {
            return &[];
        }
        &self.ram[start as usize..=end as usize]
    }

    /// Address that shares storage with `addr`, if any.
    #[inline]
    fn echo_of(addr: u16) -> Option<u16> {
        if (ECHO_START..ECHO_END).contains(&addr) {
            Some(WRAM_START + (addr - ECHO_START))
        } else if (WRAM_START..WRAM_ECHOED_END).contains(&addr) {
            Some(ECHO_START + (addr - WRAM_START))
        } else {
            None
        }
    }
}

impl MemoryAccess for Memory {
    #[inline]
    fn read_byte(&self, addr: u16) -> u8 {
        self.ram[addr as usize]
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        self.ram[addr as usize] = value;
        if let Some(echo) = Self::echo_of(addr) {
            self.ram[echo as usize] = value;
        }
    }
}
