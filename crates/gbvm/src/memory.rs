mod boot_rom;
mod mmu;
mod ram;

pub use boot_rom::{BOOT_ROM, BOOT_ROM_SIZE};
pub use mmu::Mmu;
pub use ram::Memory;

/// Total addressable memory (64 KiB).
pub const MEMORY_SIZE: usize = 0x10000;

/// Byte-addressed access to the 16-bit address space.
///
/// Implementors only provide single-byte reads and writes; the word and bulk
/// helpers are built on top of them so that every write goes through the
/// implementor's own write path (echo RAM mirroring, overlays, ...).
///
/// Words use the store order of this machine's stack: the high byte lives at
/// `addr` and the low byte at `addr + 1`. Addresses wrap at 0xFFFF.
pub trait MemoryAccess {
    fn read_byte(&self, addr: u16) -> u8;
    fn write_byte(&mut self, addr: u16, value: u8);

    fn read_word(&self, addr: u16) -> u16 {
        u16::from_be_bytes([self.read_byte(addr), self.read_byte(addr.wrapping_add(1))])
    }

    fn write_word(&mut self, addr: u16, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.write_byte(addr, hi);
        self.write_byte(addr.wrapping_add(1), lo);
    }

    /// Write `bytes` sequentially starting at `offset`.
    fn load_bytes(&mut self, bytes: &[u8], offset: u16) {
        for (i, &byte) in bytes.iter().enumerate() {
            self.write_byte(offset.wrapping_add(i as u16), byte);
        }
    }
}
