use super::{Memory, MemoryAccess, BOOT_ROM, BOOT_ROM_SIZE};

/// Memory with the boot ROM overlay on top.
///
/// While boot ROM mode is on, reads from 0x0000–0x00FF come from the fixed
/// boot image instead of RAM. Writes always land in RAM, so cartridge bytes
/// loaded underneath the overlay become visible once it is switched off.
#[derive(Clone)]
pub struct Mmu {
    memory: Memory,
    boot_image: &'static [u8; BOOT_ROM_SIZE],
    boot_rom_mode: bool,
}

impl Default for Mmu {
    fn default() -> Self {
        Self::new(Memory::new())
    }
}

impl Mmu {
    pub fn new(memory: Memory) -> Self {
        Self {
            memory,
            boot_image: &BOOT_ROM,
            boot_rom_mode: false,
        }
    }

    pub fn is_boot_rom_mode(&self) -> bool {
        self.boot_rom_mode
    }

    pub fn set_boot_rom_mode(&mut self, enabled: bool) {
        self.boot_rom_mode = enabled;
    }

    pub fn boot_image(&self) -> &[u8; BOOT_ROM_SIZE] {
        self.boot_image
    }

    /// The RAM underneath the overlay.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Zero RAM. The boot image is never touched.
    pub fn clear(&mut self) {
        self.memory.clear();
    }
}

#[inline]
fn is_boot_rom_address(addr: u16) -> bool {
    (addr as usize) < BOOT_ROM_SIZE
}

impl MemoryAccess for Mmu {
    #[inline]
    fn read_byte(&self, addr: u16) -> u8 {
        if self.boot_rom_mode && is_boot_rom_address(addr) {
            self.boot_image[addr as usize]
        } else {
            self.memory.read_byte(addr)
        }
    }

    #[inline]
    fn write_byte(&mut self, addr: u16, value: u8) {
        self.memory.write_byte(addr, value);
    }
}
