mod schedule;
mod snapshot;
mod vm;

pub use schedule::{Schedule, ScheduledEffect};
pub use snapshot::Snapshot;
pub use vm::{PowerState, Vm, VmConfig};

/// Ticks charged for one `cycle()` while the CPU is halted or stopped.
pub const IDLE_CYCLES: u32 = 4;

/// Address of the last boot ROM instruction (`LDH (0x50),A`).
const BOOT_ROM_EXIT: u16 = 0x00FE;
/// Cartridge entry point reached when the boot ROM hands over.
const CARTRIDGE_ENTRY: u16 = 0x0100;

#[cfg(test)]
mod tests;
