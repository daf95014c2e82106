pub mod cpu;
mod error;
pub mod machine;
pub mod memory;
pub mod runner;
pub mod worker;

pub use error::EmulationFault;
pub use machine::{Snapshot, Vm, VmConfig};
pub use runner::{PauseHandle, RunConfig, RunReport, Runner, StopReason};

/// DMG master clock frequency in T-cycles per second.
pub const CLOCK_HZ: u32 = 4_194_304;
/// T-cycles in one DMG video frame (154 lines of 456 cycles).
pub const CYCLES_PER_FRAME: u32 = 70_224;
