use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal condition raised by the execution engine.
///
/// A fault is terminal for the machine that raised it: [`crate::Vm`] keeps
/// returning it from every later `cycle()` until the machine is reset.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EmulationFault {
    /// The primary opcode table has no handler for this byte.
    #[error("unhandled opcode 0x{opcode:02X} at 0x{offset:04X}")]
    UnhandledOpcode { opcode: u8, offset: u16 },
}

impl EmulationFault {
    /// The instruction byte that caused the fault.
    pub fn opcode(&self) -> u8 {
        match self {
            EmulationFault::UnhandledOpcode { opcode, .. } => *opcode,
        }
    }

    /// Address of the faulting instruction.
    pub fn offset(&self) -> u16 {
        match self {
            EmulationFault::UnhandledOpcode { offset, .. } => *offset,
        }
    }
}
