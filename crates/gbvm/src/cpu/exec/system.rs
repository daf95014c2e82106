use crate::cpu::{Cpu, Effect, Executed};

impl Cpu {
    /// STOP is a two-byte instruction; the padding byte is skipped.
    pub(super) fn exec_stop(&mut self) -> Executed {
        Executed::advance(2, 4).with_effect(Effect::Stop)
    }

    pub(super) fn exec_halt(&mut self) -> Executed {
        Executed::advance(1, 4).with_effect(Effect::Halt)
    }

    pub(super) fn exec_di(&mut self) -> Executed {
        Executed::advance(1, 4).with_effect(Effect::DisableInterrupts)
    }

    pub(super) fn exec_ei(&mut self) -> Executed {
        Executed::advance(1, 4).with_effect(Effect::EnableInterrupts)
    }
}
