//! Reference driver for [`Vm`]: runs bursts of instructions against a tick
//! budget and honours pause requests between instructions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{EmulationFault, Vm, CLOCK_HZ, CYCLES_PER_FRAME};

#[derive(Clone, Copy, Debug, PartialEq, Eq, TypedBuilder)]
pub struct RunConfig {
    /// Emulated clock in ticks per second, used to turn wall-clock time into
    /// a tick budget.
    #[builder(default = CLOCK_HZ)]
    pub clock_hz: u32,
    /// Tick budget of one [`Runner::run_burst`] call.
    #[builder(default = CYCLES_PER_FRAME)]
    pub burst_cycles: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Shared pause flag. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct PauseHandle(Arc<AtomicBool>);

impl PauseHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    BudgetExhausted,
    Paused,
    Faulted(EmulationFault),
}

/// What one run did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Instructions retired. Idle slots while halted are not counted.
    pub instructions: u64,
    /// Ticks elapsed, idle slots included.
    pub cycles: u64,
    pub stop: StopReason,
}

pub struct Runner {
    vm: Vm,
    config: RunConfig,
    pause: PauseHandle,
}

impl Runner {
    pub fn new(vm: Vm, config: RunConfig) -> Self {
        Self {
            vm,
            config,
            pause: PauseHandle::new(),
        }
    }

    pub fn vm(&self) -> &Vm {
        &self.vm
    }

    pub fn vm_mut(&mut self) -> &mut Vm {
        &mut self.vm
    }

    pub fn into_vm(self) -> Vm {
        self.vm
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// A handle other threads can use to pause this runner.
    pub fn pause_handle(&self) -> PauseHandle {
        self.pause.clone()
    }

    /// Run exactly one instruction, ignoring the pause flag.
    pub fn step(&mut self) -> Result<u32, EmulationFault> {
        self.vm.cycle()
    }

    /// Run one burst of `burst_cycles` ticks.
    pub fn run_burst(&mut self) -> RunReport {
        self.run_cycles(u64::from(self.config.burst_cycles))
    }

    /// Run for the number of ticks `duration` covers at `clock_hz`.
    pub fn run_for(&mut self, duration: Duration) -> RunReport {
        let budget = self.cycles_for(duration);
        self.run_cycles(budget)
    }

    /// Run instructions until at least `budget` ticks have elapsed, a pause
    /// is requested or the machine faults.
    ///
    /// The pause flag is checked before every instruction, so an instruction
    /// is never split. The last instruction may overshoot the budget.
    pub fn run_cycles(&mut self, budget: u64) -> RunReport {
        let start_instructions = self.vm.instructions();
        let mut cycles = 0u64;

        let stop = loop {
            if self.pause.is_paused() {
                break StopReason::Paused;
            }
            if cycles >= budget {
                break StopReason::BudgetExhausted;
            }
            match self.vm.cycle() {
                Ok(taken) => cycles += u64::from(taken),
                Err(fault) => break StopReason::Faulted(fault),
            }
        };

        let report = RunReport {
            instructions: self.vm.instructions() - start_instructions,
            cycles,
            stop,
        };
        log::debug!(
            "run stopped after {} instructions / {} cycles: {:?}",
            report.instructions,
            report.cycles,
            report.stop
        );
        report
    }

    /// Ticks the emulated clock runs in `duration`.
    pub fn cycles_for(&self, duration: Duration) -> u64 {
        let ticks = duration.as_nanos() * u128::from(self.config.clock_hz) / 1_000_000_000;
        u64::try_from(ticks).unwrap_or(u64::MAX)
    }
}
