use typed_builder::TypedBuilder;

use crate::cpu::{Cpu, Effect, Opcode, Registers};
use crate::memory::{MemoryAccess, Mmu, MEMORY_SIZE};
use crate::EmulationFault;

use super::{Schedule, ScheduledEffect, Snapshot, BOOT_ROM_EXIT, CARTRIDGE_ENTRY, IDLE_CYCLES};

#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct VmConfig {
    /// Address the ROM image is copied to by [`Vm::load_rom`].
    #[builder(default = 0x0000)]
    pub cartridge_base: u16,
    /// Start at the cartridge entry point with the post-boot register state
    /// instead of running the boot ROM.
    #[builder(default = false)]
    pub skip_boot_rom: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PowerState {
    #[default]
    Running,
    /// HALT executed. Nothing wakes the CPU short of a reset.
    Halted,
    /// STOP executed.
    Stopped,
}

/// The machine: CPU, memory and the bookkeeping around them.
///
/// A host drives it by calling [`Vm::cycle`] repeatedly. Each call runs one
/// instruction (or one idle slot while halted) and reports the ticks it took.
pub struct Vm {
    pub cpu: Cpu,
    mmu: Mmu,
    config: VmConfig,
    cycle_count: u64,
    instructions: u64,
    ime: bool,
    power: PowerState,
    schedule: Schedule,
    did_finish_boot_rom: bool,
    fault: Option<EmulationFault>,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    pub fn new() -> Self {
        Self::with_config(VmConfig::default())
    }

    pub fn with_config(config: VmConfig) -> Self {
        let mut vm = Self {
            cpu: Cpu::new(),
            mmu: Mmu::default(),
            config,
            cycle_count: 0,
            instructions: 0,
            ime: false,
            power: PowerState::Running,
            schedule: Schedule::new(),
            did_finish_boot_rom: false,
            fault: None,
        };
        vm.reset();
        vm
    }

    /// Power-on state: registers and RAM zeroed, boot ROM mapped, PC at 0.
    ///
    /// With `skip_boot_rom` the machine instead starts where the boot ROM
    /// would have left it.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.mmu.clear();
        self.cycle_count = 0;
        self.instructions = 0;
        self.ime = false;
        self.power = PowerState::Running;
        self.schedule.clear();
        self.fault = None;

        if self.config.skip_boot_rom {
            self.cpu.apply_post_boot_state();
            self.set_did_finish_boot_rom(true);
        } else {
            self.set_did_finish_boot_rom(false);
        }
        log::info!(
            "VM reset (boot ROM {})",
            if self.config.skip_boot_rom { "skipped" } else { "mapped" }
        );
    }

    /// Reset, then copy `rom` into memory at the configured cartridge base.
    ///
    /// The image is not parsed. Bytes that would land past 0xFFFF are
    /// dropped; the return value is the number of bytes actually copied.
    pub fn load_rom(&mut self, rom: &[u8]) -> usize {
        self.reset();

        let base = self.config.cartridge_base;
        let room = MEMORY_SIZE - base as usize;
        let image = if rom.len() > room {
            log::warn!(
                "ROM is {} bytes but only {} fit at 0x{:04X}; truncating",
                rom.len(),
                room,
                base
            );
            &rom[..room]
        } else {
            rom
        };

        self.mmu.load_bytes(image, base);
        log::info!("Loaded {} ROM bytes at 0x{:04X}", image.len(), base);
        image.len()
    }

    /// Run one instruction and return the ticks it took.
    ///
    /// Once a fault has been raised the machine stays stopped: every call
    /// returns the same fault, with no state change, until the next reset.
    pub fn cycle(&mut self) -> Result<u32, EmulationFault> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        self.apply_due_effects();

        if self.power != PowerState::Running {
            self.cycle_count += u64::from(IDLE_CYCLES);
            return Ok(IDLE_CYCLES);
        }

        let pc = self.cpu.regs.pc.offset();
        let executed = match self.cpu.step(&mut self.mmu) {
            Ok(executed) => executed,
            Err(fault) => {
                self.panic(fault.clone());
                return Err(fault);
            }
        };

        self.instructions += 1;
        self.cycle_count += u64::from(executed.cycles);
        if let Some(effect) = executed.effect {
            self.apply_effect(effect);
        }

        if !self.did_finish_boot_rom
            && pc == BOOT_ROM_EXIT
            && self.cpu.regs.pc.offset() == CARTRIDGE_ENTRY
        {
            log::info!("Boot ROM finished after {} cycles", self.cycle_count);
            self.set_did_finish_boot_rom(true);
        }

        Ok(executed.cycles)
    }

    /// Stop the machine with `fault`. Later `cycle()` calls return it.
    pub fn panic(&mut self, fault: EmulationFault) {
        log::error!(
            "{fault}; machine halted after {} cycles (PC=0x{:04X} SP=0x{:04X} AF=0x{:04X})",
            self.cycle_count,
            self.cpu.regs.pc.offset(),
            self.cpu.regs.sp,
            self.cpu.regs.af()
        );
        self.fault = Some(fault);
    }

    /// Finishing the boot ROM unmaps it, exposing cartridge bytes at
    /// 0x0000-0x00FF.
    pub fn set_did_finish_boot_rom(&mut self, finished: bool) {
        self.did_finish_boot_rom = finished;
        self.mmu.set_boot_rom_mode(!finished);
    }

    pub fn did_finish_boot_rom(&self) -> bool {
        self.did_finish_boot_rom
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.cpu, &self.mmu)
    }

    /// Decode view of the instruction the next `cycle()` will run.
    pub fn current_instruction(&self) -> Opcode {
        self.cpu.regs.pc.fetch(&self.mmu)
    }

    pub fn registers(&self) -> &Registers {
        &self.cpu.regs
    }

    pub fn mmu(&self) -> &Mmu {
        &self.mmu
    }

    pub fn mmu_mut(&mut self) -> &mut Mmu {
        &mut self.mmu
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Total ticks since the last reset.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Instructions retired since the last reset. Idle slots while halted do
    /// not count.
    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Interrupt master enable.
    pub fn ime(&self) -> bool {
        self.ime
    }

    /// Whether an EI is waiting for the following instruction to retire.
    pub fn ime_pending(&self) -> bool {
        self.schedule.is_pending(ScheduledEffect::EnableInterrupts)
    }

    pub fn power_state(&self) -> PowerState {
        self.power
    }

    pub fn fault(&self) -> Option<&EmulationFault> {
        self.fault.as_ref()
    }

    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    fn apply_due_effects(&mut self) {
        while let Some(effect) = self.schedule.pop_due(self.instructions) {
            match effect {
                ScheduledEffect::EnableInterrupts => {
                    log::trace!("IME enabled");
                    self.ime = true;
                }
            }
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::EnableInterrupts => {
                // Due once the instruction after EI has retired; applied
                // before the fetch that follows it.
                self.schedule.cancel(ScheduledEffect::EnableInterrupts);
                self.schedule
                    .push(self.instructions + 1, ScheduledEffect::EnableInterrupts);
            }
            Effect::EnableInterruptsNow => {
                self.schedule.cancel(ScheduledEffect::EnableInterrupts);
                self.ime = true;
            }
            Effect::DisableInterrupts => {
                self.schedule.cancel(ScheduledEffect::EnableInterrupts);
                self.ime = false;
            }
            Effect::Halt => {
                log::debug!("HALT at 0x{:04X}", self.cpu.regs.pc.offset().wrapping_sub(1));
                self.power = PowerState::Halted;
            }
            Effect::Stop => {
                log::debug!("STOP at 0x{:04X}", self.cpu.regs.pc.offset().wrapping_sub(2));
                self.power = PowerState::Stopped;
            }
        }
    }
}
