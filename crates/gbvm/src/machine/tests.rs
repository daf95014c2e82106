use super::*;
use crate::cpu::{Cpu, Flags};
use crate::memory::{MemoryAccess, BOOT_ROM};
use crate::EmulationFault;

/// Route `log` output through the test harness (`RUST_LOG=debug cargo test`).
fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Machine past the boot ROM with `program` placed at `origin` and PC on it.
fn running_at(origin: u16, program: &[u8]) -> Vm {
    init_logger();
    let mut vm = Vm::with_config(VmConfig::builder().skip_boot_rom(true).build());
    vm.mmu_mut().load_bytes(program, origin);
    vm.cpu.regs.pc.jump(origin);
    vm
}

#[test]
fn new_vm_is_in_power_on_state() {
    let vm = Vm::new();

    assert_eq!(vm.registers().pc.offset(), 0x0000);
    assert_eq!(vm.registers().sp, 0x0000);
    assert_eq!(vm.registers().af(), 0x0000);
    assert_eq!(vm.cycle_count(), 0);
    assert_eq!(vm.instructions(), 0);
    assert!(!vm.ime());
    assert!(!vm.did_finish_boot_rom());
    assert!(vm.mmu().is_boot_rom_mode());
    assert_eq!(vm.power_state(), PowerState::Running);
    assert!(vm.fault().is_none());
}

#[test]
fn boot_rom_is_fetched_first() {
    let mut vm = Vm::new();
    vm.load_rom(&[0xAA; 0x200]);

    assert_eq!(vm.current_instruction().instruction(), BOOT_ROM[0]);
    assert_eq!(vm.mmu().memory().read_byte(0x0000), 0xAA);

    // LD SP,d16
    assert_eq!(vm.cycle(), Ok(12));
    assert_eq!(vm.registers().pc.offset(), 0x0003);
}

/// Cartridge whose header passes the boot ROM's logo and checksum checks.
fn bootable_cartridge() -> Vec<u8> {
    let mut rom = vec![0x00; 0x8000];
    rom[0x104..0x134].copy_from_slice(&BOOT_ROM[0xA8..0xD8]);
    // Title and flags are zero, so only the checksum byte is needed.
    rom[0x14D] = 0xE7;
    rom
}

#[test]
fn boot_rom_clears_vram_from_reset() {
    init_logger();
    let mut vm = Vm::new();
    vm.load_rom(&bootable_cartridge());
    vm.mmu_mut().load_bytes(&[0xFF; 0x2000], 0x8000);

    assert_eq!(vm.cycle(), Ok(12));
    assert_eq!(vm.registers().sp, 0xFFFE);
    assert_eq!(vm.registers().pc.offset(), 0x0003);

    while vm.registers().pc.offset() != 0x000C {
        assert_eq!(vm.cycle().map(|ticks| ticks > 0), Ok(true));
        assert!(vm.instructions() < 30_000, "VRAM clear loop never exited");
    }

    assert_eq!(vm.registers().hl(), 0x7FFF);
    assert!(vm.mmu().memory().window(0x8000..=0x9FFF).iter().all(|&b| b == 0));
}

#[test]
fn boot_rom_runs_to_cartridge_with_post_boot_registers() {
    init_logger();
    let mut vm = Vm::new();
    vm.load_rom(&bootable_cartridge());
    // Nothing drives LY here; park it on the first VBlank line so the
    // boot ROM's frame waits fall through.
    vm.mmu_mut().write_byte(0xFF44, 0x90);

    while !vm.did_finish_boot_rom() {
        assert_eq!(vm.cycle().map(|ticks| ticks > 0), Ok(true));
        assert!(vm.instructions() < 100_000, "boot ROM never handed over");
    }

    let mut expected = Cpu::new();
    expected.apply_post_boot_state();
    assert_eq!(vm.registers(), &expected.regs);
    assert!(!vm.mmu().is_boot_rom_mode());
    assert_eq!(vm.mmu().read_byte(0x0104), BOOT_ROM[0xA8]);
}

#[test]
fn boot_rom_hands_over_at_entry_point() {
    init_logger();
    let mut vm = Vm::new();
    vm.load_rom(&[0x00; 0x200]);
    vm.cpu.regs.pc.jump(0x00FE);
    assert_eq!(&BOOT_ROM[0xFE..], &[0xE0, 0x50]);

    assert_eq!(vm.cycle(), Ok(12));

    assert_eq!(vm.registers().pc.offset(), 0x0100);
    assert!(vm.did_finish_boot_rom());
    assert!(!vm.mmu().is_boot_rom_mode());
    assert_eq!(vm.mmu().read_byte(0x0000), 0x00);
}

#[test]
fn finishing_boot_rom_toggles_the_overlay() {
    let mut vm = Vm::new();
    vm.load_rom(&[0xAA; 0x200]);

    assert_eq!(vm.mmu().read_byte(0x0000), BOOT_ROM[0]);

    vm.set_did_finish_boot_rom(true);
    assert_eq!(vm.mmu().read_byte(0x0000), 0xAA);

    vm.set_did_finish_boot_rom(false);
    assert_eq!(vm.mmu().read_byte(0x0000), BOOT_ROM[0]);
    // Above the overlay, cartridge bytes are always visible.
    assert_eq!(vm.mmu().read_byte(0x0100), 0xAA);
}

#[test]
fn skip_boot_rom_starts_at_entry_point() {
    let mut vm = Vm::with_config(VmConfig::builder().skip_boot_rom(true).build());
    vm.load_rom(&[0x00, 0x11, 0x22]);

    let regs = vm.registers();
    assert_eq!(regs.af(), 0x01B0);
    assert_eq!(regs.bc(), 0x0013);
    assert_eq!(regs.de(), 0x00D8);
    assert_eq!(regs.hl(), 0x014D);
    assert_eq!(regs.sp, 0xFFFE);
    assert_eq!(regs.pc.offset(), 0x0100);
    assert!(regs.flag(Flags::Z));
    assert!(vm.did_finish_boot_rom());
    assert_eq!(vm.mmu().read_byte(0x0001), 0x11);
}

#[test]
fn load_rom_uses_cartridge_base_and_resets() {
    let mut vm = Vm::with_config(VmConfig::builder().cartridge_base(0x4000).build());
    vm.load_rom(&[0x01]);
    vm.set_did_finish_boot_rom(true);
    vm.mmu_mut().write_byte(0xC000, 0x55);
    vm.cpu.regs.pc.jump(0x4000);
    vm.cycle().unwrap_or_default();

    assert_eq!(vm.load_rom(&[0x01, 0x02, 0x03]), 3);

    assert_eq!(vm.cycle_count(), 0);
    assert_eq!(vm.registers().pc.offset(), 0x0000);
    assert!(vm.mmu().is_boot_rom_mode());
    assert_eq!(vm.mmu().read_byte(0xC000), 0x00);
    assert_eq!(vm.mmu().read_byte(0x4000), 0x01);
    assert_eq!(vm.mmu().read_byte(0x4002), 0x03);
    assert_eq!(vm.mmu().memory().read_byte(0x0000), 0x00);
}

#[test]
fn load_rom_drops_bytes_past_end_of_memory() {
    let mut vm = Vm::with_config(VmConfig::builder().cartridge_base(0xFFFE).build());
    vm.set_did_finish_boot_rom(true);

    assert_eq!(vm.load_rom(&[0x01, 0x02, 0x03, 0x04]), 2);

    assert_eq!(vm.mmu().read_byte(0xFFFE), 0x01);
    assert_eq!(vm.mmu().read_byte(0xFFFF), 0x02);
    assert_eq!(vm.mmu().memory().read_byte(0x0000), 0x00);
    assert_eq!(vm.mmu().memory().read_byte(0x0001), 0x00);
}

#[test]
fn cycle_accumulates_ticks() {
    // NOP ; LD BC,d16 ; INC (HL)
    let mut vm = running_at(0x0150, &[0x00, 0x01, 0x12, 0x34, 0x34]);
    vm.cpu.regs.set_hl(0xC000);

    assert_eq!(vm.cycle(), Ok(4));
    assert_eq!(vm.cycle(), Ok(12));
    assert_eq!(vm.cycle(), Ok(12));

    assert_eq!(vm.cycle_count(), 28);
    assert_eq!(vm.instructions(), 3);
    assert_eq!(vm.registers().bc(), 0x1234);
    assert_eq!(vm.mmu().read_byte(0xC000), 0x01);
}

#[test]
fn unknown_opcode_halts_the_machine() {
    let mut vm = running_at(0x0150, &[0x00, 0xD3, 0x00]);
    vm.cycle().unwrap();
    let regs = *vm.registers();
    let cycles = vm.cycle_count();

    let expected = EmulationFault::UnhandledOpcode {
        opcode: 0xD3,
        offset: 0x0151,
    };
    assert_eq!(vm.cycle(), Err(expected.clone()));
    assert_eq!(vm.cycle_count(), cycles);
    assert_eq!(*vm.registers(), regs);
    assert!(vm.is_faulted());

    // Stays down until reset.
    assert_eq!(vm.cycle(), Err(expected.clone()));
    assert_eq!(vm.cycle_count(), cycles);
    assert_eq!(vm.fault(), Some(&expected));

    vm.reset();
    assert!(vm.fault().is_none());
    assert_eq!(vm.cycle_count(), 0);
}

#[test]
fn panic_stops_a_healthy_machine() {
    let mut vm = running_at(0x0150, &[0x00]);
    let fault = EmulationFault::UnhandledOpcode {
        opcode: 0xFD,
        offset: 0x1234,
    };

    vm.panic(fault.clone());

    assert_eq!(vm.cycle(), Err(fault));
    assert_eq!(vm.registers().pc.offset(), 0x0150);
}

#[test]
fn ei_takes_effect_after_the_next_instruction() {
    // EI ; NOP ; NOP
    let mut vm = running_at(0x0150, &[0xFB, 0x00, 0x00]);

    vm.cycle().unwrap();
    assert!(!vm.ime());
    assert!(vm.ime_pending());

    // The instruction right after EI still runs with IME clear.
    vm.cycle().unwrap();
    assert!(!vm.ime());
    assert!(vm.ime_pending());

    vm.cycle().unwrap();
    assert!(vm.ime());
    assert!(!vm.ime_pending());
}

#[test]
fn di_after_ei_cancels_the_pending_enable() {
    // EI ; DI ; NOP
    let mut vm = running_at(0x0150, &[0xFB, 0xF3, 0x00]);

    vm.cycle().unwrap();
    vm.cycle().unwrap();
    assert!(!vm.ime());
    assert!(!vm.ime_pending());

    vm.cycle().unwrap();
    assert!(!vm.ime());
}

#[test]
fn di_clears_ime_immediately() {
    // EI ; NOP ; NOP ; DI
    let mut vm = running_at(0x0150, &[0xFB, 0x00, 0x00, 0xF3]);
    for _ in 0..3 {
        vm.cycle().unwrap();
    }
    assert!(vm.ime());

    vm.cycle().unwrap();
    assert!(!vm.ime());
}

#[test]
fn reti_enables_immediately() {
    let mut vm = running_at(0x0150, &[0xD9]);
    vm.cpu.regs.sp = 0xDFF0;
    vm.mmu_mut().write_word(0xDFF0, 0x0200);

    assert_eq!(vm.cycle(), Ok(16));
    assert!(vm.ime());
    assert_eq!(vm.registers().pc.offset(), 0x0200);
    assert_eq!(vm.registers().sp, 0xDFF2);
}

#[test]
fn halt_idles_until_reset() {
    // HALT ; NOP
    let mut vm = running_at(0x0150, &[0x76, 0x00]);

    assert_eq!(vm.cycle(), Ok(4));
    assert_eq!(vm.power_state(), PowerState::Halted);
    assert_eq!(vm.registers().pc.offset(), 0x0151);

    for _ in 0..3 {
        assert_eq!(vm.cycle(), Ok(IDLE_CYCLES));
    }
    assert_eq!(vm.registers().pc.offset(), 0x0151);
    assert_eq!(vm.instructions(), 1);
    assert_eq!(vm.cycle_count(), 16);

    vm.reset();
    assert_eq!(vm.power_state(), PowerState::Running);
}

#[test]
fn ei_before_halt_still_enables() {
    // EI ; HALT
    let mut vm = running_at(0x0150, &[0xFB, 0x76]);

    vm.cycle().unwrap();
    vm.cycle().unwrap();
    assert_eq!(vm.power_state(), PowerState::Halted);
    assert!(vm.ime_pending());

    assert_eq!(vm.cycle(), Ok(IDLE_CYCLES));
    assert!(vm.ime());
}

#[test]
fn stop_skips_its_padding_byte() {
    let mut vm = running_at(0x0150, &[0x10, 0x00]);

    assert_eq!(vm.cycle(), Ok(4));
    assert_eq!(vm.power_state(), PowerState::Stopped);
    assert_eq!(vm.registers().pc.offset(), 0x0152);
    assert_eq!(vm.cycle(), Ok(IDLE_CYCLES));
}

#[test]
fn snapshot_copies_registers_tiles_and_palette() {
    let mut vm = running_at(0x0150, &[0x3E, 0x42]);
    vm.mmu_mut().write_byte(0x8000, 0x3C);
    vm.mmu_mut().write_byte(0x87FF, 0x7E);
    vm.mmu_mut().write_byte(0x8800, 0x18);
    vm.mmu_mut().write_byte(0x8FFF, 0x81);
    vm.mmu_mut().write_byte(0xFF47, 0xE4);

    let snapshot = vm.snapshot();

    assert_eq!(snapshot.instruction, 0x3E);
    assert_eq!(snapshot.registers.pc, 0x0150);
    assert_eq!(snapshot.registers, vm.registers().snapshot());
    assert_eq!(snapshot.tiles_low.len(), 0x800);
    assert_eq!(snapshot.tiles_high.len(), 0x800);
    assert_eq!(snapshot.tiles_low[0], 0x3C);
    assert_eq!(snapshot.tiles_low[0x7FF], 0x7E);
    assert_eq!(snapshot.tiles_high[0], 0x18);
    assert_eq!(snapshot.tiles_high[0x7FF], 0x81);
    assert_eq!(snapshot.palette, 0xE4);
}

#[test]
fn snapshot_is_detached_from_the_machine() {
    let mut vm = running_at(0x0150, &[0x3E, 0x42]);
    let before = vm.snapshot();

    vm.cycle().unwrap();

    assert_eq!(before.registers.a, 0x01);
    assert_eq!(vm.snapshot().registers.a, 0x42);
}

#[test]
fn snapshot_serialises_to_json() {
    let vm = running_at(0x0150, &[0x00]);

    let json = vm.snapshot().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["registers"]["PC"], 0x0150);
    assert_eq!(value["registers"]["SP"], 0xFFFE);
    assert_eq!(value["instruction"], 0);
    assert_eq!(value["palette"], 0);
    assert_eq!(value["tiles_low"].as_array().map(Vec::len), Some(0x800));

    let back: Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, vm.snapshot());
}

#[test]
fn schedule_pops_in_due_order() {
    let mut schedule = Schedule::new();
    schedule.push(5, ScheduledEffect::EnableInterrupts);
    schedule.push(2, ScheduledEffect::EnableInterrupts);
    assert_eq!(schedule.len(), 2);

    assert_eq!(schedule.pop_due(1), None);
    assert_eq!(schedule.pop_due(2), Some(ScheduledEffect::EnableInterrupts));
    assert_eq!(schedule.pop_due(4), None);
    assert_eq!(schedule.pop_due(9), Some(ScheduledEffect::EnableInterrupts));
    assert!(schedule.is_empty());
}

#[test]
fn schedule_cancel_and_clear() {
    let mut schedule = Schedule::new();
    assert!(!schedule.cancel(ScheduledEffect::EnableInterrupts));

    schedule.push(1, ScheduledEffect::EnableInterrupts);
    assert!(schedule.is_pending(ScheduledEffect::EnableInterrupts));
    assert!(schedule.cancel(ScheduledEffect::EnableInterrupts));
    assert!(!schedule.is_pending(ScheduledEffect::EnableInterrupts));

    schedule.push(1, ScheduledEffect::EnableInterrupts);
    schedule.clear();
    assert_eq!(schedule.pop_due(u64::MAX), None);
}
