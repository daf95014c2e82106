use std::path::PathBuf;

use anyhow::{Context, Result};
use gbvm::{RunConfig, RunReport, Runner, Snapshot, StopReason, Vm, VmConfig, CYCLES_PER_FRAME};

const USAGE: &str = "Usage: gbvm <rom_path> [cycles] [--skip-boot] [--json]";

struct Args {
    rom_path: PathBuf,
    cycles: u64,
    skip_boot: bool,
    json: bool,
}

fn parse_args() -> Result<Args> {
    let mut rom_path = None;
    let mut cycles = None;
    let mut skip_boot = false;
    let mut json = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--skip-boot" => skip_boot = true,
            "--json" => json = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            _ if rom_path.is_none() => rom_path = Some(PathBuf::from(&arg)),
            _ if cycles.is_none() => {
                let budget = arg
                    .parse::<u64>()
                    .with_context(|| format!("invalid cycle budget '{arg}'"))?;
                cycles = Some(budget);
            }
            _ => {
                eprintln!("{USAGE}");
                std::process::exit(2);
            }
        }
    }

    let Some(rom_path) = rom_path else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    Ok(Args {
        rom_path,
        cycles: cycles.unwrap_or(u64::from(CYCLES_PER_FRAME)),
        skip_boot,
        json,
    })
}

fn print_text(report: &RunReport, snapshot: &Snapshot) {
    let regs = &snapshot.registers;
    println!(
        "ran {} instructions in {} cycles ({:?})",
        report.instructions, report.cycles, report.stop
    );
    println!(
        "A={:02X} F={:02X} B={:02X} C={:02X} D={:02X} E={:02X} H={:02X} L={:02X} SP={:04X} PC={:04X}",
        regs.a, regs.f, regs.b, regs.c, regs.d, regs.e, regs.h, regs.l, regs.sp, regs.pc
    );
    println!(
        "next opcode=0x{:02X} BGP=0x{:02X}",
        snapshot.instruction, snapshot.palette
    );
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let rom = std::fs::read(&args.rom_path)
        .with_context(|| format!("failed to read ROM '{}'", args.rom_path.display()))?;
    log::info!("Running ROM '{}'", args.rom_path.display());

    let config = VmConfig::builder().skip_boot_rom(args.skip_boot).build();
    let mut vm = Vm::with_config(config);
    vm.load_rom(&rom);

    let mut runner = Runner::new(vm, RunConfig::default());
    let report = runner.run_cycles(args.cycles);
    let snapshot = runner.vm().snapshot();

    if args.json {
        let output = serde_json::json!({ "report": report, "snapshot": snapshot });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text(&report, &snapshot);
    }

    if let StopReason::Faulted(fault) = &report.stop {
        eprintln!("emulation stopped: {fault}");
        std::process::exit(1);
    }
    Ok(())
}
