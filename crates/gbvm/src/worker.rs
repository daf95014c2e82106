//! Runs a [`Vm`] on its own thread.
//!
//! The host talks to the worker with [`Command`]s and gets [`Event`]s back.
//! Everything crossing the channel is an owned copy; the VM itself never
//! leaves the worker thread.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::{EmulationFault, PauseHandle, RunConfig, RunReport, Runner, Snapshot, Vm, VmConfig};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Reset and load a ROM image.
    Load(Vec<u8>),
    Reset,
    /// Run a single instruction.
    Step,
    /// Run until `cycles` ticks have elapsed, a pause or a fault.
    Run { cycles: u64 },
    Snapshot,
    Shutdown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Loaded { len: usize },
    Stepped(Snapshot),
    Ran(RunReport, Snapshot),
    Faulted(EmulationFault),
    Snapshot(Snapshot),
}

pub struct Worker {
    commands: Sender<Command>,
    events: Receiver<Event>,
    pause: PauseHandle,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn spawn(vm_config: VmConfig, run_config: RunConfig) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let runner = Runner::new(Vm::with_config(vm_config), run_config);
        let pause = runner.pause_handle();
        let handle = thread::Builder::new()
            .name("gbvm-worker".to_string())
            .spawn(move || serve(runner, command_rx, event_tx))
            .context("failed to spawn emulation worker thread")?;

        Ok(Self {
            commands: command_tx,
            events: event_rx,
            pause,
            handle: Some(handle),
        })
    }

    pub fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("emulation worker is no longer running"))
    }

    /// Block until the next event.
    pub fn recv(&self) -> Result<Event> {
        self.events
            .recv()
            .context("emulation worker is no longer running")
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<Event>> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(anyhow!("emulation worker is no longer running")),
        }
    }

    pub fn try_recv(&self) -> Result<Option<Event>> {
        match self.events.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(anyhow!("emulation worker is no longer running")),
        }
    }

    /// Send `command` and wait for its reply.
    pub fn request(&self, command: Command) -> Result<Event> {
        self.send(command)?;
        self.recv()
    }

    /// Pausing takes effect between instructions of a running `Run`.
    pub fn pause_handle(&self) -> PauseHandle {
        self.pause.clone()
    }

    pub fn shutdown(mut self) -> Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        // Shutdown is only read between commands, so end any `Run` first.
        self.pause.pause();
        // The worker may already be gone after a hang-up; joining is enough.
        let _ = self.commands.send(Command::Shutdown);
        handle
            .join()
            .map_err(|_| anyhow!("emulation worker thread panicked"))
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            log::warn!("{err:#}");
        }
    }
}

fn serve(mut runner: Runner, commands: Receiver<Command>, events: Sender<Event>) {
    log::debug!("emulation worker started");

    for command in commands.iter() {
        let event = match command {
            Command::Load(rom) => {
                let len = runner.vm_mut().load_rom(&rom);
                Event::Loaded { len }
            }
            Command::Reset => {
                runner.vm_mut().reset();
                Event::Snapshot(runner.vm().snapshot())
            }
            Command::Step => match runner.step() {
                Ok(_) => Event::Stepped(runner.vm().snapshot()),
                Err(fault) => Event::Faulted(fault),
            },
            Command::Run { cycles } => {
                let report = runner.run_cycles(cycles);
                Event::Ran(report, runner.vm().snapshot())
            }
            Command::Snapshot => Event::Snapshot(runner.vm().snapshot()),
            Command::Shutdown => break,
        };

        if events.send(event).is_err() {
            log::debug!("host hung up");
            break;
        }
    }

    log::debug!("emulation worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StopReason;

    fn skip_boot() -> VmConfig {
        VmConfig::builder().skip_boot_rom(true).build()
    }

    /// Cartridge image with `program` at the entry point.
    fn cartridge(program: &[u8]) -> Vec<u8> {
        let mut rom = vec![0u8; 0x100];
        rom.extend_from_slice(program);
        rom
    }

    #[test]
    fn load_step_and_snapshot() {
        let worker = Worker::spawn(skip_boot(), RunConfig::default()).unwrap();

        // LD A,0x42
        let rom = cartridge(&[0x3E, 0x42]);
        assert_eq!(
            worker.request(Command::Load(rom)).unwrap(),
            Event::Loaded { len: 0x102 }
        );

        match worker.request(Command::Step).unwrap() {
            Event::Stepped(snapshot) => {
                assert_eq!(snapshot.registers.a, 0x42);
                assert_eq!(snapshot.registers.pc, 0x0102);
            }
            other => panic!("unexpected event {other:?}"),
        }

        match worker.request(Command::Snapshot).unwrap() {
            Event::Snapshot(snapshot) => assert_eq!(snapshot.registers.pc, 0x0102),
            other => panic!("unexpected event {other:?}"),
        }

        worker.shutdown().unwrap();
    }

    #[test]
    fn load_reports_bytes_that_fit() {
        let config = VmConfig::builder().cartridge_base(0xFF00).build();
        let worker = Worker::spawn(config, RunConfig::default()).unwrap();

        assert_eq!(
            worker.request(Command::Load(vec![0x00; 0x200])).unwrap(),
            Event::Loaded { len: 0x100 }
        );
    }

    #[test]
    fn run_reports_budget_and_faults() {
        let worker = Worker::spawn(skip_boot(), RunConfig::default()).unwrap();
        worker
            .request(Command::Load(cartridge(&[0x00, 0x00, 0xE4])))
            .unwrap();

        match worker.request(Command::Run { cycles: 4 }).unwrap() {
            Event::Ran(report, snapshot) => {
                assert_eq!(report.stop, StopReason::BudgetExhausted);
                assert_eq!(report.instructions, 1);
                assert_eq!(snapshot.registers.pc, 0x0101);
            }
            other => panic!("unexpected event {other:?}"),
        }

        match worker.request(Command::Run { cycles: 1_000 }).unwrap() {
            Event::Ran(report, _) => {
                assert!(matches!(report.stop, StopReason::Faulted(_)));
                assert_eq!(report.instructions, 1);
            }
            other => panic!("unexpected event {other:?}"),
        }

        match worker.request(Command::Step).unwrap() {
            Event::Faulted(fault) => assert_eq!(fault.opcode(), 0xE4),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn reset_returns_power_on_snapshot() {
        let worker = Worker::spawn(VmConfig::default(), RunConfig::default()).unwrap();
        worker.request(Command::Step).unwrap();

        match worker.request(Command::Reset).unwrap() {
            Event::Snapshot(snapshot) => {
                assert_eq!(snapshot.registers.pc, 0x0000);
                assert_eq!(snapshot.instruction, crate::memory::BOOT_ROM[0]);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn paused_worker_does_not_run() {
        let worker = Worker::spawn(skip_boot(), RunConfig::default()).unwrap();
        worker.pause_handle().pause();

        match worker.request(Command::Run { cycles: 1_000 }).unwrap() {
            Event::Ran(report, _) => {
                assert_eq!(report.stop, StopReason::Paused);
                assert_eq!(report.instructions, 0);
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(worker.try_recv().unwrap(), None);
    }

    #[test]
    fn shutdown_interrupts_unbounded_run() {
        let worker = Worker::spawn(skip_boot(), RunConfig::default()).unwrap();
        // JR -2
        worker
            .request(Command::Load(cartridge(&[0x18, 0xFE])))
            .unwrap();
        worker.send(Command::Run { cycles: u64::MAX }).unwrap();
        thread::sleep(Duration::from_millis(20));

        let (done_tx, done_rx) = mpsc::channel();
        thread::spawn(move || done_tx.send(worker.shutdown().is_ok()));

        assert_eq!(done_rx.recv_timeout(Duration::from_secs(5)), Ok(true));
    }

    #[test]
    fn drop_shuts_the_thread_down() {
        let worker = Worker::spawn(VmConfig::default(), RunConfig::default()).unwrap();
        let commands = worker.commands.clone();

        drop(worker);

        assert!(commands.send(Command::Snapshot).is_err());
    }
}
