//! Named end-to-end scenarios.
//!
//! Each scenario builds its device from the configuration, resets it, drives it
//! through the harness and reports every failure it saw:
//! 1. **uart:** One vector through the UART echo, checked bit-exact.
//! 2. **uart-fifo:** Three vectors through the UART+FIFO; the FIFO must drain.
//! 3. **tx-fifo:** Twelve vectors through the UART+FIFO; the pointers wrap.
//! 4. **cpu:** A program loaded into the serial CPU, run, and its reply and state checked.

use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::common::error::Fault;
use crate::config::HarnessConfig;
use crate::serial::frame::{ByteVector, TestMatrix};
use crate::sim::loader::{InstructionLoader, Program};
use crate::sim::sequencer::{SequencerOptions, run_matrix};
use crate::sim::testbench::Testbench;
use crate::sim::verify::StateVerifier;
use crate::soc::devices::{SerialCpu, UartEcho, UartFifo};
use crate::soc::traits::Device;
use crate::stats::RunStats;

/// Loopback vector of the echo scenario (start bit, then data LSB first).
pub const ECHO_ROW: [u8; 9] = [0, 1, 1, 1, 0, 0, 0, 1, 0];

/// Rows driven through the FIFO scenarios.
pub const FIFO_ROWS: [[u8; 9]; 12] = [
    [0, 1, 1, 1, 0, 0, 0, 1, 0],
    [0, 1, 1, 1, 0, 1, 0, 0, 0],
    [0, 1, 1, 0, 0, 0, 1, 0, 0],
    [0, 0, 1, 0, 0, 0, 1, 0, 0],
    [0, 1, 0, 0, 1, 0, 1, 1, 1],
    [0, 1, 0, 1, 1, 0, 1, 1, 1],
    [0, 1, 0, 1, 1, 0, 1, 0, 1],
    [0, 1, 0, 0, 1, 0, 1, 0, 1],
    [0, 1, 1, 1, 1, 0, 1, 1, 1],
    [0, 1, 1, 0, 1, 0, 1, 1, 1],
    [0, 1, 0, 0, 0, 0, 0, 0, 1],
    [0, 1, 0, 0, 0, 1, 0, 0, 1],
];

/// Rows of the short FIFO scenario.
pub const UART_FIFO_ROWS: usize = 3;

/// Bootstrap program: `mov r0, #0`, `mov r1, #0x41`, `str r1, [r0]`.
pub const BOOT_PROGRAM: [u32; 3] = [0xE3A0_0000, 0xE3A0_1041, 0xE580_1000];

/// Byte the bootstrap program transmits.
pub const BOOT_REPLY: u8 = 0x41;

/// Data bits of a vector row; the start digit is not part of the byte.
const fn row_byte(row: &[u8; 9]) -> u8 {
    let mut byte = 0;
    let mut i = 1;
    while i < 9 {
        byte |= (row[i] & 1) << (i - 1);
        i += 1;
    }
    byte
}

fn matrix(rows: &[[u8; 9]]) -> TestMatrix {
    rows.iter().map(|r| ByteVector::from_byte(row_byte(r))).collect()
}

/// Scenario selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScenarioKind {
    /// UART echo loopback.
    Uart,
    /// Short UART+FIFO drain.
    UartFifo,
    /// UART+FIFO pointer wrap.
    TxFifo,
    /// Serial-loaded CPU.
    Cpu,
}

impl ScenarioKind {
    /// Every scenario, in run order.
    pub const ALL: [Self; 4] = [Self::Uart, Self::UartFifo, Self::TxFifo, Self::Cpu];

    /// Command-line name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uart => "uart",
            Self::UartFifo => "uart-fifo",
            Self::TxFifo => "tx-fifo",
            Self::Cpu => "cpu",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("unknown scenario `{s}`"))
    }
}

/// Result of one scenario.
#[derive(Clone, Debug)]
pub struct ScenarioReport {
    /// Scenario that ran.
    pub kind: ScenarioKind,
    /// Counters over every phase.
    pub stats: RunStats,
    /// Every failure, in the order seen.
    pub failures: Vec<Fault>,
}

impl ScenarioReport {
    fn new(kind: ScenarioKind) -> Self {
        Self {
            kind,
            stats: RunStats::default(),
            failures: Vec::new(),
        }
    }

    /// Returns `true` if nothing failed.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

fn reset<D: Device>(device: D, config: &HarnessConfig, stats: &mut RunStats) -> Testbench<D> {
    let mut bench = Testbench::new(device);
    bench.reset(config.timing.reset_cycles);
    stats.cycles += bench.cycle();
    bench
}

/// Runs `kind`. `program` replaces the bootstrap program of the cpu scenario.
pub fn run(kind: ScenarioKind, config: &HarnessConfig, program: Option<&Program>) -> ScenarioReport {
    info!(scenario = kind.name(), "scenario start");
    let report = match kind {
        ScenarioKind::Uart => run_uart(config),
        ScenarioKind::UartFifo => run_fifo(kind, config, UART_FIFO_ROWS),
        ScenarioKind::TxFifo => run_fifo(kind, config, FIFO_ROWS.len()),
        ScenarioKind::Cpu => run_cpu(config, program),
    };
    info!(scenario = kind.name(), passed = report.passed(), failures = report.failures.len(), "scenario end");
    report
}

/// UART echo: one vector out, the same vector back.
pub fn run_uart(config: &HarnessConfig) -> ScenarioReport {
    let mut report = ScenarioReport::new(ScenarioKind::Uart);
    let mut bench = reset(UartEcho::new(config.timing.baud_interval), config, &mut report.stats);
    let rows = matrix(&[ECHO_ROW]);
    let opts = SequencerOptions::for_rows(&config.timing, rows.len());
    match run_matrix(&mut bench, &rows, &rows, &opts) {
        Ok(outcome) => report.stats.absorb(&outcome.stats),
        Err(fault) => report.failures.push(fault),
    }
    report
}

/// UART+FIFO: the first `rows` vectors out and back with pointer checks, then the
/// FIFO must be drained with both pointers at `rows mod depth`.
pub fn run_fifo(kind: ScenarioKind, config: &HarnessConfig, rows: usize) -> ScenarioReport {
    let mut report = ScenarioReport::new(kind);
    let depth = config.fifo.depth;
    let device = UartFifo::new(config.timing.baud_interval, depth);
    let mut bench = reset(device, config, &mut report.stats);
    let matrix = matrix(&FIFO_ROWS[..rows.min(FIFO_ROWS.len())]);
    let opts = SequencerOptions::for_rows(&config.timing, matrix.len()).with_fifo_depth(depth);

    match run_matrix(&mut bench, &matrix, &matrix, &opts) {
        Ok(outcome) => report.stats.absorb(&outcome.stats),
        Err(fault) => {
            report.failures.push(fault);
            return report;
        }
    }

    let wrapped = u32::try_from(matrix.len() % depth.max(1)).unwrap_or(u32::MAX);
    let verification = StateVerifier::new()
        .fifo_empty(true)
        .fifo_full(false)
        .fifo_read_pointer(wrapped)
        .fifo_write_pointer(wrapped)
        .verify(bench.device());
    report.failures.extend(verification.into_failures());
    report
}

/// Serial CPU: load, run, await the reply, then check memory, registers and pc.
///
/// With a custom `program` only the loaded memory words are checked.
pub fn run_cpu(config: &HarnessConfig, program: Option<&Program>) -> ScenarioReport {
    let mut report = ScenarioReport::new(ScenarioKind::Cpu);
    let device = SerialCpu::new(
        config.timing.baud_interval,
        config.fifo.depth,
        config.cpu.program_words,
        config.cpu.data_words,
    );
    let mut bench = reset(device, config, &mut report.stats);
    let boot = Program::new(BOOT_PROGRAM);
    let custom = program.is_some();
    let program = program.unwrap_or(&boot);

    let mut loader = InstructionLoader::new(&config.timing);
    let load_budget = config.timing.budget_for_frames(program.to_matrix().len());
    let reply_budget = u64::from(config.cpu.reply_frames) * config.timing.frame_ticks();

    let phases = loader
        .load(&mut bench, program, Some(config.fifo.depth), load_budget)
        .and_then(|()| loader.run_program(&mut bench, config.cpu.run_cycles));
    let reply = match phases {
        Ok(()) if custom => Ok(None),
        Ok(()) => loader.receive_reply(&mut bench, reply_budget).map(Some),
        Err(fault) => Err(fault),
    };
    report.stats.absorb(loader.stats());
    report.stats.instructions_retired = bench.device().core().retired();

    match reply {
        Ok(Some(byte)) if byte != BOOT_REPLY => report.failures.push(Fault::Mismatch {
            row: 0,
            expected: ByteVector::from_byte(BOOT_REPLY),
            actual: ByteVector::from_byte(byte),
        }),
        Ok(_) => {}
        Err(fault) => {
            report.failures.push(fault);
            return report;
        }
    }

    let mut verifier = StateVerifier::new().program(program);
    if !custom {
        let end = u32::try_from(program.len() * 4).unwrap_or(u32::MAX);
        verifier = verifier
            .register(0, 0)
            .register(1, u32::from(BOOT_REPLY))
            .program_counter(end)
            .running(false);
    }
    report
        .failures
        .extend(verifier.verify(bench.device()).into_failures());
    report
}
