//! Vector sequencer.
//!
//! Drives a transmit matrix into a device and compares what comes back. It performs
//! the following each tick:
//! 1. **Drive:** The encoder sets the serial input before the clock ticks.
//! 2. **Pointer Check:** On baud boundaries inside a frame, a FIFO-backed device must
//!    report `write_pointer == row mod depth`.
//! 3. **Sample:** After the tick the decoder reads the settled serial output.
//! 4. **Compare:** Each decoded row must equal the expected row at the same index.
//!
//! The run ends once every row is sent, every expected row received and the decoder
//! is idle. Running out of ticks first is a timeout.

use tracing::{info, warn};

use crate::common::error::{Fault, Phase};
use crate::config::TimingConfig;
use crate::serial::encoder::{FrameEncoder, TxPosition};
use crate::serial::decoder::FrameDecoder;
use crate::serial::frame::TestMatrix;
use crate::sim::testbench::Testbench;
use crate::soc::traits::Device;
use crate::stats::RunStats;

/// Parameters of one sequencer run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequencerOptions {
    /// Ticks per bit.
    pub baud: u32,
    /// Idle bit periods after each frame.
    pub gap_bits: u32,
    /// Device FIFO depth; `Some` enables write-pointer checks.
    pub fifo_depth: Option<usize>,
    /// Maximum ticks before the run times out.
    pub budget: u64,
}

impl SequencerOptions {
    /// Options for sending `rows` frames with timing taken from `timing`.
    ///
    /// The budget is `(rows * (10 + gap) + slack * 10) * baud`.
    pub fn for_rows(timing: &TimingConfig, rows: usize) -> Self {
        Self {
            baud: timing.baud_interval,
            gap_bits: timing.idle_gap_bits,
            fifo_depth: None,
            budget: timing.budget_for_frames(rows),
        }
    }

    /// Enables FIFO write-pointer checks against `depth`.
    #[must_use]
    pub const fn with_fifo_depth(mut self, depth: usize) -> Self {
        self.fifo_depth = Some(depth);
        self
    }

    /// Replaces the tick budget.
    #[must_use]
    pub const fn with_budget(mut self, budget: u64) -> Self {
        self.budget = budget;
        self
    }
}

/// What a successful run observed.
#[derive(Clone, Debug)]
pub struct SequenceOutcome {
    /// Rows decoded from the device output, in order.
    pub received: TestMatrix,
    /// Counters for the run.
    pub stats: RunStats,
}

/// Checks the device FIFO write pointer against the row on the line.
///
/// Does nothing outside a frame (idle or gap). Returns `true` when a check ran.
///
/// # Errors
///
/// `Fault::MissingProbe` when the device has no FIFO, `Fault::PointerMismatch`
/// when the pointer differs from `row mod depth`.
pub fn check_write_pointer<D: Device + ?Sized>(
    device: &D,
    position: TxPosition,
    depth: usize,
    cycle: u64,
) -> Result<bool, Fault> {
    if position.column.is_none() {
        return Ok(false);
    }
    let status = device
        .fifo_status()
        .ok_or(Fault::MissingProbe { probe: "fifo" })?;
    let expected = position.row % depth.max(1);
    if status.write_pointer != expected {
        warn!(row = position.row, expected, actual = status.write_pointer, cycle, "write pointer mismatch");
        return Err(Fault::PointerMismatch {
            row: position.row,
            expected,
            actual: status.write_pointer,
            cycle,
        });
    }
    Ok(true)
}

/// Sends `transmit` and checks the decoded output against `expected`.
///
/// The device should be freshly reset with its output idle.
///
/// # Errors
///
/// The first fault raised: `Framing`, `Mismatch`, `UnexpectedFrame`,
/// `PointerMismatch`, `MissingProbe`, or `Timeout` when the budget elapses.
pub fn run_matrix<D: Device>(
    bench: &mut Testbench<D>,
    transmit: &TestMatrix,
    expected: &TestMatrix,
    opts: &SequencerOptions,
) -> Result<SequenceOutcome, Fault> {
    info!(
        device = bench.device().name(),
        rows = transmit.len(),
        expected = expected.len(),
        budget = opts.budget,
        "sequence start"
    );
    let mut tx = FrameEncoder::new(opts.baud, opts.gap_bits);
    tx.enqueue(transmit.rows().iter().copied());
    let mut rx = FrameDecoder::new(opts.baud);
    let mut received = TestMatrix::default();
    let mut stats = RunStats::default();

    for _ in 0..opts.budget {
        let step = tx.step();
        bench.drive(step.level);
        if step.boundary {
            stats.boundaries += 1;
            if let Some(depth) = opts.fifo_depth {
                if check_write_pointer(bench.device(), tx.position(), depth, bench.cycle())? {
                    stats.pointer_checks += 1;
                }
            }
        }
        bench.tick();
        stats.cycles += 1;

        if let Some(actual) = rx.observe(bench.sample())? {
            let row = received.len();
            match expected.get(row) {
                None => return Err(Fault::UnexpectedFrame { row, actual }),
                Some(want) if *want != actual => {
                    warn!(row, expected = %want, actual = %actual, "row mismatch");
                    return Err(Fault::Mismatch {
                        row,
                        expected: *want,
                        actual,
                    });
                }
                Some(_) => received.push(actual),
            }
        }

        if tx.is_done() && received.len() >= expected.len() && rx.is_idle() {
            stats.frames_sent = tx.frames_sent();
            stats.frames_received = received.len();
            info!(cycles = stats.cycles, frames = received.len(), "sequence complete");
            return Ok(SequenceOutcome { received, stats });
        }
    }

    warn!(budget = opts.budget, observed = received.len(), "sequence timed out");
    Err(Fault::Timeout {
        phase: Phase::Sequence,
        budget: opts.budget,
        expected: expected.len(),
        observed: received.len(),
    })
}
