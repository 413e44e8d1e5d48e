//! Run statistics collection and reporting.
//!
//! This module tracks what a harness run did on the line. It provides:
//! 1. **Timing:** Clock cycles stepped and baud boundaries crossed.
//! 2. **Traffic:** Frames driven by the encoder and frames recovered by the decoder.
//! 3. **Checks:** FIFO pointer comparisons performed at baud boundaries.
//! 4. **Core:** Instructions retired by a CPU device, when one is present.

use std::time::Instant;

/// Counters accumulated over one scenario.
#[derive(Clone, Debug)]
pub struct RunStats {
    start_time: Instant,
    /// Clock cycles stepped, reset included.
    pub cycles: u64,
    /// Encoder baud boundaries crossed.
    pub boundaries: u64,
    /// Frames whose stop bit the encoder completed.
    pub frames_sent: usize,
    /// Frames the decoder recovered with a valid stop bit.
    pub frames_received: usize,
    /// FIFO write-pointer comparisons performed.
    pub pointer_checks: u64,
    /// Instructions retired by the device core.
    pub instructions_retired: u64,
}

impl Default for RunStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            boundaries: 0,
            frames_sent: 0,
            frames_received: 0,
            pointer_checks: 0,
            instructions_retired: 0,
        }
    }
}

impl RunStats {
    /// Adds the counters of a later phase, keeping this run's start time.
    pub fn absorb(&mut self, other: &Self) {
        self.cycles += other.cycles;
        self.boundaries += other.boundaries;
        self.frames_sent += other.frames_sent;
        self.frames_received += other.frames_received;
        self.pointer_checks += other.pointer_checks;
        self.instructions_retired += other.instructions_retired;
    }

    /// Renders the counters as an aligned text block.
    pub fn render(&self) -> String {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let khz = if seconds > 0.0 {
            (self.cycles as f64 / seconds) / 1000.0
        } else {
            0.0
        };
        [
            format!("host_seconds             {seconds:.4} s"),
            format!("sim_cycles               {}", self.cycles),
            format!("sim_freq                 {khz:.2} kHz"),
            format!("line.boundaries          {}", self.boundaries),
            format!("line.frames_sent         {}", self.frames_sent),
            format!("line.frames_received     {}", self.frames_received),
            format!("fifo.pointer_checks      {}", self.pointer_checks),
            format!("core.insts_retired       {}", self.instructions_retired),
        ]
        .join("\n")
    }
}
