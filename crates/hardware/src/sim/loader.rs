//! Instruction loader.
//!
//! This module bootstraps a program into a serial-loaded device. It performs:
//! 1. **Serialization:** Each 32-bit word becomes four frames, least significant byte first.
//! 2. **Load:** Drives the frames, optionally checking the device FIFO write pointer, then
//!    idles one settle frame.
//! 3. **Run:** Ticks with the line idle so the device can execute.
//! 4. **Reply:** Returns the first byte the device transmits back.
//!
//! The decoder keeps watching through every phase, so a reply that starts while the
//! load is still settling is not lost.

use std::collections::VecDeque;

use tracing::{info, warn};

use crate::common::constants::WORD_BYTES;
use crate::common::error::{AsmError, Fault, Phase};
use crate::config::TimingConfig;
use crate::isa::asm::assemble;
use crate::serial::decoder::FrameDecoder;
use crate::serial::encoder::FrameEncoder;
use crate::serial::frame::{ByteVector, TestMatrix};
use crate::sim::sequencer::check_write_pointer;
use crate::sim::testbench::Testbench;
use crate::soc::traits::Device;
use crate::stats::RunStats;

/// Append-only sequence of instruction words.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    words: Vec<u32>,
}

impl Program {
    /// Wraps a word list.
    pub fn new(words: impl Into<Vec<u32>>) -> Self {
        Self {
            words: words.into(),
        }
    }

    /// Takes words up to, not including, the first `sentinel`.
    pub fn until_sentinel(words: &[u32], sentinel: u32) -> Self {
        Self::new(
            words
                .iter()
                .copied()
                .take_while(|w| *w != sentinel)
                .collect::<Vec<_>>(),
        )
    }

    /// Assembles source text.
    ///
    /// # Errors
    ///
    /// Returns the assembler's error for the first rejected line.
    pub fn from_source(source: &str) -> Result<Self, AsmError> {
        assemble(source).map(Self::new)
    }

    /// Appends a word.
    pub fn push(&mut self, word: u32) {
        self.words.push(word);
    }

    /// Words in load order.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the program has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Frames on the wire: four per word, least significant byte first.
    pub fn to_matrix(&self) -> TestMatrix {
        self.words
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .map(ByteVector::from_byte)
            .collect()
    }
}

/// Drives a program into a device and collects its replies.
#[derive(Debug, Clone)]
pub struct InstructionLoader {
    encoder: FrameEncoder,
    decoder: FrameDecoder,
    replies: VecDeque<ByteVector>,
    settle_ticks: u64,
    stats: RunStats,
}

impl InstructionLoader {
    /// Creates a loader using `timing`.
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            encoder: FrameEncoder::new(timing.baud_interval, timing.idle_gap_bits),
            decoder: FrameDecoder::new(timing.baud_interval),
            replies: VecDeque::new(),
            settle_ticks: timing.frame_ticks(),
            stats: RunStats::default(),
        }
    }

    /// One tick: drive, optional pointer check, clock, sample.
    fn step<D: Device>(
        &mut self,
        bench: &mut Testbench<D>,
        fifo_depth: Option<usize>,
    ) -> Result<(), Fault> {
        let step = self.encoder.step();
        bench.drive(step.level);
        if step.boundary {
            self.stats.boundaries += 1;
            if let Some(depth) = fifo_depth {
                if check_write_pointer(bench.device(), self.encoder.position(), depth, bench.cycle())?
                {
                    self.stats.pointer_checks += 1;
                }
            }
        }
        bench.tick();
        self.stats.cycles += 1;
        if let Some(reply) = self.decoder.observe(bench.sample())? {
            self.stats.frames_received += 1;
            self.replies.push_back(reply);
        }
        Ok(())
    }

    /// Sends every word of `program`, then idles one settle frame.
    ///
    /// # Arguments
    ///
    /// * `bench` - Device under test, freshly reset.
    /// * `program` - Words to load.
    /// * `fifo_depth` - Enables write-pointer checks when `Some`.
    /// * `budget` - Maximum ticks for the whole phase.
    ///
    /// # Errors
    ///
    /// `Fault::Timeout` if the frames and settle time do not fit in `budget`, or any
    /// pointer or framing fault raised on the way.
    pub fn load<D: Device>(
        &mut self,
        bench: &mut Testbench<D>,
        program: &Program,
        fifo_depth: Option<usize>,
        budget: u64,
    ) -> Result<(), Fault> {
        let frames = program.len() * WORD_BYTES;
        let base = self.encoder.frames_sent();
        info!(words = program.len(), frames, budget, "load start");
        self.encoder.enqueue(program.to_matrix().rows().iter().copied());

        let mut settled = 0_u64;
        for _ in 0..budget {
            self.step(bench, fifo_depth)?;
            if self.encoder.is_done() {
                settled += 1;
                if settled >= self.settle_ticks {
                    self.stats.frames_sent = self.encoder.frames_sent();
                    info!(cycle = bench.cycle(), "load complete");
                    return Ok(());
                }
            }
        }
        let observed = self.encoder.frames_sent() - base;
        warn!(budget, observed, "load timed out");
        Err(Fault::Timeout {
            phase: Phase::Load,
            budget,
            expected: frames,
            observed,
        })
    }

    /// Ticks `cycles` times with the line idle.
    ///
    /// # Errors
    ///
    /// A framing fault if the device transmits a corrupt frame meanwhile.
    pub fn run_program<D: Device>(
        &mut self,
        bench: &mut Testbench<D>,
        cycles: u64,
    ) -> Result<(), Fault> {
        info!(cycles, "run start");
        for _ in 0..cycles {
            self.step(bench, None)?;
        }
        Ok(())
    }

    /// Returns the oldest byte the device has sent back, waiting up to `budget` ticks.
    ///
    /// # Errors
    ///
    /// `Fault::Timeout` when nothing arrives in time.
    pub fn receive_reply<D: Device>(
        &mut self,
        bench: &mut Testbench<D>,
        budget: u64,
    ) -> Result<u8, Fault> {
        for _ in 0..budget {
            if let Some(reply) = self.replies.pop_front() {
                info!(byte = reply.byte(), "reply received");
                return Ok(reply.byte());
            }
            self.step(bench, None)?;
        }
        if let Some(reply) = self.replies.pop_front() {
            return Ok(reply.byte());
        }
        warn!(budget, "no reply");
        Err(Fault::Timeout {
            phase: Phase::Reply,
            budget,
            expected: 1,
            observed: 0,
        })
    }

    /// Counters accumulated over every phase so far.
    pub const fn stats(&self) -> &RunStats {
        &self.stats
    }
}
