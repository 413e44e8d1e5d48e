//! Frame encoder (TX model).
//!
//! Turns a queue of byte vectors into line levels, one bit per baud interval.
//! The encoder only changes its output on ticks that are multiples of the baud
//! interval (counted from its own first tick); between boundaries the driven
//! level is held. Each frame is start bit, 8 data bits, stop bit, followed by an
//! optional idle gap before the next start bit.

use std::collections::VecDeque;

use tracing::trace;

use crate::common::constants::{DATA_BITS, IDLE_LEVEL, START_LEVEL, STOP_LEVEL, VECTOR_BITS};
use crate::serial::frame::ByteVector;

/// Bit currently driven on the line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxState {
    /// No frame pending; line held high.
    Idle,
    /// Start bit (low).
    Start,
    /// Data bit `n` (0..=7) of the current row.
    Data(u8),
    /// Stop bit (high).
    Stop,
    /// Idle gap period `n` (1-based) after a stop bit.
    Gap(u32),
}

/// Where the encoder is within the matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxPosition {
    /// Row on the line, or the next row to send while idle or in a gap.
    pub row: usize,
    /// Bit of the frame on the line: 0 start, 1..=8 data, 9 stop. `None` while idle.
    pub column: Option<usize>,
}

/// Result of one encoder step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxStep {
    /// Level to drive before the clock ticks.
    pub level: bool,
    /// `true` if this tick is a baud boundary.
    pub boundary: bool,
}

/// Baud-boundary frame encoder.
#[derive(Debug, Clone)]
pub struct FrameEncoder {
    baud: u32,
    gap_bits: u32,
    pending: VecDeque<ByteVector>,
    current: Option<ByteVector>,
    state: TxState,
    level: bool,
    ticks: u64,
    sent: usize,
}

impl FrameEncoder {
    /// Creates an idle encoder.
    ///
    /// # Arguments
    ///
    /// * `baud` - Ticks per bit period (non-zero).
    /// * `gap_bits` - Idle bit periods between frames.
    pub fn new(baud: u32, gap_bits: u32) -> Self {
        Self {
            baud: baud.max(1),
            gap_bits,
            pending: VecDeque::new(),
            current: None,
            state: TxState::Idle,
            level: IDLE_LEVEL,
            ticks: 0,
            sent: 0,
        }
    }

    /// Queues rows for transmission after any already pending.
    pub fn enqueue<I: IntoIterator<Item = ByteVector>>(&mut self, rows: I) {
        self.pending.extend(rows);
    }

    /// Advances one tick and returns the level to drive for it.
    ///
    /// Must be called exactly once per clock tick, before the tick.
    pub fn step(&mut self) -> TxStep {
        let boundary = self.ticks % u64::from(self.baud) == 0;
        self.ticks += 1;
        if boundary {
            self.advance();
            trace!(state = ?self.state, level = self.level, row = self.sent, "tx boundary");
        }
        TxStep {
            level: self.level,
            boundary,
        }
    }

    fn advance(&mut self) {
        match self.state {
            TxState::Idle => self.begin_next(),
            TxState::Start => self.drive_data(0),
            TxState::Data(i) if usize::from(i) + 1 < DATA_BITS => self.drive_data(i + 1),
            TxState::Data(_) => {
                self.state = TxState::Stop;
                self.level = STOP_LEVEL;
            }
            TxState::Stop => {
                self.current = None;
                self.sent += 1;
                if self.gap_bits > 0 {
                    self.state = TxState::Gap(1);
                    self.level = IDLE_LEVEL;
                } else {
                    self.begin_next();
                }
            }
            TxState::Gap(n) if n < self.gap_bits => self.state = TxState::Gap(n + 1),
            TxState::Gap(_) => self.begin_next(),
        }
    }

    fn begin_next(&mut self) {
        match self.pending.pop_front() {
            Some(row) => {
                self.current = Some(row);
                self.state = TxState::Start;
                self.level = START_LEVEL;
            }
            None => {
                self.state = TxState::Idle;
                self.level = IDLE_LEVEL;
            }
        }
    }

    fn drive_data(&mut self, index: u8) {
        self.state = TxState::Data(index);
        self.level = self
            .current
            .and_then(|row| row.bit(usize::from(index) + 1))
            .unwrap_or(IDLE_LEVEL);
    }

    /// Current state.
    pub const fn state(&self) -> TxState {
        self.state
    }

    /// Level currently driven.
    pub const fn level(&self) -> bool {
        self.level
    }

    /// Current row and bit column.
    pub const fn position(&self) -> TxPosition {
        let column = match self.state {
            TxState::Idle | TxState::Gap(_) => None,
            TxState::Start => Some(0),
            TxState::Data(i) => Some(i as usize + 1),
            TxState::Stop => Some(VECTOR_BITS),
        };
        TxPosition {
            row: self.sent,
            column,
        }
    }

    /// Frames whose stop bit has completed.
    pub const fn frames_sent(&self) -> usize {
        self.sent
    }

    /// Rows not yet started.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` when nothing is queued and the line is back to idle.
    pub fn is_done(&self) -> bool {
        self.pending.is_empty() && self.state == TxState::Idle
    }
}
