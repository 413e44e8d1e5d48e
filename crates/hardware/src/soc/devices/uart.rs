//! Universal Asynchronous Receiver-Transmitter blocks.
//!
//! Implements the receive and transmit halves of an 8N1 UART as synchronous
//! state machines advanced once per device clock. Both halves share the
//! harness's baud interval; there is no divisor latch or line control.

use tracing::{debug, warn};

use crate::common::constants::{DATA_BITS, FRAME_BITS, IDLE_LEVEL, START_LEVEL, STOP_LEVEL};

/// Receiver state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RxState {
    /// Waiting for the line to go low.
    Idle,
    /// Counting to the middle of the start bit.
    Start,
    /// Shifting in data bits.
    Data,
    /// Waiting for the middle of the stop bit.
    Stop,
}

/// UART receiver.
///
/// Detects the start edge, re-checks the start bit half a period later, then
/// samples each following bit one period apart.
#[derive(Debug, Clone)]
pub struct UartRx {
    /// Device cycles per bit.
    baud: u32,
    /// Receiver state machine.
    state: RxState,
    /// Cycles since the last sample point.
    counter: u32,
    /// Data bits shifted in so far, LSB first.
    shift: u8,
    /// Data bits received in the current frame.
    bits: usize,
    /// Frames dropped because the stop bit was low.
    framing_errors: u64,
}

impl UartRx {
    /// Creates an idle receiver.
    pub fn new(baud: u32) -> Self {
        Self {
            baud: baud.max(2),
            state: RxState::Idle,
            counter: 0,
            shift: 0,
            bits: 0,
            framing_errors: 0,
        }
    }

    /// Returns the receiver to idle, keeping the error count.
    pub fn reset(&mut self) {
        self.state = RxState::Idle;
        self.counter = 0;
        self.shift = 0;
        self.bits = 0;
    }

    /// Advances one device cycle with the current line level.
    ///
    /// Returns a byte when its stop bit is sampled high.
    pub fn clock(&mut self, line: bool) -> Option<u8> {
        match self.state {
            RxState::Idle => {
                if line == START_LEVEL {
                    self.state = RxState::Start;
                    self.counter = 0;
                }
            }
            RxState::Start => {
                self.counter += 1;
                if self.counter == self.baud / 2 {
                    self.counter = 0;
                    if line == START_LEVEL {
                        self.state = RxState::Data;
                        self.shift = 0;
                        self.bits = 0;
                    } else {
                        self.state = RxState::Idle;
                    }
                }
            }
            RxState::Data => {
                self.counter += 1;
                if self.counter == self.baud {
                    self.counter = 0;
                    self.shift |= u8::from(line) << self.bits;
                    self.bits += 1;
                    if self.bits == DATA_BITS {
                        self.state = RxState::Stop;
                    }
                }
            }
            RxState::Stop => {
                self.counter += 1;
                if self.counter == self.baud {
                    self.counter = 0;
                    self.state = RxState::Idle;
                    if line == STOP_LEVEL {
                        debug!(byte = self.shift, "uart rx byte");
                        return Some(self.shift);
                    }
                    self.framing_errors += 1;
                    warn!(byte = self.shift, "uart rx framing error, byte dropped");
                }
            }
        }
        None
    }

    /// Returns `true` while a frame is being received.
    pub fn is_busy(&self) -> bool {
        self.state != RxState::Idle
    }

    /// Frames dropped because of a low stop bit.
    pub const fn framing_errors(&self) -> u64 {
        self.framing_errors
    }
}

/// UART transmitter.
///
/// Holds each of the ten frame bits on the line for one full baud period.
#[derive(Debug, Clone)]
pub struct UartTx {
    /// Device cycles per bit.
    baud: u32,
    /// Levels of the frame being sent.
    frame: [bool; FRAME_BITS],
    /// Index of the bit on the line, `None` while idle.
    bit: Option<usize>,
    /// Cycles the current bit has been held.
    counter: u32,
    /// Current line level.
    line: bool,
}

impl UartTx {
    /// Creates an idle transmitter.
    pub fn new(baud: u32) -> Self {
        Self {
            baud: baud.max(1),
            frame: [IDLE_LEVEL; FRAME_BITS],
            bit: None,
            counter: 0,
            line: IDLE_LEVEL,
        }
    }

    /// Returns the transmitter to idle with the line high.
    pub fn reset(&mut self) {
        self.bit = None;
        self.counter = 0;
        self.line = IDLE_LEVEL;
    }

    /// Starts sending `byte` if idle.
    ///
    /// Returns `false` (and drops nothing) if a frame is already in progress.
    pub fn load(&mut self, byte: u8) -> bool {
        if self.bit.is_some() {
            return false;
        }
        self.frame[0] = START_LEVEL;
        for i in 0..DATA_BITS {
            self.frame[i + 1] = (byte >> i) & 1 == 1;
        }
        self.frame[FRAME_BITS - 1] = STOP_LEVEL;
        self.bit = Some(0);
        self.counter = 0;
        self.line = START_LEVEL;
        debug!(byte, "uart tx start");
        true
    }

    /// Advances one device cycle.
    pub fn clock(&mut self) {
        let Some(bit) = self.bit else {
            return;
        };
        self.counter += 1;
        if self.counter < self.baud {
            return;
        }
        self.counter = 0;
        let next = bit + 1;
        if next == FRAME_BITS {
            self.bit = None;
            self.line = IDLE_LEVEL;
        } else {
            self.bit = Some(next);
            self.line = self.frame[next];
        }
    }

    /// Returns `true` while a frame is on the line.
    pub const fn is_busy(&self) -> bool {
        self.bit.is_some()
    }

    /// Current line level.
    pub const fn line(&self) -> bool {
        self.line
    }
}
