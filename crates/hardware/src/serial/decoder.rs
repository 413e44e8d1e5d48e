//! Frame decoder (RX model).
//!
//! Recovers byte vectors from a line with no shared clock. While idle the line
//! is watched every tick; the first low observation marks the frame start.
//! Each bit is then sampled once, at `frame_start + baud/2 + k * baud`, so a
//! sample never coincides with a transmitter edge. A low stop-bit sample is a
//! framing fault and the frame is discarded.

use tracing::{debug, warn};

use crate::common::constants::{START_LEVEL, STOP_LEVEL, VECTOR_BITS};
use crate::common::error::Fault;
use crate::serial::frame::ByteVector;

/// Mid-bit sampling frame decoder.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    baud: u64,
    ticks: u64,
    frame_start: u64,
    /// Next buffer slot to fill; `VECTOR_BITS` means the stop bit is next.
    cursor: Option<usize>,
    buffer: [bool; VECTOR_BITS],
    frames: usize,
}

impl FrameDecoder {
    /// Creates an idle decoder for `baud` ticks per bit.
    pub fn new(baud: u32) -> Self {
        Self {
            baud: u64::from(baud.max(1)),
            ticks: 0,
            frame_start: 0,
            cursor: None,
            buffer: [START_LEVEL; VECTOR_BITS],
            frames: 0,
        }
    }

    /// Feeds the settled line level observed after one clock tick.
    ///
    /// Returns the completed vector when this tick was the stop-bit sample
    /// point of a valid frame.
    ///
    /// # Errors
    ///
    /// Returns `Fault::Framing` when the stop bit is sampled low.
    pub fn observe(&mut self, level: bool) -> Result<Option<ByteVector>, Fault> {
        let now = self.ticks;
        self.ticks += 1;

        let cursor = match self.cursor {
            Some(cursor) => cursor,
            None if level == START_LEVEL => {
                // At one tick per bit the start sample is the detection tick.
                self.frame_start = now;
                self.cursor = Some(0);
                0
            }
            None => return Ok(None),
        };

        let offset = now - self.frame_start;
        let half = self.baud / 2;
        if offset < half || (offset - half) % self.baud != 0 {
            return Ok(None);
        }

        if cursor < VECTOR_BITS {
            if cursor == 0 && level != START_LEVEL {
                debug!(cycle = now, "start bit glitch, back to idle");
                self.cursor = None;
                return Ok(None);
            }
            self.buffer[cursor] = level;
            self.cursor = Some(cursor + 1);
            return Ok(None);
        }

        self.cursor = None;
        if level != STOP_LEVEL {
            warn!(frame = self.frames, cycle = now, "stop bit sampled low");
            return Err(Fault::Framing {
                frame: self.frames,
                cycle: now,
            });
        }

        let byte = self.buffer[1..]
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, &bit)| acc | (u8::from(bit) << i));
        let vector = ByteVector::from_byte(byte);
        debug!(frame = self.frames, byte, cycle = now, "frame received");
        self.frames += 1;
        Ok(Some(vector))
    }

    /// Returns `true` when no frame is being received.
    pub const fn is_idle(&self) -> bool {
        self.cursor.is_none()
    }

    /// Receive buffer cursor; `None` while idle.
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Frames received with a valid stop bit.
    pub const fn frames(&self) -> usize {
        self.frames
    }

    /// Ticks observed so far.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }
}
