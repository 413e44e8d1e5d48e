//! Latched input pins shared by every device top.

use crate::common::constants::IDLE_LEVEL;

/// Input levels latched by the `Device` setters, plus clock edge detection.
#[derive(Debug, Clone, Copy)]
pub struct Pins {
    /// Clock input.
    pub clock: bool,
    /// Active-high reset input.
    pub reset: bool,
    /// Serial receive line.
    pub serial_in: bool,
    last_clock: bool,
}

impl Pins {
    /// Clock low, reset released, line idle.
    pub const fn new() -> Self {
        Self {
            clock: false,
            reset: false,
            serial_in: IDLE_LEVEL,
            last_clock: false,
        }
    }

    /// Returns `true` once per low-to-high clock transition.
    pub fn take_rising_edge(&mut self) -> bool {
        let edge = self.clock && !self.last_clock;
        self.last_clock = self.clock;
        edge
    }
}

impl Default for Pins {
    fn default() -> Self {
        Self::new()
    }
}
