//! Step clock.
//!
//! Owns the device under test and advances it one full clock cycle at a time.
//! Every tick is clock high, eval, clock low, eval, so synchronous state moves
//! exactly once per tick and outputs are settled when `tick` returns.

use tracing::debug;

use crate::common::constants::{IDLE_LEVEL, MIN_RESET_CYCLES};
use crate::soc::traits::Device;

/// Device under test plus its cycle counter.
#[derive(Debug)]
pub struct Testbench<D: Device> {
    device: D,
    cycle: u64,
}

impl<D: Device> Testbench<D> {
    /// Wraps `device`; the cycle counter starts at zero.
    pub const fn new(device: D) -> Self {
        Self { device, cycle: 0 }
    }

    /// One full clock cycle.
    pub fn tick(&mut self) {
        self.device.set_clock(true);
        self.device.eval();
        self.device.set_clock(false);
        self.device.eval();
        self.cycle += 1;
    }

    /// Holds reset for `cycles` ticks (at least two), then releases it with the
    /// serial input idle.
    pub fn reset(&mut self, cycles: u32) {
        let cycles = cycles.max(MIN_RESET_CYCLES);
        self.device.set_reset(true);
        for _ in 0..cycles {
            self.tick();
        }
        self.device.set_reset(false);
        self.device.set_serial_in(IDLE_LEVEL);
        debug!(device = self.device.name(), cycles, "reset released");
    }

    /// Drives the serial input for the next tick.
    pub fn drive(&mut self, level: bool) {
        self.device.set_serial_in(level);
    }

    /// Settled serial output.
    pub fn sample(&self) -> bool {
        self.device.serial_out()
    }

    /// Ticks since construction.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Shared access for probes.
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Exclusive access to the device.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Unwraps the device.
    pub fn into_inner(self) -> D {
        self.device
    }
}
