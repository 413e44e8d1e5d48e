//! UART line echo.
//!
//! Every byte received on `serial_in` is retransmitted on `serial_out`. A byte
//! that arrives while the transmitter is busy waits in a holding queue.

use std::collections::VecDeque;

use crate::soc::devices::pins::Pins;
use crate::soc::devices::uart::{UartRx, UartTx};
use crate::soc::traits::Device;

/// Receive-and-retransmit UART device.
#[derive(Debug, Clone)]
pub struct UartEcho {
    pins: Pins,
    rx: UartRx,
    tx: UartTx,
    holding: VecDeque<u8>,
}

impl UartEcho {
    /// Creates an echo device for `baud` cycles per bit.
    pub fn new(baud: u32) -> Self {
        Self {
            pins: Pins::new(),
            rx: UartRx::new(baud),
            tx: UartTx::new(baud),
            holding: VecDeque::new(),
        }
    }

    fn cycle(&mut self) {
        if self.pins.reset {
            self.rx.reset();
            self.tx.reset();
            self.holding.clear();
            return;
        }
        if let Some(byte) = self.rx.clock(self.pins.serial_in) {
            self.holding.push_back(byte);
        }
        self.tx.clock();
        if !self.tx.is_busy() {
            if let Some(byte) = self.holding.pop_front() {
                let _ = self.tx.load(byte);
            }
        }
    }

    /// Frames dropped by the receiver because of a low stop bit.
    pub const fn framing_errors(&self) -> u64 {
        self.rx.framing_errors()
    }
}

impl Device for UartEcho {
    fn name(&self) -> &'static str {
        "uart"
    }

    fn set_clock(&mut self, level: bool) {
        self.pins.clock = level;
    }

    fn set_reset(&mut self, level: bool) {
        self.pins.reset = level;
    }

    fn set_serial_in(&mut self, level: bool) {
        self.pins.serial_in = level;
    }

    fn eval(&mut self) {
        if self.pins.take_rising_edge() {
            self.cycle();
        }
    }

    fn serial_out(&self) -> bool {
        self.tx.line()
    }
}
