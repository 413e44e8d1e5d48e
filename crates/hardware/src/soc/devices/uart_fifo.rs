//! UART with a receive FIFO in front of the transmitter.
//!
//! Received bytes are pushed into a FIFO; the transmitter pops the FIFO as soon
//! as it is idle, so the device drains while it is still being written. The FIFO
//! pointers are exposed for verification.

use crate::soc::devices::fifo::Fifo;
use crate::soc::devices::pins::Pins;
use crate::soc::devices::uart::{UartRx, UartTx};
use crate::soc::traits::{Device, FifoStatus};

/// UART RX → FIFO → UART TX device.
#[derive(Debug, Clone)]
pub struct UartFifo {
    pins: Pins,
    rx: UartRx,
    fifo: Fifo,
    tx: UartTx,
}

impl UartFifo {
    /// Creates the device.
    ///
    /// # Arguments
    ///
    /// * `baud` - Device cycles per bit.
    /// * `depth` - FIFO slots.
    pub fn new(baud: u32, depth: usize) -> Self {
        Self {
            pins: Pins::new(),
            rx: UartRx::new(baud),
            fifo: Fifo::new(depth),
            tx: UartTx::new(baud),
        }
    }

    fn cycle(&mut self) {
        if self.pins.reset {
            self.rx.reset();
            self.fifo.reset();
            self.tx.reset();
            return;
        }
        if let Some(byte) = self.rx.clock(self.pins.serial_in) {
            let _ = self.fifo.push(byte);
        }
        self.tx.clock();
        if !self.tx.is_busy() {
            if let Some(byte) = self.fifo.pop() {
                let _ = self.tx.load(byte);
            }
        }
    }

    /// Bytes dropped because the FIFO was full.
    pub const fn overflows(&self) -> u64 {
        self.fifo.overflows()
    }
}

impl Device for UartFifo {
    fn name(&self) -> &'static str {
        "uart_fifo"
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

    fn fifo_status(&self) -> Option<FifoStatus> {
        Some(self.fifo.status())
    }
}
