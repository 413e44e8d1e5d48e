//! Simulated Device Models.
//!
//! This module contains the building blocks and device tops driven through the
//! `Device` contract: UART receive/transmit halves, a byte FIFO, and the UART
//! echo, UART+FIFO and serial-loaded CPU devices.

/// Byte FIFO with wrapping pointers.
pub mod fifo;

/// Latched input pins and clock edge detection.
pub mod pins;

/// CPU whose program is loaded over the serial line.
pub mod serial_cpu;

/// UART receiver and transmitter.
pub mod uart;

/// UART line echo device.
pub mod uart_echo;

/// UART with a receive FIFO device.
pub mod uart_fifo;

pub use fifo::Fifo;
pub use pins::Pins;
pub use serial_cpu::SerialCpu;
pub use uart::{UartRx, UartTx};
pub use uart_echo::UartEcho;
pub use uart_fifo::UartFifo;
