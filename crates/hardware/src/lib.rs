//! Bit-accurate UART harness for clock-stepped simulated devices.
//!
//! This crate drives and samples the serial lines of a simulated device one clock
//! cycle at a time. It provides:
//! 1. **Serial:** Frame encoder (TX model) and mid-bit sampling decoder (RX model).
//! 2. **Simulation:** Step clock, vector sequencer, instruction loader, state verifier, scenarios.
//! 3. **SoC:** The `Device` signal contract plus UART echo, UART+FIFO and serial-loaded CPU models.
//! 4. **ISA / Core:** The A32 subset executed by the CPU model, with assembler and disassembler.
//! 5. **Ambient:** Configuration, fault taxonomy, and run statistics.

/// Common types and constants (line format, fault taxonomy).
pub mod common;
/// Harness configuration (defaults, JSON loading, validation).
pub mod config;
/// CPU core for the serial-loaded device model (registers, flags, execution).
pub mod core;
/// A32 instruction subset (decode, assemble, disassemble).
pub mod isa;
/// Serial line protocol (byte vectors, frame encoder, frame decoder).
pub mod serial;
/// Test-harness orchestration (step clock, sequencer, loader, verifier, scenarios).
pub mod sim;
/// Simulated devices (signal trait, UART blocks, FIFO, device tops).
pub mod soc;
/// Run statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `HarnessConfig::default()` or load from JSON.
pub use crate::config::HarnessConfig;
/// Unrecoverable run fault.
pub use crate::common::error::Fault;
/// Line-level device contract implemented by every simulated device.
pub use crate::soc::traits::Device;
/// Step clock wrapping a device; construct with `Testbench::new`.
pub use crate::sim::testbench::Testbench;
