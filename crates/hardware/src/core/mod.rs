//! Processor core of the serial-loaded CPU device.
//!
//! This module contains the A32 core: architectural state, the ALU datapath and
//! the single-cycle executor.

/// Architectural state (register file, condition flags).
pub mod arch;

/// CPU core and execution step.
pub mod cpu;

/// Execution units (ALU, barrel shifter).
pub mod units;

pub use self::cpu::Cpu;
