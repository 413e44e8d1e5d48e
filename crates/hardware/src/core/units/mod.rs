//! Execution units.

/// Arithmetic Logic Unit and barrel shifter.
pub mod alu;
