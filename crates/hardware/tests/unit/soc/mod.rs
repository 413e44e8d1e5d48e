//! # Device Model Tests
//!
//! Unit tests for the device models driven through the `Device` contract.



/// Serial-loaded CPU.
pub mod serial_cpu;
