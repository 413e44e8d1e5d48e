//! Simulated devices.
//!
//! This module holds the device models the harness drives through the `Device`
//! signal contract: UART receive/transmit blocks, a pointer-wrapping FIFO, and
//! the three device tops built from them.

/// UART blocks, FIFO and device tops.
pub mod devices;

/// Device trait and introspection snapshots.
pub mod traits;

pub use traits::{CpuState, Device, FifoStatus};
