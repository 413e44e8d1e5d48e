//! Common types and constants shared by the harness and the device models.
//!
//! This module provides:
//! 1. **Constants:** The fixed line format (frame and vector widths) and default timing.
//! 2. **Error Handling:** The fault taxonomy of a run plus configuration, vector and assembler errors.

/// Line format and timing constants.
pub mod constants;

/// Fault and error types.
pub mod error;

pub use constants::{DATA_BITS, FRAME_BITS, VECTOR_BITS};
pub use error::{AsmError, ConfigError, Fault, VectorError};
