//! Halt reasons.
//!
//! The core has no exception vectors: the first fault stops it permanently until reset.

use thiserror::Error;

/// Why the core stopped executing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum HaltReason {
    /// The word at `pc` is outside the supported subset.
    #[error("undefined instruction {0:#010x}")]
    Undefined(u32),
    /// A load or store hit an unmapped or misaligned address.
    #[error("data abort at {0:#010x}")]
    DataAbort(u32),
}
