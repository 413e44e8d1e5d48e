//! Architectural state of the A32 core.

/// Condition flags.
pub mod flags;

/// General-purpose register file.
pub mod gpr;

pub use flags::Nzcv;
pub use gpr::Gpr;
