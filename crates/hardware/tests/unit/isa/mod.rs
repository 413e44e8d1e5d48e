//! # ISA Tests
//!
//! Unit tests for the A32 subset.

/// Assembler encodings, labels and error reporting.
pub mod asm;

/// Decoder coverage and encode/decode agreement.
pub mod decode;

/// Disassembler text.
pub mod disasm;
