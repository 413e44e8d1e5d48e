//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the ARMv7 A32 subset executed by the serial-loaded CPU model.
//!
//! # Coverage
//!
//! * Data processing with rotated immediates or immediate-shifted registers.
//! * `LDR`/`STR` word and byte with a 12-bit immediate offset.
//! * `B`, `BL` and `BX`.
//! * Every other encoding decodes to `Instruction::Undefined`.

/// Two-pass line assembler.
pub mod asm;

/// Condition codes.
pub mod cond;

/// Instruction disassembler for debug tracing and diagnostics.
pub mod disasm;

/// Decoded instruction forms, decoding and encoding.
pub mod instruction;

pub use asm::assemble;
pub use cond::Condition;
pub use disasm::disassemble;
pub use instruction::{Instruction, decode, encode};
