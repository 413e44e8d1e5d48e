//! A32 General-Purpose Register File.
//!
//! This module implements the sixteen 32-bit registers `r0`-`r15`. It performs the following:
//! 1. **Storage:** Maintains `r0`-`r14` plus a mirror of the program counter in `r15`.
//! 2. **Views:** Exposes the raw array for read-only device snapshots.
//! 3. **Debugging:** Renders the register state for trace logs.

/// Stack pointer register index.
pub const SP: usize = 13;
/// Link register index.
pub const LR: usize = 14;
/// Program counter register index.
pub const PC: usize = 15;

/// General-purpose register file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gpr {
    regs: [u32; 16],
}

impl Gpr {
    /// Creates a register file with every register zero.
    pub const fn new() -> Self {
        Self { regs: [0; 16] }
    }

    /// Reads register `idx` (0-15) as stored.
    ///
    /// Operand reads of `r15` must add the pipeline offset themselves.
    pub const fn read(&self, idx: usize) -> u32 {
        self.regs[idx & 0xF]
    }

    /// Writes register `idx` (0-15).
    pub fn write(&mut self, idx: usize, val: u32) {
        self.regs[idx & 0xF] = val;
    }

    /// Raw register array.
    pub const fn as_array(&self) -> &[u32; 16] {
        &self.regs
    }

    /// Formats all registers, four per line.
    pub fn dump(&self) -> String {
        self.regs
            .chunks(4)
            .enumerate()
            .map(|(row, chunk)| {
                chunk
                    .iter()
                    .enumerate()
                    .map(|(col, val)| format!("r{:<2}={:#010x}", row * 4 + col, val))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
