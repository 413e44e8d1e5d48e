//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which holds the architectural
//! state of the single-issue A32 core. It coordinates the following:
//! 1. **State Management:** Maintains registers, flags and the program counter.
//! 2. **Execution:** Retires one fetched word per `step` (see [`execution`]).
//! 3. **Memory Interface:** Reaches data space through a [`DataBus`] supplied per step.
//! 4. **Halting:** Records the first undefined instruction or data abort as a sticky halt.

/// Instruction execution.
pub mod execution;

/// Data bus interface used by loads and stores.
pub mod memory;

/// Halt reasons.
pub mod trap;

pub use memory::DataBus;
pub use trap::HaltReason;

use crate::core::arch::gpr::PC;
use crate::core::arch::{Gpr, Nzcv};

/// Main CPU structure containing all processor state.
#[derive(Clone, Debug, Default)]
pub struct Cpu {
    /// General-purpose registers; `r15` mirrors `pc` after every step.
    pub regs: Gpr,
    /// Condition flags.
    pub flags: Nzcv,
    /// Address of the next instruction to execute.
    pub pc: u32,
    halt: Option<HaltReason>,
    retired: u64,
}

impl Cpu {
    /// Creates a core in its reset state: all registers zero, `pc = 0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the core to its reset state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Reason the core stopped, if it has.
    pub const fn halt_reason(&self) -> Option<HaltReason> {
        self.halt
    }

    /// Whether the core has stopped for good.
    pub const fn is_halted(&self) -> bool {
        self.halt.is_some()
    }

    /// Instructions retired since reset (condition-failed instructions included).
    pub const fn retired(&self) -> u64 {
        self.retired
    }

    /// Word index of the next instruction.
    pub const fn fetch_index(&self) -> usize {
        (self.pc / 4) as usize
    }

    /// Operand value of register `idx`; `r15` reads as the instruction address + 8.
    pub(crate) const fn operand(&self, idx: u8) -> u32 {
        if idx as usize == PC {
            self.pc.wrapping_add(8)
        } else {
            self.regs.read(idx as usize)
        }
    }

    fn sync_pc(&mut self) {
        self.regs.write(PC, self.pc);
    }
}
