//! Device signal contract.
//!
//! This module defines the `Device` trait every simulated device implements. It provides:
//! 1. **Identification:** `name` for logs and reports.
//! 2. **Inputs:** Clock, reset and serial-in line levels, latched until the next `eval`.
//! 3. **Evaluation:** `eval` settles the device on its current inputs; a rising clock edge
//!    seen by `eval` advances synchronous state by one cycle.
//! 4. **Outputs:** The serial-out line level.
//! 5. **Introspection:** Optional read-only FIFO and CPU snapshots for post-run verification.

/// Read-only FIFO occupancy and pointer snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FifoStatus {
    /// Next slot to be written (modulo `depth`).
    pub write_pointer: usize,
    /// Next slot to be read (modulo `depth`).
    pub read_pointer: usize,
    /// No entries held.
    pub empty: bool,
    /// Every slot occupied.
    pub full: bool,
    /// Number of slots.
    pub depth: usize,
}

/// Read-only view of a CPU device's architectural state.
#[derive(Clone, Copy, Debug)]
pub struct CpuState<'a> {
    memory: &'a [u32],
    registers: &'a [u32; 16],
    pc: u32,
    running: bool,
    loaded_words: usize,
}

impl<'a> CpuState<'a> {
    /// Builds a view over the device's arrays.
    pub const fn new(
        memory: &'a [u32],
        registers: &'a [u32; 16],
        pc: u32,
        running: bool,
        loaded_words: usize,
    ) -> Self {
        Self {
            memory,
            registers,
            pc,
            running,
            loaded_words,
        }
    }

    /// Program memory word at `index`, if in range.
    pub fn memory_word(&self, index: usize) -> Option<u32> {
        self.memory.get(index).copied()
    }

    /// General-purpose register `index` (0..=15), if in range.
    pub fn register(&self, index: usize) -> Option<u32> {
        self.registers.get(index).copied()
    }

    /// Address of the next instruction to execute.
    pub const fn program_counter(&self) -> u32 {
        self.pc
    }

    /// Returns `true` while the core has an instruction available to execute.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Words written to program memory by the serial boot loader.
    pub const fn loaded_words(&self) -> usize {
        self.loaded_words
    }
}

/// Line-level contract of a clock-stepped simulated device.
///
/// Inputs are latched by the setters and only take effect when `eval` runs, in the
/// same way as a generated RTL model.
pub trait Device {
    /// Returns a short name for this device (e.g., `"uart_fifo"`).
    fn name(&self) -> &'static str;
    /// Latches the clock input level.
    fn set_clock(&mut self, level: bool);
    /// Latches the active-high reset input level.
    fn set_reset(&mut self, level: bool);
    /// Latches the serial receive line level.
    fn set_serial_in(&mut self, level: bool);
    /// Settles the device; a rising clock edge since the last `eval` advances one cycle.
    fn eval(&mut self);
    /// Serial transmit line level after the last `eval`.
    fn serial_out(&self) -> bool;

    /// Returns the FIFO snapshot if this device has a FIFO; otherwise `None`.
    fn fifo_status(&self) -> Option<FifoStatus> {
        None
    }
    /// Returns the CPU snapshot if this device has a CPU; otherwise `None`.
    fn cpu_state(&self) -> Option<CpuState<'_>> {
        None
    }
}
