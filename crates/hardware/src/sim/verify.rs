//! State verifier.
//!
//! Post-run comparison of a device snapshot against expected values. Checks are
//! declared with a builder, evaluated in declaration order, and every failure is
//! collected rather than stopping at the first.

use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::common::error::Fault;
use crate::sim::loader::Program;
use crate::soc::traits::Device;

/// A field of the device snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    /// Program memory word.
    Memory(usize),
    /// General-purpose register.
    Register(usize),
    /// Program counter.
    ProgramCounter,
    /// Core running flag (1 = running).
    Running,
    /// FIFO write pointer.
    FifoWritePointer,
    /// FIFO read pointer.
    FifoReadPointer,
    /// FIFO empty flag.
    FifoEmpty,
    /// FIFO full flag.
    FifoFull,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory(i) => write!(f, "memory[{i}]"),
            Self::Register(i) => write!(f, "r{i}"),
            Self::ProgramCounter => write!(f, "pc"),
            Self::Running => write!(f, "running"),
            Self::FifoWritePointer => write!(f, "fifo.write_pointer"),
            Self::FifoReadPointer => write!(f, "fifo.read_pointer"),
            Self::FifoEmpty => write!(f, "fifo.empty"),
            Self::FifoFull => write!(f, "fifo.full"),
        }
    }
}

impl Location {
    /// Reads this location from `device`; flags read as 0 or 1.
    ///
    /// # Errors
    ///
    /// `Fault::MissingProbe` when the device lacks the snapshot,
    /// `Fault::UnknownLocation` when an index is out of range.
    pub fn read<D: Device + ?Sized>(self, device: &D) -> Result<u32, Fault> {
        let unknown = Fault::UnknownLocation { location: self };
        match self {
            Self::Memory(_) | Self::Register(_) | Self::ProgramCounter | Self::Running => {
                let cpu = device
                    .cpu_state()
                    .ok_or(Fault::MissingProbe { probe: "cpu" })?;
                match self {
                    Self::Memory(i) => cpu.memory_word(i).ok_or(unknown),
                    Self::Register(i) => cpu.register(i).ok_or(unknown),
                    Self::ProgramCounter => Ok(cpu.program_counter()),
                    _ => Ok(u32::from(cpu.is_running())),
                }
            }
            Self::FifoWritePointer | Self::FifoReadPointer | Self::FifoEmpty | Self::FifoFull => {
                let fifo = device
                    .fifo_status()
                    .ok_or(Fault::MissingProbe { probe: "fifo" })?;
                let value = match self {
                    Self::FifoWritePointer => u32::try_from(fifo.write_pointer),
                    Self::FifoReadPointer => u32::try_from(fifo.read_pointer),
                    Self::FifoEmpty => Ok(u32::from(fifo.empty)),
                    _ => Ok(u32::from(fifo.full)),
                };
                value.map_err(|_| unknown)
            }
        }
    }
}

/// One expected value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Check {
    /// Where to look.
    pub location: Location,
    /// What should be there.
    pub expected: u32,
}

/// Builder of post-run checks.
#[derive(Clone, Debug, Default)]
pub struct StateVerifier {
    checks: Vec<Check>,
}

impl StateVerifier {
    /// No checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a raw check.
    #[must_use]
    pub fn expect(mut self, location: Location, expected: u32) -> Self {
        self.checks.push(Check { location, expected });
        self
    }

    /// Program memory word `index` equals `word`.
    #[must_use]
    pub fn memory(self, index: usize, word: u32) -> Self {
        self.expect(Location::Memory(index), word)
    }

    /// Memory words `0..k` equal the `k` words of `program`.
    #[must_use]
    pub fn program(self, program: &Program) -> Self {
        program
            .words()
            .iter()
            .enumerate()
            .fold(self, |v, (i, w)| v.memory(i, *w))
    }

    /// Register `index` equals `value`.
    #[must_use]
    pub fn register(self, index: usize, value: u32) -> Self {
        self.expect(Location::Register(index), value)
    }

    /// Program counter equals `pc`.
    #[must_use]
    pub fn program_counter(self, pc: u32) -> Self {
        self.expect(Location::ProgramCounter, pc)
    }

    /// Running flag equals `running`.
    #[must_use]
    pub fn running(self, running: bool) -> Self {
        self.expect(Location::Running, u32::from(running))
    }

    /// FIFO write pointer equals `pointer`.
    #[must_use]
    pub fn fifo_write_pointer(self, pointer: u32) -> Self {
        self.expect(Location::FifoWritePointer, pointer)
    }

    /// FIFO read pointer equals `pointer`.
    #[must_use]
    pub fn fifo_read_pointer(self, pointer: u32) -> Self {
        self.expect(Location::FifoReadPointer, pointer)
    }

    /// FIFO empty flag equals `empty`.
    #[must_use]
    pub fn fifo_empty(self, empty: bool) -> Self {
        self.expect(Location::FifoEmpty, u32::from(empty))
    }

    /// FIFO full flag equals `full`.
    #[must_use]
    pub fn fifo_full(self, full: bool) -> Self {
        self.expect(Location::FifoFull, u32::from(full))
    }

    /// Declared checks.
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Evaluates every check against `device`.
    pub fn verify<D: Device + ?Sized>(&self, device: &D) -> Verification {
        let failures: Vec<Fault> = self
            .checks
            .iter()
            .filter_map(|check| match check.location.read(device) {
                Ok(actual) if actual == check.expected => None,
                Ok(actual) => Some(Fault::StateMismatch {
                    location: check.location,
                    expected: check.expected,
                    actual,
                }),
                Err(fault) => Some(fault),
            })
            .collect();
        for fault in &failures {
            warn!(device = device.name(), %fault, "check failed");
        }
        debug!(device = device.name(), checks = self.checks.len(), failed = failures.len(), "verified");
        Verification {
            checked: self.checks.len(),
            failures,
        }
    }
}

/// Outcome of a verification pass.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{} of {checked} checks failed", .failures.len())]
pub struct Verification {
    checked: usize,
    failures: Vec<Fault>,
}

impl Verification {
    /// Returns `true` if every check held.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Checks evaluated.
    pub const fn checked(&self) -> usize {
        self.checked
    }

    /// Failed checks, in declaration order.
    pub fn failures(&self) -> &[Fault] {
        &self.failures
    }

    /// Takes the failure list.
    pub fn into_failures(self) -> Vec<Fault> {
        self.failures
    }

    /// `Ok` when every check held, otherwise the verification itself as the error.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one check failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.passed() { Ok(()) } else { Err(self) }
    }
}
