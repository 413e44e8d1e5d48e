//! Test-harness orchestration.
//!
//! Leaves first: the step clock, the vector sequencer built on the serial encoder
//! and decoder, the instruction loader, the state verifier, and the named
//! scenarios that compose them.

/// Instruction loader (word serialization, load/run/reply phases).
pub mod loader;

/// Named end-to-end scenarios.
pub mod scenario;

/// Vector sequencer (drive, sample, compare, pointer checks).
pub mod sequencer;

/// Step clock wrapping a device.
pub mod testbench;

/// Post-run snapshot checks.
pub mod verify;

pub use loader::{InstructionLoader, Program};
pub use scenario::{ScenarioKind, ScenarioReport};
pub use sequencer::{SequenceOutcome, SequencerOptions, run_matrix};
pub use testbench::Testbench;
pub use verify::{Location, StateVerifier, Verification};
