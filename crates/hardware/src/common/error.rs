//! Fault and error definitions.
//!
//! This module defines how a run fails. It provides:
//! 1. **Faults:** Unrecoverable protocol, comparison and timeout failures raised during a run.
//! 2. **Configuration Errors:** Invalid or unreadable harness configuration.
//! 3. **Vector Errors:** Malformed byte vectors.
//! 4. **Assembler Errors:** Source lines the A32 assembler rejects.

use thiserror::Error;

use crate::serial::frame::ByteVector;
use crate::sim::verify::Location;

/// Harness phase in which a timeout occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Vector sequencing (transmit matrix and loopback receive).
    Sequence,
    /// Instruction load over the serial line.
    Load,
    /// Waiting for a byte echoed back by the device.
    Reply,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequence => write!(f, "sequence"),
            Self::Load => write!(f, "load"),
            Self::Reply => write!(f, "reply"),
        }
    }
}

/// Unrecoverable failure of a harness run.
///
/// No fault is retried: a scenario either holds every assertion or fails with
/// the first fault its protocol loop raises.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Fault {
    /// The stop bit of a received frame was sampled low.
    ///
    /// Indicates loss of synchronization between the device transmitter and the decoder.
    #[error("framing fault: stop bit of frame {frame} sampled low at cycle {cycle}")]
    Framing {
        /// Zero-based index of the frame being received.
        frame: usize,
        /// Cycle at which the stop bit was sampled.
        cycle: u64,
    },

    /// A decoded frame differs from the expected row.
    #[error("row {row}: expected {expected}, received {actual}")]
    Mismatch {
        /// Zero-based row index in the expected matrix.
        row: usize,
        /// Expected vector.
        expected: ByteVector,
        /// Vector recovered from the line.
        actual: ByteVector,
    },

    /// A value read back from the device snapshot differs from the expectation.
    #[error("{location}: expected {expected:#x}, found {actual:#x}")]
    StateMismatch {
        /// Snapshot field that was compared.
        location: Location,
        /// Expected value.
        expected: u32,
        /// Value found in the snapshot.
        actual: u32,
    },

    /// The device FIFO write pointer disagrees with the row being transmitted.
    #[error("row {row}: fifo write pointer {actual}, expected {expected} (cycle {cycle})")]
    PointerMismatch {
        /// Row on the line when the check ran.
        row: usize,
        /// Expected pointer (`row mod depth`).
        expected: usize,
        /// Pointer reported by the device.
        actual: usize,
        /// Cycle of the baud boundary at which the check ran.
        cycle: u64,
    },

    /// More frames arrived than the expected matrix has rows.
    #[error("unexpected frame {row}: {actual}")]
    UnexpectedFrame {
        /// Index the frame would occupy.
        row: usize,
        /// Vector recovered from the line.
        actual: ByteVector,
    },

    /// The tick budget elapsed before the phase reached its terminal condition.
    #[error("timeout in {phase} phase after {budget} ticks: {observed}/{expected} frames")]
    Timeout {
        /// Phase that ran out of ticks.
        phase: Phase,
        /// Tick budget that elapsed.
        budget: u64,
        /// Frames the phase was waiting for.
        expected: usize,
        /// Frames actually completed.
        observed: usize,
    },

    /// A check needs introspection the device does not expose.
    #[error("device does not expose {probe} state")]
    MissingProbe {
        /// Probe name (`"fifo"` or `"cpu"`).
        probe: &'static str,
    },

    /// A check names a location outside the device's arrays.
    #[error("{location} is outside the device snapshot")]
    UnknownLocation {
        /// Location that could not be read.
        location: Location,
    },
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field holds a value the harness cannot run with.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        /// Dotted field path.
        field: &'static str,
        /// Human-readable constraint that was violated.
        reason: String,
    },
    /// The configuration file could not be read.
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid JSON for `HarnessConfig`.
    #[error("cannot parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised when constructing a byte vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum VectorError {
    /// The first bit of a vector must be the low start bit.
    #[error("byte vector start bit is high")]
    StartBitHigh,
    /// A vector holds exactly nine bits.
    #[error("byte vector has {0} bits, expected 9")]
    WrongLength(usize),
}

/// Reason an assembler line was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AsmErrorKind {
    /// Mnemonic is not part of the supported subset.
    #[error("unknown mnemonic `{0}`")]
    UnknownMnemonic(String),
    /// Wrong number of operands for the mnemonic.
    #[error("`{mnemonic}` takes {expected} operands, found {found}")]
    OperandCount {
        /// Mnemonic being assembled.
        mnemonic: String,
        /// Operands required.
        expected: usize,
        /// Operands present.
        found: usize,
    },
    /// Operand is not a register name.
    #[error("bad register `{0}`")]
    BadRegister(String),
    /// Operand is not a parseable immediate or register.
    #[error("bad operand `{0}`")]
    BadOperand(String),
    /// Immediate cannot be expressed as an 8-bit value rotated by an even amount.
    #[error("immediate {0:#x} is not encodable")]
    UnencodableImmediate(u32),
    /// Load/store offset does not fit in 12 bits.
    #[error("offset {0} out of range")]
    OffsetRange(i64),
    /// Branch target label is not defined.
    #[error("undefined label `{0}`")]
    UndefinedLabel(String),
    /// Label defined twice.
    #[error("duplicate label `{0}`")]
    DuplicateLabel(String),
    /// Branch distance does not fit the 24-bit word offset.
    #[error("branch offset {0} out of range")]
    BranchRange(i64),
}

/// Assembler error with the 1-based source line it refers to.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct AsmError {
    /// 1-based source line.
    pub line: usize,
    /// What went wrong.
    pub kind: AsmErrorKind,
}
