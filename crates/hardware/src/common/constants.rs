//! Line format and timing constants.
//!
//! The serial format is fixed: 8 data bits, no parity, 1 stop bit, idle-high.

/// Data bits per frame.
pub const DATA_BITS: usize = 8;

/// Logical bits in a byte vector: start bit followed by the data bits.
///
/// The stop bit is never stored in a vector; the encoder synthesizes it.
pub const VECTOR_BITS: usize = DATA_BITS + 1;

/// Bits on the wire per frame: start, data, stop.
pub const FRAME_BITS: usize = VECTOR_BITS + 1;

/// Bytes per instruction word on the wire.
pub const WORD_BYTES: usize = 4;

/// Line level while no frame is in flight.
pub const IDLE_LEVEL: bool = true;

/// Level of the start bit.
pub const START_LEVEL: bool = false;

/// Level of a valid stop bit.
pub const STOP_LEVEL: bool = true;

/// Minimum number of clock cycles reset must be held.
pub const MIN_RESET_CYCLES: u32 = 2;
