//! Serial line protocol.
//!
//! This module models both ends of the fixed 8N1 line format:
//! 1. **Frames:** Byte vectors (start bit plus 8 data bits) and test matrices of them.
//! 2. **Encoder:** TX state machine that changes the line only on baud boundaries.
//! 3. **Decoder:** RX sampler that detects the start edge and samples each bit mid-period.

/// Mid-bit sampling frame decoder (RX model).
pub mod decoder;

/// Baud-boundary frame encoder (TX model).
pub mod encoder;

/// Byte vectors and test matrices.
pub mod frame;

pub use decoder::FrameDecoder;
pub use encoder::{FrameEncoder, TxPosition, TxState, TxStep};
pub use frame::{ByteVector, TestMatrix};
