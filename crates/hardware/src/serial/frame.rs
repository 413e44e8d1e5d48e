//! Byte vectors and test matrices.
//!
//! A byte vector is the 9-bit logical unit every harness transmits and expects:
//! the low start bit followed by the 8 data bits, least significant first. The
//! stop bit is not part of the vector; the encoder appends it on the wire.

use std::fmt;

use crate::common::constants::{DATA_BITS, FRAME_BITS, START_LEVEL, STOP_LEVEL, VECTOR_BITS};
use crate::common::error::VectorError;

/// One framed byte: start bit followed by 8 data bits, LSB first.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteVector {
    levels: [bool; VECTOR_BITS],
}

impl ByteVector {
    /// Builds the vector that frames `byte`.
    pub const fn from_byte(byte: u8) -> Self {
        let mut levels = [START_LEVEL; VECTOR_BITS];
        let mut i = 0;
        while i < DATA_BITS {
            levels[i + 1] = (byte >> i) & 1 == 1;
            i += 1;
        }
        Self { levels }
    }

    /// Builds a vector from line levels written as `0`/`1` digits.
    ///
    /// Any non-zero entry is a high level.
    ///
    /// # Errors
    ///
    /// Returns `VectorError::WrongLength` unless exactly 9 bits are given, and
    /// `VectorError::StartBitHigh` if the first bit is high.
    pub fn from_bits(bits: &[u8]) -> Result<Self, VectorError> {
        if bits.len() != VECTOR_BITS {
            return Err(VectorError::WrongLength(bits.len()));
        }
        let mut levels = [START_LEVEL; VECTOR_BITS];
        for (slot, &bit) in levels.iter_mut().zip(bits) {
            *slot = bit != 0;
        }
        Self::from_levels(levels)
    }

    /// Builds a vector from raw line levels.
    ///
    /// # Errors
    ///
    /// Returns `VectorError::StartBitHigh` if the first level is high.
    pub const fn from_levels(levels: [bool; VECTOR_BITS]) -> Result<Self, VectorError> {
        if levels[0] != START_LEVEL {
            return Err(VectorError::StartBitHigh);
        }
        Ok(Self { levels })
    }

    /// Data byte carried by the vector.
    pub fn byte(&self) -> u8 {
        self.levels[1..]
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, &level)| acc | (u8::from(level) << i))
    }

    /// Level of logical bit `index` (0 is the start bit).
    ///
    /// Returns `None` for indices past the last data bit.
    pub fn bit(&self, index: usize) -> Option<bool> {
        self.levels.get(index).copied()
    }

    /// All nine logical levels.
    pub const fn levels(&self) -> &[bool; VECTOR_BITS] {
        &self.levels
    }

    /// The ten levels that go on the wire, stop bit included.
    pub fn wire_levels(&self) -> [bool; FRAME_BITS] {
        let mut wire = [STOP_LEVEL; FRAME_BITS];
        wire[..VECTOR_BITS].copy_from_slice(&self.levels);
        wire
    }
}

impl From<u8> for ByteVector {
    fn from(byte: u8) -> Self {
        Self::from_byte(byte)
    }
}

impl fmt::Display for ByteVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, &level) in self.levels.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", u8::from(level))?;
        }
        write!(f, "] ({:#04x})", self.byte())
    }
}

impl fmt::Debug for ByteVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteVector{self}")
    }
}

/// Ordered rows of byte vectors driven through the encoder one frame per row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestMatrix {
    rows: Vec<ByteVector>,
}

impl TestMatrix {
    /// Wraps already-built rows.
    pub const fn new(rows: Vec<ByteVector>) -> Self {
        Self { rows }
    }

    /// Builds a matrix from rows of `0`/`1` digits.
    ///
    /// # Errors
    ///
    /// Returns the first row's `VectorError`.
    pub fn from_bit_rows(rows: &[[u8; VECTOR_BITS]]) -> Result<Self, VectorError> {
        rows.iter()
            .map(|row| ByteVector::from_bits(row))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// Builds a matrix with one row per byte.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(bytes.iter().copied().map(ByteVector::from_byte).collect())
    }

    /// Rows in transmission order.
    pub fn rows(&self) -> &[ByteVector] {
        &self.rows
    }

    /// Row at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&ByteVector> {
        self.rows.get(index)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row.
    pub fn push(&mut self, row: ByteVector) {
        self.rows.push(row);
    }

    /// Data bytes of every row.
    pub fn bytes(&self) -> Vec<u8> {
        self.rows.iter().map(ByteVector::byte).collect()
    }
}

impl FromIterator<ByteVector> for TestMatrix {
    fn from_iter<I: IntoIterator<Item = ByteVector>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
