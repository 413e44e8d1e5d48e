//! Byte FIFO with wrapping pointers.
//!
//! Models a circular buffer whose write and read pointers are exposed for
//! verification: both wrap modulo the depth, and an occupancy count derives
//! the `empty` and `full` flags.

use crate::soc::traits::FifoStatus;

/// Circular byte FIFO.
#[derive(Debug, Clone)]
pub struct Fifo {
    slots: Vec<u8>,
    write_pointer: usize,
    read_pointer: usize,
    count: usize,
    overflows: u64,
}

impl Fifo {
    /// Creates an empty FIFO with `depth` slots (at least one).
    pub fn new(depth: usize) -> Self {
        Self {
            slots: vec![0; depth.max(1)],
            write_pointer: 0,
            read_pointer: 0,
            count: 0,
            overflows: 0,
        }
    }

    /// Empties the FIFO and rewinds both pointers.
    pub fn reset(&mut self) {
        self.write_pointer = 0;
        self.read_pointer = 0;
        self.count = 0;
    }

    /// Appends a byte; a push into a full FIFO is dropped and counted.
    ///
    /// Returns `true` if the byte was stored.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.is_full() {
            self.overflows += 1;
            return false;
        }
        self.slots[self.write_pointer] = byte;
        self.write_pointer = (self.write_pointer + 1) % self.slots.len();
        self.count += 1;
        true
    }

    /// Removes the oldest byte.
    pub fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = self.slots[self.read_pointer];
        self.read_pointer = (self.read_pointer + 1) % self.slots.len();
        self.count -= 1;
        Some(byte)
    }

    /// Returns `true` if no bytes are held.
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns `true` if every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    /// Bytes held.
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Pushes dropped because the FIFO was full.
    pub const fn overflows(&self) -> u64 {
        self.overflows
    }

    /// Pointer and flag snapshot.
    pub fn status(&self) -> FifoStatus {
        FifoStatus {
            write_pointer: self.write_pointer,
            read_pointer: self.read_pointer,
            empty: self.is_empty(),
            full: self.is_full(),
            depth: self.slots.len(),
        }
    }
}
