//! Memory Access Interface.
//!
//! The core does not own data memory. Each `step` borrows a `DataBus` from the
//! enclosing device, which decides how addresses map onto RAM and peripherals.

/// Data-space accessor for loads and stores.
///
/// Every method returns `None` for an address the bus does not map; the core
/// turns that into a data abort.
pub trait DataBus {
    /// Reads an aligned 32-bit word.
    fn load_word(&mut self, addr: u32) -> Option<u32>;
    /// Reads a byte.
    fn load_byte(&mut self, addr: u32) -> Option<u8>;
    /// Writes an aligned 32-bit word.
    fn store_word(&mut self, addr: u32, value: u32) -> Option<()>;
    /// Writes a byte.
    fn store_byte(&mut self, addr: u32, value: u8) -> Option<()>;
}
