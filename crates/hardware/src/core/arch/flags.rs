//! Condition flags (N, Z, C, V).

/// Arithmetic condition flags of the program status register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Nzcv {
    /// Negative: bit 31 of the result.
    pub n: bool,
    /// Zero: result was zero.
    pub z: bool,
    /// Carry: unsigned carry out, or NOT borrow for subtraction.
    pub c: bool,
    /// Overflow: signed overflow.
    pub v: bool,
}

impl Nzcv {
    /// Sets N and Z from `result`, leaving C and V.
    pub fn set_nz(&mut self, result: u32) {
        self.n = result >> 31 == 1;
        self.z = result == 0;
    }
}
