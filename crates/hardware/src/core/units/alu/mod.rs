//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the data-processing datapath of the A32 core: the barrel
//! shifter that forms the second operand and the sixteen data-processing operations
//! with their NZCV effects.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Adc, Sub, Sbc, Rsb, Rsc, Cmp, Cmn
//! - [`logic`]:      And, Eor, Orr, Bic, Mov, Mvn, Tst, Teq
//! - [`shifts`]:     Lsl, Lsr, Asr, Ror, Rrx

/// Add-with-carry based operations.
pub mod arithmetic;

/// Bitwise operations.
pub mod logic;

/// Barrel shifter.
pub mod shifts;

use crate::core::arch::Nzcv;
use crate::isa::instruction::DpOp;

/// Result of a data-processing operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AluResult {
    /// Value written to `rd` (ignored for compares).
    pub value: u32,
    /// Flags the operation would set when `S` is present.
    pub flags: Nzcv,
}

/// Arithmetic Logic Unit for data-processing instructions.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Executes a data-processing operation.
    ///
    /// # Arguments
    ///
    /// * `op`            - The operation to perform
    /// * `a`             - First operand (`rn`)
    /// * `b`             - Second operand after the barrel shifter
    /// * `shifter_carry` - Carry out of the barrel shifter
    /// * `flags`         - Current flags (C is an input to `adc`/`sbc`/`rsc`)
    ///
    /// # Returns
    ///
    /// The result value and the flags it produces.
    ///
    /// # Examples
    ///
    /// ```
    /// use uartbench_core::core::arch::Nzcv;
    /// use uartbench_core::core::units::alu::Alu;
    /// use uartbench_core::isa::instruction::DpOp;
    ///
    /// let r = Alu::execute(DpOp::Sub, 1, 1, false, Nzcv::default());
    /// assert_eq!(r.value, 0);
    /// assert!(r.flags.z && r.flags.c);
    /// ```
    pub fn execute(op: DpOp, a: u32, b: u32, shifter_carry: bool, flags: Nzcv) -> AluResult {
        match op {
            DpOp::Add
            | DpOp::Adc
            | DpOp::Sub
            | DpOp::Sbc
            | DpOp::Rsb
            | DpOp::Rsc
            | DpOp::Cmp
            | DpOp::Cmn => arithmetic::execute(op, a, b, flags),

            DpOp::And
            | DpOp::Eor
            | DpOp::Orr
            | DpOp::Bic
            | DpOp::Mov
            | DpOp::Mvn
            | DpOp::Tst
            | DpOp::Teq => logic::execute(op, a, b, shifter_carry, flags),
        }
    }
}
