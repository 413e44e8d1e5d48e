//! ALU logical operations.
//!
//! C comes from the barrel shifter; V is preserved.

use super::AluResult;
use crate::core::arch::Nzcv;
use crate::isa::instruction::DpOp;

/// Executes a logical operation.
///
/// Returns `0` and the unchanged flags for non-logic opcodes.
pub fn execute(op: DpOp, a: u32, b: u32, shifter_carry: bool, flags: Nzcv) -> AluResult {
    let value = match op {
        DpOp::And | DpOp::Tst => a & b,
        DpOp::Eor | DpOp::Teq => a ^ b,
        DpOp::Orr => a | b,
        DpOp::Bic => a & !b,
        DpOp::Mov => b,
        DpOp::Mvn => !b,
        _ => return AluResult { value: 0, flags },
    };
    let mut out = Nzcv {
        c: shifter_carry,
        ..flags
    };
    out.set_nz(value);
    AluResult { value, flags: out }
}
