//! ALU arithmetic operations.
//!
//! Every arithmetic opcode reduces to one add-with-carry. Subtraction adds the
//! inverted operand with carry in set, so C reads as NOT borrow.

use super::AluResult;
use crate::core::arch::Nzcv;
use crate::isa::instruction::DpOp;

/// `a + b + carry`, returning the sum, carry out and signed overflow.
pub const fn add_with_carry(a: u32, b: u32, carry: bool) -> (u32, bool, bool) {
    let wide = a as u64 + b as u64 + carry as u64;
    let result = wide as u32;
    let carry_out = wide > u32::MAX as u64;
    let overflow = ((a ^ result) & (b ^ result)) >> 31 == 1;
    (result, carry_out, overflow)
}

/// Executes an arithmetic operation.
///
/// Returns the unchanged flags for non-arithmetic opcodes.
pub fn execute(op: DpOp, a: u32, b: u32, flags: Nzcv) -> AluResult {
    let (x, y, carry) = match op {
        DpOp::Add | DpOp::Cmn => (a, b, false),
        DpOp::Adc => (a, b, flags.c),
        DpOp::Sub | DpOp::Cmp => (a, !b, true),
        DpOp::Sbc => (a, !b, flags.c),
        DpOp::Rsb => (b, !a, true),
        DpOp::Rsc => (b, !a, flags.c),
        _ => return AluResult { value: 0, flags },
    };
    let (value, c, v) = add_with_carry(x, y, carry);
    let mut out = Nzcv { c, v, ..flags };
    out.set_nz(value);
    AluResult { value, flags: out }
}
