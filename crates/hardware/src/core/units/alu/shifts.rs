//! Barrel shifter.
//!
//! Forms the second data-processing operand and its carry out. Immediate shift
//! amounts of zero are special: `lsr #0` and `asr #0` encode a shift by 32, and
//! `ror #0` encodes RRX.

use crate::isa::instruction::{Operand2, ShiftKind};

/// Shifts `value` by an encoded immediate `amount`.
///
/// # Returns
///
/// The shifted value and the shifter carry out.
pub const fn shift(kind: ShiftKind, value: u32, amount: u32, carry_in: bool) -> (u32, bool) {
    let amount = amount & 0x1F;
    match kind {
        ShiftKind::Lsl => {
            if amount == 0 {
                (value, carry_in)
            } else {
                (value << amount, (value >> (32 - amount)) & 1 == 1)
            }
        }
        ShiftKind::Lsr => {
            if amount == 0 {
                (0, value >> 31 == 1)
            } else {
                (value >> amount, (value >> (amount - 1)) & 1 == 1)
            }
        }
        ShiftKind::Asr => {
            if amount == 0 {
                let fill = ((value as i32) >> 31) as u32;
                (fill, value >> 31 == 1)
            } else {
                (
                    ((value as i32) >> amount) as u32,
                    (value >> (amount - 1)) & 1 == 1,
                )
            }
        }
        ShiftKind::Ror => {
            if amount == 0 {
                (((carry_in as u32) << 31) | (value >> 1), value & 1 == 1)
            } else {
                (
                    value.rotate_right(amount),
                    (value >> (amount - 1)) & 1 == 1,
                )
            }
        }
    }
}

/// Evaluates a second operand against the register file.
///
/// `read` returns the operand value of a register (with `r15` already offset).
pub fn operand2(op: Operand2, carry_in: bool, read: impl Fn(u8) -> u32) -> (u32, bool) {
    match op {
        Operand2::Immediate { rotate, .. } => {
            let value = op.immediate_value().unwrap_or_default();
            let carry = if rotate == 0 {
                carry_in
            } else {
                value >> 31 == 1
            };
            (value, carry)
        }
        Operand2::Register { rm, shift: kind, amount } => {
            shift(kind, read(rm), u32::from(amount), carry_in)
        }
    }
}
