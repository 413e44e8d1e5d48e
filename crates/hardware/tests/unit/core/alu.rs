//! ALU and Barrel Shifter Unit Tests.
//!
//! Verifies results and NZCV effects of the arithmetic and logical operations,
//! and the shifter's carry out including the `#0` special encodings.

use pretty_assertions::assert_eq;
use rstest::rstest;

use uartbench_core::core::arch::Nzcv;
use uartbench_core::core::units::alu::arithmetic::add_with_carry;
use uartbench_core::core::units::alu::shifts::shift;
use uartbench_core::core::units::alu::Alu;
use uartbench_core::isa::instruction::{DpOp, ShiftKind};

const CLEAR: Nzcv = Nzcv {
    n: false,
    z: false,
    c: false,
    v: false,
};

fn flags(n: bool, z: bool, c: bool, v: bool) -> Nzcv {
    Nzcv { n, z, c, v }
}

// ══════════════════════════════════════════════════════════
// 1. Arithmetic
// ══════════════════════════════════════════════════════════

#[test]
fn add_signed_overflow_sets_n_and_v() {
    let r = Alu::execute(DpOp::Add, 0x7FFF_FFFF, 1, false, CLEAR);
    assert_eq!(r.value, 0x8000_0000);
    assert_eq!(r.flags, flags(true, false, false, true));
}

#[test]
fn add_unsigned_wrap_sets_c_and_z() {
    let r = Alu::execute(DpOp::Add, 0xFFFF_FFFF, 1, false, CLEAR);
    assert_eq!(r.value, 0);
    assert_eq!(r.flags, flags(false, true, true, false));
}

#[test]
fn sub_borrow_clears_carry() {
    let r = Alu::execute(DpOp::Sub, 0, 1, false, CLEAR);
    assert_eq!(r.value, 0xFFFF_FFFF);
    assert_eq!(r.flags, flags(true, false, false, false));
}

#[test]
fn cmp_equal_sets_z_and_c() {
    let r = Alu::execute(DpOp::Cmp, 0x41, 0x41, false, CLEAR);
    assert_eq!(r.flags, flags(false, true, true, false));
}

#[test]
fn rsb_reverses_operands() {
    let r = Alu::execute(DpOp::Rsb, 3, 10, false, CLEAR);
    assert_eq!(r.value, 7);
}

#[test]
fn adc_and_sbc_consume_carry() {
    let carry = flags(false, false, true, false);
    assert_eq!(Alu::execute(DpOp::Adc, 1, 1, false, carry).value, 3);
    assert_eq!(Alu::execute(DpOp::Sbc, 5, 2, false, carry).value, 3);
    assert_eq!(Alu::execute(DpOp::Sbc, 5, 2, false, CLEAR).value, 2);
}

#[test]
fn add_with_carry_reports_both_flags() {
    assert_eq!(add_with_carry(0x8000_0000, 0x8000_0000, false), (0, true, true));
    assert_eq!(add_with_carry(1, 2, true), (4, false, false));
}

// ══════════════════════════════════════════════════════════
// 2. Logic
// ══════════════════════════════════════════════════════════

#[test]
fn logic_takes_carry_from_shifter_and_keeps_v() {
    let before = flags(false, false, false, true);
    let r = Alu::execute(DpOp::And, 0xF0, 0x0F, true, before);
    assert_eq!(r.value, 0);
    assert_eq!(r.flags, flags(false, true, true, true));
}

#[rstest]
#[case(DpOp::Eor, 0xFF, 0x0F, 0xF0)]
#[case(DpOp::Orr, 0xF0, 0x0F, 0xFF)]
#[case(DpOp::Bic, 0xFF, 0x0F, 0xF0)]
#[case(DpOp::Mov, 0x12, 0x34, 0x34)]
#[case(DpOp::Mvn, 0, 0, 0xFFFF_FFFF)]
fn logic_values(#[case] op: DpOp, #[case] a: u32, #[case] b: u32, #[case] want: u32) {
    assert_eq!(Alu::execute(op, a, b, false, CLEAR).value, want);
}

// ══════════════════════════════════════════════════════════
// 3. Barrel shifter
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(ShiftKind::Lsl, 0x8000_0001, 1, (0x0000_0002, true))]
#[case(ShiftKind::Lsl, 0x1234, 0, (0x1234, false))]
#[case(ShiftKind::Lsr, 0x0000_0003, 1, (0x0000_0001, true))]
#[case(ShiftKind::Lsr, 0x8000_0000, 0, (0, true))]
#[case(ShiftKind::Asr, 0x8000_0000, 4, (0xF800_0000, false))]
#[case(ShiftKind::Asr, 0x8000_0000, 0, (0xFFFF_FFFF, true))]
#[case(ShiftKind::Ror, 0x0000_0001, 1, (0x8000_0000, true))]
fn shift_results(
    #[case] kind: ShiftKind,
    #[case] value: u32,
    #[case] amount: u32,
    #[case] want: (u32, bool),
) {
    assert_eq!(shift(kind, value, amount, false), want);
}

#[test]
fn ror_zero_is_rrx_through_carry() {
    assert_eq!(shift(ShiftKind::Ror, 0x0000_0003, 0, true), (0x8000_0001, true));
    assert_eq!(shift(ShiftKind::Ror, 0x0000_0002, 0, false), (0x0000_0001, false));
}

#[test]
fn alu_is_debug_printable() {
    assert_eq!(format!("{Alu:?}"), "Alu");
}
