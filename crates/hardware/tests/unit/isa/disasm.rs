//! Instruction Disassembler Unit Tests.
//!
//! Verifies the text produced for each instruction class, and that text for
//! non-branch instructions assembles back to the same word.

use pretty_assertions::assert_eq;
use rstest::rstest;

use uartbench_core::isa::{assemble, disassemble};

// ══════════════════════════════════════════════════════════
// 1. Text
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0xE3A0_1041, "mov r1, #0x41")]
#[case(0xE1A0_1002, "mov r1, r2")]
#[case(0xE351_0010, "cmp r1, #0x10")]
#[case(0xE042_2003, "sub r2, r2, r3")]
#[case(0xE1B0_0101, "movs r0, r1, lsl #2")]
#[case(0x03A0_0001, "moveq r0, #0x1")]
#[case(0xE593_2004, "ldr r2, [r3, #4]")]
#[case(0xE540_1001, "strb r1, [r0, #-1]")]
#[case(0xE52D_0004, "str r0, [sp, #-4]!")]
#[case(0xE491_0004, "ldr r0, [r1], #4")]
#[case(0xE12F_FF1E, "bx lr")]
#[case(0xEAFF_FFFE, "b -2")]
#[case(0x1B00_0010, "blne +16")]
#[case(0xEF00_0000, ".word 0xef000000")]
fn renders(#[case] word: u32, #[case] text: &str) {
    assert_eq!(disassemble(word), text);
}

#[test]
fn rrx_and_shift_by_32() {
    assert_eq!(disassemble(0xE1A0_0061), "mov r0, r1, rrx");
    assert_eq!(disassemble(0xE1A0_0021), "mov r0, r1, lsr #32");
}

// ══════════════════════════════════════════════════════════
// 2. Reassembly
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0xE280_0001)]
#[case(0xE3E0_00FF)]
#[case(0xE1B0_0101)]
#[case(0xE1A0_0061)]
#[case(0xE1A0_0021)]
#[case(0xE540_1001)]
#[case(0xE52D_0004)]
#[case(0xE491_0004)]
#[case(0xE12F_FF1E)]
fn text_reassembles_to_same_word(#[case] word: u32) {
    let text = disassemble(word);
    assert_eq!(assemble(&text).unwrap(), vec![word], "{text}");
}
