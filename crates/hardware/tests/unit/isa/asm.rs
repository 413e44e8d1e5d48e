//! Assembler Unit Tests.
//!
//! Verifies known encodings of the bootstrap dialect, label resolution, and
//! that every rejected line is reported with its 1-based line number.

use pretty_assertions::assert_eq;
use rstest::rstest;

use uartbench_core::common::error::{AsmError, AsmErrorKind};
use uartbench_core::isa::assemble;

fn one(line: &str) -> u32 {
    let words = assemble(line).unwrap();
    assert_eq!(words.len(), 1, "`{line}` assembled to {words:x?}");
    words[0]
}

fn error(source: &str) -> AsmError {
    assemble(source).unwrap_err()
}

// ══════════════════════════════════════════════════════════
// 1. Known encodings
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("mov r0, #0", 0xE3A0_0000)]
#[case("mov r1, #0x41", 0xE3A0_1041)]
#[case("mov r1, r2", 0xE1A0_1002)]
#[case("bx lr", 0xE12F_FF1E)]
#[case("str r1, [r0]", 0xE580_1000)]
#[case("ldr r2, [r3, #4]", 0xE593_2004)]
#[case("cmp r1, #0x10", 0xE351_0010)]
#[case("add r0, r0, #1", 0xE280_0001)]
#[case("sub r2, r2, r3", 0xE042_2003)]
#[case("strb r1, [r0, #-1]", 0xE540_1001)]
#[case("ldr r0, [r1], #4", 0xE491_0004)]
#[case("str r0, [sp, #-4]!", 0xE52D_0004)]
#[case("movs r0, r1, lsl #2", 0xE1B0_0101)]
#[case("moveq r0, #1", 0x03A0_0001)]
#[case("mov r0, #0xff000000", 0xE3A0_04FF)]
fn encodes(#[case] line: &str, #[case] word: u32) {
    assert_eq!(one(line), word, "{line}");
}

#[test]
fn upper_case_and_comments_are_accepted() {
    assert_eq!(one("  MOV R1, #0x41   @ reply byte"), 0xE3A0_1041);
}

#[test]
fn reply_fixture_is_little_endian_on_the_wire() {
    let words = assemble("@ comment\nmov r1, #0x41").unwrap();
    assert_eq!(words, vec![0xE3A0_1041]);
    assert_eq!(words[0].to_le_bytes(), [0x41, 0x10, 0xA0, 0xE3]);
}

#[test]
fn return_fixture() {
    let words = assemble("mov r0, #0x42\nbx lr\n").unwrap();
    assert_eq!(words, vec![0xE3A0_0042, 0xE12F_FF1E]);
}

#[test]
fn directives_and_blank_lines_are_skipped() {
    let words = assemble(".text\n.global _start\n\n_start:\n    nop\n").unwrap();
    assert_eq!(words, vec![0xE1A0_0000]);
}

// ══════════════════════════════════════════════════════════
// 2. Immediate substitution
// ══════════════════════════════════════════════════════════

#[test]
fn mov_of_inverted_immediate_becomes_mvn() {
    assert_eq!(one("mov r0, #-1"), 0xE3E0_0000);
    assert_eq!(one("mov r0, #0xffffff00"), 0xE3E0_00FF);
}

#[test]
fn add_of_negative_immediate_becomes_sub() {
    assert_eq!(one("add r0, r0, #-1"), one("sub r0, r0, #1"));
}

#[test]
fn cmp_of_negative_immediate_becomes_cmn() {
    assert_eq!(one("cmp r0, #-1"), one("cmn r0, #1"));
}

// ══════════════════════════════════════════════════════════
// 3. Branches and labels
// ══════════════════════════════════════════════════════════

#[test]
fn branch_to_self_has_offset_minus_two() {
    assert_eq!(one("here: b here"), 0xEAFF_FFFE);
    assert_eq!(one("here: bl here"), 0xEBFF_FFFE);
}

#[test]
fn backward_conditional_branch() {
    let words = assemble("loop:\n subs r1, r1, #1\n bne loop").unwrap();
    assert_eq!(words[1], 0x1AFF_FFFD);
}

#[test]
fn forward_branch_skips_instruction() {
    let words = assemble("b skip\nmov r0, #1\nskip:\nmov r0, #2").unwrap();
    assert_eq!(words[0], 0xEA00_0000);
}

#[test]
fn blt_and_ble_stay_conditional_branches() {
    let words = assemble("x:\nblt x\nble x\nbls x").unwrap();
    assert_eq!(words[0] >> 24, 0xBA);
    assert_eq!(words[1] >> 24, 0xDA);
    assert_eq!(words[2] >> 24, 0x9A);
}

// ══════════════════════════════════════════════════════════
// 4. Errors
// ══════════════════════════════════════════════════════════

#[test]
fn unknown_mnemonic_reports_line() {
    let err = error("nop\n\nfrob r0, r1");
    assert_eq!(err.line, 3);
    assert_eq!(err.kind, AsmErrorKind::UnknownMnemonic("frob".into()));
}

#[test]
fn bad_register() {
    assert_eq!(error("mov r16, #1").kind, AsmErrorKind::BadRegister("r16".into()));
}

#[test]
fn unencodable_immediate() {
    assert_eq!(error("mov r0, #0x101").kind, AsmErrorKind::UnencodableImmediate(0x101));
}

#[test]
fn offset_out_of_range() {
    assert_eq!(error("ldr r0, [r1, #4096]").kind, AsmErrorKind::OffsetRange(4096));
    assert!(assemble("ldr r0, [r1, #4095]").is_ok());
}

#[rstest]
#[case("mov r0, #--5")]
#[case("mov r0, #-+5")]
#[case("mov r0, #--9223372036854775808")]
#[case("mov r0, #-0x-1")]
#[case("ldr r0, [r1, #--4]")]
#[case("ldr r0, [r1, #--9223372036854775808]")]
#[case("str r0, [r1], #-+8")]
fn doubled_sign_is_rejected(#[case] line: &str) {
    let err = error(line);
    assert_eq!(err.line, 1);
    assert!(matches!(err.kind, AsmErrorKind::BadOperand(_)), "`{line}` gave {err:?}");
}

#[test]
fn huge_offsets_are_out_of_range() {
    assert_eq!(
        error("ldr r0, [r1, #-9223372036854775807]").kind,
        AsmErrorKind::OffsetRange(-9_223_372_036_854_775_807)
    );
}

#[test]
fn undefined_and_duplicate_labels() {
    assert_eq!(error("b nowhere").kind, AsmErrorKind::UndefinedLabel("nowhere".into()));
    let dup = error("a:\nnop\na:\nnop");
    assert_eq!(dup.line, 3);
    assert_eq!(dup.kind, AsmErrorKind::DuplicateLabel("a".into()));
}

#[test]
fn operand_count() {
    let err = error("add r0, r1");
    assert!(matches!(err.kind, AsmErrorKind::OperandCount { expected: 3, found: 2, .. }));
}

#[test]
fn error_message_names_line() {
    assert_eq!(error("nop\nmov r0").to_string().split(':').next(), Some("line 2"));
}
