//! Instruction Decoder Properties.
//!
//! Checks field extraction for each instruction class, the encodings that fall
//! outside the subset, and that every defined decode re-encodes to the same word.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use uartbench_core::isa::cond::Condition;
use uartbench_core::isa::instruction::{
    DataProc, DpOp, Instruction, Operand2, Transfer, encode_immediate,
};
use uartbench_core::isa::{decode, encode};

// ══════════════════════════════════════════════════════════
// 1. Field extraction
// ══════════════════════════════════════════════════════════

#[test]
fn decodes_mov_immediate() {
    assert_eq!(
        decode(0xE3A0_1041),
        Instruction::DataProc(DataProc {
            cond: Condition::Al,
            op: DpOp::Mov,
            set_flags: false,
            rn: 0,
            rd: 1,
            operand: Operand2::Immediate { imm8: 0x41, rotate: 0 },
        })
    );
}

#[test]
fn decodes_store_word() {
    assert_eq!(
        decode(0xE580_1000),
        Instruction::Transfer(Transfer {
            cond: Condition::Al,
            load: false,
            byte: false,
            pre_index: true,
            up: true,
            writeback: false,
            rn: 0,
            rd: 1,
            offset: 0,
        })
    );
}

#[test]
fn decodes_branch_offsets_sign_extended() {
    assert_eq!(
        decode(0xEAFF_FFFE),
        Instruction::Branch {
            cond: Condition::Al,
            link: false,
            offset: -2
        }
    );
    assert_eq!(
        decode(0x1B00_0010),
        Instruction::Branch {
            cond: Condition::Ne,
            link: true,
            offset: 16
        }
    );
}

#[test]
fn decodes_bx() {
    assert_eq!(
        decode(0xE12F_FF1E),
        Instruction::BranchExchange {
            cond: Condition::Al,
            rm: 14
        }
    );
}

// ══════════════════════════════════════════════════════════
// 2. Outside the subset
// ══════════════════════════════════════════════════════════

#[test]
fn unsupported_encodings_are_undefined() {
    for word in [
        0xE000_0091, // mul
        0xE10F_0000, // mrs (tst without s)
        0xE001_0112, // register-shifted register
        0xE790_0001, // ldr with register offset
        0xE4B0_0004, // ldrt
        0xE8BD_8000, // ldm
        0xEF00_0000, // swi
    ] {
        assert_eq!(decode(word), Instruction::Undefined(word), "{word:#010x}");
        assert_eq!(decode(word).condition(), None);
    }
}

// ══════════════════════════════════════════════════════════
// 3. Immediates
// ══════════════════════════════════════════════════════════

#[test]
fn rotated_immediates() {
    assert_eq!(
        encode_immediate(0xFF00_0000),
        Some(Operand2::Immediate { imm8: 0xFF, rotate: 4 })
    );
    assert_eq!(encode_immediate(0x101), None);
    assert_eq!(
        Operand2::Immediate { imm8: 0x3F, rotate: 15 }.immediate_value(),
        Some(0xFC)
    );
}

proptest! {
    #[test]
    fn encodable_immediates_round_trip(imm8 in any::<u8>(), rotate in 0u32..16) {
        let value = u32::from(imm8).rotate_right(rotate * 2);
        let operand = encode_immediate(value).unwrap();
        prop_assert_eq!(operand.immediate_value(), Some(value));
    }

    #[test]
    fn defined_words_re_encode(word in any::<u32>()) {
        let inst = decode(word);
        if !matches!(inst, Instruction::Undefined(_)) {
            prop_assert_eq!(encode(&inst), word);
        }
    }
}
