//! Instruction Disassembler for the A32 subset.
//!
//! Converts a 32-bit instruction word into assembler text for trace logging and
//! test diagnostics. Output uses the same dialect `assemble` accepts, except that
//! branch targets are rendered as signed word offsets.
//!
//! # Usage
//!
//! ```ignore
//! use uartbench_core::isa::disasm::disassemble;
//! assert_eq!(disassemble(0xE3A01041), "mov r1, #0x41");
//! ```

use super::instruction::{DataProc, Instruction, Operand2, ShiftKind, Transfer, decode};

/// Register names; `r13`-`r15` use their aliases.
const REG_NAMES: [&str; 16] = [
    "r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8", "r9", "r10", "r11", "r12", "sp", "lr",
    "pc",
];

#[inline]
fn reg(idx: u8) -> &'static str {
    REG_NAMES[usize::from(idx & 0xF)]
}

/// Disassembles a single instruction word.
pub fn disassemble(word: u32) -> String {
    match decode(word) {
        Instruction::DataProc(dp) => data_proc(&dp),
        Instruction::Transfer(t) => transfer(&t),
        Instruction::Branch { cond, link, offset } => {
            let l = if link { "l" } else { "" };
            format!("b{l}{} {offset:+}", cond.suffix())
        }
        Instruction::BranchExchange { cond, rm } => format!("bx{} {}", cond.suffix(), reg(rm)),
        Instruction::Undefined(w) => format!(".word {w:#010x}"),
    }
}

fn operand2(op: Operand2) -> String {
    match op {
        Operand2::Immediate { .. } => {
            let value = op.immediate_value().unwrap_or_default();
            format!("#{value:#x}")
        }
        Operand2::Register { rm, amount: 0, shift: ShiftKind::Lsl } => reg(rm).to_string(),
        Operand2::Register { rm, amount: 0, shift: ShiftKind::Ror } => format!("{}, rrx", reg(rm)),
        Operand2::Register { rm, amount: 0, shift } => {
            format!("{}, {} #32", reg(rm), shift.mnemonic())
        }
        Operand2::Register { rm, amount, shift } => {
            format!("{}, {} #{amount}", reg(rm), shift.mnemonic())
        }
    }
}

fn data_proc(dp: &DataProc) -> String {
    let s = if dp.set_flags && !dp.op.is_compare() {
        "s"
    } else {
        ""
    };
    let name = format!("{}{}{s}", dp.op.mnemonic(), dp.cond.suffix());
    let op2 = operand2(dp.operand);
    if dp.op.is_compare() {
        format!("{name} {}, {op2}", reg(dp.rn))
    } else if dp.op.is_move() {
        format!("{name} {}, {op2}", reg(dp.rd))
    } else {
        format!("{name} {}, {}, {op2}", reg(dp.rd), reg(dp.rn))
    }
}

fn transfer(t: &Transfer) -> String {
    let base = if t.load { "ldr" } else { "str" };
    let b = if t.byte { "b" } else { "" };
    let sign = if t.up { "" } else { "-" };
    let name = format!("{base}{}{b}", t.cond.suffix());
    let rn = reg(t.rn);
    let rd = reg(t.rd);
    match (t.pre_index, t.offset) {
        (true, 0) if !t.writeback => format!("{name} {rd}, [{rn}]"),
        (true, off) => {
            let bang = if t.writeback { "!" } else { "" };
            format!("{name} {rd}, [{rn}, #{sign}{off}]{bang}")
        }
        (false, off) => format!("{name} {rd}, [{rn}], #{sign}{off}"),
    }
}
