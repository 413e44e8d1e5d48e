//! Two-pass A32 line assembler.
//!
//! Accepts the bootstrap-program dialect:
//! 1. **Comments:** `@` to end of line.
//! 2. **Directives:** lines starting with `.` are skipped.
//! 3. **Labels:** `name:` on its own line or before an instruction.
//! 4. **Mnemonics:** data processing (with condition and `s` suffixes), `ldr`/`str`
//!    (with `b`), `b`, `bl`, `bx`, and `nop`.
//!
//! The first pass assigns an instruction index to every label; the second encodes.
//! Branch offsets are `target - index - 2` words, matching the PC+8 read-out.

use std::collections::HashMap;

use tracing::debug;

use super::cond::Condition;
use super::instruction::{
    DataProc, DpOp, Instruction, Operand2, ShiftKind, Transfer, encode, encode_immediate,
};
use crate::common::error::{AsmError, AsmErrorKind};

/// Largest `ldr`/`str` immediate offset magnitude.
const MAX_OFFSET: u64 = 0xFFF;
/// Signed range of the 24-bit branch word offset.
const BRANCH_MIN: i64 = -(1 << 23);
const BRANCH_MAX: i64 = (1 << 23) - 1;

/// Assembles `source` into instruction words.
///
/// # Errors
///
/// Returns the first `AsmError` encountered, tagged with its 1-based line number.
pub fn assemble(source: &str) -> Result<Vec<u32>, AsmError> {
    let lines: Vec<(usize, String)> = source
        .lines()
        .enumerate()
        .map(|(i, raw)| (i + 1, clean(raw)))
        .collect();

    let mut labels = HashMap::new();
    let mut index = 0_usize;
    for (line, text) in &lines {
        let (label, body) = split_label(text);
        if let Some(name) = label {
            if labels.insert(name.to_string(), index).is_some() {
                return Err(AsmError {
                    line: *line,
                    kind: AsmErrorKind::DuplicateLabel(name.to_string()),
                });
            }
        }
        if is_instruction(body) {
            index += 1;
        }
    }

    let mut words = Vec::with_capacity(index);
    for (line, text) in &lines {
        let (_, body) = split_label(text);
        if !is_instruction(body) {
            continue;
        }
        let word = assemble_line(body, words.len(), &labels).map_err(|kind| AsmError {
            line: *line,
            kind,
        })?;
        debug!(line, index = words.len(), word, "assembled");
        words.push(word);
    }
    Ok(words)
}

/// Lower-cases and strips comments and surrounding whitespace.
fn clean(raw: &str) -> String {
    let code = raw.split('@').next().unwrap_or_default();
    code.trim().to_ascii_lowercase()
}

fn split_label(text: &str) -> (Option<&str>, &str) {
    match text.split_once(':') {
        Some((name, rest)) if is_label_name(name.trim()) => (Some(name.trim()), rest.trim()),
        _ => (None, text),
    }
}

fn is_label_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '$')
        && !name.starts_with(|c: char| c.is_ascii_digit())
}

fn is_instruction(body: &str) -> bool {
    !body.is_empty() && !body.starts_with('.')
}

fn assemble_line(
    body: &str,
    index: usize,
    labels: &HashMap<String, usize>,
) -> Result<u32, AsmErrorKind> {
    let (mnemonic, rest) = body
        .split_once(char::is_whitespace)
        .map_or((body, ""), |(m, r)| (m, r.trim()));
    let operands = split_operands(rest);

    let inst = if mnemonic == "nop" {
        expect_count(mnemonic, &operands, 0)?;
        Instruction::DataProc(DataProc {
            cond: Condition::Al,
            op: DpOp::Mov,
            set_flags: false,
            rn: 0,
            rd: 0,
            operand: Operand2::register(0),
        })
    } else if let Some(cond) = mnemonic.strip_prefix("bx").and_then(parse_cond) {
        expect_count(mnemonic, &operands, 1)?;
        Instruction::BranchExchange {
            cond,
            rm: parse_reg(&operands[0])?,
        }
    } else if let Some((link, cond)) = parse_branch(mnemonic) {
        expect_count(mnemonic, &operands, 1)?;
        let target = labels
            .get(operands[0].as_str())
            .ok_or_else(|| AsmErrorKind::UndefinedLabel(operands[0].clone()))?;
        let offset = i64::try_from(*target).unwrap_or(i64::MAX)
            - i64::try_from(index).unwrap_or(i64::MAX)
            - 2;
        if !(BRANCH_MIN..=BRANCH_MAX).contains(&offset) {
            return Err(AsmErrorKind::BranchRange(offset));
        }
        Instruction::Branch {
            cond,
            link,
            offset: i32::try_from(offset).map_err(|_| AsmErrorKind::BranchRange(offset))?,
        }
    } else if let Some((load, byte, cond)) = parse_transfer(mnemonic) {
        transfer(mnemonic, load, byte, cond, rest)?
    } else if let Some((op, set_flags, cond)) = parse_data_proc(mnemonic) {
        data_proc(mnemonic, op, set_flags, cond, &operands)?
    } else {
        return Err(AsmErrorKind::UnknownMnemonic(mnemonic.to_string()));
    };
    Ok(encode(&inst))
}

/// Splits on commas outside `[...]`.
fn split_operands(rest: &str) -> Vec<String> {
    if rest.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut depth = 0_u32;
    let mut current = String::new();
    for c in rest.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    out.push(current.trim().to_string());
    out
}

fn expect_count(mnemonic: &str, operands: &[String], expected: usize) -> Result<(), AsmErrorKind> {
    if operands.len() == expected {
        Ok(())
    } else {
        Err(AsmErrorKind::OperandCount {
            mnemonic: mnemonic.to_string(),
            expected,
            found: operands.len(),
        })
    }
}

/// Empty suffix means `al`.
fn parse_cond(suffix: &str) -> Option<Condition> {
    if suffix.is_empty() {
        Some(Condition::Al)
    } else {
        Condition::from_suffix(suffix)
    }
}

/// `b{cond}` is tried before `bl{cond}` so that `bls`, `blt` and `ble` stay conditional branches.
fn parse_branch(mnemonic: &str) -> Option<(bool, Condition)> {
    let rest = mnemonic.strip_prefix('b')?;
    if let Some(cond) = parse_cond(rest) {
        return Some((false, cond));
    }
    rest.strip_prefix('l')
        .and_then(parse_cond)
        .map(|cond| (true, cond))
}

/// `ldr`/`str`, then condition and `b` in either order.
fn parse_transfer(mnemonic: &str) -> Option<(bool, bool, Condition)> {
    let (load, rest) = if let Some(rest) = mnemonic.strip_prefix("ldr") {
        (true, rest)
    } else {
        (false, mnemonic.strip_prefix("str")?)
    };
    if let Some(cond) = parse_cond(rest) {
        return Some((load, false, cond));
    }
    if let Some(cond) = rest.strip_prefix('b').and_then(parse_cond) {
        return Some((load, true, cond));
    }
    rest.strip_suffix('b')
        .and_then(parse_cond)
        .map(|cond| (load, true, cond))
}

/// Base mnemonic, then condition and `s` in either order.
fn parse_data_proc(mnemonic: &str) -> Option<(DpOp, bool, Condition)> {
    let base = mnemonic.get(..3)?;
    let rest = mnemonic.get(3..)?;
    let op = DpOp::from_mnemonic(base)?;
    if let Some(cond) = parse_cond(rest) {
        return Some((op, false, cond));
    }
    if let Some(cond) = rest.strip_prefix('s').and_then(parse_cond) {
        return Some((op, true, cond));
    }
    rest.strip_suffix('s')
        .and_then(parse_cond)
        .map(|cond| (op, true, cond))
}

fn parse_reg(token: &str) -> Result<u8, AsmErrorKind> {
    let token = token.trim();
    match token {
        "sp" => Ok(13),
        "lr" => Ok(14),
        "pc" => Ok(15),
        _ => token
            .strip_prefix('r')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| *n < 16)
            .ok_or_else(|| AsmErrorKind::BadRegister(token.to_string())),
    }
}

fn parse_imm(token: &str) -> Result<i64, AsmErrorKind> {
    let bad = || AsmErrorKind::BadOperand(token.to_string());
    let body = token.trim().strip_prefix('#').ok_or_else(bad)?;
    let (negative, digits) = body
        .strip_prefix('-')
        .map_or((false, body), |d| (true, d));
    let (radix, digits) = digits
        .strip_prefix("0x")
        .map_or((10, digits), |hex| (16, hex));
    // `from_str_radix` takes its own sign; only the one after `#` is allowed.
    if digits.starts_with(['+', '-']) {
        return Err(bad());
    }
    let magnitude = i64::from_str_radix(digits, radix).map_err(|_| bad())?;
    if negative {
        magnitude.checked_neg().ok_or_else(bad)
    } else {
        Ok(magnitude)
    }
}

fn data_proc(
    mnemonic: &str,
    op: DpOp,
    set_flags: bool,
    cond: Condition,
    operands: &[String],
) -> Result<Instruction, AsmErrorKind> {
    let fixed = if op.is_compare() || op.is_move() { 1 } else { 2 };
    if operands.len() != fixed + 1 && operands.len() != fixed + 2 {
        return Err(AsmErrorKind::OperandCount {
            mnemonic: mnemonic.to_string(),
            expected: fixed + 1,
            found: operands.len(),
        });
    }
    let (rd, rn) = if op.is_compare() {
        (0, parse_reg(&operands[0])?)
    } else if op.is_move() {
        (parse_reg(&operands[0])?, 0)
    } else {
        (parse_reg(&operands[0])?, parse_reg(&operands[1])?)
    };
    let op2 = &operands[fixed];
    let shift = operands.get(fixed + 1).map(String::as_str);

    let (op, operand) = if op2.starts_with('#') {
        if shift.is_some() {
            return Err(AsmErrorKind::BadOperand(op2.clone()));
        }
        immediate_operand(op, parse_imm(op2)?)?
    } else {
        (op, shifted_register(op2, shift)?)
    };
    Ok(Instruction::DataProc(DataProc {
        cond,
        op,
        set_flags: set_flags || op.is_compare(),
        rn,
        rd,
        operand,
    }))
}

/// Encodes an immediate, substituting the complementary opcode when only its
/// negated or inverted form fits (`mov`/`mvn`, `add`/`sub`, `cmp`/`cmn`, `and`/`bic`).
fn immediate_operand(op: DpOp, value: i64) -> Result<(DpOp, Operand2), AsmErrorKind> {
    // Negative immediates keep their two's complement bits.
    let bits = value as u32;
    if !(i64::from(i32::MIN)..=i64::from(u32::MAX)).contains(&value) {
        return Err(AsmErrorKind::UnencodableImmediate(bits));
    }
    if let Some(operand) = encode_immediate(bits) {
        return Ok((op, operand));
    }
    let alternative = match op {
        DpOp::Mov => Some((DpOp::Mvn, !bits)),
        DpOp::Mvn => Some((DpOp::Mov, !bits)),
        DpOp::And => Some((DpOp::Bic, !bits)),
        DpOp::Bic => Some((DpOp::And, !bits)),
        DpOp::Add => Some((DpOp::Sub, bits.wrapping_neg())),
        DpOp::Sub => Some((DpOp::Add, bits.wrapping_neg())),
        DpOp::Cmp => Some((DpOp::Cmn, bits.wrapping_neg())),
        DpOp::Cmn => Some((DpOp::Cmp, bits.wrapping_neg())),
        _ => None,
    };
    alternative
        .and_then(|(alt, v)| encode_immediate(v).map(|operand| (alt, operand)))
        .ok_or(AsmErrorKind::UnencodableImmediate(bits))
}

fn shifted_register(reg: &str, shift: Option<&str>) -> Result<Operand2, AsmErrorKind> {
    let rm = parse_reg(reg)?;
    let Some(text) = shift else {
        return Ok(Operand2::register(rm));
    };
    let bad = || AsmErrorKind::BadOperand(text.to_string());
    if text == "rrx" {
        return Ok(Operand2::Register {
            rm,
            shift: ShiftKind::Ror,
            amount: 0,
        });
    }
    let (name, amount) = text.split_once(char::is_whitespace).ok_or_else(bad)?;
    let kind = ShiftKind::from_mnemonic(name).ok_or_else(bad)?;
    let amount = parse_imm(amount.trim())?;
    let encoded = match kind {
        ShiftKind::Lsl if (0..=31).contains(&amount) => amount,
        ShiftKind::Lsr | ShiftKind::Asr if (1..=32).contains(&amount) => amount % 32,
        ShiftKind::Ror if (1..=31).contains(&amount) => amount,
        _ => return Err(bad()),
    };
    Ok(Operand2::Register {
        rm,
        shift: kind,
        amount: u8::try_from(encoded).map_err(|_| bad())?,
    })
}

/// `rd, [rn]`, `rd, [rn, #off]`, `rd, [rn, #off]!`, `rd, [rn], #off`.
fn transfer(
    mnemonic: &str,
    load: bool,
    byte: bool,
    cond: Condition,
    rest: &str,
) -> Result<Instruction, AsmErrorKind> {
    let operands = split_operands(rest);
    if operands.len() != 2 && operands.len() != 3 {
        return Err(AsmErrorKind::OperandCount {
            mnemonic: mnemonic.to_string(),
            expected: 2,
            found: operands.len(),
        });
    }
    let rd = parse_reg(&operands[0])?;
    let address = operands[1].as_str();
    let bad = || AsmErrorKind::BadOperand(address.to_string());

    let (inner, writeback) = match address.strip_suffix('!') {
        Some(a) => (a.trim(), true),
        None => (address, false),
    };
    let inner = inner
        .strip_prefix('[')
        .and_then(|a| a.strip_suffix(']'))
        .ok_or_else(bad)?;
    let parts = split_operands(inner);
    let rn = parse_reg(parts.first().ok_or_else(bad)?)?;

    let (pre_index, offset) = match (parts.len(), operands.get(2)) {
        (1, None) => (true, 0),
        (2, None) => (true, parse_imm(&parts[1])?),
        (1, Some(post)) if !writeback => (false, parse_imm(post)?),
        _ => return Err(bad()),
    };
    if offset.unsigned_abs() > MAX_OFFSET {
        return Err(AsmErrorKind::OffsetRange(offset));
    }
    Ok(Instruction::Transfer(Transfer {
        cond,
        load,
        byte,
        pre_index,
        up: offset >= 0,
        writeback,
        rn,
        rd,
        offset: u16::try_from(offset.unsigned_abs())
            .map_err(|_| AsmErrorKind::OffsetRange(offset))?,
    }))
}
