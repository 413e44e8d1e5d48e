//! A32 Instruction Encoding.
//!
//! This module defines the decoded form of the supported instruction subset and the
//! two directions between it and the raw 32-bit word. It provides the following:
//! 1. **Decoding:** `decode` classifies a word as data processing, single data transfer,
//!    branch, branch-exchange, or `Undefined`.
//! 2. **Encoding:** `encode` is the exact inverse for every defined form.
//! 3. **Immediates:** `encode_immediate` finds the rotated 8-bit form of a constant.

use super::cond::Condition;

/// Bit 25: immediate second operand (data processing) / register offset (transfers).
const I_BIT: u32 = 1 << 25;
/// Bit 24: pre-index (transfers) / link (branches).
const P_BIT: u32 = 1 << 24;
/// Bit 23: add offset.
const U_BIT: u32 = 1 << 23;
/// Bit 22: byte transfer.
const B_BIT: u32 = 1 << 22;
/// Bit 21: writeback.
const W_BIT: u32 = 1 << 21;
/// Bit 20: load (transfers) / set flags (data processing).
const L_BIT: u32 = 1 << 20;

/// Fixed pattern of `BX Rm` with the condition and register cleared.
const BX_PATTERN: u32 = 0x012F_FF10;
/// Mask selecting the fixed bits of `BX`.
const BX_MASK: u32 = 0x0FFF_FFF0;

/// Data-processing opcode (bits 24-21).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DpOp {
    /// Rd = Rn AND Op2.
    And,
    /// Rd = Rn EOR Op2.
    Eor,
    /// Rd = Rn - Op2.
    Sub,
    /// Rd = Op2 - Rn.
    Rsb,
    /// Rd = Rn + Op2.
    Add,
    /// Rd = Rn + Op2 + C.
    Adc,
    /// Rd = Rn - Op2 - !C.
    Sbc,
    /// Rd = Op2 - Rn - !C.
    Rsc,
    /// Flags from Rn AND Op2.
    Tst,
    /// Flags from Rn EOR Op2.
    Teq,
    /// Flags from Rn - Op2.
    Cmp,
    /// Flags from Rn + Op2.
    Cmn,
    /// Rd = Rn OR Op2.
    Orr,
    /// Rd = Op2.
    Mov,
    /// Rd = Rn AND NOT Op2.
    Bic,
    /// Rd = NOT Op2.
    Mvn,
}

const DP_OPS: [DpOp; 16] = [
    DpOp::And,
    DpOp::Eor,
    DpOp::Sub,
    DpOp::Rsb,
    DpOp::Add,
    DpOp::Adc,
    DpOp::Sbc,
    DpOp::Rsc,
    DpOp::Tst,
    DpOp::Teq,
    DpOp::Cmp,
    DpOp::Cmn,
    DpOp::Orr,
    DpOp::Mov,
    DpOp::Bic,
    DpOp::Mvn,
];

const DP_MNEMONICS: [&str; 16] = [
    "and", "eor", "sub", "rsb", "add", "adc", "sbc", "rsc", "tst", "teq", "cmp", "cmn", "orr",
    "mov", "bic", "mvn",
];

impl DpOp {
    /// Decodes the 4-bit opcode field.
    pub const fn from_bits(bits: u32) -> Self {
        DP_OPS[(bits & 0xF) as usize]
    }

    /// 4-bit opcode.
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Lower-case mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        DP_MNEMONICS[self as usize]
    }

    /// Looks an opcode up by mnemonic.
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        DP_MNEMONICS
            .iter()
            .position(|m| *m == name)
            .map(|i| DP_OPS[i])
    }

    /// `TST`, `TEQ`, `CMP`, `CMN`: no destination, flags always set.
    pub const fn is_compare(self) -> bool {
        matches!(self, Self::Tst | Self::Teq | Self::Cmp | Self::Cmn)
    }

    /// `MOV`, `MVN`: no first operand.
    pub const fn is_move(self) -> bool {
        matches!(self, Self::Mov | Self::Mvn)
    }
}

/// Barrel shifter operation (bits 6-5).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftKind {
    /// Logical shift left.
    Lsl,
    /// Logical shift right.
    Lsr,
    /// Arithmetic shift right.
    Asr,
    /// Rotate right (amount 0 encodes RRX).
    Ror,
}

impl ShiftKind {
    const fn from_bits(bits: u32) -> Self {
        match bits & 0x3 {
            0 => Self::Lsl,
            1 => Self::Lsr,
            2 => Self::Asr,
            _ => Self::Ror,
        }
    }

    /// Lower-case mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Lsl => "lsl",
            Self::Lsr => "lsr",
            Self::Asr => "asr",
            Self::Ror => "ror",
        }
    }

    /// Looks a shift up by mnemonic.
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        match name {
            "lsl" | "asl" => Some(Self::Lsl),
            "lsr" => Some(Self::Lsr),
            "asr" => Some(Self::Asr),
            "ror" => Some(Self::Ror),
            _ => None,
        }
    }
}

/// Second operand of a data-processing instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand2 {
    /// `imm8` rotated right by `2 * rotate`.
    Immediate {
        /// Unrotated 8-bit value.
        imm8: u8,
        /// Half the rotation amount (0-15).
        rotate: u8,
    },
    /// Register shifted by a 5-bit immediate.
    Register {
        /// Source register.
        rm: u8,
        /// Shift operation.
        shift: ShiftKind,
        /// Shift amount (0-31).
        amount: u8,
    },
}

impl Operand2 {
    /// Plain register operand, no shift.
    pub const fn register(rm: u8) -> Self {
        Self::Register {
            rm,
            shift: ShiftKind::Lsl,
            amount: 0,
        }
    }

    /// Value of an immediate operand, `None` for registers.
    pub const fn immediate_value(self) -> Option<u32> {
        match self {
            Self::Immediate { imm8, rotate } => Some((imm8 as u32).rotate_right(rotate as u32 * 2)),
            Self::Register { .. } => None,
        }
    }

    const fn bits(self) -> u32 {
        match self {
            Self::Immediate { imm8, rotate } => I_BIT | ((rotate as u32 & 0xF) << 8) | imm8 as u32,
            Self::Register { rm, shift, amount } => {
                ((amount as u32 & 0x1F) << 7) | ((shift as u32) << 5) | (rm as u32 & 0xF)
            }
        }
    }
}

/// Finds the rotated-immediate encoding of `value`, preferring the smallest rotation.
pub const fn encode_immediate(value: u32) -> Option<Operand2> {
    let mut rotate = 0;
    while rotate < 16 {
        let unrotated = value.rotate_left(rotate * 2);
        if unrotated <= 0xFF {
            return Some(Operand2::Immediate {
                imm8: unrotated as u8,
                rotate: rotate as u8,
            });
        }
        rotate += 1;
    }
    None
}

/// Data-processing instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataProc {
    /// Execution condition.
    pub cond: Condition,
    /// Operation.
    pub op: DpOp,
    /// Update NZCV.
    pub set_flags: bool,
    /// First operand register.
    pub rn: u8,
    /// Destination register.
    pub rd: u8,
    /// Second operand.
    pub operand: Operand2,
}

/// Single data transfer (`LDR`, `STR`, `LDRB`, `STRB`) with an immediate offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer {
    /// Execution condition.
    pub cond: Condition,
    /// Load (`true`) or store.
    pub load: bool,
    /// Byte (`true`) or word access.
    pub byte: bool,
    /// Apply the offset before the access.
    pub pre_index: bool,
    /// Add (`true`) or subtract the offset.
    pub up: bool,
    /// Write the computed address back to `rn` (pre-index only).
    pub writeback: bool,
    /// Base register.
    pub rn: u8,
    /// Transfer register.
    pub rd: u8,
    /// 12-bit unsigned offset.
    pub offset: u16,
}

/// A decoded instruction of the supported subset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Data processing.
    DataProc(DataProc),
    /// Load or store.
    Transfer(Transfer),
    /// `B` / `BL`.
    Branch {
        /// Execution condition.
        cond: Condition,
        /// Write the return address to `lr`.
        link: bool,
        /// Signed word offset relative to the instruction address + 8.
        offset: i32,
    },
    /// `BX Rm`.
    BranchExchange {
        /// Execution condition.
        cond: Condition,
        /// Target register.
        rm: u8,
    },
    /// Anything outside the subset.
    Undefined(u32),
}

/// Decodes a 32-bit instruction word.
pub const fn decode(word: u32) -> Instruction {
    let cond = Condition::from_bits(word >> 28);
    let rn = ((word >> 16) & 0xF) as u8;
    let rd = ((word >> 12) & 0xF) as u8;

    if word & BX_MASK == BX_PATTERN {
        return Instruction::BranchExchange {
            cond,
            rm: (word & 0xF) as u8,
        };
    }

    match (word >> 25) & 0x7 {
        0b000 | 0b001 => {
            let op = DpOp::from_bits(word >> 21);
            let set_flags = word & L_BIT != 0;
            // Compare opcodes without S are status-register moves.
            if op.is_compare() && !set_flags {
                return Instruction::Undefined(word);
            }
            let operand = if word & I_BIT != 0 {
                Operand2::Immediate {
                    imm8: (word & 0xFF) as u8,
                    rotate: ((word >> 8) & 0xF) as u8,
                }
            } else {
                // Bit 4 set selects register-shifted-register and multiplies.
                if word & 0x10 != 0 {
                    return Instruction::Undefined(word);
                }
                Operand2::Register {
                    rm: (word & 0xF) as u8,
                    shift: ShiftKind::from_bits(word >> 5),
                    amount: ((word >> 7) & 0x1F) as u8,
                }
            };
            Instruction::DataProc(DataProc {
                cond,
                op,
                set_flags,
                rn,
                rd,
                operand,
            })
        }
        0b010 => {
            let pre_index = word & P_BIT != 0;
            let writeback = word & W_BIT != 0;
            // Post-index with W is the unprivileged (T) form.
            if !pre_index && writeback {
                return Instruction::Undefined(word);
            }
            Instruction::Transfer(Transfer {
                cond,
                load: word & L_BIT != 0,
                byte: word & B_BIT != 0,
                pre_index,
                up: word & U_BIT != 0,
                writeback,
                rn,
                rd,
                offset: (word & 0xFFF) as u16,
            })
        }
        0b101 => Instruction::Branch {
            cond,
            link: word & P_BIT != 0,
            offset: ((word << 8) as i32) >> 8,
        },
        _ => Instruction::Undefined(word),
    }
}

/// Encodes an instruction; `decode(encode(i)) == i` for every defined form.
pub const fn encode(inst: &Instruction) -> u32 {
    match *inst {
        Instruction::DataProc(dp) => {
            let s = if dp.set_flags || dp.op.is_compare() {
                L_BIT
            } else {
                0
            };
            (dp.cond.bits() << 28)
                | (dp.op.bits() << 21)
                | s
                | ((dp.rn as u32 & 0xF) << 16)
                | ((dp.rd as u32 & 0xF) << 12)
                | dp.operand.bits()
        }
        Instruction::Transfer(t) => {
            let mut word = (t.cond.bits() << 28)
                | 0x0400_0000
                | ((t.rn as u32 & 0xF) << 16)
                | ((t.rd as u32 & 0xF) << 12)
                | (t.offset as u32 & 0xFFF);
            if t.pre_index {
                word |= P_BIT;
            }
            if t.up {
                word |= U_BIT;
            }
            if t.byte {
                word |= B_BIT;
            }
            if t.writeback {
                word |= W_BIT;
            }
            if t.load {
                word |= L_BIT;
            }
            word
        }
        Instruction::Branch { cond, link, offset } => {
            let l = if link { P_BIT } else { 0 };
            (cond.bits() << 28) | 0x0A00_0000 | l | (offset as u32 & 0x00FF_FFFF)
        }
        Instruction::BranchExchange { cond, rm } => {
            (cond.bits() << 28) | BX_PATTERN | (rm as u32 & 0xF)
        }
        Instruction::Undefined(word) => word,
    }
}

impl Instruction {
    /// Condition of a defined instruction; `None` for `Undefined`.
    pub const fn condition(&self) -> Option<Condition> {
        match *self {
            Self::DataProc(DataProc { cond, .. })
            | Self::Transfer(Transfer { cond, .. })
            | Self::Branch { cond, .. }
            | Self::BranchExchange { cond, .. } => Some(cond),
            Self::Undefined(_) => None,
        }
    }
}
