//! Condition codes (instruction bits 31-28).

use crate::core::arch::Nzcv;

/// A32 condition code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    /// Equal (Z).
    Eq,
    /// Not equal (!Z).
    Ne,
    /// Carry set / unsigned higher or same.
    Cs,
    /// Carry clear / unsigned lower.
    Cc,
    /// Negative.
    Mi,
    /// Positive or zero.
    Pl,
    /// Overflow.
    Vs,
    /// No overflow.
    Vc,
    /// Unsigned higher.
    Hi,
    /// Unsigned lower or same.
    Ls,
    /// Signed greater or equal.
    Ge,
    /// Signed less than.
    Lt,
    /// Signed greater than.
    Gt,
    /// Signed less or equal.
    Le,
    /// Always.
    Al,
    /// Never (reserved encoding).
    Nv,
}

/// Suffixes in encoding order.
const SUFFIXES: [&str; 16] = [
    "eq", "ne", "cs", "cc", "mi", "pl", "vs", "vc", "hi", "ls", "ge", "lt", "gt", "le", "al", "nv",
];

/// Conditions in encoding order.
const ALL: [Condition; 16] = [
    Condition::Eq,
    Condition::Ne,
    Condition::Cs,
    Condition::Cc,
    Condition::Mi,
    Condition::Pl,
    Condition::Vs,
    Condition::Vc,
    Condition::Hi,
    Condition::Ls,
    Condition::Ge,
    Condition::Lt,
    Condition::Gt,
    Condition::Le,
    Condition::Al,
    Condition::Nv,
];

impl Condition {
    /// Decodes the 4-bit condition field.
    pub const fn from_bits(bits: u32) -> Self {
        ALL[(bits & 0xF) as usize]
    }

    /// 4-bit encoding.
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Parses an assembler suffix (`"eq"`, `"al"`, ...); `hs`/`lo` are accepted as `cs`/`cc`.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "hs" => Some(Self::Cs),
            "lo" => Some(Self::Cc),
            _ => SUFFIXES
                .iter()
                .position(|s| *s == suffix)
                .map(|i| ALL[i]),
        }
    }

    /// Assembler suffix; empty for `Al`.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Al => "",
            _ => SUFFIXES[self as usize],
        }
    }

    /// Evaluates the condition against the flags.
    pub const fn passes(self, f: Nzcv) -> bool {
        match self {
            Self::Eq => f.z,
            Self::Ne => !f.z,
            Self::Cs => f.c,
            Self::Cc => !f.c,
            Self::Mi => f.n,
            Self::Pl => !f.n,
            Self::Vs => f.v,
            Self::Vc => !f.v,
            Self::Hi => f.c && !f.z,
            Self::Ls => !f.c || f.z,
            Self::Ge => f.n == f.v,
            Self::Lt => f.n != f.v,
            Self::Gt => !f.z && f.n == f.v,
            Self::Le => f.z || f.n != f.v,
            Self::Al => true,
            Self::Nv => false,
        }
    }
}
