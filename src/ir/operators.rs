//! Operator types
//!
//! Each operator is a `#[repr(u8)]` enum; the discriminant is the encoded byte.

use serde::{Deserialize, Serialize};

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BinaryOp {
    // Arithmetic
    Add = 0,
    Sub = 1,
    Mul = 2,
    Div = 3,
    /// Truncating division `~/`
    IntDiv = 4,
    Rem = 5,
    // Comparison
    Eq = 10,
    Ne = 11,
    Lt = 12,
    Le = 13,
    Gt = 14,
    Ge = 15,
    // Logical
    And = 20,
    Or = 21,
    /// Null coalescing `??`
    IfNull = 22,
    // Bitwise
    BitAnd = 30,
    BitOr = 31,
    BitXor = 32,
    Shl = 33,
    Shr = 34,
    /// Unsigned shift `>>>`
    UShr = 35,
}

impl BinaryOp {
    /// Convert from the encoded byte
    pub fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Add,
            1 => Self::Sub,
            2 => Self::Mul,
            3 => Self::Div,
            4 => Self::IntDiv,
            5 => Self::Rem,
            10 => Self::Eq,
            11 => Self::Ne,
            12 => Self::Lt,
            13 => Self::Le,
            14 => Self::Gt,
            15 => Self::Ge,
            20 => Self::And,
            21 => Self::Or,
            22 => Self::IfNull,
            30 => Self::BitAnd,
            31 => Self::BitOr,
            32 => Self::BitXor,
            33 => Self::Shl,
            34 => Self::Shr,
            35 => Self::UShr,
            _ => return None,
        })
    }

    /// All operators in discriminant order
    pub const ALL: [Self; 21] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::IntDiv,
        Self::Rem,
        Self::Eq,
        Self::Ne,
        Self::Lt,
        Self::Le,
        Self::Gt,
        Self::Ge,
        Self::And,
        Self::Or,
        Self::IfNull,
        Self::BitAnd,
        Self::BitOr,
        Self::BitXor,
        Self::Shl,
        Self::Shr,
        Self::UShr,
    ];
}

/// Prefix unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum UnaryOp {
    /// `-x`
    Neg = 0,
    /// `!x`
    Not = 1,
    /// `~x`
    BitNot = 2,
    /// `++x`
    PreIncrement = 3,
    /// `--x`
    PreDecrement = 4,
}

impl UnaryOp {
    /// Convert from the encoded byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Neg),
            1 => Some(Self::Not),
            2 => Some(Self::BitNot),
            3 => Some(Self::PreIncrement),
            4 => Some(Self::PreDecrement),
            _ => None,
        }
    }
}

/// Postfix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PostfixOp {
    /// `x++`
    Increment = 0,
    /// `x--`
    Decrement = 1,
}

impl PostfixOp {
    /// Convert from the encoded byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Increment),
            1 => Some(Self::Decrement),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_op_roundtrip() {
        for op in BinaryOp::ALL {
            assert_eq!(BinaryOp::from_u8(op as u8), Some(op));
        }
        assert_eq!(BinaryOp::from_u8(6), None);
        assert_eq!(BinaryOp::from_u8(255), None);
    }

    #[test]
    fn test_unary_op_roundtrip() {
        for op in [
            UnaryOp::Neg,
            UnaryOp::Not,
            UnaryOp::BitNot,
            UnaryOp::PreIncrement,
            UnaryOp::PreDecrement,
        ] {
            assert_eq!(UnaryOp::from_u8(op as u8), Some(op));
        }
        assert_eq!(UnaryOp::from_u8(5), None);
    }
}
