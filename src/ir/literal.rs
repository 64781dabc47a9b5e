//! Literal values

use serde::{Deserialize, Serialize};

/// Literal values carried by `ExprKind::Literal`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralValue {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integer literal `42`
    Int(i64),
    /// Floating point literal `3.14`, stored as bits for exact equality
    Double(FloatBits),
    /// String literal without interpolation `'hello'`
    String(String),
}

impl LiteralValue {
    /// Inner discriminant written after the literal node prefix
    pub const fn discriminant(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::Double(_) => 3,
            Self::String(_) => 4,
        }
    }

    /// Double literal from an `f64`
    pub fn double(v: f64) -> Self {
        Self::Double(FloatBits::from_f64(v))
    }
}

/// Float represented as bits for exact equality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FloatBits(pub u64);

impl FloatBits {
    /// Create from f64
    pub fn from_f64(v: f64) -> Self {
        Self(v.to_bits())
    }

    /// Convert to f64
    pub fn to_f64(self) -> f64 {
        f64::from_bits(self.0)
    }
}
