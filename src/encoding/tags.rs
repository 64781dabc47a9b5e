//! Node tag table for format version 1
//!
//! Every concrete node variant is identified on the wire by one tag byte.
//! Families occupy disjoint ranges so a decoder reading a tag in the wrong
//! family context fails with `UnknownNodeTag` instead of misreading bytes.
//!
//! ```text
//! family       range        assigned
//! declaration  0x01..=0x1F  0x01..=0x05
//! expression   0x20..=0x7F  0x20..=0x3F
//! statement    0x80..=0xBF  0x80..=0x92
//! (0x00 and 0xC0..=0xFF are never assigned)
//! ```
//!
//! Tags are append-only within a family. Changing or reusing a value
//! requires bumping `FORMAT_VERSION`.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Declaration tags (0x01..=0x1F)
pub mod decl {
    pub const PROGRAM_UNIT: u8 = 0x01;
    pub const CLASS: u8 = 0x02;
    pub const FUNCTION: u8 = 0x03;
    pub const VARIABLE: u8 = 0x04;
    pub const ENUM: u8 = 0x05;
}

/// Expression tags (0x20..=0x7F)
pub mod expr {
    pub const LITERAL: u8 = 0x20;
    pub const STRING_INTERPOLATION: u8 = 0x21;
    pub const IDENTIFIER: u8 = 0x22;
    pub const THIS: u8 = 0x23;
    pub const SUPER: u8 = 0x24;
    pub const BINARY: u8 = 0x25;
    pub const UNARY: u8 = 0x26;
    pub const POSTFIX: u8 = 0x27;
    pub const CALL: u8 = 0x28;
    pub const METHOD_CALL: u8 = 0x29;
    pub const CONSTRUCTOR_CALL: u8 = 0x2A;
    pub const PROPERTY_ACCESS: u8 = 0x2B;
    pub const INDEX: u8 = 0x2C;
    pub const LIST_LITERAL: u8 = 0x2D;
    pub const SET_LITERAL: u8 = 0x2E;
    pub const MAP_LITERAL: u8 = 0x2F;
    pub const RECORD_LITERAL: u8 = 0x30;
    pub const SPREAD: u8 = 0x31;
    pub const COLLECTION_IF: u8 = 0x32;
    pub const COLLECTION_FOR: u8 = 0x33;
    pub const CONDITIONAL: u8 = 0x34;
    pub const LAMBDA: u8 = 0x35;
    pub const AWAIT: u8 = 0x36;
    pub const THROW: u8 = 0x37;
    pub const CASCADE: u8 = 0x38;
    pub const CAST: u8 = 0x39;
    pub const TYPE_CHECK: u8 = 0x3A;
    pub const TYPE_LITERAL: u8 = 0x3B;
    pub const ASSIGNMENT: u8 = 0x3C;
    pub const COMPOUND_ASSIGNMENT: u8 = 0x3D;
    pub const NULL_ASSERT: u8 = 0x3E;
    pub const PARENTHESIZED: u8 = 0x3F;
}

/// Statement tags (0x80..=0xBF)
pub mod stmt {
    pub const BLOCK: u8 = 0x80;
    pub const EXPRESSION: u8 = 0x81;
    pub const LOCAL_VARIABLE: u8 = 0x82;
    pub const LOCAL_FUNCTION: u8 = 0x83;
    pub const IF: u8 = 0x84;
    pub const FOR: u8 = 0x85;
    pub const FOR_IN: u8 = 0x86;
    pub const WHILE: u8 = 0x87;
    pub const DO_WHILE: u8 = 0x88;
    pub const SWITCH: u8 = 0x89;
    pub const TRY: u8 = 0x8A;
    pub const RETURN: u8 = 0x8B;
    pub const BREAK: u8 = 0x8C;
    pub const CONTINUE: u8 = 0x8D;
    pub const RETHROW: u8 = 0x8E;
    pub const YIELD: u8 = 0x8F;
    pub const LABELED: u8 = 0x90;
    pub const ASSERT: u8 = 0x91;
    pub const EMPTY: u8 = 0x92;
}

/// Node family a tag belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeFamily {
    Declaration,
    Expression,
    Statement,
}

impl NodeFamily {
    /// Tag range reserved for this family
    pub const fn range(self) -> RangeInclusive<u8> {
        match self {
            Self::Declaration => 0x01..=0x1F,
            Self::Expression => 0x20..=0x7F,
            Self::Statement => 0x80..=0xBF,
        }
    }

    /// Family whose range contains `tag`
    pub fn of_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|family| family.range().contains(&tag))
    }

    /// Check if `tag` falls in this family's range
    pub fn contains(self, tag: u8) -> bool {
        self.range().contains(&tag)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Declaration => "declaration",
            Self::Expression => "expression",
            Self::Statement => "statement",
        }
    }

    pub const ALL: [Self; 3] = [Self::Declaration, Self::Expression, Self::Statement];
}

impl fmt::Display for NodeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every assigned tag with its family, in table order
pub const TAG_TABLE: &[(u8, NodeFamily, &str)] = &[
    (decl::PROGRAM_UNIT, NodeFamily::Declaration, "program_unit"),
    (decl::CLASS, NodeFamily::Declaration, "class"),
    (decl::FUNCTION, NodeFamily::Declaration, "function"),
    (decl::VARIABLE, NodeFamily::Declaration, "variable"),
    (decl::ENUM, NodeFamily::Declaration, "enum"),
    (expr::LITERAL, NodeFamily::Expression, "literal"),
    (expr::STRING_INTERPOLATION, NodeFamily::Expression, "string_interpolation"),
    (expr::IDENTIFIER, NodeFamily::Expression, "identifier"),
    (expr::THIS, NodeFamily::Expression, "this"),
    (expr::SUPER, NodeFamily::Expression, "super"),
    (expr::BINARY, NodeFamily::Expression, "binary"),
    (expr::UNARY, NodeFamily::Expression, "unary"),
    (expr::POSTFIX, NodeFamily::Expression, "postfix"),
    (expr::CALL, NodeFamily::Expression, "call"),
    (expr::METHOD_CALL, NodeFamily::Expression, "method_call"),
    (expr::CONSTRUCTOR_CALL, NodeFamily::Expression, "constructor_call"),
    (expr::PROPERTY_ACCESS, NodeFamily::Expression, "property_access"),
    (expr::INDEX, NodeFamily::Expression, "index"),
    (expr::LIST_LITERAL, NodeFamily::Expression, "list_literal"),
    (expr::SET_LITERAL, NodeFamily::Expression, "set_literal"),
    (expr::MAP_LITERAL, NodeFamily::Expression, "map_literal"),
    (expr::RECORD_LITERAL, NodeFamily::Expression, "record_literal"),
    (expr::SPREAD, NodeFamily::Expression, "spread"),
    (expr::COLLECTION_IF, NodeFamily::Expression, "collection_if"),
    (expr::COLLECTION_FOR, NodeFamily::Expression, "collection_for"),
    (expr::CONDITIONAL, NodeFamily::Expression, "conditional"),
    (expr::LAMBDA, NodeFamily::Expression, "lambda"),
    (expr::AWAIT, NodeFamily::Expression, "await"),
    (expr::THROW, NodeFamily::Expression, "throw"),
    (expr::CASCADE, NodeFamily::Expression, "cascade"),
    (expr::CAST, NodeFamily::Expression, "cast"),
    (expr::TYPE_CHECK, NodeFamily::Expression, "type_check"),
    (expr::TYPE_LITERAL, NodeFamily::Expression, "type_literal"),
    (expr::ASSIGNMENT, NodeFamily::Expression, "assignment"),
    (expr::COMPOUND_ASSIGNMENT, NodeFamily::Expression, "compound_assignment"),
    (expr::NULL_ASSERT, NodeFamily::Expression, "null_assert"),
    (expr::PARENTHESIZED, NodeFamily::Expression, "parenthesized"),
    (stmt::BLOCK, NodeFamily::Statement, "block"),
    (stmt::EXPRESSION, NodeFamily::Statement, "expression"),
    (stmt::LOCAL_VARIABLE, NodeFamily::Statement, "local_variable"),
    (stmt::LOCAL_FUNCTION, NodeFamily::Statement, "local_function"),
    (stmt::IF, NodeFamily::Statement, "if"),
    (stmt::FOR, NodeFamily::Statement, "for"),
    (stmt::FOR_IN, NodeFamily::Statement, "for_in"),
    (stmt::WHILE, NodeFamily::Statement, "while"),
    (stmt::DO_WHILE, NodeFamily::Statement, "do_while"),
    (stmt::SWITCH, NodeFamily::Statement, "switch"),
    (stmt::TRY, NodeFamily::Statement, "try"),
    (stmt::RETURN, NodeFamily::Statement, "return"),
    (stmt::BREAK, NodeFamily::Statement, "break"),
    (stmt::CONTINUE, NodeFamily::Statement, "continue"),
    (stmt::RETHROW, NodeFamily::Statement, "rethrow"),
    (stmt::YIELD, NodeFamily::Statement, "yield"),
    (stmt::LABELED, NodeFamily::Statement, "labeled"),
    (stmt::ASSERT, NodeFamily::Statement, "assert"),
    (stmt::EMPTY, NodeFamily::Statement, "empty"),
];

/// Variant name for a tag, if assigned
pub fn tag_name(tag: u8) -> Option<&'static str> {
    TAG_TABLE
        .iter()
        .find(|(t, _, _)| *t == tag)
        .map(|(_, _, name)| *name)
}
