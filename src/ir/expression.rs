//! Expression nodes (32 variants)

use serde::{Deserialize, Serialize};

use super::declaration::Parameter;
use super::literal::LiteralValue;
use super::location::NodeMeta;
use super::operators::{BinaryOp, PostfixOp, UnaryOp};
use super::statement::Statement;
use super::types::TypeRef;
use crate::encoding::tags::expr as tag;

/// Expression with identity, location and resolved type.
///
/// The `meta`/`result_type` prefix is shared by every variant and is encoded
/// before the variant-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    pub meta: NodeMeta,
    /// Static type inferred by the analyzer, if resolved
    pub result_type: Option<TypeRef>,
    pub kind: ExprKind,
}

impl Expression {
    /// Create an untyped expression
    pub fn new(meta: NodeMeta, kind: ExprKind) -> Self {
        Self {
            meta,
            result_type: None,
            kind,
        }
    }

    /// Attach a resolved type
    #[must_use]
    pub fn typed(mut self, ty: TypeRef) -> Self {
        self.result_type = Some(ty);
        self
    }

    /// Shorthand for a boxed child
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }
}

/// Expression variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum ExprKind {
    // === Atoms ===
    /// `42`, `'text'`, `null`
    Literal { value: LiteralValue },
    /// `'Hello $name'`; parts alternate between text literals and expressions
    StringInterpolation { parts: Vec<Expression> },
    /// Reference to a variable, function or type `x`
    Identifier { name: String },
    /// `this`
    This,
    /// `super`
    Super,

    // === Operators ===
    /// `a + b`
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `-x`, `!x`, `++x`
    Unary { op: UnaryOp, operand: Box<Expression> },
    /// `x++`, `x--`
    Postfix { op: PostfixOp, operand: Box<Expression> },

    // === Calls ===
    /// Call of an arbitrary callee `f(x)`
    Call {
        callee: Box<Expression>,
        args: Vec<Argument>,
    },
    /// `target.method<T>(args)` or `target?.method(args)`; no target for implicit `this`
    MethodCall {
        target: Option<Box<Expression>>,
        method: String,
        type_args: Vec<TypeRef>,
        args: Vec<Argument>,
        null_aware: bool,
    },
    /// `Point(1, 2)`, `const Point.origin()`
    ConstructorCall {
        constructed_type: TypeRef,
        constructor: Option<String>,
        args: Vec<Argument>,
        is_const: bool,
    },

    // === Access ===
    /// `target.property` or `target?.property`
    PropertyAccess {
        target: Box<Expression>,
        property: String,
        null_aware: bool,
    },
    /// `target[index]`
    Index {
        target: Box<Expression>,
        index: Box<Expression>,
    },

    // === Collections ===
    /// `[a, b]`
    ListLiteral {
        element_type: Option<TypeRef>,
        elements: Vec<Expression>,
        is_const: bool,
    },
    /// `{a, b}`
    SetLiteral {
        element_type: Option<TypeRef>,
        elements: Vec<Expression>,
        is_const: bool,
    },
    /// `{k: v}`
    MapLiteral {
        key_type: Option<TypeRef>,
        value_type: Option<TypeRef>,
        entries: Vec<MapEntry>,
        is_const: bool,
    },
    /// `(1, name: 'x')`
    RecordLiteral { fields: Vec<Argument> },
    /// `...xs` or `...?xs` inside a collection literal
    Spread {
        operand: Box<Expression>,
        null_aware: bool,
    },
    /// `if (c) a else b` inside a collection literal
    CollectionIf {
        condition: Box<Expression>,
        then_element: Box<Expression>,
        else_element: Option<Box<Expression>>,
    },
    /// `for (x in xs) f(x)` inside a collection literal
    CollectionFor {
        variable: String,
        iterable: Box<Expression>,
        element: Box<Expression>,
    },

    // === Control ===
    /// `c ? a : b`
    Conditional {
        condition: Box<Expression>,
        then_expr: Box<Expression>,
        else_expr: Box<Expression>,
    },
    /// `(x) => x + 1` or `(x) { ... }`
    Lambda {
        params: Vec<Parameter>,
        body: LambdaBody,
        is_async: bool,
    },
    /// `await f()`
    Await { operand: Box<Expression> },
    /// `throw e`
    Throw { exception: Box<Expression> },
    /// `obj..a()..b = 1`; each section is evaluated against `target`
    Cascade {
        target: Box<Expression>,
        sections: Vec<Expression>,
    },

    // === Types ===
    /// `x as T`
    Cast {
        operand: Box<Expression>,
        target_type: TypeRef,
    },
    /// `x is T` / `x is! T`
    TypeCheck {
        operand: Box<Expression>,
        target_type: TypeRef,
        negated: bool,
    },
    /// A type used as a value `int`
    TypeLiteral { literal_type: TypeRef },

    // === Assignment ===
    /// `a = b`
    Assignment {
        target: Box<Expression>,
        value: Box<Expression>,
    },
    /// `a += b`, `a ??= b`
    CompoundAssignment {
        op: BinaryOp,
        target: Box<Expression>,
        value: Box<Expression>,
    },

    // === Wrappers ===
    /// `x!`
    NullAssert { operand: Box<Expression> },
    /// `(x)`
    Parenthesized { inner: Box<Expression> },
}

impl ExprKind {
    /// Tag byte identifying this variant in the binary format
    pub const fn tag(&self) -> u8 {
        match self {
            Self::Literal { .. } => tag::LITERAL,
            Self::StringInterpolation { .. } => tag::STRING_INTERPOLATION,
            Self::Identifier { .. } => tag::IDENTIFIER,
            Self::This => tag::THIS,
            Self::Super => tag::SUPER,
            Self::Binary { .. } => tag::BINARY,
            Self::Unary { .. } => tag::UNARY,
            Self::Postfix { .. } => tag::POSTFIX,
            Self::Call { .. } => tag::CALL,
            Self::MethodCall { .. } => tag::METHOD_CALL,
            Self::ConstructorCall { .. } => tag::CONSTRUCTOR_CALL,
            Self::PropertyAccess { .. } => tag::PROPERTY_ACCESS,
            Self::Index { .. } => tag::INDEX,
            Self::ListLiteral { .. } => tag::LIST_LITERAL,
            Self::SetLiteral { .. } => tag::SET_LITERAL,
            Self::MapLiteral { .. } => tag::MAP_LITERAL,
            Self::RecordLiteral { .. } => tag::RECORD_LITERAL,
            Self::Spread { .. } => tag::SPREAD,
            Self::CollectionIf { .. } => tag::COLLECTION_IF,
            Self::CollectionFor { .. } => tag::COLLECTION_FOR,
            Self::Conditional { .. } => tag::CONDITIONAL,
            Self::Lambda { .. } => tag::LAMBDA,
            Self::Await { .. } => tag::AWAIT,
            Self::Throw { .. } => tag::THROW,
            Self::Cascade { .. } => tag::CASCADE,
            Self::Cast { .. } => tag::CAST,
            Self::TypeCheck { .. } => tag::TYPE_CHECK,
            Self::TypeLiteral { .. } => tag::TYPE_LITERAL,
            Self::Assignment { .. } => tag::ASSIGNMENT,
            Self::CompoundAssignment { .. } => tag::COMPOUND_ASSIGNMENT,
            Self::NullAssert { .. } => tag::NULL_ASSERT,
            Self::Parenthesized { .. } => tag::PARENTHESIZED,
        }
    }

    /// Variant name, matching the JSON `tag` field
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Literal { .. } => "literal",
            Self::StringInterpolation { .. } => "string_interpolation",
            Self::Identifier { .. } => "identifier",
            Self::This => "this",
            Self::Super => "super",
            Self::Binary { .. } => "binary",
            Self::Unary { .. } => "unary",
            Self::Postfix { .. } => "postfix",
            Self::Call { .. } => "call",
            Self::MethodCall { .. } => "method_call",
            Self::ConstructorCall { .. } => "constructor_call",
            Self::PropertyAccess { .. } => "property_access",
            Self::Index { .. } => "index",
            Self::ListLiteral { .. } => "list_literal",
            Self::SetLiteral { .. } => "set_literal",
            Self::MapLiteral { .. } => "map_literal",
            Self::RecordLiteral { .. } => "record_literal",
            Self::Spread { .. } => "spread",
            Self::CollectionIf { .. } => "collection_if",
            Self::CollectionFor { .. } => "collection_for",
            Self::Conditional { .. } => "conditional",
            Self::Lambda { .. } => "lambda",
            Self::Await { .. } => "await",
            Self::Throw { .. } => "throw",
            Self::Cascade { .. } => "cascade",
            Self::Cast { .. } => "cast",
            Self::TypeCheck { .. } => "type_check",
            Self::TypeLiteral { .. } => "type_literal",
            Self::Assignment { .. } => "assignment",
            Self::CompoundAssignment { .. } => "compound_assignment",
            Self::NullAssert { .. } => "null_assert",
            Self::Parenthesized { .. } => "parenthesized",
        }
    }
}

/// Call argument; `name` is set for named arguments `f(x: 1)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: Option<String>,
    pub value: Expression,
}

impl Argument {
    /// Positional argument
    pub fn positional(value: Expression) -> Self {
        Self { name: None, value }
    }

    /// Named argument
    pub fn named(name: impl Into<String>, value: Expression) -> Self {
        Self {
            name: Some(name.into()),
            value,
        }
    }
}

/// Key/value pair of a map literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: Expression,
    pub value: Expression,
}

/// Lambda body: `=> expr` or a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LambdaBody {
    Expression(Box<Expression>),
    Block(Box<Statement>),
}

impl LambdaBody {
    /// Inner discriminant written after the lambda parameters
    pub const fn discriminant(&self) -> u8 {
        match self {
            Self::Expression(_) => 0,
            Self::Block(_) => 1,
        }
    }
}
