//! Declaration nodes
//!
//! Program units, class-like types, functions, variables and enums. Classes
//! and enums nest further declarations as members.

use serde::{Deserialize, Serialize};

use super::expression::{Argument, Expression};
use super::location::NodeMeta;
use super::statement::Statement;
use super::types::TypeRef;
use crate::encoding::tags::decl as tag;

/// Declaration with identity and location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub meta: NodeMeta,
    pub kind: DeclKind,
}

impl Declaration {
    pub fn new(meta: NodeMeta, kind: DeclKind) -> Self {
        Self { meta, kind }
    }

    /// Declared name; program units answer with their path
    pub fn name(&self) -> &str {
        match &self.kind {
            DeclKind::ProgramUnit(unit) => &unit.path,
            DeclKind::Class(class) => &class.name,
            DeclKind::Function(func) => &func.name,
            DeclKind::Variable(var) => &var.name,
            DeclKind::Enum(e) => &e.name,
        }
    }
}

/// Declaration variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum DeclKind {
    ProgramUnit(ProgramUnit),
    Class(ClassDecl),
    Function(FunctionDecl),
    Variable(VariableDecl),
    Enum(EnumDecl),
}

impl DeclKind {
    /// Tag byte identifying this variant in the binary format
    pub const fn tag(&self) -> u8 {
        match self {
            Self::ProgramUnit(_) => tag::PROGRAM_UNIT,
            Self::Class(_) => tag::CLASS,
            Self::Function(_) => tag::FUNCTION,
            Self::Variable(_) => tag::VARIABLE,
            Self::Enum(_) => tag::ENUM,
        }
    }

    /// Variant name, matching the JSON `tag` field
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ProgramUnit(_) => "program_unit",
            Self::Class(_) => "class",
            Self::Function(_) => "function",
            Self::Variable(_) => "variable",
            Self::Enum(_) => "enum",
        }
    }
}

/// A single analyzed source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramUnit {
    /// Path of the file the unit was analyzed from
    pub path: String,
    pub imports: Vec<ImportDirective>,
    pub declarations: Vec<Declaration>,
}

/// `import 'uri' as prefix show a, b hide c;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDirective {
    pub uri: String,
    pub prefix: Option<String>,
    pub show: Vec<String>,
    pub hide: Vec<String>,
}

impl ImportDirective {
    /// Plain import without combinators
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            prefix: None,
            show: Vec::new(),
            hide: Vec::new(),
        }
    }
}

/// Class-like type declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub class_kind: ClassKind,
    pub type_params: Vec<String>,
    pub superclass: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub mixins: Vec<TypeRef>,
    pub annotations: Vec<String>,
    pub members: Vec<Declaration>,
}

/// Flavor of a class-like declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ClassKind {
    Class = 0,
    AbstractClass = 1,
    Mixin = 2,
    Interface = 3,
    Extension = 4,
}

impl ClassKind {
    /// Convert from the encoded byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Class),
            1 => Some(Self::AbstractClass),
            2 => Some(Self::Mixin),
            3 => Some(Self::Interface),
            4 => Some(Self::Extension),
            _ => None,
        }
    }
}

/// Function, method, getter, setter or constructor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub function_kind: FunctionKind,
    pub type_params: Vec<String>,
    pub params: Vec<Parameter>,
    pub return_type: Option<TypeRef>,
    /// `None` for abstract and external functions
    pub body: Option<Box<Statement>>,
    pub modifiers: FunctionModifiers,
}

/// Role of a function declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FunctionKind {
    #[default]
    Function = 0,
    Method = 1,
    Getter = 2,
    Setter = 3,
    Constructor = 4,
    Operator = 5,
}

impl FunctionKind {
    /// Convert from the encoded byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Function),
            1 => Some(Self::Method),
            2 => Some(Self::Getter),
            3 => Some(Self::Setter),
            4 => Some(Self::Constructor),
            5 => Some(Self::Operator),
            _ => None,
        }
    }
}

/// Boolean modifiers of a function, packed into one byte on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FunctionModifiers {
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_external: bool,
    pub is_async: bool,
    /// `sync*` / `async*`
    pub is_generator: bool,
    pub is_const: bool,
    pub is_factory: bool,
}

impl FunctionModifiers {
    const STATIC: u8 = 1 << 0;
    const ABSTRACT: u8 = 1 << 1;
    const EXTERNAL: u8 = 1 << 2;
    const ASYNC: u8 = 1 << 3;
    const GENERATOR: u8 = 1 << 4;
    const CONST: u8 = 1 << 5;
    const FACTORY: u8 = 1 << 6;
    const KNOWN: u8 = 0x7F;

    /// Pack into a bit set
    pub const fn bits(self) -> u8 {
        let mut bits = 0;
        if self.is_static {
            bits |= Self::STATIC;
        }
        if self.is_abstract {
            bits |= Self::ABSTRACT;
        }
        if self.is_external {
            bits |= Self::EXTERNAL;
        }
        if self.is_async {
            bits |= Self::ASYNC;
        }
        if self.is_generator {
            bits |= Self::GENERATOR;
        }
        if self.is_const {
            bits |= Self::CONST;
        }
        if self.is_factory {
            bits |= Self::FACTORY;
        }
        bits
    }

    /// Unpack from a bit set; `None` if an unknown bit is set
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::KNOWN != 0 {
            return None;
        }
        Some(Self {
            is_static: bits & Self::STATIC != 0,
            is_abstract: bits & Self::ABSTRACT != 0,
            is_external: bits & Self::EXTERNAL != 0,
            is_async: bits & Self::ASYNC != 0,
            is_generator: bits & Self::GENERATOR != 0,
            is_const: bits & Self::CONST != 0,
            is_factory: bits & Self::FACTORY != 0,
        })
    }
}

/// Formal parameter of a function or lambda
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub meta: NodeMeta,
    pub name: String,
    pub declared_type: Option<TypeRef>,
    pub param_kind: ParamKind,
    pub required: bool,
    pub default_value: Option<Expression>,
}

/// How a parameter is passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ParamKind {
    #[default]
    Positional = 0,
    OptionalPositional = 1,
    Named = 2,
}

impl ParamKind {
    /// Convert from the encoded byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Positional),
            1 => Some(Self::OptionalPositional),
            2 => Some(Self::Named),
            _ => None,
        }
    }
}

/// Top-level, member or local variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDecl {
    pub name: String,
    pub declared_type: Option<TypeRef>,
    pub initializer: Option<Expression>,
    pub mutability: Mutability,
    pub is_static: bool,
    pub is_late: bool,
}

/// `var`, `final` or `const`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Mutability {
    #[default]
    Var = 0,
    Final = 1,
    Const = 2,
}

impl Mutability {
    /// Convert from the encoded byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Var),
            1 => Some(Self::Final),
            2 => Some(Self::Const),
            _ => None,
        }
    }
}

/// Enum declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    pub constants: Vec<EnumConstant>,
    pub members: Vec<Declaration>,
}

/// One enum value `red(0xFF0000)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumConstant {
    pub meta: NodeMeta,
    pub name: String,
    pub args: Vec<Argument>,
}
