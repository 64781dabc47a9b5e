//! Statement nodes (19 variants)

use serde::{Deserialize, Serialize};

use super::declaration::{FunctionDecl, VariableDecl};
use super::expression::Expression;
use super::location::NodeMeta;
use super::types::TypeRef;
use crate::encoding::tags::stmt as tag;

/// Statement with identity and location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub meta: NodeMeta,
    pub kind: StmtKind,
}

impl Statement {
    pub fn new(meta: NodeMeta, kind: StmtKind) -> Self {
        Self { meta, kind }
    }

    /// Shorthand for a boxed child
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }
}

/// Statement variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum StmtKind {
    /// `{ ... }`
    Block { statements: Vec<Statement> },
    /// Expression evaluated for its effect `f();`
    Expression { expr: Expression },
    /// `var x = 1;`
    LocalVariable(VariableDecl),
    /// Nested function declaration
    LocalFunction(FunctionDecl),
    /// `if (c) a else b`
    If {
        condition: Expression,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },
    /// `for (init; cond; updaters) body`
    For {
        initializer: Option<Box<Statement>>,
        condition: Option<Expression>,
        updaters: Vec<Expression>,
        body: Box<Statement>,
    },
    /// `for (T x in xs) body` / `await for (...)`
    ForIn {
        variable: String,
        variable_type: Option<TypeRef>,
        iterable: Expression,
        body: Box<Statement>,
        is_await: bool,
    },
    /// `while (c) body`
    While {
        condition: Expression,
        body: Box<Statement>,
    },
    /// `do body while (c);`
    DoWhile {
        body: Box<Statement>,
        condition: Expression,
    },
    /// `switch (subject) { case ...: }`
    Switch {
        subject: Expression,
        cases: Vec<SwitchCase>,
    },
    /// `try { } on T catch (e, s) { } finally { }`
    Try {
        body: Box<Statement>,
        catches: Vec<CatchClause>,
        finally: Option<Box<Statement>>,
    },
    /// `return;` / `return x;`
    Return { value: Option<Expression> },
    /// `break;` / `break label;`
    Break { label: Option<String> },
    /// `continue;` / `continue label;`
    Continue { label: Option<String> },
    /// `rethrow;`
    Rethrow,
    /// `yield x;` / `yield* xs;`
    Yield { value: Expression, is_star: bool },
    /// `outer: inner: for (...)`
    Labeled {
        labels: Vec<String>,
        body: Box<Statement>,
    },
    /// `assert(c, 'message');`
    Assert {
        condition: Expression,
        message: Option<Expression>,
    },
    /// `;`
    Empty,
}

impl StmtKind {
    /// Tag byte identifying this variant in the binary format
    pub const fn tag(&self) -> u8 {
        match self {
            Self::Block { .. } => tag::BLOCK,
            Self::Expression { .. } => tag::EXPRESSION,
            Self::LocalVariable(_) => tag::LOCAL_VARIABLE,
            Self::LocalFunction(_) => tag::LOCAL_FUNCTION,
            Self::If { .. } => tag::IF,
            Self::For { .. } => tag::FOR,
            Self::ForIn { .. } => tag::FOR_IN,
            Self::While { .. } => tag::WHILE,
            Self::DoWhile { .. } => tag::DO_WHILE,
            Self::Switch { .. } => tag::SWITCH,
            Self::Try { .. } => tag::TRY,
            Self::Return { .. } => tag::RETURN,
            Self::Break { .. } => tag::BREAK,
            Self::Continue { .. } => tag::CONTINUE,
            Self::Rethrow => tag::RETHROW,
            Self::Yield { .. } => tag::YIELD,
            Self::Labeled { .. } => tag::LABELED,
            Self::Assert { .. } => tag::ASSERT,
            Self::Empty => tag::EMPTY,
        }
    }

    /// Variant name, matching the JSON `tag` field
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Block { .. } => "block",
            Self::Expression { .. } => "expression",
            Self::LocalVariable(_) => "local_variable",
            Self::LocalFunction(_) => "local_function",
            Self::If { .. } => "if",
            Self::For { .. } => "for",
            Self::ForIn { .. } => "for_in",
            Self::While { .. } => "while",
            Self::DoWhile { .. } => "do_while",
            Self::Switch { .. } => "switch",
            Self::Try { .. } => "try",
            Self::Return { .. } => "return",
            Self::Break { .. } => "break",
            Self::Continue { .. } => "continue",
            Self::Rethrow => "rethrow",
            Self::Yield { .. } => "yield",
            Self::Labeled { .. } => "labeled",
            Self::Assert { .. } => "assert",
            Self::Empty => "empty",
        }
    }
}

/// One `case` group of a switch; empty `patterns` marks the `default` case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub meta: NodeMeta,
    pub patterns: Vec<Expression>,
    /// `when` guard
    pub guard: Option<Expression>,
    pub body: Vec<Statement>,
}

impl SwitchCase {
    pub fn is_default(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// `on T catch (e, s) { ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchClause {
    pub meta: NodeMeta,
    pub exception_type: Option<TypeRef>,
    pub exception_var: Option<String>,
    pub stack_trace_var: Option<String>,
    pub body: Statement,
}
