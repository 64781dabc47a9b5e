//! In-memory IR model
//!
//! The tree the upstream analyzer builds and the codec persists. Three node
//! families share a common [`NodeMeta`] prefix:
//! - [`Declaration`] / [`DeclKind`]
//! - [`Expression`] / [`ExprKind`] (plus a resolved result type)
//! - [`Statement`] / [`StmtKind`]
//!
//! The variant sets are closed; each variant maps to one entry of the tag
//! table in [`crate::encoding::tags`].

mod location;
mod types;
mod literal;
mod operators;
mod expression;
mod statement;
mod declaration;
mod tree;
mod visit;

pub use location::{NodeMeta, SourceLocation};
pub use types::TypeRef;
pub use literal::{FloatBits, LiteralValue};
pub use operators::{BinaryOp, PostfixOp, UnaryOp};
pub use expression::{Argument, ExprKind, Expression, LambdaBody, MapEntry};
pub use statement::{CatchClause, Statement, StmtKind, SwitchCase};
pub use declaration::{
    ClassDecl, ClassKind, DeclKind, Declaration, EnumConstant, EnumDecl, FunctionDecl,
    FunctionKind, FunctionModifiers, ImportDirective, Mutability, ParamKind, Parameter,
    ProgramUnit, VariableDecl,
};
pub use tree::IrTree;
pub use visit::{
    walk_catch_clause, walk_class, walk_declaration, walk_enum, walk_enum_constant,
    walk_expression, walk_function, walk_import, walk_location, walk_meta, walk_parameters,
    walk_program_unit, walk_statement, walk_switch_case, walk_tree, walk_type_ref,
    walk_variable, StrRole, Visitor,
};
