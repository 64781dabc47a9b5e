//! IR visitor with default traversal helpers.
//!
//! Implement the methods you care about and call the matching `walk_*`
//! function to recurse into children. Every string stored in the tree reaches
//! [`Visitor::visit_str`] exactly once per occurrence, tagged with its
//! [`StrRole`]; the string-collection pre-pass and the validator both rely on
//! that.
//!
//! ```rust
//! use irtree::ir::{walk_expression, Expression, Visitor};
//!
//! struct CountExprs(usize);
//! impl Visitor for CountExprs {
//!     fn visit_expression(&mut self, expr: &Expression) {
//!         self.0 += 1;
//!         walk_expression(self, expr);
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::declaration::{
    ClassDecl, DeclKind, Declaration, EnumConstant, EnumDecl, FunctionDecl, ImportDirective,
    Parameter, ProgramUnit, VariableDecl,
};
use super::expression::{Argument, ExprKind, Expression, LambdaBody};
use super::literal::LiteralValue;
use super::location::{NodeMeta, SourceLocation};
use super::statement::{CatchClause, Statement, StmtKind, SwitchCase};
use super::tree::IrTree;
use super::types::TypeRef;

/// What a visited string is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrRole {
    /// Node identity
    Id,
    /// Identifier-like name (declarations, members, labels, type names)
    Name,
    /// File path or import URI
    Path,
    /// Free text (literal contents, annotations, metadata values)
    Text,
}

impl StrRole {
    /// Strings in this role must not be empty
    pub const fn is_required(self) -> bool {
        !matches!(self, Self::Text)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Path => "path",
            Self::Text => "text",
        }
    }
}

pub trait Visitor {
    fn visit_tree(&mut self, tree: &IrTree) {
        walk_tree(self, tree)
    }

    fn visit_declaration(&mut self, decl: &Declaration) {
        walk_declaration(self, decl)
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt)
    }

    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr)
    }

    fn visit_meta(&mut self, meta: &NodeMeta) {
        walk_meta(self, meta)
    }

    fn visit_location(&mut self, loc: &SourceLocation) {
        walk_location(self, loc)
    }

    fn visit_type_ref(&mut self, ty: &TypeRef) {
        walk_type_ref(self, ty)
    }

    /// Called before anything else of a node that carries [`NodeMeta`]
    fn enter_node(&mut self, _meta: &NodeMeta) {}

    /// Called after all children of a node that carries [`NodeMeta`]
    fn leave_node(&mut self, _meta: &NodeMeta) {}

    fn visit_str(&mut self, _role: StrRole, _value: &str) {}
}

// --- Tree ---

pub fn walk_tree<V: Visitor + ?Sized>(v: &mut V, tree: &IrTree) {
    for (key, value) in &tree.metadata {
        v.visit_str(StrRole::Name, key);
        v.visit_str(StrRole::Text, value);
    }
    for decl in &tree.declarations {
        v.visit_declaration(decl);
    }
}

// --- Shared pieces ---

pub fn walk_meta<V: Visitor + ?Sized>(v: &mut V, meta: &NodeMeta) {
    v.visit_str(StrRole::Id, &meta.id);
    if let Some(loc) = &meta.location {
        v.visit_location(loc);
    }
}

pub fn walk_location<V: Visitor + ?Sized>(v: &mut V, loc: &SourceLocation) {
    v.visit_str(StrRole::Path, &loc.file);
}

pub fn walk_type_ref<V: Visitor + ?Sized>(v: &mut V, ty: &TypeRef) {
    v.visit_str(StrRole::Name, &ty.name);
    for arg in &ty.type_args {
        v.visit_type_ref(arg);
    }
}

fn walk_opt_type_ref<V: Visitor + ?Sized>(v: &mut V, ty: Option<&TypeRef>) {
    if let Some(ty) = ty {
        v.visit_type_ref(ty);
    }
}

fn walk_opt_name<V: Visitor + ?Sized>(v: &mut V, name: Option<&str>) {
    if let Some(name) = name {
        v.visit_str(StrRole::Name, name);
    }
}

fn walk_names<V: Visitor + ?Sized>(v: &mut V, names: &[String]) {
    for name in names {
        v.visit_str(StrRole::Name, name);
    }
}

fn walk_arguments<V: Visitor + ?Sized>(v: &mut V, args: &[Argument]) {
    for arg in args {
        walk_opt_name(v, arg.name.as_deref());
        v.visit_expression(&arg.value);
    }
}

// --- Declarations ---

pub fn walk_declaration<V: Visitor + ?Sized>(v: &mut V, decl: &Declaration) {
    v.enter_node(&decl.meta);
    v.visit_meta(&decl.meta);
    match &decl.kind {
        DeclKind::ProgramUnit(unit) => walk_program_unit(v, unit),
        DeclKind::Class(class) => walk_class(v, class),
        DeclKind::Function(func) => walk_function(v, func),
        DeclKind::Variable(var) => walk_variable(v, var),
        DeclKind::Enum(e) => walk_enum(v, e),
    }
    v.leave_node(&decl.meta);
}

pub fn walk_program_unit<V: Visitor + ?Sized>(v: &mut V, unit: &ProgramUnit) {
    v.visit_str(StrRole::Path, &unit.path);
    for import in &unit.imports {
        walk_import(v, import);
    }
    for decl in &unit.declarations {
        v.visit_declaration(decl);
    }
}

pub fn walk_import<V: Visitor + ?Sized>(v: &mut V, import: &ImportDirective) {
    v.visit_str(StrRole::Path, &import.uri);
    walk_opt_name(v, import.prefix.as_deref());
    walk_names(v, &import.show);
    walk_names(v, &import.hide);
}

pub fn walk_class<V: Visitor + ?Sized>(v: &mut V, class: &ClassDecl) {
    v.visit_str(StrRole::Name, &class.name);
    walk_names(v, &class.type_params);
    walk_opt_type_ref(v, class.superclass.as_ref());
    for ty in class.interfaces.iter().chain(&class.mixins) {
        v.visit_type_ref(ty);
    }
    for annotation in &class.annotations {
        v.visit_str(StrRole::Text, annotation);
    }
    for member in &class.members {
        v.visit_declaration(member);
    }
}

pub fn walk_function<V: Visitor + ?Sized>(v: &mut V, func: &FunctionDecl) {
    v.visit_str(StrRole::Name, &func.name);
    walk_names(v, &func.type_params);
    walk_parameters(v, &func.params);
    walk_opt_type_ref(v, func.return_type.as_ref());
    if let Some(body) = &func.body {
        v.visit_statement(body);
    }
}

pub fn walk_parameters<V: Visitor + ?Sized>(v: &mut V, params: &[Parameter]) {
    for param in params {
        v.enter_node(&param.meta);
        v.visit_meta(&param.meta);
        v.visit_str(StrRole::Name, &param.name);
        walk_opt_type_ref(v, param.declared_type.as_ref());
        if let Some(default) = &param.default_value {
            v.visit_expression(default);
        }
        v.leave_node(&param.meta);
    }
}

pub fn walk_variable<V: Visitor + ?Sized>(v: &mut V, var: &VariableDecl) {
    v.visit_str(StrRole::Name, &var.name);
    walk_opt_type_ref(v, var.declared_type.as_ref());
    if let Some(init) = &var.initializer {
        v.visit_expression(init);
    }
}

pub fn walk_enum<V: Visitor + ?Sized>(v: &mut V, e: &EnumDecl) {
    v.visit_str(StrRole::Name, &e.name);
    for constant in &e.constants {
        walk_enum_constant(v, constant);
    }
    for member in &e.members {
        v.visit_declaration(member);
    }
}

pub fn walk_enum_constant<V: Visitor + ?Sized>(v: &mut V, constant: &EnumConstant) {
    v.enter_node(&constant.meta);
    v.visit_meta(&constant.meta);
    v.visit_str(StrRole::Name, &constant.name);
    walk_arguments(v, &constant.args);
    v.leave_node(&constant.meta);
}

// --- Statements ---

pub fn walk_statement<V: Visitor + ?Sized>(v: &mut V, stmt: &Statement) {
    v.enter_node(&stmt.meta);
    v.visit_meta(&stmt.meta);
    match &stmt.kind {
        StmtKind::Block { statements } => {
            for s in statements {
                v.visit_statement(s);
            }
        }
        StmtKind::Expression { expr } => v.visit_expression(expr),
        StmtKind::LocalVariable(var) => walk_variable(v, var),
        StmtKind::LocalFunction(func) => walk_function(v, func),
        StmtKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            v.visit_expression(condition);
            v.visit_statement(then_branch);
            if let Some(else_branch) = else_branch {
                v.visit_statement(else_branch);
            }
        }
        StmtKind::For {
            initializer,
            condition,
            updaters,
            body,
        } => {
            if let Some(init) = initializer {
                v.visit_statement(init);
            }
            if let Some(cond) = condition {
                v.visit_expression(cond);
            }
            for updater in updaters {
                v.visit_expression(updater);
            }
            v.visit_statement(body);
        }
        StmtKind::ForIn {
            variable,
            variable_type,
            iterable,
            body,
            is_await: _,
        } => {
            v.visit_str(StrRole::Name, variable);
            walk_opt_type_ref(v, variable_type.as_ref());
            v.visit_expression(iterable);
            v.visit_statement(body);
        }
        StmtKind::While { condition, body } => {
            v.visit_expression(condition);
            v.visit_statement(body);
        }
        StmtKind::DoWhile { body, condition } => {
            v.visit_statement(body);
            v.visit_expression(condition);
        }
        StmtKind::Switch { subject, cases } => {
            v.visit_expression(subject);
            for case in cases {
                walk_switch_case(v, case);
            }
        }
        StmtKind::Try {
            body,
            catches,
            finally,
        } => {
            v.visit_statement(body);
            for clause in catches {
                walk_catch_clause(v, clause);
            }
            if let Some(finally) = finally {
                v.visit_statement(finally);
            }
        }
        StmtKind::Return { value } => {
            if let Some(value) = value {
                v.visit_expression(value);
            }
        }
        StmtKind::Break { label } | StmtKind::Continue { label } => {
            walk_opt_name(v, label.as_deref());
        }
        StmtKind::Yield { value, is_star: _ } => v.visit_expression(value),
        StmtKind::Labeled { labels, body } => {
            walk_names(v, labels);
            v.visit_statement(body);
        }
        StmtKind::Assert { condition, message } => {
            v.visit_expression(condition);
            if let Some(message) = message {
                v.visit_expression(message);
            }
        }
        StmtKind::Rethrow | StmtKind::Empty => {}
    }
    v.leave_node(&stmt.meta);
}

pub fn walk_switch_case<V: Visitor + ?Sized>(v: &mut V, case: &SwitchCase) {
    v.enter_node(&case.meta);
    v.visit_meta(&case.meta);
    for pattern in &case.patterns {
        v.visit_expression(pattern);
    }
    if let Some(guard) = &case.guard {
        v.visit_expression(guard);
    }
    for s in &case.body {
        v.visit_statement(s);
    }
    v.leave_node(&case.meta);
}

pub fn walk_catch_clause<V: Visitor + ?Sized>(v: &mut V, clause: &CatchClause) {
    v.enter_node(&clause.meta);
    v.visit_meta(&clause.meta);
    walk_opt_type_ref(v, clause.exception_type.as_ref());
    walk_opt_name(v, clause.exception_var.as_deref());
    walk_opt_name(v, clause.stack_trace_var.as_deref());
    v.visit_statement(&clause.body);
    v.leave_node(&clause.meta);
}

// --- Expressions ---

pub fn walk_expression<V: Visitor + ?Sized>(v: &mut V, expr: &Expression) {
    v.enter_node(&expr.meta);
    v.visit_meta(&expr.meta);
    walk_opt_type_ref(v, expr.result_type.as_ref());
    match &expr.kind {
        ExprKind::Literal { value } => {
            if let LiteralValue::String(s) = value {
                v.visit_str(StrRole::Text, s);
            }
        }
        ExprKind::StringInterpolation { parts } => {
            for part in parts {
                v.visit_expression(part);
            }
        }
        ExprKind::Identifier { name } => v.visit_str(StrRole::Name, name),
        ExprKind::This | ExprKind::Super => {}
        ExprKind::Binary { left, right, .. } => {
            v.visit_expression(left);
            v.visit_expression(right);
        }
        ExprKind::Unary { operand, .. }
        | ExprKind::Postfix { operand, .. }
        | ExprKind::Spread { operand, .. }
        | ExprKind::Await { operand }
        | ExprKind::NullAssert { operand } => v.visit_expression(operand),
        ExprKind::Throw { exception } => v.visit_expression(exception),
        ExprKind::Parenthesized { inner } => v.visit_expression(inner),
        ExprKind::Call { callee, args } => {
            v.visit_expression(callee);
            walk_arguments(v, args);
        }
        ExprKind::MethodCall {
            target,
            method,
            type_args,
            args,
            null_aware: _,
        } => {
            if let Some(target) = target {
                v.visit_expression(target);
            }
            v.visit_str(StrRole::Name, method);
            for ty in type_args {
                v.visit_type_ref(ty);
            }
            walk_arguments(v, args);
        }
        ExprKind::ConstructorCall {
            constructed_type,
            constructor,
            args,
            is_const: _,
        } => {
            v.visit_type_ref(constructed_type);
            walk_opt_name(v, constructor.as_deref());
            walk_arguments(v, args);
        }
        ExprKind::PropertyAccess {
            target, property, ..
        } => {
            v.visit_expression(target);
            v.visit_str(StrRole::Name, property);
        }
        ExprKind::Index { target, index } => {
            v.visit_expression(target);
            v.visit_expression(index);
        }
        ExprKind::ListLiteral {
            element_type,
            elements,
            ..
        }
        | ExprKind::SetLiteral {
            element_type,
            elements,
            ..
        } => {
            walk_opt_type_ref(v, element_type.as_ref());
            for e in elements {
                v.visit_expression(e);
            }
        }
        ExprKind::MapLiteral {
            key_type,
            value_type,
            entries,
            ..
        } => {
            walk_opt_type_ref(v, key_type.as_ref());
            walk_opt_type_ref(v, value_type.as_ref());
            for entry in entries {
                v.visit_expression(&entry.key);
                v.visit_expression(&entry.value);
            }
        }
        ExprKind::RecordLiteral { fields } => walk_arguments(v, fields),
        ExprKind::CollectionIf {
            condition,
            then_element,
            else_element,
        } => {
            v.visit_expression(condition);
            v.visit_expression(then_element);
            if let Some(else_element) = else_element {
                v.visit_expression(else_element);
            }
        }
        ExprKind::CollectionFor {
            variable,
            iterable,
            element,
        } => {
            v.visit_str(StrRole::Name, variable);
            v.visit_expression(iterable);
            v.visit_expression(element);
        }
        ExprKind::Conditional {
            condition,
            then_expr,
            else_expr,
        } => {
            v.visit_expression(condition);
            v.visit_expression(then_expr);
            v.visit_expression(else_expr);
        }
        ExprKind::Lambda { params, body, .. } => {
            walk_parameters(v, params);
            match body {
                LambdaBody::Expression(e) => v.visit_expression(e),
                LambdaBody::Block(s) => v.visit_statement(s),
            }
        }
        ExprKind::Cascade { target, sections } => {
            v.visit_expression(target);
            for section in sections {
                v.visit_expression(section);
            }
        }
        ExprKind::Cast {
            operand,
            target_type,
        }
        | ExprKind::TypeCheck {
            operand,
            target_type,
            ..
        } => {
            v.visit_expression(operand);
            v.visit_type_ref(target_type);
        }
        ExprKind::TypeLiteral { literal_type } => v.visit_type_ref(literal_type),
        ExprKind::Assignment { target, value }
        | ExprKind::CompoundAssignment { target, value, .. } => {
            v.visit_expression(target);
            v.visit_expression(value);
        }
    }
    v.leave_node(&expr.meta);
}
