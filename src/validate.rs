//! Pre-write structural validation
//!
//! [`validate`] walks the whole tree once and reports every problem it
//! finds; it never stops at the first one. A non-empty result aborts the
//! write with `EncodeError::ValidationFailed`.
//!
//! Nesting is counted the way the decoder counts it: every declaration,
//! statement, expression and type reference is one level. A tree deeper than
//! `WriteOptions::max_depth` gets a single `TooDeep` report and is not walked
//! past the limit.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::config::WriteOptions;
use crate::encoding::MAX_STRING_LEN;
use crate::ir::{
    walk_declaration, walk_expression, walk_location, walk_meta, walk_statement, walk_type_ref,
    Declaration, Expression, IrTree, NodeMeta, SourceLocation, Statement, StrRole, TypeRef,
    Visitor,
};

/// One validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Id of the innermost node being checked; `None` for tree metadata
    pub node_id: Option<String>,
    pub kind: ValidationErrorKind,
}

/// What is wrong
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Identity, name or path string is empty
    EmptyField { role: StrRole },
    /// String does not fit the 2-byte length prefix
    StringTooLong { role: StrRole, len: usize },
    /// Non-synthetic node without a source location
    MissingLocation,
    /// Location with a 0 line or column or an empty file
    InvalidLocation { reason: String },
    /// Two nodes share an id
    DuplicateId { id: String },
    /// Nesting exceeds the write depth limit
    TooDeep { limit: usize },
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { role } => write!(f, "empty {} field", role.name()),
            Self::StringTooLong { role, len } => write!(
                f,
                "{} string of {len} bytes exceeds {MAX_STRING_LEN}",
                role.name()
            ),
            Self::MissingLocation => f.write_str("non-synthetic node has no source location"),
            Self::InvalidLocation { reason } => write!(f, "invalid location: {reason}"),
            Self::DuplicateId { id } => write!(f, "duplicate node id {id:?}"),
            Self::TooDeep { limit } => write!(f, "nesting deeper than {limit}"),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node_id {
            Some(id) => write!(f, "node {id:?}: {}", self.kind),
            None => write!(f, "tree metadata: {}", self.kind),
        }
    }
}

/// Validate `tree` for a default write (locations required).
pub fn validate(tree: &IrTree) -> Vec<ValidationError> {
    validate_with(tree, &WriteOptions::default())
}

/// Validate `tree` for a write with `options`.
///
/// Location rules only apply when debug info is written.
pub fn validate_with(tree: &IrTree, options: &WriteOptions) -> Vec<ValidationError> {
    let mut validator = Validator {
        debug_info: options.debug_info,
        max_depth: options.max_depth,
        depth: 0,
        too_deep: false,
        ids: FxHashSet::default(),
        stack: Vec::new(),
        errors: Vec::new(),
    };
    validator.visit_tree(tree);
    validator.errors
}

struct Validator {
    debug_info: bool,
    max_depth: usize,
    depth: usize,
    too_deep: bool,
    ids: FxHashSet<String>,
    stack: Vec<String>,
    errors: Vec<ValidationError>,
}

impl Validator {
    fn report(&mut self, kind: ValidationErrorKind) {
        let node_id = self.stack.last().filter(|id| !id.is_empty()).cloned();
        self.errors.push(ValidationError { node_id, kind });
    }

    /// Count one level; false once the limit is passed
    fn descend(&mut self) -> bool {
        self.depth += 1;
        if self.depth <= self.max_depth {
            return true;
        }
        if !self.too_deep {
            self.too_deep = true;
            self.report(ValidationErrorKind::TooDeep {
                limit: self.max_depth,
            });
        }
        false
    }
}

impl Visitor for Validator {
    fn visit_declaration(&mut self, decl: &Declaration) {
        if self.descend() {
            walk_declaration(self, decl);
        }
        self.depth -= 1;
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        if self.descend() {
            walk_statement(self, stmt);
        }
        self.depth -= 1;
    }

    fn visit_expression(&mut self, expr: &Expression) {
        if self.descend() {
            walk_expression(self, expr);
        }
        self.depth -= 1;
    }

    fn visit_type_ref(&mut self, ty: &TypeRef) {
        if self.descend() {
            walk_type_ref(self, ty);
        }
        self.depth -= 1;
    }

    fn enter_node(&mut self, meta: &NodeMeta) {
        self.stack.push(meta.id.clone());
        if !meta.id.is_empty() && !self.ids.insert(meta.id.clone()) {
            self.report(ValidationErrorKind::DuplicateId {
                id: meta.id.clone(),
            });
        }
        if self.debug_info && meta.location.is_none() && !meta.synthetic {
            self.report(ValidationErrorKind::MissingLocation);
        }
    }

    fn leave_node(&mut self, _meta: &NodeMeta) {
        self.stack.pop();
    }

    fn visit_meta(&mut self, meta: &NodeMeta) {
        if self.debug_info {
            walk_meta(self, meta);
        } else {
            self.visit_str(StrRole::Id, &meta.id);
        }
    }

    fn visit_location(&mut self, loc: &SourceLocation) {
        if loc.file.is_empty() {
            self.report(ValidationErrorKind::InvalidLocation {
                reason: "empty file path".to_string(),
            });
        } else {
            walk_location(self, loc);
        }
        if loc.line == 0 {
            self.report(ValidationErrorKind::InvalidLocation {
                reason: "line must be 1-based".to_string(),
            });
        }
        if loc.column == 0 {
            self.report(ValidationErrorKind::InvalidLocation {
                reason: "column must be 1-based".to_string(),
            });
        }
    }

    fn visit_str(&mut self, role: StrRole, value: &str) {
        if role.is_required() && value.is_empty() {
            self.report(ValidationErrorKind::EmptyField { role });
        }
        if value.len() > MAX_STRING_LEN {
            self.report(ValidationErrorKind::StringTooLong {
                role,
                len: value.len(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{
        DeclKind, Declaration, ExprKind, Expression, Mutability, ProgramUnit, VariableDecl,
    };

    fn loc(line: u32, column: u32) -> SourceLocation {
        SourceLocation::new("lib/a.dart", line, column, 0, 1)
    }

    fn variable(id: &str, name: &str, init: Option<Expression>) -> Declaration {
        Declaration::new(
            NodeMeta::at(id, loc(1, 1)),
            DeclKind::Variable(VariableDecl {
                name: name.to_string(),
                declared_type: None,
                initializer: init,
                mutability: Mutability::Final,
                is_static: false,
                is_late: false,
            }),
        )
    }

    fn unit(decls: Vec<Declaration>) -> IrTree {
        let mut tree = IrTree::new();
        tree.add_declaration(Declaration::new(
            NodeMeta::at("u0", loc(1, 1)),
            DeclKind::ProgramUnit(ProgramUnit {
                path: "lib/a.dart".to_string(),
                imports: Vec::new(),
                declarations: decls,
            }),
        ));
        tree
    }

    #[test]
    fn test_valid_tree() {
        let tree = unit(vec![variable("d1", "x", None)]);
        assert!(validate(&tree).is_empty());
    }

    #[test]
    fn test_empty_name() {
        let tree = unit(vec![variable("d1", "", None)]);
        let errors = validate(&tree);
        assert_eq!(
            errors,
            vec![ValidationError {
                node_id: Some("d1".to_string()),
                kind: ValidationErrorKind::EmptyField {
                    role: StrRole::Name
                },
            }]
        );
        assert_eq!(errors[0].to_string(), "node \"d1\": empty name field");
    }

    #[test]
    fn test_duplicate_id() {
        let tree = unit(vec![variable("d1", "x", None), variable("d1", "y", None)]);
        let errors = validate(&tree);
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0].kind, ValidationErrorKind::DuplicateId { id } if id == "d1"));
    }

    #[test]
    fn test_missing_location_only_with_debug_info() {
        let init = Expression::new(
            NodeMeta {
                id: "e1".to_string(),
                location: None,
                synthetic: false,
            },
            ExprKind::This,
        );
        let tree = unit(vec![variable("d1", "x", Some(init))]);

        let errors = validate(&tree);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].node_id.as_deref(), Some("e1"));
        assert_eq!(errors[0].kind, ValidationErrorKind::MissingLocation);

        assert!(validate_with(&tree, &WriteOptions::compact()).is_empty());
    }

    #[test]
    fn test_synthetic_node_needs_no_location() {
        let init = Expression::new(NodeMeta::synthetic("e1"), ExprKind::This);
        let tree = unit(vec![variable("d1", "x", Some(init))]);
        assert!(validate(&tree).is_empty());
    }

    #[test]
    fn test_invalid_location() {
        let mut decl = variable("d1", "x", None);
        decl.meta.location = Some(SourceLocation::new("", 0, 0, 0, 0));
        let errors = validate(&unit(vec![decl]));
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .all(|e| matches!(e.kind, ValidationErrorKind::InvalidLocation { .. })));
    }

    #[test]
    fn test_string_too_long() {
        let mut tree = unit(Vec::new());
        tree.set_metadata("note", "n".repeat(MAX_STRING_LEN + 1));
        let errors = validate(&tree);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].node_id, None);
        assert_eq!(
            errors[0].kind,
            ValidationErrorKind::StringTooLong {
                role: StrRole::Text,
                len: MAX_STRING_LEN + 1
            }
        );
    }

    #[test]
    fn test_reports_all_errors() {
        let tree = unit(vec![variable("", "", None), variable("d2", "", None)]);
        let errors = validate(&tree);
        // empty id, empty name (twice)
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].node_id, None);
        assert_eq!(errors[2].node_id.as_deref(), Some("d2"));
    }

    #[test]
    fn test_nesting_limit() {
        // unit -> variable -> parenthesized x3 -> this: six levels
        let mut init = Expression::new(NodeMeta::synthetic("e0"), ExprKind::This);
        for i in 1..=3 {
            init = Expression::new(
                NodeMeta::synthetic(format!("e{i}")),
                ExprKind::Parenthesized {
                    inner: Box::new(init),
                },
            );
        }
        let tree = unit(vec![variable("d1", "x", Some(init))]);

        let fits = WriteOptions {
            max_depth: 6,
            ..WriteOptions::default()
        };
        assert!(validate_with(&tree, &fits).is_empty());

        let tight = WriteOptions {
            max_depth: 5,
            ..WriteOptions::default()
        };
        let errors = validate_with(&tree, &tight);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::TooDeep { limit: 5 });
        assert_eq!(errors[0].node_id.as_deref(), Some("e1"));
        assert_eq!(errors[0].to_string(), "node \"e1\": nesting deeper than 5");
    }

    #[test]
    fn test_type_args_count_as_nesting() {
        let mut decl = variable("d1", "x", None);
        if let DeclKind::Variable(var) = &mut decl.kind {
            var.declared_type = Some(TypeRef {
                name: "List".to_string(),
                nullable: false,
                type_args: vec![TypeRef::named("int")],
            });
        }
        let tree = unit(vec![decl]);
        let options = |max_depth| WriteOptions {
            max_depth,
            ..WriteOptions::default()
        };
        // unit, variable, List, int
        assert!(validate_with(&tree, &options(4)).is_empty());
        assert_eq!(
            validate_with(&tree, &options(3))[0].kind,
            ValidationErrorKind::TooDeep { limit: 3 }
        );
    }
}
