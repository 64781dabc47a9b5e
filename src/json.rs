//! JSON mirror of the IR model
//!
//! Field names and nesting follow the Rust types one-for-one; every node
//! family carries its variant under `"tag"`. Used for debugging, fixtures
//! and the CLI's `encode`/`decode` commands.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::CodecResult;
use crate::ir::{
    Argument, CatchClause, Declaration, EnumConstant, Expression, ImportDirective, IrTree,
    LiteralValue, NodeMeta, Parameter, SourceLocation, Statement, SwitchCase, TypeRef,
};

/// Conversion to and from `serde_json::Value`
pub trait JsonMirror: Sized {
    fn to_json(&self) -> serde_json::Result<Value>;
    fn from_json(value: &Value) -> serde_json::Result<Self>;
}

macro_rules! impl_json_mirror {
    ($($ty:ty),* $(,)?) => {
        $(
            impl JsonMirror for $ty {
                fn to_json(&self) -> serde_json::Result<Value> {
                    to_value(self)
                }

                fn from_json(value: &Value) -> serde_json::Result<Self> {
                    from_value(value)
                }
            }
        )*
    };
}

impl_json_mirror!(
    IrTree,
    Declaration,
    Statement,
    Expression,
    TypeRef,
    NodeMeta,
    SourceLocation,
    LiteralValue,
    Argument,
    Parameter,
    EnumConstant,
    SwitchCase,
    CatchClause,
    ImportDirective,
);

fn to_value<T: Serialize>(value: &T) -> serde_json::Result<Value> {
    serde_json::to_value(value)
}

fn from_value<T: DeserializeOwned>(value: &Value) -> serde_json::Result<T> {
    T::deserialize(value)
}

/// Render a tree as JSON text
pub fn to_json_string(tree: &IrTree, pretty: bool) -> CodecResult<String> {
    let text = if pretty {
        serde_json::to_string_pretty(tree)?
    } else {
        serde_json::to_string(tree)?
    };
    Ok(text)
}

/// Parse a tree from JSON text
pub fn from_json_str(text: &str) -> CodecResult<IrTree> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BinaryOp, ExprKind, StmtKind};
    use serde_json::json;

    fn ident(id: &str, name: &str) -> Expression {
        Expression::new(
            NodeMeta::synthetic(id),
            ExprKind::Identifier {
                name: name.to_string(),
            },
        )
    }

    #[test]
    fn test_expression_shape() {
        let expr = Expression::new(
            NodeMeta::synthetic("e0"),
            ExprKind::Binary {
                op: BinaryOp::Add,
                left: ident("e1", "a").boxed(),
                right: ident("e2", "b").boxed(),
            },
        )
        .typed(TypeRef::named("int"));

        let value = expr.to_json().unwrap();
        assert_eq!(value["kind"]["tag"], json!("binary"));
        assert_eq!(value["kind"]["left"]["kind"]["name"], json!("a"));
        assert_eq!(value["result_type"]["name"], json!("int"));
        assert_eq!(Expression::from_json(&value).unwrap(), expr);
    }

    #[test]
    fn test_statement_unit_variant() {
        let stmt = Statement::new(NodeMeta::synthetic("s0"), StmtKind::Rethrow);
        let value = stmt.to_json().unwrap();
        assert_eq!(value["kind"], json!({ "tag": "rethrow" }));
        assert_eq!(Statement::from_json(&value).unwrap(), stmt);
    }

    #[test]
    fn test_literal_values() {
        for literal in [
            LiteralValue::Null,
            LiteralValue::Bool(true),
            LiteralValue::Int(-7),
            LiteralValue::double(0.1),
            LiteralValue::String("hi".to_string()),
        ] {
            let value = literal.to_json().unwrap();
            assert_eq!(LiteralValue::from_json(&value).unwrap(), literal);
        }
    }

    #[test]
    fn test_tree_text_roundtrip() {
        let mut tree = IrTree::new();
        tree.set_metadata("producer", "unit-test");
        let text = to_json_string(&tree, true).unwrap();
        assert_eq!(from_json_str(&text).unwrap(), tree);
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let value = json!({
            "meta": { "id": "s0", "location": null, "synthetic": true },
            "kind": { "tag": "goto" }
        });
        assert!(Statement::from_json(&value).is_err());
    }
}
