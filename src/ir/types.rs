//! Type references attached to expressions and declarations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to a resolved type, e.g. `Map<String, int?>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// Type name as resolved by the analyzer
    pub name: String,
    /// Type admits null
    pub nullable: bool,
    /// Generic type arguments
    pub type_args: Vec<TypeRef>,
}

impl TypeRef {
    /// Non-nullable type without arguments
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: false,
            type_args: Vec::new(),
        }
    }

    /// Generic type application
    pub fn generic(name: impl Into<String>, type_args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            nullable: false,
            type_args,
        }
    }

    /// Same type, nullable
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Nesting depth of type arguments (a plain name has depth 1)
    pub fn depth(&self) -> usize {
        1 + self.type_args.iter().map(TypeRef::depth).max().unwrap_or(0)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.type_args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}
