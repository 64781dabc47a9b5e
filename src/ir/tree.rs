//! Root of a persisted IR tree

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::declaration::Declaration;

/// A complete analyzed IR tree.
///
/// `metadata` carries free-form producer information (analyzer version,
/// target platform, ...). A `BTreeMap` keeps encoding deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IrTree {
    pub metadata: BTreeMap<String, String>,
    pub declarations: Vec<Declaration>,
}

impl IrTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root declaration, returning its position
    pub fn add_declaration(&mut self, decl: Declaration) -> usize {
        self.declarations.push(decl);
        self.declarations.len() - 1
    }

    /// Set a metadata entry
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Check if the tree has no declarations and no metadata
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.metadata.is_empty()
    }
}
