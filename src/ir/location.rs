//! Source location tracking and per-node metadata.

use serde::{Deserialize, Serialize};

/// Source location of a node.
///
/// Encoded as exactly 20 bytes: a 4-byte string reference for the file
/// followed by four little-endian `u32` fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Path of the source file
    pub file: String,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
    /// Byte offset from the start of the file (0-based)
    pub offset: u32,
    /// Length of the node's source text in bytes
    pub length: u32,
}

impl SourceLocation {
    /// Size of an encoded location in bytes
    pub const ENCODED_SIZE: usize = 20;

    /// Create a new location
    pub fn new(file: impl Into<String>, line: u32, column: u32, offset: u32, length: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            offset,
            length,
        }
    }
}

/// Identity and origin shared by every IR node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NodeMeta {
    /// Opaque node id assigned by the analyzer
    pub id: String,
    /// Where the node came from, if known
    pub location: Option<SourceLocation>,
    /// Node was produced by analysis rather than parsed from source text
    pub synthetic: bool,
}

impl NodeMeta {
    /// Metadata for a node parsed from source text
    pub fn at(id: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            id: id.into(),
            location: Some(location),
            synthetic: false,
        }
    }

    /// Metadata for a node created by analysis (no source text)
    pub fn synthetic(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            location: None,
            synthetic: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_constructors() {
        let meta = NodeMeta::synthetic("n1");
        assert!(meta.synthetic);
        assert!(meta.location.is_none());

        let meta = NodeMeta::at("n2", SourceLocation::new("a.dart", 1, 1, 0, 1));
        assert!(!meta.synthetic);
        assert_eq!(meta.location.map(|l| l.line), Some(1));
    }
}
