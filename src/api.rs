//! Public API for the tree codec
//!
//! Provides high-level write/read functions and file helpers for the binary
//! (.irtb) and JSON mirror (.json) formats.

use std::path::Path;

use tracing::debug;

use crate::config::{ReadOptions, WriteOptions};
use crate::encoding::{FileSummary, TreeReader, TreeWriter};
use crate::error::CodecResult;
use crate::ir::IrTree;
use crate::json::{from_json_str, to_json_string};

/// On-disk format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Binary format (.irtb) - compact, checksummed
    #[default]
    Binary,
    /// JSON mirror (.json) - human-readable, debuggable
    Json,
}

impl Format {
    /// Detect format from file extension
    pub fn from_extension(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            _ => Self::Binary,
        }
    }

    /// Get file extension for this format
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Binary => "irtb",
            Self::Json => "json",
        }
    }
}

/// Encode with default options (checksum and debug info on)
pub fn write(tree: &IrTree) -> CodecResult<Vec<u8>> {
    write_with(tree, &WriteOptions::default())
}

pub fn write_with(tree: &IrTree, options: &WriteOptions) -> CodecResult<Vec<u8>> {
    Ok(TreeWriter::new(*options).write(tree)?)
}

/// Decode with default options
pub fn read(data: &[u8]) -> CodecResult<IrTree> {
    read_with(data, &ReadOptions::default())
}

pub fn read_with(data: &[u8], options: &ReadOptions) -> CodecResult<IrTree> {
    Ok(TreeReader::new(*options).read(data)?)
}

/// Summarize header and string table without decoding the body
pub fn inspect(data: &[u8]) -> CodecResult<FileSummary> {
    Ok(TreeReader::default().inspect(data)?)
}

// ============================================================================
// Convenience functions
// ============================================================================

/// Encode a tree to a file, format chosen by extension
pub fn encode_file(path: impl AsRef<Path>, tree: &IrTree, options: &WriteOptions) -> CodecResult<()> {
    let path = path.as_ref();
    let bytes = match Format::from_extension(path) {
        Format::Binary => write_with(tree, options)?,
        Format::Json => to_json_string(tree, true)?.into_bytes(),
    };
    std::fs::write(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote file");
    Ok(())
}

/// Decode a tree from a file, format chosen by extension
pub fn decode_file(path: impl AsRef<Path>, options: &ReadOptions) -> CodecResult<IrTree> {
    let path = path.as_ref();
    match Format::from_extension(path) {
        Format::Binary => {
            let bytes = std::fs::read(path)?;
            read_with(&bytes, options)
        }
        Format::Json => {
            let text = std::fs::read_to_string(path)?;
            from_json_str(&text)
        }
    }
}

/// Convert between formats
pub fn convert(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    read_options: &ReadOptions,
    write_options: &WriteOptions,
) -> CodecResult<()> {
    let tree = decode_file(input, read_options)?;
    encode_file(output, &tree, write_options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_extension("tree.irtb"), Format::Binary);
        assert_eq!(Format::from_extension("tree.json"), Format::Json);
        assert_eq!(Format::from_extension("tree.bin"), Format::Binary); // Default
    }

    #[test]
    fn test_extension() {
        assert_eq!(Format::Binary.extension(), "irtb");
        assert_eq!(Format::Json.extension(), "json");
    }

    #[test]
    fn test_write_read_empty() {
        let tree = IrTree::new();
        let bytes = write(&tree).unwrap();
        assert_eq!(read(&bytes).unwrap(), tree);
        let summary = inspect(&bytes).unwrap();
        assert_eq!(summary.string_count, 0);
    }
}
