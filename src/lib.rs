//! Binary IR tree codec
//!
//! Persists the analyzer's intermediate representation (declarations,
//! statements, expressions with resolved types and source locations) in a
//! compact binary format and reads it back exactly.
//!
//! # Format Overview
//! - `.irtb` - binary format with a deduplicated string table, one tag byte
//!   per node and an optional xxh3-128 checksum
//! - `.json` - JSON mirror of the same model for debugging and fixtures
//!
//! ```rust
//! use irtree::ir::IrTree;
//!
//! let mut tree = IrTree::new();
//! tree.set_metadata("producer", "doc-test");
//! let bytes = irtree::write(&tree)?;
//! assert_eq!(irtree::read(&bytes)?, tree);
//! # Ok::<(), irtree::CodecError>(())
//! ```

pub mod ir;
pub mod encoding;
pub mod config;
pub mod validate;
pub mod json;
mod error;
mod api;

pub use api::{
    convert, decode_file, encode_file, inspect, read, read_with, write, write_with, Format,
};
pub use config::{CodecConfig, ReadOptions, WriteOptions};
pub use encoding::{FileSummary, TreeReader, TreeWriter, FORMAT_VERSION};
pub use error::{CodecError, CodecResult, DecodeError, EncodeError};
pub use ir::IrTree;
pub use json::JsonMirror;
pub use validate::{validate, validate_with, ValidationError, ValidationErrorKind};

#[cfg(test)]
mod tests;
