//! Error types for the tree codec

use std::io;

use thiserror::Error;

use crate::encoding::NodeFamily;
use crate::validate::ValidationError;

/// Result type alias for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Top-level error type
#[derive(Debug, Error)]
pub enum CodecError {
    /// I/O error during file read/write
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    /// Decoding error
    #[error("Decoding error: {0}")]
    Decode(#[from] DecodeError),

    /// JSON mirror error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file is not valid TOML for the schema
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration parsed but holds an unusable value
    #[error("Invalid configuration value: {0}")]
    InvalidConfig(String),
}

impl CodecError {
    /// Validation errors, if the write was rejected by the validator
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            Self::Encode(EncodeError::ValidationFailed(errors)) => Some(errors),
            _ => None,
        }
    }

    /// The underlying decode error, if any
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            Self::Decode(err) => Some(err),
            _ => None,
        }
    }
}

/// Encoding-specific errors
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The tree failed pre-write validation; nothing was written
    #[error("Validation failed with {} error(s){}", .0.len(), first_error(.0))]
    ValidationFailed(Vec<ValidationError>),

    /// String does not fit the 2-byte length prefix
    #[error("String too long: {len} bytes exceeds maximum {max}")]
    StringTooLong { len: usize, max: usize },

    /// String index outside the interned table
    #[error("String index {index} out of bounds (table size {len})")]
    OutOfBounds { index: u32, len: u32 },

    /// The body encoder met a string the collection pass did not intern
    #[error("String was not interned before body encoding: {0:?}")]
    Uninterned(String),

    /// Collection does not fit the 4-byte count prefix
    #[error("Collection too large: {len} elements exceeds u32 count")]
    CollectionTooLarge { len: usize },

    /// The interner ran out of keys
    #[error("String table is full")]
    InternerFull,
}

fn first_error(errors: &[ValidationError]) -> String {
    errors
        .first()
        .map(|e| format!(", first: {e}"))
        .unwrap_or_default()
}

/// Decoding-specific errors
///
/// Every variant records the byte offset at which it was detected.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Invalid magic number
    #[error("Invalid magic number at offset {offset}: expected IRTB, got {found:?}")]
    BadMagic { found: [u8; 4], offset: usize },

    /// Format version this reader cannot decode
    #[error("Unsupported format version {found} at offset {offset} (max supported {max_supported})")]
    UnsupportedVersion {
        found: u16,
        max_supported: u16,
        offset: usize,
    },

    /// Compressed or reserved header flags set
    #[error("Unsupported header flags {flags:#06x} at offset {offset}")]
    UnsupportedFlags { flags: u16, offset: usize },

    /// Unexpected end of input
    #[error("Unexpected end of file at offset {offset}: needed {needed} more byte(s)")]
    UnexpectedEof { offset: usize, needed: usize },

    /// Invalid string reference
    #[error("Invalid string reference at offset {offset}: {index} >= {table_size}")]
    StringRefOutOfBounds {
        index: u32,
        table_size: u32,
        offset: usize,
    },

    /// Tag byte not assigned in the expected family
    #[error("Unknown {family} tag {tag:#04x} at offset {offset}")]
    UnknownNodeTag {
        tag: u8,
        family: NodeFamily,
        offset: usize,
    },

    /// Inner discriminant or flag byte with no meaning
    #[error("Invalid {what} value {value} at offset {offset}")]
    InvalidValue {
        what: &'static str,
        value: u64,
        offset: usize,
    },

    /// String table entry is not UTF-8
    #[error("Invalid UTF-8 in string table at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// String table contains the same entry twice
    #[error("Duplicate string table entry {index} at offset {offset}")]
    DuplicateString { index: u32, offset: usize },

    /// The same metadata key appears twice in the body
    #[error("Duplicate metadata key at offset {offset}")]
    DuplicateMetadataKey { offset: usize },

    /// Nesting deeper than the configured limit
    #[error("Nesting depth limit {limit} exceeded at offset {offset}")]
    DepthLimitExceeded { limit: usize, offset: usize },

    /// Bytes left over after the body
    #[error("{remaining} trailing byte(s) after body at offset {offset}")]
    TrailingBytes { remaining: usize, offset: usize },

    /// Checksum mismatch (corruption detected)
    #[error("Checksum mismatch at offset {offset}: expected {expected}, got {actual}")]
    CorruptData {
        expected: String,
        actual: String,
        offset: usize,
    },
}

impl DecodeError {
    /// Byte offset at which the error was detected
    pub const fn offset(&self) -> usize {
        match self {
            Self::BadMagic { offset, .. }
            | Self::UnsupportedVersion { offset, .. }
            | Self::UnsupportedFlags { offset, .. }
            | Self::UnexpectedEof { offset, .. }
            | Self::StringRefOutOfBounds { offset, .. }
            | Self::UnknownNodeTag { offset, .. }
            | Self::InvalidValue { offset, .. }
            | Self::InvalidUtf8 { offset }
            | Self::DuplicateString { offset, .. }
            | Self::DuplicateMetadataKey { offset }
            | Self::DepthLimitExceeded { offset, .. }
            | Self::TrailingBytes { offset, .. }
            | Self::CorruptData { offset, .. } => *offset,
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(what: &'static str, value: impl Into<u64>, offset: usize) -> Self {
        Self::InvalidValue {
            what,
            value: value.into(),
            offset,
        }
    }

    /// The whole file is rejected up front (header-level failure)
    pub const fn is_header_error(&self) -> bool {
        matches!(
            self,
            Self::BadMagic { .. } | Self::UnsupportedVersion { .. } | Self::UnsupportedFlags { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DecodeError::BadMagic {
            found: [0x00, 0x01, 0x02, 0x03],
            offset: 0,
        };
        assert!(err.to_string().contains("Invalid magic"));

        let err = DecodeError::UnknownNodeTag {
            tag: 0x7E,
            family: NodeFamily::Expression,
            offset: 42,
        };
        assert!(err.to_string().contains("expression tag 0x7e"));
        assert_eq!(err.offset(), 42);
    }

    #[test]
    fn test_header_errors() {
        let err = DecodeError::UnsupportedVersion {
            found: 2,
            max_supported: 1,
            offset: 4,
        };
        assert!(err.is_header_error());
        assert!(!DecodeError::UnexpectedEof { offset: 0, needed: 1 }.is_header_error());
    }

    #[test]
    fn test_codec_error_from() {
        let err: CodecError = EncodeError::ValidationFailed(Vec::new()).into();
        assert_eq!(err.validation_errors().map(<[_]>::len), Some(0));
        assert!(err.as_decode().is_none());
    }
}
