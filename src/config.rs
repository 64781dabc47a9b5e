//! Codec options and the TOML configuration file.
//!
//! ```toml
//! [write]
//! checksum = true
//! debug_info = false
//! max_depth = 256
//!
//! [read]
//! max_depth = 256
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::encoding::FORMAT_VERSION;
use crate::encoding::MIN_SUPPORTED_VERSION;
use crate::error::{CodecError, CodecResult};

/// Default nesting limit for writing and reading.
///
/// Declarations, statements, expressions and type references each count as
/// one level. Decoding recurses once per level, and this limit keeps that
/// recursion inside a 2 MiB thread stack in unoptimized builds.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options controlling [`crate::TreeWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriteOptions {
    /// Append an xxh3-128 checksum and set HAS_CHECKSUM
    pub checksum: bool,
    /// Encode source locations and set HAS_DEBUG_INFO
    pub debug_info: bool,
    /// Refuse trees nested deeper than a reader with the same limit accepts
    pub max_depth: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            checksum: true,
            debug_info: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl WriteOptions {
    /// Smallest output: no checksum, no locations
    pub fn compact() -> Self {
        Self {
            checksum: false,
            debug_info: false,
            ..Self::default()
        }
    }
}

/// Options controlling [`crate::TreeReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadOptions {
    /// Highest format version accepted
    pub max_supported_version: u16,
    /// Maximum node nesting before `DepthLimitExceeded`
    pub max_depth: usize,
    /// Verify the trailing checksum when HAS_CHECKSUM is set
    pub verify_checksum: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_supported_version: FORMAT_VERSION,
            max_depth: DEFAULT_MAX_DEPTH,
            verify_checksum: true,
        }
    }
}

impl ReadOptions {
    /// Tighter nesting limit for untrusted input
    pub fn strict() -> Self {
        Self {
            max_depth: 128,
            ..Self::default()
        }
    }
}

/// Configuration file contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    pub write: WriteOptions,
    pub read: ReadOptions,
}

impl CodecConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> CodecResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from disk.
    pub fn load(path: impl AsRef<Path>) -> CodecResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Serialize back to TOML
    pub fn to_toml(&self) -> String {
        // Both tables hold only scalars, which always serialize
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Reject values the codec cannot work with
    pub fn validate(&self) -> CodecResult<()> {
        if self.write.max_depth == 0 {
            return Err(CodecError::InvalidConfig(
                "write.max_depth must be at least 1".to_string(),
            ));
        }
        if self.read.max_depth == 0 {
            return Err(CodecError::InvalidConfig(
                "read.max_depth must be at least 1".to_string(),
            ));
        }
        if self.read.max_supported_version < MIN_SUPPORTED_VERSION {
            return Err(CodecError::InvalidConfig(format!(
                "read.max_supported_version must be at least {MIN_SUPPORTED_VERSION}"
            )));
        }
        Ok(())
    }
}
