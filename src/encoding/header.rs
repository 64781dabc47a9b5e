//! File header for the binary tree format (.irtb)
//!
//! Binary format structure:
//! ```text
//! +----------------------+
//! | Magic: "IRTB"        | 4 bytes
//! | Version: u16         | 2 bytes
//! | Flags: u16           | 2 bytes
//! +----------------------+
//! | String table         | u32 count, (u16 len, utf8)*
//! +----------------------+
//! | Metadata             | u32 count, (key ref, value ref)*
//! | Declarations         | u32 count, declaration node*
//! +----------------------+
//! | Checksum (optional)  | xxh3 128-bit, 16 bytes
//! +----------------------+
//! ```
//!
//! All integers are little-endian.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::bytes::{ByteReader, ByteWriter};
use crate::error::DecodeError;

/// Magic number for .irtb files
pub const MAGIC: [u8; 4] = *b"IRTB";

/// Current binary format version
pub const FORMAT_VERSION: u16 = 1;

/// Oldest version this crate can decode
pub const MIN_SUPPORTED_VERSION: u16 = 1;

/// Header flag bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderFlags(u16);

impl HeaderFlags {
    /// A 16-byte checksum trails the body
    pub const HAS_CHECKSUM: u16 = 1 << 0;
    /// Body is compressed (never produced; rejected on read)
    pub const COMPRESSED: u16 = 1 << 1;
    /// Source locations are present in node prefixes
    pub const HAS_DEBUG_INFO: u16 = 1 << 2;
    /// Bits with no assigned meaning
    pub const RESERVED: u16 = !(Self::HAS_CHECKSUM | Self::COMPRESSED | Self::HAS_DEBUG_INFO);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn with(self, bit: u16, on: bool) -> Self {
        if on {
            Self(self.0 | bit)
        } else {
            Self(self.0 & !bit)
        }
    }

    pub const fn has_checksum(self) -> bool {
        self.0 & Self::HAS_CHECKSUM != 0
    }

    pub const fn is_compressed(self) -> bool {
        self.0 & Self::COMPRESSED != 0
    }

    pub const fn has_debug_info(self) -> bool {
        self.0 & Self::HAS_DEBUG_INFO != 0
    }

    pub const fn reserved_bits(self) -> u16 {
        self.0 & Self::RESERVED
    }
}

impl fmt::Display for HeaderFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.has_checksum() {
            names.push("checksum");
        }
        if self.is_compressed() {
            names.push("compressed");
        }
        if self.has_debug_info() {
            names.push("debug-info");
        }
        if names.is_empty() {
            write!(f, "{:#06x} (none)", self.0)
        } else {
            write!(f, "{:#06x} ({})", self.0, names.join(", "))
        }
    }
}

/// File header (first 8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Magic number (must be "IRTB")
    pub magic: [u8; 4],
    /// Format version
    pub version: u16,
    pub flags: HeaderFlags,
}

impl FileHeader {
    /// Size of the file header in bytes
    pub const SIZE: usize = 8;

    /// Create a new file header with current version
    pub const fn new(flags: HeaderFlags) -> Self {
        Self {
            magic: MAGIC,
            version: FORMAT_VERSION,
            flags,
        }
    }

    /// Validate the magic number
    pub fn validate_magic(&self) -> bool {
        self.magic == MAGIC
    }

    pub fn write(&self, out: &mut ByteWriter) {
        out.write_bytes(&self.magic);
        out.write_u16(self.version);
        out.write_u16(self.flags.bits());
    }

    /// Read the raw header fields without judging them
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(reader.read_bytes(4)?);
        let version = reader.read_u16()?;
        let flags = HeaderFlags::from_bits(reader.read_u16()?);
        Ok(Self {
            magic,
            version,
            flags,
        })
    }

    /// Reject headers this reader cannot decode.
    ///
    /// Checked in order: magic, version, flags.
    pub fn validate(&self, max_supported: u16) -> Result<(), DecodeError> {
        if !self.validate_magic() {
            return Err(DecodeError::BadMagic {
                found: self.magic,
                offset: 0,
            });
        }
        if self.version < MIN_SUPPORTED_VERSION || self.version > max_supported {
            return Err(DecodeError::UnsupportedVersion {
                found: self.version,
                max_supported,
                offset: 4,
            });
        }
        if self.flags.is_compressed() || self.flags.reserved_bits() != 0 {
            return Err(DecodeError::UnsupportedFlags {
                flags: self.flags.bits(),
                offset: 6,
            });
        }
        Ok(())
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new(HeaderFlags::empty())
    }
}
