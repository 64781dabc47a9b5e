//! Tree reader
//!
//! Decoding order is fixed: header, checksum, string table, body. Each step
//! fails with its own error before the next step looks at any byte, and no
//! partially decoded tree is ever returned.

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::bytes::ByteReader;
use super::hash::{format_hash, verify_trailing, DIGEST_SIZE};
use super::header::{FileHeader, HeaderFlags};
use super::intern::StringTable;
use super::node::{decode_body, DecodeContext};
use crate::config::ReadOptions;
use crate::error::DecodeError;
use crate::ir::IrTree;

/// Deserializes [`IrTree`]s from the binary format.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeReader {
    options: ReadOptions,
}

/// Header and string-table summary of an encoded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub version: u16,
    pub flags: HeaderFlags,
    pub has_checksum: bool,
    pub has_debug_info: bool,
    /// Stored checksum as hex, if present
    pub checksum: Option<String>,
    pub total_bytes: usize,
    pub string_count: usize,
    pub string_table_bytes: usize,
    pub body_bytes: usize,
    pub strings: Vec<String>,
}

/// Header plus the slice the checksum covers
struct Opened<'a> {
    header: FileHeader,
    covered: &'a [u8],
}

impl TreeReader {
    pub fn new(options: ReadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Decode a complete tree from `data`.
    pub fn read(&self, data: &[u8]) -> Result<IrTree, DecodeError> {
        let opened = self.open(data)?;
        let mut reader = ByteReader::at(opened.covered, FileHeader::SIZE);
        let strings = StringTable::decode(&mut reader)?;
        trace!(strings = strings.len(), offset = reader.position(), "loaded string table");

        let mut ctx = DecodeContext::new(
            reader,
            &strings,
            opened.header.flags.has_debug_info(),
            self.options.max_depth,
        );
        let tree = decode_body(&mut ctx)?;

        let rest = ctx.reader();
        if !rest.is_at_end() {
            return Err(DecodeError::TrailingBytes {
                remaining: rest.remaining(),
                offset: rest.position(),
            });
        }

        debug!(
            bytes = data.len(),
            strings = strings.len(),
            declarations = tree.declarations.len(),
            flags = %opened.header.flags,
            "decoded tree"
        );
        Ok(tree)
    }

    /// Read header and string table without decoding the body.
    pub fn inspect(&self, data: &[u8]) -> Result<FileSummary, DecodeError> {
        let opened = self.open(data)?;
        let mut reader = ByteReader::at(opened.covered, FileHeader::SIZE);
        let strings = StringTable::decode(&mut reader)?;
        let table_end = reader.position();
        let flags = opened.header.flags;

        let checksum = flags.has_checksum().then(|| {
            let mut digest = [0u8; DIGEST_SIZE];
            digest.copy_from_slice(&data[opened.covered.len()..]);
            format_hash(&digest)
        });

        Ok(FileSummary {
            version: opened.header.version,
            flags,
            has_checksum: flags.has_checksum(),
            has_debug_info: flags.has_debug_info(),
            checksum,
            total_bytes: data.len(),
            string_count: strings.len(),
            string_table_bytes: table_end - FileHeader::SIZE,
            body_bytes: opened.covered.len() - table_end,
            strings: strings.strings().to_vec(),
        })
    }

    /// Validate the header and strip (and verify) the checksum
    fn open<'a>(&self, data: &'a [u8]) -> Result<Opened<'a>, DecodeError> {
        let header = FileHeader::read(&mut ByteReader::new(data))?;
        if let Err(err) = header.validate(self.options.max_supported_version) {
            warn!(error = %err, "rejected file header");
            return Err(err);
        }

        let covered = if !header.flags.has_checksum() {
            data
        } else if self.options.verify_checksum {
            verify_trailing(data, FileHeader::SIZE)?
        } else {
            let min = FileHeader::SIZE + DIGEST_SIZE;
            if data.len() < min {
                return Err(DecodeError::UnexpectedEof {
                    offset: data.len(),
                    needed: min - data.len(),
                });
            }
            &data[..data.len() - DIGEST_SIZE]
        };

        trace!(version = header.version, flags = %header.flags, "header accepted");
        Ok(Opened { header, covered })
    }
}
