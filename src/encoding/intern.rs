//! String interning for the string table
//!
//! Write side: [`StringInterner`] wraps a `lasso::Rodeo`. A `Spur`'s dense
//! position is the table index, so indices follow first-interning order and
//! the table is emitted in that order. [`StringInterner::collect`] runs the
//! pre-pass that interns every string of a tree before any body byte exists.
//!
//! Read side: [`StringTable`] holds the decoded entries by index.
//!
//! # Encoding Format
//! ```text
//! [count: u32]
//! [string1_len: u16][string1_bytes: utf8]
//! [string2_len: u16][string2_bytes: utf8]
//! ...
//! ```

use lasso::{Key, Rodeo, Spur};
use rustc_hash::FxHashSet;
use tracing::trace;

use super::bytes::{ByteReader, ByteWriter};
use crate::error::{DecodeError, EncodeError};
use crate::ir::{IrTree, NodeMeta, StrRole, Visitor};

/// Longest string the 2-byte length prefix can describe
pub const MAX_STRING_LEN: usize = u16::MAX as usize;

/// String interner for deduplicating strings during encoding.
#[derive(Debug, Default)]
pub struct StringInterner {
    rodeo: Rodeo,
}

impl StringInterner {
    /// Create a new empty interner
    pub fn new() -> Self {
        Self {
            rodeo: Rodeo::default(),
        }
    }

    /// Intern every string of `tree`.
    ///
    /// With `debug_info` off, source locations are not written, so their
    /// file paths are not interned either.
    pub fn collect(tree: &IrTree, debug_info: bool) -> Result<Self, EncodeError> {
        let mut collector = StringCollector {
            interner: Self::new(),
            debug_info,
            error: None,
        };
        collector.visit_tree(tree);
        if let Some(err) = collector.error {
            return Err(err);
        }
        trace!(strings = collector.interner.len(), "collected string table");
        Ok(collector.interner)
    }

    /// Intern a string, returning its table index.
    ///
    /// Interning the same string twice returns the same index.
    pub fn intern(&mut self, value: &str) -> Result<u32, EncodeError> {
        if value.len() > MAX_STRING_LEN {
            return Err(EncodeError::StringTooLong {
                len: value.len(),
                max: MAX_STRING_LEN,
            });
        }
        let spur = self
            .rodeo
            .try_get_or_intern(value)
            .map_err(|_| EncodeError::InternerFull)?;
        Ok(index_of(spur))
    }

    /// Get the index for a string if already interned
    pub fn get(&self, value: &str) -> Option<u32> {
        self.rodeo.get(value).map(index_of)
    }

    /// Resolve an index to its string
    pub fn resolve(&self, index: u32) -> Result<&str, EncodeError> {
        Spur::try_from_usize(index as usize)
            .and_then(|spur| self.rodeo.try_resolve(&spur))
            .ok_or(EncodeError::OutOfBounds {
                index,
                len: self.len() as u32,
            })
    }

    /// Number of interned strings
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }

    /// Iterate over all (index, string) pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.rodeo.iter().map(|(spur, s)| (index_of(spur), s))
    }

    /// Write the string table
    pub fn encode(&self, out: &mut ByteWriter) -> Result<(), EncodeError> {
        out.write_count(self.len())?;
        for (_, s) in self.iter() {
            // `intern` already bounded the length
            out.write_u16(s.len() as u16);
            out.write_bytes(s.as_bytes());
        }
        Ok(())
    }
}

#[inline]
fn index_of(spur: Spur) -> u32 {
    spur.into_usize() as u32
}

/// Visitor feeding every written string into the interner
struct StringCollector {
    interner: StringInterner,
    debug_info: bool,
    error: Option<EncodeError>,
}

impl Visitor for StringCollector {
    fn visit_meta(&mut self, meta: &NodeMeta) {
        // Only the id is written when locations are stripped
        if self.debug_info {
            crate::ir::walk_meta(self, meta);
        } else {
            self.visit_str(StrRole::Id, &meta.id);
        }
    }

    fn visit_str(&mut self, _role: StrRole, value: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.interner.intern(value) {
            self.error = Some(err);
        }
    }
}

/// Decoded string table, indexed by reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    strings: Vec<String>,
}

impl StringTable {
    /// Read a string table, rejecting invalid UTF-8 and duplicate entries
    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let count = reader.read_count()?;
        let mut strings = Vec::with_capacity(count);
        let mut seen = FxHashSet::default();

        for index in 0..count {
            let len = reader.read_u16()? as usize;
            let offset = reader.position();
            let bytes = reader.read_bytes(len)?;
            let s = std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { offset })?;
            if !seen.insert(s) {
                return Err(DecodeError::DuplicateString {
                    index: index as u32,
                    offset,
                });
            }
            strings.push(s.to_owned());
        }

        Ok(Self { strings })
    }

    /// Get string by index
    pub fn get(&self, index: u32) -> Option<&str> {
        self.strings.get(index as usize).map(String::as_str)
    }

    /// Resolve a reference read at `offset`
    pub fn resolve(&self, index: u32, offset: usize) -> Result<&str, DecodeError> {
        self.get(index).ok_or(DecodeError::StringRefOutOfBounds {
            index,
            table_size: self.strings.len() as u32,
            offset,
        })
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// All strings in index order
    pub fn strings(&self) -> &[String] {
        &self.strings
    }
}
