//! Tree writer
//!
//! One call runs the whole pipeline: validate, collect strings, then emit
//! header, string table, body and (optionally) the checksum. The tree is
//! only borrowed.

use tracing::{debug, trace};

use super::bytes::ByteWriter;
use super::hash::append_checksum;
use super::header::{FileHeader, HeaderFlags};
use super::intern::StringInterner;
use super::node::{encode_body, EncodeContext};
use crate::config::WriteOptions;
use crate::error::EncodeError;
use crate::ir::IrTree;
use crate::validate::validate_with;

/// Serializes [`IrTree`]s to the binary format.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeWriter {
    options: WriteOptions,
}

impl TreeWriter {
    pub fn new(options: WriteOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Header flags this writer sets
    pub fn flags(&self) -> HeaderFlags {
        HeaderFlags::empty()
            .with(HeaderFlags::HAS_CHECKSUM, self.options.checksum)
            .with(HeaderFlags::HAS_DEBUG_INFO, self.options.debug_info)
    }

    /// Encode `tree` into a fresh buffer.
    pub fn write(&self, tree: &IrTree) -> Result<Vec<u8>, EncodeError> {
        let errors = validate_with(tree, &self.options);
        if !errors.is_empty() {
            debug!(errors = errors.len(), "tree rejected by validation");
            return Err(EncodeError::ValidationFailed(errors));
        }

        let strings = StringInterner::collect(tree, self.options.debug_info)?;
        let flags = self.flags();

        let mut out = ByteWriter::with_capacity(FileHeader::SIZE + strings.len() * 8);
        FileHeader::new(flags).write(&mut out);
        strings.encode(&mut out)?;
        let table_end = out.position();
        trace!(
            strings = strings.len(),
            table_bytes = table_end - FileHeader::SIZE,
            "wrote string table"
        );

        let mut ctx = EncodeContext::new(&mut out, &strings, self.options.debug_info);
        encode_body(&mut ctx, tree)?;
        trace!(body_bytes = out.position() - table_end, "wrote body");

        let mut bytes = out.into_inner();
        if self.options.checksum {
            let sum = append_checksum(&mut bytes);
            trace!(checksum = %sum, "appended checksum");
        }

        debug!(
            bytes = bytes.len(),
            strings = strings.len(),
            declarations = tree.declarations.len(),
            flags = %flags,
            "encoded tree"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::hash::DIGEST_SIZE;
    use crate::encoding::MAGIC;
    use crate::ir::{DeclKind, Declaration, NodeMeta, ProgramUnit};

    fn empty_unit() -> IrTree {
        let mut tree = IrTree::new();
        tree.add_declaration(Declaration::new(
            NodeMeta::synthetic("u0"),
            DeclKind::ProgramUnit(ProgramUnit {
                path: "lib/a.dart".to_string(),
                imports: Vec::new(),
                declarations: Vec::new(),
            }),
        ));
        tree
    }

    #[test]
    fn test_empty_tree_layout() {
        let bytes = TreeWriter::new(WriteOptions::compact())
            .write(&IrTree::new())
            .unwrap();
        // header, empty table, empty metadata, empty declaration list
        let mut expected = MAGIC.to_vec();
        expected.extend_from_slice(&[1, 0, 0, 0]);
        expected.extend_from_slice(&[0; 12]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_flags_follow_options() {
        let writer = TreeWriter::default();
        assert!(writer.flags().has_checksum());
        assert!(writer.flags().has_debug_info());

        let bytes = writer.write(&empty_unit()).unwrap();
        assert_eq!(&bytes[6..8], &[0x05, 0x00]);

        let compact = TreeWriter::new(WriteOptions::compact())
            .write(&empty_unit())
            .unwrap();
        assert_eq!(&compact[6..8], &[0x00, 0x00]);
        // checksum plus the location presence byte of the unit
        assert_eq!(bytes.len(), compact.len() + DIGEST_SIZE + 1);
    }

    #[test]
    fn test_validation_failure_writes_nothing() {
        let mut tree = empty_unit();
        tree.declarations[0].meta.id.clear();
        match TreeWriter::default().write(&tree) {
            Err(EncodeError::ValidationFailed(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_write_is_deterministic() {
        let tree = empty_unit();
        let writer = TreeWriter::default();
        assert_eq!(writer.write(&tree).unwrap(), writer.write(&tree).unwrap());
    }
}
