//! Encoding and decoding infrastructure
//!
//! Provides the binary (.irtb) tree format.

mod bytes;
mod intern;
mod header;
mod node;
mod writer;
mod reader;
pub mod hash;
pub mod tags;

pub use bytes::{ByteReader, ByteWriter};
pub use intern::{StringInterner, StringTable, MAX_STRING_LEN};
pub use header::{FileHeader, HeaderFlags, FORMAT_VERSION, MAGIC, MIN_SUPPORTED_VERSION};
pub use node::{
    decode_body, decode_declaration, decode_expression, decode_statement, decode_type_ref,
    encode_body, encode_declaration, encode_expression, encode_statement, encode_type_ref,
    DecodeContext, EncodeContext,
};
pub use writer::TreeWriter;
pub use reader::{FileSummary, TreeReader};
pub use hash::{Checksum, DIGEST_SIZE};
pub use tags::{tag_name, NodeFamily};
