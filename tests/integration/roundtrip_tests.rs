//! Binary and JSON roundtrip through the public API.

use irtree::ir::IrTree;
use irtree::json::{from_json_str, to_json_string};
use irtree::{inspect, read, read_with, write, write_with, ReadOptions, WriteOptions};

use crate::common::sample_tree;

#[test]
fn test_sample_roundtrip() {
    let tree = sample_tree();
    let bytes = write(&tree).unwrap();
    assert_eq!(read(&bytes).unwrap(), tree);
}

#[test]
fn test_header_prefix() {
    let bytes = write(&sample_tree()).unwrap();
    assert_eq!(&bytes[..4], b"IRTB");
    assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), irtree::FORMAT_VERSION);
    // checksum | debug info
    assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 0x0005);
}

#[test]
fn test_compact_is_smaller_and_locationless() {
    let tree = sample_tree();
    let full = write(&tree).unwrap();
    let compact = write_with(&tree, &WriteOptions::compact()).unwrap();
    assert!(compact.len() < full.len());

    let summary = inspect(&compact).unwrap();
    assert!(!summary.has_checksum);
    assert!(!summary.has_debug_info);
    // Location file paths are not interned without debug info
    let decoded = read(&compact).unwrap();
    assert_ne!(decoded, tree);
    assert_eq!(decoded.declarations.len(), 1);
    assert!(decoded.declarations[0].meta.location.is_none());
}

#[test]
fn test_strings_deduplicated() {
    let summary = inspect(&write(&sample_tree()).unwrap()).unwrap();
    let mut sorted = summary.strings.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), summary.strings.len());
    assert_eq!(summary.string_count, summary.strings.len());
    assert!(summary.strings.iter().any(|s| s == "lib/main.dart"));
}

#[test]
fn test_empty_tree() {
    let tree = IrTree::new();
    let bytes = write_with(
        &tree,
        &WriteOptions {
            checksum: false,
            debug_info: false,
            ..WriteOptions::default()
        },
    )
    .unwrap();
    // header + empty string table + empty metadata + empty declarations
    assert_eq!(bytes.len(), 8 + 4 + 4 + 4);
    assert_eq!(read(&bytes).unwrap(), tree);
}

#[test]
fn test_strict_read_options() {
    let bytes = write(&sample_tree()).unwrap();
    assert_eq!(read_with(&bytes, &ReadOptions::strict()).unwrap(), sample_tree());
}

#[test]
fn test_json_to_binary_to_json() {
    let text = to_json_string(&sample_tree(), true).unwrap();
    let tree = from_json_str(&text).unwrap();
    let decoded = read(&write(&tree).unwrap()).unwrap();
    assert_eq!(to_json_string(&decoded, true).unwrap(), text);
}

#[test]
fn test_deterministic_output() {
    let a = write(&sample_tree()).unwrap();
    let b = write(&sample_tree()).unwrap();
    assert_eq!(a, b);
}
