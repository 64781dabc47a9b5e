//! File helpers and format conversion.

use irtree::{convert, decode_file, encode_file, CodecConfig, Format, ReadOptions, WriteOptions};
use tempfile::TempDir;

use crate::common::sample_tree;

#[test]
fn test_binary_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tree.irtb");
    encode_file(&path, &sample_tree(), &WriteOptions::default()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], b"IRTB");
    assert_eq!(decode_file(&path, &ReadOptions::default()).unwrap(), sample_tree());
}

#[test]
fn test_json_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tree.json");
    encode_file(&path, &sample_tree(), &WriteOptions::default()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"tag\": \"program_unit\""));
    assert_eq!(decode_file(&path, &ReadOptions::default()).unwrap(), sample_tree());
}

#[test]
fn test_convert_json_to_binary_and_back() {
    let dir = TempDir::new().unwrap();
    let json = dir.path().join("in.json");
    let binary = dir.path().join("mid.irtb");
    let back = dir.path().join("out.json");

    encode_file(&json, &sample_tree(), &WriteOptions::default()).unwrap();
    convert(&json, &binary, &ReadOptions::default(), &WriteOptions::default()).unwrap();
    convert(&binary, &back, &ReadOptions::default(), &WriteOptions::default()).unwrap();

    assert_eq!(Format::from_extension(&binary), Format::Binary);
    assert_eq!(
        std::fs::read_to_string(&json).unwrap(),
        std::fs::read_to_string(&back).unwrap()
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = decode_file(dir.path().join("absent.irtb"), &ReadOptions::default()).unwrap_err();
    assert!(matches!(err, irtree::CodecError::Io(_)));
}

#[test]
fn test_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("irtree.toml");
    std::fs::write(
        &path,
        "[write]\nchecksum = false\n\n[read]\nmax_depth = 64\n",
    )
    .unwrap();

    let config = CodecConfig::load(&path).unwrap();
    assert!(!config.write.checksum);
    assert!(config.write.debug_info);
    assert_eq!(config.read.max_depth, 64);
}
