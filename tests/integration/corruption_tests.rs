//! Rejection of damaged, truncated and foreign input.

use irtree::{read, read_with, write, write_with, CodecError, DecodeError, ReadOptions, WriteOptions};

use crate::common::sample_tree;

fn decode_error(result: Result<irtree::IrTree, CodecError>) -> DecodeError {
    match result {
        Err(CodecError::Decode(err)) => err,
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn test_bit_flip_detected() {
    let bytes = write(&sample_tree()).unwrap();
    for offset in 8..bytes.len() {
        let mut damaged = bytes.clone();
        damaged[offset] ^= 0x40;
        let err = decode_error(read(&damaged));
        assert!(
            matches!(err, DecodeError::CorruptData { .. }),
            "offset {offset}: {err}"
        );
    }
}

#[test]
fn test_bad_magic() {
    let mut bytes = write(&sample_tree()).unwrap();
    bytes[..4].copy_from_slice(b"JUNK");
    let err = decode_error(read(&bytes));
    assert!(matches!(err, DecodeError::BadMagic { offset: 0, .. }));
}

#[test]
fn test_newer_version_rejected() {
    let mut bytes = write(&sample_tree()).unwrap();
    bytes[4..6].copy_from_slice(&2u16.to_le_bytes());
    let err = decode_error(read(&bytes));
    assert!(matches!(
        err,
        DecodeError::UnsupportedVersion {
            found: 2,
            max_supported: 1,
            offset: 4
        }
    ));
}

#[test]
fn test_compressed_flag_rejected() {
    let mut bytes = write(&sample_tree()).unwrap();
    bytes[6] |= 0x02;
    let err = decode_error(read(&bytes));
    assert!(matches!(err, DecodeError::UnsupportedFlags { offset: 6, .. }));
}

#[test]
fn test_every_prefix_is_eof() {
    let bytes = write_with(&sample_tree(), &WriteOptions::compact()).unwrap();
    for len in 0..bytes.len() {
        let err = decode_error(read(&bytes[..len]));
        assert!(
            matches!(err, DecodeError::UnexpectedEof { .. }),
            "prefix {len}: {err}"
        );
    }
}

#[test]
fn test_trailing_garbage() {
    let mut bytes = write_with(&sample_tree(), &WriteOptions::compact()).unwrap();
    let end = bytes.len();
    bytes.extend_from_slice(&[0, 0, 0]);
    let err = decode_error(read(&bytes));
    assert!(matches!(
        err,
        DecodeError::TrailingBytes {
            remaining: 3,
            offset
        } if offset == end
    ));
}

#[test]
fn test_skip_checksum_verification() {
    let mut bytes = write(&sample_tree()).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    let options = ReadOptions {
        verify_checksum: false,
        ..ReadOptions::default()
    };
    assert_eq!(read_with(&bytes, &options).unwrap(), sample_tree());
}

#[test]
fn test_random_bytes_never_panic() {
    // Deterministic xorshift noise behind a valid header
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for _ in 0..256 {
        let mut bytes = b"IRTB\x01\x00\x00\x00".to_vec();
        for _ in 0..64 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            bytes.push(state as u8);
        }
        let _ = read(&bytes);
    }
}
