//! Content hashing for integrity verification using xxh3
//!
//! The checksum is the 128-bit xxh3 digest of every byte before it (header,
//! string table and body), stored as 16 little-endian bytes at the end of the
//! file. Any single-byte change in the covered region changes the digest.

use std::fmt;

use xxhash_rust::xxh3::xxh3_128;

use crate::error::DecodeError;

/// Size of the trailing digest in bytes
pub const DIGEST_SIZE: usize = 16;

/// 128-bit content digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum(pub [u8; DIGEST_SIZE]);

impl Checksum {
    /// Digest of `data`
    #[inline]
    pub fn of(data: &[u8]) -> Self {
        Self(hash_bytes(data))
    }

    /// Read a stored digest from exactly 16 bytes
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; DIGEST_SIZE] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    pub const fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format_hash(&self.0)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Compute hash of raw bytes (128-bit).
#[inline]
pub fn hash_bytes(data: &[u8]) -> [u8; DIGEST_SIZE] {
    xxh3_128(data).to_le_bytes()
}

/// Digest of `data`
pub fn digest(data: &[u8]) -> Checksum {
    Checksum::of(data)
}

/// Check `data` against a stored digest
pub fn verify(data: &[u8], expected: &Checksum) -> bool {
    Checksum::of(data) == *expected
}

/// Append the digest of everything in `buf` to `buf`
pub fn append_checksum(buf: &mut Vec<u8>) -> Checksum {
    let sum = Checksum::of(buf);
    buf.extend_from_slice(sum.as_bytes());
    sum
}

/// Split `data` into covered bytes and trailing digest, then compare.
///
/// Returns the covered prefix on success. Input too short to hold a
/// header and a digest is reported as EOF; any mismatch is `CorruptData`
/// at the digest's offset.
pub fn verify_trailing(data: &[u8], header_size: usize) -> Result<&[u8], DecodeError> {
    let min = header_size + DIGEST_SIZE;
    if data.len() < min {
        return Err(DecodeError::UnexpectedEof {
            offset: data.len(),
            needed: min - data.len(),
        });
    }
    let split = data.len() - DIGEST_SIZE;
    let (covered, stored) = data.split_at(split);
    let actual = Checksum::of(covered);
    let mut digest = [0u8; DIGEST_SIZE];
    digest.copy_from_slice(stored);
    let expected = Checksum(digest);
    if actual != expected {
        return Err(DecodeError::CorruptData {
            expected: expected.to_hex(),
            actual: actual.to_hex(),
            offset: split,
        });
    }
    Ok(covered)
}

/// Format a hash as hex string.
pub fn format_hash(hash: &[u8; DIGEST_SIZE]) -> String {
    let mut s = String::with_capacity(DIGEST_SIZE * 2);
    for byte in hash {
        use std::fmt::Write;
        let _ = write!(s, "{byte:02x}");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        let data = b"hello world";
        assert_eq!(hash_bytes(data), hash_bytes(data));
        assert_ne!(hash_bytes(data), hash_bytes(b"hello worle"));
    }

    #[test]
    fn test_digest_verify() {
        let sum = digest(b"body bytes");
        assert!(verify(b"body bytes", &sum));
        assert!(!verify(b"body bytez", &sum));
    }

    #[test]
    fn test_format_hash() {
        let hex = format_hash(&[0xAB; DIGEST_SIZE]);
        assert_eq!(hex.len(), 32);
        assert!(hex.chars().all(|c| c == 'a' || c == 'b'));
    }

    #[test]
    fn test_verify_trailing_ok() {
        let mut buf = b"IRTB\x01\x00\x01\x00payload".to_vec();
        let sum = append_checksum(&mut buf);
        let covered = verify_trailing(&buf, 8).unwrap();
        assert_eq!(covered, b"IRTB\x01\x00\x01\x00payload");
        assert_eq!(Checksum::of(covered), sum);
    }

    #[test]
    fn test_verify_trailing_detects_flip() {
        let mut buf = b"IRTB\x01\x00\x01\x00payload".to_vec();
        append_checksum(&mut buf);
        for i in 0..buf.len() {
            let mut corrupted = buf.clone();
            corrupted[i] ^= 0x40;
            assert!(
                matches!(verify_trailing(&corrupted, 8), Err(DecodeError::CorruptData { .. })),
                "flip at {i} not detected"
            );
        }
    }

    #[test]
    fn test_verify_trailing_too_short() {
        let buf = [0u8; 20];
        assert!(matches!(
            verify_trailing(&buf, 8),
            Err(DecodeError::UnexpectedEof { offset: 20, needed: 4 })
        ));
    }
}
