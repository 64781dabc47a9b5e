//! Integration tests for the irtree crate
//!
//! Tests full pipeline flows including:
//! - Binary roundtrip of every node variant
//! - String table deduplication and size accounting
//! - Corruption, truncation and version rejection
//! - JSON mirror roundtrip
