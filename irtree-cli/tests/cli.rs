//! CLI integration tests.
//!
//! Cargo builds the `irtree` binary before running these and passes its
//! path in `CARGO_BIN_EXE_irtree`.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

#[path = "../../tests/integration/common.rs"]
mod common;

use common::sample_tree;

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_irtree"))
        .args(args)
        .output()
        .expect("failed to run irtree")
}

fn write_sample_json(dir: &Path) -> PathBuf {
    let path = dir.join("sample.json");
    irtree::encode_file(&path, &sample_tree(), &irtree::WriteOptions::default()).unwrap();
    path
}

fn s(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn encode_sample(dir: &Path) -> PathBuf {
    let json = write_sample_json(dir);
    let binary = dir.join("sample.irtb");
    let out = run_cli(&["encode", s(&json), "-o", s(&binary)]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    binary
}

#[test]
fn test_encode_then_verify() {
    let dir = TempDir::new().unwrap();
    let binary = encode_sample(dir.path());

    let out = run_cli(&["verify", s(&binary)]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("OK: "));
}

#[test]
fn test_inspect_json_output() {
    let dir = TempDir::new().unwrap();
    let binary = encode_sample(dir.path());

    let out = run_cli(&["inspect", s(&binary)]);
    assert!(out.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["version"], 1);
    assert_eq!(summary["has_checksum"], true);
}

#[test]
fn test_no_checksum_flag() {
    let dir = TempDir::new().unwrap();
    let json = write_sample_json(dir.path());
    let binary = dir.path().join("plain.irtb");

    let out = run_cli(&["--no-checksum", "encode", s(&json), "-o", s(&binary)]);
    assert!(out.status.success());
    let out = run_cli(&["inspect", s(&binary)]);
    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["has_checksum"], false);
}

#[test]
fn test_verify_rejects_corruption() {
    let dir = TempDir::new().unwrap();
    let binary = dir.path().join("bad.irtb");
    let mut bytes = irtree::write(&sample_tree()).unwrap();
    bytes[20] ^= 0xFF;
    std::fs::write(&binary, bytes).unwrap();

    let out = run_cli(&["verify", s(&binary)]);
    assert!(!out.status.success());
}

#[test]
fn test_decode_roundtrip() {
    let dir = TempDir::new().unwrap();
    let binary = encode_sample(dir.path());
    let back = dir.path().join("back.json");

    let out = run_cli(&["decode", s(&binary), "-o", s(&back)]);
    assert!(out.status.success());

    let decoded = irtree::decode_file(&back, &irtree::ReadOptions::default()).unwrap();
    assert_eq!(decoded, sample_tree());
}

#[test]
fn test_validate_reports_errors() {
    let dir = TempDir::new().unwrap();
    let mut tree = sample_tree();
    tree.declarations[0].meta.id.clear();
    let json = dir.path().join("invalid.json");
    std::fs::write(&json, irtree::json::to_json_string(&tree, true).unwrap()).unwrap();

    let out = run_cli(&["--compact", "validate", s(&json)]);
    assert_eq!(out.status.code(), Some(1));
    let errors: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(errors[0]["kind"]["kind"], "empty_field");
}
