// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI integration tests.
//!
//! These tests run the actual protocodec binary and verify its behavior.

mod common;

use std::{
    path::PathBuf,
    process::{Command, Output},
};

use common::fixture_pool;

/// Get the path to the built protocodec binary
fn protocodec_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    // The test binary is in target/debug/deps/
    // The protocodec binary is in target/debug/
    path.pop(); // deps
    path.pop(); // debug or release
    path.push(format!("protocodec{}", std::env::consts::EXE_SUFFIX));
    path
}

/// Unique scratch file under the system temp directory
fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("protocodec-{}-{name}", std::process::id()))
}

/// Run protocodec with arguments
fn run(args: &[&str]) -> Output {
    let bin = protocodec_bin();
    Command::new(&bin)
        .args(args)
        .output()
        .unwrap_or_else(|_| panic!("Failed to run {:?}", bin))
}

/// Run protocodec and assert success
fn run_ok(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "Command failed: {:?}\nstdout: {}\nstderr: {}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run protocodec and assert failure
fn run_err(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        !output.status.success(),
        "Command should have failed but succeeded: {:?}",
        args
    );
    String::from_utf8_lossy(&output.stderr).to_string()
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    let output = run_ok(&["--help"]);
    assert!(output.contains("Schema-driven protobuf codec toolkit"));
    assert!(output.contains("schema"));
    assert!(output.contains("decode"));
    assert!(output.contains("roundtrip"));
}

#[test]
fn test_cli_version() {
    let output = run_ok(&["--version"]);
    assert!(output.contains(env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// Schema Command
// ============================================================================

#[test]
fn test_schema_list_builtin() {
    let output = run_ok(&["schema", "list"]);
    assert!(output.contains("cosmos.authz.v1beta1.GenericAuthorization"));
    assert!(output.contains("cosmos.upgrade.v1beta1.Plan"));
    assert!(output.contains("google.protobuf.Timestamp"));
}

#[test]
fn test_schema_list_json() {
    let output = run_ok(&["schema", "list", "--json"]);
    let items: serde_json::Value = serde_json::from_str(&output).unwrap();
    let items = items.as_array().unwrap();
    assert!(items
        .iter()
        .any(|item| item["message_type"] == "cosmos.authz.v1beta1.Grant"));
}

#[test]
fn test_schema_show() {
    let output = run_ok(&["schema", "show", "cosmos.upgrade.v1beta1.Plan"]);
    assert!(output.contains("message cosmos.upgrade.v1beta1.Plan {"));
    assert!(output.contains("string name = 1;"));
    assert!(output.contains("int64 height = 3;"));
}

#[test]
fn test_schema_show_unknown_type() {
    let stderr = run_err(&["schema", "show", "no.such.Type"]);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("no.such.Type"));
}

#[test]
fn test_schema_show_from_descriptor_set() {
    let path = scratch_path("fixture.pb");
    std::fs::write(&path, fixture_pool().encode_file_descriptor_set()).unwrap();

    let output = run_ok(&[
        "schema",
        "show",
        "fixture.v1.Sample",
        "--descriptor-set",
        path.to_str().unwrap(),
        "--json",
    ]);
    let _ = std::fs::remove_file(&path);

    let detail: serde_json::Value = serde_json::from_str(&output).unwrap();
    let fields = detail["fields"].as_array().unwrap();
    let maybe = fields.iter().find(|f| f["name"] == "maybe").unwrap();
    assert_eq!(maybe["optional"], true);
    let choice = fields.iter().find(|f| f["name"] == "choice_id").unwrap();
    assert_eq!(choice["oneof"], "choice");
}

// ============================================================================
// Decode Command
// ============================================================================

#[test]
fn test_decode_hex() {
    let output = run_ok(&[
        "decode",
        "cosmos.upgrade.v1beta1.Plan",
        "--hex",
        "0a02763218 64",
    ]);
    assert!(output.contains("name: \"v2\""));
    assert!(output.contains("height: 100"));
}

#[test]
fn test_decode_json() {
    let output = run_ok(&[
        "decode",
        "cosmos.authz.v1beta1.GenericAuthorization",
        "--hex",
        "0x0a032f612e",
        "--json",
    ]);
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["msg"], "/a.");
}

#[test]
fn test_decode_reports_unknown_fields() {
    let output = run_ok(&[
        "decode",
        "cosmos.upgrade.v1beta1.ModuleVersion",
        "--hex",
        "1001 c83e07",
    ]);
    assert!(output.contains("version: 1"));
    assert!(output.contains("#1001"));
    assert!(output.contains("preserved"));

    let output = run_ok(&[
        "decode",
        "cosmos.upgrade.v1beta1.ModuleVersion",
        "--hex",
        "1001 c83e07",
        "--discard-unknown",
    ]);
    assert!(!output.contains("#1001"));
}

#[test]
fn test_decode_with_config_file() {
    let config = scratch_path("options.toml");
    std::fs::write(&config, "[unmarshal]\ndiscard_unknown = true\n").unwrap();

    let output = run_ok(&[
        "decode",
        "cosmos.upgrade.v1beta1.ModuleVersion",
        "--hex",
        "c83e07",
        "--config",
        config.to_str().unwrap(),
    ]);
    let _ = std::fs::remove_file(&config);
    assert!(output.contains("no populated fields"));
}

#[test]
fn test_decode_from_file() {
    let payload = scratch_path("payload.bin");
    std::fs::write(&payload, [0x0a, 0x01, b'x']).unwrap();

    let output = run_ok(&[
        "decode",
        "cosmos.upgrade.v1beta1.ModuleVersion",
        "--file",
        payload.to_str().unwrap(),
    ]);
    let _ = std::fs::remove_file(&payload);
    assert!(output.contains("name: \"x\""));
}

#[test]
fn test_decode_truncated_payload_fails() {
    let stderr = run_err(&["decode", "cosmos.upgrade.v1beta1.Plan", "--hex", "0a80"]);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("position="));
}

#[test]
fn test_decode_requires_a_payload() {
    run_err(&["decode", "cosmos.upgrade.v1beta1.Plan"]);
    run_err(&[
        "decode",
        "cosmos.upgrade.v1beta1.Plan",
        "--hex",
        "00",
        "--file",
        "x.bin",
    ]);
}

#[test]
fn test_decode_invalid_hex() {
    let stderr = run_err(&["decode", "cosmos.upgrade.v1beta1.Plan", "--hex", "zz"]);
    assert!(stderr.contains("Invalid hex payload"));
}

// ============================================================================
// Roundtrip Command
// ============================================================================

#[test]
fn test_roundtrip_canonical_payload() {
    let output = run_ok(&[
        "roundtrip",
        "cosmos.upgrade.v1beta1.Plan",
        "--hex",
        "0a0276321864",
    ]);
    assert!(output.contains("identical: yes"));
}

#[test]
fn test_roundtrip_reorders_fields() {
    let output = run_ok(&[
        "roundtrip",
        "cosmos.upgrade.v1beta1.Plan",
        "--hex",
        "18640a027632",
        "--json",
    ]);
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(report["identical"], false);
    assert_eq!(report["output"], "0a0276321864");
}
