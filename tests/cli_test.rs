//! Integration tests for the array-api-stubgen binary.

mod common;

use assert_cmd::assert::OutputAssertExt;
use common::{copy_fixture, fixture_root, write_module};
use serde_json::Value;
use std::process::Command;
use tempfile::TempDir;

fn stubgen() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_array-api-stubgen"));
    cmd.env_remove("STUBGEN_ROOT")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_namespace_json_output() {
    let assert = stubgen()
        .args(["namespace", "--format", "json", "--root"])
        .arg(fixture_root())
        .assert()
        .success();

    let json: Value = serde_json::from_str(&stdout(assert.get_output())).unwrap();
    for key in [
        "functions",
        "array_methods",
        "dtype_methods",
        "category_to_functions",
        "extension_to_functions",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    let matmul = &json["extension_to_functions"]["linalg"]["matmul"];
    assert_eq!(matmul["module"], "array_api.linalg");
    assert_eq!(matmul["alias_of"], "array_api.matmul");
    assert_eq!(matmul["doc"], json["functions"]["matmul"]["doc"]);
}

#[test]
fn test_namespace_single_category() {
    let assert = stubgen()
        .args(["namespace", "--category", "set", "--root"])
        .arg(fixture_root())
        .assert()
        .success();

    let out = stdout(assert.get_output());
    assert!(out.contains("<function array_api.unique_values(x: array, /) -> array>"));
    assert!(!out.contains("array_api.abs"));
}

#[test]
fn test_namespace_unknown_category_fails() {
    let assert = stubgen()
        .args(["namespace", "--category", "statistical", "--root"])
        .arg(fixture_root())
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("elementwise, linear_algebra, set"), "{stderr}");
}

#[test]
fn test_check_passes_on_fixture() {
    let assert = stubgen()
        .arg("check")
        .arg("--root")
        .arg(fixture_root())
        .assert()
        .success();
    assert!(stdout(assert.get_output()).contains("no violations"));
}

#[test]
fn test_check_rejects_released_version() {
    let assert = stubgen()
        .args(["check", "--api-version", "2023.12", "--root"])
        .arg(fixture_root())
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("not yet supported"), "{stderr}");
}

#[test]
fn test_check_reports_method_without_self() {
    let (_temp, root) = copy_fixture();
    write_module(
        &root,
        "data_types.py",
        "__all__ = [\"__eq__\"]\n\ndef __eq__(other, /) -> bool:\n    \"\"\"Equality.\"\"\"\n",
    );

    let assert = stubgen()
        .args(["check", "--root"])
        .arg(&root)
        .assert()
        .failure();
    let out = stdout(assert.get_output());
    assert!(out.contains("[dtype-methods]"), "{out}");
    assert!(out.contains("does not take self first"), "{out}");
}

#[test]
fn test_generate_writes_protocol_module() {
    let (_temp, root) = copy_fixture();

    stubgen()
        .args(["generate", "--root"])
        .arg(&root)
        .assert()
        .success();

    let generated = std::fs::read_to_string(root.join("_draft").join("_namespace.py")).unwrap();
    assert!(generated.starts_with("# Auto generated Protocol classes (Do not edit)\n"));
    assert!(generated.contains("class ArrayNamespace("));
}

#[test]
fn test_config_file_sets_root_and_tag() {
    let (temp, root) = copy_fixture();
    let config_path = temp.path().join("stubgen.toml");
    std::fs::write(
        &config_path,
        format!(
            "[stubs]\nroot = {:?}\n\n[namespace]\ntag = \"xp\"\n",
            root.to_string_lossy()
        ),
    )
    .unwrap();

    let assert = stubgen()
        .args(["namespace", "--category", "elementwise", "--config"])
        .arg(&config_path)
        .assert()
        .success();
    assert!(stdout(assert.get_output()).contains("<function xp.abs(x: array, /) -> array>"));
}

#[test]
fn test_init_creates_config() {
    let temp = TempDir::new().unwrap();
    stubgen()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success();
    assert!(temp.path().join(".stubgen.toml").exists());

    stubgen()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .failure();
}
