//! End-to-end tests for the protocol generator on the fixture draft package.

mod common;

use array_api_stubgen::config::ProtocolConfig;
use array_api_stubgen::protocol::render::DISCLAIMER;
use array_api_stubgen::protocol::ProtocolGenerator;
use common::{copy_fixture, write_module};
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::fs;

fn generator() -> ProtocolGenerator {
    ProtocolGenerator::new(ProtocolConfig::default(), "_types")
}

fn generate() -> String {
    let (_temp, root) = copy_fixture();
    let summary = generator().run(&root.join("_draft")).unwrap();
    fs::read_to_string(summary.out_path).unwrap()
}

#[test]
fn test_summary_counts_protocols_and_type_vars() {
    let (_temp, root) = copy_fixture();
    let summary = generator().run(&root.join("_draft")).unwrap();

    assert_eq!(summary.out_path, root.join("_draft").join("_namespace.py"));
    assert_eq!(summary.type_vars, vec!["array", "device", "dtype"]);
    // 15 functions, two extensions and the umbrella protocol
    assert_eq!(summary.protocol_count, 18);
    // the `_array` class in array_object
    assert_eq!(summary.skipped_statements, 1);
}

#[test]
fn test_every_function_gets_a_protocol_named_after_it() {
    let output = generate();
    for name in [
        "__eq__",
        "abs",
        "add",
        "equal",
        "fft",
        "fftfreq",
        "cross",
        "matmul",
        "trace",
        "vecdot",
        "tensordot",
        "unique_counts",
        "unique_values",
    ] {
        assert!(
            output.contains(&format!("\nclass {}(Protocol", name)),
            "missing protocol for {name}"
        );
    }
}

#[test]
fn test_protocols_only_bind_referenced_type_vars() {
    let output = generate();
    assert!(output.contains("class abs(Protocol[array]):"));
    assert!(output.contains("class fftfreq(Protocol[device]):"));
    assert!(output.contains("class trace(Protocol[array, dtype]):"));
    assert!(output.contains("class __eq__(Protocol[dtype]):"));
    // `Tuple[array, array]` only appears in the return annotation
    assert!(output.contains("class unique_counts(Protocol[array]):"));
}

#[test]
fn test_function_protocol_layout() {
    let output = generate();
    let expected = indoc! {r#"
        @runtime_checkable
        class cross(Protocol[array]):
            """Returns the cross product of 3-element vectors."""

            @abstractmethod
            def __call__(self, x1: array, x2: array, /, *, axis: int = -1) -> array:
                raise NotImplementedError
    "#};
    assert!(output.contains(expected), "{output}");
}

#[test]
fn test_extension_and_umbrella_protocols() {
    let output = generate();

    assert!(output.contains("class FftNamespace(Protocol[array, device]):"));
    assert!(output.contains("class LinalgNamespace(Protocol[array, dtype]):"));
    assert!(output.contains("class ArrayNamespace(Protocol[dtype, array, device]):"));

    let umbrella = &output[output.find("class ArrayNamespace").unwrap()..];
    assert!(umbrella.contains("    abs: abs[array]\n"));
    assert!(umbrella.contains("    pi: float\n"));
    assert!(umbrella.contains("    fft: FftNamespace[array, device]\n"));
    assert!(umbrella.contains("    linalg: LinalgNamespace[array, dtype]\n"));
    // extension members live on their own protocol only
    assert!(!umbrella.contains("    cross: "));
    assert!(umbrella.contains(
        "    pi: float\n    \"\"\"IEEE 754 floating-point representation of the mathematical constant ``π``.\"\"\"\n"
    ));
}

#[test]
fn test_header_and_hoisted_imports() {
    let output = generate();
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines[0], DISCLAIMER);
    assert_eq!(lines[1], "from __future__ import annotations");
    assert_eq!(
        output.matches("from __future__ import annotations").count(),
        1
    );
    assert_eq!(output.matches("\nfrom ._types import dtype\n").count(), 1);
    assert!(output.contains("from typing import Protocol, runtime_checkable\nfrom abc import abstractmethod\n"));
    // TypeVar declarations are not copied
    assert!(!output.contains("TypeVar"));
}

#[test]
fn test_regeneration_is_stable() {
    let (_temp, root) = copy_fixture();
    let draft = root.join("_draft");

    let first = generator().run(&draft).unwrap();
    let first_output = fs::read_to_string(&first.out_path).unwrap();
    let second = generator().run(&draft).unwrap();

    assert_eq!(first.protocol_count, second.protocol_count);
    assert_eq!(first_output, fs::read_to_string(&second.out_path).unwrap());
}

#[test]
fn test_custom_out_name() {
    let (_temp, root) = copy_fixture();
    let config = ProtocolConfig {
        out_name: "_protocols.py".to_string(),
        ..ProtocolConfig::default()
    };
    let summary = ProtocolGenerator::new(config, "_types")
        .run(&root.join("_draft"))
        .unwrap();
    assert!(summary.out_path.ends_with("_protocols.py"));
    assert!(!root.join("_draft").join("_namespace.py").exists());
}

#[test]
fn test_non_literal_type_var_is_fatal() {
    let (_temp, root) = copy_fixture();
    write_module(&root, "_types.py", "from typing import TypeVar\nname = 'x'\narray = TypeVar(name)\n");
    let err = generator().run(&root.join("_draft")).unwrap_err();
    assert!(err.to_string().contains("string literal"), "{err}");
}
