use super::assembler::{Namespace, StubMap};
use super::stub::StubFunction;
use crate::config::NamespaceConfig;
use crate::core::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Which invariant a violation breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    MappingKeys,
    ExtensionMetadata,
    ArrayMethods,
    DtypeMethods,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Check::MappingKeys => "mapping-keys",
            Check::ExtensionMetadata => "extension-metadata",
            Check::ArrayMethods => "array-methods",
            Check::DtypeMethods => "dtype-methods",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub check: Check,
    pub message: String,
}

/// Result of validating a namespace. Violations are collected, not
/// short-circuited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub checked: usize,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_ok() {
            return Ok(());
        }
        let messages: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("[{}] {}", v.check, v.message))
            .collect();
        Err(Error::invariant(messages.join("; ")))
    }

    fn fail(&mut self, check: Check, message: String) {
        self.violations.push(Violation { check, message });
    }
}

/// Check the metadata invariants of an assembled namespace.
pub fn validate_namespace(namespace: &Namespace, config: &NamespaceConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_keys(&mut report, "functions", &namespace.functions);
    check_keys(&mut report, "array_methods", &namespace.array_methods);
    check_keys(&mut report, "dtype_methods", &namespace.dtype_methods);
    for (category, functions) in &namespace.category_to_functions {
        check_group_name(&mut report, "category", category);
        check_keys(&mut report, &format!("category {}", category), functions);
    }
    for (extension, functions) in &namespace.extension_to_functions {
        check_group_name(&mut report, "extension", extension);
        check_keys(&mut report, &format!("extension {}", extension), functions);
    }

    check_extensions(&mut report, namespace, config);
    check_methods(
        &mut report,
        Check::ArrayMethods,
        &namespace.array_methods,
        "__add__",
        &config.tag,
        &config.array_qualifier,
    );
    check_methods(
        &mut report,
        Check::DtypeMethods,
        &namespace.dtype_methods,
        "__eq__",
        &config.tag,
        &config.dtype_qualifier,
    );

    log::debug!(
        "Validated {} stubs, {} violations",
        report.checked,
        report.violations.len()
    );
    report
}

fn check_group_name(report: &mut ValidationReport, kind: &str, name: &str) {
    if !is_identifier(name) {
        report.fail(
            Check::MappingKeys,
            format!("{} name {:?} is not a valid identifier", kind, name),
        );
    }
}

fn check_keys(report: &mut ValidationReport, mapping: &str, stubs: &StubMap) {
    for (key, stub) in stubs {
        report.checked += 1;
        if !is_identifier(key) {
            report.fail(
                Check::MappingKeys,
                format!("{}: key {:?} is not a valid identifier", mapping, key),
            );
        } else if key != &stub.name {
            report.fail(
                Check::MappingKeys,
                format!("{}: key {:?} maps to {}", mapping, key, stub),
            );
        }
    }
}

fn check_extensions(report: &mut ValidationReport, namespace: &Namespace, config: &NamespaceConfig) {
    for (extension, functions) in &namespace.extension_to_functions {
        let expected = format!("{}.{}", config.tag, extension);
        for stub in functions.values() {
            if stub.module != expected {
                report.fail(
                    Check::ExtensionMetadata,
                    format!("{} should be tagged {}", stub, expected),
                );
            }
            if stub.alias_of.is_none() {
                continue;
            }
            match namespace.functions.get(&stub.name) {
                Some(top) if top.doc == stub.doc => {}
                Some(_) => report.fail(
                    Check::ExtensionMetadata,
                    format!("{} does not share the docstring of {}", stub, stub.name),
                ),
                None => report.fail(
                    Check::ExtensionMetadata,
                    format!("{} aliases a missing top-level function", stub),
                ),
            }
        }
    }
}

fn check_methods(
    report: &mut ValidationReport,
    check: Check,
    methods: &StubMap,
    representative: &str,
    tag: &str,
    qualifier: &str,
) {
    if !methods.contains_key(representative) {
        report.fail(
            check,
            format!("missing {}.{}", qualifier, representative),
        );
    }
    for method in methods.values() {
        check_method(report, check, method, tag, qualifier);
    }
}

fn check_method(
    report: &mut ValidationReport,
    check: Check,
    method: &StubFunction,
    tag: &str,
    qualifier: &str,
) {
    if method.module != tag {
        report.fail(check, format!("{} should be tagged {}", method, tag));
    }
    let qualname = format!("{}.{}", qualifier, method.name);
    if method.qualname != qualname {
        report.fail(check, format!("{} should be named {}", method, qualname));
    }
    if method.first_param_name() != Some("self") {
        report.fail(check, format!("{} does not take self first", method));
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}
