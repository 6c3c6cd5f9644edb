use crate::config::StubgenConfig;
use crate::namespace::{make_stubs_namespace, validate_namespace, ValidationReport};
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

/// Assemble the namespace, validate it and fail if any invariant is broken.
pub fn check_namespace(
    root: &Path,
    config: &StubgenConfig,
    api_version: Option<&str>,
) -> Result<()> {
    let namespace =
        make_stubs_namespace(root, api_version, config).context("Failed to assemble namespace")?;
    let report = validate_namespace(&namespace, &config.namespace());

    if report.is_ok() {
        print_success(&report);
        Ok(())
    } else {
        print_failure(&report);
        anyhow::bail!("Validation failed")
    }
}

fn print_success(report: &ValidationReport) {
    println!(
        "{} {} stubs checked, no violations",
        "✓".green().bold(),
        report.checked
    );
}

fn print_failure(report: &ValidationReport) {
    println!(
        "{} {} violations in {} stubs",
        "✗".red().bold(),
        report.violations.len(),
        report.checked
    );
    for violation in &report.violations {
        println!("  [{}] {}", violation.check.to_string().yellow(), violation.message);
    }
}
