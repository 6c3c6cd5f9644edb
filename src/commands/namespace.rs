use crate::cli::OutputFormat;
use crate::config::StubgenConfig;
use crate::namespace::{make_stubs_namespace, Namespace, StubMap};
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

pub struct NamespaceOptions {
    pub api_version: Option<String>,
    pub format: OutputFormat,
    pub category: Option<String>,
}

/// Assemble the namespace and print it, or only one category of it.
pub fn print_namespace(
    root: &Path,
    config: &StubgenConfig,
    options: NamespaceOptions,
) -> Result<()> {
    let namespace = make_stubs_namespace(root, options.api_version.as_deref(), config)
        .context("Failed to assemble namespace")?;

    match (&options.category, options.format) {
        (Some(category), format) => {
            let functions = select_category(&namespace, category)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(functions)?),
                OutputFormat::Terminal => print_section(category, functions),
            }
        }
        (None, OutputFormat::Json) => println!("{}", serde_json::to_string_pretty(&namespace)?),
        (None, OutputFormat::Terminal) => print_terminal(&namespace),
    }
    Ok(())
}

fn select_category<'a>(namespace: &'a Namespace, category: &str) -> Result<&'a StubMap> {
    namespace.category_to_functions.get(category).ok_or_else(|| {
        let known: Vec<&str> = namespace
            .category_to_functions
            .keys()
            .map(String::as_str)
            .collect();
        anyhow::anyhow!(
            "Unknown category {:?} (available: {})",
            category,
            known.join(", ")
        )
    })
}

fn print_terminal(namespace: &Namespace) {
    for (category, functions) in &namespace.category_to_functions {
        print_section(category, functions);
    }
    for (extension, functions) in &namespace.extension_to_functions {
        print_section(&format!("extension {}", extension), functions);
    }
    print_section("array methods", &namespace.array_methods);
    print_section("dtype methods", &namespace.dtype_methods);
    println!("{} {} stubs", "Total:".bold(), namespace.stub_count());
}

fn print_section(title: &str, functions: &StubMap) {
    println!("{} ({})", title.cyan().bold(), functions.len());
    for stub in functions.values() {
        let marker = if stub.alias_of.is_some() {
            " (alias)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("  {}{}", stub, marker);
    }
    println!();
}
