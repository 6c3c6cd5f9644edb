use crate::config::StubgenConfig;
use crate::namespace::ApiVersion;
use crate::protocol::ProtocolGenerator;
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

/// Regenerate `<root>/_draft/<out_name>` from the draft stubs.
pub fn generate_protocols(
    root: &Path,
    config: &StubgenConfig,
    out_name: Option<String>,
) -> Result<()> {
    let mut protocols = config.protocols();
    if let Some(out_name) = out_name {
        protocols.out_name = out_name;
    }

    let dir = root.join(ApiVersion::Draft.dir_name());
    let generator = ProtocolGenerator::new(protocols, config.stubs().types_module);
    let summary = generator
        .run(&dir)
        .with_context(|| format!("Failed to generate protocols for {}", dir.display()))?;

    println!(
        "{} {} protocols to {}",
        "Wrote".green().bold(),
        summary.protocol_count,
        summary.out_path.display()
    );
    println!("  type variables: {}", summary.type_vars.join(", "));
    if summary.skipped_statements > 0 {
        println!(
            "  {} {} unsupported statements skipped (run with -v for details)",
            "warning:".yellow().bold(),
            summary.skipped_statements
        );
    }
    Ok(())
}
