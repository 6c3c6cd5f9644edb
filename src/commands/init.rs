use crate::config::CONFIG_FILE_NAME;
use anyhow::{Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# array-api-stubgen configuration

[stubs]
root = "src/array_api_stubs"
types_module = "_types"
released_versions = ["2021.12", "2022.12", "2023.12", "2024.12"]

[protocols]
out_name = "_namespace.py"
optional_extensions = ["fft", "linalg"]
namespace_protocol = "ArrayNamespace"
constant_type = "float"

[namespace]
tag = "array_api"
extensions = ["linalg", "fft"]
"#;

/// Write a default configuration file into `dir`.
pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);

    Ok(())
}
