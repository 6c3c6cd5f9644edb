use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::StubgenConfig;
use crate::core::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".stubgen.toml";

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<StubgenConfig, String> {
    let config = toml::from_str::<StubgenConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;
    config.validate()?;
    Ok(config)
}

/// Pure function to try loading config from a specific path
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<StubgenConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for a config file
pub fn load_config_from_dir(start: PathBuf) -> StubgenConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            StubgenConfig::default()
        })
}

pub fn load_config() -> StubgenConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from_dir(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            StubgenConfig::default()
        }
    }
}

/// Load an explicitly requested config file; unlike discovery, failure here
/// is an error.
pub fn load_config_file(path: &Path) -> Result<StubgenConfig> {
    let contents = read_config_file(path)
        .map_err(|e| Error::io_at("Failed to read config file", path, e))?;
    parse_and_validate_config(&contents).map_err(Error::Configuration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::core::NamespaceConfig;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_parse_partial_config_fills_defaults() {
        let config = parse_and_validate_config(
            r#"
            [namespace]
            tag = "xp"
            extensions = ["linalg"]
            "#,
        )
        .unwrap();

        let namespace = config.namespace();
        assert_eq!(namespace.tag, "xp");
        assert_eq!(namespace.extensions, vec!["linalg".to_string()]);
        assert_eq!(namespace.array_qualifier, NamespaceConfig::default().array_qualifier);
        assert_eq!(config.protocols().out_name, "_namespace.py");
    }

    #[test]
    fn test_invalid_out_name_rejected() {
        let err = parse_and_validate_config(
            r#"
            [protocols]
            out_name = "namespace.txt"
            "#,
        )
        .unwrap_err();
        assert!(err.contains("out_name"));
    }

    #[test]
    fn test_released_versions_cannot_shadow_draft() {
        let err = parse_and_validate_config(
            r#"
            [stubs]
            released_versions = ["2023.12", "draft"]
            "#,
        )
        .unwrap_err();
        assert!(err.contains("released_versions"));
    }

    #[test]
    fn test_directory_ancestors_respects_depth() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c"), PathBuf::from("/a/b")]);
    }

    #[test]
    fn test_load_config_from_ancestor_dir() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("spec").join("draft");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[protocols]\nout_name = \"_protocols.py\"\n",
        )
        .unwrap();

        let config = load_config_from_dir(nested);
        assert_eq!(config.protocols().out_name, "_protocols.py");
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "[namespace\n").unwrap();

        let config = load_config_from_dir(temp.path().to_path_buf());
        assert_eq!(config, StubgenConfig::default());
    }

    #[test]
    fn test_explicit_config_file_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        fs::write(&path, "[namespace]\ntag = \"\"\n").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(load_config_file(&temp.path().join("missing.toml")).is_err());
    }
}
