//! CLI command implementations for array-api-stubgen.
//!
//! Available commands:
//! - **generate**: Regenerate the protocol module of the draft specification
//! - **namespace**: Assemble and print the stub namespace of a version
//! - **check**: Validate the metadata invariants of an assembled namespace
//! - **init**: Write a default `.stubgen.toml`

pub mod check;
pub mod generate;
pub mod init;
pub mod namespace;

pub use check::check_namespace;
pub use generate::generate_protocols;
pub use init::init_config;
pub use namespace::{print_namespace, NamespaceOptions};

use crate::config::StubgenConfig;
use std::path::{Path, PathBuf};

/// Stubs root: the command-line override wins over the configured one.
pub fn stubs_root(root: Option<&Path>, config: &StubgenConfig) -> PathBuf {
    root.map(Path::to_path_buf)
        .unwrap_or_else(|| config.stubs().root)
}
