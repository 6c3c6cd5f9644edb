mod core;
mod loader;

pub use self::core::{
    default_out_name, default_released_versions, NamespaceConfig, ProtocolConfig, StubgenConfig,
    StubsConfig,
};
pub use loader::{
    directory_ancestors, load_config, load_config_file, load_config_from_dir,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
