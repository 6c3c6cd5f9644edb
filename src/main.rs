use anyhow::{Context, Result};
use array_api_stubgen::cli::{Cli, Commands};
use array_api_stubgen::commands::{self, NamespaceOptions};
use array_api_stubgen::config::{self, StubgenConfig};
use clap::Parser;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match cli.command {
        Commands::Init { force } => commands::init_config(Path::new("."), force),
        command => run(command, cli.root.as_deref(), cli.config.as_deref()),
    }
}

fn run(command: Commands, root: Option<&Path>, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let root = commands::stubs_root(root, &config);
    log::debug!("Using stubs root {}", root.display());

    match command {
        Commands::Generate { out_name } => commands::generate_protocols(&root, &config, out_name),
        Commands::Namespace {
            api_version,
            format,
            category,
        } => commands::print_namespace(
            &root,
            &config,
            NamespaceOptions {
                api_version,
                format,
                category,
            },
        ),
        Commands::Check { api_version } => {
            commands::check_namespace(&root, &config, api_version.as_deref())
        }
        Commands::Init { force } => commands::init_config(Path::new("."), force),
    }
}

/// `-v` enables info, `-vv` debug, `-vvv` trace. `RUST_LOG` takes precedence.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<StubgenConfig> {
    match path {
        Some(path) => config::load_config_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(config::load_config()),
    }
}
