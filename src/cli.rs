use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "array-api-stubgen")]
#[command(about = "Protocol generator and namespace checker for array API stubs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding the `_draft` and released stub packages
    #[arg(long, global = true, env = "STUBGEN_ROOT")]
    pub root: Option<PathBuf>,

    /// Configuration file (defaults to the nearest .stubgen.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Regenerate the protocol module of the draft specification
    Generate {
        /// File written into the draft directory
        #[arg(long = "out-name")]
        out_name: Option<String>,
    },

    /// Assemble and print the stub namespace of a specification version
    Namespace {
        /// Specification version (defaults to the draft)
        #[arg(long = "api-version")]
        api_version: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Only print the functions of this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Assemble a namespace and check its metadata invariants
    Check {
        /// Specification version (defaults to the draft)
        #[arg(long = "api-version")]
        api_version: Option<String>,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}
