// Export modules for library usage
pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod namespace;
pub mod protocol;
pub mod registry;

// Re-export commonly used types
pub use crate::core::{
    ClassDecl, ConstantDecl, Error, FunctionDecl, ImportDecl, Module, Param, ParamKind, Result,
    Statement,
};

pub use crate::analyzers::{analyze_file, analyze_source, Analyzer, PythonAnalyzer};

pub use crate::namespace::{
    make_stubs_namespace, validate_namespace, ApiVersion, Namespace, StubFunction,
    ValidationReport,
};

pub use crate::protocol::{GenerationSummary, ProtocolGenerator};

pub use crate::registry::ModuleRegistry;
