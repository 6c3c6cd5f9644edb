use crate::core::{Error, Module, PythonAst, Result};
use std::path::Path;

pub mod python;
pub mod python_ast_extraction;
pub mod python_literals;
pub mod python_parser;

pub use python::PythonAnalyzer;

pub trait Analyzer {
    fn parse(&self, content: &str, path: &Path) -> Result<PythonAst>;
    fn extract(&self, ast: &PythonAst) -> Result<Module>;
}

/// Parse and extract a module from in-memory source
pub fn analyze_source(content: &str, path: &Path, analyzer: &dyn Analyzer) -> Result<Module> {
    analyzer
        .parse(content, path)
        .and_then(|ast| analyzer.extract(&ast))
}

/// Read a stub module from disk and extract its declarations
pub fn analyze_file(path: &Path, analyzer: &dyn Analyzer) -> Result<Module> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::io_at("Failed to read stub module", path, e))?;
    analyze_source(&content, path, analyzer)
}
