use crate::analyzers::python_ast_extraction::PythonAstExtractor;
use crate::analyzers::python_parser::parse_source;
use crate::analyzers::Analyzer;
use crate::core::{Module, PythonAst, Result};
use std::path::Path;

pub struct PythonAnalyzer;

impl PythonAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PythonAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for PythonAnalyzer {
    fn parse(&self, content: &str, path: &Path) -> Result<PythonAst> {
        parse_source(content, path)
    }

    fn extract(&self, ast: &PythonAst) -> Result<Module> {
        let module = PythonAstExtractor::new(ast).extract_module()?;
        log::debug!(
            "Extracted {} statements from {}",
            module.statements.len(),
            ast.path.display()
        );
        Ok(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::analyze_source;
    use std::path::PathBuf;

    #[test]
    fn test_analyze_source_produces_module() {
        let source = "def sort(x: array, /) -> array:\n    \"\"\"Sorts.\"\"\"\n\n__all__ = [\"sort\"]\n";
        let module = analyze_source(
            source,
            &PathBuf::from("sorting_functions.py"),
            &PythonAnalyzer::new(),
        )
        .unwrap();

        assert_eq!(module.name, "sorting_functions");
        assert!(module.function("sort").is_some());
        assert_eq!(module.exports().map(|e| e.len()), Some(1));
    }
}
