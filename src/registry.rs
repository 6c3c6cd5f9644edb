//! Static registry of the parsed modules of one specification version.
//!
//! Every `*.py` file directly inside the version directory is parsed exactly
//! once, keyed by file stem. Lookups never touch the file system again.

use crate::analyzers::{analyze_file, PythonAnalyzer};
use crate::core::{Error, Module, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    dir: PathBuf,
    modules: BTreeMap<String, Module>,
}

impl ModuleRegistry {
    /// Parse every Python file in `dir`, skipping the listed file names.
    pub fn load(dir: &Path, exclude: &[&str]) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::file_system(
                "Specification directory does not exist",
                dir,
            ));
        }

        let pattern = format!(
            "{}/*.py",
            glob::Pattern::escape(&dir.to_string_lossy())
        );
        let analyzer = PythonAnalyzer::new();
        let mut modules = BTreeMap::new();

        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                Error::io_at("Failed to read directory entry", path, std::io::Error::from(e))
            })?;
            let excluded = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| exclude.contains(&name));
            if excluded {
                log::debug!("Excluding {}", path.display());
                continue;
            }

            let module = analyze_file(&path, &analyzer)?;
            modules.insert(module.name.clone(), module);
        }

        log::debug!("Loaded {} modules from {}", modules.len(), dir.display());
        Ok(Self {
            dir: dir.to_path_buf(),
            modules,
        })
    }

    /// Build a registry from already extracted modules.
    pub fn from_modules(dir: PathBuf, modules: Vec<Module>) -> Self {
        Self {
            dir,
            modules: modules
                .into_iter()
                .map(|module| (module.name.clone(), module))
                .collect(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// Look up a module the specification layout requires.
    pub fn require(&self, name: &str) -> Result<&Module> {
        self.get(name).ok_or_else(|| {
            Error::specification(format!(
                "module `{}` not found in {}",
                name,
                self.dir.display()
            ))
        })
    }

    /// Modules in file-stem order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
