use super::render::{render_module, GeneratedModule};
use super::transform::{
    attributes_to_protocol, collect_type_vars, extension_protocol_name, function_to_protocol,
    Member,
};
use crate::config::ProtocolConfig;
use crate::core::{Error, ImportDecl, Module, Result, ResultExt, Statement};
use crate::registry::ModuleRegistry;
use std::path::{Path, PathBuf};

/// Builds the protocol module for one version directory.
pub struct ProtocolGenerator {
    config: ProtocolConfig,
    types_module: String,
}

/// Outcome of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    pub out_path: PathBuf,
    pub type_vars: Vec<String>,
    pub protocol_count: usize,
    pub skipped_statements: usize,
}

impl ProtocolGenerator {
    pub fn new(config: ProtocolConfig, types_module: impl Into<String>) -> Self {
        Self {
            config,
            types_module: types_module.into(),
        }
    }

    /// Parse `dir`, generate the protocol module and overwrite
    /// `<dir>/<out_name>` with it.
    pub fn run(&self, dir: &Path) -> Result<GenerationSummary> {
        let registry = ModuleRegistry::load(dir, &[self.config.out_name.as_str()])?;
        let (generated, type_vars, skipped_statements) = self.generate(&registry)?;

        let out_path = dir.join(&self.config.out_name);
        std::fs::write(&out_path, render_module(&generated))
            .map_err(|e| Error::io_at("Failed to write protocol module", &out_path, e))?;
        log::info!(
            "Wrote {} protocols to {}",
            generated.protocols.len(),
            out_path.display()
        );

        Ok(GenerationSummary {
            out_path,
            type_vars,
            protocol_count: generated.protocols.len(),
            skipped_statements,
        })
    }

    /// Generate protocols for every module in the registry except the types
    /// module and `__init__`.
    ///
    /// Returns the module, the collected type variables and the number of
    /// statements skipped as unsupported.
    pub fn generate(
        &self,
        registry: &ModuleRegistry,
    ) -> Result<(GeneratedModule, Vec<String>, usize)> {
        let types = registry.require(&self.types_module)?;
        let type_vars = collect_type_vars(types)
            .context(format!("Failed to collect type variables from {}", types.name))?;
        log::info!("Collected type variables: {}", type_vars.join(", "));

        let mut generated = GeneratedModule::default();
        let mut imports = ImportHoister::default();
        let mut module_members: Vec<(&str, Vec<Member>)> = Vec::new();
        let mut skipped = 0;

        for module in registry
            .modules()
            .filter(|m| m.name != self.types_module && m.name != "__init__")
        {
            let mut members = Vec::new();
            for stmt in &module.statements {
                match stmt {
                    Statement::Import(import) => imports.push(import),
                    Statement::Function(func) => {
                        let protocol = function_to_protocol(func, &type_vars);
                        members.push(Member::reference(&func.name, &protocol));
                        generated.protocols.push(protocol);
                    }
                    Statement::Constant(constant) => {
                        members.push(Member::constant(constant, &self.config.constant_type));
                    }
                    Statement::Exports(_) | Statement::Expression { .. } => {}
                    Statement::Class(class) => {
                        skipped += 1;
                        report_skipped(module, "class_definition", class.line);
                    }
                    Statement::Unsupported { kind, line } => {
                        skipped += 1;
                        report_skipped(module, kind, *line);
                    }
                }
            }
            module_members.push((module.name.as_str(), members));
        }

        let mut extension_members = Vec::new();
        for (name, members) in &module_members {
            if !self.is_extension(name) {
                continue;
            }
            let protocol = attributes_to_protocol(extension_protocol_name(name), members);
            extension_members.push(Member::reference(*name, &protocol));
            generated.protocols.push(protocol);
        }

        let mut namespace_members: Vec<Member> = module_members
            .into_iter()
            .filter(|(name, _)| !self.is_extension(name))
            .flat_map(|(_, members)| members)
            .collect();
        namespace_members.extend(extension_members);
        warn_duplicates(&namespace_members, &self.config.namespace_protocol);

        generated.protocols.push(attributes_to_protocol(
            &self.config.namespace_protocol,
            &namespace_members,
        ));
        generated.imports = imports.into_ordered();

        Ok((generated, type_vars, skipped))
    }

    fn is_extension(&self, module: &str) -> bool {
        self.config.optional_extensions.iter().any(|e| e == module)
    }
}

fn report_skipped(module: &Module, kind: &str, line: usize) {
    log::warn!(
        "Skipping unsupported {} in {} (line {})",
        kind,
        module.name,
        line
    );
}

fn warn_duplicates(members: &[Member], protocol: &str) {
    let mut seen = std::collections::HashSet::new();
    for member in members {
        if !seen.insert(member.name.as_str()) {
            log::warn!("{} declares `{}` more than once", protocol, member.name);
        }
    }
}

/// Collects imports in source order; `__future__` imports go first since
/// Python requires them at the top of a module. Exact duplicates are dropped.
#[derive(Default)]
struct ImportHoister {
    future: Vec<ImportDecl>,
    regular: Vec<ImportDecl>,
}

impl ImportHoister {
    fn push(&mut self, import: &ImportDecl) {
        let bucket = if import.is_future {
            &mut self.future
        } else {
            &mut self.regular
        };
        if !bucket.iter().any(|existing| existing.text == import.text) {
            bucket.push(import.clone());
        }
    }

    fn into_ordered(self) -> Vec<ImportDecl> {
        self.future.into_iter().chain(self.regular).collect()
    }
}
