use super::stub::StubFunction;
use super::version::ApiVersion;
use crate::config::{NamespaceConfig, StubgenConfig};
use crate::core::{ClassDecl, Error, FunctionDecl, Module, Result};
use crate::registry::ModuleRegistry;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

const CATEGORY_SUFFIX: &str = "_functions";
const PACKAGE_INIT: &str = "__init__.py";
const DTYPE_EQ: &str = "__eq__";

/// Name-keyed stub table.
pub type StubMap = BTreeMap<String, StubFunction>;

/// Every callable of one specification version, grouped five ways.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Namespace {
    /// All top-level functions across categories.
    pub functions: StubMap,
    pub array_methods: StubMap,
    pub dtype_methods: StubMap,
    /// Category (module stem without `_functions`) to its functions.
    pub category_to_functions: BTreeMap<String, StubMap>,
    /// Extension name to its functions.
    pub extension_to_functions: BTreeMap<String, StubMap>,
}

impl Namespace {
    /// Total number of stubs across the flat mappings and extensions.
    pub fn stub_count(&self) -> usize {
        self.functions.len()
            + self.array_methods.len()
            + self.dtype_methods.len()
            + self
                .extension_to_functions
                .values()
                .map(BTreeMap::len)
                .sum::<usize>()
    }
}

/// Assemble the namespace for `api_version` from the stubs under `root`.
///
/// Nothing is cached: every call re-reads and re-parses the version
/// directory.
pub fn make_stubs_namespace(
    root: &Path,
    api_version: Option<&str>,
    config: &StubgenConfig,
) -> Result<Namespace> {
    let stubs = config.stubs();
    let version = ApiVersion::resolve(api_version, &stubs.released_versions)?;
    let dir = root.join(version.dir_name());

    if !dir.is_dir() {
        return Err(Error::file_system(
            format!("No stubs for api_version={}", version),
            &dir,
        ));
    }
    if !dir.join(PACKAGE_INIT).is_file() {
        return Err(Error::specification(format!(
            "{} is not a package root (missing {})",
            dir.display(),
            PACKAGE_INIT
        )));
    }

    let out_name = config.protocols().out_name;
    let registry = ModuleRegistry::load(&dir, &[out_name.as_str()])?;
    log::debug!(
        "Assembling namespace for {} from {} modules",
        version,
        registry.len()
    );
    NamespaceAssembler::new(config.namespace()).assemble(&registry)
}

/// Builds a [`Namespace`] out of an already parsed registry.
pub struct NamespaceAssembler {
    config: NamespaceConfig,
}

impl NamespaceAssembler {
    pub fn new(config: NamespaceConfig) -> Self {
        Self { config }
    }

    pub fn assemble(&self, registry: &ModuleRegistry) -> Result<Namespace> {
        let mut namespace = Namespace {
            array_methods: self.array_methods(registry)?,
            dtype_methods: self.dtype_methods(registry)?,
            ..Namespace::default()
        };

        for module in registry.modules() {
            let Some(category) = module.name.strip_suffix(CATEGORY_SUFFIX) else {
                continue;
            };
            let functions = self.exported_functions(module, &self.config.tag)?;
            log::debug!("Category {}: {} functions", category, functions.len());
            namespace
                .functions
                .extend(functions.iter().map(|(k, v)| (k.clone(), v.clone())));
            namespace
                .category_to_functions
                .insert(category.to_string(), functions);
        }

        for extension in &self.config.extensions {
            let functions = self.extension_functions(registry, extension, &namespace.functions)?;
            log::debug!("Extension {}: {} functions", extension, functions.len());
            namespace
                .extension_to_functions
                .insert(extension.clone(), functions);
        }

        log::info!("Assembled {} stubs", namespace.stub_count());
        Ok(namespace)
    }

    fn array_methods(&self, registry: &ModuleRegistry) -> Result<StubMap> {
        let module = registry.require(&self.config.array_module)?;
        let class = module.resolve_class(&self.config.array_class).ok_or_else(|| {
            Error::specification(format!(
                "class `{}` not found in {}",
                self.config.array_class, module.name
            ))
        })?;

        let mut methods = StubMap::new();
        for method in callable_methods(class) {
            let stub = self.owned_stub(method, &self.config.array_qualifier);
            if stub.is_alias() {
                return Err(Error::specification(format!(
                    "array method `{}` is documented as an alias",
                    stub.qualname
                )));
            }
            methods.insert(stub.name.clone(), stub);
        }
        Ok(methods)
    }

    fn dtype_methods(&self, registry: &ModuleRegistry) -> Result<StubMap> {
        let module = registry.require(&self.config.dtype_module)?;
        let eq = module
            .function(DTYPE_EQ)
            .or_else(|| module.classes().find_map(|class| class.method(DTYPE_EQ)))
            .ok_or_else(|| {
                Error::specification(format!(
                    "`{}` not found in {}",
                    DTYPE_EQ, module.name
                ))
            })?;

        let stub = self.owned_stub(eq, &self.config.dtype_qualifier);
        Ok(StubMap::from([(stub.name.clone(), stub)]))
    }

    fn owned_stub(&self, method: &FunctionDecl, owner: &str) -> StubFunction {
        StubFunction::from_decl(method, self.config.tag.as_str()).with_owner(owner)
    }

    /// Stubs for every name in the module's `__all__`, tagged `module_tag`.
    fn exported_functions(&self, module: &Module, module_tag: &str) -> Result<StubMap> {
        let exports = module.exports().ok_or_else(|| {
            Error::specification(format!("module `{}` does not declare __all__", module.name))
        })?;

        exports
            .iter()
            .map(|name| {
                let func = module.function(name).ok_or_else(|| {
                    Error::specification(format!(
                        "`{}` is listed in {}.__all__ but is not a function",
                        name, module.name
                    ))
                })?;
                Ok((name.clone(), StubFunction::from_decl(func, module_tag)))
            })
            .collect()
    }

    fn extension_functions(
        &self,
        registry: &ModuleRegistry,
        extension: &str,
        top_level: &StubMap,
    ) -> Result<StubMap> {
        let module = registry.require(extension)?;
        let module_tag = format!("{}.{}", self.config.tag, extension);
        let mut functions = self.exported_functions(module, &module_tag)?;

        for stub in functions.values_mut().filter(|stub| stub.is_alias()) {
            let target = top_level.get(&stub.name).ok_or_else(|| {
                Error::specification(format!(
                    "{}.{} is an alias but `{}` has no top-level function",
                    extension, stub.name, stub.name
                ))
            })?;
            stub.doc = target.doc.clone();
            stub.alias_of = Some(format!("{}.{}", target.module, target.qualname));
        }
        Ok(functions)
    }
}

/// Methods Python would report as plain functions on the class.
fn callable_methods(class: &ClassDecl) -> impl Iterator<Item = &FunctionDecl> {
    class
        .methods
        .iter()
        .filter(|m| !m.has_decorator("property") && !m.has_decorator("classmethod"))
}
