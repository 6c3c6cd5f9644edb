use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure, read from `.stubgen.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StubgenConfig {
    /// Location and layout of the specification stub tree
    #[serde(default)]
    pub stubs: Option<StubsConfig>,

    /// Protocol generation settings
    #[serde(default)]
    pub protocols: Option<ProtocolConfig>,

    /// Namespace assembly settings
    #[serde(default)]
    pub namespace: Option<NamespaceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StubsConfig {
    /// Directory holding one `_<version>` package per specification version
    #[serde(default = "default_stubs_root")]
    pub root: PathBuf,

    /// Module (file stem) declaring the `TypeVar`s
    #[serde(default = "default_types_module")]
    pub types_module: String,

    /// Versions that have been released but are not served by the tooling
    #[serde(default = "default_released_versions")]
    pub released_versions: Vec<String>,
}

impl Default for StubsConfig {
    fn default() -> Self {
        Self {
            root: default_stubs_root(),
            types_module: default_types_module(),
            released_versions: default_released_versions(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProtocolConfig {
    /// File written into the draft directory
    #[serde(default = "default_out_name")]
    pub out_name: String,

    /// Modules that get their own `<Name>Namespace` protocol
    #[serde(default = "default_optional_extensions")]
    pub optional_extensions: Vec<String>,

    /// Name of the umbrella protocol
    #[serde(default = "default_namespace_protocol")]
    pub namespace_protocol: String,

    /// Annotation used for constants declared without one
    #[serde(default = "default_constant_type")]
    pub constant_type: String,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            out_name: default_out_name(),
            optional_extensions: default_optional_extensions(),
            namespace_protocol: default_namespace_protocol(),
            constant_type: default_constant_type(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamespaceConfig {
    /// Owning-module tag written onto every assembled stub
    #[serde(default = "default_tag")]
    pub tag: String,

    /// Extension modules assembled into `extension_to_functions`
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default = "default_array_module")]
    pub array_module: String,

    /// Public name of the array class (aliases are followed)
    #[serde(default = "default_array_class")]
    pub array_class: String,

    #[serde(default = "default_array_qualifier")]
    pub array_qualifier: String,

    #[serde(default = "default_dtype_module")]
    pub dtype_module: String,

    #[serde(default = "default_dtype_qualifier")]
    pub dtype_qualifier: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            extensions: default_extensions(),
            array_module: default_array_module(),
            array_class: default_array_class(),
            array_qualifier: default_array_qualifier(),
            dtype_module: default_dtype_module(),
            dtype_qualifier: default_dtype_qualifier(),
        }
    }
}

impl StubgenConfig {
    pub fn stubs(&self) -> StubsConfig {
        self.stubs.clone().unwrap_or_default()
    }

    pub fn protocols(&self) -> ProtocolConfig {
        self.protocols.clone().unwrap_or_default()
    }

    pub fn namespace(&self) -> NamespaceConfig {
        self.namespace.clone().unwrap_or_default()
    }

    /// Reject settings that would produce an unusable tree or namespace.
    pub fn validate(&self) -> Result<(), String> {
        let protocols = self.protocols();
        if protocols.out_name.is_empty() || !protocols.out_name.ends_with(".py") {
            return Err(format!(
                "protocols.out_name must name a .py file, got {:?}",
                protocols.out_name
            ));
        }
        if protocols.namespace_protocol.is_empty() {
            return Err("protocols.namespace_protocol must not be empty".to_string());
        }

        let namespace = self.namespace();
        if namespace.tag.is_empty() {
            return Err("namespace.tag must not be empty".to_string());
        }
        if namespace.extensions.iter().any(|ext| ext.is_empty()) {
            return Err("namespace.extensions must not contain empty names".to_string());
        }

        let stubs = self.stubs();
        if stubs
            .released_versions
            .iter()
            .any(|v| v == "draft" || v == "latest")
        {
            return Err("stubs.released_versions must not contain 'draft' or 'latest'".to_string());
        }

        Ok(())
    }
}

fn default_stubs_root() -> PathBuf {
    PathBuf::from("src").join("array_api_stubs")
}

fn default_types_module() -> String {
    "_types".to_string()
}

pub fn default_released_versions() -> Vec<String> {
    ["2021.12", "2022.12", "2023.12", "2024.12"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub fn default_out_name() -> String {
    "_namespace.py".to_string()
}

fn default_optional_extensions() -> Vec<String> {
    vec!["fft".to_string(), "linalg".to_string()]
}

fn default_namespace_protocol() -> String {
    "ArrayNamespace".to_string()
}

fn default_constant_type() -> String {
    "float".to_string()
}

fn default_tag() -> String {
    "array_api".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["linalg".to_string(), "fft".to_string()]
}

fn default_array_module() -> String {
    "array_object".to_string()
}

fn default_array_class() -> String {
    "array".to_string()
}

fn default_array_qualifier() -> String {
    "_Array".to_string()
}

fn default_dtype_module() -> String {
    "data_types".to_string()
}

fn default_dtype_qualifier() -> String {
    "_DataType".to_string()
}
