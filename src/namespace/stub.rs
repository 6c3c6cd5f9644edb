use crate::core::{format_parameters, FunctionDecl, Param};
use serde::Serialize;
use std::fmt;

/// Marker a docstring carries when the function merely re-exports a
/// top-level function under an extension.
pub const ALIAS_MARKER: &str = "Alias";

/// A specification callable with the metadata Python would expose as
/// `__module__`, `__qualname__` and `__doc__`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StubFunction {
    pub name: String,
    pub module: String,
    pub qualname: String,
    pub doc: Option<String>,
    pub params: Vec<Param>,
    pub returns: Option<String>,
    /// Module-qualified name of the top-level function this one aliases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<String>,
}

impl StubFunction {
    /// Stub for a declaration, tagged with the module it belongs to.
    pub fn from_decl(decl: &FunctionDecl, module: impl Into<String>) -> Self {
        Self {
            name: decl.name.clone(),
            module: module.into(),
            qualname: decl.name.clone(),
            doc: decl.docstring.clone(),
            params: decl.params.clone(),
            returns: decl.returns.clone(),
            alias_of: None,
        }
    }

    /// Qualify the name with an owning type, e.g. `_Array.__add__`.
    pub fn with_owner(mut self, owner: &str) -> Self {
        self.qualname = format!("{}.{}", owner, self.name);
        self
    }

    pub fn is_alias(&self) -> bool {
        self.doc
            .as_deref()
            .is_some_and(|doc| doc.contains(ALIAS_MARKER))
    }

    pub fn first_param_name(&self) -> Option<&str> {
        self.params.first().map(|p| p.name.as_str())
    }

    /// `(x1: array, x2: array, /) -> array`
    pub fn signature(&self) -> String {
        let mut sig = format!("({})", format_parameters(&self.params));
        if let Some(returns) = &self.returns {
            sig.push_str(" -> ");
            sig.push_str(returns);
        }
        sig
    }
}

impl fmt::Display for StubFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<function {}.{}{}>",
            self.module,
            self.qualname,
            self.signature()
        )
    }
}
