use crate::core::{Error, Result};
use std::fmt;

pub const DRAFT: &str = "draft";
pub const LATEST: &str = "latest";

/// A specification version the assembler can load.
///
/// Released versions are recognised but not served yet, so the only
/// loadable version is the in-development draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    Draft,
}

impl ApiVersion {
    /// Resolve an optional version token.
    ///
    /// `None` and `"draft"` select the draft. `"latest"` and released
    /// versions yield [`Error::NotImplemented`]; anything else yields
    /// [`Error::InvalidVersion`] naming the accepted set.
    pub fn resolve(token: Option<&str>, released: &[String]) -> Result<Self> {
        match token.unwrap_or(DRAFT) {
            DRAFT => Ok(ApiVersion::Draft),
            v if v == LATEST || released.iter().any(|r| r == v) => Err(Error::NotImplemented(
                format!("api_version={:?} not yet supported", v),
            )),
            v => Err(Error::InvalidVersion {
                version: v.to_string(),
                allowed: released.join(", "),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::Draft => DRAFT,
        }
    }

    /// Directory holding this version's modules under the stubs root.
    pub fn dir_name(&self) -> String {
        format!("_{}", self.as_str().replace('.', "_"))
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
