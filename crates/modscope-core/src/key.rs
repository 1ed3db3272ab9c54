//! Module identity.

use serde::{Deserialize, Serialize};

/// Identity of a module: symbolic name plus version.
///
/// Keys are immutable once assigned and unique within a tracking run. The
/// display form is `name_version`, which is also the identifier used in
/// report rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleKey {
    name: String,
    version: String,
}

impl ModuleKey {
    /// Create a key from a symbolic name and a version string.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// The symbolic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version string.
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl std::fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.name, self.version)
    }
}
