//! The host runtime abstraction.
//!
//! The tracker never talks to a concrete module runtime. It sees the host
//! through [`ModuleHost`], a query interface for the two pieces of
//! introspection the metrics need: where a module's resources live, and
//! which providers satisfied its requirements.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use modscope_core::ModuleKey;

use crate::error::HostResult;

/// The capability kind a wiring requirement was satisfied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyKind {
    /// The provider exports a single package the requirer imports.
    Package,
    /// The provider is required as a whole module.
    Module,
}

impl DependencyKind {
    /// Report vocabulary for this kind.
    ///
    /// Whole-module edges render as `bundle`, the term the report's
    /// consumers know from the wirings table.
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Package => "package",
            DependencyKind::Module => "bundle",
        }
    }
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A satisfied wiring requirement as reported by the host.
///
/// The host reports the concrete provider module chosen by its resolver,
/// not the requirement specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WiringRequirement {
    /// Which capability kind the requirement was satisfied for.
    pub kind: DependencyKind,
    /// The provider module that satisfied it.
    pub provider: ModuleKey,
    /// The wired package, for package-level requirements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

impl WiringRequirement {
    /// A satisfied package-level requirement.
    pub fn package(provider: ModuleKey, package: impl Into<String>) -> Self {
        Self {
            kind: DependencyKind::Package,
            provider,
            package: Some(package.into()),
        }
    }

    /// A satisfied whole-module requirement.
    pub fn module(provider: ModuleKey) -> Self {
        Self {
            kind: DependencyKind::Module,
            provider,
            package: None,
        }
    }
}

/// Introspection interface onto the host module runtime.
///
/// Both queries are only meaningful once a module is resolved; callers are
/// expected to treat errors as a degraded metric, not a failure of the run.
pub trait ModuleHost: Send + Sync {
    /// The resource roots attributable to the module.
    ///
    /// A module with no code of its own (a fragment, say) yields an empty
    /// list, not an error.
    fn resource_roots(&self, key: &ModuleKey) -> HostResult<Vec<PathBuf>>;

    /// The satisfied wiring requirements of the module.
    fn wiring_requirements(&self, key: &ModuleKey) -> HostResult<Vec<WiringRequirement>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_kind_vocabulary() {
        assert_eq!(DependencyKind::Package.as_str(), "package");
        assert_eq!(DependencyKind::Module.as_str(), "bundle");
    }

    #[test]
    fn test_requirement_constructors() {
        let provider = ModuleKey::new("p", "1.0.0");
        let pkg = WiringRequirement::package(provider.clone(), "com.example.api");
        assert_eq!(pkg.kind, DependencyKind::Package);
        assert_eq!(pkg.package.as_deref(), Some("com.example.api"));

        let whole = WiringRequirement::module(provider);
        assert_eq!(whole.kind, DependencyKind::Module);
        assert!(whole.package.is_none());
    }
}
