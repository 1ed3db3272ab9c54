//! An in-memory scripted host.
//!
//! `SimHost` stands in for a real module runtime in tests and in trace
//! replay: modules are registered up front with their resource roots and
//! satisfied requirements, and introspection failures can be injected per
//! module.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use parking_lot::RwLock;

use modscope_core::ModuleKey;

use crate::error::{HostError, HostResult};
use crate::host::{ModuleHost, WiringRequirement};

#[derive(Debug, Clone, Default)]
struct SimModule {
    roots: Vec<PathBuf>,
    requirements: Vec<WiringRequirement>,
}

/// In-memory [`ModuleHost`] implementation.
#[derive(Debug, Default)]
pub struct SimHost {
    modules: RwLock<HashMap<ModuleKey, SimModule>>,
    fail_roots: RwLock<HashSet<ModuleKey>>,
}

impl SimHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module with its resource roots and satisfied requirements.
    ///
    /// Re-registering a key replaces the previous entry.
    pub fn register(
        &self,
        key: ModuleKey,
        roots: Vec<PathBuf>,
        requirements: Vec<WiringRequirement>,
    ) {
        self.modules
            .write()
            .insert(key, SimModule { roots, requirements });
    }

    /// Make `resource_roots` fail for the given module from now on.
    pub fn fail_roots_for(&self, key: ModuleKey) {
        self.fail_roots.write().insert(key);
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    /// Check if no modules are registered.
    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }
}

impl ModuleHost for SimHost {
    fn resource_roots(&self, key: &ModuleKey) -> HostResult<Vec<PathBuf>> {
        if self.fail_roots.read().contains(key) {
            return Err(HostError::Unavailable {
                key: key.clone(),
                reason: "injected failure".to_string(),
            });
        }
        self.modules
            .read()
            .get(key)
            .map(|m| m.roots.clone())
            .ok_or_else(|| HostError::UnknownModule(key.clone()))
    }

    fn wiring_requirements(&self, key: &ModuleKey) -> HostResult<Vec<WiringRequirement>> {
        self.modules
            .read()
            .get(key)
            .map(|m| m.requirements.clone())
            .ok_or_else(|| HostError::UnknownModule(key.clone()))
    }
}
