//! Wiring graph derivation and transitive classpath expansion.
//!
//! Each satisfied requirement the host reports becomes one directed edge
//! from the requiring module to the concrete provider module. Transitive
//! classpath size expands a module's direct size over those edges according
//! to the configured [`TransitivePolicy`].

use std::collections::HashSet;

use modscope_core::{ModuleKey, TransitivePolicy};
use modscope_host::{DependencyKind, ModuleHost, WiringRequirement};

use crate::classpath::ClasspathSizer;

/// A directed dependency edge to the provider module that satisfied one
/// requirement of the owning module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WiringEdge {
    /// The capability kind the edge was wired for.
    pub kind: DependencyKind,
    /// The provider module.
    pub provider: ModuleKey,
    /// The wired package, for package-level edges.
    pub package: Option<String>,
}

impl From<WiringRequirement> for WiringEdge {
    fn from(requirement: WiringRequirement) -> Self {
        Self {
            kind: requirement.kind,
            provider: requirement.provider,
            package: requirement.package,
        }
    }
}

/// Derives wiring edges and transitive classpath sizes through the host.
pub struct WiringGraphBuilder<'a> {
    host: &'a dyn ModuleHost,
    sizer: &'a ClasspathSizer,
}

impl<'a> WiringGraphBuilder<'a> {
    /// Create a builder over a host and a sizer.
    pub fn new(host: &'a dyn ModuleHost, sizer: &'a ClasspathSizer) -> Self {
        Self { host, sizer }
    }

    /// The wiring edges of a module, in the order the host reports them.
    ///
    /// A failed wiring lookup degrades to an empty edge list for this
    /// module only.
    pub fn build_edges(&self, key: &ModuleKey) -> Vec<WiringEdge> {
        match self.host.wiring_requirements(key) {
            Ok(requirements) => requirements.into_iter().map(WiringEdge::from).collect(),
            Err(err) => {
                tracing::warn!(module = %key, error = %err, "wiring lookup failed");
                Vec::new()
            }
        }
    }

    /// The direct classpath size of a module, degrading to 0 when its
    /// resource roots cannot be read.
    pub fn direct_size(&self, key: &ModuleKey) -> u64 {
        let roots = match self.host.resource_roots(key) {
            Ok(roots) => roots,
            Err(err) => {
                tracing::warn!(module = %key, error = %err, "resource root lookup failed");
                return 0;
            }
        };
        self.sizer.size(&roots).classes
    }

    /// Expand a module's direct size over its wiring edges.
    ///
    /// Under [`TransitivePolicy::OneHop`] each distinct provider reachable
    /// via exactly one edge contributes its direct size once; providers'
    /// own wires are not followed. Under [`TransitivePolicy::FullClosure`]
    /// the expansion is a fixpoint over the whole reachable graph, with a
    /// visited set guarding against cycles.
    pub fn transitive_size(
        &self,
        key: &ModuleKey,
        direct: u64,
        edges: &[WiringEdge],
        policy: TransitivePolicy,
    ) -> u64 {
        match policy {
            TransitivePolicy::OneHop => {
                let mut seen = HashSet::new();
                seen.insert(key.clone());
                let mut total = direct;
                for edge in edges {
                    if seen.insert(edge.provider.clone()) {
                        total += self.direct_size(&edge.provider);
                    }
                }
                total
            }
            TransitivePolicy::FullClosure => {
                let mut visited = HashSet::new();
                visited.insert(key.clone());
                let mut queue: Vec<ModuleKey> =
                    edges.iter().map(|edge| edge.provider.clone()).collect();
                let mut total = direct;
                while let Some(provider) = queue.pop() {
                    if !visited.insert(provider.clone()) {
                        continue;
                    }
                    total += self.direct_size(&provider);
                    for edge in self.build_edges(&provider) {
                        queue.push(edge.provider);
                    }
                }
                total
            }
        }
    }
}
