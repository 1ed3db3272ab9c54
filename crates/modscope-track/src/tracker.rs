//! The module tracker.
//!
//! [`ModuleTracker`] is the event sink the host delivers lifecycle events
//! into. It owns the registry, correlates transitions per module, and on
//! resolution derives the classpath and wiring metrics through the host.

use std::sync::Arc;
use std::time::{Duration, Instant};

use modscope_core::{
    ModuleKey, RawModuleEvent, ReinstallPolicy, TrackerConfig, Transition, TransitionKind,
};
use modscope_host::{ModuleEventSink, ModuleHost};
use modscope_metrics::{ClasspathSizer, WiringGraphBuilder};

use crate::latency;
use crate::record::ModuleRecord;
use crate::registry::ModuleRegistry;

/// Tracks module lifecycle transitions and derives per-module metrics.
///
/// The tracker is driven entirely by the host calling
/// [`on_event`](ModuleEventSink::on_event), possibly from several callback
/// threads at once. `on_event` never panics and never reports an error back
/// to the host; a failed metric derivation degrades that metric and is
/// logged. Per-module event ordering (install before resolve before stop)
/// is trusted from the host; no ordering across modules is assumed.
pub struct ModuleTracker {
    registry: ModuleRegistry,
    host: Arc<dyn ModuleHost>,
    config: TrackerConfig,
    sizer: ClasspathSizer,
}

impl ModuleTracker {
    /// Create a tracker with the default configuration.
    pub fn new(host: Arc<dyn ModuleHost>) -> Self {
        Self::with_config(host, TrackerConfig::default())
    }

    /// Create a tracker with an explicit configuration.
    pub fn with_config(host: Arc<dyn ModuleHost>, config: TrackerConfig) -> Self {
        let sizer = ClasspathSizer::from_config(&config);
        Self {
            registry: ModuleRegistry::new(),
            host,
            config,
            sizer,
        }
    }

    /// The tracker's configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// The underlying registry.
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Snapshot of all tracked records in report order.
    pub fn snapshot(&self) -> Vec<ModuleRecord> {
        self.registry.snapshot()
    }

    /// The `k` modules with the largest resolution latency, slowest first.
    pub fn slowest(&self, k: usize) -> Vec<(ModuleKey, Duration)> {
        latency::slowest(&self.registry.snapshot(), k)
    }

    fn handle_installed(&self, key: &ModuleKey) {
        let mut record = self.registry.upsert(key);
        if record.last_state == modscope_core::ModuleState::Uninstalled {
            // Same-key reinstall: the host reused the identity for a new
            // lifecycle of this module.
            match self.config.reinstall_policy {
                ReinstallPolicy::ResetTimer => {
                    tracing::debug!(module = %key, "reinstall, resetting install timer");
                    record.reset_install_timer();
                }
                ReinstallPolicy::KeepOriginal => {}
            }
        }
        // A duplicate installed event for a live record is a no-op; the
        // timestamp was set when the record was created.
    }

    fn handle_resolved(&self, key: &ModuleKey) {
        let recompute = {
            let mut record = self.registry.upsert(key);
            if record.resolution_latency.is_none() {
                // First resolution, or the first one after a reinstall reset
                // the install timer.
                let now = Instant::now();
                record.resolved_at = Some(now);
                record.resolution_latency =
                    Some(now.saturating_duration_since(record.installed_at));
            }
            if record.resolution_order.is_none() {
                // Claimed under the record guard: concurrent resolutions of
                // other modules get distinct contiguous indices, and a
                // duplicate event for this module sees the order already set.
                record.resolution_order = Some(self.registry.next_resolution_order());
            }
            let recompute = record.classpath_size.is_none() || record.needs_recompute;
            record.needs_recompute = false;
            recompute
        };
        if !recompute {
            return;
        }

        // Metric derivation walks resource trees; run it outside the record
        // guard so a slow walk cannot stall events for unrelated modules.
        // Duplicate resolved events may race to the same derivation and
        // write identical values.
        let roots = match self.host.resource_roots(key) {
            Ok(roots) => roots,
            Err(err) => {
                tracing::warn!(module = %key, error = %err, "resource root lookup failed");
                Vec::new()
            }
        };
        let outcome = self.sizer.size(&roots);
        let builder = WiringGraphBuilder::new(self.host.as_ref(), &self.sizer);
        let edges = builder.build_edges(key);
        let transitive =
            builder.transitive_size(key, outcome.classes, &edges, self.config.transitive_policy);
        tracing::debug!(
            module = %key,
            classes = outcome.classes,
            transitive = transitive,
            edges = edges.len(),
            skipped = outcome.skipped.len(),
            "derived resolution metrics"
        );

        let mut record = self.registry.upsert(key);
        record.classpath_size = Some(outcome.classes);
        record.transitive_classpath_size = Some(transitive);
        record.wiring_edges = edges;
        record.skipped_roots = outcome.skipped;
    }
}

impl ModuleEventSink for ModuleTracker {
    fn on_event(&self, event: &RawModuleEvent) {
        let transition = Transition::classify(event);
        tracing::trace!(
            module = %transition.key,
            kind = %transition.kind,
            state = %transition.state,
            "lifecycle event"
        );

        match transition.kind {
            TransitionKind::Installed => self.handle_installed(&transition.key),
            TransitionKind::Resolved => self.handle_resolved(&transition.key),
            TransitionKind::Unresolved => {
                let mut record = self.registry.upsert(&transition.key);
                record.needs_recompute = true;
            }
            TransitionKind::Unknown => {
                tracing::debug!(
                    module = %transition.key,
                    code = event.event_code,
                    "ignoring unclassifiable event"
                );
                // Unclassifiable events update the state of a known module
                // but never create a record.
                if let Some(mut record) = self.registry.get_mut(&transition.key) {
                    record.last_state = transition.state;
                }
                return;
            }
            _ => {}
        }

        let mut record = self.registry.upsert(&transition.key);
        record.last_state = transition.state;
    }
}

impl std::fmt::Debug for ModuleTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleTracker")
            .field("modules", &self.registry.len())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    use modscope_core::{ModuleState, event, state};
    use modscope_host::{SimHost, WiringRequirement};

    fn installed(key: &ModuleKey) -> RawModuleEvent {
        RawModuleEvent::new(key.clone(), event::codes::INSTALLED, state::codes::INSTALLED)
    }

    fn resolved(key: &ModuleKey) -> RawModuleEvent {
        RawModuleEvent::new(key.clone(), event::codes::RESOLVED, state::codes::RESOLVED)
    }

    fn unresolved(key: &ModuleKey) -> RawModuleEvent {
        RawModuleEvent::new(key.clone(), event::codes::UNRESOLVED, state::codes::INSTALLED)
    }

    fn uninstalled(key: &ModuleKey) -> RawModuleEvent {
        RawModuleEvent::new(
            key.clone(),
            event::codes::UNINSTALLED,
            state::codes::UNINSTALLED,
        )
    }

    fn write_classes(root: &Path, count: usize) {
        std::fs::create_dir_all(root).unwrap();
        for i in 0..count {
            std::fs::write(root.join(format!("C{i}.class")), b"").unwrap();
        }
    }

    fn tracker_with(host: SimHost) -> ModuleTracker {
        ModuleTracker::new(Arc::new(host))
    }

    fn sim_module(host: &SimHost, name: &str) -> ModuleKey {
        let key = ModuleKey::new(name, "1.0.0");
        host.register(key.clone(), Vec::new(), Vec::new());
        key
    }

    #[test]
    fn test_resolution_order_follows_resolve_order_not_install_order() {
        let host = SimHost::new();
        let a = sim_module(&host, "a");
        let b = sim_module(&host, "b");
        let tracker = tracker_with(host);

        tracker.on_event(&installed(&a));
        tracker.on_event(&installed(&b));
        tracker.on_event(&resolved(&b));
        tracker.on_event(&resolved(&a));

        let registry = tracker.registry();
        assert_eq!(registry.get(&b).unwrap().resolution_order, Some(0));
        assert_eq!(registry.get(&a).unwrap().resolution_order, Some(1));
    }

    #[test]
    fn test_resolution_latency_is_set_and_non_negative() {
        let host = SimHost::new();
        let a = sim_module(&host, "a");
        let tracker = tracker_with(host);

        tracker.on_event(&installed(&a));
        tracker.on_event(&resolved(&a));

        let record = tracker.registry().get(&a).unwrap().clone();
        assert!(record.is_resolved());
        assert!(record.resolution_latency.is_some());
    }

    #[test]
    fn test_duplicate_resolved_event_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("x");
        write_classes(&root, 1);

        let host = SimHost::new();
        let x = ModuleKey::new("x", "1.0.0");
        host.register(x.clone(), vec![root.clone()], Vec::new());
        let tracker = tracker_with(host);

        tracker.on_event(&installed(&x));
        tracker.on_event(&resolved(&x));
        let first = tracker.registry().get(&x).unwrap().clone();

        // Grow the tree, then deliver a duplicate resolved event. Nothing
        // may be recomputed.
        write_classes(&root, 2);
        tracker.on_event(&resolved(&x));
        let second = tracker.registry().get(&x).unwrap().clone();

        assert_eq!(second.resolved_at, first.resolved_at);
        assert_eq!(second.resolution_order, first.resolution_order);
        assert_eq!(second.classpath_size, Some(1));
    }

    #[test]
    fn test_unresolved_then_resolved_recomputes_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("x");
        write_classes(&root, 1);

        let host = SimHost::new();
        let x = ModuleKey::new("x", "1.0.0");
        host.register(x.clone(), vec![root.clone()], Vec::new());
        let tracker = tracker_with(host);

        tracker.on_event(&installed(&x));
        tracker.on_event(&resolved(&x));
        let first = tracker.registry().get(&x).unwrap().clone();
        assert_eq!(first.classpath_size, Some(1));

        write_classes(&root, 2);
        tracker.on_event(&unresolved(&x));
        tracker.on_event(&resolved(&x));
        let second = tracker.registry().get(&x).unwrap().clone();

        // Metrics recomputed, but the first-resolution facts are kept.
        assert_eq!(second.classpath_size, Some(2));
        assert_eq!(second.resolved_at, first.resolved_at);
        assert_eq!(second.resolution_order, first.resolution_order);
    }

    #[test]
    fn test_reinstall_resets_install_timer() {
        let host = SimHost::new();
        let a = sim_module(&host, "a");
        let tracker = tracker_with(host);

        tracker.on_event(&installed(&a));
        tracker.on_event(&resolved(&a));
        assert!(tracker.registry().get(&a).unwrap().resolution_latency.is_some());

        tracker.on_event(&uninstalled(&a));
        tracker.on_event(&installed(&a));

        let record = tracker.registry().get(&a).unwrap().clone();
        // The stale latency from the previous lifecycle is invalidated.
        assert!(record.resolution_latency.is_none());
        assert_eq!(record.last_state, ModuleState::Installed);
        assert_eq!(tracker.registry().len(), 1);

        // Resolving the new lifecycle derives a fresh latency against the
        // reset timer; the resolution order is not reissued.
        tracker.on_event(&resolved(&a));
        let record = tracker.registry().get(&a).unwrap().clone();
        assert!(record.resolution_latency.is_some());
        assert_eq!(record.resolution_order, Some(0));
    }

    #[test]
    fn test_keep_original_policy_preserves_latency() {
        let host = SimHost::new();
        let a = sim_module(&host, "a");
        let config = TrackerConfig::new().with_reinstall_policy(ReinstallPolicy::KeepOriginal);
        let tracker = ModuleTracker::with_config(Arc::new(host), config);

        tracker.on_event(&installed(&a));
        tracker.on_event(&resolved(&a));
        let latency = tracker.registry().get(&a).unwrap().resolution_latency;

        tracker.on_event(&uninstalled(&a));
        tracker.on_event(&installed(&a));
        assert_eq!(tracker.registry().get(&a).unwrap().resolution_latency, latency);

        // The preserved latency is not overwritten by the new resolution.
        tracker.on_event(&resolved(&a));
        assert_eq!(tracker.registry().get(&a).unwrap().resolution_latency, latency);
    }

    #[test]
    fn test_reinstalled_module_reappears_in_latency_metrics() {
        let host = SimHost::new();
        let a = sim_module(&host, "a");
        let tracker = tracker_with(host);

        tracker.on_event(&installed(&a));
        tracker.on_event(&resolved(&a));
        tracker.on_event(&unresolved(&a));
        tracker.on_event(&uninstalled(&a));
        tracker.on_event(&installed(&a));
        tracker.on_event(&resolved(&a));

        let record = tracker.registry().get(&a).unwrap().clone();
        assert!(record.resolution_latency.is_some());
        assert_eq!(record.last_state, ModuleState::Resolved);
        // A freshly resolved module must show up in the latency report.
        assert_eq!(tracker.slowest(1)[0].0, a);
    }

    #[test]
    fn test_inaccessible_roots_degrade_to_zero() {
        let host = SimHost::new();
        let z = sim_module(&host, "z");
        let ok = sim_module(&host, "ok");
        host.fail_roots_for(z.clone());
        let tracker = tracker_with(host);

        tracker.on_event(&installed(&z));
        tracker.on_event(&installed(&ok));
        tracker.on_event(&resolved(&z));
        tracker.on_event(&resolved(&ok));

        assert_eq!(tracker.registry().get(&z).unwrap().classpath_size, Some(0));
        // Other modules are unaffected.
        assert_eq!(tracker.registry().get(&ok).unwrap().classpath_size, Some(0));
        assert_eq!(tracker.registry().get(&ok).unwrap().resolution_order, Some(1));
    }

    #[test]
    fn test_one_hop_transitive_size_through_package_wire() {
        let dir = tempfile::tempdir().unwrap();
        let x_root = dir.path().join("x");
        let y_root = dir.path().join("y");
        write_classes(&x_root, 5);
        write_classes(&y_root, 3);

        let host = SimHost::new();
        let y = ModuleKey::new("y", "1.0.0");
        let x = ModuleKey::new("x", "1.0.0");
        host.register(y.clone(), vec![y_root], Vec::new());
        host.register(
            x.clone(),
            vec![x_root],
            vec![WiringRequirement::package(y.clone(), "y.api")],
        );
        let tracker = tracker_with(host);

        tracker.on_event(&installed(&y));
        tracker.on_event(&installed(&x));
        tracker.on_event(&resolved(&y));
        tracker.on_event(&resolved(&x));

        let record = tracker.registry().get(&x).unwrap().clone();
        assert_eq!(record.classpath_size, Some(5));
        assert_eq!(record.transitive_classpath_size, Some(8));
        assert_eq!(record.wiring_edges.len(), 1);
        assert_eq!(record.wiring_edges[0].provider, y);
    }

    #[test]
    fn test_uninstall_keeps_the_record() {
        let host = SimHost::new();
        let a = sim_module(&host, "a");
        let tracker = tracker_with(host);

        tracker.on_event(&installed(&a));
        tracker.on_event(&resolved(&a));
        tracker.on_event(&uninstalled(&a));

        let record = tracker.registry().get(&a).unwrap().clone();
        assert_eq!(record.last_state, ModuleState::Uninstalled);
        assert_eq!(record.resolution_order, Some(0));
        assert_eq!(tracker.registry().len(), 1);
    }

    #[test]
    fn test_unknown_event_never_creates_a_record() {
        let host = SimHost::new();
        let tracker = tracker_with(host);
        let ghost = ModuleKey::new("ghost", "1.0.0");

        tracker.on_event(&RawModuleEvent::new(ghost, 0x8000, 0x8000));
        assert!(tracker.registry().is_empty());
    }

    #[test]
    fn test_unknown_event_updates_state_of_known_module() {
        let host = SimHost::new();
        let a = sim_module(&host, "a");
        let tracker = tracker_with(host);

        tracker.on_event(&installed(&a));
        tracker.on_event(&RawModuleEvent::new(a.clone(), 0x8000, 0x8000));

        assert_eq!(tracker.registry().get(&a).unwrap().last_state, ModuleState::Unknown);
    }

    #[test]
    fn test_concurrent_resolutions_get_contiguous_orders() {
        let host = SimHost::new();
        let keys: Vec<ModuleKey> =
            (0..64).map(|i| sim_module(&host, &format!("m{i}"))).collect();
        let tracker = tracker_with(host);

        std::thread::scope(|scope| {
            for chunk in keys.chunks(8) {
                let tracker = &tracker;
                scope.spawn(move || {
                    for key in chunk {
                        tracker.on_event(&installed(key));
                        tracker.on_event(&resolved(key));
                        // Exercise the duplicate path under contention too.
                        tracker.on_event(&resolved(key));
                    }
                });
            }
        });

        let mut orders: Vec<u64> = tracker
            .snapshot()
            .into_iter()
            .map(|record| record.resolution_order.unwrap())
            .collect();
        orders.sort_unstable();
        let expected: Vec<u64> = (0..64).collect();
        assert_eq!(orders, expected);
    }

    #[test]
    fn test_slowest_reports_resolved_modules() {
        let host = SimHost::new();
        let a = sim_module(&host, "a");
        let b = sim_module(&host, "b");
        let tracker = tracker_with(host);

        tracker.on_event(&installed(&a));
        tracker.on_event(&installed(&b));
        tracker.on_event(&resolved(&a));

        let slowest = tracker.slowest(5);
        assert_eq!(slowest.len(), 1);
        assert_eq!(slowest[0].0, a);
    }

    #[test]
    fn test_snapshot_best_effort_shape() {
        let host = SimHost::new();
        let a = sim_module(&host, "a");
        let b = sim_module(&host, "b");
        let tracker = tracker_with(host);

        tracker.on_event(&installed(&a));
        tracker.on_event(&installed(&b));
        tracker.on_event(&resolved(&b));

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.len(), 2);
        // Resolved modules come first, unresolved last.
        assert_eq!(snapshot[0].key, b);
        assert_eq!(snapshot[1].key, a);
        assert_eq!(snapshot[1].classpath_size, None);
    }

    #[test]
    fn test_roots_are_recorded_when_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let missing: PathBuf = dir.path().join("missing");

        let host = SimHost::new();
        let x = ModuleKey::new("x", "1.0.0");
        host.register(x.clone(), vec![missing.clone()], Vec::new());
        let tracker = tracker_with(host);

        tracker.on_event(&installed(&x));
        tracker.on_event(&resolved(&x));

        let record = tracker.registry().get(&x).unwrap().clone();
        assert_eq!(record.classpath_size, Some(0));
        assert_eq!(record.skipped_roots, vec![missing]);
    }
}
