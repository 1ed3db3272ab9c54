//! Per-module tracked state.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use modscope_core::{ModuleKey, ModuleState};
use modscope_metrics::WiringEdge;

/// Everything the tracker knows about one module.
///
/// A record is created on first sighting and lives for the rest of the run;
/// uninstalling a module only updates [`last_state`](Self::last_state), so
/// historical metrics stay reportable at shutdown.
///
/// Timestamps come from the monotonic clock. Wall-clock time is never used
/// for latency arithmetic.
#[derive(Debug, Clone)]
pub struct ModuleRecord {
    /// Identity of the tracked module.
    pub key: ModuleKey,
    /// First-sighting sequence number; snapshot tie-break for unresolved
    /// modules.
    pub install_seq: u64,
    /// When the module was installed (reset on same-key reinstall under the
    /// default policy).
    pub installed_at: Instant,
    /// When the module was resolved, refreshed when a reinstall resets the
    /// install timer.
    pub resolved_at: Option<Instant>,
    /// `resolved_at - installed_at`, absent until resolution.
    pub resolution_latency: Option<Duration>,
    /// 0-based global resolution sequence number, assigned exactly once.
    pub resolution_order: Option<u64>,
    /// Direct class-like resource count, absent until resolution.
    pub classpath_size: Option<u64>,
    /// Classpath size expanded over wiring edges per the configured policy.
    pub transitive_classpath_size: Option<u64>,
    /// Dependency edges to concrete provider modules, in host order.
    pub wiring_edges: Vec<WiringEdge>,
    /// Resource roots the sizer could not read.
    pub skipped_roots: Vec<PathBuf>,
    /// State after the most recent event.
    pub last_state: ModuleState,
    /// Set when the module loses its resolution; the next resolved
    /// transition recomputes the derived metrics.
    pub(crate) needs_recompute: bool,
}

impl ModuleRecord {
    pub(crate) fn new(key: ModuleKey, install_seq: u64) -> Self {
        Self {
            key,
            install_seq,
            installed_at: Instant::now(),
            resolved_at: None,
            resolution_latency: None,
            resolution_order: None,
            classpath_size: None,
            transitive_classpath_size: None,
            wiring_edges: Vec::new(),
            skipped_roots: Vec::new(),
            last_state: ModuleState::Installed,
            needs_recompute: false,
        }
    }

    /// Whether the module has been resolved at least once.
    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }

    /// Restart the install timer for a new lifecycle of the same key.
    ///
    /// The previous latency is invalidated and rederived on the next
    /// resolved transition; the resolution order from the first lifecycle
    /// is kept.
    pub(crate) fn reset_install_timer(&mut self) {
        self.installed_at = Instant::now();
        self.resolution_latency = None;
    }
}
