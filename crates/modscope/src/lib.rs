//! # Modscope - Module Resolution Observability
//!
//! Modscope observes the lifecycle of a dynamic, pluggable module system
//! and derives cross-module metrics from it: resolution latency, classpath
//! and transitive-dependency size, a dependency wiring graph, and the
//! global resolution order.
//!
//! ## Features
//!
//! - **Lifecycle Correlation**: install/resolve/start/stop transitions are
//!   correlated per module across an entire run
//! - **Derived Metrics**: classpath sizing over resource trees and
//!   archives, wiring edges to concrete providers, resolution ordering
//! - **Best-Effort by Design**: a malformed event or unreadable resource
//!   degrades one metric, never the run
//! - **Host-Agnostic**: the core sees the runtime only through the
//!   [`ModuleHost`] and [`ModuleEventSink`] seams
//!
//! ## Quick Start
//!
//! ```ignore
//! use modscope::prelude::*;
//! use std::sync::Arc;
//!
//! // Wrap your runtime's introspection in a ModuleHost and build a session.
//! let session = Modscope::builder(host)
//!     .with_transitive_policy(TransitivePolicy::OneHop)
//!     .build();
//!
//! // Deliver lifecycle events from the runtime's callbacks.
//! session.on_event(&event);
//!
//! // At shutdown, flatten the run into CSV tables.
//! let mut sink = CsvDirSink::default();
//! session.write_report(&mut sink)?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 Host module runtime                  │
//! │        (events in, introspection queries out)        │
//! ├──────────────────────────────────────────────────────┤
//! │                  modscope (facade)                   │
//! ├──────────────┬───────────────────┬───────────────────┤
//! │ modscope-    │ modscope-track    │ modscope-report   │
//! │ metrics      │ (registry,        │ (tables, sinks)   │
//! │ (classpath,  │  tracker)         │                   │
//! │  wiring)     │                   │                   │
//! ├──────────────┴───────────────────┴───────────────────┤
//! │        modscope-core  /  modscope-host (seams)       │
//! └──────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use modscope_core::{ModuleKey, RawModuleEvent, ReinstallPolicy, TrackerConfig, TransitivePolicy};
use modscope_host::{ModuleEventSink, ModuleHost};
use modscope_report::{ReportAssembler, ReportResult, ReportSet, ReportSink};
use modscope_track::{ModuleRecord, ModuleTracker};

// Re-export from sub-crates
pub use modscope_core;
pub use modscope_host;
pub use modscope_metrics;
pub use modscope_report;
pub use modscope_track;

/// Main entry point for Modscope.
pub struct Modscope;

impl Modscope {
    /// Create a session builder over a host.
    pub fn builder(host: Arc<dyn ModuleHost>) -> ModscopeBuilder {
        ModscopeBuilder::new(host)
    }

    /// Create a session with the default configuration.
    pub fn with_defaults(host: Arc<dyn ModuleHost>) -> ModscopeSession {
        ModscopeBuilder::new(host).build()
    }
}

/// Builder for configuring a tracking session.
pub struct ModscopeBuilder {
    host: Arc<dyn ModuleHost>,
    config: TrackerConfig,
}

impl ModscopeBuilder {
    /// Create a builder with the default configuration.
    pub fn new(host: Arc<dyn ModuleHost>) -> Self {
        Self {
            host,
            config: TrackerConfig::default(),
        }
    }

    /// Replace the whole tracker configuration.
    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the transitive classpath expansion policy.
    pub fn with_transitive_policy(mut self, policy: TransitivePolicy) -> Self {
        self.config.transitive_policy = policy;
        self
    }

    /// Set the same-key reinstall policy.
    pub fn with_reinstall_policy(mut self, policy: ReinstallPolicy) -> Self {
        self.config.reinstall_policy = policy;
        self
    }

    /// Build the session.
    pub fn build(self) -> ModscopeSession {
        tracing::debug!(config = ?self.config, "starting tracking session");
        ModscopeSession {
            tracker: ModuleTracker::with_config(self.host, self.config),
            assembler: ReportAssembler::new(),
        }
    }
}

/// One tracking run: a tracker plus a report assembler.
///
/// The session itself is the event sink; hand a reference to the host's
/// subscription machinery and call [`write_report`](Self::write_report) at
/// shutdown.
pub struct ModscopeSession {
    tracker: ModuleTracker,
    assembler: ReportAssembler,
}

impl ModscopeSession {
    /// The underlying tracker.
    pub fn tracker(&self) -> &ModuleTracker {
        &self.tracker
    }

    /// Snapshot of all tracked records in report order.
    pub fn snapshot(&self) -> Vec<ModuleRecord> {
        self.tracker.snapshot()
    }

    /// The `k` modules with the largest resolution latency, slowest first.
    pub fn slowest(&self, k: usize) -> Vec<(ModuleKey, Duration)> {
        self.tracker.slowest(k)
    }

    /// Assemble the report set from the current snapshot.
    pub fn assemble(&self) -> ReportSet {
        self.assembler.assemble(&self.tracker.snapshot())
    }

    /// Assemble and write the report set to a sink.
    pub fn write_report(&self, sink: &mut dyn ReportSink) -> ReportResult<()> {
        self.assemble().write_to(sink)
    }
}

impl ModuleEventSink for ModscopeSession {
    fn on_event(&self, event: &RawModuleEvent) {
        self.tracker.on_event(event);
    }
}

impl std::fmt::Debug for ModscopeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModscopeSession")
            .field("tracker", &self.tracker)
            .finish()
    }
}

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```ignore
/// use modscope::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Modscope, ModscopeBuilder, ModscopeSession};
    pub use modscope_core::prelude::*;
    pub use modscope_host::prelude::*;
    pub use modscope_report::prelude::*;
    pub use modscope_track::prelude::*;
}
