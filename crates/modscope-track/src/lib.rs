//! Modscope Tracking Core
//!
//! This crate holds the stateful heart of the Modscope observability core:
//!
//! - [`ModuleRegistry`]: concurrent map of tracked module records
//! - [`ModuleRecord`]: everything known about one module
//! - [`ModuleTracker`]: the event sink correlating lifecycle transitions
//!   and deriving metrics on resolution
//!
//! # Tracking a run
//!
//! ```
//! use std::sync::Arc;
//! use modscope_core::{ModuleKey, RawModuleEvent, event, state};
//! use modscope_host::{ModuleEventSink, SimHost};
//! use modscope_track::ModuleTracker;
//!
//! let host = SimHost::new();
//! let key = ModuleKey::new("com.example.util", "1.0.0");
//! host.register(key.clone(), Vec::new(), Vec::new());
//!
//! let tracker = ModuleTracker::new(Arc::new(host));
//! tracker.on_event(&RawModuleEvent::new(
//!     key.clone(),
//!     event::codes::INSTALLED,
//!     state::codes::INSTALLED,
//! ));
//! tracker.on_event(&RawModuleEvent::new(
//!     key.clone(),
//!     event::codes::RESOLVED,
//!     state::codes::RESOLVED,
//! ));
//!
//! let snapshot = tracker.snapshot();
//! assert_eq!(snapshot[0].resolution_order, Some(0));
//! ```

pub mod latency;
pub mod record;
pub mod registry;
pub mod tracker;

// Re-export main types
pub use latency::slowest;
pub use record::ModuleRecord;
pub use registry::ModuleRegistry;
pub use tracker::ModuleTracker;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::record::ModuleRecord;
    pub use crate::registry::ModuleRegistry;
    pub use crate::tracker::ModuleTracker;
}
