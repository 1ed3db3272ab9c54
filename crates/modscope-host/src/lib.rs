//! Modscope Host Abstraction
//!
//! This crate decouples the Modscope tracker from any concrete module
//! runtime. It includes:
//!
//! - [`ModuleHost`]: introspection queries (resource roots, satisfied wires)
//! - [`ModuleEventSink`]: the interface the host delivers lifecycle events to
//! - [`SimHost`]: an in-memory scripted host for tests and trace replay
//!
//! The tracker implements [`ModuleEventSink`]; the host runtime owns the
//! subscription machinery and calls the sink from its own callback threads.
//! That keeps the observability core free of any host type hierarchy.
//!
//! # Example
//!
//! ```
//! use modscope_host::{ModuleHost, SimHost, WiringRequirement};
//! use modscope_core::ModuleKey;
//! use std::path::PathBuf;
//!
//! let host = SimHost::new();
//! let key = ModuleKey::new("com.example.util", "1.0.0");
//! host.register(key.clone(), vec![PathBuf::from("/modules/util")], Vec::new());
//!
//! let roots = host.resource_roots(&key).unwrap();
//! assert_eq!(roots.len(), 1);
//! ```

pub mod error;
pub mod host;
pub mod sim;
pub mod sink;

// Re-export main types
pub use error::{HostError, HostResult};
pub use host::{DependencyKind, ModuleHost, WiringRequirement};
pub use sim::SimHost;
pub use sink::ModuleEventSink;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{HostError, HostResult};
    pub use crate::host::{DependencyKind, ModuleHost, WiringRequirement};
    pub use crate::sim::SimHost;
    pub use crate::sink::ModuleEventSink;
}
