//! Modscope Metrics Derivation
//!
//! This crate derives the per-module metrics of the Modscope tracker:
//!
//! - [`ClasspathSizer`]: counts class-like resources under a module's
//!   resource roots, one archive level deep
//! - [`WiringGraphBuilder`]: records dependency edges to concrete provider
//!   modules and expands transitive classpath size over them
//!
//! All derivation is best-effort: an unreadable resource or a failed host
//! query degrades the affected metric to zero/absent and is logged, rather
//! than aborting the tracking of other modules.
//!
//! # Sizing
//!
//! ```no_run
//! use modscope_metrics::ClasspathSizer;
//! use std::path::PathBuf;
//!
//! let sizer = ClasspathSizer::new();
//! let outcome = sizer.size(&[PathBuf::from("/modules/util")]);
//! println!("{} classes ({} roots skipped)", outcome.classes, outcome.skipped.len());
//! ```

pub mod classpath;
pub mod wiring;

// Re-export main types
pub use classpath::{ClasspathSizer, SizingOutcome};
pub use wiring::{WiringEdge, WiringGraphBuilder};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::classpath::{ClasspathSizer, SizingOutcome};
    pub use crate::wiring::{WiringEdge, WiringGraphBuilder};
}
