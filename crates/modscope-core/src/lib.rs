//! Modscope Core - identity and lifecycle types
//!
//! This crate provides the foundation types for the Modscope module
//! observability tracker:
//!
//! - [`ModuleKey`]: module identity (symbolic name + version)
//! - [`ModuleState`]: typed module lifecycle states
//! - [`Transition`]: classification of raw host events into typed transitions
//! - [`TrackerConfig`]: tracker policies and resource suffixes
//!
//! # Event Classification
//!
//! ```
//! use modscope_core::{ModuleKey, RawModuleEvent, Transition, TransitionKind};
//! use modscope_core::{event, state};
//!
//! let raw = RawModuleEvent::new(
//!     ModuleKey::new("com.example.util", "1.0.0"),
//!     event::codes::RESOLVED,
//!     state::codes::RESOLVED,
//! );
//!
//! let transition = Transition::classify(&raw);
//! assert_eq!(transition.kind, TransitionKind::Resolved);
//! ```
//!
//! Classification is total: raw codes the crate does not recognize map to
//! the `Unknown` variants instead of failing. The tracker must never lose
//! its registry because of one malformed event.

pub mod config;
pub mod event;
pub mod key;
pub mod state;

// Re-export main types at crate root
pub use config::{ReinstallPolicy, TrackerConfig, TransitivePolicy};
pub use event::{RawModuleEvent, Transition, TransitionKind};
pub use key::ModuleKey;
pub use state::ModuleState;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{ReinstallPolicy, TrackerConfig, TransitivePolicy};
    pub use crate::event::{RawModuleEvent, Transition, TransitionKind};
    pub use crate::key::ModuleKey;
    pub use crate::state::ModuleState;
}
