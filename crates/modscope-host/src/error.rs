//! Host introspection errors.

use modscope_core::ModuleKey;
use thiserror::Error;

/// Errors from host introspection queries.
///
/// These are always handled at the smallest possible scope by callers:
/// a failed query for one module degrades that module's metrics and never
/// interrupts tracking of other modules.
#[derive(Debug, Error)]
pub enum HostError {
    /// The host has no module under the given key.
    #[error("unknown module: {0}")]
    UnknownModule(ModuleKey),

    /// The host could not answer the query for this module.
    #[error("introspection unavailable for {key}: {reason}")]
    Unavailable {
        /// The module the query was about.
        key: ModuleKey,
        /// Host-provided reason.
        reason: String,
    },

    /// IO error while the host accessed module storage.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for host operations.
pub type HostResult<T> = std::result::Result<T, HostError>;
