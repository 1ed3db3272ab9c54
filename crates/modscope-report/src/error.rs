//! Report errors.

use thiserror::Error;

/// Errors surfaced by report assembly and sinks.
///
/// A sink failure is terminal for the run's report, but it never corrupts
/// the in-memory report set or the registry; both stay inspectable and the
/// write can be retried against another sink.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A table could not be written to the sink.
    #[error("failed to write report table '{table}': {source}")]
    Io {
        /// Name of the table that failed.
        table: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    /// An IO failure while writing the named table.
    pub fn io(table: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            table: table.into(),
            source,
        }
    }
}

/// Result type alias for report operations.
pub type ReportResult<T> = std::result::Result<T, ReportError>;
