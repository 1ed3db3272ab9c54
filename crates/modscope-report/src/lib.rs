//! Modscope Reports
//!
//! This crate flattens a tracking run into named tabular reports and hands
//! them to a sink:
//!
//! - [`ReportAssembler`]: builds the table set from a registry snapshot
//! - [`Table`]: named table with a fixed column schema
//! - [`ReportSink`]: abstract destination, with [`CsvDirSink`] and
//!   [`MemorySink`] implementations
//!
//! # Assembling and writing
//!
//! ```no_run
//! use modscope_report::{CsvDirSink, ReportAssembler};
//! # let records: Vec<modscope_track::ModuleRecord> = Vec::new();
//!
//! let set = ReportAssembler::new().assemble(&records);
//! let mut sink = CsvDirSink::default();
//! set.write_to(&mut sink)?;
//! # Ok::<(), modscope_report::ReportError>(())
//! ```
//!
//! A sink failure is terminal for that write but leaves the report set and
//! the registry intact; the set can be written again elsewhere.

pub mod assemble;
pub mod error;
pub mod sink;
pub mod table;

// Re-export main types
pub use assemble::{ReportAssembler, ReportSet, RunId, names};
pub use error::{ReportError, ReportResult};
pub use sink::{CsvDirSink, DEFAULT_REPORT_DIR, MemorySink, ReportSink};
pub use table::Table;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::assemble::{ReportAssembler, ReportSet, RunId};
    pub use crate::error::{ReportError, ReportResult};
    pub use crate::sink::{CsvDirSink, MemorySink, ReportSink};
    pub use crate::table::Table;
}
