//! Report sinks.

use std::path::PathBuf;

use crate::error::{ReportError, ReportResult};
use crate::table::Table;

/// Default directory for the CSV report set.
pub const DEFAULT_REPORT_DIR: &str = "framework-metadata";

/// Destination for assembled tables.
pub trait ReportSink {
    /// Write one table.
    fn write_table(&mut self, table: &Table) -> ReportResult<()>;
}

/// Writes each table as `<name>.csv` under a target directory.
///
/// Parent directories are created on the first write.
#[derive(Debug, Clone)]
pub struct CsvDirSink {
    dir: PathBuf,
}

impl CsvDirSink {
    /// Create a sink writing under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The target directory.
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

impl Default for CsvDirSink {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_DIR)
    }
}

impl ReportSink for CsvDirSink {
    fn write_table(&mut self, table: &Table) -> ReportResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|err| ReportError::io(&table.name, err))?;
        let path = self.dir.join(format!("{}.csv", table.name));
        std::fs::write(&path, table.to_csv())
            .map_err(|err| ReportError::io(&table.name, err))?;
        tracing::debug!(table = %table.name, path = %path.display(), rows = table.len(), "table written");
        Ok(())
    }
}

/// Collects tables in memory, for tests and for callers that post-process
/// the report themselves.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    tables: Vec<Table>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected tables, in write order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }
}

impl ReportSink for MemorySink {
    fn write_table(&mut self, table: &Table) -> ReportResult<()> {
        self.tables.push(table.clone());
        Ok(())
    }
}
