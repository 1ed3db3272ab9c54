//! Flattening the final registry snapshot into named tables.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use modscope_track::ModuleRecord;

use crate::error::ReportResult;
use crate::sink::ReportSink;
use crate::table::Table;

/// Names of the assembled tables.
pub mod names {
    /// Final lifecycle state of every observed module.
    pub const MODULE_STATES: &str = "bundles-info";
    /// Resolution latency of resolved modules, in nanoseconds.
    pub const RESOLUTION_LATENCY: &str = "performance-info";
    /// Direct classpath size of sized modules.
    pub const CLASSPATH: &str = "classpath-info";
    /// Classpath size expanded over wiring edges.
    pub const TRANSITIVE_CLASSPATH: &str = "classpath-dependencies-info";
    /// One row per wiring edge.
    pub const WIRINGS: &str = "wirings-info";
    /// Global resolution order of resolved modules.
    pub const RESOLUTION_ORDER: &str = "resolved-bundles-info";
}

/// Unique identifier for one assembled report set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random run ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The full set of tables assembled from one run.
#[derive(Debug, Clone)]
pub struct ReportSet {
    /// Identifier of this assembly.
    pub run_id: RunId,
    /// The assembled tables, in a fixed order.
    pub tables: Vec<Table>,
}

impl ReportSet {
    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }

    /// Write every table to the sink.
    ///
    /// The first sink failure is returned; the in-memory set is unchanged
    /// and can be written again to another sink.
    pub fn write_to(&self, sink: &mut dyn ReportSink) -> ReportResult<()> {
        for table in &self.tables {
            sink.write_table(table)?;
        }
        tracing::info!(run_id = %self.run_id, tables = self.tables.len(), "report written");
        Ok(())
    }
}

/// Assembles the final registry snapshot into tabular reports.
///
/// Every table is independently nullable-safe: a record missing a derived
/// field is omitted from that table only, never from the others.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportAssembler;

impl ReportAssembler {
    /// Create an assembler.
    pub fn new() -> Self {
        Self
    }

    /// Build the report set from a registry snapshot.
    ///
    /// Rows follow the snapshot order (resolution order, unresolved
    /// modules last).
    pub fn assemble(&self, records: &[ModuleRecord]) -> ReportSet {
        ReportSet {
            run_id: RunId::new(),
            tables: vec![
                self.module_states(records),
                self.resolution_latency(records),
                self.classpath(records),
                self.transitive_classpath(records),
                self.wirings(records),
                self.resolution_order(records),
            ],
        }
    }

    fn module_states(&self, records: &[ModuleRecord]) -> Table {
        let mut table = Table::new(names::MODULE_STATES, &["Bundle", "State"]);
        for record in records {
            table.push_row(vec![record.key.to_string(), record.last_state.to_string()]);
        }
        table
    }

    fn resolution_latency(&self, records: &[ModuleRecord]) -> Table {
        let mut table = Table::new(names::RESOLUTION_LATENCY, &["Bundle", "Resolving Time"]);
        for record in records {
            if let Some(latency) = record.resolution_latency {
                table.push_row(vec![record.key.to_string(), latency.as_nanos().to_string()]);
            }
        }
        table
    }

    fn classpath(&self, records: &[ModuleRecord]) -> Table {
        let mut table = Table::new(names::CLASSPATH, &["Bundle", "Classpath Size"]);
        for record in records {
            if let Some(size) = record.classpath_size {
                table.push_row(vec![record.key.to_string(), size.to_string()]);
            }
        }
        table
    }

    fn transitive_classpath(&self, records: &[ModuleRecord]) -> Table {
        let mut table = Table::new(names::TRANSITIVE_CLASSPATH, &["Bundle", "Classpath Size"]);
        for record in records {
            if let Some(size) = record.transitive_classpath_size {
                table.push_row(vec![record.key.to_string(), size.to_string()]);
            }
        }
        table
    }

    fn wirings(&self, records: &[ModuleRecord]) -> Table {
        let mut table = Table::new(
            names::WIRINGS,
            &["Bundle", "Dependency Type", "Wired Bundle", "Package"],
        );
        for record in records {
            for edge in &record.wiring_edges {
                table.push_row(vec![
                    record.key.to_string(),
                    edge.kind.to_string(),
                    edge.provider.to_string(),
                    edge.package.clone().unwrap_or_default(),
                ]);
            }
        }
        table
    }

    fn resolution_order(&self, records: &[ModuleRecord]) -> Table {
        let mut table = Table::new(names::RESOLUTION_ORDER, &["Bundle", "Resolved Bundles"]);
        for record in records {
            if let Some(order) = record.resolution_order {
                table.push_row(vec![record.key.to_string(), order.to_string()]);
            }
        }
        table
    }
}
