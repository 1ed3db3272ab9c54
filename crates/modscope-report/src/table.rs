//! The tabular report model.

use serde::{Deserialize, Serialize};

/// A named table with a fixed column schema and flat string rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name; also the file stem under a directory sink.
    pub name: String,
    /// Column headers, fixed at construction.
    pub columns: Vec<String>,
    /// Row values; each row has exactly `columns.len()` fields.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given column schema.
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    ///
    /// The row is truncated or padded with empty fields to the column
    /// count, so a malformed row can never skew the CSV layout.
    pub fn push_row(&mut self, row: Vec<String>) {
        let mut row = row;
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as CSV with a header line.
    ///
    /// Fields containing the separator, a quote, or a line break are
    /// quoted, with embedded quotes doubled.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        out.push_str(&csv_line(&self.columns));
        for row in &self.rows {
            out.push_str(&csv_line(row));
        }
        out
    }
}

fn csv_line(fields: &[String]) -> String {
    let mut line = fields
        .iter()
        .map(|field| csv_field(field))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
