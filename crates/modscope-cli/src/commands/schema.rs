//! Print the report table schemas.

use anyhow::Result;

use modscope::prelude::*;

use crate::OutputFormat;

/// Execute the schema command.
pub fn execute(format: OutputFormat) -> Result<()> {
    // An empty assembly carries the full schema and no rows.
    let set = ReportAssembler::new().assemble(&[]);

    match format {
        OutputFormat::Human => {
            for table in &set.tables {
                println!("{}.csv", table.name);
                for column in &table.columns {
                    println!("  {column}");
                }
            }
        }
        OutputFormat::Json => {
            let schema = set
                .tables
                .iter()
                .map(|table| {
                    serde_json::json!({
                        "table": table.name,
                        "columns": table.columns,
                    })
                })
                .collect::<Vec<_>>();
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }
    Ok(())
}
