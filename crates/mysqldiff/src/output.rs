//! Report rendering.

use std::io::Write;

use clap::ValueEnum;
use mysqldiff_core::{DiffWarning, SchemaDiff};
use serde::Serialize;

use crate::error::Result;

/// How the diff is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The statements as an executable script.
    #[default]
    Text,
    /// A JSON object with statements and warnings.
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    statements: Vec<JsonStatement<'a>>,
    warnings: &'a [DiffWarning],
}

#[derive(Serialize)]
struct JsonStatement<'a> {
    kind: &'static str,
    table: &'a str,
    sql: String,
}

/// Writes `diff` to `out` in the requested format.
///
/// # Errors
///
/// Returns an error if writing fails or the JSON report cannot be
/// serialized.
pub fn write_diff(out: &mut impl Write, diff: &SchemaDiff, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => out.write_all(diff.render().as_bytes())?,
        OutputFormat::Json => {
            let report = JsonReport {
                statements: diff
                    .statements
                    .iter()
                    .map(|s| JsonStatement {
                        kind: s.kind(),
                        table: s.table(),
                        sql: s.to_sql(),
                    })
                    .collect(),
                warnings: &diff.warnings,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            out.write_all(b"\n")?;
        }
    }
    out.flush()?;
    Ok(())
}
