//! Flat-file export of the enriched season table

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

/// Default export path, relative to the working directory.
pub const DEFAULT_EXPORT_PATH: &str = "batterpoints.csv";

/// Name given to the row-index column (rendered as an empty header field).
const INDEX_COLUMN: &str = "";

/// Write `df` as CSV with a leading, unlabeled, 0-based row-index column.
///
/// The header starts with a bare empty field (`,R,H,...`). Creates or
/// truncates the file at `path`.
pub fn export_with_index(df: &DataFrame, path: &Path) -> Result<()> {
    let mut indexed = df
        .with_row_index(INDEX_COLUMN.into(), None)
        .context("Failed to add row index column")?;

    let mut file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    writeln!(file, "{}", header_line(&indexed))
        .with_context(|| format!("Failed to write CSV header: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(false)
        .finish(&mut indexed)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;

    log::debug!(
        "exported {} rows x {} columns to {}",
        indexed.height(),
        indexed.width(),
        path.display()
    );
    Ok(())
}

/// Header row; the polars writer would quote the empty index name.
fn header_line(df: &DataFrame) -> String {
    df.get_column_names()
        .iter()
        .map(|name| {
            let name = name.as_str();
            if name.contains([',', '"', '\n', '\r']) {
                format!("\"{}\"", name.replace('"', "\"\""))
            } else {
                name.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
