use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use super::error::DataError;
use super::model::{Dataset, RawRecord, Schema};

// ---------------------------------------------------------------------------
// Header discovery
// ---------------------------------------------------------------------------

/// Read only the header row of a CSV and return its column names in file
/// order. Fails with [`DataError::EmptySchema`] when there are none.
pub fn discover_columns(path: &Path) -> Result<Vec<String>> {
    let mut reader = open_reader(path)?;
    let schema = read_schema(&mut reader)?;
    Ok(schema.columns().to_vec())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Load a whole CSV into memory. Every cell is kept as raw text.
///
/// Records shorter than the header are padded with empty cells; longer ones
/// are rejected with [`DataError::RaggedRow`].
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = open_reader(path)?;
    let schema = read_schema(&mut reader)?;
    let width = schema.len();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() > width {
            return Err(DataError::RaggedRow {
                row: row_no,
                found: record.len(),
                expected: width,
            }
            .into());
        }
        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        cells.resize(width, String::new());
        rows.push(RawRecord::new(cells));
    }

    Ok(Dataset::new(schema, rows))
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))
}

fn read_schema(reader: &mut csv::Reader<File>) -> Result<Schema> {
    let headers = reader.headers().context("reading CSV headers")?;
    Ok(Schema::from_header(headers.iter())?)
}

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

/// Write `dataset` to `path` (header first, no index column).
///
/// The rows go to a temporary file beside `path` which is renamed into place
/// only once everything is flushed, so a failure never leaves a truncated
/// output behind.
pub fn write_csv(path: &Path, dataset: &Dataset) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;

    let mut writer = csv::Writer::from_writer(tmp);
    writer
        .write_record(dataset.schema.columns())
        .context("writing CSV header")?;
    for (row_no, row) in dataset.rows.iter().enumerate() {
        writer
            .write_record(row.cells())
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }

    let mut tmp = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV output: {}", e.error()))?;
    tmp.flush().context("flushing CSV output")?;
    tmp.as_file().sync_all().context("syncing CSV output")?;
    tmp.persist(path)
        .with_context(|| format!("moving output into place at {}", path.display()))?;
    Ok(())
}
