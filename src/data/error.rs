use thiserror::Error;

/// Typed failures of the data layer.
///
/// I/O and CSV syntax errors are not listed here: they travel as
/// `anyhow::Error` with context naming the file, and callers look for a
/// `DataError` in the chain to decide how to report a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// The header row yielded no column names.
    #[error("CSV has no columns")]
    EmptySchema,

    /// The requested timestamp column is not part of the header.
    #[error("Column '{0}' not found in the CSV file.")]
    ColumnNotFound(String),

    /// A record has more cells than the header has columns.
    #[error("row {row} has {found} fields but the header has {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    /// A window bound with an out-of-range clock component.
    #[error("invalid time {hour:02}:{minute:02}:{second:02}")]
    InvalidTime { hour: u32, minute: u32, second: u32 },
}
