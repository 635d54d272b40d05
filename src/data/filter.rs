use super::error::DataError;
use super::model::{Dataset, TimeWindow};
use super::timestamp::{parse, ParseOutcome};

// ---------------------------------------------------------------------------
// Filter result
// ---------------------------------------------------------------------------

/// Rows kept by [`filter`] plus a tally of why the others were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterResult {
    /// Indices into `Dataset::rows`, ascending.
    pub indices: Vec<usize>,
    /// Rows examined.
    pub scanned: usize,
    /// Rows whose cell matched none of the accepted formats (or was empty).
    pub unparseable: usize,
    /// Rows with a valid timestamp outside the window.
    pub out_of_range: usize,
}

impl FilterResult {
    pub fn matched(&self) -> usize {
        self.indices.len()
    }

    /// No row fell inside the window. Callers report this instead of
    /// writing an empty file.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Range filter
// ---------------------------------------------------------------------------

/// Select the rows whose `column` parses to an instant inside `window`.
///
/// * `column` is resolved against the header once; an unknown name fails with
///   [`DataError::ColumnNotFound`] whatever the rows contain.
/// * Cells that do not parse are skipped, never reported as errors.
/// * Row order is preserved and nothing is deduplicated.
pub fn filter(
    dataset: &Dataset,
    column: &str,
    window: &TimeWindow,
) -> Result<FilterResult, DataError> {
    let col_idx = dataset.schema.index_of(column)?;

    let mut result = FilterResult {
        scanned: dataset.len(),
        ..FilterResult::default()
    };

    for (row_no, record) in dataset.rows.iter().enumerate() {
        let outcome = record.get(col_idx).map_or(ParseOutcome::Unparseable, parse);
        match outcome.instant() {
            Some(t) if window.contains(&t) => result.indices.push(row_no),
            Some(_) => result.out_of_range += 1,
            None => {
                log::debug!(
                    "Row {row_no}: unparseable timestamp {:?} in column '{column}'",
                    record.get(col_idx).unwrap_or("")
                );
                result.unparseable += 1;
            }
        }
    }

    Ok(result)
}
