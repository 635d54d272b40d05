use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use super::error::DataError;
use super::timestamp::CanonicalInstant;

// ---------------------------------------------------------------------------
// Schema – header column names
// ---------------------------------------------------------------------------

/// Ordered column names from the header row. Never empty.
///
/// Duplicate names are kept verbatim so the header can be written back
/// unchanged; lookups resolve to the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Build a schema from header fields, rejecting a header with no names.
    ///
    /// A lone blank field is what a blank first line looks like, so it is
    /// treated as no columns at all.
    pub fn from_header<I, S>(fields: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = fields.into_iter().map(Into::into).collect();
        let blank = match columns.as_slice() {
            [] => true,
            [only] => only.trim().is_empty(),
            _ => false,
        };
        if blank {
            return Err(DataError::EmptySchema);
        }
        Ok(Schema { columns })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Position of `name` in the header.
    pub fn index_of(&self, name: &str) -> Result<usize, DataError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))
    }
}

// ---------------------------------------------------------------------------
// RawRecord – one row of the CSV
// ---------------------------------------------------------------------------

/// One data row, cells aligned with the schema. Cells are never rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    cells: Vec<String>,
}

impl RawRecord {
    pub fn new(cells: Vec<String>) -> Self {
        RawRecord { cells }
    }

    /// Cell at `idx`; an empty cell reads as `None` (the null marker).
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.cells
            .get(idx)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// A fully materialised CSV table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub schema: Schema,
    pub rows: Vec<RawRecord>,
}

impl Dataset {
    pub fn new(schema: Schema, rows: Vec<RawRecord>) -> Self {
        Dataset { schema, rows }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copy the rows at `indices` (in the given order) into a new dataset
    /// with the same schema.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        let rows = indices
            .iter()
            .filter_map(|&i| self.rows.get(i).cloned())
            .collect();
        Dataset {
            schema: self.schema.clone(),
            rows,
        }
    }
}

// ---------------------------------------------------------------------------
// TimeWindow – the closed UTC range used for filtering
// ---------------------------------------------------------------------------

/// Closed interval `[start, end]` in UTC. `start <= end` is not enforced;
/// an inverted window simply contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        TimeWindow { start, end }
    }

    /// Inclusive at both ends.
    pub fn contains(&self, t: &CanonicalInstant) -> bool {
        let t = t.as_utc();
        self.start <= t && t <= self.end
    }
}

// ---------------------------------------------------------------------------
// WindowBound – one date + clock selection from the form
// ---------------------------------------------------------------------------

/// A civil date plus hour/minute/second, read as a UTC instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBound {
    pub date: NaiveDate,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl WindowBound {
    pub fn new(date: NaiveDate, hour: u32, minute: u32, second: u32) -> Self {
        WindowBound {
            date,
            hour,
            minute,
            second,
        }
    }

    /// Hour 0–23, minute and second 0–59; leap seconds are not accepted.
    pub fn to_utc(&self) -> Result<DateTime<Utc>, DataError> {
        let invalid = DataError::InvalidTime {
            hour: self.hour,
            minute: self.minute,
            second: self.second,
        };
        if self.second > 59 {
            return Err(invalid);
        }
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, self.second).ok_or(invalid)?;
        Ok(DateTime::<Utc>::from_naive_utc_and_offset(
            self.date.and_time(time),
            Utc,
        ))
    }
}
