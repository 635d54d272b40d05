use std::path::{Path, PathBuf};
use std::sync::mpsc::SyncSender;
use std::thread::{self, JoinHandle};

use anyhow::Result;

use crate::data::error::DataError;
use crate::data::filter;
use crate::data::loader;
use crate::data::model::TimeWindow;

// ---------------------------------------------------------------------------
// Messages between a worker and the UI
// ---------------------------------------------------------------------------

/// Final, user-facing outcome of a background job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Header of `path`, which may no longer be the selected input.
    ColumnsLoaded { path: PathBuf, columns: Vec<String> },
    Saved { path: PathBuf, rows: usize },
    NoMatches,
    ColumnNotFound(String),
    EmptySchema,
    /// The form was incomplete; no job was started.
    Invalid(String),
    /// A file dialog was dismissed without a choice.
    NoFile(String),
    /// Any other I/O or CSV failure, with its cause chain.
    Failed(String),
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::ColumnsLoaded { .. } => "Columns Loaded",
            Notice::Saved { .. } => "Success",
            Notice::NoMatches => "No Records",
            Notice::ColumnNotFound(_) => "Column Error",
            Notice::EmptySchema | Notice::Failed(_) => "Error",
            Notice::Invalid(_) => "Input Error",
            Notice::NoFile(_) => "File Error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::ColumnsLoaded { columns, .. } => format!("Loaded {} columns", columns.len()),
            Notice::Saved { path, rows } => {
                format!("Filtered CSV saved successfully!\n{rows} rows written to {}", path.display())
            }
            Notice::NoMatches => "No records found in the specified time range".to_string(),
            Notice::ColumnNotFound(col) => DataError::ColumnNotFound(col.clone()).to_string(),
            Notice::EmptySchema => format!("Failed to read CSV: {}", DataError::EmptySchema),
            Notice::Invalid(msg) | Notice::NoFile(msg) | Notice::Failed(msg) => msg.clone(),
        }
    }

    /// Whether the notice should be shown as a failure.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notice::ColumnNotFound(_)
                | Notice::EmptySchema
                | Notice::Invalid(_)
                | Notice::NoFile(_)
                | Notice::Failed(_)
        )
    }

    /// Pick the notice for a failed job from the error chain.
    pub fn from_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<DataError>() {
            Some(DataError::ColumnNotFound(col)) => Notice::ColumnNotFound(col.clone()),
            Some(DataError::EmptySchema) => Notice::EmptySchema,
            _ => Notice::Failed(format!("{err:#}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    /// A progress line for the log console.
    Log(String),
    /// The job finished; always the last message a worker sends.
    Done(Notice),
}

// ---------------------------------------------------------------------------
// Filter pipeline
// ---------------------------------------------------------------------------

/// Everything one filter run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub column: String,
    pub window: TimeWindow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterReport {
    Saved { path: PathBuf, rows: usize },
    NoMatches,
}

fn emit(sink: &mut dyn FnMut(String), line: String) {
    log::info!("{line}");
    sink(line);
}

/// Load → filter → save, synchronously. Progress lines go to `sink`.
///
/// Nothing is written when no row matches; the output path is only ever
/// replaced by a complete file.
pub fn run_filter(request: &FilterRequest, sink: &mut dyn FnMut(String)) -> Result<FilterReport> {
    emit(
        sink,
        format!(
            "Filtering records from {} to {}",
            request.window.start.format("%Y-%m-%d %H:%M:%S UTC"),
            request.window.end.format("%Y-%m-%d %H:%M:%S UTC")
        ),
    );

    let dataset = loader::load_csv(&request.input)?;
    emit(sink, format!("CSV file read successfully ({} rows)", dataset.len()));
    if dataset.is_empty() {
        emit(sink, "CSV has a header but no data rows".to_string());
    }

    let result = filter::filter(&dataset, &request.column, &request.window)?;
    emit(
        sink,
        format!(
            "Column '{}': {} of {} rows in range, {} out of range, {} unparseable",
            request.column,
            result.matched(),
            result.scanned,
            result.out_of_range,
            result.unparseable
        ),
    );

    if result.is_empty() {
        emit(sink, "No records found in the specified time range".to_string());
        return Ok(FilterReport::NoMatches);
    }

    let selected = dataset.select(&result.indices);
    loader::write_csv(&request.output, &selected)?;
    emit(
        sink,
        format!("Filtered CSV saved successfully: {}", request.output.display()),
    );

    Ok(FilterReport::Saved {
        path: request.output.clone(),
        rows: selected.len(),
    })
}

// ---------------------------------------------------------------------------
// Background workers
// ---------------------------------------------------------------------------

/// Run [`run_filter`] on its own thread, streaming progress and a final
/// [`Notice`] through `tx`. There is no cancellation.
pub fn spawn_filter(
    request: FilterRequest,
    tx: SyncSender<WorkerMessage>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("filter-worker".to_string())
        .spawn(move || {
            let mut sink = |line: String| {
                let _ = tx.send(WorkerMessage::Log(line));
            };
            let notice = match run_filter(&request, &mut sink) {
                Ok(FilterReport::Saved { path, rows }) => Notice::Saved { path, rows },
                Ok(FilterReport::NoMatches) => Notice::NoMatches,
                Err(err) => {
                    emit(&mut sink, format!("Error filtering CSV: {err:#}"));
                    Notice::from_error(&err)
                }
            };
            let _ = tx.send(WorkerMessage::Done(notice));
        })
}

/// Read the header of `path` on its own thread and report the column names.
pub fn spawn_discover(
    path: PathBuf,
    tx: SyncSender<WorkerMessage>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("header-worker".to_string())
        .spawn(move || {
            let mut sink = |line: String| {
                let _ = tx.send(WorkerMessage::Log(line));
            };
            let notice = discover(&path, &mut sink);
            let _ = tx.send(WorkerMessage::Done(notice));
        })
}

fn discover(path: &Path, sink: &mut dyn FnMut(String)) -> Notice {
    match loader::discover_columns(path) {
        Ok(columns) => {
            emit(sink, format!("Loaded columns: {columns:?}"));
            Notice::ColumnsLoaded {
                path: path.to_path_buf(),
                columns,
            }
        }
        Err(err) => {
            log::error!("Failed to read CSV {}: {err:#}", path.display());
            sink(format!("Error reading CSV: {err:#}"));
            Notice::from_error(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::fs;
    use std::sync::mpsc;
    use tempfile::tempdir;

    const SAMPLE: &str = "id,ts\n1,2023-01-01 00:00:00\n2,not-a-date\n3,2023-06-01 12:00:00\n";

    fn year_2023() -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap(),
        )
    }

    fn request(dir: &Path, column: &str, window: TimeWindow) -> FilterRequest {
        let input = dir.join("in.csv");
        fs::write(&input, SAMPLE).unwrap();
        FilterRequest {
            input,
            output: dir.join("out.csv"),
            column: column.to_string(),
            window,
        }
    }

    fn drain(rx: mpsc::Receiver<WorkerMessage>) -> (Vec<String>, Notice) {
        let mut lines = Vec::new();
        for msg in rx {
            match msg {
                WorkerMessage::Log(line) => lines.push(line),
                WorkerMessage::Done(notice) => return (lines, notice),
            }
        }
        panic!("worker hung up without a final notice");
    }

    #[test]
    fn saves_matching_rows_in_order() -> Result<()> {
        let dir = tempdir()?;
        let req = request(dir.path(), "ts", year_2023());
        let mut lines = Vec::new();

        let report = run_filter(&req, &mut |l| lines.push(l))?;
        assert_eq!(
            report,
            FilterReport::Saved {
                path: req.output.clone(),
                rows: 2
            }
        );
        assert_eq!(
            fs::read_to_string(&req.output)?,
            "id,ts\n1,2023-01-01 00:00:00\n3,2023-06-01 12:00:00\n"
        );
        assert!(lines.iter().any(|l| l.contains("1 unparseable")));
        Ok(())
    }

    #[test]
    fn no_matches_writes_nothing() -> Result<()> {
        let dir = tempdir()?;
        let window = TimeWindow::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        );
        let req = request(dir.path(), "ts", window);

        assert_eq!(run_filter(&req, &mut |_| {})?, FilterReport::NoMatches);
        assert!(!req.output.exists());
        Ok(())
    }

    #[test]
    fn missing_column_becomes_column_notice() -> Result<()> {
        let dir = tempdir()?;
        let req = request(dir.path(), "missing_col", year_2023());

        let err = run_filter(&req, &mut |_| {}).unwrap_err();
        assert_eq!(
            Notice::from_error(&err),
            Notice::ColumnNotFound("missing_col".to_string())
        );
        assert!(!req.output.exists());
        Ok(())
    }

    #[test]
    fn unreadable_input_is_a_generic_failure() {
        let req = FilterRequest {
            input: PathBuf::from("/definitely/not/here.csv"),
            output: PathBuf::from("/definitely/not/out.csv"),
            column: "ts".to_string(),
            window: year_2023(),
        };
        let err = run_filter(&req, &mut |_| {}).unwrap_err();
        let notice = Notice::from_error(&err);
        assert!(matches!(&notice, Notice::Failed(msg) if msg.contains("opening CSV")));
        assert!(notice.is_error());
    }

    #[test]
    fn worker_reports_progress_then_done() -> Result<()> {
        let dir = tempdir()?;
        let req = request(dir.path(), "ts", year_2023());
        let output = req.output.clone();
        let (tx, rx) = mpsc::sync_channel(16);

        let handle = spawn_filter(req, tx)?;
        let (lines, notice) = drain(rx);
        handle.join().expect("worker panicked");

        assert_eq!(notice, Notice::Saved { path: output, rows: 2 });
        assert!(lines[0].starts_with("Filtering records from 2023-01-01 00:00:00 UTC"));
        assert!(lines.last().unwrap().starts_with("Filtered CSV saved successfully"));
        Ok(())
    }

    #[test]
    fn header_worker_lists_columns() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("in.csv");
        fs::write(&path, SAMPLE)?;
        let (tx, rx) = mpsc::sync_channel(4);

        spawn_discover(path.clone(), tx)?.join().expect("worker panicked");
        let (_, notice) = drain(rx);
        assert_eq!(
            notice,
            Notice::ColumnsLoaded {
                path,
                columns: vec!["id".to_string(), "ts".to_string()]
            }
        );
        Ok(())
    }

    #[test]
    fn header_worker_flags_empty_schema() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("empty.csv");
        fs::write(&path, "")?;
        let (tx, rx) = mpsc::sync_channel(4);

        spawn_discover(path, tx)?.join().expect("worker panicked");
        let (lines, notice) = drain(rx);
        assert_eq!(notice, Notice::EmptySchema);
        assert!(lines.iter().any(|l| l.starts_with("Error reading CSV")));
        Ok(())
    }

    #[test]
    fn dismissed_dialog_is_a_file_error() {
        let notice = Notice::NoFile("No file selected".to_string());
        assert_eq!(notice.title(), "File Error");
        assert_eq!(notice.message(), "No file selected");
        assert!(notice.is_error());
        assert_eq!(Notice::Invalid(String::new()).title(), "Input Error");
    }
}
