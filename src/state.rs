use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError};

use chrono::{NaiveDate, Utc};

use crate::config::{ClockPreset, Settings};
use crate::data::model::{TimeWindow, WindowBound};
use crate::job::{self, FilterRequest, Notice, WorkerMessage};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,

    /// Input CSV path as typed or picked.
    pub csv_path: String,

    /// Output CSV path as typed or picked.
    pub output_path: String,

    /// Header of the current input (empty until discovery finishes).
    pub columns: Vec<String>,

    /// Timestamp column to filter on.
    pub selected_column: Option<String>,

    pub start: WindowBound,
    pub end: WindowBound,

    /// Lines shown in the log console, oldest first.
    pub log_lines: Vec<String>,

    /// Notice waiting to be acknowledged in a dialog.
    pub notice: Option<Notice>,

    /// Background jobs started but not yet finished.
    pub pending_jobs: usize,

    tx: SyncSender<WorkerMessage>,
    rx: Receiver<WorkerMessage>,
}

fn bound(date: NaiveDate, preset: ClockPreset) -> WindowBound {
    WindowBound::new(
        date,
        preset.hour.min(23),
        preset.minute.min(59),
        preset.second.min(59),
    )
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let (tx, rx) = mpsc::sync_channel(settings.channel_capacity.max(1));
        let today = Utc::now().date_naive();
        Self {
            start: bound(today, settings.default_start),
            end: bound(today, settings.default_end),
            settings,
            csv_path: String::new(),
            output_path: String::new(),
            columns: Vec::new(),
            selected_column: None,
            log_lines: Vec::new(),
            notice: None,
            pending_jobs: 0,
            tx,
            rx,
        }
    }

    /// Append a line to the log console.
    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        log::info!("{line}");
        self.log_lines.push(line);
    }

    pub fn busy(&self) -> bool {
        self.pending_jobs > 0
    }

    /// Apply every message the workers have posted since the last call.
    pub fn drain_messages(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(WorkerMessage::Log(line)) => self.log_lines.push(line),
                Ok(WorkerMessage::Done(notice)) => {
                    self.pending_jobs = self.pending_jobs.saturating_sub(1);
                    self.apply_notice(notice);
                }
                // `self` holds a sender, so the channel never disconnects.
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn apply_notice(&mut self, notice: Notice) {
        match notice {
            Notice::ColumnsLoaded { path, columns } => {
                if path.as_path() == Path::new(self.csv_path.trim()) {
                    self.set_columns(columns);
                } else {
                    log::debug!("Dropping stale header of {}", path.display());
                }
            }
            other => {
                if other.is_error() {
                    log::warn!("{}: {}", other.title(), other.message());
                }
                self.notice = Some(other);
            }
        }
    }

    /// Replace the column list, defaulting the selection to the first one.
    pub fn set_columns(&mut self, columns: Vec<String>) {
        self.selected_column = columns.first().cloned();
        self.columns = columns;
    }

    /// Record a freshly picked input file and start reading its header.
    pub fn select_input(&mut self, path: PathBuf) {
        self.csv_path = path.display().to_string();
        self.log(format!("CSV file selected: {}", path.display()));
        self.set_columns(Vec::new());
        self.pending_jobs += 1;
        if let Err(e) = job::spawn_discover(path, self.tx.clone()) {
            self.pending_jobs -= 1;
            self.fail(format!("Failed to start header reader: {e}"));
        }
    }

    pub fn select_output(&mut self, path: PathBuf) {
        self.output_path = path.display().to_string();
        self.log(format!("Output file selected: {}", path.display()));
    }

    /// A file dialog was dismissed without a choice.
    pub fn dialog_cancelled(&mut self, what: &str) {
        self.notice = Some(Notice::NoFile(format!("No {what} selected")));
    }

    /// Check the form and turn it into a [`FilterRequest`].
    pub fn build_request(&self) -> Result<FilterRequest, Notice> {
        let input = self.csv_path.trim();
        if input.is_empty() {
            return Err(Notice::Invalid("No CSV file selected".to_string()));
        }
        let output = self.output_path.trim();
        if output.is_empty() {
            return Err(Notice::Invalid("No output file selected".to_string()));
        }
        let column = self
            .selected_column
            .clone()
            .ok_or_else(|| Notice::Invalid("No time column selected".to_string()))?;

        let start = self.start.to_utc().map_err(|e| Notice::Invalid(e.to_string()))?;
        let end = self.end.to_utc().map_err(|e| Notice::Invalid(e.to_string()))?;

        Ok(FilterRequest {
            input: PathBuf::from(input),
            output: PathBuf::from(output),
            column,
            window: TimeWindow::new(start, end),
        })
    }

    /// Validate the form and run the filter in the background.
    pub fn start_filter(&mut self) {
        let request = match self.build_request() {
            Ok(request) => request,
            Err(notice) => {
                self.log(notice.message());
                self.notice = Some(notice);
                return;
            }
        };
        self.pending_jobs += 1;
        if let Err(e) = job::spawn_filter(request, self.tx.clone()) {
            self.pending_jobs -= 1;
            self.fail(format!("Failed to start filter: {e}"));
        }
    }

    fn fail(&mut self, message: String) {
        log::error!("{message}");
        self.log_lines.push(message.clone());
        self.notice = Some(Notice::Failed(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    fn wait_idle(state: &mut AppState) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while state.busy() {
            assert!(Instant::now() < deadline, "background job did not finish");
            thread::sleep(Duration::from_millis(5));
            state.drain_messages();
        }
    }

    #[test]
    fn defaults_cover_the_whole_day() {
        let state = AppState::new(Settings::default());
        assert_eq!((state.start.hour, state.start.minute, state.start.second), (0, 0, 0));
        assert_eq!((state.end.hour, state.end.minute, state.end.second), (23, 59, 59));
        assert_eq!(state.start.date, state.end.date);
    }

    #[test]
    fn incomplete_form_is_rejected_before_any_job() {
        let mut state = AppState::new(Settings::default());
        state.start_filter();
        assert_eq!(
            state.notice,
            Some(Notice::Invalid("No CSV file selected".to_string()))
        );
        assert!(!state.busy());

        state.csv_path = "in.csv".into();
        state.output_path = "out.csv".into();
        assert_eq!(
            state.build_request(),
            Err(Notice::Invalid("No time column selected".to_string()))
        );

        state.set_columns(vec!["ts".into(), "value".into()]);
        assert_eq!(state.selected_column.as_deref(), Some("ts"));
        state.end.second = 60;
        assert!(matches!(state.build_request(), Err(Notice::Invalid(msg)) if msg.contains("invalid time")));
    }

    #[test]
    fn picking_a_file_loads_its_columns() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("in.csv");
        fs::write(&input, "when,value\n2023-01-01 00:00:00,1\n")?;

        let mut state = AppState::new(Settings::default());
        state.select_input(input);
        wait_idle(&mut state);

        assert_eq!(state.columns, vec!["when", "value"]);
        assert_eq!(state.selected_column.as_deref(), Some("when"));
        assert!(state.notice.is_none());
        assert!(state.log_lines.iter().any(|l| l.starts_with("Loaded columns")));
        Ok(())
    }

    #[test]
    fn filter_round_trip_through_the_worker() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        fs::write(
            &input,
            "ts,v\n2023-01-01 00:00:00,a\nnot-a-date,b\n2023-06-01 12:00:00,c\n",
        )?;

        let mut state = AppState::new(Settings::default());
        state.select_input(input);
        wait_idle(&mut state);
        state.select_output(output.clone());
        state.start = WindowBound::new(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), 0, 0, 0);
        state.end = WindowBound::new(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(), 23, 59, 59);

        state.start_filter();
        wait_idle(&mut state);

        assert_eq!(state.notice, Some(Notice::Saved { path: output.clone(), rows: 2 }));
        assert_eq!(
            fs::read_to_string(&output)?,
            "ts,v\n2023-01-01 00:00:00,a\n2023-06-01 12:00:00,c\n"
        );

        state.notice = None;
        state.start = WindowBound::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 0, 0, 0);
        state.end = WindowBound::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 0, 0, 0);
        state.start_filter();
        wait_idle(&mut state);
        assert_eq!(state.notice, Some(Notice::NoMatches));
        Ok(())
    }

    #[test]
    fn header_of_a_replaced_input_is_ignored() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let first = dir.path().join("a.csv");
        let second = dir.path().join("b.csv");
        fs::write(&first, "a_time,a_value\n")?;
        fs::write(&second, "b_time,b_value\n")?;

        let mut state = AppState::new(Settings::default());
        state.select_input(first.clone());
        state.select_input(second);
        wait_idle(&mut state);
        assert_eq!(state.columns, vec!["b_time", "b_value"]);

        // A late result for the first file arrives after the second one.
        state.pending_jobs += 1;
        state.tx.send(WorkerMessage::Done(Notice::ColumnsLoaded {
            path: first,
            columns: vec!["a_time".into(), "a_value".into()],
        }))
        .expect("channel open");
        wait_idle(&mut state);
        assert_eq!(state.columns, vec!["b_time", "b_value"]);
        assert_eq!(state.selected_column.as_deref(), Some("b_time"));
        Ok(())
    }

    #[test]
    fn cancelled_dialog_raises_a_file_error() {
        let mut state = AppState::new(Settings::default());
        state.dialog_cancelled("file");
        let notice = state.notice.expect("notice");
        assert_eq!(notice.title(), "File Error");
        assert_eq!(notice.message(), "No file selected");
    }
}
