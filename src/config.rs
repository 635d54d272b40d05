use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

const SETTINGS_VAR: &str = "CSV_TIME_FILTER_SETTINGS";
const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
const DEFAULT_CHANNEL_CAPACITY: usize = 256;
const DEFAULT_OUTPUT_NAME: &str = "filtered.csv";

/// Hour / minute / second preset for one end of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ClockPreset {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

/// Tunables for the window and the background worker.
///
/// Every field is optional in the JSON file; missing ones keep their default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How often the UI drains worker messages.
    pub poll_interval_ms: u64,
    /// Bound of the worker → UI message channel.
    pub channel_capacity: usize,
    pub default_start: ClockPreset,
    pub default_end: ClockPreset,
    /// File name proposed by the "Save As" dialog.
    pub default_output_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            default_start: ClockPreset {
                hour: 0,
                minute: 0,
                second: 0,
            },
            default_end: ClockPreset {
                hour: 23,
                minute: 59,
                second: 59,
            },
            default_output_name: DEFAULT_OUTPUT_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Read the file named by `CSV_TIME_FILTER_SETTINGS`, or fall back to the
    /// defaults when the variable is unset.
    pub fn load() -> Result<Self> {
        match env::var_os(SETTINGS_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing settings file {}", path.display()))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{ "poll_interval_ms": 250, "default_end": { "hour": 12, "minute": 0, "second": 0 } }"#,
        )?;

        let settings = Settings::from_file(&path)?;
        assert_eq!(settings.poll_interval(), Duration::from_millis(250));
        assert_eq!(settings.default_end.hour, 12);
        assert_eq!(settings.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(settings.default_output_name, "filtered.csv");
        Ok(())
    }

    #[test]
    fn malformed_file_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json")?;
        let err = Settings::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing settings file"));
        Ok(())
    }
}
