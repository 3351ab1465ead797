//! `[logging]` section
//!
//! The level here is only a default; `RUST_LOG` still wins when set.
//! Unknown rotation names and blank values fall back to the defaults with a
//! warning on stderr (logging is not up yet while config loads).

use serde::Deserialize;
use std::path::PathBuf;

/// How often the JSON log file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    /// One file for the lifetime of the log directory
    Never,
}

impl LogRotation {
    pub const ALL: [LogRotation; 3] = [Self::Hourly, Self::Daily, Self::Never];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|rotation| rotation.as_str().eq_ignore_ascii_case(value.trim()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

/// Effective logging settings
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Default filter level for this crate
    pub level: String,
    /// Mirror logs as JSON lines into rotating files
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// File name prefix, e.g. "pager" -> "pager.2024-01-15"
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_rotation: LogRotation::Daily,
            file_prefix: "pager".to_string(),
        }
    }
}

/// `[logging]` as loaded from the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

/// Drop blank strings so they fall back to the default
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_rotation(value: Option<String>) -> Option<LogRotation> {
    let value = value?;
    let rotation = LogRotation::parse(&value);
    if rotation.is_none() {
        eprintln!(
            "Warning: unknown file_rotation '{}' in [logging], using {}",
            value,
            LogRotation::default().as_str()
        );
    }
    rotation
}

impl LoggingConfig {
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            level: non_blank(file.level).unwrap_or(defaults.level),
            file_enabled: file.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: non_blank(file.file_dir)
                .map(PathBuf::from)
                .unwrap_or(defaults.file_dir),
            file_rotation: parse_rotation(file.file_rotation).unwrap_or(defaults.file_rotation),
            file_prefix: non_blank(file.file_prefix).unwrap_or(defaults.file_prefix),
        }
    }
}
