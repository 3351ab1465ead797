//! Configuration for paginator sessions and the CLI
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/reaction-pager/config.toml)
//! 3. Built-in defaults (lowest priority)

use crate::error::ConfigurationError;
use crate::session::{InfoOptions, JumpOptions, SessionOptions, DEFAULT_PACING, DEFAULT_TIMEOUT};
use crate::transport::{ChannelId, UserId};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod controls;
mod observability;
mod serialization;
mod session;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (maintain public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use controls::{ControlsConfig, FileControls};
pub use observability::{FileLogging, LogRotation, LoggingConfig};
pub use session::{FileInfo, FileJump};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Idle timeout for a session, in seconds
    pub timeout_secs: u64,

    /// Wrap around at the first/last page
    pub circular: bool,

    /// Delete the paginated message on timeout
    pub delete_on_timeout: bool,

    /// Clear the controls when a session stops or times out
    pub clear_controls_on_end: bool,

    /// Remove handled reactions so controls can be reused
    pub remove_reactions: bool,

    /// Delay between attaching controls, in milliseconds
    pub pacing_ms: u64,

    /// Default viewer identity (env only)
    pub viewer: Option<String>,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Control symbol overrides
    pub controls: ControlsConfig,

    /// Info control settings
    pub info: InfoOptions,

    /// Jump control settings
    pub jump: JumpOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            circular: false,
            delete_on_timeout: false,
            clear_controls_on_end: true,
            remove_reactions: true,
            pacing_ms: DEFAULT_PACING.as_millis() as u64,
            viewer: None,
            logging: LoggingConfig::default(),
            controls: ControlsConfig::default(),
            info: InfoOptions::default(),
            jump: JumpOptions::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub timeout_secs: Option<u64>,
    pub circular: Option<bool>,
    pub delete_on_timeout: Option<bool>,
    pub clear_controls_on_end: Option<bool>,
    pub remove_reactions: Option<bool>,
    pub pacing_ms: Option<u64>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,

    /// Optional [controls] section
    pub controls: Option<FileControls>,

    /// Optional [info] section
    pub info: Option<FileInfo>,

    /// Optional [jump] section
    pub jump: Option<FileJump>,
}

/// Parse a boolean env value ("1"/"true" vs "0"/"false")
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/reaction-pager/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("reaction-pager").join("config.toml"))
    }

    /// Read and parse a config file. A missing file yields defaults; a file
    /// that exists but does not parse is an error (fail fast rather than
    /// silently ignoring the user's settings).
    pub(crate) fn read_file_config(path: &Path) -> Result<FileConfig> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Cannot read config file {}", path.display())),
        }
    }

    /// Load configuration: file -> env vars -> defaults
    pub fn load() -> Result<Self> {
        let file = match Self::config_path() {
            Some(path) => Self::read_file_config(&path)?,
            None => FileConfig::default(),
        };
        Ok(Self::from_sources(file, |key| std::env::var(key).ok()))
    }

    /// Merge a parsed file with an environment lookup
    pub(crate) fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        // Timeout: env > file > default
        let timeout_secs = env("PAGER_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .or(file.timeout_secs)
            .unwrap_or(defaults.timeout_secs);

        // Circular: env > file > default
        let circular = env("PAGER_CIRCULAR")
            .and_then(|v| parse_bool(&v))
            .or(file.circular)
            .unwrap_or(defaults.circular);

        // Viewer: env only (identities don't belong in a shared config file)
        let viewer = env("PAGER_VIEWER").filter(|v| !v.trim().is_empty());

        let mut logging = LoggingConfig::from_file(file.logging);
        if let Some(level) = env("PAGER_LOG_LEVEL") {
            logging.level = level;
        }

        Self {
            timeout_secs,
            circular,
            delete_on_timeout: file.delete_on_timeout.unwrap_or(defaults.delete_on_timeout),
            clear_controls_on_end: file
                .clear_controls_on_end
                .unwrap_or(defaults.clear_controls_on_end),
            remove_reactions: file.remove_reactions.unwrap_or(defaults.remove_reactions),
            pacing_ms: file.pacing_ms.unwrap_or(defaults.pacing_ms),
            viewer,
            logging,
            controls: ControlsConfig::from_file(file.controls),
            info: session::info_from_file(file.info),
            jump: session::jump_from_file(file.jump),
        }
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Silently fail - config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Session options for one run
    pub fn session_options(&self, viewer: Option<UserId>, channel: ChannelId) -> SessionOptions {
        SessionOptions {
            viewer: viewer.or_else(|| self.viewer.clone().map(UserId::new)),
            channel: Some(channel),
            circular: self.circular,
            starting_page: 1,
            timeout: Duration::from_secs(self.timeout_secs),
            delete_on_timeout: self.delete_on_timeout,
            clear_controls_on_end: self.clear_controls_on_end,
            remove_reactions: self.remove_reactions,
            pacing: Duration::from_millis(self.pacing_ms),
            info: self.info.clone(),
            jump: self.jump.clone(),
        }
    }

    /// Validated control map from the `[controls]` section
    pub fn control_map(&self) -> Result<crate::controls::ControlMap, ConfigurationError> {
        self.controls.control_map()
    }
}
