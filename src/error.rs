//! Error types for the paginator
//!
//! Configuration problems are detected before any transport call is made.
//! Transport failures are propagated untouched; the paginator never retries.

use thiserror::Error;

/// Missing or invalid session configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The page set is empty
    #[error("at least one page is required")]
    EmptyPages,

    /// A mandatory control (back or next) was disabled
    #[error("the {action} control is mandatory and cannot be disabled")]
    MissingControl { action: &'static str },

    /// Two actions share one symbol, so the second could never fire
    #[error("symbol {symbol} is mapped to both {first} and {second}")]
    DuplicateSymbol {
        symbol: String,
        first: &'static str,
        second: &'static str,
    },

    /// No viewer identity was configured
    #[error("a viewer identity is required")]
    MissingViewer,

    /// No channel to render into was configured
    #[error("a channel is required")]
    MissingChannel,

    /// Info control options are unusable
    #[error("invalid info options: {0}")]
    InvalidInfo(String),

    /// Jump control options are unusable
    #[error("invalid jump options: {0}")]
    InvalidJump(String),

    /// Session timeout is zero
    #[error("session timeout must be greater than zero")]
    InvalidTimeout,

    /// Starting page is outside the page set
    #[error("starting page {page} is out of range (1..={count})")]
    InvalidStartingPage { page: usize, count: usize },

    /// Pages or options were changed after the session left Idle
    #[error("the session has already started")]
    SessionNotIdle,
}

impl ConfigurationError {
    /// Short machine-readable kind, reported with validation notifications
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyPages => "empty_pages",
            Self::MissingControl { .. } => "missing_control",
            Self::DuplicateSymbol { .. } => "duplicate_symbol",
            Self::MissingViewer => "missing_viewer",
            Self::MissingChannel => "missing_channel",
            Self::InvalidInfo(_) => "invalid_info",
            Self::InvalidJump(_) => "invalid_jump",
            Self::InvalidTimeout => "invalid_timeout",
            Self::InvalidStartingPage { .. } => "invalid_starting_page",
            Self::SessionNotIdle => "session_not_idle",
        }
    }
}

/// Failure reported by the chat transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The displayed message no longer exists
    #[error("message {0} not found")]
    MessageNotFound(String),

    /// The transport lacks a permission for the requested call
    #[error("missing permission: {0}")]
    MissingPermission(String),

    /// The transport is closed and accepts no more calls
    #[error("transport closed")]
    Closed,

    /// Anything else the backend reports
    #[error("transport failure: {0}")]
    Other(String),
}

/// Errors surfaced by the paginator API
#[derive(Debug, Error)]
pub enum PaginatorError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
