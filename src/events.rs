// Lifecycle notifications emitted by a paginator session
//
// Sessions never throw their terminal state across the caller's control
// flow; every end and every validation failure is reported as an event on
// the channel handed to the paginator. Using an enum allows pattern
// matching on the consumer side and serializes cleanly for JSON logs.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// `destroy` was called
    Destroyed,
    /// No control event arrived within the session timeout
    TimedOut,
    /// The page set had a single page; no controls were attached
    OnlyOnePage,
    /// The viewer used the stop control
    Stopped,
    /// The viewer used the trash control; the message was deleted
    Trashed,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Destroyed => "destroyed",
            Self::TimedOut => "timed out",
            Self::OnlyOnePage => "only one page",
            Self::Stopped => "explicit stop",
            Self::Trashed => "trashed",
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification sent to whoever owns the paginator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// Initial page is displayed and controls are attached
    Started { page: usize, total: usize },

    /// The displayed page changed (0-based indices)
    PageChanged { from: usize, to: usize },

    /// The session reached its terminal state
    Ended { reason: EndReason },

    /// `run` was rejected before any transport call
    ValidationError { kind: String, detail: String },
}

/// Result of a `run` call that did not fail in the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Ended(EndReason),
    /// Validation failed; nothing was sent
    Rejected(crate::error::ConfigurationError),
}

/// Sending half handed to the paginator
///
/// Notifications are fire-and-forget: a dropped receiver only means nobody
/// is listening.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    tx: Option<mpsc::UnboundedSender<LifecycleEvent>>,
}

impl Notifier {
    pub fn new(tx: mpsc::UnboundedSender<LifecycleEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Create a notifier and the receiver for its events
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LifecycleEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn emit(&self, event: LifecycleEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}
