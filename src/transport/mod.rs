//! Transport seam between the paginator and a chat platform
//!
//! The paginator never talks to a platform directly. Everything it needs
//! (rendering, reactions, event delivery, reply prompts) goes through the
//! [`Transport`] trait, so the session logic stays independent of any
//! particular client library.
//!
//! # Event delivery
//!
//! ```text
//! platform gateway → Transport → ControlEvents (mpsc) → Paginator dispatch loop
//! ```
//!
//! Transports should apply the [`ControlFilter`] they are given, but the
//! paginator re-checks every event, so an unfiltered transport is still
//! correct.

use crate::controls::{ControlSymbol, ReactionSymbol};
use crate::error::TransportError;
use crate::page::Page;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;

pub mod memory;

pub use memory::{CallKind, MemoryTransport, TransportCall};

// ─────────────────────────────────────────────────────────────────────────────
// Identities
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Platform user identity
    UserId
);
string_id!(
    /// Channel a paginator renders into
    ChannelId
);
string_id!(MessageId);

/// Opaque handle to a displayed message
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct MessageHandle {
    pub channel: ChannelId,
    pub message: MessageId,
}

impl fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.channel, self.message)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inbound events
// ─────────────────────────────────────────────────────────────────────────────

/// A reaction added to the paginated message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlEvent {
    pub symbol: ReactionSymbol,
    pub actor: UserId,
    /// Whether the transport may remove this reaction for the actor
    /// (reported per event; the permission model is the transport's business)
    pub can_remove: bool,
}

impl ControlEvent {
    pub fn new(symbol: ReactionSymbol, actor: UserId) -> Self {
        Self {
            symbol,
            actor,
            can_remove: true,
        }
    }
}

/// A text message sent in reply to a jump prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextReply {
    pub message: MessageHandle,
    pub author: UserId,
    pub content: String,
    /// Whether the transport may delete the reply
    pub can_delete: bool,
}

/// Which control events a subscription wants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlFilter {
    pub symbols: Vec<ControlSymbol>,
    pub viewer: UserId,
}

impl ControlFilter {
    pub fn matches(&self, event: &ControlEvent) -> bool {
        event.actor == self.viewer && self.symbols.contains(&event.symbol.identifier())
    }
}

/// Stream of control events for one subscription
///
/// Ends when the transport drops its sender or the paginator closes it.
#[derive(Debug)]
pub struct ControlEvents {
    rx: mpsc::Receiver<ControlEvent>,
    closed: bool,
}

impl ControlEvents {
    pub fn new(rx: mpsc::Receiver<ControlEvent>) -> Self {
        Self { rx, closed: false }
    }

    /// Create a bounded sender/stream pair
    pub fn channel(buffer: usize) -> (mpsc::Sender<ControlEvent>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self::new(rx))
    }

    pub async fn next(&mut self) -> Option<ControlEvent> {
        if self.closed {
            return None;
        }
        self.rx.recv().await
    }

    /// Close the subscription. Returns true only for the first call.
    pub fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        self.rx.close();
        true
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transport trait
// ─────────────────────────────────────────────────────────────────────────────

/// Capabilities the paginator needs from a chat platform
///
/// Calls are never retried by the paginator. Callers pace successive
/// `attach_control` calls themselves.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `content` to `channel`, returning a handle to the new message
    async fn render_initial(
        &self,
        channel: &ChannelId,
        content: &Page,
    ) -> Result<MessageHandle, TransportError>;

    /// Edit the displayed message in place
    async fn render_update(
        &self,
        handle: &MessageHandle,
        content: &Page,
    ) -> Result<(), TransportError>;

    /// Add a control reaction; idempotent per symbol
    async fn attach_control(
        &self,
        handle: &MessageHandle,
        symbol: &ControlSymbol,
    ) -> Result<(), TransportError>;

    /// Start delivering control events for `handle`
    ///
    /// `timeout` is the session's idle timeout; transports may use it to
    /// bound the subscription on their side as well.
    async fn subscribe_controls(
        &self,
        handle: &MessageHandle,
        filter: ControlFilter,
        timeout: Duration,
    ) -> Result<ControlEvents, TransportError>;

    /// Wait for one text message from `author` in `channel`
    async fn await_reply(
        &self,
        channel: &ChannelId,
        author: &UserId,
        timeout: Duration,
    ) -> Result<Option<TextReply>, TransportError>;

    /// Send a plain notice (jump prompts, help text)
    async fn send_message(
        &self,
        channel: &ChannelId,
        text: &str,
    ) -> Result<MessageHandle, TransportError>;

    async fn delete_message(&self, handle: &MessageHandle) -> Result<(), TransportError>;

    /// Remove one user's reaction; permission-gated on most platforms
    async fn remove_reaction(
        &self,
        handle: &MessageHandle,
        symbol: &ControlSymbol,
        user: &UserId,
    ) -> Result<(), TransportError>;

    /// Remove every reaction from the message
    async fn clear_controls(&self, handle: &MessageHandle) -> Result<(), TransportError>;
}
