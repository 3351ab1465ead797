// In-memory transport
//
// Records every call and lets the caller inject reactions and replies.
// Used by the integration tests and handy for embedding the paginator in
// something that is not a chat platform at all.

use super::{
    ChannelId, ControlEvent, ControlEvents, ControlFilter, MessageHandle, MessageId, TextReply,
    Transport, UserId,
};
use crate::controls::{ControlSymbol, ReactionSymbol};
use crate::error::TransportError;
use crate::page::Page;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

/// Buffered events/replies before anyone consumes them
const CHANNEL_BUFFER: usize = 256;

/// One recorded transport call
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCall {
    RenderInitial {
        channel: ChannelId,
        content: Page,
    },
    RenderUpdate {
        handle: MessageHandle,
        content: Page,
    },
    AttachControl {
        handle: MessageHandle,
        symbol: ControlSymbol,
    },
    Subscribe {
        handle: MessageHandle,
        filter: ControlFilter,
    },
    AwaitReply {
        channel: ChannelId,
        author: UserId,
    },
    SendMessage {
        channel: ChannelId,
        text: String,
    },
    DeleteMessage {
        handle: MessageHandle,
    },
    RemoveReaction {
        handle: MessageHandle,
        symbol: ControlSymbol,
        user: UserId,
    },
    ClearControls {
        handle: MessageHandle,
    },
}

impl TransportCall {
    pub fn kind(&self) -> CallKind {
        match self {
            Self::RenderInitial { .. } => CallKind::RenderInitial,
            Self::RenderUpdate { .. } => CallKind::RenderUpdate,
            Self::AttachControl { .. } => CallKind::AttachControl,
            Self::Subscribe { .. } => CallKind::Subscribe,
            Self::AwaitReply { .. } => CallKind::AwaitReply,
            Self::SendMessage { .. } => CallKind::SendMessage,
            Self::DeleteMessage { .. } => CallKind::DeleteMessage,
            Self::RemoveReaction { .. } => CallKind::RemoveReaction,
            Self::ClearControls { .. } => CallKind::ClearControls,
        }
    }
}

/// Call kinds, used to deny specific operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    RenderInitial,
    RenderUpdate,
    AttachControl,
    Subscribe,
    AwaitReply,
    SendMessage,
    DeleteMessage,
    RemoveReaction,
    ClearControls,
}

pub struct MemoryTransport {
    calls: Mutex<Vec<TransportCall>>,
    denied: Mutex<HashSet<CallKind>>,
    next_id: AtomicU64,
    /// Apply the subscription filter like a real gateway would
    filter_events: bool,
    event_tx: mpsc::Sender<ControlEvent>,
    event_rx: Mutex<Option<mpsc::Receiver<ControlEvent>>>,
    filter: Mutex<Option<ControlFilter>>,
    reply_tx: mpsc::Sender<TextReply>,
    reply_rx: tokio::sync::Mutex<mpsc::Receiver<TextReply>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        let (event_tx, event_rx) = mpsc::channel(CHANNEL_BUFFER);
        let (reply_tx, reply_rx) = mpsc::channel(CHANNEL_BUFFER);
        Self {
            calls: Mutex::new(Vec::new()),
            denied: Mutex::new(HashSet::new()),
            next_id: AtomicU64::new(1),
            filter_events: true,
            event_tx,
            event_rx: Mutex::new(Some(event_rx)),
            filter: Mutex::new(None),
            reply_tx,
            reply_rx: tokio::sync::Mutex::new(reply_rx),
        }
    }

    /// Deliver every reaction, ignoring the subscription filter
    pub fn unfiltered() -> Self {
        Self {
            filter_events: false,
            ..Self::new()
        }
    }

    /// Make every call of `kind` fail with `MissingPermission`
    pub fn deny(&self, kind: CallKind) {
        self.denied.lock().unwrap().insert(kind);
    }

    /// Inject a reaction. Reactions sent before the paginator subscribes are
    /// queued and delivered in order once it does.
    pub async fn react(&self, symbol: ReactionSymbol, actor: &UserId) {
        self.push_event(ControlEvent::new(symbol, actor.clone())).await;
    }

    pub async fn push_event(&self, event: ControlEvent) {
        let wanted = match self.filter.lock().unwrap().as_ref() {
            Some(filter) if self.filter_events => filter.matches(&event),
            _ => true,
        };
        if wanted {
            let _ = self.event_tx.send(event).await;
        }
    }

    /// Queue a text reply for the next `await_reply` call
    pub async fn reply(&self, author: &UserId, content: &str) {
        let message = self.handle(ChannelId::new("memory"));
        let reply = TextReply {
            message,
            author: author.clone(),
            content: content.to_string(),
            can_delete: true,
        };
        let _ = self.reply_tx.send(reply).await;
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_of(&self, kind: CallKind) -> Vec<TransportCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.kind() == kind)
            .collect()
    }

    /// Every page content displayed, initial render first
    pub fn rendered(&self) -> Vec<Page> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::RenderInitial { content, .. }
                | TransportCall::RenderUpdate { content, .. } => Some(content),
                _ => None,
            })
            .collect()
    }

    pub fn attached(&self) -> Vec<ControlSymbol> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::AttachControl { symbol, .. } => Some(symbol),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: TransportCall) -> Result<(), TransportError> {
        let kind = call.kind();
        self.calls.lock().unwrap().push(call);
        if self.denied.lock().unwrap().contains(&kind) {
            return Err(TransportError::MissingPermission(format!("{:?}", kind)));
        }
        Ok(())
    }

    fn handle(&self, channel: ChannelId) -> MessageHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        MessageHandle {
            channel,
            message: MessageId(format!("m{}", id)),
        }
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn render_initial(
        &self,
        channel: &ChannelId,
        content: &Page,
    ) -> Result<MessageHandle, TransportError> {
        self.record(TransportCall::RenderInitial {
            channel: channel.clone(),
            content: content.clone(),
        })?;
        Ok(self.handle(channel.clone()))
    }

    async fn render_update(
        &self,
        handle: &MessageHandle,
        content: &Page,
    ) -> Result<(), TransportError> {
        self.record(TransportCall::RenderUpdate {
            handle: handle.clone(),
            content: content.clone(),
        })
    }

    async fn attach_control(
        &self,
        handle: &MessageHandle,
        symbol: &ControlSymbol,
    ) -> Result<(), TransportError> {
        self.record(TransportCall::AttachControl {
            handle: handle.clone(),
            symbol: symbol.clone(),
        })
    }

    async fn subscribe_controls(
        &self,
        handle: &MessageHandle,
        filter: ControlFilter,
        _timeout: Duration,
    ) -> Result<ControlEvents, TransportError> {
        self.record(TransportCall::Subscribe {
            handle: handle.clone(),
            filter: filter.clone(),
        })?;
        let rx = self
            .event_rx
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| TransportError::Other("already subscribed".to_string()))?;
        *self.filter.lock().unwrap() = Some(filter);
        Ok(ControlEvents::new(rx))
    }

    async fn await_reply(
        &self,
        channel: &ChannelId,
        author: &UserId,
        timeout: Duration,
    ) -> Result<Option<TextReply>, TransportError> {
        self.record(TransportCall::AwaitReply {
            channel: channel.clone(),
            author: author.clone(),
        })?;

        let mut rx = self.reply_rx.lock().await;
        let wait = async {
            while let Some(reply) = rx.recv().await {
                if &reply.author == author {
                    return Some(reply);
                }
            }
            None
        };
        Ok(tokio::time::timeout(timeout, wait).await.ok().flatten())
    }

    async fn send_message(
        &self,
        channel: &ChannelId,
        text: &str,
    ) -> Result<MessageHandle, TransportError> {
        self.record(TransportCall::SendMessage {
            channel: channel.clone(),
            text: text.to_string(),
        })?;
        Ok(self.handle(channel.clone()))
    }

    async fn delete_message(&self, handle: &MessageHandle) -> Result<(), TransportError> {
        self.record(TransportCall::DeleteMessage {
            handle: handle.clone(),
        })
    }

    async fn remove_reaction(
        &self,
        handle: &MessageHandle,
        symbol: &ControlSymbol,
        user: &UserId,
    ) -> Result<(), TransportError> {
        self.record(TransportCall::RemoveReaction {
            handle: handle.clone(),
            symbol: symbol.clone(),
            user: user.clone(),
        })
    }

    async fn clear_controls(&self, handle: &MessageHandle) -> Result<(), TransportError> {
        self.record(TransportCall::ClearControls {
            handle: handle.clone(),
        })
    }
}
