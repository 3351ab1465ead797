// Console transport
//
// Stands in for a chat platform in a terminal: the "message" is printed to
// stdout every time it changes, controls are typed on stdin. A typed line is
// a reply if a jump prompt is waiting for one, otherwise it is resolved to a
// control (action name like `next`, or the raw symbol) and delivered as a
// reaction from the console's viewer.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reaction_pager::controls::{ControlMap, ReactionSymbol};
use reaction_pager::page::{Document, Page};
use reaction_pager::transport::{
    ChannelId, ControlEvent, ControlEvents, ControlFilter, MessageHandle, MessageId, TextReply,
    Transport, UserId,
};
use reaction_pager::{Action, ControlSymbol, TransportError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest card we draw, in terminal columns (content only)
const MAX_CARD_WIDTH: usize = 72;
const EVENT_BUFFER: usize = 32;

pub struct ConsoleTransport {
    viewer: UserId,
    controls: ControlMap,
    next_id: AtomicU64,
    events: Mutex<Option<mpsc::Sender<ControlEvent>>>,
    pending_reply: Mutex<Option<oneshot::Sender<String>>>,
}

impl ConsoleTransport {
    pub fn new(viewer: UserId, controls: ControlMap) -> Self {
        Self {
            viewer,
            controls,
            next_id: AtomicU64::new(1),
            events: Mutex::new(None),
            pending_reply: Mutex::new(None),
        }
    }

    /// Read stdin lines until EOF, feeding them to `handle_line`
    pub fn spawn_input(self: &Arc<Self>) {
        let transport = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = transport.read_input().await {
                warn!("Console input stopped: {:#}", e);
            }
            // EOF ends the subscription, which ends the session
            if let Ok(mut events) = transport.events.lock() {
                events.take();
            }
        });
    }

    async fn read_input(&self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
            self.handle_line(&line);
        }
        Ok(())
    }

    /// Route one typed line to a waiting reply or the control stream
    pub fn handle_line(&self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let waiter = self.pending_reply.lock().ok().and_then(|mut p| p.take());
        if let Some(waiter) = waiter {
            if waiter.send(line.to_string()).is_ok() {
                return;
            }
        }

        let Some(symbol) = self.resolve(line) else {
            println!("Unknown control '{}' (try: {})", line, self.enabled_names());
            return;
        };
        let event = ControlEvent {
            symbol: ReactionSymbol::from(&symbol),
            actor: self.viewer.clone(),
            // Nothing to remove: typed lines are not reactions
            can_remove: false,
        };

        let sender = self.events.lock().ok().and_then(|e| e.clone());
        match sender {
            Some(tx) => {
                if tx.try_send(event).is_err() {
                    warn!("Dropping control '{}': session is not keeping up", line);
                }
            }
            None => debug!(line, "No active subscription, ignoring input"),
        }
    }

    /// Enabled action names, in attachment order
    fn enabled_names(&self) -> String {
        let names: Vec<&str> = self
            .controls
            .enabled()
            .map(|(action, _)| action.as_str())
            .collect();
        names.join(", ")
    }

    /// Action name first, then the literal symbol
    fn resolve(&self, input: &str) -> Option<ControlSymbol> {
        if let Some(action) = Action::from_str(&input.to_lowercase()) {
            return self.controls.symbol(action).cloned();
        }
        let symbol = ControlSymbol::parse(input);
        self.controls.resolve(&symbol).map(|_| symbol)
    }

    fn handle(&self, channel: &ChannelId) -> MessageHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        MessageHandle {
            channel: channel.clone(),
            message: MessageId(format!("console-{}", id)),
        }
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn render_initial(
        &self,
        channel: &ChannelId,
        content: &Page,
    ) -> Result<MessageHandle, TransportError> {
        println!("{}", render_page(content));
        Ok(self.handle(channel))
    }

    async fn render_update(
        &self,
        _handle: &MessageHandle,
        content: &Page,
    ) -> Result<(), TransportError> {
        println!();
        println!("{}", render_page(content));
        Ok(())
    }

    async fn attach_control(
        &self,
        handle: &MessageHandle,
        symbol: &ControlSymbol,
    ) -> Result<(), TransportError> {
        debug!(message = %handle, symbol = %symbol, "Attached control");
        Ok(())
    }

    async fn subscribe_controls(
        &self,
        _handle: &MessageHandle,
        filter: ControlFilter,
        _timeout: Duration,
    ) -> Result<ControlEvents, TransportError> {
        let hint: Vec<String> = self
            .controls
            .enabled()
            .filter(|(_, symbol)| filter.symbols.contains(*symbol))
            .map(|(action, symbol)| format!("{} {}", symbol, action))
            .collect();
        println!("Controls: {}", hint.join("  "));

        let (tx, events) = ControlEvents::channel(EVENT_BUFFER);
        let mut slot = self
            .events
            .lock()
            .map_err(|_| TransportError::Other("console state poisoned".to_string()))?;
        *slot = Some(tx);
        Ok(events)
    }

    async fn await_reply(
        &self,
        channel: &ChannelId,
        author: &UserId,
        timeout: Duration,
    ) -> Result<Option<TextReply>, TransportError> {
        let (tx, rx) = oneshot::channel();
        if let Ok(mut pending) = self.pending_reply.lock() {
            *pending = Some(tx);
        }

        let content = tokio::time::timeout(timeout, rx).await.ok().and_then(|r| r.ok());
        if let Ok(mut pending) = self.pending_reply.lock() {
            pending.take();
        }

        Ok(content.map(|content| TextReply {
            message: self.handle(channel),
            author: author.clone(),
            content,
            can_delete: false,
        }))
    }

    async fn send_message(
        &self,
        channel: &ChannelId,
        text: &str,
    ) -> Result<MessageHandle, TransportError> {
        for line in text.lines() {
            println!("» {}", line);
        }
        Ok(self.handle(channel))
    }

    async fn delete_message(&self, handle: &MessageHandle) -> Result<(), TransportError> {
        debug!(message = %handle, "Deleted message");
        println!("(message {} deleted)", handle.message);
        Ok(())
    }

    async fn remove_reaction(
        &self,
        _handle: &MessageHandle,
        symbol: &ControlSymbol,
        user: &UserId,
    ) -> Result<(), TransportError> {
        // Typed lines leave nothing behind to remove
        debug!(symbol = %symbol, user = %user, "Reaction removal is a no-op on the console");
        Ok(())
    }

    async fn clear_controls(&self, _handle: &MessageHandle) -> Result<(), TransportError> {
        println!("(controls removed)");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Plain textual view of a page
pub fn render_page(page: &Page) -> String {
    match page {
        Page::Text(text) => text.clone(),
        Page::Document(doc) => render_card(doc),
    }
}

fn document_lines(doc: &Document) -> (Vec<String>, Option<String>) {
    let mut body = Vec::new();
    if let Some(author) = &doc.author {
        body.push(author.name.clone());
    }
    if let Some(title) = &doc.title {
        body.push(title.clone());
    }
    if let Some(url) = &doc.url {
        body.push(url.clone());
    }
    if let Some(description) = &doc.description {
        if !body.is_empty() {
            body.push(String::new());
        }
        body.extend(description.lines().map(str::to_string));
    }
    for field in &doc.fields {
        body.push(String::new());
        body.push(format!("{}:", field.name));
        body.extend(field.value.lines().map(|l| format!("  {}", l)));
    }
    if let Some(image) = &doc.image {
        body.push(format!("[image] {}", image));
    }

    let mut footer = doc.footer.as_ref().and_then(|f| f.text.clone());
    if let Some(timestamp) = doc.timestamp {
        let stamp = timestamp.format("%Y-%m-%d %H:%M UTC").to_string();
        footer = Some(match footer {
            Some(text) => format!("{} • {}", text, stamp),
            None => stamp,
        });
    }
    (body, footer)
}

/// Box-drawn card; widths are display columns, not bytes
fn render_card(doc: &Document) -> String {
    let (body, footer) = document_lines(doc);
    let width = body
        .iter()
        .chain(footer.iter())
        .map(|line| line.width())
        .max()
        .unwrap_or(0)
        .min(MAX_CARD_WIDTH);

    let rule = "─".repeat(width + 2);
    let mut out = format!("┌{}┐\n", rule);
    for line in &body {
        out.push_str(&boxed_line(line, width));
    }
    if let Some(footer) = &footer {
        if !body.is_empty() {
            out.push_str(&format!("├{}┤\n", rule));
        }
        out.push_str(&boxed_line(footer, width));
    }
    out.push_str(&format!("└{}┘", rule));
    out
}

fn boxed_line(line: &str, width: usize) -> String {
    let line = truncate(line, width);
    let pad = width.saturating_sub(line.width());
    format!("│ {}{} │\n", line, " ".repeat(pad))
}

/// Cut to `width` columns, ending in an ellipsis when shortened
fn truncate(line: &str, width: usize) -> String {
    if line.width() <= width {
        return line.to_string();
    }
    let target = width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for c in line.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > target {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}
