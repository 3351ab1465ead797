//! Paginator session controller
//!
//! Drives one pagination session from start to terminal end:
//!
//! ```text
//! Idle ──run()──▶ Running ──stop / trash / timeout / destroy──▶ Ended(reason)
//!   │                                                              ▲
//!   └──────────── single page / destroy before start ─────────────┘
//! ```
//!
//! Inbound control events are handled one at a time on the task that awaits
//! [`Paginator::run`]. The idle deadline, the destroy signal and the event
//! stream are raced with `tokio::select!`; a jump prompt nests a second race
//! against the same deadline, so waiting for a reply never extends the
//! session.

mod options;

pub use options::{InfoOptions, JumpOptions, SessionOptions, DEFAULT_PACING, DEFAULT_TIMEOUT};

use crate::controls::{Action, ControlMap, ControlSymbol};
use crate::error::{ConfigurationError, PaginatorError, TransportError};
use crate::events::{EndReason, LifecycleEvent, Notifier, SessionOutcome};
use crate::navigation::{parse_jump_reply, Navigator, Step, Transition};
use crate::page::{Page, PageStore};
use crate::template::{substitute, DocumentTemplate, TemplateMerger};
use crate::transport::{
    ChannelId, ControlEvent, ControlEvents, ControlFilter, MessageHandle, Transport, UserId,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

// ─────────────────────────────────────────────────────────────────────────────
// Session State
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Ended(EndReason),
}

/// Cloneable handle that ends a session from any task
///
/// Safe to call in any state and any number of times.
#[derive(Debug, Clone)]
pub struct DestroyHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl DestroyHandle {
    pub fn destroy(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_destroyed(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Resolves once destroy has been requested
async fn destroyed(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|destroyed| *destroyed).await.is_err() {
        // Sender gone: nobody can destroy us any more
        std::future::pending::<()>().await;
    }
}

/// `timeout` from now, saturating far in the future for huge timeouts
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or_else(|| now + FAR_FUTURE)
}

/// Roughly 30 years; stands in for "never" when a deadline would overflow
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// What a single inbound event amounted to
enum Dispatch {
    /// Foreign actor or unmapped symbol
    Ignored,
    /// Viewer control handled (whether or not the page changed)
    Accepted,
    End(EndReason),
}

enum JumpReply {
    Page(i64),
    Invalid,
    Interrupted(EndReason),
}

/// Identities fixed for a running session
struct Live {
    handle: MessageHandle,
    viewer: UserId,
    channel: ChannelId,
}

// ─────────────────────────────────────────────────────────────────────────────
// Paginator
// ─────────────────────────────────────────────────────────────────────────────

pub struct Paginator<T: Transport + 'static> {
    transport: Arc<T>,
    pages: PageStore,
    merger: TemplateMerger,
    navigator: Navigator,
    controls: ControlMap,
    options: SessionOptions,
    notifier: Notifier,
    state: SessionState,
    destroy_tx: Arc<watch::Sender<bool>>,
    message: Option<MessageHandle>,
}

impl<T: Transport + 'static> Paginator<T> {
    pub fn new(transport: Arc<T>, pages: Vec<Page>, options: SessionOptions) -> Self {
        let (destroy_tx, _) = watch::channel(false);
        let navigator = Navigator::new(pages.len(), options.circular);
        Self {
            transport,
            pages: PageStore::new(pages),
            merger: TemplateMerger::default(),
            navigator,
            controls: ControlMap::default(),
            options,
            notifier: Notifier::default(),
            state: SessionState::Idle,
            destroy_tx: Arc::new(destroy_tx),
            message: None,
        }
    }

    pub fn with_controls(mut self, controls: ControlMap) -> Self {
        self.controls = controls;
        self
    }

    pub fn with_template(mut self, template: DocumentTemplate) -> Self {
        self.merger.set_template(Some(template));
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutation while idle
    // ─────────────────────────────────────────────────────────────────────

    fn ensure_idle(&self) -> Result<(), ConfigurationError> {
        match self.state {
            SessionState::Idle => Ok(()),
            _ => Err(ConfigurationError::SessionNotIdle),
        }
    }

    pub fn append_page(&mut self, page: Page) -> Result<(), ConfigurationError> {
        self.ensure_idle()?;
        self.pages.append(page);
        Ok(())
    }

    /// Replace every page; the session will start from the first one
    pub fn replace_pages(&mut self, pages: Vec<Page>) -> Result<(), ConfigurationError> {
        self.ensure_idle()?;
        self.pages.replace_all(pages);
        self.navigator.reset(self.pages.len());
        self.options.starting_page = 1;
        Ok(())
    }

    pub fn set_template(
        &mut self,
        template: Option<DocumentTemplate>,
    ) -> Result<(), ConfigurationError> {
        self.ensure_idle()?;
        self.merger.set_template(template);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 0-based index of the displayed page
    pub fn current_index(&self) -> usize {
        self.navigator.current()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn message(&self) -> Option<&MessageHandle> {
        self.message.as_ref()
    }

    pub fn controls(&self) -> &ControlMap {
        &self.controls
    }

    pub fn destroy_handle(&self) -> DestroyHandle {
        DestroyHandle {
            tx: Arc::clone(&self.destroy_tx),
        }
    }

    /// End the session. Outside `run` this takes effect immediately; a
    /// running session is ended through [`DestroyHandle`].
    ///
    /// Holding `&mut self` means no `run` future is alive, so a `Running`
    /// state here belongs to a run that was dropped mid-session.
    pub fn destroy(&mut self) {
        self.destroy_tx.send_replace(true);
        if !matches!(self.state, SessionState::Ended(_)) {
            self.finish(EndReason::Destroyed);
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Run the session to its end.
    ///
    /// Validation failures are reported as a `ValidationError` notification
    /// and `SessionOutcome::Rejected`; nothing is sent in that case. Calling
    /// `run` again after the session ended returns the recorded outcome
    /// without side effects. A previous `run` future that was dropped before
    /// the session ended leaves it `Running`; such a session cannot resume
    /// and ends as destroyed.
    pub async fn run(&mut self) -> Result<SessionOutcome, PaginatorError> {
        match self.state {
            SessionState::Idle => {}
            SessionState::Running => {
                debug!("Previous run was dropped mid-session, ending it");
                self.finish(EndReason::Destroyed);
                return Ok(SessionOutcome::Ended(EndReason::Destroyed));
            }
            SessionState::Ended(reason) => return Ok(SessionOutcome::Ended(reason)),
        }

        if *self.destroy_tx.borrow() {
            self.finish(EndReason::Destroyed);
            return Ok(SessionOutcome::Ended(EndReason::Destroyed));
        }

        let (viewer, channel) = match self.validate() {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Paginator rejected: {}", e);
                self.notifier.emit(LifecycleEvent::ValidationError {
                    kind: e.kind().to_string(),
                    detail: e.to_string(),
                });
                return Ok(SessionOutcome::Rejected(e));
            }
        };

        self.state = SessionState::Running;
        match self.start(viewer, channel).await {
            Ok(reason) => {
                self.finish(reason);
                Ok(SessionOutcome::Ended(reason))
            }
            Err(e) => {
                warn!("Paginator aborted by transport failure: {}", e);
                self.finish(EndReason::Destroyed);
                Err(e.into())
            }
        }
    }

    fn validate(&mut self) -> Result<(UserId, ChannelId), ConfigurationError> {
        if self.pages.is_empty() {
            return Err(ConfigurationError::EmptyPages);
        }
        let ids = self.options.validate(
            self.controls.is_enabled(Action::Info),
            self.controls.is_enabled(Action::Jump),
        )?;

        self.navigator = Navigator::new(self.pages.len(), self.options.circular);
        let start = self.options.starting_page;
        if start == 0 {
            return Err(ConfigurationError::InvalidStartingPage {
                page: 0,
                count: self.pages.len(),
            });
        }
        self.navigator.set_index(start - 1)?;
        Ok(ids)
    }

    fn finish(&mut self, reason: EndReason) {
        if let SessionState::Ended(_) = self.state {
            return;
        }
        info!(reason = %reason, "Paginator session ended");
        self.state = SessionState::Ended(reason);
        self.notifier.emit(LifecycleEvent::Ended { reason });
    }

    async fn start(
        &mut self,
        viewer: UserId,
        channel: ChannelId,
    ) -> Result<EndReason, TransportError> {
        let content = self.render_content();
        let handle = self.transport.render_initial(&channel, &content).await?;
        self.message = Some(handle.clone());
        debug!(message = %handle, pages = self.pages.len(), "Rendered initial page");

        if self.pages.len() == 1 {
            return Ok(EndReason::OnlyOnePage);
        }

        let live = Live {
            handle,
            viewer,
            channel,
        };

        let mut destroy_rx = self.destroy_tx.subscribe();
        let symbols = self.controls.symbols();
        for (i, symbol) in symbols.iter().enumerate() {
            if i > 0 && !self.options.pacing.is_zero() {
                tokio::select! {
                    biased;
                    _ = destroyed(&mut destroy_rx) => return Ok(EndReason::Destroyed),
                    _ = tokio::time::sleep(self.options.pacing) => {}
                }
            }
            self.transport.attach_control(&live.handle, symbol).await?;
        }

        let filter = ControlFilter {
            symbols,
            viewer: live.viewer.clone(),
        };
        let mut events = self
            .transport
            .subscribe_controls(&live.handle, filter, self.options.timeout)
            .await?;

        self.notifier.emit(LifecycleEvent::Started {
            page: self.navigator.current(),
            total: self.navigator.count(),
        });
        info!(
            message = %live.handle,
            viewer = %live.viewer,
            "Paginator session started"
        );

        let result = self.dispatch_loop(&live, &mut events, &mut destroy_rx).await;
        if events.close() {
            debug!("Closed control subscription");
        }
        let reason = result?;
        self.teardown(&live, reason).await;
        Ok(reason)
    }

    async fn dispatch_loop(
        &mut self,
        live: &Live,
        events: &mut ControlEvents,
        destroy_rx: &mut watch::Receiver<bool>,
    ) -> Result<EndReason, TransportError> {
        let mut deadline = deadline_after(self.options.timeout);
        loop {
            let event = tokio::select! {
                biased;
                _ = destroyed(destroy_rx) => return Ok(EndReason::Destroyed),
                _ = tokio::time::sleep_until(deadline) => return Ok(EndReason::TimedOut),
                event = events.next() => match event {
                    Some(event) => event,
                    // Transport ended the subscription on its side
                    None => return Ok(EndReason::TimedOut),
                },
            };

            if !self.is_accepted(live, &event) {
                self.ignore(live, &event).await;
                continue;
            }

            // Idle timer restarts when an accepted event arrives
            deadline = deadline_after(self.options.timeout);
            match self.dispatch(live, &event, deadline, destroy_rx).await? {
                Dispatch::Ignored | Dispatch::Accepted => {}
                Dispatch::End(reason) => return Ok(reason),
            }
        }
    }

    fn is_accepted(&self, live: &Live, event: &ControlEvent) -> bool {
        event.actor == live.viewer && self.controls.resolve(&event.symbol.identifier()).is_some()
    }

    /// Drop an event, cleaning up a stranger's reaction on one of our controls
    async fn ignore(&self, live: &Live, event: &ControlEvent) {
        let symbol = event.symbol.identifier();
        if self.controls.resolve(&symbol).is_none() {
            debug!(symbol = %symbol, "Ignoring unmapped symbol");
            return;
        }
        debug!(actor = %event.actor, symbol = %symbol, "Ignoring control from non-viewer");
        if self.options.remove_reactions && event.can_remove {
            self.remove_reaction(live, &symbol, &event.actor).await;
        }
    }

    async fn dispatch(
        &mut self,
        live: &Live,
        event: &ControlEvent,
        deadline: Instant,
        destroy_rx: &mut watch::Receiver<bool>,
    ) -> Result<Dispatch, TransportError> {
        let symbol = event.symbol.identifier();
        let Some(action) = self.controls.resolve(&symbol) else {
            return Ok(Dispatch::Ignored);
        };
        debug!(action = %action, index = self.navigator.current(), "Dispatching control");

        let step = match action {
            Action::Front => Some(Step::Front),
            Action::Back => Some(Step::Back),
            Action::Next => Some(Step::Next),
            Action::Rear => Some(Step::Rear),
            Action::Stop => return Ok(Dispatch::End(EndReason::Stopped)),
            Action::Trash => return Ok(Dispatch::End(EndReason::Trashed)),
            Action::Info => {
                self.show_info(live).await?;
                None
            }
            Action::Jump => match self.prompt_jump(live, deadline, destroy_rx).await? {
                JumpReply::Page(n) => Some(Step::Jump(n)),
                JumpReply::Invalid => None,
                JumpReply::Interrupted(reason) => return Ok(Dispatch::End(reason)),
            },
        };

        if let Some(step) = step {
            match self.navigator.apply(step) {
                Transition::Moved { from, to } => {
                    let content = self.render_content();
                    self.transport.render_update(&live.handle, &content).await?;
                    debug!(from, to, "Page changed");
                    self.notifier.emit(LifecycleEvent::PageChanged { from, to });
                }
                Transition::Unchanged => debug!(?step, "No-op transition"),
            }
        }

        if self.options.remove_reactions && event.can_remove {
            self.remove_reaction(live, &symbol, &event.actor).await;
        }
        Ok(Dispatch::Accepted)
    }

    fn render_content(&mut self) -> Page {
        let index = self.navigator.current();
        let total = self.pages.len();
        match self.pages.get(index) {
            Some(page) => self.merger.render(page, index, total),
            // Unreachable once validated: the navigator is bounded by the store
            None => Page::Text(String::new()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Extended actions
    // ─────────────────────────────────────────────────────────────────────

    async fn show_info(&self, live: &Live) -> Result<(), TransportError> {
        let text = self
            .options
            .info
            .message
            .clone()
            .unwrap_or_else(|| help_text(&self.controls));
        let notice = self.transport.send_message(&live.channel, &text).await?;

        let transport = Arc::clone(&self.transport);
        let expire_after = self.options.info.expire_after;
        tokio::spawn(async move {
            tokio::time::sleep(expire_after).await;
            if let Err(e) = transport.delete_message(&notice).await {
                warn!("Failed to delete info notice {}: {}", notice, e);
            }
        });
        Ok(())
    }

    async fn prompt_jump(
        &self,
        live: &Live,
        deadline: Instant,
        destroy_rx: &mut watch::Receiver<bool>,
    ) -> Result<JumpReply, TransportError> {
        let jump = &self.options.jump;
        let prompt = match &jump.prompt {
            Some(text) => {
                let text = substitute(text, self.navigator.current() + 1, self.navigator.count());
                Some(self.transport.send_message(&live.channel, &text).await?)
            }
            None => None,
        };

        let outcome = tokio::select! {
            biased;
            _ = destroyed(destroy_rx) => Err(EndReason::Destroyed),
            _ = tokio::time::sleep_until(deadline) => Err(EndReason::TimedOut),
            reply = self.transport.await_reply(&live.channel, &live.viewer, jump.timeout) => Ok(reply),
        };

        if jump.delete_prompt {
            if let Some(prompt) = &prompt {
                if let Err(e) = self.transport.delete_message(prompt).await {
                    warn!("Failed to delete jump prompt {}: {}", prompt, e);
                }
            }
        }

        let reply = match outcome {
            Err(reason) => return Ok(JumpReply::Interrupted(reason)),
            Ok(reply) => reply?,
        };
        let Some(reply) = reply else {
            debug!("Jump prompt expired without a reply");
            return Ok(JumpReply::Invalid);
        };

        if jump.delete_reply && reply.can_delete {
            if let Err(e) = self.transport.delete_message(&reply.message).await {
                warn!("Failed to delete jump reply {}: {}", reply.message, e);
            }
        }

        match parse_jump_reply(&reply.content) {
            Some(n) => Ok(JumpReply::Page(n)),
            None => {
                debug!(reply = %reply.content, "Ignoring non-numeric jump reply");
                Ok(JumpReply::Invalid)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Teardown
    // ─────────────────────────────────────────────────────────────────────

    /// Best-effort cleanup once the dispatch loop has ended
    async fn teardown(&self, live: &Live, reason: EndReason) {
        let result = match reason {
            EndReason::Trashed => self.transport.delete_message(&live.handle).await,
            EndReason::TimedOut if self.options.delete_on_timeout => {
                self.transport.delete_message(&live.handle).await
            }
            EndReason::TimedOut | EndReason::Stopped if self.options.clear_controls_on_end => {
                self.transport.clear_controls(&live.handle).await
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            warn!("Teardown of {} after '{}' failed: {}", live.handle, reason, e);
        }
    }

    async fn remove_reaction(&self, live: &Live, symbol: &ControlSymbol, user: &UserId) {
        if let Err(e) = self
            .transport
            .remove_reaction(&live.handle, symbol, user)
            .await
        {
            warn!("Could not remove reaction {} from {}: {}", symbol, user, e);
        }
    }
}

/// Default help notice listing every enabled control
pub fn help_text(controls: &ControlMap) -> String {
    let mut text = String::from("Controls:\n");
    for (action, symbol) in controls.enabled() {
        let what = match action {
            Action::Front => "first page",
            Action::Back => "previous page",
            Action::Jump => "jump to a page",
            Action::Next => "next page",
            Action::Rear => "last page",
            Action::Info => "show this help",
            Action::Stop => "stop paginating",
            Action::Trash => "delete this message",
        };
        text.push_str(&format!("{} {}\n", symbol, what));
    }
    text
}
