//! Session behaviour against the in-memory transport
//!
//! Reactions and replies are queued before `run`, so every session plays
//! out deterministically and then idles into its timeout. Time is paused,
//! which makes 30-second timeouts instant.

use reaction_pager::controls::ReactionSymbol;
use reaction_pager::page::{Document, Footer};
use reaction_pager::transport::{CallKind, TransportCall};
use reaction_pager::{
    Action, ChannelId, ConfigurationError, ControlMap, ControlSymbol, EndReason, LifecycleEvent,
    MemoryTransport, Notifier, Page, Paginator, PaginatorError, SessionOptions, SessionOutcome,
    SessionState, TransportError, UserId,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn viewer() -> UserId {
    UserId::new("viewer")
}

fn options() -> SessionOptions {
    SessionOptions::new(viewer(), ChannelId::new("chan")).pacing(Duration::ZERO)
}

fn pages(texts: &[&str]) -> Vec<Page> {
    texts.iter().map(|t| Page::text(*t)).collect()
}

fn symbol(action: Action) -> ReactionSymbol {
    ReactionSymbol::from(&action.default_symbol())
}

async fn press(transport: &MemoryTransport, action: Action) {
    transport.react(symbol(action), &viewer()).await;
}

fn paginator(transport: &Arc<MemoryTransport>, texts: &[&str]) -> Paginator<MemoryTransport> {
    Paginator::new(Arc::clone(transport), pages(texts), options())
}

fn sent_texts(transport: &MemoryTransport) -> Vec<String> {
    transport
        .calls_of(CallKind::SendMessage)
        .into_iter()
        .filter_map(|call| match call {
            TransportCall::SendMessage { text, .. } => Some(text),
            _ => None,
        })
        .collect()
}

fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<LifecycleEvent>) -> Vec<LifecycleEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ─────────────────────────────────────────────────────────────────────────────
// Navigation
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn bounded_walk_renders_only_on_change() {
    let transport = Arc::new(MemoryTransport::new());
    for action in [
        Action::Back,
        Action::Next,
        Action::Next,
        Action::Next,
        Action::Back,
        Action::Back,
        Action::Back,
    ] {
        press(&transport, action).await;
    }

    let mut session = paginator(&transport, &["A", "B", "C"]);
    let outcome = session.run().await.unwrap();

    assert_eq!(outcome, SessionOutcome::Ended(EndReason::TimedOut));
    assert_eq!(transport.rendered(), pages(&["A", "B", "C", "B", "A"]));
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.state(), SessionState::Ended(EndReason::TimedOut));
}

#[tokio::test(start_paused = true)]
async fn circular_walk_wraps_both_ways() {
    let transport = Arc::new(MemoryTransport::new());
    press(&transport, Action::Back).await;
    press(&transport, Action::Next).await;

    let mut session = Paginator::new(
        Arc::clone(&transport),
        pages(&["A", "B", "C"]),
        options().circular(true),
    );
    session.run().await.unwrap();

    assert_eq!(transport.rendered(), pages(&["A", "C", "A"]));
}

#[tokio::test(start_paused = true)]
async fn front_and_rear_when_enabled() {
    let transport = Arc::new(MemoryTransport::new());
    press(&transport, Action::Rear).await;
    press(&transport, Action::Rear).await;
    press(&transport, Action::Front).await;

    let controls = ControlMap::builder()
        .enable(Action::Front)
        .enable(Action::Rear)
        .build()
        .unwrap();
    let mut session = paginator(&transport, &["A", "B", "C"]).with_controls(controls);
    session.run().await.unwrap();

    assert_eq!(transport.rendered(), pages(&["A", "C", "A"]));
    assert_eq!(
        transport.attached(),
        vec![
            Action::Front.default_symbol(),
            Action::Back.default_symbol(),
            Action::Jump.default_symbol(),
            Action::Next.default_symbol(),
            Action::Rear.default_symbol(),
            Action::Trash.default_symbol(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn starting_page_is_shown_first() {
    let transport = Arc::new(MemoryTransport::new());
    let mut session = Paginator::new(
        Arc::clone(&transport),
        pages(&["A", "B", "C"]),
        options().starting_page(2),
    );
    session.run().await.unwrap();

    assert_eq!(transport.rendered(), pages(&["B"]));
}

// ─────────────────────────────────────────────────────────────────────────────
// Jump
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn jump_accepts_only_pages_in_range() {
    let transport = Arc::new(MemoryTransport::new());
    for reply in ["3", "0", "6", "abc"] {
        press(&transport, Action::Jump).await;
        transport.reply(&viewer(), reply).await;
    }

    let mut session = paginator(&transport, &["1", "2", "3", "4", "5"]);
    session.run().await.unwrap();

    assert_eq!(transport.rendered(), pages(&["1", "3"]));
    assert_eq!(
        sent_texts(&transport),
        vec!["Which page would you like to see? (1-5)"; 4]
    );
    // Every prompt and every reply is cleaned up
    assert_eq!(transport.calls_of(CallKind::DeleteMessage).len(), 8);
}

#[tokio::test(start_paused = true)]
async fn jump_ignores_replies_from_others() {
    let transport = Arc::new(MemoryTransport::new());
    press(&transport, Action::Jump).await;
    transport.reply(&UserId::new("stranger"), "2").await;
    transport.reply(&viewer(), "3").await;

    let mut session = paginator(&transport, &["1", "2", "3"]);
    session.run().await.unwrap();

    assert_eq!(transport.rendered(), pages(&["1", "3"]));
}

#[tokio::test(start_paused = true)]
async fn jump_wait_does_not_extend_the_session() {
    let transport = Arc::new(MemoryTransport::new());
    press(&transport, Action::Jump).await;

    let mut opts = options().timeout(Duration::from_secs(10));
    opts.jump.timeout = Duration::from_secs(60);
    let mut session = Paginator::new(Arc::clone(&transport), pages(&["A", "B"]), opts);

    let started = Instant::now();
    let outcome = session.run().await.unwrap();

    assert_eq!(outcome, SessionOutcome::Ended(EndReason::TimedOut));
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(10), "{:?}", elapsed);
    assert!(elapsed < Duration::from_secs(60), "{:?}", elapsed);
    // The prompt is still cleaned up
    assert_eq!(transport.calls_of(CallKind::DeleteMessage).len(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Termination
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn stop_ends_and_later_events_are_ignored() {
    let transport = Arc::new(MemoryTransport::new());
    press(&transport, Action::Next).await;
    press(&transport, Action::Stop).await;
    press(&transport, Action::Next).await;

    let controls = ControlMap::builder().enable(Action::Stop).build().unwrap();
    let mut session = paginator(&transport, &["A", "B", "C"]).with_controls(controls);
    let outcome = session.run().await.unwrap();

    assert_eq!(outcome, SessionOutcome::Ended(EndReason::Stopped));
    assert_eq!(transport.rendered(), pages(&["A", "B"]));
    assert_eq!(transport.calls_of(CallKind::ClearControls).len(), 1);
    assert!(transport.calls_of(CallKind::DeleteMessage).is_empty());
}

#[tokio::test(start_paused = true)]
async fn trash_deletes_the_message() {
    let transport = Arc::new(MemoryTransport::new());
    press(&transport, Action::Trash).await;

    let mut session = paginator(&transport, &["A", "B"]);
    let outcome = session.run().await.unwrap();

    assert_eq!(outcome, SessionOutcome::Ended(EndReason::Trashed));
    let handle = session.message().cloned().unwrap();
    assert_eq!(
        transport.calls_of(CallKind::DeleteMessage),
        vec![TransportCall::DeleteMessage { handle }]
    );
    assert!(transport.calls_of(CallKind::ClearControls).is_empty());
}

#[tokio::test(start_paused = true)]
async fn single_page_ends_without_controls() {
    let transport = Arc::new(MemoryTransport::new());
    let (notifier, mut rx) = Notifier::channel();
    let mut session = paginator(&transport, &["only"]).with_notifier(notifier);
    let outcome = session.run().await.unwrap();

    assert_eq!(outcome, SessionOutcome::Ended(EndReason::OnlyOnePage));
    assert_eq!(transport.rendered(), pages(&["only"]));
    assert!(transport.attached().is_empty());
    assert!(transport.calls_of(CallKind::Subscribe).is_empty());
    assert_eq!(
        drain(&mut rx),
        vec![LifecycleEvent::Ended {
            reason: EndReason::OnlyOnePage
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn timeout_clears_controls_by_default() {
    let transport = Arc::new(MemoryTransport::new());
    let mut session = paginator(&transport, &["A", "B"]);

    let started = Instant::now();
    let outcome = session.run().await.unwrap();

    assert_eq!(outcome, SessionOutcome::Ended(EndReason::TimedOut));
    assert!(started.elapsed() >= Duration::from_secs(30));
    assert_eq!(transport.calls_of(CallKind::ClearControls).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn timeout_can_delete_the_message() {
    let transport = Arc::new(MemoryTransport::new());
    let mut session = Paginator::new(
        Arc::clone(&transport),
        pages(&["A", "B"]),
        options().delete_on_timeout(true),
    );
    session.run().await.unwrap();

    assert_eq!(transport.calls_of(CallKind::DeleteMessage).len(), 1);
    assert!(transport.calls_of(CallKind::ClearControls).is_empty());
}

#[tokio::test(start_paused = true)]
async fn accepted_events_restart_the_idle_timer() {
    let transport = Arc::new(MemoryTransport::new());
    let presser = Arc::clone(&transport);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(8)).await;
        press(&presser, Action::Next).await;
    });

    let mut session = Paginator::new(
        Arc::clone(&transport),
        pages(&["A", "B"]),
        options().timeout(Duration::from_secs(10)),
    );
    let started = Instant::now();
    session.run().await.unwrap();

    assert!(started.elapsed() >= Duration::from_secs(18));
    assert_eq!(transport.rendered(), pages(&["A", "B"]));
}

#[tokio::test(start_paused = true)]
async fn destroy_from_another_task() {
    let transport = Arc::new(MemoryTransport::new());
    let mut session = paginator(&transport, &["A", "B"]);
    let handle = session.destroy_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        handle.destroy();
        handle.destroy();
    });

    let started = Instant::now();
    let outcome = session.run().await.unwrap();

    assert_eq!(outcome, SessionOutcome::Ended(EndReason::Destroyed));
    assert!(started.elapsed() < Duration::from_secs(30));
    assert!(transport.calls_of(CallKind::ClearControls).is_empty());
    assert!(transport.calls_of(CallKind::DeleteMessage).is_empty());
}

#[tokio::test]
async fn destroy_before_run_sends_nothing() {
    let transport = Arc::new(MemoryTransport::new());
    let mut session = paginator(&transport, &["A", "B"]);
    session.destroy();
    session.destroy();

    assert_eq!(session.state(), SessionState::Ended(EndReason::Destroyed));
    let outcome = session.run().await.unwrap();
    assert_eq!(outcome, SessionOutcome::Ended(EndReason::Destroyed));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn destroy_handle_before_run_sends_nothing() {
    let transport = Arc::new(MemoryTransport::new());
    let mut session = paginator(&transport, &["A", "B"]);
    session.destroy_handle().destroy();

    let outcome = session.run().await.unwrap();
    assert_eq!(outcome, SessionOutcome::Ended(EndReason::Destroyed));
    assert!(transport.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn run_after_end_is_a_no_op() {
    let transport = Arc::new(MemoryTransport::new());
    press(&transport, Action::Trash).await;
    let mut session = paginator(&transport, &["A", "B"]);

    let first = session.run().await.unwrap();
    let calls = transport.calls().len();
    let second = session.run().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(transport.calls().len(), calls);
    assert_eq!(
        session.append_page(Page::text("late")),
        Err(ConfigurationError::SessionNotIdle)
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization and symbols
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn strangers_are_ignored_and_their_reactions_removed() {
    let transport = Arc::new(MemoryTransport::unfiltered());
    let stranger = UserId::new("stranger");
    transport.react(symbol(Action::Next), &stranger).await;
    transport
        .react(ReactionSymbol::named("👍"), &stranger)
        .await;
    press(&transport, Action::Next).await;

    let mut session = paginator(&transport, &["A", "B", "C"]);
    session.run().await.unwrap();

    assert_eq!(transport.rendered(), pages(&["A", "B"]));
    let removed: Vec<UserId> = transport
        .calls_of(CallKind::RemoveReaction)
        .into_iter()
        .filter_map(|call| match call {
            TransportCall::RemoveReaction { user, .. } => Some(user),
            _ => None,
        })
        .collect();
    // Unmapped symbols are left alone
    assert_eq!(removed, vec![stranger, viewer()]);
}

#[tokio::test(start_paused = true)]
async fn custom_id_takes_precedence_over_name() {
    let transport = Arc::new(MemoryTransport::new());
    // Named like the back control, but the id is bound to next
    transport
        .react(ReactionSymbol::custom(42, "◀"), &viewer())
        .await;

    let controls = ControlMap::builder()
        .bind(Action::Next, ControlSymbol::Custom(42))
        .build()
        .unwrap();
    let mut session = paginator(&transport, &["A", "B"]).with_controls(controls);
    session.run().await.unwrap();

    assert_eq!(transport.rendered(), pages(&["A", "B"]));
}

#[tokio::test(start_paused = true)]
async fn failed_reaction_removal_does_not_abort() {
    let transport = Arc::new(MemoryTransport::new());
    transport.deny(CallKind::RemoveReaction);
    press(&transport, Action::Next).await;

    let mut session = paginator(&transport, &["A", "B"]);
    let outcome = session.run().await.unwrap();

    assert_eq!(outcome, SessionOutcome::Ended(EndReason::TimedOut));
    assert_eq!(transport.rendered(), pages(&["A", "B"]));
    assert_eq!(transport.calls_of(CallKind::RemoveReaction).len(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Info
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn info_posts_a_notice_that_expires() {
    let transport = Arc::new(MemoryTransport::new());
    press(&transport, Action::Info).await;

    let mut opts = options();
    opts.info.expire_after = Duration::from_secs(10);
    let controls = ControlMap::builder().enable(Action::Info).build().unwrap();
    let mut session =
        Paginator::new(Arc::clone(&transport), pages(&["A", "B"]), opts).with_controls(controls);
    session.run().await.unwrap();

    let sent = sent_texts(&transport);
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("show this help"), "{}", sent[0]);
    // Expired during the 30s idle period
    assert_eq!(transport.calls_of(CallKind::DeleteMessage).len(), 1);
    // Info never changes the page
    assert_eq!(transport.rendered(), pages(&["A"]));
}

// ─────────────────────────────────────────────────────────────────────────────
// Templates
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn footer_format_is_captured_once() {
    let transport = Arc::new(MemoryTransport::new());
    press(&transport, Action::Next).await;

    let docs = vec![
        Page::Document(
            Document::new()
                .title("one")
                .footer(Footer::text("Guide {current}/{total}")),
        ),
        Page::Document(
            Document::new()
                .title("two")
                .footer(Footer::text("Other {current}")),
        ),
    ];
    let template = Document::new().color(0x00ff00);
    let mut session = Paginator::new(Arc::clone(&transport), docs, options())
        .with_template(template.into());
    session.run().await.unwrap();

    let footers: Vec<Option<String>> = transport
        .rendered()
        .iter()
        .map(|page| page.footer_text().map(str::to_string))
        .collect();
    assert_eq!(
        footers,
        vec![Some("Guide 1/2".to_string()), Some("Guide 2/2".to_string())]
    );
    for page in transport.rendered() {
        let Page::Document(doc) = page else {
            panic!("expected document");
        };
        assert_eq!(doc.color, Some(0x00ff00));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation and failures
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_viewer_is_rejected_before_any_call() {
    let transport = Arc::new(MemoryTransport::new());
    let (notifier, mut rx) = Notifier::channel();
    let mut opts = options();
    opts.viewer = None;
    let mut session =
        Paginator::new(Arc::clone(&transport), pages(&["A", "B"]), opts).with_notifier(notifier);

    let outcome = session.run().await.unwrap();

    assert_eq!(
        outcome,
        SessionOutcome::Rejected(ConfigurationError::MissingViewer)
    );
    assert!(transport.calls().is_empty());
    assert_eq!(session.state(), SessionState::Idle);
    match drain(&mut rx).as_slice() {
        [LifecycleEvent::ValidationError { kind, .. }] => assert_eq!(kind, "missing_viewer"),
        other => panic!("unexpected events {:?}", other),
    }
}

#[tokio::test]
async fn empty_and_out_of_range_sessions_are_rejected() {
    let transport = Arc::new(MemoryTransport::new());
    let mut empty = Paginator::new(Arc::clone(&transport), Vec::new(), options());
    assert_eq!(
        empty.run().await.unwrap(),
        SessionOutcome::Rejected(ConfigurationError::EmptyPages)
    );

    let mut past_end = Paginator::new(
        Arc::clone(&transport),
        pages(&["A", "B", "C"]),
        options().starting_page(4),
    );
    assert_eq!(
        past_end.run().await.unwrap(),
        SessionOutcome::Rejected(ConfigurationError::InvalidStartingPage { page: 4, count: 3 })
    );
    assert!(transport.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn transport_failure_is_propagated() {
    let transport = Arc::new(MemoryTransport::new());
    transport.deny(CallKind::RenderUpdate);
    press(&transport, Action::Next).await;

    let mut session = paginator(&transport, &["A", "B"]);
    let err = session.run().await.unwrap_err();

    assert!(matches!(
        err,
        PaginatorError::Transport(TransportError::MissingPermission(_))
    ));
    assert_eq!(session.state(), SessionState::Ended(EndReason::Destroyed));
}

#[tokio::test(start_paused = true)]
async fn lifecycle_events_in_order() {
    let transport = Arc::new(MemoryTransport::new());
    press(&transport, Action::Next).await;
    press(&transport, Action::Next).await;

    let (notifier, mut rx) = Notifier::channel();
    let mut session = paginator(&transport, &["A", "B", "C"]).with_notifier(notifier);
    session.run().await.unwrap();

    assert_eq!(
        drain(&mut rx),
        vec![
            LifecycleEvent::Started { page: 0, total: 3 },
            LifecycleEvent::PageChanged { from: 0, to: 1 },
            LifecycleEvent::PageChanged { from: 1, to: 2 },
            LifecycleEvent::Ended {
                reason: EndReason::TimedOut
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn pages_can_change_while_idle() {
    let transport = Arc::new(MemoryTransport::new());
    let mut session = paginator(&transport, &["A"]);
    session.append_page(Page::text("B")).unwrap();
    session.replace_pages(pages(&["X", "Y", "Z"])).unwrap();
    assert_eq!(session.page_count(), 3);

    press(&transport, Action::Next).await;
    session.run().await.unwrap();
    assert_eq!(transport.rendered(), pages(&["X", "Y"]));
}

// ─────────────────────────────────────────────────────────────────────────────
// Timers and cancellation
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn huge_timeout_does_not_overflow() {
    let transport = Arc::new(MemoryTransport::new());
    press(&transport, Action::Next).await;

    let mut session = Paginator::new(
        Arc::clone(&transport),
        pages(&["A", "B"]),
        options().timeout(Duration::from_secs(u64::MAX)),
    );
    let handle = session.destroy_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        handle.destroy();
    });

    let outcome = session.run().await.unwrap();

    assert_eq!(outcome, SessionOutcome::Ended(EndReason::Destroyed));
    assert_eq!(transport.rendered(), pages(&["A", "B"]));
}

#[tokio::test(start_paused = true)]
async fn destroy_after_a_dropped_run_ends_the_session() {
    let transport = Arc::new(MemoryTransport::new());
    let (notifier, mut rx) = Notifier::channel();
    let mut session = paginator(&transport, &["A", "B"]).with_notifier(notifier);

    let abandoned = tokio::time::timeout(Duration::from_secs(1), session.run()).await;
    assert!(abandoned.is_err());
    assert_eq!(session.state(), SessionState::Running);

    session.destroy();
    assert_eq!(session.state(), SessionState::Ended(EndReason::Destroyed));

    let calls = transport.calls().len();
    assert_eq!(
        session.run().await.unwrap(),
        SessionOutcome::Ended(EndReason::Destroyed)
    );
    assert_eq!(transport.calls().len(), calls);
    assert_eq!(
        drain(&mut rx),
        vec![
            LifecycleEvent::Started { page: 0, total: 2 },
            LifecycleEvent::Ended {
                reason: EndReason::Destroyed
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn run_after_a_dropped_run_ends_destroyed() {
    let transport = Arc::new(MemoryTransport::new());
    let mut session = paginator(&transport, &["A", "B"]);

    let abandoned = tokio::time::timeout(Duration::from_secs(1), session.run()).await;
    assert!(abandoned.is_err());

    let calls = transport.calls().len();
    assert_eq!(
        session.run().await.unwrap(),
        SessionOutcome::Ended(EndReason::Destroyed)
    );
    assert_eq!(session.state(), SessionState::Ended(EndReason::Destroyed));
    assert_eq!(transport.calls().len(), calls);
}

#[tokio::test(start_paused = true)]
async fn controls_are_attached_with_pacing() {
    let transport = Arc::new(MemoryTransport::new());
    press(&transport, Action::Trash).await;

    let mut session = Paginator::new(
        Arc::clone(&transport),
        pages(&["A", "B"]),
        options().pacing(Duration::from_secs(1)),
    );
    let started = Instant::now();
    let outcome = session.run().await.unwrap();

    // Four default controls: three pauses before the subscription opens
    assert_eq!(outcome, SessionOutcome::Ended(EndReason::Trashed));
    assert_eq!(transport.attached().len(), 4);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(3), "{:?}", elapsed);
    assert!(elapsed < Duration::from_secs(4), "{:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn destroy_while_attaching_stops_before_subscribing() {
    let transport = Arc::new(MemoryTransport::new());
    let mut session = Paginator::new(
        Arc::clone(&transport),
        pages(&["A", "B"]),
        options().pacing(Duration::from_secs(1)),
    );
    let handle = session.destroy_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        handle.destroy();
    });

    let outcome = session.run().await.unwrap();

    assert_eq!(outcome, SessionOutcome::Ended(EndReason::Destroyed));
    assert_eq!(transport.attached().len(), 2);
    assert!(transport.calls_of(CallKind::Subscribe).is_empty());
}

#[tokio::test(start_paused = true)]
async fn destroy_during_jump_wait() {
    let transport = Arc::new(MemoryTransport::new());
    press(&transport, Action::Jump).await;

    let mut opts = options();
    opts.jump.timeout = Duration::from_secs(60);
    let mut session = Paginator::new(Arc::clone(&transport), pages(&["A", "B"]), opts);
    let handle = session.destroy_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        handle.destroy();
    });

    let started = Instant::now();
    let outcome = session.run().await.unwrap();

    assert_eq!(outcome, SessionOutcome::Ended(EndReason::Destroyed));
    assert!(started.elapsed() < Duration::from_secs(30));
    assert_eq!(transport.calls_of(CallKind::AwaitReply).len(), 1);
    // Prompt removed, page never re-rendered
    assert_eq!(transport.calls_of(CallKind::DeleteMessage).len(), 1);
    assert_eq!(transport.rendered(), pages(&["A"]));
}
