// reaction-pager - Reaction-driven pagination for chat messages
//
// Shows a sequence of pages inside one chat message and lets a single
// viewer navigate them with reaction controls.
//
// Architecture:
// - Page store (page): ordered text/document pages
// - Template merger (template): shared document fields + live page indicator
// - Navigation (navigation): index transitions, circular or bounded
// - Controls (controls): action <-> symbol mapping
// - Session (session): start, serialized event dispatch, timeouts, teardown
// - Transport (transport): the seam to a chat platform, plus an in-memory one
// - Events (events): lifecycle notifications for the owner of a session
// - Deck (deck): pages + template loaded from TOML/JSON files

pub mod config;
pub mod controls;
pub mod deck;
pub mod error;
pub mod events;
pub mod logging;
pub mod navigation;
pub mod page;
pub mod session;
pub mod template;
pub mod transport;

pub use controls::{Action, ControlMap, ControlSymbol, ReactionSymbol};
pub use error::{ConfigurationError, PaginatorError, TransportError};
pub use events::{EndReason, LifecycleEvent, Notifier, SessionOutcome};
pub use page::{Document, Page};
pub use session::{DestroyHandle, Paginator, SessionOptions, SessionState};
pub use template::DocumentTemplate;
pub use transport::{ChannelId, MemoryTransport, Transport, UserId};
