//! # FocusFalcon Core Library
//!
//! Blocking logic for the FocusFalcon browser extension: given a navigation
//! and the current instant, decide whether the page should be replaced by the
//! block page. The browser itself sits behind a trait, so the whole engine
//! runs headless from the CLI and in tests.
//!
//! ## Architecture
//!
//! - **Storage**: a JSON key-value store (SQLite or in-memory) shared with the
//!   extension's settings pages, plus TOML configuration
//! - **Decision engine**: focus session > pause > schedule, re-read per call
//! - **Session controller**: focus session and pause transitions, schedule
//!   takeover, confirmation gates
//! - **Enforcement**: redirects, tab refresh, network rules, cache removal
//!
//! ## Key Components
//!
//! - [`DecisionEngine`]: Block/allow verdicts
//! - [`SessionController`]: Focus session and pause state machine
//! - [`EnforcementCoordinator`]: Applies verdicts through a [`BrowserHost`]
//! - [`Database`]: Persistent key-value state
//! - [`Config`]: Application configuration management

pub mod avatar;
pub mod engine;
pub mod enforcement;
pub mod error;
pub mod events;
pub mod messages;
pub mod schedule;
pub mod session;
pub mod sites;
pub mod storage;

pub use avatar::Avatar;
pub use engine::{decide, DecisionEngine, Rule, Verdict};
pub use enforcement::{
    BlockRule, BlockingReport, BrowserHost, CacheScope, EnforcementCoordinator, Navigation,
    NavigationOutcome, RecordingHost, Tab,
};
pub use error::{
    ConfigError, CoreError, HostError, SessionError, SiteError, StorageError, ValidationError,
};
pub use events::{Event, Listener};
pub use messages::{ControlMessage, MessageResponse, MessageRouter};
pub use schedule::{Schedule, TimeRange};
pub use session::{
    Confirmation, ConfirmationKind, FocusSession, FocusStreak, HoldGesture, PauseState,
    SessionController, SessionStatus,
};
pub use sites::BlockedSiteSet;
pub use storage::{Config, Database, KeyValueStore, MemoryStore, StateSnapshot, StateStore};
