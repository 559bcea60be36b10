//! Blocking decision engine.
//!
//! Given a URL and the current instant, decides whether the navigation is
//! blocked. State is re-read from storage on every call; nothing is cached.
//!
//! ## Precedence
//!
//! ```text
//! focus session > pause > schedule enabled > (site match AND schedule time match)
//! ```
//!
//! An unexpired focus session blocks every listed site regardless of pause
//! and schedule. Pause and schedule only matter when no session runs.

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::session::FocusSession;
use crate::sites::hostname_of;
use crate::storage::{KeyValueStore, StateSnapshot, StateStore};

/// Which rule produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// URL could not be parsed or has no host.
    Malformed,
    /// A running focus session decided by site match alone.
    FocusSession,
    /// The stored focus session had expired and was cleared.
    FocusExpired,
    /// Schedule enforcement is paused.
    Paused,
    /// No focus session and the schedule is off.
    ScheduleDisabled,
    /// Site match combined with the schedule's day/time window.
    Schedule,
}

/// Block/allow result for one navigation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub block: bool,
    pub rule: Rule,
    pub hostname: Option<String>,
}

impl Verdict {
    fn allow(rule: Rule, hostname: Option<String>) -> Self {
        Self {
            block: false,
            rule,
            hostname,
        }
    }
}

/// Pure decision over an already-loaded snapshot.
///
/// Returns [`Rule::FocusExpired`] without touching storage; persisting the
/// expiry is the caller's job.
pub fn decide<Tz: TimeZone>(snapshot: &StateSnapshot, hostname: &str, now: &DateTime<Tz>) -> Verdict {
    let now_ms = now.timestamp_millis();
    let host = Some(hostname.to_string());
    let session = &snapshot.focus_session;

    if session.is_active {
        if session.is_running(now_ms) {
            return Verdict {
                block: snapshot.blocked_sites.matches(hostname),
                rule: Rule::FocusSession,
                hostname: host,
            };
        }
        return Verdict::allow(Rule::FocusExpired, host);
    }

    if snapshot.pause_state.is_paused {
        return Verdict::allow(Rule::Paused, host);
    }

    if !snapshot.block_rules.enabled {
        return Verdict::allow(Rule::ScheduleDisabled, host);
    }

    Verdict {
        block: snapshot.blocked_sites.matches(hostname)
            && snapshot.block_rules.is_active_now(now),
        rule: Rule::Schedule,
        hostname: host,
    }
}

/// Loads state per call and applies [`decide`], persisting lazy expiry.
#[derive(Debug, Clone)]
pub struct DecisionEngine<S> {
    state: StateStore<S>,
}

impl<S: KeyValueStore> DecisionEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            state: StateStore::new(store),
        }
    }

    pub fn state(&self) -> &StateStore<S> {
        &self.state
    }

    /// Whether navigating to `url` at `now` should be redirected.
    pub fn should_block<Tz: TimeZone>(&self, url: &str, now: &DateTime<Tz>) -> bool {
        self.evaluate(url, now).block
    }

    /// Full verdict for `url` at `now`.
    pub fn evaluate<Tz: TimeZone>(&self, url: &str, now: &DateTime<Tz>) -> Verdict {
        let Some(hostname) = hostname_of(url) else {
            debug!(url, "unparseable url, allowing");
            return Verdict::allow(Rule::Malformed, None);
        };

        let snapshot = self.state.load_snapshot();
        let verdict = decide(&snapshot, &hostname, now);

        if verdict.rule == Rule::FocusExpired {
            // A failed write is retried on the next decision, which will see
            // the same expired session again.
            match self.state.save_focus_session(&FocusSession::inactive()) {
                Ok(()) => info!("focus session expired"),
                Err(e) => warn!(error = %e, "could not persist focus session expiry"),
            }
        }

        debug!(hostname = %hostname, block = verdict.block, rule = ?verdict.rule, "verdict");
        verdict
    }
}
