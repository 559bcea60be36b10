//! Focus session and pause state, plus the controller that moves between them.
//!
//! ## State Transitions
//!
//! ```text
//! FocusSession: Inactive -> Active -> Inactive   (user end | expiry | schedule takeover)
//! Pause:        Resumed  -> Paused -> Resumed    (user resume | schedule disabled)
//! ```
//!
//! Both are singletons persisted under `focusSession` and `pauseState`.

mod confirm;
mod controller;

pub use confirm::{
    confirmation_prompt, phrase_pool, Confirmation, ConfirmationKind, FixedSelector, HoldGesture,
    PhraseSelector, RandomSelector, DEFAULT_HOLD_MS,
};
pub use controller::{Reconciliation, SessionController, SessionStatus};

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

const MS_PER_MINUTE: i64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub end_timestamp: Option<EpochMillis>,
}

impl FocusSession {
    /// A session running `minutes` from `now_ms`.
    pub fn starting(now_ms: EpochMillis, minutes: u32) -> Self {
        Self {
            is_active: true,
            end_timestamp: Some(now_ms.saturating_add(i64::from(minutes) * MS_PER_MINUTE)),
        }
    }

    pub fn inactive() -> Self {
        Self::default()
    }

    /// Active and not yet past its deadline.
    ///
    /// An active session without a deadline counts as expired.
    pub fn is_running(&self, now_ms: EpochMillis) -> bool {
        self.is_active && self.end_timestamp.is_some_and(|end| now_ms < end)
    }

    /// Active on paper but past (or missing) its deadline.
    pub fn is_expired(&self, now_ms: EpochMillis) -> bool {
        self.is_active && !self.is_running(now_ms)
    }

    pub fn remaining_ms(&self, now_ms: EpochMillis) -> i64 {
        match self.end_timestamp {
            Some(end) if self.is_running(now_ms) => end - now_ms,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseState {
    #[serde(default)]
    pub is_paused: bool,
    #[serde(default)]
    pub timestamp: Option<EpochMillis>,
}

impl PauseState {
    pub fn paused_at(now_ms: EpochMillis) -> Self {
        Self {
            is_paused: true,
            timestamp: Some(now_ms),
        }
    }

    pub fn resumed() -> Self {
        Self::default()
    }
}

/// Stored streak counter. Nothing in the core computes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusStreak {
    #[serde(default)]
    pub days: u32,
    #[serde(default)]
    pub last_focus_timestamp: Option<EpochMillis>,
}
