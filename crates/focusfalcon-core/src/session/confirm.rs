//! Human confirmation for destructive transitions.
//!
//! Pausing the schedule and ending a focus session early both require a
//! [`Confirmation`] token. The prompt shown to the user is drawn from a fixed
//! pool per action; [`HoldGesture`] implements hold-to-confirm.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::EpochMillis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationKind {
    Pause,
    EndSession,
}

impl std::fmt::Display for ConfirmationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfirmationKind::Pause => write!(f, "pause"),
            ConfirmationKind::EndSession => write!(f, "end session"),
        }
    }
}

const PAUSE_PHRASES: [&str; 4] = [
    "Pause blocking? Your schedule will stop protecting you until you resume.",
    "Are you sure you want to let the distractions back in?",
    "Taking a break from the schedule. Is this really the moment?",
    "Pausing now means the blocked sites open again. Continue?",
];

const END_SESSION_PHRASES: [&str; 4] = [
    "End your focus session early?",
    "You're almost there. Do you really want to stop focusing?",
    "Giving up on this session will unblock every site. Sure?",
    "Stop the countdown and leave focus mode?",
];

pub fn phrase_pool(kind: ConfirmationKind) -> &'static [&'static str] {
    match kind {
        ConfirmationKind::Pause => &PAUSE_PHRASES,
        ConfirmationKind::EndSession => &END_SESSION_PHRASES,
    }
}

/// Picks an index into a phrase pool.
pub trait PhraseSelector {
    /// Return an index in `0..pool_len`. `pool_len` is never zero.
    fn select(&self, pool_len: usize) -> usize;
}

/// Uniformly random selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl PhraseSelector for RandomSelector {
    fn select(&self, pool_len: usize) -> usize {
        rand::thread_rng().gen_range(0..pool_len)
    }
}

/// Always the same index (wrapped into range).
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSelector(pub usize);

impl PhraseSelector for FixedSelector {
    fn select(&self, pool_len: usize) -> usize {
        self.0 % pool_len
    }
}

/// Prompt text for `kind`, chosen by `selector`.
pub fn confirmation_prompt(kind: ConfirmationKind, selector: &dyn PhraseSelector) -> &'static str {
    let pool = phrase_pool(kind);
    pool[selector.select(pool.len()) % pool.len()]
}

/// Outcome of asking the user to confirm an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    kind: ConfirmationKind,
    confirmed: bool,
}

impl Confirmation {
    pub fn confirmed(kind: ConfirmationKind) -> Self {
        Self {
            kind,
            confirmed: true,
        }
    }

    pub fn declined(kind: ConfirmationKind) -> Self {
        Self {
            kind,
            confirmed: false,
        }
    }

    pub fn kind(&self) -> ConfirmationKind {
        self.kind
    }

    /// True only for an affirmative answer to exactly `kind`.
    pub fn approves(&self, kind: ConfirmationKind) -> bool {
        self.confirmed && self.kind == kind
    }
}

/// Default time the button must be held.
pub const DEFAULT_HOLD_MS: u64 = 2_000;

/// Hold-to-confirm accumulator.
///
/// Progress runs from 0 to 100 over `hold_ms` while pressed. Reaching 100
/// yields a [`Confirmation`] exactly once; releasing early resets to 0.
#[derive(Debug, Clone)]
pub struct HoldGesture {
    kind: ConfirmationKind,
    hold_ms: u64,
    pressed_at: Option<EpochMillis>,
    progress: f64,
    completed: bool,
}

impl HoldGesture {
    pub fn new(kind: ConfirmationKind, hold_ms: u64) -> Self {
        Self {
            kind,
            hold_ms: hold_ms.max(1),
            pressed_at: None,
            progress: 0.0,
            completed: false,
        }
    }

    pub fn press(&mut self, now_ms: EpochMillis) {
        if self.pressed_at.is_none() && !self.completed {
            self.pressed_at = Some(now_ms);
        }
    }

    /// Advance the accumulator. Returns the confirmation on the tick that
    /// reaches 100%.
    pub fn tick(&mut self, now_ms: EpochMillis) -> Option<Confirmation> {
        let pressed_at = self.pressed_at?;
        let elapsed = now_ms.saturating_sub(pressed_at).max(0) as f64;
        self.progress = (elapsed / self.hold_ms as f64 * 100.0).min(100.0);

        if self.progress >= 100.0 {
            self.pressed_at = None;
            self.completed = true;
            return Some(Confirmation::confirmed(self.kind));
        }
        None
    }

    /// Let go of the button. Aborts unless already complete.
    pub fn release(&mut self) {
        self.pressed_at = None;
        if !self.completed {
            self.progress = 0.0;
        }
    }

    /// 0.0 ..= 100.0
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_holding(&self) -> bool {
        self.pressed_at.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_selector_picks_deterministically() {
        let p = confirmation_prompt(ConfirmationKind::Pause, &FixedSelector(1));
        assert_eq!(p, PAUSE_PHRASES[1]);
        let p = confirmation_prompt(ConfirmationKind::EndSession, &FixedSelector(9));
        assert_eq!(p, END_SESSION_PHRASES[9 % END_SESSION_PHRASES.len()]);
    }

    #[test]
    fn random_selector_stays_in_pool() {
        for _ in 0..50 {
            let p = confirmation_prompt(ConfirmationKind::EndSession, &RandomSelector);
            assert!(END_SESSION_PHRASES.contains(&p));
        }
    }

    #[test]
    fn confirmation_only_approves_its_own_kind() {
        let c = Confirmation::confirmed(ConfirmationKind::Pause);
        assert!(c.approves(ConfirmationKind::Pause));
        assert!(!c.approves(ConfirmationKind::EndSession));
        assert!(!Confirmation::declined(ConfirmationKind::Pause).approves(ConfirmationKind::Pause));
    }

    #[test]
    fn hold_completes_at_full_duration() {
        let mut hold = HoldGesture::new(ConfirmationKind::EndSession, 2_000);
        hold.press(10_000);
        assert!(hold.tick(11_000).is_none());
        assert!((hold.progress() - 50.0).abs() < f64::EPSILON);

        let done = hold.tick(12_000).unwrap();
        assert!(done.approves(ConfirmationKind::EndSession));
        assert!(hold.is_complete());
        assert!(hold.tick(13_000).is_none(), "completion fires once");
    }

    #[test]
    fn early_release_resets_progress() {
        let mut hold = HoldGesture::new(ConfirmationKind::Pause, 2_000);
        hold.press(0);
        hold.tick(1_500);
        hold.release();
        assert_eq!(hold.progress(), 0.0);
        assert!(!hold.is_holding());
        assert!(hold.tick(5_000).is_none());

        hold.press(5_000);
        assert!(hold.tick(6_999).is_none());
        assert!(hold.tick(7_000).is_some());
    }
}
