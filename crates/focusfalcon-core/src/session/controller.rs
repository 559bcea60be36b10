//! Session/pause state machine.
//!
//! Stateless over storage like the decision engine: every transition reads
//! the current values, writes the new ones, then notifies listeners
//! synchronously. Schedule changes are reconciled right after they are
//! written (takeover of a running session, auto-resume of a pause).

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::{Confirmation, ConfirmationKind, FocusSession, HoldGesture, PauseState};
use crate::error::{Result, SessionError};
use crate::events::{Event, Listener, ResumeReason, SessionEndReason};
use crate::schedule::Schedule;
use crate::sites::BlockedSiteSet;
use crate::storage::{keys, KeyValueStore, SessionConfig, StateStore};

/// What a schedule reconciliation changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// A running focus session was ended because the schedule is active.
    pub session_taken_over: bool,
    /// A pause was cleared because the schedule is disabled.
    pub pause_cleared: bool,
}

/// Read-only view for status displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub focus_active: bool,
    pub focus_remaining_ms: i64,
    pub focus_ends_at: Option<DateTime<Utc>>,
    pub paused: bool,
    pub schedule_enabled: bool,
    pub schedule_active_now: bool,
}

pub struct SessionController<S> {
    state: StateStore<S>,
    config: SessionConfig,
    listeners: Vec<Listener>,
}

impl<S: KeyValueStore> SessionController<S> {
    pub fn new(store: S, config: SessionConfig) -> Self {
        Self {
            state: StateStore::new(store),
            config,
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> &StateStore<S> {
        &self.state
    }

    /// Register a listener called after every transition.
    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// A hold-to-confirm gesture using the configured hold duration.
    pub fn hold_gesture(&self, kind: ConfirmationKind) -> HoldGesture {
        HoldGesture::new(kind, self.config.hold_duration_ms)
    }

    fn emit(&self, event: Event) {
        for listener in &self.listeners {
            listener(&event);
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Schedule enforcement is in effect right now (and not paused).
    pub fn schedule_active_now<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.state.schedule().is_active_now(now) && !self.state.pause_state().is_paused
    }

    /// Pause is only offered while the schedule is enforcing.
    pub fn can_pause<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.schedule_active_now(now)
    }

    pub fn status<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> SessionStatus {
        let snapshot = self.state.load_snapshot();
        let now_ms = now.timestamp_millis();
        let session = snapshot.focus_session;
        let running = session.is_running(now_ms);

        SessionStatus {
            focus_active: running,
            focus_remaining_ms: session.remaining_ms(now_ms),
            focus_ends_at: session
                .end_timestamp
                .filter(|_| running)
                .and_then(DateTime::<Utc>::from_timestamp_millis),
            paused: snapshot.pause_state.is_paused,
            schedule_enabled: snapshot.block_rules.enabled,
            schedule_active_now: snapshot.block_rules.is_active_now(now)
                && !snapshot.pause_state.is_paused,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start (or restart) the singleton focus session.
    pub fn start_focus<Tz: TimeZone>(&self, minutes: u32, now: &DateTime<Tz>) -> Result<FocusSession> {
        if minutes == 0 {
            return Err(SessionError::InvalidDuration.into());
        }

        let session = FocusSession::starting(now.timestamp_millis(), minutes);
        self.state.save_focus_session(&session)?;
        info!(minutes, "focus session started");

        let at = now.with_timezone(&Utc);
        let ends_at = session
            .end_timestamp
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or(at);
        self.emit(Event::FocusSessionStarted { minutes, ends_at, at });
        Ok(session)
    }

    /// End a running session early. Requires a confirmed
    /// [`ConfirmationKind::EndSession`].
    pub fn end_focus<Tz: TimeZone>(&self, confirmation: Confirmation, now: &DateTime<Tz>) -> Result<()> {
        if !confirmation.approves(ConfirmationKind::EndSession) {
            return Err(SessionError::NotConfirmed(ConfirmationKind::EndSession.to_string()).into());
        }
        if !self.state.focus_session().is_running(now.timestamp_millis()) {
            return Err(SessionError::NoActiveSession.into());
        }

        self.state.save_focus_session(&FocusSession::inactive())?;
        info!("focus session ended by user");
        self.emit(Event::FocusSessionEnded {
            reason: SessionEndReason::UserEnded,
            at: now.with_timezone(&Utc),
        });
        Ok(())
    }

    /// Pause schedule enforcement. Requires a confirmed
    /// [`ConfirmationKind::Pause`] and an active schedule.
    pub fn pause<Tz: TimeZone>(&self, confirmation: Confirmation, now: &DateTime<Tz>) -> Result<PauseState> {
        if !confirmation.approves(ConfirmationKind::Pause) {
            return Err(SessionError::NotConfirmed(ConfirmationKind::Pause.to_string()).into());
        }
        if self.state.pause_state().is_paused {
            return Err(SessionError::AlreadyPaused.into());
        }
        if !self.state.schedule().is_active_now(now) {
            return Err(SessionError::ScheduleNotActive.into());
        }

        let pause = PauseState::paused_at(now.timestamp_millis());
        self.state.save_pause_state(&pause)?;
        info!("schedule blocking paused");
        self.emit(Event::BlockingPaused {
            at: now.with_timezone(&Utc),
        });
        Ok(pause)
    }

    /// Resume schedule enforcement. A no-op when not paused.
    pub fn resume<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<PauseState> {
        if !self.state.pause_state().is_paused {
            return Ok(PauseState::resumed());
        }
        self.clear_pause(ResumeReason::User, now)?;
        Ok(PauseState::resumed())
    }

    /// Persist a new schedule, then reconcile session and pause against it.
    pub fn save_schedule<Tz: TimeZone>(&self, schedule: &Schedule, now: &DateTime<Tz>) -> Result<Reconciliation> {
        schedule.validate()?;
        for range in schedule.midnight_spanning_ranges() {
            warn!(
                start = %range.start,
                end = %range.end,
                "time range wraps past midnight and will never match"
            );
        }

        self.state.save_schedule(schedule)?;
        info!(enabled = schedule.enabled, "schedule updated");
        self.emit(Event::ScheduleUpdated {
            enabled: schedule.enabled,
            at: now.with_timezone(&Utc),
        });
        self.reconcile_schedule(now)
    }

    /// Persist a new blocked-site list.
    pub fn save_blocked_sites<Tz: TimeZone>(&self, sites: &BlockedSiteSet, now: &DateTime<Tz>) -> Result<()> {
        self.state.save_blocked_sites(sites)?;
        info!(count = sites.len(), "blocked sites updated");
        self.emit(Event::SitesUpdated {
            count: sites.len(),
            at: now.with_timezone(&Utc),
        });
        Ok(())
    }

    /// React to writes made by someone else (e.g. the settings page).
    pub fn on_storage_changed<Tz: TimeZone>(&self, changed: &[&str], now: &DateTime<Tz>) -> Result<Reconciliation> {
        if changed.contains(&keys::BLOCKED_SITES) {
            let count = self.state.blocked_sites().len();
            self.emit(Event::SitesUpdated {
                count,
                at: now.with_timezone(&Utc),
            });
        }
        if !changed.contains(&keys::BLOCK_RULES) {
            return Ok(Reconciliation::default());
        }
        let schedule = self.state.schedule();
        self.emit(Event::ScheduleUpdated {
            enabled: schedule.enabled,
            at: now.with_timezone(&Utc),
        });
        self.reconcile_schedule(now)
    }

    /// Apply the schedule's effect on the other two dimensions.
    ///
    /// - schedule active now (and not paused) while a focus session runs:
    ///   the session ends without confirmation so the schedule takes
    ///   exclusive effect;
    /// - schedule disabled while paused: the pause is cleared (when
    ///   `resume_when_schedule_disabled` is set).
    pub fn reconcile_schedule<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<Reconciliation> {
        let snapshot = self.state.load_snapshot();
        let mut outcome = Reconciliation::default();

        if snapshot.focus_session.is_running(now.timestamp_millis())
            && snapshot.block_rules.is_active_now(now)
            && !snapshot.pause_state.is_paused
        {
            self.state.save_focus_session(&FocusSession::inactive())?;
            info!("schedule is active, focus session taken over");
            outcome.session_taken_over = true;
            self.emit(Event::FocusSessionEnded {
                reason: SessionEndReason::ScheduleTakeover,
                at: now.with_timezone(&Utc),
            });
        }

        if self.config.resume_when_schedule_disabled
            && !snapshot.block_rules.enabled
            && snapshot.pause_state.is_paused
        {
            self.clear_pause(ResumeReason::ScheduleDisabled, now)?;
            outcome.pause_cleared = true;
        }

        Ok(outcome)
    }

    fn clear_pause<Tz: TimeZone>(&self, reason: ResumeReason, now: &DateTime<Tz>) -> Result<()> {
        self.state.save_pause_state(&PauseState::resumed())?;
        info!(?reason, "schedule blocking resumed");
        self.emit(Event::BlockingResumed {
            reason,
            at: now.with_timezone(&Utc),
        });
        Ok(())
    }
}
