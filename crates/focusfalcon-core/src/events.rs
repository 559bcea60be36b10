use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a focus session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEndReason {
    /// The user confirmed an early end.
    UserEnded,
    /// The schedule became active and took over.
    ScheduleTakeover,
}

/// Why schedule enforcement resumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeReason {
    User,
    /// The schedule was disabled while paused.
    ScheduleDisabled,
}

/// Every state change made by the session controller produces an Event.
/// Listeners (the enforcement coordinator among them) subscribe to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    FocusSessionStarted {
        minutes: u32,
        ends_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    FocusSessionEnded {
        reason: SessionEndReason,
        at: DateTime<Utc>,
    },
    BlockingPaused {
        at: DateTime<Utc>,
    },
    BlockingResumed {
        reason: ResumeReason,
        at: DateTime<Utc>,
    },
    ScheduleUpdated {
        enabled: bool,
        at: DateTime<Utc>,
    },
    SitesUpdated {
        count: usize,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::FocusSessionStarted { at, .. }
            | Event::FocusSessionEnded { at, .. }
            | Event::BlockingPaused { at }
            | Event::BlockingResumed { at, .. }
            | Event::ScheduleUpdated { at, .. }
            | Event::SitesUpdated { at, .. } => *at,
        }
    }
}

/// Synchronous observer invoked after each controller write.
pub type Listener = Box<dyn Fn(&Event)>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_with_type_tag() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        let json = serde_json::to_value(Event::FocusSessionEnded {
            reason: SessionEndReason::ScheduleTakeover,
            at,
        })
        .unwrap();
        assert_eq!(json["type"], "focus_session_ended");
        assert_eq!(json["reason"], "schedule_takeover");
    }
}
