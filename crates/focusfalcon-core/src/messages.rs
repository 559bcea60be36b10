//! Control messages sent by the popup and settings pages.
//!
//! Messages arrive as JSON objects with a `type` field and are answered with
//! `{"ok": true}` or `{"ok": false, "error": "..."}`.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::enforcement::{BrowserHost, EnforcementCoordinator};
use crate::session::{Confirmation, ConfirmationKind, SessionController};
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlMessage {
    /// Sent after the popup's confirmation dialog was accepted.
    PauseBlocking,
    ResumeBlocking,
    EnableBlocking {
        #[serde(default)]
        sites: Vec<String>,
    },
    DisableBlocking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageResponse {
    pub fn ok() -> Self {
        Self { ok: true, error: None }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }
}

/// Routes control messages to the controller and the coordinator.
pub struct MessageRouter<'a, S, C, H> {
    controller: &'a SessionController<S>,
    coordinator: &'a EnforcementCoordinator<C, H>,
}

impl<'a, S, C, H> MessageRouter<'a, S, C, H>
where
    S: KeyValueStore,
    C: KeyValueStore,
    H: BrowserHost,
{
    pub fn new(controller: &'a SessionController<S>, coordinator: &'a EnforcementCoordinator<C, H>) -> Self {
        Self {
            controller,
            coordinator,
        }
    }

    pub fn dispatch<Tz: TimeZone>(&self, msg: &ControlMessage, now: &DateTime<Tz>) -> MessageResponse {
        debug!(?msg, "control message");
        let result = match msg {
            ControlMessage::PauseBlocking => self
                .controller
                .pause(Confirmation::confirmed(ConfirmationKind::Pause), now)
                .map(|_| ())
                .map_err(|e| e.to_string()),
            ControlMessage::ResumeBlocking => self
                .controller
                .resume(now)
                .map(|_| ())
                .map_err(|e| e.to_string()),
            ControlMessage::EnableBlocking { sites } => {
                let report = self
                    .coordinator
                    .enable_blocking(sites, now.timestamp_millis());
                report.rule_error.map_or(Ok(()), Err)
            }
            ControlMessage::DisableBlocking => {
                let report = self.coordinator.disable_blocking(now.timestamp_millis());
                report.rule_error.map_or(Ok(()), Err)
            }
        };

        match result {
            Ok(()) => MessageResponse::ok(),
            Err(e) => {
                warn!(error = %e, "control message failed");
                MessageResponse::err(e)
            }
        }
    }

    /// Parse and dispatch a raw JSON message.
    pub fn handle_json<Tz: TimeZone>(&self, raw: &str, now: &DateTime<Tz>) -> MessageResponse {
        match serde_json::from_str::<ControlMessage>(raw) {
            Ok(msg) => self.dispatch(&msg, now),
            Err(e) => {
                warn!(error = %e, "unrecognized control message");
                MessageResponse::err(format!("unrecognized message: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enforcement::RecordingHost;
    use crate::schedule::{Schedule, TimeRange};
    use crate::storage::{Config, MemoryStore, SessionConfig};
    use chrono::Utc;
    use serde_json::json;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn parses_wire_shapes() {
        let msg: ControlMessage =
            serde_json::from_value(json!({"type": "ENABLE_BLOCKING", "sites": ["x.com"]})).unwrap();
        assert_eq!(
            msg,
            ControlMessage::EnableBlocking {
                sites: vec!["x.com".into()]
            }
        );
        let msg: ControlMessage = serde_json::from_value(json!({"type": "PAUSE_BLOCKING"})).unwrap();
        assert_eq!(msg, ControlMessage::PauseBlocking);
    }

    #[test]
    fn responses_omit_absent_error() {
        assert_eq!(serde_json::to_value(MessageResponse::ok()).unwrap(), json!({"ok": true}));
        assert_eq!(
            serde_json::to_value(MessageResponse::err("nope")).unwrap(),
            json!({"ok": false, "error": "nope"})
        );
    }

    #[test]
    fn routes_pause_and_resume() {
        let store = MemoryStore::new();
        let controller = SessionController::new(&store, SessionConfig::default());
        let coordinator = EnforcementCoordinator::new(&store, RecordingHost::new(), &Config::default());
        let router = MessageRouter::new(&controller, &coordinator);

        let refused = router.handle_json(r#"{"type":"PAUSE_BLOCKING"}"#, &noon());
        assert!(!refused.ok);

        let on = Schedule::new(true, 0..=6, vec![TimeRange::new("00:00", "23:59").unwrap()]).unwrap();
        controller.state().save_schedule(&on).unwrap();
        assert!(router.handle_json(r#"{"type":"PAUSE_BLOCKING"}"#, &noon()).ok);
        assert!(controller.state().pause_state().is_paused);

        assert!(router.handle_json(r#"{"type":"RESUME_BLOCKING"}"#, &noon()).ok);
        assert!(!controller.state().pause_state().is_paused);
    }

    #[test]
    fn routes_rule_messages_to_host() {
        let store = MemoryStore::new();
        let controller = SessionController::new(&store, SessionConfig::default());
        let coordinator = EnforcementCoordinator::new(&store, RecordingHost::new(), &Config::default());
        let router = MessageRouter::new(&controller, &coordinator);

        let resp = router.dispatch(
            &ControlMessage::EnableBlocking {
                sites: vec!["x.com".into()],
            },
            &noon(),
        );
        assert_eq!(resp, MessageResponse::ok());
        assert_eq!(coordinator.host().recorded().rules.len(), 1);

        router.dispatch(&ControlMessage::DisableBlocking, &noon());
        assert!(coordinator.host().recorded().rules.is_empty());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let store = MemoryStore::new();
        let controller = SessionController::new(&store, SessionConfig::default());
        let coordinator = EnforcementCoordinator::new(&store, RecordingHost::new(), &Config::default());
        let router = MessageRouter::new(&controller, &coordinator);

        let resp = router.handle_json(r#"{"type":"SELF_DESTRUCT"}"#, &noon());
        assert!(!resp.ok);
        assert!(resp.error.unwrap().starts_with("unrecognized message"));
    }
}
