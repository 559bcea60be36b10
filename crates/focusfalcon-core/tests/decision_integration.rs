//! Integration tests for blocking decisions over a real SQLite store.
//!
//! Covers precedence between focus session, pause and schedule, lazy expiry,
//! and the site-manager normalization the settings page relies on.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use focusfalcon_core::storage::keys;
use focusfalcon_core::{
    BlockedSiteSet, Database, DecisionEngine, FocusSession, KeyValueStore, PauseState, Rule,
    Schedule, SiteError, StateStore, TimeRange,
};
use proptest::prelude::*;
use serde_json::json;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 11, 30, 0).unwrap()
}

fn all_day_today(now: &DateTime<Utc>) -> Schedule {
    let today = now.weekday().num_days_from_sunday() as u8;
    Schedule::new(true, [today], vec![TimeRange::new("00:00", "23:59").unwrap()]).unwrap()
}

fn seed(db: &Database, sites: &[&str]) {
    StateStore::new(db)
        .save_blocked_sites(&BlockedSiteSet::from_inputs(sites).unwrap())
        .unwrap();
}

#[test]
fn test_no_schedule_no_session_never_blocks() {
    let db = Database::open_memory().unwrap();
    seed(&db, &["youtube.com"]);
    let engine = DecisionEngine::new(&db);

    assert!(!engine.should_block("https://youtube.com/watch", &now()));
}

#[test]
fn test_focus_session_blocks_listed_sites() {
    let db = Database::open_memory().unwrap();
    seed(&db, &["reddit.com"]);
    let state = StateStore::new(&db);
    state
        .save_focus_session(&FocusSession {
            is_active: true,
            end_timestamp: Some(now().timestamp_millis() + 60_000),
        })
        .unwrap();

    let engine = DecisionEngine::new(&db);
    assert!(engine.should_block("https://reddit.com/r/x", &now()));
    assert!(!engine.should_block("https://espn.com", &now()));
}

#[test]
fn test_schedule_blocks_until_paused() {
    let db = Database::open_memory().unwrap();
    seed(&db, &["x.com"]);
    let state = StateStore::new(&db);
    state.save_schedule(&all_day_today(&now())).unwrap();

    let engine = DecisionEngine::new(&db);
    assert!(engine.should_block("https://x.com", &now()));

    state
        .save_pause_state(&PauseState::paused_at(now().timestamp_millis()))
        .unwrap();
    assert!(!engine.should_block("https://x.com", &now()));
}

#[test]
fn test_expired_session_is_cleared_in_storage() {
    let db = Database::open_memory().unwrap();
    seed(&db, &["reddit.com"]);
    let state = StateStore::new(&db);
    state
        .save_focus_session(&FocusSession {
            is_active: true,
            end_timestamp: Some(now().timestamp_millis()),
        })
        .unwrap();

    let engine = DecisionEngine::new(&db);
    let verdict = engine.evaluate("https://reddit.com", &now());
    assert!(!verdict.block);
    assert_eq!(verdict.rule, Rule::FocusExpired);

    let stored = db.get(&[keys::FOCUS_SESSION]).unwrap();
    assert_eq!(stored[keys::FOCUS_SESSION]["isActive"], json!(false));

    // Second call sees the persisted inactive session.
    assert_eq!(engine.evaluate("https://reddit.com", &now()).rule, Rule::ScheduleDisabled);
}

#[test]
fn test_settings_page_writes_are_seen_on_next_decision() {
    let db = Database::open_memory().unwrap();
    let engine = DecisionEngine::new(&db);
    assert!(!engine.should_block("https://news.ycombinator.com", &now()));

    // Raw writes in the extension's own JSON shape.
    db.set(keys::BLOCKED_SITES, json!(["ycombinator.com"])).unwrap();
    db.set(
        keys::FOCUS_SESSION,
        json!({"isActive": true, "endTimestamp": now().timestamp_millis() + 1_000}),
    )
    .unwrap();

    assert!(engine.should_block("https://news.ycombinator.com", &now()));
}

#[test]
fn test_corrupt_state_fails_open() {
    let db = Database::open_memory().unwrap();
    db.set(keys::BLOCK_RULES, json!({"enabled": "yes please"})).unwrap();
    db.set(keys::FOCUS_SESSION, json!(42)).unwrap();

    let engine = DecisionEngine::new(&db);
    assert!(!engine.should_block("https://youtube.com", &now()));
}

#[test]
fn test_unreadable_row_only_resets_its_own_key() {
    let db = Database::open_memory().unwrap();
    db.set(keys::BLOCKED_SITES, json!(["youtube.com"])).unwrap();
    let ends = now().timestamp_millis() + 60_000;
    db.set(keys::FOCUS_SESSION, json!({"isActive": true, "endTimestamp": ends}))
        .unwrap();
    db.kv_set(keys::BLOCK_RULES, "{not json").unwrap();

    let engine = DecisionEngine::new(&db);
    assert!(engine.should_block("https://youtube.com", &now()));
}

#[test]
fn test_site_manager_normalizes_and_rejects_duplicates() {
    let mut sites = BlockedSiteSet::empty();
    assert_eq!(sites.add("Reddit.com/r/x").unwrap(), "reddit.com");
    assert_eq!(
        sites.add("https://www.reddit.com"),
        Err(SiteError::Duplicate("reddit.com".into()))
    );
    assert_eq!(sites.as_slice(), ["reddit.com"]);
}

fn arb_snapshot_flags() -> impl Strategy<Value = (bool, bool, bool)> {
    (any::<bool>(), any::<bool>(), any::<bool>())
}

proptest! {
    #[test]
    fn prop_running_session_ignores_pause_and_schedule(
        (paused, enabled, listed) in arb_snapshot_flags(),
        minutes_left in 1i64..600,
        offset_min in 0i64..(7 * 24 * 60),
    ) {
        let at = now() + Duration::minutes(offset_min);
        let db = Database::open_memory().unwrap();
        seed(&db, if listed { &["x.com"] } else { &["y.com"] });
        let state = StateStore::new(&db);
        state.save_focus_session(&FocusSession {
            is_active: true,
            end_timestamp: Some(at.timestamp_millis() + minutes_left * 60_000),
        }).unwrap();

        let engine = DecisionEngine::new(&db);
        let baseline = engine.evaluate("https://x.com", &at);

        let mut schedule = all_day_today(&at);
        schedule.enabled = enabled;
        state.save_schedule(&schedule).unwrap();
        if paused {
            state.save_pause_state(&PauseState::paused_at(0)).unwrap();
        }

        let flipped = engine.evaluate("https://x.com", &at);
        prop_assert_eq!(baseline.block, listed);
        prop_assert_eq!(flipped, baseline);
    }

    #[test]
    fn prop_disabled_schedule_never_active(
        offset_min in 0i64..(7 * 24 * 60),
        days in proptest::collection::btree_set(0u8..=6, 0..=7),
    ) {
        let at = now() + Duration::minutes(offset_min);
        let schedule = Schedule::new(
            false,
            days,
            vec![TimeRange::new("00:00", "23:59").unwrap()],
        ).unwrap();
        prop_assert!(!schedule.is_active_now(&at));
    }

    #[test]
    fn prop_decisions_are_idempotent(
        (paused, enabled, in_session) in arb_snapshot_flags(),
        offset_min in 0i64..(7 * 24 * 60),
    ) {
        let at = now() + Duration::minutes(offset_min);
        let db = Database::open_memory().unwrap();
        seed(&db, &["x.com"]);
        let state = StateStore::new(&db);
        let mut schedule = all_day_today(&now());
        schedule.enabled = enabled;
        state.save_schedule(&schedule).unwrap();
        state.save_pause_state(&PauseState { is_paused: paused, timestamp: None }).unwrap();
        if in_session {
            state.save_focus_session(&FocusSession::starting(at.timestamp_millis(), 5)).unwrap();
        }

        let engine = DecisionEngine::new(&db);
        let first = engine.evaluate("https://x.com/path", &at);
        let second = engine.evaluate("https://x.com/path", &at);
        prop_assert_eq!(first, second);
    }
}
