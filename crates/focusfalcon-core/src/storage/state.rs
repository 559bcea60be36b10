//! Typed access to the persisted blocker state.
//!
//! Reads never fail: a store error or an undecodable value is logged and the
//! key's default is used instead, which always resolves toward "do not
//! block". Writes return their error so the caller can decide to log it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::KeyValueStore;
use crate::avatar::Avatar;
use crate::error::StorageError;
use crate::schedule::Schedule;
use crate::session::{FocusSession, FocusStreak, PauseState};
use crate::sites::BlockedSiteSet;

/// Storage key names shared with the extension's storage area.
pub mod keys {
    pub const BLOCKED_SITES: &str = "blockedSites";
    pub const BLOCK_RULES: &str = "blockRules";
    pub const FOCUS_SESSION: &str = "focusSession";
    pub const PAUSE_STATE: &str = "pauseState";
    pub const AVATAR: &str = "avatar";
    pub const FOCUS_STREAK: &str = "focusStreak";

    pub const ALL: [&str; 6] = [
        BLOCKED_SITES,
        BLOCK_RULES,
        FOCUS_SESSION,
        PAUSE_STATE,
        AVATAR,
        FOCUS_STREAK,
    ];
}

/// Everything the decision engine reads, loaded in one round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub blocked_sites: BlockedSiteSet,
    pub block_rules: Schedule,
    pub pause_state: PauseState,
    pub focus_session: FocusSession,
}

/// Typed facade over a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct StateStore<S> {
    store: S,
}

impl<S: KeyValueStore> StateStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Load the four keys the decision path needs.
    pub fn load_snapshot(&self) -> StateSnapshot {
        let map = self.read(&[
            keys::BLOCKED_SITES,
            keys::BLOCK_RULES,
            keys::PAUSE_STATE,
            keys::FOCUS_SESSION,
        ]);
        StateSnapshot {
            blocked_sites: decode_or_default(&map, keys::BLOCKED_SITES),
            block_rules: decode_or_default(&map, keys::BLOCK_RULES),
            pause_state: decode_or_default(&map, keys::PAUSE_STATE),
            focus_session: decode_or_default(&map, keys::FOCUS_SESSION),
        }
    }

    pub fn blocked_sites(&self) -> BlockedSiteSet {
        self.load(keys::BLOCKED_SITES)
    }

    pub fn schedule(&self) -> Schedule {
        self.load(keys::BLOCK_RULES)
    }

    pub fn focus_session(&self) -> FocusSession {
        self.load(keys::FOCUS_SESSION)
    }

    pub fn pause_state(&self) -> PauseState {
        self.load(keys::PAUSE_STATE)
    }

    pub fn avatar(&self) -> Avatar {
        self.load(keys::AVATAR)
    }

    pub fn focus_streak(&self) -> FocusStreak {
        self.load(keys::FOCUS_STREAK)
    }

    pub fn save_blocked_sites(&self, sites: &BlockedSiteSet) -> Result<(), StorageError> {
        self.save(keys::BLOCKED_SITES, sites)
    }

    pub fn save_schedule(&self, schedule: &Schedule) -> Result<(), StorageError> {
        self.save(keys::BLOCK_RULES, schedule)
    }

    pub fn save_focus_session(&self, session: &FocusSession) -> Result<(), StorageError> {
        self.save(keys::FOCUS_SESSION, session)
    }

    pub fn save_pause_state(&self, pause: &PauseState) -> Result<(), StorageError> {
        self.save(keys::PAUSE_STATE, pause)
    }

    pub fn save_avatar(&self, avatar: Avatar) -> Result<(), StorageError> {
        self.save(keys::AVATAR, &avatar)
    }

    pub fn save_focus_streak(&self, streak: &FocusStreak) -> Result<(), StorageError> {
        self.save(keys::FOCUS_STREAK, streak)
    }

    /// First-run initialization: write the default for every absent key.
    ///
    /// Returns the keys that were written. Existing values are left alone.
    pub fn install_defaults(&self) -> Result<Vec<&'static str>, StorageError> {
        let present = self.store.get(&keys::ALL)?;
        let mut written = Vec::new();
        for key in keys::ALL {
            if present.contains_key(key) {
                continue;
            }
            let value = match key {
                keys::BLOCKED_SITES => to_value(&BlockedSiteSet::default())?,
                keys::BLOCK_RULES => to_value(&Schedule::default())?,
                keys::FOCUS_SESSION => to_value(&FocusSession::default())?,
                keys::PAUSE_STATE => to_value(&PauseState::default())?,
                keys::AVATAR => to_value(&Avatar::default())?,
                _ => to_value(&FocusStreak::default())?,
            };
            self.store.set(key, value)?;
            written.push(key);
        }
        Ok(written)
    }

    fn read(&self, keys: &[&str]) -> Map<String, Value> {
        match self.store.get(keys) {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, ?keys, "storage read failed, using defaults");
                Map::new()
            }
        }
    }

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        decode_or_default(&self.read(&[key]), key)
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        self.store.set(key, to_value(value)?)
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, StorageError> {
    serde_json::to_value(value).map_err(|e| StorageError::QueryFailed(e.to_string()))
}

fn decode_or_default<T: DeserializeOwned + Default>(map: &Map<String, Value>, key: &str) -> T {
    match map.get(key) {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            warn!(key, error = %e, "stored value has unexpected shape, using default");
            T::default()
        }),
    }
}
