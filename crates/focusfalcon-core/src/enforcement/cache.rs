//! Throttled removal of cached page data for blocked sites.
//!
//! Without it a blocked page can still render from the back/forward or HTTP
//! cache. Removal is attempted per origin first and falls back to clearing
//! everything when the browser rejects origin filtering.

use std::sync::Mutex;

use serde::Serialize;
use tracing::{info, warn};

use super::{BrowserHost, CacheScope};
use crate::session::EpochMillis;
use crate::storage::CacheConfig;

/// What one invalidation request did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum CacheOutcome {
    /// Turned off in configuration.
    Disabled,
    /// The host cannot remove cached data.
    Unsupported,
    /// A previous clear happened less than the cooldown ago.
    Throttled,
    NothingToClear,
    ClearedOrigins { count: usize },
    /// Per-origin removal failed and the whole cache was dropped instead.
    ClearedAll,
    Failed { message: String },
}

#[derive(Debug, Default)]
struct InvalidatorState {
    last_clear_ms: Option<EpochMillis>,
    capability: Option<bool>,
}

/// Cooldown-guarded cache invalidation. One per host.
#[derive(Debug)]
pub struct CacheInvalidator {
    config: CacheConfig,
    state: Mutex<InvalidatorState>,
}

impl CacheInvalidator {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            state: Mutex::new(InvalidatorState::default()),
        }
    }

    /// Drop cached data for `sites`, at most once per cooldown.
    ///
    /// The cooldown starts when an attempt is made, whether or not it
    /// succeeds.
    pub fn invalidate<H, S>(&self, host: &H, sites: &[S], now_ms: EpochMillis) -> CacheOutcome
    where
        H: BrowserHost + ?Sized,
        S: AsRef<str>,
    {
        if !self.config.enabled {
            return CacheOutcome::Disabled;
        }

        let Ok(mut state) = self.state.lock() else {
            warn!("cache invalidator lock poisoned, skipping");
            return CacheOutcome::Failed {
                message: "lock poisoned".into(),
            };
        };

        let supported = *state.capability.get_or_insert_with(|| {
            let supported = host.supports_cache_clear();
            if !supported {
                warn!("browser offers no cache removal, cached pages may still render");
            }
            supported
        });
        if !supported {
            return CacheOutcome::Unsupported;
        }

        let cooldown = i64::try_from(self.config.cooldown_ms).unwrap_or(i64::MAX);
        if let Some(last) = state.last_clear_ms {
            if now_ms.saturating_sub(last) < cooldown {
                info!("skipping cache clear, cooldown active");
                return CacheOutcome::Throttled;
            }
        }

        let origins: Vec<String> = sites.iter().flat_map(|s| expand_origins(s.as_ref())).fold(
            Vec::new(),
            |mut acc, origin| {
                if !acc.contains(&origin) {
                    acc.push(origin);
                }
                acc
            },
        );
        if origins.is_empty() {
            return CacheOutcome::NothingToClear;
        }

        state.last_clear_ms = Some(now_ms);
        drop(state);

        let count = origins.len();
        match host.clear_cache(&CacheScope::Origins(origins)) {
            Ok(()) => {
                info!(count, "cache cleared for blocked origins");
                CacheOutcome::ClearedOrigins { count }
            }
            Err(e) => {
                warn!(error = %e, "per-origin cache clear failed, clearing globally");
                match host.clear_cache(&CacheScope::All) {
                    Ok(()) => {
                        info!("cache cleared globally");
                        CacheOutcome::ClearedAll
                    }
                    Err(e) => {
                        warn!(error = %e, "global cache clear failed");
                        CacheOutcome::Failed {
                            message: e.to_string(),
                        }
                    }
                }
            }
        }
    }
}

/// The four origins a site may be served from, scheme and `www.` stripped
/// from the input first.
pub fn expand_origins(site: &str) -> Vec<String> {
    let clean = site
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let clean = clean.strip_prefix("www.").unwrap_or(clean);
    if clean.is_empty() {
        return Vec::new();
    }
    vec![
        format!("https://{clean}"),
        format!("https://www.{clean}"),
        format!("http://{clean}"),
        format!("http://www.{clean}"),
    ]
}
