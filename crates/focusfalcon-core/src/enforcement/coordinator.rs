use chrono::{DateTime, TimeZone};
use serde::Serialize;
use tracing::{error, info, warn};

use super::{block_page_url, generate_rules, BrowserHost, CacheInvalidator, CacheOutcome, Navigation};
use crate::engine::{DecisionEngine, Verdict};
use crate::error::HostError;
use crate::events::Event;
use crate::session::EpochMillis;
use crate::sites::{hostname_of, matches};
use crate::storage::{BlockingConfig, Config, KeyValueStore};

/// What happened to one navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum NavigationOutcome {
    Allowed { verdict: Verdict },
    Redirected { verdict: Verdict, target: String },
    /// Blocked site loaded in a sub-frame; left alone.
    IgnoredSubframe { verdict: Verdict },
}

impl NavigationOutcome {
    pub fn verdict(&self) -> &Verdict {
        match self {
            NavigationOutcome::Allowed { verdict }
            | NavigationOutcome::Redirected { verdict, .. }
            | NavigationOutcome::IgnoredSubframe { verdict } => verdict,
        }
    }
}

/// Result of installing or removing network rules.
///
/// Failures are logged and recorded here; nothing is rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockingReport {
    pub sites: Vec<String>,
    pub rules_changed: usize,
    pub rule_error: Option<String>,
    pub tabs_reloaded: usize,
    pub cache: CacheOutcome,
}

/// Applies verdicts and blocking changes through a [`BrowserHost`].
pub struct EnforcementCoordinator<S, H> {
    engine: DecisionEngine<S>,
    host: H,
    cache: CacheInvalidator,
    blocking: BlockingConfig,
}

impl<S: KeyValueStore, H: BrowserHost> EnforcementCoordinator<S, H> {
    pub fn new(store: S, host: H, config: &Config) -> Self {
        Self {
            engine: DecisionEngine::new(store),
            host,
            cache: CacheInvalidator::new(config.cache.clone()),
            blocking: config.blocking.clone(),
        }
    }

    pub fn engine(&self) -> &DecisionEngine<S> {
        &self.engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Decide a navigation and redirect the tab when blocked.
    ///
    /// Only main-frame loads are redirected.
    pub fn on_navigation<Tz: TimeZone>(
        &self,
        nav: &Navigation,
        now: &DateTime<Tz>,
    ) -> Result<NavigationOutcome, HostError> {
        let verdict = self.engine.evaluate(&nav.url, now);

        if !verdict.block {
            return Ok(NavigationOutcome::Allowed { verdict });
        }
        if !nav.is_main_frame() {
            return Ok(NavigationOutcome::IgnoredSubframe { verdict });
        }

        let host = verdict.hostname.as_deref().unwrap_or_default();
        let target = block_page_url(&self.blocking.block_page_url, host);
        self.host.redirect(nav.tab_id, &target)?;
        info!(tab = nav.tab_id, site = %host, "navigation blocked");
        Ok(NavigationOutcome::Redirected { verdict, target })
    }

    /// Reload every open tab whose hostname matches one of `sites`.
    pub fn refresh_affected_tabs<T: AsRef<str>>(&self, sites: &[T]) -> Result<usize, HostError> {
        let mut reloaded = 0;
        for tab in self.host.query_tabs()? {
            let Some(host) = tab.url.as_deref().and_then(hostname_of) else {
                continue;
            };
            if !matches(&host, sites) {
                continue;
            }
            match self.host.reload_tab(tab.id) {
                Ok(()) => reloaded += 1,
                Err(e) => warn!(tab = tab.id, error = %e, "tab reload failed"),
            }
        }
        Ok(reloaded)
    }

    /// Install one network rule per site, then refresh tabs and cache.
    pub fn enable_blocking<T: AsRef<str>>(&self, sites: &[T], now_ms: EpochMillis) -> BlockingReport {
        let rules = generate_rules(sites, self.blocking.rule_id_start);
        let mut remove: Vec<u32> = rules.iter().map(|r| r.id).collect();
        match self.host.dynamic_rules() {
            Ok(existing) => {
                for rule in existing {
                    if !remove.contains(&rule.id) {
                        remove.push(rule.id);
                    }
                }
            }
            Err(e) => warn!(error = %e, "could not list existing rules"),
        }

        let rule_error = match self.host.update_dynamic_rules(&remove, &rules) {
            Ok(()) => {
                info!(count = rules.len(), "blocking rules installed");
                None
            }
            Err(e) => {
                error!(error = %e, "installing blocking rules failed");
                Some(e.to_string())
            }
        };

        let sites: Vec<String> = sites.iter().map(|s| s.as_ref().to_string()).collect();
        self.finish(sites, if rule_error.is_none() { rules.len() } else { 0 }, rule_error, now_ms)
    }

    /// Remove every installed rule, then refresh the sites they covered.
    pub fn disable_blocking(&self, now_ms: EpochMillis) -> BlockingReport {
        let existing = match self.host.dynamic_rules() {
            Ok(rules) => rules,
            Err(e) => {
                error!(error = %e, "listing blocking rules failed");
                return BlockingReport {
                    sites: Vec::new(),
                    rules_changed: 0,
                    rule_error: Some(e.to_string()),
                    tabs_reloaded: 0,
                    cache: CacheOutcome::NothingToClear,
                };
            }
        };

        let ids: Vec<u32> = existing.iter().map(|r| r.id).collect();
        let sites: Vec<String> = existing.iter().map(|r| r.site().to_string()).collect();

        let rule_error = match self.host.update_dynamic_rules(&ids, &[]) {
            Ok(()) => {
                info!(count = ids.len(), "blocking rules removed");
                None
            }
            Err(e) => {
                error!(error = %e, "removing blocking rules failed");
                Some(e.to_string())
            }
        };

        self.finish(sites, if rule_error.is_none() { ids.len() } else { 0 }, rule_error, now_ms)
    }

    /// Re-apply current state to open tabs after a controller transition.
    pub fn handle_event(&self, event: &Event) {
        let sites = self.engine.state().blocked_sites();
        match self.refresh_affected_tabs(sites.as_slice()) {
            Ok(count) => info!(count, at = %event.at(), "tabs refreshed after state change"),
            Err(e) => warn!(error = %e, "tab refresh after state change failed"),
        }
    }

    fn finish(
        &self,
        sites: Vec<String>,
        rules_changed: usize,
        rule_error: Option<String>,
        now_ms: EpochMillis,
    ) -> BlockingReport {
        let tabs_reloaded = self.refresh_affected_tabs(&sites).unwrap_or_else(|e| {
            warn!(error = %e, "tab refresh failed");
            0
        });
        let cache = self.cache.invalidate(&self.host, &sites, now_ms);
        BlockingReport {
            sites,
            rules_changed,
            rule_error,
            tabs_reloaded,
            cache,
        }
    }
}
