//! Turning verdicts into browser actions.
//!
//! Everything the browser offers (tabs, network rules, cache removal) sits
//! behind [`BrowserHost`]. The core never talks to a browser directly.

mod block_page;
mod cache;
mod coordinator;
mod rules;

pub use block_page::{block_page_site, block_page_url};
pub use cache::{expand_origins, CacheInvalidator, CacheOutcome};
pub use coordinator::{BlockingReport, EnforcementCoordinator, NavigationOutcome};
pub use rules::{generate_rules, BlockRule, RuleAction, RuleCondition};

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::HostError;

pub type TabId = i64;

/// An open browser tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    /// Absent for privileged pages the extension cannot see.
    pub url: Option<String>,
}

/// A navigation intent reported by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub url: String,
    pub tab_id: TabId,
    /// 0 is the tab's main frame.
    pub frame_id: i64,
}

impl Navigation {
    pub fn main_frame(url: impl Into<String>, tab_id: TabId) -> Self {
        Self {
            url: url.into(),
            tab_id,
            frame_id: 0,
        }
    }

    pub fn is_main_frame(&self) -> bool {
        self.frame_id == 0
    }
}

/// Which cached data to drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheScope {
    Origins(Vec<String>),
    All,
}

/// Browser capabilities used for enforcement.
///
/// Every call can fail independently. Cache removal is optional; hosts that
/// lack it keep the default implementations.
pub trait BrowserHost {
    fn query_tabs(&self) -> Result<Vec<Tab>, HostError>;

    fn reload_tab(&self, tab: TabId) -> Result<(), HostError>;

    /// Send `tab` to `target`.
    fn redirect(&self, tab: TabId, target: &str) -> Result<(), HostError>;

    fn dynamic_rules(&self) -> Result<Vec<BlockRule>, HostError>;

    /// Remove `remove_ids`, then add `add`.
    fn update_dynamic_rules(&self, remove_ids: &[u32], add: &[BlockRule]) -> Result<(), HostError>;

    fn supports_cache_clear(&self) -> bool {
        false
    }

    fn clear_cache(&self, _scope: &CacheScope) -> Result<(), HostError> {
        Err(HostError::Unsupported("cache removal".into()))
    }
}

macro_rules! forward_browser_host {
    ($($ptr:ty),*) => {$(
        impl<H: BrowserHost + ?Sized> BrowserHost for $ptr {
            fn query_tabs(&self) -> Result<Vec<Tab>, HostError> {
                (**self).query_tabs()
            }
            fn reload_tab(&self, tab: TabId) -> Result<(), HostError> {
                (**self).reload_tab(tab)
            }
            fn redirect(&self, tab: TabId, target: &str) -> Result<(), HostError> {
                (**self).redirect(tab, target)
            }
            fn dynamic_rules(&self) -> Result<Vec<BlockRule>, HostError> {
                (**self).dynamic_rules()
            }
            fn update_dynamic_rules(&self, remove_ids: &[u32], add: &[BlockRule]) -> Result<(), HostError> {
                (**self).update_dynamic_rules(remove_ids, add)
            }
            fn supports_cache_clear(&self) -> bool {
                (**self).supports_cache_clear()
            }
            fn clear_cache(&self, scope: &CacheScope) -> Result<(), HostError> {
                (**self).clear_cache(scope)
            }
        }
    )*};
}

forward_browser_host!(&H, Box<H>, Rc<H>, Arc<H>);

/// In-process host that records every call.
///
/// Used by tests and by embedders without a real browser. Individual
/// calls can be made to fail.
#[derive(Debug, Default)]
pub struct RecordingHost {
    inner: RefCell<Recorded>,
}

/// Calls seen by a [`RecordingHost`], plus its simulated browser state.
#[derive(Debug, Default, Clone)]
pub struct Recorded {
    pub tabs: Vec<Tab>,
    pub rules: Vec<BlockRule>,
    pub reloads: Vec<TabId>,
    pub redirects: Vec<(TabId, String)>,
    pub cache_clears: Vec<CacheScope>,
    pub cache_supported: bool,
    pub fail_origin_clear: bool,
    pub fail_rule_update: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tabs<I, U>(tabs: I) -> Self
    where
        I: IntoIterator<Item = (TabId, U)>,
        U: Into<String>,
    {
        let host = Self::new();
        host.inner.borrow_mut().tabs = tabs
            .into_iter()
            .map(|(id, url)| Tab {
                id,
                url: Some(url.into()),
            })
            .collect();
        host
    }

    pub fn with_cache_support(self, supported: bool) -> Self {
        self.inner.borrow_mut().cache_supported = supported;
        self
    }

    pub fn fail_origin_clear(self) -> Self {
        self.inner.borrow_mut().fail_origin_clear = true;
        self
    }

    pub fn fail_rule_update(self) -> Self {
        self.inner.borrow_mut().fail_rule_update = true;
        self
    }

    /// Snapshot of everything recorded so far.
    pub fn recorded(&self) -> Recorded {
        self.inner.borrow().clone()
    }
}

impl BrowserHost for RecordingHost {
    fn query_tabs(&self) -> Result<Vec<Tab>, HostError> {
        Ok(self.inner.borrow().tabs.clone())
    }

    fn reload_tab(&self, tab: TabId) -> Result<(), HostError> {
        self.inner.borrow_mut().reloads.push(tab);
        Ok(())
    }

    fn redirect(&self, tab: TabId, target: &str) -> Result<(), HostError> {
        self.inner
            .borrow_mut()
            .redirects
            .push((tab, target.to_string()));
        Ok(())
    }

    fn dynamic_rules(&self) -> Result<Vec<BlockRule>, HostError> {
        Ok(self.inner.borrow().rules.clone())
    }

    fn update_dynamic_rules(&self, remove_ids: &[u32], add: &[BlockRule]) -> Result<(), HostError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_rule_update {
            return Err(HostError::call_failed("updateDynamicRules", "rejected"));
        }
        inner.rules.retain(|r| !remove_ids.contains(&r.id));
        inner.rules.extend_from_slice(add);
        Ok(())
    }

    fn supports_cache_clear(&self) -> bool {
        self.inner.borrow().cache_supported
    }

    fn clear_cache(&self, scope: &CacheScope) -> Result<(), HostError> {
        let mut inner = self.inner.borrow_mut();
        if !inner.cache_supported {
            return Err(HostError::Unsupported("cache removal".into()));
        }
        if inner.fail_origin_clear && matches!(scope, CacheScope::Origins(_)) {
            return Err(HostError::call_failed("browsingData.remove", "origins not supported"));
        }
        inner.cache_clears.push(scope.clone());
        Ok(())
    }
}
