//! The blocked-domain list and its normalization rules.
//!
//! Entries are bare registrable-style domains: lowercase, no scheme, no
//! `www.` prefix, no port or path. Every mutation goes through
//! [`normalize_domain`] so the stored list stays duplicate-free.

pub mod matcher;

pub use matcher::{hostname_of, matches};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SiteError;

/// Sites blocked on a fresh install.
pub const DEFAULT_BLOCKED_SITES: [&str; 3] = ["youtube.com", "reddit.com", "twitter.com"];

/// Ordered, duplicate-free list of normalized domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockedSiteSet(Vec<String>);

impl Default for BlockedSiteSet {
    fn default() -> Self {
        Self(DEFAULT_BLOCKED_SITES.iter().map(|s| s.to_string()).collect())
    }
}

impl BlockedSiteSet {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Build a set from user input, normalizing each entry.
    ///
    /// Fails on the first invalid or duplicate entry.
    pub fn from_inputs<I, S>(inputs: I) -> Result<Self, SiteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::empty();
        for input in inputs {
            set.add(input.as_ref())?;
        }
        Ok(set)
    }

    /// Parse a newline-separated list as typed into the settings form.
    ///
    /// Blank lines are skipped, duplicates collapse silently, and invalid
    /// lines are returned alongside the accepted set instead of aborting.
    pub fn import_lines(text: &str) -> (Self, Vec<(String, SiteError)>) {
        let mut set = Self::empty();
        let mut rejected = Vec::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match set.add(line) {
                Ok(_) | Err(SiteError::Duplicate(_)) => {}
                Err(e) => rejected.push((line.to_string(), e)),
            }
        }
        (set, rejected)
    }

    /// Normalize and append `input`. Returns the stored form.
    pub fn add(&mut self, input: &str) -> Result<String, SiteError> {
        let domain = normalize_domain(input)?;
        if self.contains(&domain) {
            return Err(SiteError::Duplicate(domain));
        }
        self.0.push(domain.clone());
        Ok(domain)
    }

    /// Remove the entry that `input` normalizes to. Returns the removed form.
    pub fn remove(&mut self, input: &str) -> Result<String, SiteError> {
        let domain = normalize_domain(input).unwrap_or_else(|_| input.trim().to_lowercase());
        let pos = self
            .0
            .iter()
            .position(|d| *d == domain)
            .ok_or_else(|| SiteError::NotFound(domain.clone()))?;
        Ok(self.0.remove(pos))
    }

    /// Replace `old` with `new` in place, keeping the list order.
    pub fn edit(&mut self, old: &str, new: &str) -> Result<String, SiteError> {
        let old_domain = normalize_domain(old).unwrap_or_else(|_| old.trim().to_lowercase());
        let pos = self
            .0
            .iter()
            .position(|d| *d == old_domain)
            .ok_or_else(|| SiteError::NotFound(old_domain.clone()))?;

        let new_domain = normalize_domain(new)?;
        if new_domain != old_domain && self.contains(&new_domain) {
            return Err(SiteError::Duplicate(new_domain));
        }
        self.0[pos] = new_domain.clone();
        Ok(new_domain)
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.0.iter().any(|d| d == domain)
    }

    /// Site-match `hostname` against this set.
    pub fn matches(&self, hostname: &str) -> bool {
        matcher::matches(hostname, &self.0)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for BlockedSiteSet {
    /// Wrap an already-stored list as-is.
    fn from(entries: Vec<String>) -> Self {
        Self(entries)
    }
}

/// Reduce user input such as `https://www.Reddit.com/r/x` to `reddit.com`.
pub fn normalize_domain(input: &str) -> Result<String, SiteError> {
    let invalid = || SiteError::InvalidDomain(input.trim().to_string());

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let url = Url::parse(&candidate).map_err(|_| invalid())?;
    let host = url.host_str().ok_or_else(invalid)?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();

    if is_valid_domain(&host) {
        Ok(host)
    } else {
        Err(invalid())
    }
}

/// Dot-separated labels of `[a-z0-9-]`, at least two labels, and a TLD of
/// two or more letters.
pub fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let Some((tld, rest)) = labels.split_last() else {
        return false;
    };
    if tld.len() < 2 || !tld.bytes().all(|b| b.is_ascii_lowercase()) {
        return false;
    }

    rest.iter().all(|label| {
        !label.is_empty()
            && label
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_scheme_case_www_and_path() {
        assert_eq!(normalize_domain("Reddit.com/r/x").unwrap(), "reddit.com");
        assert_eq!(normalize_domain("https://www.YouTube.com/watch?v=1").unwrap(), "youtube.com");
        assert_eq!(normalize_domain("  news.ycombinator.com  ").unwrap(), "news.ycombinator.com");
        assert_eq!(normalize_domain("x.com:8443/home").unwrap(), "x.com");
    }

    #[test]
    fn rejects_non_domains() {
        for bad in ["", "localhost", "reddit", "reddit.c", "192.168.0.1", "foo bar.com", "a..com"] {
            assert!(normalize_domain(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn add_rejects_duplicate_after_normalizing() {
        let mut set = BlockedSiteSet::from_inputs(["reddit.com"]).unwrap();
        assert_eq!(
            set.add("Reddit.com/r/x"),
            Err(SiteError::Duplicate("reddit.com".into()))
        );
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_accepts_unnormalized_input() {
        let mut set = BlockedSiteSet::default();
        assert_eq!(set.remove("https://www.reddit.com").unwrap(), "reddit.com");
        assert_eq!(set.as_slice(), ["youtube.com", "twitter.com"]);
        assert!(matches!(set.remove("reddit.com"), Err(SiteError::NotFound(_))));
    }

    #[test]
    fn edit_keeps_position_and_checks_duplicates() {
        let mut set = BlockedSiteSet::default();
        assert_eq!(set.edit("twitter.com", "X.com").unwrap(), "x.com");
        assert_eq!(set.as_slice(), ["youtube.com", "reddit.com", "x.com"]);
        assert_eq!(
            set.edit("x.com", "youtube.com"),
            Err(SiteError::Duplicate("youtube.com".into()))
        );
        assert!(set.edit("x.com", "not a domain").is_err());
        assert_eq!(set.as_slice(), ["youtube.com", "reddit.com", "x.com"]);
    }

    #[test]
    fn import_lines_skips_blanks_and_reports_invalid() {
        let (set, rejected) =
            BlockedSiteSet::import_lines("youtube.com\n\n  reddit.com \nreddit.com\nnope\n");
        assert_eq!(set.as_slice(), ["youtube.com", "reddit.com"]);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].0, "nope");
    }

    #[test]
    fn serializes_as_plain_array() {
        let json = serde_json::to_value(BlockedSiteSet::default()).unwrap();
        assert_eq!(json, serde_json::json!(["youtube.com", "reddit.com", "twitter.com"]));
    }
}
