//! Hostname membership against the blocked-domain set.

use url::Url;

/// True iff `hostname` equals an entry or is a subdomain of one.
///
/// The subdomain test is anchored on a dot, so `evilyoutube.com` does not
/// match `youtube.com` while `m.youtube.com` does. No wildcard handling.
/// Both sides compare case-insensitively; entries written by hand may
/// carry capitals.
pub fn matches<S: AsRef<str>>(hostname: &str, blocked: &[S]) -> bool {
    let host = hostname.trim_end_matches('.').to_ascii_lowercase();
    blocked.iter().any(|entry| {
        let entry = entry.as_ref().trim().to_ascii_lowercase();
        let entry = entry.as_str();
        !entry.is_empty()
            && (host == entry
                || (host.len() > entry.len()
                    && host.ends_with(entry)
                    && host.as_bytes()[host.len() - entry.len() - 1] == b'.'))
    })
}

/// Hostname of an absolute URL, or `None` when it cannot be parsed or has no host.
pub fn hostname_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str().map(|h| h.to_ascii_lowercase())
}
