use url::form_urlencoded;

/// Redirect target for a blocked `hostname`: `<base>?site=<hostname>`.
pub fn block_page_url(base: &str, hostname: &str) -> String {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("site", hostname)
        .finish();
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}{query}")
}

/// The `site` parameter of a block page URL, decoded.
///
/// Accepts absolute URLs and extension-relative paths.
pub fn block_page_site(url: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == "site")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}
