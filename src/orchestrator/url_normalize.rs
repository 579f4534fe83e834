//! URL canonicalisation for result deduplication.
//!
//! Produces the comparison key under which results from different engines
//! are considered the same page. The key is deliberately lossy (https and
//! http compare equal, `www.` is dropped) — it is never shown to users,
//! the merger picks a real display URL separately.

use url::Url;

/// Tracking query parameters stripped during canonicalisation.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "ref",
    "si",
    "feature",
];

/// Canonicalise a URL into its deduplication key.
///
/// Applies the following transformations:
///
/// 1. Lowercase scheme and host (path is preserved as-is), fold https onto
///    http so protocol upgrades do not split a page in two.
/// 2. Drop the fragment and scheme-default ports.
/// 3. Strip known tracking parameters, then sort the remaining query pairs
///    by key (values kept).
/// 4. Collapse duplicate slashes in the path and drop a trailing slash
///    (unless the path is exactly `"/"`).
/// 5. Strip a leading `www.`; fold mobile Wikipedia hosts (`xx.m.wikipedia.org`)
///    onto their canonical hosts.
///
/// If the input cannot be parsed as a valid URL it is returned unchanged,
/// so unparsable URLs still deduplicate against byte-identical copies.
pub fn canonical_url(raw: &str) -> String {
    let Ok(parsed) = Url::parse(raw) else {
        return raw.to_string();
    };

    // Filter tracking parameters, sort what remains. The fragment never
    // makes it into the key.
    let mut params: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| {
            let k = key.to_lowercase();
            !TRACKING_PARAMS.contains(&k.as_str())
        })
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    params.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    let query = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    // Collapse duplicate slashes, strip the trailing one.
    let mut path = parsed.path().to_string();
    while path.contains("//") {
        path = path.replace("//", "/");
    }
    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    if path.is_empty() {
        path.push('/');
    }

    // url::Url already lowercases scheme and host and drops default ports.
    let scheme = match parsed.scheme() {
        "https" => "http",
        s => s,
    };
    let host = parsed.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    let host = match host.strip_suffix(".m.wikipedia.org") {
        Some(base) => format!("{base}.wikipedia.org"),
        None => host.to_string(),
    };

    let mut key = format!("{scheme}://{host}");
    if let Some(port) = parsed.port() {
        key.push(':');
        key.push_str(&port.to_string());
    }
    key.push_str(&path);
    if !query.is_empty() {
        key.push('?');
        key.push_str(&query);
    }
    key
}
