//! Scoring policy and pagination for merged results.
//!
//! The aggregated rating is `sum(score_i * engine_weight_i)` over the
//! contributing engines, multiplied by a cross-engine agreement bonus and
//! two content multipliers (domain quality, language match). The bonus is
//! strictly increasing in the contributor count, so a result gaining one
//! more agreeing engine never loses rating; the content multipliers do not
//! depend on the contributor count.

use crate::lang;
use crate::types::MergedResult;

/// Domains with consistently low-value or scraped content.
const SPAM_DOMAINS: &[&str] = &["w3schools.com", "geeksforgeeks.org", "tutorialspoint.com"];

/// Cross-engine agreement bonus: 1.0 for a single engine, +0.2 for each
/// additional contributor. Strictly increasing.
pub(crate) fn engine_count_bonus(count: usize) -> f64 {
    1.0 + 0.2 * count.saturating_sub(1) as f64
}

/// Domain-quality multiplier for a result host.
///
/// Community and reference sites rank up, content farms down. Tunable
/// policy — keep every value positive and engine-count-independent.
pub(crate) fn domain_boost(host: &str) -> f64 {
    let host = host.strip_prefix("www.").unwrap_or(host);
    if host == "reddit.com" {
        return 2.0;
    }
    if matches!(host, "stackoverflow.com" | "github.com" | "docs.python.org") {
        return 1.5;
    }
    if host == "wikipedia.org" || host.ends_with(".wikipedia.org") {
        return 1.25;
    }
    if host.ends_with(".fandom.com") || SPAM_DOMAINS.contains(&host) {
        return 0.5;
    }
    1.0
}

/// Text shorter than this is too little signal to classify — never penalise.
const MIN_DETECT_LEN: usize = 64;

/// Language-match multiplier: halves the rating when the pooled result text
/// is reliably detected as a different language than the query hint.
/// Short or undetectable text is never penalised.
pub(crate) fn language_multiplier(text: &str, hint: &str) -> f64 {
    if text.len() < MIN_DETECT_LEN {
        return 1.0;
    }
    match lang::matches(text, hint) {
        Some(false) => 0.5,
        _ => 1.0,
    }
}

/// Select the 1-indexed page `page` of fixed size `page_size` from the
/// ranked sequence.
///
/// Out-of-range pages return an empty slice, never an error; consecutive
/// pages are disjoint and concatenate back to the ranked prefix.
pub fn paginate(results: &[MergedResult], page: usize, page_size: usize) -> &[MergedResult] {
    debug_assert!(page >= 1, "pages are 1-indexed");
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= results.len() {
        return &[];
    }
    let end = (start + page_size).min(results.len());
    &results[start..end]
}
