//! Result merging: deduplicate raw results by canonical URL, rate, and
//! order deterministically.
//!
//! [`merge`] is a pure function of the collected result set — grouping uses
//! a `BTreeMap` over canonical URLs and every tie-break is derived from the
//! results themselves, so the output never depends on engine arrival order.

use std::collections::BTreeMap;

use url::Url;

use crate::types::{EngineId, MergedResult, RawResult};

use super::rank::{domain_boost, engine_count_bonus, language_multiplier};
use super::url_normalize::canonical_url;

/// Deduplicate, rate, and order raw results into the full ranking.
///
/// Results sharing a canonical URL are merged into one [`MergedResult`]:
/// display fields prefer the highest-scoring contributor, the contributing
/// engine set is the union, and the rating is the weighted score sum times
/// the cross-engine agreement bonus (plus content multipliers — see
/// [`super::rank`]).
///
/// Ordering: rating descending; ties broken by the best (lowest)
/// contributing per-engine rank, then by canonical URL. Deterministic for
/// any permutation of `results`.
pub fn merge(results: &[RawResult], lang_hint: &str) -> Vec<MergedResult> {
    let mut groups: BTreeMap<String, Vec<&RawResult>> = BTreeMap::new();
    for result in results {
        groups
            .entry(canonical_url(&result.url))
            .or_default()
            .push(result);
    }

    let mut rated: Vec<(MergedResult, usize, String)> = groups
        .into_iter()
        .map(|(key, members)| build_merged(key, members, lang_hint))
        .collect();

    rated.sort_by(|a, b| {
        b.0.rating
            .total_cmp(&a.0.rating)
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.2.cmp(&b.2))
    });

    rated.into_iter().map(|(merged, _, _)| merged).collect()
}

/// Collapse one canonical-URL group into a merged result plus its
/// tie-break keys (best rank, canonical URL).
fn build_merged(
    key: String,
    mut members: Vec<&RawResult>,
    lang_hint: &str,
) -> (MergedResult, usize, String) {
    // Field-preference order: higher score first; engine order then rank
    // break exact score ties deterministically.
    members.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.engine.cmp(&b.engine))
            .then_with(|| a.rank.cmp(&b.rank))
    });

    let best = members[0];
    let title = best.title.clone();
    let text = members.iter().find_map(|m| m.text.clone());
    let src = members.iter().find_map(|m| m.src.clone());
    let answer = members.iter().find_map(|m| m.answer.clone());

    // Display URL: the preferred contributor's, upgraded to https when any
    // contributor saw an https variant.
    let mut url = best.url.clone();
    if url.starts_with("http://") && members.iter().any(|m| m.url.starts_with("https://")) {
        url = url.replacen("http://", "https://", 1);
    }

    // An engine counts once per group, with its best score.
    let mut per_engine: BTreeMap<EngineId, f64> = BTreeMap::new();
    let mut best_rank = usize::MAX;
    for member in &members {
        let entry = per_engine.entry(member.engine).or_insert(f64::MIN);
        if member.score > *entry {
            *entry = member.score;
        }
        best_rank = best_rank.min(member.rank);
    }

    let base: f64 = per_engine
        .iter()
        .map(|(engine, score)| score * engine.weight())
        .sum();
    let mut rating = base * engine_count_bonus(per_engine.len());

    let host = Url::parse(&url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default();
    rating *= domain_boost(&host);

    // Pool every contributor's title and text for language detection, the
    // way a single engine's snippet alone could misreport a bilingual page.
    let mut pooled = String::new();
    for member in &members {
        pooled.push_str(&member.title);
        pooled.push(' ');
        if let Some(text) = &member.text {
            pooled.push_str(text);
            pooled.push(' ');
        }
    }
    rating *= language_multiplier(pooled.trim_end(), lang_hint);

    let engines: Vec<EngineId> = per_engine.keys().copied().collect();

    (
        MergedResult {
            url,
            title,
            text,
            src,
            answer,
            rating,
            engines,
        },
        best_rank,
        key,
    )
}
