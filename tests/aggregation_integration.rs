//! Integration tests for the aggregation pipeline.
//!
//! These exercise dispatch → merge → paginate end to end using scripted
//! adapters (no network). Live engine tests are marked `#[ignore]` for
//! manual/periodic validation.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use tributary::engine::EngineAdapter;
use tributary::orchestrator::{merge::merge, rank::paginate};
use tributary::query::{self, QueryCapabilities, StructuredQuery};
use tributary::types::position_score;
use tributary::{Dispatcher, EngineError, EngineId, RawResult, SearchConfig, SearchMode};

/// Scripted adapter: waits `delay`, then returns a fixed outcome.
struct ScriptedEngine {
    id: EngineId,
    delay: Duration,
    outcome: Result<Vec<RawResult>, EngineError>,
    modes: &'static [SearchMode],
}

impl ScriptedEngine {
    fn returning(id: EngineId, results: Vec<RawResult>) -> Self {
        Self {
            id,
            delay: Duration::from_millis(10),
            outcome: Ok(results),
            modes: &[SearchMode::Web],
        }
    }

    fn hanging(id: EngineId) -> Self {
        Self {
            id,
            delay: Duration::from_secs(3600),
            outcome: Ok(vec![]),
            modes: &[SearchMode::Web],
        }
    }
}

#[async_trait]
impl EngineAdapter for ScriptedEngine {
    async fn search(
        &self,
        _query: &StructuredQuery,
        _config: &SearchConfig,
    ) -> Result<Vec<RawResult>, EngineError> {
        tokio::time::sleep(self.delay).await;
        self.outcome.clone()
    }

    fn id(&self) -> EngineId {
        self.id
    }

    fn modes(&self) -> &'static [SearchMode] {
        self.modes
    }

    fn capabilities(&self) -> QueryCapabilities {
        QueryCapabilities {
            quoted_phrases: true,
            site_filter: true,
        }
    }
}

fn test_config() -> SearchConfig {
    SearchConfig {
        per_engine_timeout: Duration::from_millis(500),
        total_budget: Duration::from_secs(2),
        cache_ttl_seconds: 0,
        request_delay_ms: (0, 0),
        ..Default::default()
    }
}

fn web_query(raw: &str) -> StructuredQuery {
    query::parse(raw, SearchMode::Web, 1, "en").expect("should parse")
}

fn make_raw(engine: EngineId, rank: usize, url: &str) -> RawResult {
    RawResult::web(
        engine,
        rank,
        url.to_string(),
        format!("Result {rank} from {engine} about the quick brown fox"),
    )
}

/// Two engines report the same page with reordered query parameters, a
/// third reports another page — the shared page must merge into one entry.
#[test]
fn query_param_order_does_not_split_a_page() {
    let mut first = make_raw(EngineId::DuckDuckGo, 0, "https://a.com/x?b=1&a=2");
    first.score = 5.0;
    let mut second = make_raw(EngineId::Bing, 0, "https://a.com/x?a=2&b=1");
    second.score = 3.0;
    let mut third = make_raw(EngineId::Alexandria, 0, "https://b.com");
    third.score = 9.0;

    let merged = merge(&[first, second, third], "en");

    assert_eq!(merged.len(), 2, "a.com must appear exactly once");

    let a = merged
        .iter()
        .find(|m| m.url.contains("a.com"))
        .expect("a.com present");
    assert_eq!(
        a.engines,
        vec![EngineId::DuckDuckGo, EngineId::Bing],
        "both reporting engines recorded"
    );
    let expected_a = (5.0 * EngineId::DuckDuckGo.weight() + 3.0 * EngineId::Bing.weight()) * 1.2;
    assert!((a.rating - expected_a).abs() < 1e-9);

    let b = merged
        .iter()
        .find(|m| m.url.contains("b.com"))
        .expect("b.com present");
    assert_eq!(b.engines, vec![EngineId::Alexandria]);
    let expected_b = 9.0 * EngineId::Alexandria.weight();
    assert!((b.rating - expected_b).abs() < 1e-9);
}

#[test]
fn merged_output_never_repeats_a_canonical_url() {
    let results = vec![
        make_raw(EngineId::DuckDuckGo, 0, "https://example.com/docs/"),
        make_raw(EngineId::Bing, 1, "http://www.example.com/docs"),
        make_raw(EngineId::Alexandria, 0, "https://example.com/docs#install"),
        make_raw(EngineId::DuckDuckGo, 1, "https://example.com/docs?utm_source=x"),
        make_raw(EngineId::Bing, 0, "https://elsewhere.com/"),
    ];

    let merged = merge(&results, "en");
    assert_eq!(merged.len(), 2);

    let urls: BTreeSet<&str> = merged.iter().map(|m| m.url.as_str()).collect();
    assert_eq!(urls.len(), merged.len());
}

#[test]
fn ranking_is_a_pure_function_of_the_result_set() {
    let results: Vec<RawResult> = vec![
        make_raw(EngineId::DuckDuckGo, 0, "http://a.com/x"),
        make_raw(EngineId::Bing, 1, "http://a.com/x"),
        make_raw(EngineId::DuckDuckGo, 1, "http://b.com/y"),
        make_raw(EngineId::Alexandria, 0, "http://c.com/z"),
        make_raw(EngineId::Bing, 0, "http://d.com/w"),
        make_raw(EngineId::Alexandria, 1, "http://b.com/y"),
    ];

    let baseline: Vec<(String, String)> = merge(&results, "en")
        .iter()
        .map(|m| (m.url.clone(), format!("{:.6}", m.rating)))
        .collect();

    let permutations: Vec<Vec<usize>> = vec![
        vec![5, 4, 3, 2, 1, 0],
        vec![3, 0, 5, 1, 4, 2],
        vec![2, 5, 1, 4, 0, 3],
        vec![1, 2, 3, 4, 5, 0],
    ];
    for perm in permutations {
        let shuffled: Vec<RawResult> = perm.iter().map(|&i| results[i].clone()).collect();
        let reordered: Vec<(String, String)> = merge(&shuffled, "en")
            .iter()
            .map(|m| (m.url.clone(), format!("{:.6}", m.rating)))
            .collect();
        assert_eq!(reordered, baseline, "permutation {perm:?} changed the ranking");
    }
}

#[test]
fn adjacent_pages_are_disjoint_and_cover_the_top() {
    let results: Vec<RawResult> = (0..25)
        .map(|i| make_raw(EngineId::DuckDuckGo, i, &format!("http://site{i}.com/page")))
        .collect();

    let merged = merge(&results, "en");
    assert_eq!(merged.len(), 25);

    let page_size = 10;
    let first = paginate(&merged, 1, page_size);
    let second = paginate(&merged, 2, page_size);

    let first_urls: BTreeSet<&str> = first.iter().map(|m| m.url.as_str()).collect();
    let second_urls: BTreeSet<&str> = second.iter().map(|m| m.url.as_str()).collect();
    assert!(first_urls.is_disjoint(&second_urls));

    let mut combined: Vec<&str> = first.iter().map(|m| m.url.as_str()).collect();
    combined.extend(second.iter().map(|m| m.url.as_str()));
    let top: Vec<&str> = merged[..2 * page_size].iter().map(|m| m.url.as_str()).collect();
    assert_eq!(combined, top);

    assert!(paginate(&merged, 4, page_size).is_empty());
}

#[test]
fn monotonicity_more_agreeing_engines_never_rank_lower() {
    let base = vec![make_raw(EngineId::Bing, 3, "http://agreed.com/page")];
    let with_second = vec![
        make_raw(EngineId::Bing, 3, "http://agreed.com/page"),
        make_raw(EngineId::DuckDuckGo, 9, "http://agreed.com/page"),
    ];
    let with_third = vec![
        make_raw(EngineId::Bing, 3, "http://agreed.com/page"),
        make_raw(EngineId::DuckDuckGo, 9, "http://agreed.com/page"),
        make_raw(EngineId::Alexandria, 11, "http://agreed.com/page"),
    ];

    let r1 = merge(&base, "en")[0].rating;
    let r2 = merge(&with_second, "en")[0].rating;
    let r3 = merge(&with_third, "en")[0].rating;

    assert!(r2 >= r1);
    assert!(r3 >= r2);
}

#[tokio::test(start_paused = true)]
async fn hung_engine_reported_while_others_deliver() {
    let dispatcher = Dispatcher::new(
        vec![
            Arc::new(ScriptedEngine::returning(
                EngineId::DuckDuckGo,
                vec![
                    make_raw(EngineId::DuckDuckGo, 0, "http://a.com/"),
                    make_raw(EngineId::DuckDuckGo, 1, "http://b.com/"),
                ],
            )),
            Arc::new(ScriptedEngine::hanging(EngineId::Bing)),
        ],
        test_config(),
    );

    let started = tokio::time::Instant::now();
    let outcome = dispatcher.dispatch(&web_query("isolation test")).await;
    let elapsed = started.elapsed();

    // The hung engine is bounded by its per-engine budget.
    assert!(elapsed <= Duration::from_millis(600), "took {elapsed:?}");
    assert!(matches!(
        outcome.errors.get(&EngineId::Bing),
        Some(EngineError::Timeout(_))
    ));

    let merged = merge(&outcome.results, "en");
    assert_eq!(merged.len(), 2);
    for m in &merged {
        assert_eq!(m.engines, vec![EngineId::DuckDuckGo]);
    }
}

#[tokio::test(start_paused = true)]
async fn error_map_and_contributor_sets_are_disjoint() {
    let dispatcher = Dispatcher::new(
        vec![
            Arc::new(ScriptedEngine::returning(
                EngineId::DuckDuckGo,
                vec![make_raw(EngineId::DuckDuckGo, 0, "http://shared.com/")],
            )),
            Arc::new(ScriptedEngine::returning(
                EngineId::Alexandria,
                vec![make_raw(EngineId::Alexandria, 0, "http://shared.com/")],
            )),
            Arc::new(ScriptedEngine::hanging(EngineId::Bing)),
        ],
        test_config(),
    );

    let outcome = dispatcher.dispatch(&web_query("disjointness")).await;
    let merged = merge(&outcome.results, "en");

    let contributors: BTreeSet<EngineId> =
        merged.iter().flat_map(|m| m.engines.iter().copied()).collect();
    for engine in outcome.errors.keys() {
        assert!(!contributors.contains(engine));
    }

    assert_eq!(merged.len(), 1);
    assert_eq!(
        merged[0].engines,
        vec![EngineId::DuckDuckGo, EngineId::Alexandria]
    );
}

#[tokio::test(start_paused = true)]
async fn images_query_reaches_only_image_capable_adapters() {
    let mut image_engine = ScriptedEngine::returning(
        EngineId::Bing,
        vec![{
            let mut r = make_raw(EngineId::Bing, 0, "http://gallery.com/ferris");
            r.src = Some("http://img.gallery.com/ferris.png".into());
            r
        }],
    );
    image_engine.modes = &[SearchMode::Web, SearchMode::Images];

    let dispatcher = Dispatcher::new(
        vec![
            Arc::new(image_engine),
            Arc::new(ScriptedEngine::returning(
                EngineId::Alexandria,
                vec![make_raw(EngineId::Alexandria, 0, "http://text-only.com/")],
            )),
        ],
        test_config(),
    );

    let query = query::parse("ferris", SearchMode::Images, 1, "en").expect("should parse");
    let outcome = dispatcher.dispatch(&query).await;

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].engine, EngineId::Bing);
    assert!(outcome.errors.is_empty());

    let merged = merge(&outcome.results, "en");
    assert_eq!(
        merged[0].src.as_deref(),
        Some("http://img.gallery.com/ferris.png")
    );
}

#[test]
fn engine_assigned_scores_follow_position_decay() {
    // Adapters hand the merger position-decayed scores; verify the curve
    // survives an end-to-end merge of a single engine's list.
    let results: Vec<RawResult> = (0..5)
        .map(|i| make_raw(EngineId::DuckDuckGo, i, &format!("http://r{i}.com/")))
        .collect();
    let merged = merge(&results, "en");

    for (i, m) in merged.iter().enumerate() {
        let expected = position_score(i) * EngineId::DuckDuckGo.weight();
        assert!(
            (m.rating - expected).abs() < 1e-9,
            "rank {i} rating {} != {expected}",
            m.rating
        );
    }
}

// ── Live integration tests (require network) ──────────────────────────
// Run with: cargo test --test aggregation_integration -- --ignored

fn live_config(engines: Vec<EngineId>) -> SearchConfig {
    SearchConfig {
        engines,
        per_engine_timeout: Duration::from_secs(15),
        total_budget: Duration::from_secs(20),
        cache_ttl_seconds: 0,
        request_delay_ms: (200, 500),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore]
async fn live_search_returns_results() {
    let config = live_config(vec![EngineId::DuckDuckGo]);

    match tributary::search("rust programming language", SearchMode::Web, 1, &config).await {
        Ok(outcome) => {
            assert!(!outcome.results.is_empty(), "live search should return results");
            for r in &outcome.results {
                assert!(!r.title.is_empty());
                assert!(!r.url.is_empty());
                assert!(r.rating > 0.0);
            }
        }
        Err(e) => {
            // Network failures are acceptable in CI; just log.
            eprintln!("Live search failed (acceptable in CI): {e}");
        }
    }
}

#[tokio::test]
#[ignore]
async fn live_multi_engine_results_have_unique_urls() {
    let config = live_config(vec![EngineId::DuckDuckGo, EngineId::Bing, EngineId::Alexandria]);

    match tributary::search("rust programming", SearchMode::Web, 1, &config).await {
        Ok(outcome) => {
            let urls: BTreeSet<&str> = outcome.results.iter().map(|r| r.url.as_str()).collect();
            assert_eq!(urls.len(), outcome.results.len());
            for i in 1..outcome.results.len() {
                assert!(outcome.results[i - 1].rating >= outcome.results[i].rating);
            }
        }
        Err(e) => {
            eprintln!("Multi-engine live search failed (acceptable): {e}");
        }
    }
}
