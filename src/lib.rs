//! # tributary
//!
//! Embedded metasearch aggregation: one query in, a deduplicated, ranked
//! result list out.
//!
//! This crate implements the core of a metasearch engine — it parses a raw
//! query, fans it out concurrently to multiple upstream search engines, and
//! merges the answers — while leaving presentation entirely to the caller:
//! the output is an ordered page of [`MergedResult`]s plus a per-engine
//! error map, ready to render.
//!
//! ## Design
//!
//! - Queries DuckDuckGo, Bing, and Alexandria through per-provider adapters
//!   (HTML scraping or JSON APIs — no API keys required)
//! - Concurrent fan-out with a per-engine timeout and a total wall-clock
//!   budget; one engine failing, hanging, or blocking never affects the rest
//! - Deduplication by canonical URL; ranking rewards cross-engine agreement
//!   and is fully deterministic for a given result set
//! - In-memory TTL cache of per-engine responses
//! - User-Agent rotation and request jitter for reliability
//!
//! ## Security
//!
//! - No API keys or secrets to leak
//! - No network listeners — this is a library, not a server
//! - Search queries are logged only at trace level

pub mod cache;
pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod http;
pub mod lang;
pub mod orchestrator;
pub mod query;
pub mod types;

use std::collections::BTreeMap;

use serde::Serialize;

pub use config::SearchConfig;
pub use engine::EngineAdapter;
pub use error::{EngineError, Result, SearchError};
pub use orchestrator::dispatch::{DispatchOutcome, Dispatcher};
pub use query::StructuredQuery;
pub use types::{EngineId, MergedResult, RawResult, SearchMode};

/// Everything the presentation layer needs to render a results page.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// The parsed query, echoed for re-display and highlighting. Carries
    /// the requested mode and page.
    pub query: StructuredQuery,
    /// The merged results for the requested page, in rank order.
    pub results: Vec<MergedResult>,
    /// Total merged results before pagination, for pagination controls.
    pub total_results: usize,
    /// Per-engine failures. Disjoint from the engines that contributed
    /// results.
    pub errors: BTreeMap<EngineId, EngineError>,
}

/// Search the web using multiple engines concurrently.
///
/// Parses `raw_query`, dispatches it to every enabled engine that supports
/// `mode`, merges and ranks the results, and returns the requested page.
/// Individual engine failures are captured in [`SearchOutcome::errors`] and
/// never fail the overall search — even if every engine fails, the outcome
/// is an empty result list plus a full error map.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration and
/// [`SearchError::InvalidQuery`] for an empty query or a page below 1,
/// in both cases before any engine is contacted.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> tributary::Result<()> {
/// let config = tributary::SearchConfig::default();
/// let outcome = tributary::search("rust programming", tributary::SearchMode::Web, 1, &config).await?;
/// for result in &outcome.results {
///     println!("{}: {}", result.title, result.url);
/// }
/// for (engine, error) in &outcome.errors {
///     eprintln!("{engine} failed: {error}");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    raw_query: &str,
    mode: SearchMode,
    page: usize,
    config: &SearchConfig,
) -> Result<SearchOutcome> {
    config.validate()?;
    let query = query::parse(raw_query, mode, page, &config.default_lang)?;

    let dispatcher = Dispatcher::from_config(config);
    let dispatched = dispatcher.dispatch(&query).await;

    let merged = orchestrator::merge::merge(&dispatched.results, query.lang());
    let total_results = merged.len();
    let results = orchestrator::rank::paginate(&merged, page, config.page_size).to_vec();

    tracing::debug!(
        total = total_results,
        page = query.page(),
        returned = results.len(),
        failed_engines = dispatched.errors.len(),
        "search complete"
    );

    Ok(SearchOutcome {
        query,
        results,
        total_results,
        errors: dispatched.errors,
    })
}

/// First page of web results with the given configuration.
///
/// Convenience wrapper around [`search`].
///
/// # Errors
///
/// Same as [`search`].
pub async fn search_web(raw_query: &str, config: &SearchConfig) -> Result<SearchOutcome> {
    search(raw_query, SearchMode::Web, 1, config).await
}
