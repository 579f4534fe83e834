//! In-memory TTL cache for per-engine responses.
//!
//! Caches each engine's parsed results keyed by (engine, upstream query,
//! mode) so that repeated searches within the TTL skip the network entirely.
//! Uses [`moka`] for async-friendly caching with automatic eviction.

use std::sync::OnceLock;
use std::time::Duration;

use moka::future::Cache;

use crate::query::StructuredQuery;
use crate::types::{EngineId, RawResult, SearchMode};

/// Maximum number of cached engine responses.
const MAX_CACHE_ENTRIES: u64 = 256;

/// Global process-wide response cache.
///
/// Lazily initialised on first access. TTL is set when first created
/// and cannot be changed after initialisation.
static CACHE: OnceLock<Cache<CacheKey, Vec<RawResult>>> = OnceLock::new();

/// Composite cache key: engine + normalised upstream query + mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    engine: EngineId,
    query: String,
    mode: SearchMode,
}

impl CacheKey {
    /// Build a deterministic cache key for one engine's view of a query.
    ///
    /// The upstream query string is lowercased, and the language hint is
    /// folded in so queries differing only in language are cached apart.
    pub fn new(engine: EngineId, query: &StructuredQuery) -> Self {
        Self {
            engine,
            query: format!("{} lang:{}", query.upstream_string().to_lowercase(), query.lang()),
            mode: query.mode(),
        }
    }
}

fn get_or_init_cache(ttl_seconds: u64) -> &'static Cache<CacheKey, Vec<RawResult>> {
    CACHE.get_or_init(|| {
        Cache::builder()
            .max_capacity(MAX_CACHE_ENTRIES)
            .time_to_live(Duration::from_secs(ttl_seconds))
            .build()
    })
}

/// Look up cached results for the given key.
///
/// Returns `Some(results)` on cache hit, `None` on miss.
pub async fn get(key: &CacheKey, ttl_seconds: u64) -> Option<Vec<RawResult>> {
    let cache = get_or_init_cache(ttl_seconds);
    cache.get(key).await
}

/// Insert one engine's results into the cache.
pub async fn insert(key: CacheKey, results: Vec<RawResult>, ttl_seconds: u64) {
    let cache = get_or_init_cache(ttl_seconds);
    cache.insert(key, results).await;
}
