//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] is the explicit configuration object handed to the
//! dispatcher at construction — enabled engines, time budgets, page size,
//! caching, and request behaviour. The defaults are tuned for reliable,
//! polite scraping.

use std::time::Duration;

use crate::error::SearchError;
use crate::types::EngineId;

/// Configuration for search operations.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Which engines to query. Queried concurrently; results are merged.
    /// An empty list is valid and yields an empty outcome.
    pub engines: Vec<EngineId>,
    /// Number of merged results per page.
    pub page_size: usize,
    /// Time budget for a single engine's request. Exceeding it records a
    /// timeout for that engine and discards its partial results.
    pub per_engine_timeout: Duration,
    /// Wall-clock budget for the whole fan-out. Engines still pending when
    /// it expires are cancelled and recorded as timed out.
    pub total_budget: Duration,
    /// Whether to request safe-search filtering from engines that support it.
    pub safe_search: bool,
    /// How long to cache per-engine responses, in seconds. 0 disables caching.
    pub cache_ttl_seconds: u64,
    /// Random delay range in milliseconds `(min, max)` before each engine
    /// request. Spreads requests out to avoid rate limiting.
    pub request_delay_ms: (u64, u64),
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
    /// Language hint used when the query's language cannot be detected.
    pub default_lang: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engines: vec![EngineId::DuckDuckGo, EngineId::Bing, EngineId::Alexandria],
            page_size: 12,
            per_engine_timeout: Duration::from_secs(5),
            total_budget: Duration::from_secs(8),
            safe_search: true,
            cache_ttl_seconds: 600,
            request_delay_ms: (100, 500),
            user_agent: None,
            default_lang: "en".into(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is
    /// invalid.
    ///
    /// Checks:
    /// - `page_size` must be greater than 0
    /// - both time budgets must be non-zero
    /// - `per_engine_timeout` must not exceed `total_budget`
    /// - `request_delay_ms.0` must be <= `request_delay_ms.1`
    ///
    /// An empty `engines` list is deliberately allowed: a query with no
    /// eligible engines is not an error, it returns an empty outcome.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.page_size == 0 {
            return Err(SearchError::Config(
                "page_size must be greater than 0".into(),
            ));
        }
        if self.per_engine_timeout.is_zero() {
            return Err(SearchError::Config(
                "per_engine_timeout must be non-zero".into(),
            ));
        }
        if self.total_budget.is_zero() {
            return Err(SearchError::Config("total_budget must be non-zero".into()));
        }
        if self.per_engine_timeout > self.total_budget {
            return Err(SearchError::Config(
                "per_engine_timeout must not exceed total_budget".into(),
            ));
        }
        if self.request_delay_ms.0 > self.request_delay_ms.1 {
            return Err(SearchError::Config(
                "request_delay_ms min must be <= max".into(),
            ));
        }
        Ok(())
    }
}
