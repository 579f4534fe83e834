//! Concurrent fan-out of one query to every eligible engine adapter.
//!
//! One logical task per adapter, collected through a [`FuturesUnordered`]
//! under a single-writer discipline: adapters each return a privately-owned
//! result list and only the dispatch loop writes the aggregate. Each call is
//! bounded by the per-engine timeout; the whole join is bounded by the total
//! budget. Cancellation is by dropping the in-flight futures, which unwinds
//! the underlying HTTP calls.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};

use crate::cache::{self, CacheKey};
use crate::config::SearchConfig;
use crate::engine::{default_registry, EngineAdapter};
use crate::error::EngineError;
use crate::query::StructuredQuery;
use crate::types::{EngineId, RawResult};

/// Everything one dispatch pass produced: the collected raw results and the
/// per-engine error map. An engine appears in at most one of the two.
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    /// Raw results from every engine that answered, in no particular order.
    pub results: Vec<RawResult>,
    /// One error per failed engine.
    pub errors: BTreeMap<EngineId, EngineError>,
}

/// Fans queries out to a fixed adapter registry.
///
/// The registry is explicit state handed in at construction — there is no
/// process-wide engine list.
pub struct Dispatcher {
    adapters: Vec<Arc<dyn EngineAdapter>>,
    config: SearchConfig,
}

impl Dispatcher {
    /// Create a dispatcher over an explicit adapter registry.
    pub fn new(adapters: Vec<Arc<dyn EngineAdapter>>, config: SearchConfig) -> Self {
        Self { adapters, config }
    }

    /// Create a dispatcher with the default adapters for the engines
    /// enabled in `config`.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(default_registry(&config.engines), config.clone())
    }

    /// Query every eligible adapter concurrently and collect the outcome.
    ///
    /// Adapters that do not support the query's mode or required syntax are
    /// skipped silently — a query with zero eligible adapters returns an
    /// empty outcome, distinct from "ran but all failed" (empty results,
    /// full error map). Engine failures never abort other engines.
    pub async fn dispatch(&self, query: &StructuredQuery) -> DispatchOutcome {
        let required = query.required_capabilities();
        let eligible: Vec<Arc<dyn EngineAdapter>> = self
            .adapters
            .iter()
            .filter(|a| a.modes().contains(&query.mode()))
            .filter(|a| a.capabilities().supports(&required))
            .cloned()
            .collect();

        let mut outcome = DispatchOutcome::default();
        if eligible.is_empty() {
            tracing::debug!(mode = %query.mode(), "no eligible engines for query");
            return outcome;
        }

        let deadline = tokio::time::Instant::now() + self.config.total_budget;
        let mut pending: BTreeSet<EngineId> = eligible.iter().map(|a| a.id()).collect();

        let mut in_flight: FuturesUnordered<_> = eligible
            .into_iter()
            .map(|adapter| {
                let query = query.clone();
                let config = self.config.clone();
                async move {
                    let id = adapter.id();
                    jitter(&config).await;
                    let result = query_engine(adapter.as_ref(), &query, &config).await;
                    (id, result)
                }
            })
            .collect();

        loop {
            match tokio::time::timeout_at(deadline, in_flight.next()).await {
                Ok(Some((id, Ok(results)))) => {
                    pending.remove(&id);
                    tracing::debug!(engine = %id, count = results.len(), "engine returned results");
                    outcome.results.extend(results);
                }
                Ok(Some((id, Err(err)))) => {
                    pending.remove(&id);
                    tracing::warn!(engine = %id, error = %err, "engine query failed");
                    outcome.errors.insert(id, err);
                }
                Ok(None) => break,
                Err(_) => {
                    // Total budget exhausted: dropping the stream cancels
                    // everything still in flight.
                    drop(in_flight);
                    for id in pending {
                        tracing::warn!(engine = %id, "cancelled, total budget exhausted");
                        outcome
                            .errors
                            .insert(id, EngineError::Timeout("total budget exhausted".into()));
                    }
                    return outcome;
                }
            }
        }

        outcome
    }
}

/// Query one engine: cache lookup, bounded call, cache fill.
async fn query_engine(
    adapter: &dyn EngineAdapter,
    query: &StructuredQuery,
    config: &SearchConfig,
) -> Result<Vec<RawResult>, EngineError> {
    let id = adapter.id();
    let key = CacheKey::new(id, query);

    if config.cache_ttl_seconds > 0 {
        if let Some(cached) = cache::get(&key, config.cache_ttl_seconds).await {
            tracing::debug!(engine = %id, count = cached.len(), "cache hit");
            return Ok(cached);
        }
    }

    match tokio::time::timeout(config.per_engine_timeout, adapter.search(query, config)).await {
        Ok(Ok(results)) => {
            if config.cache_ttl_seconds > 0 {
                cache::insert(key, results.clone(), config.cache_ttl_seconds).await;
            }
            Ok(results)
        }
        Ok(Err(err)) => Err(err),
        Err(_) => Err(EngineError::Timeout(format!(
            "exceeded per-engine budget of {:?}",
            config.per_engine_timeout
        ))),
    }
}

/// Polite random delay before hitting an engine.
async fn jitter(config: &SearchConfig) {
    let (min, max) = config.request_delay_ms;
    if max == 0 {
        return;
    }
    let wait = if min >= max {
        min
    } else {
        use rand::Rng;
        rand::thread_rng().gen_range(min..=max)
    };
    tokio::time::sleep(Duration::from_millis(wait)).await;
}
