//! The engine adapter capability interface.
//!
//! Each upstream provider implements [`EngineAdapter`] to translate between
//! the common query/result shape and that provider's wire format. The trait
//! is object-safe so the dispatcher can hold a heterogeneous registry of
//! `Arc<dyn EngineAdapter>` built from configuration — there is no ambient
//! global engine registry.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::SearchConfig;
use crate::engines::{AlexandriaEngine, BingEngine, DuckDuckGoEngine};
use crate::error::EngineError;
use crate::query::{QueryCapabilities, StructuredQuery};
use crate::types::{EngineId, RawResult, SearchMode};

/// A pluggable upstream search engine.
///
/// Implementors translate a [`StructuredQuery`] into a provider request,
/// parse the response into [`RawResult`]s, and classify failures into the
/// [`EngineError`] taxonomy. Each adapter handles its own:
///
/// - upstream URL construction and query encoding
/// - HTTP request with appropriate headers
/// - response parsing (HTML via CSS selectors, or JSON)
/// - error classification for timeouts, blocks, and parse failures
///
/// Malformed individual entries in a response are skipped, never fatal;
/// only a wholly unparsable response is a [`EngineError::Parse`].
#[async_trait]
pub trait EngineAdapter: Send + Sync {
    /// Perform a search and return parsed results, at most
    /// [`max_results`](Self::max_results) of them, each carrying its rank
    /// and position-decayed score.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the request fails, the engine blocks
    /// the request, or the response cannot be parsed at all.
    async fn search(
        &self,
        query: &StructuredQuery,
        config: &SearchConfig,
    ) -> Result<Vec<RawResult>, EngineError>;

    /// Which provider this adapter represents.
    fn id(&self) -> EngineId;

    /// Ranking weight for this engine's results. Typically delegates to
    /// [`EngineId::weight()`].
    fn weight(&self) -> f64 {
        self.id().weight()
    }

    /// Search modes this adapter can serve. The dispatcher skips adapters
    /// that do not support the requested mode.
    fn modes(&self) -> &'static [SearchMode];

    /// Maximum number of results this adapter will return per query.
    fn max_results(&self) -> usize {
        12
    }

    /// Query syntax this engine understands. Queries requiring unsupported
    /// syntax are not dispatched to this adapter.
    fn capabilities(&self) -> QueryCapabilities {
        QueryCapabilities::default()
    }
}

/// Build the default adapter registry for the given engine list.
///
/// Duplicate engine ids are collapsed; order follows first occurrence.
pub fn default_registry(engines: &[EngineId]) -> Vec<Arc<dyn EngineAdapter>> {
    let mut seen = BTreeSet::new();
    engines
        .iter()
        .filter(|id| seen.insert(**id))
        .map(|id| match id {
            EngineId::DuckDuckGo => Arc::new(DuckDuckGoEngine) as Arc<dyn EngineAdapter>,
            EngineId::Bing => Arc::new(BingEngine) as Arc<dyn EngineAdapter>,
            EngineId::Alexandria => Arc::new(AlexandriaEngine) as Arc<dyn EngineAdapter>,
        })
        .collect()
}
