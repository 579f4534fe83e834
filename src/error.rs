//! Error types for the tributary crate.
//!
//! Failures come in two layers. [`SearchError`] is caller-facing and is
//! raised before any engine is contacted — bad input or bad configuration.
//! [`EngineError`] is the per-engine classification captured in the dispatch
//! error map; it never propagates as an error past the dispatcher, so a
//! search succeeds (possibly with an empty result list) no matter how many
//! engines fail.

use serde::{Deserialize, Serialize};

/// Errors surfaced to the caller before dispatch begins.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The query was empty, contained no search terms, or requested a
    /// page number below 1.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// One engine's failure during a single query execution.
///
/// Keyed by engine in the dispatch error map, at most one per engine per
/// pass. An engine that errs contributes no results in the same pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum EngineError {
    /// The engine exceeded its time budget. Any partial results are discarded.
    #[error("timed out: {0}")]
    Timeout(String),

    /// The HTTP request could not be completed.
    #[error("transport error: {0}")]
    Transport(String),

    /// A response arrived but could not be parsed at all.
    #[error("parse error: {0}")]
    Parse(String),

    /// The engine refused to serve the request (captcha wall, 403, 429).
    #[error("blocked: {0}")]
    Blocked(String),
}

/// Convenience type alias for tributary results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_query() {
        let err = SearchError::InvalidQuery("query is empty".into());
        assert_eq!(err.to_string(), "invalid query: query is empty");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("page_size must be greater than 0".into());
        assert_eq!(
            err.to_string(),
            "config error: page_size must be greater than 0"
        );
    }

    #[test]
    fn display_engine_errors() {
        assert_eq!(
            EngineError::Timeout("exceeded 5s".into()).to_string(),
            "timed out: exceeded 5s"
        );
        assert_eq!(
            EngineError::Transport("connection refused".into()).to_string(),
            "transport error: connection refused"
        );
        assert_eq!(
            EngineError::Parse("unexpected payload".into()).to_string(),
            "parse error: unexpected payload"
        );
        assert_eq!(
            EngineError::Blocked("HTTP 429".into()).to_string(),
            "blocked: HTTP 429"
        );
    }

    #[test]
    fn engine_error_equality() {
        assert_eq!(
            EngineError::Timeout("x".into()),
            EngineError::Timeout("x".into())
        );
        assert_ne!(
            EngineError::Timeout("x".into()),
            EngineError::Transport("x".into())
        );
    }

    #[test]
    fn engine_error_serde_round_trip() {
        let err = EngineError::Blocked("HTTP 403".into());
        let json = serde_json::to_string(&err).expect("serialize");
        let decoded: EngineError = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, err);
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
        assert_send_sync::<EngineError>();
    }
}
