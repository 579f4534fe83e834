//! Alexandria adapter — an independent open index with a plain JSON API.
//!
//! No HTML scraping here: one GET against `api.alexandria.org` returns a
//! `results` array of `{title, url, snippet}` objects. Entries missing a
//! URL or title are skipped; a body that is not the expected JSON shape is
//! a parse failure.

use async_trait::async_trait;

use crate::config::SearchConfig;
use crate::engine::EngineAdapter;
use crate::error::EngineError;
use crate::http;
use crate::query::StructuredQuery;
use crate::types::{position_score, EngineId, RawResult, SearchMode};

/// Alexandria adapter, web mode only.
pub struct AlexandriaEngine;

#[async_trait]
impl EngineAdapter for AlexandriaEngine {
    async fn search(
        &self,
        query: &StructuredQuery,
        config: &SearchConfig,
    ) -> Result<Vec<RawResult>, EngineError> {
        tracing::trace!(query = %query.upstream_string(), "Alexandria search");

        let client = http::build_client(config)?;

        let response = client
            .get("https://api.alexandria.org/")
            .query(&[
                ("a", "1"),
                ("c", "a"),
                ("q", query.upstream_string().as_str()),
            ])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| http::classify(&e))?;

        http::check_status(response.status())?;

        let body = response
            .text()
            .await
            .map_err(|e| http::classify(&e))?;

        parse_json(&body, self.max_results())
    }

    fn id(&self) -> EngineId {
        EngineId::Alexandria
    }

    fn modes(&self) -> &'static [SearchMode] {
        &[SearchMode::Web]
    }
}

/// Parse an Alexandria API response body.
pub(crate) fn parse_json(body: &str, max_results: usize) -> Result<Vec<RawResult>, EngineError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| EngineError::Parse(format!("invalid Alexandria JSON: {e}")))?;

    let entries = value
        .get("results")
        .and_then(|v| v.as_array())
        .ok_or_else(|| EngineError::Parse("Alexandria response has no results array".into()))?;

    let mut results = Vec::new();

    for entry in entries {
        let url = match entry.get("url").and_then(|v| v.as_str()) {
            Some(u) if !u.is_empty() => u.to_string(),
            _ => continue,
        };
        let title = match entry.get("title").and_then(|v| v.as_str()) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => continue,
        };
        let snippet = entry
            .get("snippet")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let rank = results.len();
        results.push(RawResult {
            engine: EngineId::Alexandria,
            rank,
            score: position_score(rank),
            url,
            title,
            text: snippet,
            src: None,
            answer: None,
        });

        if results.len() >= max_results {
            break;
        }
    }

    tracing::debug!(count = results.len(), "Alexandria results parsed");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_ALEXANDRIA_JSON: &str = r#"{
        "status": "success",
        "results": [
            {"title": "Rust Programming Language", "url": "https://www.rust-lang.org/", "snippet": "Reliable and efficient software."},
            {"title": "", "url": "https://dropped.example.com/", "snippet": "no title"},
            {"title": "The Cargo Book", "url": "https://doc.rust-lang.org/cargo/", "snippet": ""}
        ]
    }"#;

    #[test]
    fn parse_results_skipping_malformed_entries() {
        let results = parse_json(MOCK_ALEXANDRIA_JSON, 10).expect("should parse");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Rust Programming Language");
        assert_eq!(results[0].text.as_deref(), Some("Reliable and efficient software."));
        assert_eq!(results[1].url, "https://doc.rust-lang.org/cargo/");
        assert!(results[1].text.is_none());
        assert_eq!(results[1].rank, 1);
    }

    #[test]
    fn parse_respects_max_results() {
        let results = parse_json(MOCK_ALEXANDRIA_JSON, 1).expect("should parse");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn invalid_json_is_parse_error() {
        assert!(matches!(
            parse_json("<html>definitely not json</html>", 10),
            Err(EngineError::Parse(_))
        ));
    }

    #[test]
    fn missing_results_array_is_parse_error() {
        assert!(matches!(
            parse_json(r#"{"status": "error"}"#, 10),
            Err(EngineError::Parse(_))
        ));
    }

    #[test]
    fn empty_results_array_is_not_an_error() {
        let results = parse_json(r#"{"results": []}"#, 10).expect("should parse");
        assert!(results.is_empty());
    }

    #[test]
    fn declared_modes_web_only() {
        let engine = AlexandriaEngine;
        assert_eq!(engine.id(), EngineId::Alexandria);
        assert_eq!(engine.modes(), &[SearchMode::Web]);
        // JSON API with no documented phrase/site syntax.
        assert!(!engine.capabilities().quoted_phrases);
        assert!(!engine.capabilities().site_filter);
    }

    #[test]
    fn is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AlexandriaEngine>();
    }
}
