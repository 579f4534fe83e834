//! Bing adapter — web and image results from Microsoft's index.
//!
//! Web results live in `li.b_algo` containers. Image results embed their
//! metadata as JSON in the `m` attribute of `a.iusc` anchors; entries whose
//! metadata fails to parse are skipped individually.

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::config::SearchConfig;
use crate::engine::EngineAdapter;
use crate::error::EngineError;
use crate::http;
use crate::query::{QueryCapabilities, StructuredQuery};
use crate::types::{position_score, EngineId, RawResult, SearchMode};

/// Bing adapter for web and images modes.
pub struct BingEngine;

impl BingEngine {
    async fn search_web(
        &self,
        query: &StructuredQuery,
        config: &SearchConfig,
    ) -> Result<Vec<RawResult>, EngineError> {
        let client = http::build_client(config)?;

        let safesearch = if config.safe_search { "Strict" } else { "Off" };

        let response = client
            .get("https://www.bing.com/search")
            .query(&[
                ("q", query.upstream_string().as_str()),
                ("setlang", query.lang()),
                ("safeSearch", safesearch),
            ])
            .header("Accept", "text/html,application/xhtml+xml")
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| http::classify(&e))?;

        http::check_status(response.status())?;

        let html = response
            .text()
            .await
            .map_err(|e| http::classify(&e))?;

        tracing::trace!(bytes = html.len(), "Bing response received");

        parse_web_html(&html, self.max_results())
    }

    async fn search_images(
        &self,
        query: &StructuredQuery,
        config: &SearchConfig,
    ) -> Result<Vec<RawResult>, EngineError> {
        let client = http::build_client(config)?;

        let safesearch = if config.safe_search { "Strict" } else { "Off" };

        let response = client
            .get("https://www.bing.com/images/search")
            .query(&[
                ("q", query.upstream_string().as_str()),
                ("safeSearch", safesearch),
            ])
            .header("Accept", "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(|e| http::classify(&e))?;

        http::check_status(response.status())?;

        let html = response
            .text()
            .await
            .map_err(|e| http::classify(&e))?;

        parse_images_html(&html, self.max_results())
    }
}

#[async_trait]
impl EngineAdapter for BingEngine {
    async fn search(
        &self,
        query: &StructuredQuery,
        config: &SearchConfig,
    ) -> Result<Vec<RawResult>, EngineError> {
        tracing::trace!(query = %query.upstream_string(), mode = %query.mode(), "Bing search");
        match query.mode() {
            SearchMode::Web => self.search_web(query, config).await,
            SearchMode::Images => self.search_images(query, config).await,
            SearchMode::Answer => Err(EngineError::Parse(
                "answer mode not supported by Bing adapter".into(),
            )),
        }
    }

    fn id(&self) -> EngineId {
        EngineId::Bing
    }

    fn modes(&self) -> &'static [SearchMode] {
        &[SearchMode::Web, SearchMode::Images]
    }

    fn max_results(&self) -> usize {
        20
    }

    fn capabilities(&self) -> QueryCapabilities {
        QueryCapabilities {
            quoted_phrases: true,
            site_filter: true,
        }
    }
}

/// Parse a Bing web results page.
pub(crate) fn parse_web_html(
    html: &str,
    max_results: usize,
) -> Result<Vec<RawResult>, EngineError> {
    let document = Html::parse_document(html);

    // Organic results are li.b_algo containers.
    let result_sel = Selector::parse("li.b_algo")
        .map_err(|e| EngineError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse("h2")
        .map_err(|e| EngineError::Parse(format!("invalid title selector: {e:?}")))?;
    let link_sel = Selector::parse("a")
        .map_err(|e| EngineError::Parse(format!("invalid link selector: {e:?}")))?;
    let snippet_sel = Selector::parse(".b_caption p, .b_lineclamp2")
        .map_err(|e| EngineError::Parse(format!("invalid snippet selector: {e:?}")))?;

    let mut results = Vec::new();

    for element in document.select(&result_sel) {
        let title_el = match element.select(&title_sel).next() {
            Some(el) => el,
            None => continue,
        };

        let title = title_el.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let url = title_el
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|h| h.to_string());

        let url = match url {
            Some(u) if !u.is_empty() => u,
            _ => continue,
        };

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty());

        let rank = results.len();
        results.push(RawResult {
            engine: EngineId::Bing,
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

    tracing::debug!(count = results.len(), "Bing web results parsed");
    Ok(results)
}

/// Parse a Bing image results page.
///
/// Each `a.iusc` anchor carries a JSON blob in its `m` attribute with the
/// image source (`murl`), the hosting page (`purl`), and a title (`t`).
pub(crate) fn parse_images_html(
    html: &str,
    max_results: usize,
) -> Result<Vec<RawResult>, EngineError> {
    let document = Html::parse_document(html);

    let anchor_sel = Selector::parse("a.iusc")
        .map_err(|e| EngineError::Parse(format!("invalid image selector: {e:?}")))?;

    let mut results = Vec::new();

    for element in document.select(&anchor_sel) {
        let meta = match element.value().attr("m") {
            Some(m) => m,
            None => continue,
        };

        // Malformed metadata JSON drops the entry, not the response.
        let meta: serde_json::Value = match serde_json::from_str(meta) {
            Ok(v) => v,
            Err(_) => continue,
        };

        let src = match meta.get("murl").and_then(|v| v.as_str()) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => continue,
        };
        let url = meta
            .get("purl")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(src.as_str())
            .to_string();
        let title = meta
            .get("t")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("(untitled image)")
            .to_string();

        let rank = results.len();
        results.push(RawResult {
            engine: EngineId::Bing,
            rank,
            score: position_score(rank),
            url,
            title,
            text: None,
            src: Some(src),
            answer: None,
        });

        if results.len() >= max_results {
            break;
        }
    }

    tracing::debug!(count = results.len(), "Bing image results parsed");
    Ok(results)
}
