//! DuckDuckGo adapter — web results from the HTML-only endpoint, direct
//! answers from the Instant Answer API.
//!
//! The HTML endpoint at `https://html.duckduckgo.com/html/` requires no
//! JavaScript and is tolerant of automated requests, which makes it the
//! most reliable web-mode source. The Instant Answer API returns JSON.

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::config::SearchConfig;
use crate::engine::EngineAdapter;
use crate::error::EngineError;
use crate::http;
use crate::query::{QueryCapabilities, StructuredQuery};
use crate::types::{position_score, EngineId, RawResult, SearchMode};

/// DuckDuckGo adapter for web and answer modes.
pub struct DuckDuckGoEngine;

impl DuckDuckGoEngine {
    /// Extract the actual URL from DuckDuckGo's redirect wrapper.
    ///
    /// DDG wraps URLs like `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`;
    /// the `uddg` query parameter holds the destination.
    fn extract_url(href: &str) -> Option<String> {
        let full_href = if href.starts_with("//") {
            format!("https:{href}")
        } else {
            href.to_string()
        };

        let parsed = Url::parse(&full_href).ok()?;

        if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned())
        } else {
            Some(full_href)
        }
    }

    async fn search_web(
        &self,
        query: &StructuredQuery,
        config: &SearchConfig,
    ) -> Result<Vec<RawResult>, EngineError> {
        let client = http::build_client(config)?;

        let upstream = query.upstream_string();
        let mut params = vec![("q", upstream.as_str())];
        if config.safe_search {
            params.push(("kp", "1"));
        }

        let response = client
            .post("https://html.duckduckgo.com/html/")
            .form(&params)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| http::classify(&e))?;

        http::check_status(response.status())?;

        let html = response
            .text()
            .await
            .map_err(|e| http::classify(&e))?;

        tracing::trace!(bytes = html.len(), "DuckDuckGo response received");

        parse_web_html(&html, self.max_results())
    }

    async fn search_answer(
        &self,
        query: &StructuredQuery,
        config: &SearchConfig,
    ) -> Result<Vec<RawResult>, EngineError> {
        let client = http::build_client(config)?;

        let response = client
            .get("https://api.duckduckgo.com/")
            .query(&[
                ("q", query.upstream_string().as_str()),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| http::classify(&e))?;

        http::check_status(response.status())?;

        let body = response
            .text()
            .await
            .map_err(|e| http::classify(&e))?;

        parse_answer_json(&body)
    }
}

#[async_trait]
impl EngineAdapter for DuckDuckGoEngine {
    async fn search(
        &self,
        query: &StructuredQuery,
        config: &SearchConfig,
    ) -> Result<Vec<RawResult>, EngineError> {
        tracing::trace!(query = %query.upstream_string(), mode = %query.mode(), "DuckDuckGo search");
        match query.mode() {
            SearchMode::Web => self.search_web(query, config).await,
            SearchMode::Answer => self.search_answer(query, config).await,
            SearchMode::Images => Err(EngineError::Parse(
                "images mode not supported by DuckDuckGo adapter".into(),
            )),
        }
    }

    fn id(&self) -> EngineId {
        EngineId::DuckDuckGo
    }

    fn modes(&self) -> &'static [SearchMode] {
        &[SearchMode::Web, SearchMode::Answer]
    }

    fn max_results(&self) -> usize {
        25
    }

    fn capabilities(&self) -> QueryCapabilities {
        QueryCapabilities {
            quoted_phrases: true,
            site_filter: true,
        }
    }
}

/// Parse a DuckDuckGo HTML response page into raw results.
///
/// Separate function so it can be tested against canned HTML.
pub(crate) fn parse_web_html(
    html: &str,
    max_results: usize,
) -> Result<Vec<RawResult>, EngineError> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse(
        ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    )
    .map_err(|e| EngineError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse(".result__a")
        .map_err(|e| EngineError::Parse(format!("invalid title selector: {e:?}")))?;
    let snippet_sel = Selector::parse(".result__snippet")
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

        let href = match title_el.value().attr("href") {
            Some(h) => h,
            None => continue,
        };

        let url = match DuckDuckGoEngine::extract_url(href) {
            Some(u) => u,
            None => continue,
        };

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty());

        let rank = results.len();
        results.push(RawResult {
            engine: EngineId::DuckDuckGo,
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

    tracing::debug!(count = results.len(), "DuckDuckGo results parsed");
    Ok(results)
}

/// Parse an Instant Answer API response into at most one answer result.
pub(crate) fn parse_answer_json(body: &str) -> Result<Vec<RawResult>, EngineError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| EngineError::Parse(format!("invalid Instant Answer JSON: {e}")))?;

    let text = ["AbstractText", "Answer", "Definition"]
        .iter()
        .filter_map(|field| value.get(*field).and_then(|v| v.as_str()))
        .find(|s| !s.is_empty());

    let Some(text) = text else {
        return Ok(Vec::new());
    };

    let title = value
        .get("Heading")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(text)
        .to_string();

    let url = value
        .get("AbstractURL")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("https://duckduckgo.com")
        .to_string();

    Ok(vec![RawResult {
        engine: EngineId::DuckDuckGo,
        rank: 0,
        score: position_score(0),
        url,
        title,
        text: None,
        src: None,
        answer: Some(text.to_string()),
    }])
}
