//! Query parsing: raw user input to a [`StructuredQuery`].
//!
//! Tokenization splits on whitespace and preserves quoted phrases as single
//! tokens. `site:<host>` and `lang:<code>` tokens are extracted as filters
//! rather than search terms. No engine-specific syntax is interpreted here —
//! each adapter rebuilds its own upstream query from the structured form.

use serde::Serialize;

use crate::error::SearchError;
use crate::lang;
use crate::types::SearchMode;

/// One search term. Phrases keep their inner spaces and are re-quoted when
/// the upstream query string is rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryTerm {
    /// The term text, whitespace-collapsed for phrases.
    pub text: String,
    /// Whether the term was given as a quoted phrase.
    pub phrase: bool,
}

/// Query syntax an engine must understand to serve a given query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryCapabilities {
    /// Exact-phrase (`"..."`) support.
    pub quoted_phrases: bool,
    /// `site:` restriction support.
    pub site_filter: bool,
}

impl QueryCapabilities {
    /// Whether an engine with these capabilities can serve a query that
    /// requires `required`.
    pub fn supports(&self, required: &QueryCapabilities) -> bool {
        (!required.quoted_phrases || self.quoted_phrases)
            && (!required.site_filter || self.site_filter)
    }
}

/// A parsed, mode/page-annotated representation of a user's search input.
///
/// Immutable once constructed; build one with [`parse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredQuery {
    raw: String,
    terms: Vec<QueryTerm>,
    mode: SearchMode,
    page: usize,
    lang: String,
    site: Option<String>,
}

impl StructuredQuery {
    /// The raw query text as the user typed it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Ordered search terms, filters removed.
    pub fn terms(&self) -> &[QueryTerm] {
        &self.terms
    }

    /// The requested search mode.
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// The requested 1-indexed page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Two-letter language hint (from a `lang:` filter, detection, or the
    /// configured default).
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// `site:` restriction, if one was given.
    pub fn site(&self) -> Option<&str> {
        self.site.as_deref()
    }

    /// Rebuild the query string sent upstream: phrases re-quoted, `site:`
    /// appended last.
    pub fn upstream_string(&self) -> String {
        let mut out = String::new();
        for term in &self.terms {
            if !out.is_empty() {
                out.push(' ');
            }
            if term.phrase {
                out.push('"');
                out.push_str(&term.text);
                out.push('"');
            } else {
                out.push_str(&term.text);
            }
        }
        if let Some(site) = &self.site {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str("site:");
            out.push_str(site);
        }
        out
    }

    /// Query syntax an engine must support to serve this query.
    pub fn required_capabilities(&self) -> QueryCapabilities {
        QueryCapabilities {
            quoted_phrases: self.terms.iter().any(|t| t.phrase),
            site_filter: self.site.is_some(),
        }
    }
}

/// Parse a raw query into a [`StructuredQuery`].
///
/// A `"` at a word boundary opens a phrase running to the next `"` (or the
/// end of input); phrase-internal whitespace is collapsed and empty phrases
/// are dropped. A `"` inside a word is literal. `lang:`/`site:` tokens become
/// filters, last occurrence winning. When no `lang:` filter is present the
/// hint is detected from the remaining terms, falling back to `default_lang`.
///
/// # Errors
///
/// Returns [`SearchError::InvalidQuery`] when `raw` is empty after trimming,
/// when no search terms remain once filters are extracted, or when
/// `page < 1`.
pub fn parse(
    raw: &str,
    mode: SearchMode,
    page: usize,
    default_lang: &str,
) -> Result<StructuredQuery, SearchError> {
    if page < 1 {
        return Err(SearchError::InvalidQuery(
            "page numbers start at 1".into(),
        ));
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SearchError::InvalidQuery("query is empty".into()));
    }

    let mut terms = Vec::new();
    let mut lang_filter: Option<String> = None;
    let mut site_filter: Option<String> = None;

    let mut rest = trimmed;
    while !rest.is_empty() {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if let Some(opened) = rest.strip_prefix('"') {
            let (body, after) = match opened.find('"') {
                Some(end) => (&opened[..end], &opened[end + 1..]),
                None => (opened, ""),
            };
            let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
            if !collapsed.is_empty() {
                terms.push(QueryTerm {
                    text: collapsed,
                    phrase: true,
                });
            }
            rest = after;
            continue;
        }

        let end = rest
            .find(char::is_whitespace)
            .unwrap_or(rest.len());
        let word = &rest[..end];
        rest = &rest[end..];

        if let Some(code) = word.strip_prefix("lang:") {
            if !code.is_empty() {
                lang_filter = Some(code.to_lowercase());
                continue;
            }
        }
        if let Some(host) = word.strip_prefix("site:") {
            if !host.is_empty() {
                site_filter = Some(host.to_lowercase());
                continue;
            }
        }

        terms.push(QueryTerm {
            text: word.to_string(),
            phrase: false,
        });
    }

    if terms.is_empty() {
        return Err(SearchError::InvalidQuery(
            "query contains no search terms".into(),
        ));
    }

    let lang = lang_filter.unwrap_or_else(|| {
        let joined = terms
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        lang::detect(&joined)
            .unwrap_or(default_lang)
            .to_string()
    });

    Ok(StructuredQuery {
        raw: raw.to_string(),
        terms,
        mode,
        page,
        lang,
        site: site_filter,
    })
}
