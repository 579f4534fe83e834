//! Core types: engine identifiers, search modes, raw and merged results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream search providers tributary can query.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum EngineId {
    /// DuckDuckGo — HTML endpoint for web results, Instant Answer API for answers.
    DuckDuckGo,
    /// Bing — web and image results from Microsoft's index.
    Bing,
    /// Alexandria — independent open index with a plain JSON API.
    Alexandria,
}

impl EngineId {
    /// Returns the human-readable name of this engine.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DuckDuckGo => "DuckDuckGo",
            Self::Bing => "Bing",
            Self::Alexandria => "Alexandria",
        }
    }

    /// Returns the ranking weight for this engine.
    /// Scores from heavier engines count for more in the aggregated rating.
    pub fn weight(&self) -> f64 {
        match self {
            Self::DuckDuckGo => 1.0,
            Self::Bing => 0.8,
            Self::Alexandria => 0.7,
        }
    }

    /// Returns all available engine variants.
    pub fn all() -> &'static [EngineId] {
        &[Self::DuckDuckGo, Self::Bing, Self::Alexandria]
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which type of results a search should return.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SearchMode {
    /// Ordinary web page results.
    Web,
    /// Image results with a source URL per hit.
    Images,
    /// Direct answers (instant-answer style) rather than page links.
    Answer,
}

impl SearchMode {
    /// Returns the lowercase name of this mode.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Images => "images",
            Self::Answer => "answer",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Relevance score an adapter assigns to the result at `rank` in its list.
///
/// Position decay: the top hit scores 10, each further position divides by
/// 1.25. Always positive, strictly decreasing in `rank`.
pub fn position_score(rank: usize) -> f64 {
    10.0 * 1.25_f64.powi(-(rank as i32))
}

/// A single hit as reported by one engine, before merging.
///
/// Owned by the dispatcher until handed to the merger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawResult {
    /// Which engine reported this hit.
    pub engine: EngineId,
    /// 0-based position in that engine's result list.
    pub rank: usize,
    /// Engine-assigned relevance score (see [`position_score`]).
    pub score: f64,
    /// The result URL as the engine reported it.
    pub url: String,
    /// The result title.
    pub title: String,
    /// Body text / snippet, when the engine provides one.
    pub text: Option<String>,
    /// Image source URL (images mode).
    pub src: Option<String>,
    /// Direct answer text (answer mode).
    pub answer: Option<String>,
}

impl RawResult {
    /// Construct a web result at the given rank with the standard
    /// position-decay score.
    pub fn web(engine: EngineId, rank: usize, url: String, title: String) -> Self {
        Self {
            engine,
            rank,
            score: position_score(rank),
            url,
            title,
            text: None,
            src: None,
            answer: None,
        }
    }
}

/// One deduplicated, rated entity produced by the merger.
///
/// Immutable after creation; consumed only by the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct MergedResult {
    /// Display URL — the best contributor's URL, upgraded to https when any
    /// contributor saw an https variant.
    pub url: String,
    /// The result title.
    pub title: String,
    /// Body text / snippet (mode-dependent).
    pub text: Option<String>,
    /// Image source URL (mode-dependent).
    pub src: Option<String>,
    /// Direct answer text (mode-dependent).
    pub answer: Option<String>,
    /// Aggregated rating (higher is better); rewards cross-engine agreement.
    pub rating: f64,
    /// Engines that contributed this entity. Unique, sorted for display.
    pub engines: Vec<EngineId>,
}
