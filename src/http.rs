//! Shared HTTP client and error classification for engine requests.
//!
//! Provides a configured [`reqwest::Client`] with browser-like headers,
//! cookie support, and rotating User-Agent strings, plus the mapping from
//! transport-level failures onto the [`EngineError`] taxonomy.

use rand::seq::SliceRandom;
use reqwest::StatusCode;

use crate::config::SearchConfig;
use crate::error::EngineError;

/// Realistic browser User-Agent strings, rotated per request.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Build a [`reqwest::Client`] configured for engine requests.
///
/// The client has:
/// - Cookie store enabled (consent pages, etc.)
/// - Request timeout matching the per-engine budget
/// - Random User-Agent from the rotation list (or custom if configured)
/// - Brotli and gzip decompression
///
/// # Errors
///
/// Returns [`EngineError::Transport`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, EngineError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => random_user_agent().to_owned(),
    };

    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(config.per_engine_timeout)
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| EngineError::Transport(format!("failed to build HTTP client: {e}")))
}

/// Select a random User-Agent string from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Classify a [`reqwest::Error`] into the engine error taxonomy.
///
/// Client-side timeouts become [`EngineError::Timeout`]; everything else at
/// this layer is a transport failure.
pub fn classify(err: &reqwest::Error) -> EngineError {
    if err.is_timeout() {
        EngineError::Timeout(err.to_string())
    } else {
        EngineError::Transport(err.to_string())
    }
}

/// Classify a non-success HTTP status.
///
/// 403 and 429 are treated as the engine actively refusing the request
/// (bot detection / rate limiting); other non-2xx statuses are transport
/// failures.
///
/// # Errors
///
/// Returns the classification when `status` is not a success code.
pub fn check_status(status: StatusCode) -> Result<(), EngineError> {
    if status.is_success() {
        return Ok(());
    }
    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        return Err(EngineError::Blocked(format!("HTTP {status}")));
    }
    Err(EngineError::Transport(format!("HTTP {status}")))
}
