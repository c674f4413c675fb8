//! Error taxonomy for the crawl pipeline.
//!
//! Errors are contained at the smallest unit of work: a failed page fetch
//! degrades to an empty listing or a sentinel summary, a failed sink write
//! is reported as a warning, and only a malformed category configuration
//! aborts a run before any network activity.

use thiserror::Error;

/// Failure of a single page fetch.
///
/// A fetch error is final for that call; no retries are performed. Callers
/// handle it by substituting an empty or sentinel result for the affected
/// item, never by aborting sibling work.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,
    /// The site rejected the request (HTTP 403, 429, or 503). The response
    /// body, if any, must not be parsed.
    #[error("request blocked with status {0}")]
    Blocked(u16),
    /// Transport-level failure: DNS, connection reset, TLS, and similar.
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// Failure to persist a crawl result.
///
/// Surfaced to the caller as a partial-success outcome; the in-memory
/// [`crate::models::CrawlResult`] is never invalidated by a sink error.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sink serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Invalid crawl configuration. The only fatal error in the pipeline,
/// reported before any network activity.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("no categories configured; nothing to crawl")]
    NoCategories,
    #[error("category entry has an empty key or url")]
    EmptyEntry,
    #[error("duplicate category key: {0}")]
    DuplicateKey(String),
}
