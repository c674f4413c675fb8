//! HTTP page fetching with a browser-like header set.
//!
//! The target site rejects obviously robotic traffic, so every request
//! carries a realistic desktop User-Agent, language and accept headers, and
//! a search-engine referer. One [`reqwest::Client`] is shared across all
//! fetches so connection pooling applies across a whole crawl.
//!
//! A fetch either succeeds with the page body, is classified as blocked
//! (HTTP 403/429/503 — the body must not be parsed), or fails at the
//! transport level. No retries are performed; a single failure is final for
//! that call and is degraded by the caller, never propagated as fatal.

use crate::error::FetchError;
use reqwest::StatusCode;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONNECTION, DNT, HeaderMap, HeaderValue, REFERER, USER_AGENT,
};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Statuses the target site uses for bot rejection.
const BLOCKED_STATUSES: [StatusCode; 3] = [
    StatusCode::FORBIDDEN,
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::SERVICE_UNAVAILABLE,
];

/// A successfully fetched page: the request URL and the raw HTML body.
#[derive(Debug, Clone)]
pub struct RawPage {
    /// The URL the page was fetched from.
    pub url: String,
    /// The raw HTML body.
    pub html: String,
}

/// Shared HTTP fetcher for listing and article pages.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    /// Build a fetcher with the fixed header set and the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
            ),
        );
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(DNT, HeaderValue::from_static("1"));
        headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch one page with a single GET request.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Timeout`] when the configured timeout elapses
    /// - [`FetchError::Blocked`] for HTTP 403, 429, or 503
    /// - [`FetchError::Transport`] for DNS, connection, TLS, or any other
    ///   non-success status
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if BLOCKED_STATUSES.contains(&status) {
            warn!(%url, status = status.as_u16(), "Request blocked by target site");
            return Err(FetchError::Blocked(status.as_u16()));
        }
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Unexpected response status");
            return Err(FetchError::Transport(format!(
                "unexpected status {status} for {url}"
            )));
        }

        let html = response.text().await?;
        debug!(%url, bytes = html.len(), "Fetched page");
        Ok(RawPage {
            url: url.to_string(),
            html,
        })
    }
}
