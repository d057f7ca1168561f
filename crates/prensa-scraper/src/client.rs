use std::time::Duration;

use rand::seq::IndexedRandom;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::Client;

use prensa_core::{AppConfig, SiteDescriptor};

use crate::error::ScrapeError;
use crate::retry::retry_with_backoff;

/// Browser-like User-Agents rotated across requests so a run does not
/// present a single fingerprint to every upstream.
const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15",
];

/// HTTP client for sitemap, feed, and article-page fetches.
///
/// Handles rate limiting (429), not-found (404), and other non-2xx responses
/// as typed errors. Transient errors (429, network failures) are
/// automatically retried with exponential backoff up to `max_retries`
/// additional attempts. Per-site header overrides and User-Agent rotation
/// are applied on every request.
pub struct PageClient {
    client: Client,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl PageClient {
    /// Creates a `PageClient` with the given timeout and retry policy.
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure for retriable errors. Set to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Creates a client for one site, honoring its `request_timeout_secs`
    /// override over the process-wide default.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the client cannot be constructed.
    pub fn for_site(config: &AppConfig, site: &SiteDescriptor) -> Result<Self, ScrapeError> {
        let timeout = site
            .request_timeout_secs
            .unwrap_or(config.request_timeout_secs);
        Self::new(timeout, config.max_retries, config.retry_backoff_base_secs)
    }

    /// Fetches `url` and returns the decoded response body, with automatic
    /// retry on transient errors.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`ScrapeError::NotFound`] — HTTP 404 (not retried).
    /// - [`ScrapeError::UnexpectedStatus`] — any other non-2xx status (not retried).
    /// - [`ScrapeError::Http`] — network or TLS failure after all retries exhausted.
    pub async fn fetch_text(
        &self,
        url: &str,
        site: &SiteDescriptor,
    ) -> Result<String, ScrapeError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async {
            let response = self.send(url, site).await?;
            Ok(response.text().await?)
        })
        .await
    }

    /// Fetches `url` and returns the raw response bytes. Used for feeds
    /// that need a forced-UTF-8 re-parse and for `.gz` sitemap bodies.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`PageClient::fetch_text`].
    pub async fn fetch_bytes(
        &self,
        url: &str,
        site: &SiteDescriptor,
    ) -> Result<Vec<u8>, ScrapeError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async {
            let response = self.send(url, site).await?;
            Ok(response.bytes().await?.to_vec())
        })
        .await
    }

    /// Sends one GET with rotated User-Agent and site header overrides,
    /// converting non-2xx statuses into typed errors.
    async fn send(
        &self,
        url: &str,
        site: &SiteDescriptor,
    ) -> Result<reqwest::Response, ScrapeError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, pick_user_agent(site))
            .headers(site_headers(site))
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ScrapeError::RateLimited {
                domain: site.domain(),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScrapeError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response)
    }
}

/// The site's fixed User-Agent when configured, else one from the pool.
fn pick_user_agent(site: &SiteDescriptor) -> String {
    site.user_agent.clone().unwrap_or_else(|| {
        USER_AGENTS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(USER_AGENTS[0])
            .to_owned()
    })
}

/// Builds the per-site extra header map, skipping entries that are not
/// valid HTTP header names/values rather than failing the request.
fn site_headers(site: &SiteDescriptor) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in &site.headers {
        let Ok(name) = name.parse::<HeaderName>() else {
            tracing::debug!(site = %site.name, header = %name, "skipping invalid header name");
            continue;
        };
        let Ok(value) = HeaderValue::from_str(value) else {
            tracing::debug!(site = %site.name, header = %name, "skipping invalid header value");
            continue;
        };
        headers.insert(name, value);
    }
    headers
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
