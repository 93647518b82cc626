//! Rate-limited HTTP fetcher
//!
//! One GET per page with the configured timeout and user agent, serialized
//! by the politeness delay: the next request never starts sooner than
//! `delay` after the previous one completed. The crawl targets one host,
//! so this global serialization doubles as per-host throttling. Failures
//! are classified, never retried; the engine decides what a failure means.

use crate::report::SkipReason;
use reqwest::Client;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

/// A classified fetch failure
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("unsupported content type: {0}")]
    ContentType(String),
}

impl FetchError {
    /// Maps the failure onto the crawl result's skip taxonomy
    pub fn skip_reason(&self) -> SkipReason {
        match self {
            Self::Timeout => SkipReason::Timeout,
            Self::Connection(_) => SkipReason::ConnectionError,
            Self::HttpStatus(status) => SkipReason::HttpError(*status),
            Self::ContentType(_) => SkipReason::UnsupportedContentType,
        }
    }
}

/// A successfully fetched HTML page
#[derive(Debug)]
pub struct FetchOutcome {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
    /// Content-Type header value
    pub content_type: String,
    /// Final URL after redirects
    pub final_url: Url,
    /// Wall-clock time the request took
    pub elapsed: Duration,
}

/// Builds the HTTP client shared by one crawl invocation
///
/// Sets the user-agent header, per-request timeout, and a connect timeout;
/// redirects are followed (reqwest's default policy).
///
/// # Arguments
///
/// * `user_agent` - Value of the User-Agent header
/// * `timeout` - Total per-request timeout
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages one at a time with a mandatory pause between requests
#[derive(Debug)]
pub struct PageFetcher {
    client: Client,
    delay: Duration,
    last_completed: Option<Instant>,
}

impl PageFetcher {
    /// Creates a fetcher around an already-configured client
    pub fn new(client: Client, delay: Duration) -> Self {
        Self {
            client,
            delay,
            last_completed: None,
        }
    }

    /// The underlying HTTP client (shared with the robots.txt fetch)
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Current politeness delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Stretches the politeness delay (e.g. to a robots.txt Crawl-delay)
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Performs one rate-limited GET
    ///
    /// Waits out the remainder of the politeness delay, issues the
    /// request, and classifies the outcome. A response whose Content-Type
    /// names a non-HTML type is rejected without reading the body.
    ///
    /// # Returns
    ///
    /// * `Ok(FetchOutcome)` - 2xx HTML response with its body
    /// * `Err(FetchError)` - Classified failure; the fetch is not retried
    pub async fn fetch(&mut self, url: &Url) -> Result<FetchOutcome, FetchError> {
        if let Some(completed) = self.last_completed {
            let since = completed.elapsed();
            if since < self.delay {
                tokio::time::sleep(self.delay - since).await;
            }
        }

        let started = Instant::now();
        let result = self.request(url).await;
        self.last_completed = Some(Instant::now());

        result.map(|mut outcome| {
            outcome.elapsed = started.elapsed();
            outcome
        })
    }

    async fn request(&self, url: &Url) -> Result<FetchOutcome, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        // A missing Content-Type header is given the benefit of the doubt
        if !content_type.is_empty() && !content_type.contains("html") {
            return Err(FetchError::ContentType(content_type));
        }

        let body = response.text().await.map_err(classify_request_error)?;

        Ok(FetchOutcome {
            status: status.as_u16(),
            body,
            content_type,
            final_url,
            elapsed: Duration::ZERO,
        })
    }
}

/// Classifies a reqwest error into the fetch failure taxonomy
fn classify_request_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Connection("connection refused or unreachable".to_string())
    } else {
        FetchError::Connection(e.to_string())
    }
}
