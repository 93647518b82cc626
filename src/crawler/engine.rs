//! Crawl engine - main traversal orchestration
//!
//! The engine owns the crawl loop: it pulls URLs from the frontier,
//! consults the robots policy, drives the rate-limited fetcher and the
//! extractor, feeds discovered links back into the frontier, and
//! accumulates the final [`CrawlResult`]. Every per-page failure is
//! absorbed into the result's skip bookkeeping; once an engine has been
//! constructed, running it always yields a usable (possibly partial)
//! result.

use crate::config::CrawlTarget;
use crate::crawler::extractor::extract;
use crate::crawler::fetcher::{build_http_client, PageFetcher};
use crate::crawler::frontier::UrlFrontier;
use crate::report::{CrawlResult, PageRecord, SkipReason};
use crate::robots::RobotsPolicy;
use crate::ProfilerError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Orchestrates one crawl invocation
///
/// Each engine owns its frontier and result exclusively; independent
/// crawls can run concurrently with no shared state.
pub struct CrawlEngine {
    target: CrawlTarget,
    fetcher: PageFetcher,
    frontier: UrlFrontier,
    cancel: CancellationToken,
}

impl CrawlEngine {
    /// Creates an engine for a validated crawl target
    ///
    /// Builds the HTTP client and seeds the frontier; no network activity
    /// happens until [`run`](Self::run) is called.
    pub fn new(target: CrawlTarget) -> Result<Self, ProfilerError> {
        let client = build_http_client(target.user_agent(), target.timeout())?;
        let fetcher = PageFetcher::new(client, target.delay());
        let frontier = UrlFrontier::seed(target.base_url(), target.max_pages());

        Ok(Self {
            target,
            fetcher,
            frontier,
            cancel: CancellationToken::new(),
        })
    }

    /// A token the caller can use to abort the crawl between iterations
    ///
    /// Cancellation is checked once per loop iteration; the engine then
    /// returns the partial result instead of discarding progress.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the crawl to completion
    ///
    /// Terminates when the frontier is exhausted, the page budget is
    /// spent, or the cancellation token fires. Always returns a finished
    /// result; per-page failures are recorded as skips, never raised.
    pub async fn run(&mut self) -> CrawlResult {
        let base_url = self.target.base_url().clone();
        let mut result = CrawlResult::new(base_url.as_str(), self.target.domain());

        tracing::info!(
            "Starting crawl of {} (budget: {} pages)",
            base_url,
            self.target.max_pages()
        );

        let robots = RobotsPolicy::fetch(
            self.fetcher.client(),
            &base_url,
            self.target.user_agent(),
            self.target.respect_robots(),
        )
        .await;

        // A site asking for a longer pause than we planned gets it
        if let Some(seconds) = robots.crawl_delay() {
            let requested = Duration::from_secs_f64(seconds.max(0.0));
            if requested > self.fetcher.delay() {
                tracing::info!("Honoring robots.txt crawl-delay of {}s", seconds);
                self.fetcher.set_delay(requested);
            }
        }

        loop {
            if self.cancel.is_cancelled() {
                tracing::info!("Crawl cancelled, returning partial result");
                break;
            }

            let url = match self.frontier.next() {
                Some(url) => url,
                None => break,
            };

            self.visit(&url, &robots, &mut result).await;
            self.frontier.mark_visited(&url);
        }

        result.finish();

        tracing::info!(
            "Crawl complete: {} pages, {} skipped, {} off-domain links seen",
            result.stats.succeeded,
            result.stats.skipped,
            self.frontier.off_domain_discoveries()
        );

        result
    }

    /// Processes a single frontier URL
    ///
    /// A failure here affects only this page: it is recorded as a skip
    /// and the traversal moves on.
    async fn visit(&mut self, url: &Url, robots: &RobotsPolicy, result: &mut CrawlResult) {
        if !robots.allows(url) {
            tracing::info!("Skipping {} (blocked by robots.txt)", url);
            result.record_skip(url.as_str(), SkipReason::RobotsDisallowed);
            return;
        }

        tracing::info!("Crawling: {}", url);

        let outcome = match self.fetcher.fetch(url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Fetch failed for {}: {}", url, e);
                result.record_skip(url.as_str(), e.skip_reason());
                return;
            }
        };

        tracing::debug!(
            "Fetched {} ({} bytes in {:?})",
            url,
            outcome.body.len(),
            outcome.elapsed
        );

        let facts = extract(url, &outcome.body, self.target.vocabulary());

        for link in &facts.links {
            self.frontier.enqueue(link);
        }

        result.record_page(PageRecord {
            url: url.as_str().to_string(),
            status: outcome.status,
            title: facts.title,
            description: facts.description,
            text_preview: facts.text_preview,
            contacts: facts.contacts,
            business_terms: facts.business_terms,
            links: facts.links.iter().map(|l| l.as_str().to_string()).collect(),
        });
    }
}

/// Crawls a company website into a structured profile
///
/// This is the single entry point callers use: it validates nothing
/// itself (the [`CrawlTarget`] already did), runs the engine, and hands
/// back the finished result.
///
/// # Example
///
/// ```no_run
/// use profilebot::config::{CrawlTarget, CrawlerConfig};
/// use profilebot::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CrawlerConfig::default();
/// let target = CrawlTarget::from_config("https://example.com", &config)?;
/// let result = crawl(target).await?;
/// println!("Crawled {} pages", result.pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(target: CrawlTarget) -> Result<CrawlResult, ProfilerError> {
    let mut engine = CrawlEngine::new(target)?;
    Ok(engine.run().await)
}
