//! URL frontier for managing pending and visited pages
//!
//! The frontier holds the URLs known but not yet fetched, in FIFO order to
//! approximate a breadth-first traversal, plus the set of every URL it has
//! ever admitted. Scope is fixed at seed time: a URL outside the seed's
//! registrable domain is counted but never enqueued, and total admissions
//! are capped by the page budget so the crawl loop always terminates.

use crate::url::{normalize_url, registrable_domain, same_site};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// FIFO frontier with dedup, domain scoping, and a budget cap
#[derive(Debug)]
pub struct UrlFrontier {
    /// Registrable domain that scopes the crawl, fixed at seed time
    scope: String,
    /// Maximum number of URLs ever admitted (pending plus visited)
    budget: usize,
    pending: VecDeque<Url>,
    /// Normalized URLs admitted so far; checked before every enqueue
    seen: HashSet<String>,
    visited: HashSet<String>,
    off_domain: usize,
}

impl UrlFrontier {
    /// Creates a frontier seeded with the crawl's start URL
    ///
    /// The seed establishes the domain scope for the whole crawl; it never
    /// changes afterwards. The seed URL itself is the first pending entry.
    ///
    /// # Arguments
    ///
    /// * `seed` - The normalized start URL
    /// * `budget` - Maximum number of URLs to admit over the crawl
    pub fn seed(seed: &Url, budget: usize) -> Self {
        let scope = registrable_domain(seed).unwrap_or_default();

        let mut frontier = Self {
            scope,
            budget,
            pending: VecDeque::new(),
            seen: HashSet::new(),
            visited: HashSet::new(),
            off_domain: 0,
        };
        frontier.enqueue(seed);
        frontier
    }

    /// Offers a URL to the frontier
    ///
    /// The URL is normalized first, so spellings differing only by
    /// fragment or trailing slash collapse to one entry. It is rejected
    /// silently when it is off-domain, already seen, or the budget is
    /// exhausted; off-domain discoveries are counted but never treated as
    /// an error.
    ///
    /// # Returns
    ///
    /// `true` if the URL was admitted to the pending queue
    pub fn enqueue(&mut self, url: &Url) -> bool {
        let normalized = match normalize_url(url.as_str()) {
            Ok(u) => u,
            Err(e) => {
                tracing::debug!("Not enqueuing {}: {}", url, e);
                return false;
            }
        };

        if !same_site(&normalized, &self.scope) {
            self.off_domain += 1;
            tracing::trace!("Off-domain link not followed: {}", normalized);
            return false;
        }

        let key = normalized.as_str().to_string();
        if self.seen.contains(&key) {
            return false;
        }

        // Budget check must precede insertion: once pending + visited
        // reaches the budget, nothing more is admitted
        if self.seen.len() >= self.budget {
            tracing::trace!("Budget reached, not enqueuing {}", normalized);
            return false;
        }

        self.seen.insert(key);
        self.pending.push_back(normalized);
        true
    }

    /// Dequeues the next URL in FIFO order
    pub fn next(&mut self) -> Option<Url> {
        self.pending.pop_front()
    }

    /// Marks a URL as visited; idempotent
    pub fn mark_visited(&mut self, url: &Url) {
        self.visited.insert(url.as_str().to_string());
    }

    /// The registrable domain that scopes this crawl
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Number of URLs waiting to be fetched
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of URLs already visited
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Number of off-domain links that were discovered but not followed
    pub fn off_domain_discoveries(&self) -> usize {
        self.off_domain
    }
}
