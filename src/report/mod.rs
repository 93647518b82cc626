//! Crawl result data model
//!
//! The types in this module form the serialized contract consumed by the
//! dashboard and aggregation layers: a [`CrawlResult`] with its ordered
//! [`PageRecord`] list, unified [`ContactSet`], business terms, skip
//! bookkeeping, and timestamps. All of them are immutable values once the
//! crawl that produced them returns.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Why a frontier URL did not yield a [`PageRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// robots.txt disallows the URL for our user agent
    RobotsDisallowed,
    /// The request exceeded the configured timeout
    Timeout,
    /// Connection-level failure (refused, DNS, TLS)
    ConnectionError,
    /// The server answered with a non-success status
    HttpError(u16),
    /// The response was not HTML
    UnsupportedContentType,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RobotsDisallowed => write!(f, "robots_disallowed"),
            Self::Timeout => write!(f, "timeout"),
            Self::ConnectionError => write!(f, "connection_error"),
            Self::HttpError(status) => write!(f, "http_error_{}", status),
            Self::UnsupportedContentType => write!(f, "unsupported_content_type"),
        }
    }
}

impl Serialize for SkipReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Contact information extracted from one page or unified across a crawl
///
/// Emails and phones are kept as ordered sets so serialized output is
/// stable; the address is a single best-effort value and may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactSet {
    pub emails: BTreeSet<String>,
    pub phones: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ContactSet {
    /// Merges another contact set into this one
    ///
    /// Emails and phones are unioned; the first address found wins.
    pub fn merge(&mut self, other: &ContactSet) {
        self.emails.extend(other.emails.iter().cloned());
        self.phones.extend(other.phones.iter().cloned());
        if self.address.is_none() {
            self.address = other.address.clone();
        }
    }

    /// Returns true if no contact information was found
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty() && self.address.is_none()
    }
}

/// Facts extracted from one successfully fetched page
#[derive(Debug, Clone, Serialize)]
pub struct PageRecord {
    pub url: String,
    pub status: u16,
    pub title: Option<String>,
    pub description: Option<String>,
    pub text_preview: String,
    pub contacts: ContactSet,
    pub business_terms: BTreeSet<String>,
    /// Outgoing links discovered on the page, in document order
    pub links: Vec<String>,
}

/// A frontier URL that was attempted but yielded no page record
#[derive(Debug, Clone, Serialize)]
pub struct SkippedPage {
    pub url: String,
    pub reason: SkipReason,
}

/// Crawl accounting
///
/// Invariant: `succeeded + skipped == attempted`, and `attempted` never
/// exceeds the page budget.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CrawlStats {
    pub attempted: usize,
    pub succeeded: usize,
    pub skipped: usize,
}

/// Crawl start and end times
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CrawlTimestamps {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The finished result of one crawl invocation
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub base_url: String,
    pub domain: String,
    /// Page records in crawl order
    pub pages: Vec<PageRecord>,
    /// Union of contacts across all pages
    pub contacts: ContactSet,
    /// Union of business terms across all pages
    pub business_terms: BTreeSet<String>,
    pub skipped: Vec<SkippedPage>,
    pub stats: CrawlStats,
    pub timestamps: CrawlTimestamps,
}

impl CrawlResult {
    /// Creates an empty result for a crawl that is about to start
    pub fn new(base_url: &str, domain: &str) -> Self {
        let now = Utc::now();
        Self {
            base_url: base_url.to_string(),
            domain: domain.to_string(),
            pages: Vec::new(),
            contacts: ContactSet::default(),
            business_terms: BTreeSet::new(),
            skipped: Vec::new(),
            stats: CrawlStats::default(),
            timestamps: CrawlTimestamps {
                start: now,
                end: now,
            },
        }
    }

    /// Appends a successfully extracted page and folds its contacts and
    /// terms into the unified sets
    pub fn record_page(&mut self, page: PageRecord) {
        self.stats.attempted += 1;
        self.stats.succeeded += 1;
        self.contacts.merge(&page.contacts);
        self.business_terms
            .extend(page.business_terms.iter().cloned());
        self.pages.push(page);
    }

    /// Records a URL that was attempted but not turned into a page record
    pub fn record_skip(&mut self, url: &str, reason: SkipReason) {
        self.stats.attempted += 1;
        self.stats.skipped += 1;
        self.skipped.push(SkippedPage {
            url: url.to_string(),
            reason,
        });
    }

    /// Stamps the crawl end time
    pub fn finish(&mut self) {
        self.timestamps.end = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, email: &str, term: &str) -> PageRecord {
        let mut contacts = ContactSet::default();
        contacts.emails.insert(email.to_string());
        PageRecord {
            url: url.to_string(),
            status: 200,
            title: Some("T".to_string()),
            description: None,
            text_preview: String::new(),
            contacts,
            business_terms: [term.to_string()].into_iter().collect(),
            links: vec![],
        }
    }

    #[test]
    fn test_stats_balance() {
        let mut result = CrawlResult::new("https://example.com/", "example.com");
        result.record_page(page("https://example.com/", "a@example.com", "product"));
        result.record_skip("https://example.com/private", SkipReason::RobotsDisallowed);
        result.record_skip("https://example.com/slow", SkipReason::Timeout);

        assert_eq!(result.stats.attempted, 3);
        assert_eq!(result.stats.succeeded, 1);
        assert_eq!(result.stats.skipped, 2);
        assert_eq!(
            result.stats.succeeded + result.stats.skipped,
            result.stats.attempted
        );
    }

    #[test]
    fn test_unified_sets_are_unions() {
        let mut result = CrawlResult::new("https://example.com/", "example.com");
        result.record_page(page("https://example.com/", "a@example.com", "product"));
        result.record_page(page("https://example.com/about", "b@example.com", "service"));
        result.record_page(page("https://example.com/team", "a@example.com", "product"));

        assert_eq!(result.contacts.emails.len(), 2);
        assert_eq!(result.business_terms.len(), 2);
        assert_eq!(result.pages.len(), 3);
    }

    #[test]
    fn test_contact_merge_first_address_wins() {
        let mut first = ContactSet {
            address: Some("1 Main St".to_string()),
            ..Default::default()
        };
        let second = ContactSet {
            address: Some("2 Other Ave".to_string()),
            ..Default::default()
        };
        first.merge(&second);
        assert_eq!(first.address.as_deref(), Some("1 Main St"));
    }

    #[test]
    fn test_skip_reason_tags() {
        assert_eq!(SkipReason::RobotsDisallowed.to_string(), "robots_disallowed");
        assert_eq!(SkipReason::Timeout.to_string(), "timeout");
        assert_eq!(SkipReason::HttpError(404).to_string(), "http_error_404");
        assert_eq!(
            SkipReason::UnsupportedContentType.to_string(),
            "unsupported_content_type"
        );
    }

    #[test]
    fn test_result_serializes_expected_shape() {
        let mut result = CrawlResult::new("https://example.com/", "example.com");
        result.record_page(page("https://example.com/", "a@example.com", "product"));
        result.finish();

        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("base_url").is_some());
        assert!(value.get("domain").is_some());
        assert!(value["pages"].is_array());
        assert!(value["contacts"]["emails"].is_array());
        assert!(value["business_terms"].is_array());
        assert!(value["stats"]["attempted"].is_number());
        assert!(value["timestamps"]["start"].is_string());
    }
}
