//! Source identification for the aggregator
//!
//! Each supported information source is a variant of a closed enum; the
//! variant is derived from the URL host and selects the extraction
//! strategy applied to that source's page.

use serde::Serialize;
use std::fmt;
use url::Url;

/// The kind of information source behind a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourceKind {
    Wikipedia,
    YahooFinance,
    Crunchbase,
    Sec,
    BuiltWith,
    ImportYeti,
    /// Anything we have no dedicated strategy for, including the
    /// company's own website
    Custom,
}

impl SourceKind {
    /// Identifies the source behind a URL from its host
    pub fn detect(url: &Url) -> Self {
        let host = url.host_str().unwrap_or("").to_lowercase();

        if host_matches(&host, "wikipedia.org") {
            Self::Wikipedia
        } else if host_matches(&host, "yahoo.com") {
            Self::YahooFinance
        } else if host_matches(&host, "crunchbase.com") {
            Self::Crunchbase
        } else if host_matches(&host, "sec.gov") {
            Self::Sec
        } else if host_matches(&host, "builtwith.com") {
            Self::BuiltWith
        } else if host_matches(&host, "importyeti.com") {
            Self::ImportYeti
        } else {
            Self::Custom
        }
    }
}

/// True when `host` is `domain` or one of its subdomains
fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Wikipedia => "wikipedia",
            Self::YahooFinance => "yahoo_finance",
            Self::Crunchbase => "crunchbase",
            Self::Sec => "sec",
            Self::BuiltWith => "builtwith",
            Self::ImportYeti => "importyeti",
            Self::Custom => "custom",
        };
        write!(f, "{}", name)
    }
}

impl Serialize for SourceKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
