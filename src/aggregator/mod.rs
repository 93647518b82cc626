//! Multi-source company info aggregator
//!
//! Fetches a list of source URLs one after another, extracts a field map
//! from each with the strategy its [`SourceKind`] selects, and compiles a
//! unified profile by first-wins priority across a fixed field list. A
//! source that fails to fetch is skipped; aggregation itself never fails.

mod extract;
mod sources;

pub use extract::{extract_fields, FieldMap};
pub use sources::SourceKind;

use crate::config::AggregatorConfig;
use crate::crawler::{build_http_client, page_text};
use crate::ProfilerError;
use reqwest::Client;
use scraper::Html;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Profile fields compiled across sources, in priority order
const PROFILE_FIELDS: &[&str] = &[
    "summary",
    "description",
    "business_summary",
    "founded",
    "founders",
    "ceo",
    "industry",
    "headquarters",
    "revenue",
    "market_cap",
    "employees",
    "total_funding",
];

/// What one source contributed
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: SourceKind,
    pub url: String,
    pub fields: FieldMap,
}

/// The aggregated company profile
#[derive(Debug, Clone, Serialize)]
pub struct CompanyProfile {
    pub company_name: String,
    pub sources: Vec<SourceReport>,
    /// Unified fields, first-wins across sources in query order
    pub profile: BTreeMap<String, String>,
}

/// Aggregates company information from multiple web sources
pub struct CompanyAggregator {
    client: Client,
    company_name: String,
}

impl CompanyAggregator {
    /// Creates an aggregator for one company
    pub fn new(company_name: &str, config: &AggregatorConfig) -> Result<Self, ProfilerError> {
        let client =
            build_http_client(&config.user_agent, Duration::from_secs(config.timeout_secs))?;

        Ok(Self {
            client,
            company_name: company_name.to_string(),
        })
    }

    /// Fetches each URL in turn and compiles the unified profile
    ///
    /// Sources are queried sequentially; a fetch failure drops that source
    /// with a warning and the remaining sources are still consulted.
    pub async fn aggregate(&self, urls: &[String]) -> CompanyProfile {
        let mut reports = Vec::new();

        for raw_url in urls {
            let url = match Url::parse(raw_url) {
                Ok(u) => u,
                Err(e) => {
                    tracing::warn!("Skipping source with invalid URL {}: {}", raw_url, e);
                    continue;
                }
            };

            let kind = SourceKind::detect(&url);
            tracing::info!("Fetching {}: {}", kind, url);

            let body = match self.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("Error fetching {}: {}", kind, e);
                    continue;
                }
            };

            let document = Html::parse_document(&body);
            let text = page_text(&document);
            let fields = extract_fields(kind, &document, &text);

            reports.push(SourceReport {
                source: kind,
                url: url.to_string(),
                fields,
            });
        }

        let profile = compile_profile(&reports);

        CompanyProfile {
            company_name: self.company_name.clone(),
            sources: reports,
            profile,
        }
    }

    async fn fetch(&self, url: &Url) -> Result<String, reqwest::Error> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        response.text().await
    }
}

/// Compiles the unified profile: for each known field, the first source
/// that provided a non-empty value wins
fn compile_profile(reports: &[SourceReport]) -> BTreeMap<String, String> {
    let mut profile = BTreeMap::new();

    for field in PROFILE_FIELDS {
        for report in reports {
            if let Some(value) = report.fields.get(*field) {
                if !value.is_empty() {
                    profile.insert(field.to_string(), value.clone());
                    break;
                }
            }
        }
    }

    profile
}

/// Default source URLs derived from the company name
///
/// Used when the caller does not supply an explicit URL list.
pub fn default_source_urls(company_name: &str) -> Vec<String> {
    let slug = company_name.to_lowercase().replace(' ', "-");
    let bare = company_name.to_lowercase().replace(' ', "");

    vec![
        format!("https://{}.com", bare),
        format!(
            "https://finance.yahoo.com/quote/{}",
            company_name.to_uppercase().replace(' ', "")
        ),
        format!("https://www.crunchbase.com/organization/{}", slug),
        format!("https://en.wikipedia.org/wiki/{}", company_name.replace(' ', "_")),
        format!("https://www.importyeti.com/company/{}", slug),
    ]
}

/// Aggregates company information in one call
///
/// Convenience wrapper: builds the aggregator, fills in default source
/// URLs when none are given, and returns the compiled profile.
pub async fn aggregate_company_info(
    company_name: &str,
    urls: Option<Vec<String>>,
    config: &AggregatorConfig,
) -> Result<CompanyProfile, ProfilerError> {
    let aggregator = CompanyAggregator::new(company_name, config)?;
    let urls = urls.unwrap_or_else(|| default_source_urls(company_name));
    Ok(aggregator.aggregate(&urls).await)
}
