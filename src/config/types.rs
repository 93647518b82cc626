use crate::url::{normalize_url, registrable_domain};
use crate::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Main configuration structure for ProfileBot
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub aggregator: AggregatorConfig,
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            aggregator: AggregatorConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages to fetch in one crawl
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Minimum time between requests, in seconds
    #[serde(rename = "delay-secs")]
    pub delay_secs: f64,

    /// Whether to honor robots.txt
    #[serde(rename = "respect-robots")]
    pub respect_robots: bool,

    /// User-agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Business-term vocabulary matched against page text
    pub vocabulary: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            timeout_secs: 30,
            delay_secs: 1.0,
            respect_robots: true,
            user_agent: "CompanyProfileBot/1.0".to_string(),
            vocabulary: default_vocabulary(),
        }
    }
}

/// Aggregator behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// User-agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "CompanyProfileBot/1.0".to_string(),
        }
    }
}

/// Result persistence configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory where JSON records are written
    #[serde(rename = "data-dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

/// Business terms looked for on every page when the config does not
/// provide its own vocabulary
pub fn default_vocabulary() -> Vec<String> {
    [
        "product",
        "service",
        "solution",
        "technology",
        "platform",
        "mission",
        "vision",
        "value",
        "innovation",
        "customer",
        "industry",
        "market",
        "enterprise",
        "cloud",
        "software",
        "data",
        "analytics",
        "AI",
        "machine learning",
        "automation",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Everything one crawl invocation needs to know, validated up front
///
/// A `CrawlTarget` is immutable for the duration of the crawl; the engine
/// never consults process-wide settings.
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    base_url: Url,
    domain: String,
    max_pages: usize,
    timeout: Duration,
    delay: Duration,
    user_agent: String,
    respect_robots: bool,
    vocabulary: Vec<String>,
}

impl CrawlTarget {
    /// Builds a validated crawl target from a seed URL and crawler settings
    ///
    /// This is the only place a crawl can fail hard: an unparseable or
    /// host-less seed URL or a zero page budget is rejected here, before
    /// any network activity.
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidUrl` - The seed URL is malformed, uses an
    ///   unsupported scheme, or has no host
    /// * `ConfigError::Validation` - The page budget is zero
    pub fn from_config(seed_url: &str, config: &CrawlerConfig) -> Result<Self, ConfigError> {
        let base_url = normalize_url(seed_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed_url, e)))?;

        let domain = registrable_domain(&base_url).ok_or_else(|| {
            ConfigError::InvalidUrl(format!("Seed URL '{}' has no host", seed_url))
        })?;

        if config.max_pages == 0 {
            return Err(ConfigError::Validation(
                "max_pages must be at least 1".to_string(),
            ));
        }

        if config.delay_secs < 0.0 || !config.delay_secs.is_finite() {
            return Err(ConfigError::Validation(format!(
                "delay_secs must be a non-negative number, got {}",
                config.delay_secs
            )));
        }

        Ok(Self {
            base_url,
            domain,
            max_pages: config.max_pages,
            timeout: Duration::from_secs(config.timeout_secs),
            delay: Duration::from_secs_f64(config.delay_secs),
            user_agent: config.user_agent.clone(),
            respect_robots: config.respect_robots,
            vocabulary: config.vocabulary.clone(),
        })
    }

    /// The normalized seed URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The registrable domain that scopes the crawl
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The page budget
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Minimum pause between fetches
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn respect_robots(&self) -> bool {
        self.respect_robots
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }
}
