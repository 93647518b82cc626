//! ProfileBot: a company website profiler
//!
//! This crate crawls a single company website into a structured profile
//! (contacts, business terms, page metadata) while respecting robots.txt,
//! same-domain scope, and rate limits, and aggregates company facts from a
//! fixed set of public sources.

pub mod aggregator;
pub mod config;
pub mod crawler;
pub mod report;
pub mod robots;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for ProfileBot operations
#[derive(Debug, Error)]
pub enum ProfilerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// These are the only fatal errors a crawl raises; everything that happens
/// after validation is absorbed into the crawl result's skip bookkeeping.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for ProfileBot operations
pub type Result<T> = std::result::Result<T, ProfilerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, CrawlTarget};
pub use crawler::{crawl, CrawlEngine};
pub use report::{ContactSet, CrawlResult, CrawlStats, PageRecord, SkipReason};
pub use url::{normalize_url, registrable_domain};
