//! Configuration module for ProfileBot
//!
//! Handles loading, parsing, and validating TOML configuration files, and
//! turning crawler settings plus a seed URL into the immutable
//! [`CrawlTarget`] handed to the engine.
//!
//! # Example
//!
//! ```no_run
//! use profilebot::config::{load_config, CrawlTarget};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("profilebot.toml")).unwrap();
//! let target = CrawlTarget::from_config("https://example.com", &config.crawler).unwrap();
//! ```

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{
    default_vocabulary, AggregatorConfig, Config, CrawlTarget, CrawlerConfig, StorageConfig,
};
