//! ProfileBot main entry point
//!
//! Command-line interface for crawling a company website, aggregating
//! company information from public sources, or both.

use anyhow::Context;
use clap::{Parser, Subcommand};
use profilebot::aggregator::aggregate_company_info;
use profilebot::config::{load_config, Config, CrawlTarget};
use profilebot::crawler::crawl;
use profilebot::storage::{profile_key, website_key, JsonStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// ProfileBot: a company website profiler
///
/// Crawls company websites politely (robots.txt, same-domain scope, rate
/// limits) and aggregates company facts from public sources into JSON
/// profiles.
#[derive(Parser, Debug)]
#[command(name = "profilebot")]
#[command(version, about = "Company website profiler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply if omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a company website
    Crawl {
        /// Company website URL
        url: String,

        /// Maximum number of pages to crawl
        #[arg(long)]
        max_pages: Option<usize>,

        /// Ignore robots.txt for this crawl
        #[arg(long)]
        no_robots: bool,
    },

    /// Aggregate company info from public sources
    Aggregate {
        /// Company name
        company: String,

        /// Custom source URLs (defaults derived from the company name)
        #[arg(long, num_args = 1..)]
        urls: Option<Vec<String>>,
    },

    /// Run both the crawler and the aggregator
    Both {
        /// Company name
        company: String,

        /// Company website URL
        url: String,

        /// Maximum number of pages to crawl
        #[arg(long)]
        max_pages: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).context("failed to load configuration")?
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Crawl {
            url,
            max_pages,
            no_robots,
        } => {
            handle_crawl(&config, &url, max_pages, no_robots).await?;
        }
        Command::Aggregate { company, urls } => {
            handle_aggregate(&config, &company, urls).await?;
        }
        Command::Both {
            company,
            url,
            max_pages,
        } => {
            handle_crawl(&config, &url, max_pages, false).await?;
            handle_aggregate(&config, &company, None).await?;
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("profilebot=info,warn"),
            1 => EnvFilter::new("profilebot=debug,info"),
            2 => EnvFilter::new("profilebot=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Crawls a website and persists the result
async fn handle_crawl(
    config: &Config,
    url: &str,
    max_pages: Option<usize>,
    no_robots: bool,
) -> anyhow::Result<()> {
    let mut crawler_config = config.crawler.clone();
    if let Some(max_pages) = max_pages {
        crawler_config.max_pages = max_pages;
    }
    if no_robots {
        crawler_config.respect_robots = false;
    }

    let target = CrawlTarget::from_config(url, &crawler_config)?;
    let result = crawl(target).await?;

    let store = JsonStore::new(&config.storage.data_dir);
    let path = store.save(&website_key(&result.domain), &result)?;

    println!("Crawled {} pages from {}", result.pages.len(), result.domain);
    println!(
        "  Contacts: {} emails, {} phones",
        result.contacts.emails.len(),
        result.contacts.phones.len()
    );
    println!("  Business terms: {}", result.business_terms.len());
    println!(
        "  Attempted {} / skipped {}",
        result.stats.attempted, result.stats.skipped
    );
    println!("  Saved to {}", path.display());

    Ok(())
}

/// Aggregates company info and persists the profile
async fn handle_aggregate(
    config: &Config,
    company: &str,
    urls: Option<Vec<String>>,
) -> anyhow::Result<()> {
    let profile = aggregate_company_info(company, urls, &config.aggregator).await?;

    let store = JsonStore::new(&config.storage.data_dir);
    let path = store.save(&profile_key(company), &profile)?;

    println!(
        "Aggregated {} from {} sources",
        company,
        profile.sources.len()
    );
    if profile.profile.is_empty() {
        println!("  No profile fields extracted");
    } else {
        println!("  Profile fields: {}", profile.profile.len());
        for (key, value) in profile.profile.iter().take(3) {
            let preview: String = value.chars().take(80).collect();
            println!("    - {}: {}", key, preview);
        }
    }
    println!("  Saved to {}", path.display());

    Ok(())
}
