//! Robots.txt handling module
//!
//! Fetches a site's robots.txt once per crawl and evaluates its rules for
//! the configured user agent. Every failure mode is fail-open: a site whose
//! robots.txt is missing, broken, or unreachable is crawled as if it had
//! allowed everything.

mod rules;

pub use rules::RobotsRules;

use reqwest::Client;
use url::Url;

/// Robots compliance policy for one crawl
///
/// Construct with [`RobotsPolicy::fetch`] before the crawl loop starts; the
/// fetched rules are cached for the crawl's lifetime (robots rules do not
/// change mid-crawl).
#[derive(Debug, Clone)]
pub struct RobotsPolicy {
    rules: RobotsRules,
    user_agent: String,
}

impl RobotsPolicy {
    /// Fetches and parses `<scheme>://<host>/robots.txt` for the target site
    ///
    /// The one network call this type makes. Uses the shared HTTP client so
    /// the configured timeout and user-agent header apply. If compliance is
    /// disabled, no request is made at all.
    ///
    /// # Arguments
    ///
    /// * `client` - The crawl's HTTP client
    /// * `base` - The crawl's seed URL; only its scheme and host are used
    /// * `user_agent` - The user agent the rules are evaluated for
    /// * `respect_robots` - When false, every URL is allowed
    pub async fn fetch(client: &Client, base: &Url, user_agent: &str, respect_robots: bool) -> Self {
        let rules = if respect_robots {
            fetch_rules(client, base).await
        } else {
            tracing::debug!("Robots compliance disabled, allowing all URLs");
            RobotsRules::allow_all()
        };

        Self {
            rules,
            user_agent: user_agent.to_string(),
        }
    }

    /// Creates a policy from already-parsed rules (used by tests)
    pub fn from_rules(rules: RobotsRules, user_agent: &str) -> Self {
        Self {
            rules,
            user_agent: user_agent.to_string(),
        }
    }

    /// Checks whether the policy allows fetching the given URL
    pub fn allows(&self, url: &Url) -> bool {
        self.rules.is_allowed(url.as_str(), &self.user_agent)
    }

    /// Returns the site's requested crawl delay in seconds, if any
    pub fn crawl_delay(&self) -> Option<f64> {
        self.rules.crawl_delay(&self.user_agent)
    }
}

/// Fetches robots.txt, failing open on any error
async fn fetch_rules(client: &Client, base: &Url) -> RobotsRules {
    let robots_url = match base.join("/robots.txt") {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!("Could not build robots.txt URL from {}: {}", base, e);
            return RobotsRules::allow_all();
        }
    };

    match client.get(robots_url.clone()).send().await {
        Ok(response) if response.status().is_success() => match response.text().await {
            Ok(body) => {
                tracing::info!("Loaded robots.txt from {}", robots_url);
                RobotsRules::from_content(&body)
            }
            Err(e) => {
                tracing::warn!("Could not read robots.txt body: {}", e);
                RobotsRules::allow_all()
            }
        },
        Ok(response) => {
            tracing::info!(
                "robots.txt returned HTTP {}, allowing all URLs",
                response.status()
            );
            RobotsRules::allow_all()
        }
        Err(e) => {
            tracing::warn!("Could not load robots.txt: {}", e);
            RobotsRules::allow_all()
        }
    }
}
