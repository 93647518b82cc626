//! Robots.txt rule evaluation
//!
//! Wraps the robotstxt crate's matcher behind a simplified interface that
//! also understands the non-standard `Crawl-delay` directive.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data
///
/// An empty content string (or an explicit allow-all) permits every URL,
/// which is the fail-open default when robots.txt cannot be fetched.
#[derive(Debug, Clone)]
pub struct RobotsRules {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    /// Whether to allow all without consulting the content
    allow_all: bool,
}

impl RobotsRules {
    /// Creates rules from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Creates permissive rules that allow everything
    ///
    /// Used when robots.txt cannot be fetched or compliance is disabled.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The user agent string
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.allow_all || self.content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// Gets the crawl delay for a specific user agent
    ///
    /// `Crawl-delay` is not part of the robots.txt standard, so it is
    /// scanned manually: the directive applies to the most recent
    /// `User-agent` group, and a group naming the agent wins over the
    /// wildcard group.
    ///
    /// # Returns
    ///
    /// * `Some(f64)` - The crawl delay in seconds
    /// * `None` - If no crawl delay applies
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        if self.allow_all || self.content.is_empty() {
            return None;
        }

        let mut current_user_agents: Vec<String> = Vec::new();
        let mut delay_for_wildcard: Option<f64> = None;
        let mut delay_for_agent: Option<f64> = None;

        let normalized_agent = user_agent.to_lowercase();

        for line in self.content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = trimmed.split_once(':') {
                let key = key.trim().to_lowercase();
                let value = value.trim();

                match key.as_str() {
                    "user-agent" => {
                        // Consecutive User-agent lines form one group
                        current_user_agents.push(value.to_lowercase());
                    }
                    "crawl-delay" => {
                        if let Ok(delay) = value.parse::<f64>() {
                            if current_user_agents
                                .iter()
                                .any(|ua| ua == "*" || normalized_agent.contains(ua))
                            {
                                if current_user_agents.contains(&"*".to_string()) {
                                    delay_for_wildcard = Some(delay);
                                } else {
                                    delay_for_agent = Some(delay);
                                }
                            }
                        }
                        current_user_agents.clear();
                    }
                    _ => {}
                }
            }
        }

        delay_for_agent.or(delay_for_wildcard)
    }
}
