//! Robots.txt parser implementation
//!
//! This module provides functionality for parsing robots.txt content using the robotstxt crate.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data
///
/// This is a wrapper around the robotstxt crate's types, providing a simplified
/// interface for checking if URLs are allowed.
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    /// Whether to allow all (true = allow all, false = parse content)
    allow_all: bool,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// This is used when robots.txt cannot be fetched.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// Returns the raw robots.txt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL or path to check (e.g., "/page.html")
    /// * `agent` - The robots.txt product token (e.g., "datacrawl")
    ///
    /// # Returns
    ///
    /// * `true` - If the URL is allowed
    /// * `false` - If the URL is disallowed
    pub fn is_allowed(&self, url: &str, agent: &str) -> bool {
        if self.allow_all || self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, agent, url)
    }

    /// Gets the crawl delay for a specific user agent
    ///
    /// A group starts with one or more consecutive `User-agent` lines and runs
    /// until the next `User-agent` line that follows a rule. A delay in a group
    /// naming `agent` wins over one in a `*` group.
    ///
    /// # Returns
    ///
    /// * `Some(f64)` - The crawl delay in seconds
    /// * `None` - If no crawl delay applies
    pub fn crawl_delay(&self, agent: &str) -> Option<f64> {
        if self.allow_all {
            return None;
        }

        let agent = agent.to_ascii_lowercase();
        let mut group: Vec<String> = Vec::new();
        let mut reading_agents = false;
        let mut delay_for_agent: Option<f64> = None;
        let mut delay_for_wildcard: Option<f64> = None;

        for line in self.content.lines() {
            let line = line.split('#').next().unwrap_or_default().trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim().to_ascii_lowercase().as_str() {
                "user-agent" => {
                    if !reading_agents {
                        group.clear();
                        reading_agents = true;
                    }
                    group.push(value.to_ascii_lowercase());
                }
                "crawl-delay" => {
                    reading_agents = false;
                    let Some(delay) = value
                        .parse::<f64>()
                        .ok()
                        .filter(|d| d.is_finite() && *d >= 0.0)
                    else {
                        continue;
                    };
                    if group.iter().any(|ua| *ua == agent) {
                        delay_for_agent.get_or_insert(delay);
                    } else if group.iter().any(|ua| ua == "*") {
                        delay_for_wildcard.get_or_insert(delay);
                    }
                }
                _ => reading_agents = false,
            }
        }

        delay_for_agent.or(delay_for_wildcard)
    }
}
