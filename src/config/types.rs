use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Crawl configuration
///
/// Every field except `root_url` has a default, so a minimal TOML file is
/// just `root_url = "https://example.com"`. Durations are given in seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CrawlConfig {
    /// Where the crawl starts
    #[serde(default)]
    pub root_url: String,

    /// Page budget: maximum number of pages recorded
    #[serde(default = "default_max_links")]
    pub max_links: usize,

    /// Maximum number of pages fetched concurrently
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Pause before each dispatch after the first (seconds)
    #[serde(default = "default_delay")]
    pub delay: f64,

    /// Emit per-URL diagnostics
    #[serde(default = "default_true")]
    pub verbose: bool,

    /// Write results as JSON to this path when the crawl ends
    #[serde(default)]
    pub save_to_file: Option<PathBuf>,

    /// Only keep links whose whole canonical URL matches this pattern
    #[serde(default)]
    pub url_regex: Option<String>,

    /// Store raw page bodies in the results
    #[serde(default)]
    pub include_body: bool,

    /// Only keep links on the root URL's host
    #[serde(default)]
    pub internal_links_only: bool,

    /// Only keep links off the root URL's host
    #[serde(default)]
    pub external_links_only: bool,

    /// Honour robots.txt rules and crawl-delays
    #[serde(default = "default_true")]
    pub respect_robots_txt: bool,

    /// Retries after the first attempt for transient HTTP errors
    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,

    /// User-Agent header, also matched against robots.txt groups
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: f64,

    /// Backoff unit between retries (seconds); retry `k` waits `k` units
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff: f64,
}

fn default_max_links() -> usize {
    5
}

fn default_max_workers() -> usize {
    1
}

fn default_delay() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

fn default_max_retry_attempts() -> u32 {
    5
}

fn default_user_agent() -> String {
    format!("datacrawl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout() -> f64 {
    10.0
}

fn default_retry_backoff() -> f64 {
    1.0
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self::new("")
    }
}

impl CrawlConfig {
    /// Creates a configuration with default settings for the given root URL
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            max_links: default_max_links(),
            max_workers: default_max_workers(),
            delay: default_delay(),
            verbose: true,
            save_to_file: None,
            url_regex: None,
            include_body: false,
            internal_links_only: false,
            external_links_only: false,
            respect_robots_txt: true,
            max_retry_attempts: default_max_retry_attempts(),
            user_agent: default_user_agent(),
            request_timeout: default_request_timeout(),
            retry_backoff: default_retry_backoff(),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        super::validation::validate(self)
    }

    /// Inter-dispatch delay as a [`Duration`]
    pub fn delay_duration(&self) -> Duration {
        seconds(self.delay)
    }

    /// Request timeout as a [`Duration`]
    pub fn request_timeout_duration(&self) -> Duration {
        seconds(self.request_timeout)
    }

    /// Retry backoff unit as a [`Duration`]
    pub fn retry_backoff_duration(&self) -> Duration {
        seconds(self.retry_backoff)
    }
}

/// Converts seconds into a duration; only reachable unvalidated values map to zero
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_default()
}
