//! Robots.txt caching implementation
//!
//! Each origin's robots.txt is fetched at most once per crawl. Concurrent
//! workers asking about the same origin wait on the same in-flight fetch.

use crate::crawler::Transport;
use crate::robots::{robots_agent, robots_txt_url, ParsedRobots};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::OnceCell;

/// Robots rules for one origin, as fetched during this crawl
#[derive(Debug, Clone)]
pub struct RobotsEntry {
    /// The parsed robots.txt content
    pub rules: ParsedRobots,

    /// Crawl-delay for the crawler's agent, in seconds
    pub crawl_delay: Option<f64>,

    /// When the robots.txt was fetched
    pub fetched_at: DateTime<Utc>,
}

impl RobotsEntry {
    /// Parses robots.txt content for the given agent token
    pub fn from_content(content: &str, agent: &str) -> Self {
        let rules = ParsedRobots::from_content(content);
        let crawl_delay = rules.crawl_delay(agent);
        Self {
            rules,
            crawl_delay,
            fetched_at: Utc::now(),
        }
    }

    /// Entry used when robots.txt is missing or unreachable
    pub fn allow_all() -> Self {
        Self {
            rules: ParsedRobots::allow_all(),
            crawl_delay: None,
            fetched_at: Utc::now(),
        }
    }

    /// Checks if a URL is allowed for the given agent token
    pub fn is_allowed(&self, url: &str, agent: &str) -> bool {
        self.rules.is_allowed(url, agent)
    }

    /// Crawl-delay as a [`Duration`], if one applies
    pub fn crawl_delay_duration(&self) -> Option<Duration> {
        self.crawl_delay
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .filter(|delay| !delay.is_zero())
    }
}

/// Outcome of a robots check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotsDecision {
    /// Fetch allowed; wait `crawl_delay` first when present
    Allowed { crawl_delay: Option<Duration> },
    /// Robots.txt forbids the URL
    Disallowed,
}

type Slot = Arc<OnceCell<Arc<RobotsEntry>>>;

/// Per-origin robots.txt cache keyed by robots.txt URL
pub struct RobotsCache<T> {
    transport: Arc<T>,
    agent: String,
    entries: Mutex<HashMap<String, Slot>>,
}

impl<T: Transport> RobotsCache<T> {
    /// Creates an empty cache
    ///
    /// # Arguments
    ///
    /// * `transport` - Used to fetch robots.txt files
    /// * `user_agent` - Full User-Agent; its product token is matched against robots groups
    pub fn new(transport: Arc<T>, user_agent: &str) -> Self {
        Self {
            transport,
            agent: robots_agent(user_agent).to_string(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The product token matched against robots.txt groups
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Decides whether `url` may be fetched
    ///
    /// URLs without a usable origin are allowed; they fail validation
    /// elsewhere.
    pub async fn check(&self, url: &str) -> RobotsDecision {
        let Some(robots_url) = robots_txt_url(url) else {
            return RobotsDecision::Allowed { crawl_delay: None };
        };

        let entry = self.get_or_fetch(&robots_url).await;
        if entry.is_allowed(url, &self.agent) {
            RobotsDecision::Allowed {
                crawl_delay: entry.crawl_delay_duration(),
            }
        } else {
            RobotsDecision::Disallowed
        }
    }

    /// Returns the cached entry for a robots.txt URL, fetching it on first use
    pub async fn get_or_fetch(&self, robots_url: &str) -> Arc<RobotsEntry> {
        let slot = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            let slot = entries.entry(robots_url.to_string()).or_default();
            Arc::clone(slot)
        };

        let entry = slot.get_or_init(|| self.fetch(robots_url)).await;
        Arc::clone(entry)
    }

    /// Number of origins whose robots.txt has been fetched
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    /// Returns true if no robots.txt has been fetched yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn fetch(&self, robots_url: &str) -> Arc<RobotsEntry> {
        let entry = match self.transport.get(robots_url).await {
            Ok(response) if response.is_success() => {
                tracing::debug!(robots_url, "Fetched robots.txt");
                RobotsEntry::from_content(&response.body, &self.agent)
            }
            Ok(response) => {
                tracing::debug!(
                    robots_url,
                    status = response.status,
                    "No robots.txt, allowing all"
                );
                RobotsEntry::allow_all()
            }
            Err(e) => {
                tracing::warn!(robots_url, error = %e, "Failed to fetch robots.txt, allowing all");
                RobotsEntry::allow_all()
            }
        };
        Arc::new(entry)
    }
}
