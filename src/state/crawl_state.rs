use crate::crawler::Frontier;
use crate::output::CrawlStats;
use crate::state::{CrawlResult, PageRecord};
use crate::url::Canonicalizer;
use std::collections::HashSet;

/// Mutable bookkeeping shared by every worker of one crawl
///
/// Always accessed under a single lock, which is never held across an
/// `.await`. A URL is never pending in the frontier while also recorded in
/// `visited`, and `page_count == visited.len()`. URLs handed to a worker stay
/// in `in_flight` until the worker finishes, so rediscovering them does not
/// queue a second fetch. URLs that were invalid, disallowed or failed to
/// fetch land in `discarded` and are never queued again during the run.
#[derive(Debug)]
pub struct CrawlState {
    /// Recorded pages
    pub visited: CrawlResult,

    /// Discovered, not yet dispatched
    pub frontier: Frontier,

    /// Dispatched, not yet finished
    pub in_flight: HashSet<String>,

    /// Given up on for this run
    pub discarded: HashSet<String>,

    /// Pages fetched and recorded so far
    pub page_count: usize,

    /// Scheme-learning href resolver
    pub canonicalizer: Canonicalizer,

    /// Running counters
    pub stats: CrawlStats,
}

impl CrawlState {
    /// Creates state with `seed` as the only pending URL
    pub fn new(seed: &str, canonicalizer: Canonicalizer) -> Self {
        let mut frontier = Frontier::new();
        frontier.push(seed.to_string());

        Self {
            visited: CrawlResult::new(),
            frontier,
            in_flight: HashSet::new(),
            discarded: HashSet::new(),
            page_count: 0,
            canonicalizer,
            stats: CrawlStats::new(),
        }
    }

    /// Returns true if the URL has been recorded
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains_key(url)
    }

    /// Returns true if the URL is recorded, being fetched or discarded
    pub fn is_known(&self, url: &str) -> bool {
        self.is_visited(url) || self.in_flight.contains(url) || self.discarded.contains(url)
    }

    /// Gives up on a URL for the rest of the run
    pub fn discard(&mut self, url: &str) {
        self.frontier.remove(url);
        self.discarded.insert(url.to_string());
    }

    /// Marks a dispatched URL as finished, whatever its outcome
    pub fn finish(&mut self, url: &str) {
        self.in_flight.remove(url);
    }

    /// Records a fetched page
    ///
    /// Callers must check [`CrawlState::is_visited`] first; an existing entry
    /// is never overwritten.
    pub fn record(&mut self, url: &str, record: PageRecord) -> bool {
        if self.is_visited(url) {
            return false;
        }

        self.frontier.remove(url);
        self.page_count += 1;
        self.stats.pages_crawled += 1;
        self.stats.links_recorded += record.urls.len();
        self.visited.insert(url.to_string(), record);
        true
    }

    /// Pops the next pending URL that is neither recorded nor in flight,
    /// marking it in flight
    pub fn next_pending(&mut self) -> Option<String> {
        while let Some(url) = self.frontier.pop() {
            if !self.is_known(&url) {
                self.in_flight.insert(url.clone());
                return Some(url);
            }
            tracing::debug!(url = %url, "URL already crawled");
            self.stats.already_visited += 1;
        }
        None
    }
}
