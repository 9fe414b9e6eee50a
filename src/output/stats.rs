//! Crawl statistics
//!
//! Counters are updated by the crawler under its state lock and printed by
//! the command-line front end when a crawl finishes.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Pages fetched and recorded
    pub pages_crawled: usize,

    /// Outbound links recorded across all pages
    pub links_recorded: usize,

    /// URLs or hrefs rejected as invalid
    pub invalid_urls: usize,

    /// URLs skipped because they were already recorded
    pub already_visited: usize,

    /// URLs skipped because robots.txt forbids them
    pub robots_denied: usize,

    /// Pages whose fetch failed
    pub fetch_failures: usize,

    /// Links dropped by the regex or scope filters
    pub links_filtered: usize,

    /// When the crawler was created
    pub started_at: DateTime<Utc>,

    /// When the crawl loop finished
    pub finished_at: Option<DateTime<Utc>>,
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlStats {
    /// Creates zeroed counters stamped with the current time
    pub fn new() -> Self {
        Self {
            pages_crawled: 0,
            links_recorded: 0,
            invalid_urls: 0,
            already_visited: 0,
            robots_denied: 0,
            fetch_failures: 0,
            links_filtered: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Marks the crawl as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration of the crawl, once finished
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|finished| finished - self.started_at)
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages crawled: {}", stats.pages_crawled);
    println!("  Links recorded: {}", stats.links_recorded);
    if let Some(duration) = stats.duration() {
        println!(
            "  Duration: {:.1}s",
            duration.num_milliseconds() as f64 / 1000.0
        );
    }
    println!();

    println!("Skipped:");
    println!("  Invalid URLs: {}", stats.invalid_urls);
    println!("  Already visited: {}", stats.already_visited);
    println!("  Disallowed by robots.txt: {}", stats.robots_denied);
    println!("  Filtered links: {}", stats.links_filtered);
    println!("  Fetch failures: {}", stats.fetch_failures);
    println!();

    let attempted = stats.pages_crawled + stats.fetch_failures;
    let success_rate = if attempted > 0 {
        (stats.pages_crawled as f64 / attempted as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} fetched pages recorded)",
        success_rate, stats.pages_crawled, attempted
    );
}
