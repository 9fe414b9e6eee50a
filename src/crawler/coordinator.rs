//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding and draining the frontier
//! - Dispatching at most `max_workers` page tasks at a time
//! - Enforcing the page budget
//! - Consulting robots.txt, fetching, extracting and filtering links
//! - Persisting results when the crawl ends

use crate::config::CrawlConfig;
use crate::crawler::fetcher::{RetryPolicy, RetryingFetcher};
use crate::crawler::parser::extract_links;
use crate::crawler::transport::{HttpTransport, Transport};
use crate::output::{save_results, CrawlStats};
use crate::robots::{RobotsCache, RobotsDecision, IGNORING_ROBOTS_WARNING};
use crate::state::{CrawlResult, CrawlState, PageRecord};
use crate::url::{is_valid_url, Canonicalizer, LinkFilter, LinkVerdict, Scope};
use crate::CrawlError;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::Instrument;

/// Callback invoked each time a page is recorded
pub type PageCallback = Arc<dyn Fn(&str, &PageRecord) + Send + Sync>;

/// What happened to a single URL handed to the crawler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page fetched and recorded
    Recorded(PageRecord),
    /// URL is not a well-formed http(s) URL
    InvalidUrl,
    /// URL was already recorded (possibly by a racing worker)
    AlreadyVisited,
    /// Robots.txt forbids the URL
    RobotsDisallowed,
    /// Fetch failed permanently or ran out of retries
    FetchFailed,
    /// Page budget was reached before the page could be recorded
    BudgetExhausted,
}

/// Everything the worker tasks share
struct Shared<T> {
    config: CrawlConfig,
    root_url: String,
    filter: LinkFilter,
    fetcher: RetryingFetcher<T>,
    robots: Option<RobotsCache<T>>,
    state: Mutex<CrawlState>,
}

/// Main crawler structure
///
/// # Example
///
/// ```no_run
/// use datacrawl::{CrawlConfig, Crawler};
///
/// # async fn example() -> datacrawl::Result<()> {
/// let mut config = CrawlConfig::new("https://example.com");
/// config.max_links = 20;
/// config.internal_links_only = true;
///
/// let crawler = Crawler::new(config)?;
/// let results = crawler.run().await?;
/// for (url, page) in &results {
///     println!("{} -> {} links", url, page.urls.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Crawler<T = HttpTransport> {
    shared: Arc<Shared<T>>,
    on_page: Option<PageCallback>,
}

impl Crawler<HttpTransport> {
    /// Creates a crawler that fetches over HTTP
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(CrawlError::Config)` - The configuration is invalid; nothing was fetched
    /// * `Err(CrawlError::HttpClient)` - The HTTP client could not be built
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Crawler<T> {
    /// Creates a crawler over a custom transport
    pub fn with_transport(config: CrawlConfig, transport: T) -> Result<Self, CrawlError> {
        config.validate()?;

        let scope = Scope::from_flags(config.internal_links_only, config.external_links_only)?;
        let transport = Arc::new(transport);

        // Seed with the canonical root when it is usable; otherwise keep it
        // as given so the crawl reports it as invalid.
        let mut canonicalizer = Canonicalizer::new();
        let canonical_root = canonicalizer.canonicalize(&config.root_url, &config.root_url);
        let root_url = if is_valid_url(&canonical_root) {
            canonical_root
        } else {
            config.root_url.trim().to_string()
        };

        let filter = LinkFilter::new(&root_url, config.url_regex.as_deref(), scope)?;
        let fetcher =
            RetryingFetcher::new(Arc::clone(&transport), RetryPolicy::from_config(&config));

        let robots = if config.respect_robots_txt {
            Some(RobotsCache::new(Arc::clone(&transport), &config.user_agent))
        } else {
            tracing::warn!("{}", IGNORING_ROBOTS_WARNING);
            None
        };

        let state = Mutex::new(CrawlState::new(&root_url, canonicalizer));

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                root_url,
                filter,
                fetcher,
                robots,
                state,
            }),
            on_page: None,
        })
    }

    /// Registers a callback invoked for every recorded page
    pub fn on_page<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, &PageRecord) + Send + Sync + 'static,
    {
        self.on_page = Some(Arc::new(callback));
        self
    }

    /// Returns the configuration
    pub fn config(&self) -> &CrawlConfig {
        &self.shared.config
    }

    /// Returns the URL the crawl starts from
    pub fn root_url(&self) -> &str {
        &self.shared.root_url
    }

    /// Returns a snapshot of the pages recorded so far
    pub fn results(&self) -> CrawlResult {
        self.shared.with_state(|state| state.visited.clone())
    }

    /// Returns a snapshot of the crawl counters
    pub fn stats(&self) -> CrawlStats {
        self.shared.with_state(|state| state.stats.clone())
    }

    /// Number of origins whose robots.txt has been fetched
    pub fn robots_cache_len(&self) -> usize {
        self.shared.robots.as_ref().map_or(0, RobotsCache::len)
    }

    /// Processes a single URL: validity, visited and robots checks, fetch,
    /// link extraction and recording
    ///
    /// Discovered links are added to the frontier but not crawled.
    pub async fn crawl_url(&self, url: &str) -> PageOutcome {
        let outcome = self.shared.process(url).await;
        self.notify(url, &outcome);
        outcome
    }

    /// Runs the crawl until the frontier drains or the page budget is spent
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - Every recorded page
    /// * `Err(CrawlError::Output)` - Results could not be saved
    pub async fn run(&self) -> Result<CrawlResult, CrawlError> {
        let span = tracing::info_span!("crawl", root = %self.shared.root_url);
        self.run_loop().instrument(span).await
    }

    async fn run_loop(&self) -> Result<CrawlResult, CrawlError> {
        let config = &self.shared.config;
        let delay = config.delay_duration();
        tracing::info!(
            "Starting crawl of {} (max {} pages, {} workers)",
            self.shared.root_url,
            config.max_links,
            config.max_workers
        );

        let mut tasks: JoinSet<(String, PageOutcome)> = JoinSet::new();
        let mut dispatched = 0usize;

        loop {
            while tasks.len() < config.max_workers {
                let in_flight = tasks.len();
                let next = self.shared.with_state(|state| {
                    if state.page_count + in_flight >= config.max_links {
                        None
                    } else {
                        state.next_pending()
                    }
                });
                let Some(url) = next else {
                    break;
                };

                let wait = if dispatched == 0 { Duration::ZERO } else { delay };
                dispatched += 1;

                let shared = Arc::clone(&self.shared);
                tasks.spawn(
                    async move {
                        if !wait.is_zero() {
                            tokio::time::sleep(wait).await;
                        }
                        let outcome = shared.process(&url).await;
                        shared.with_state(|state| state.finish(&url));
                        (url, outcome)
                    }
                    .in_current_span(),
                );
            }

            let Some(joined) = tasks.join_next().await else {
                break;
            };

            match joined {
                Ok((url, outcome)) => self.notify(&url, &outcome),
                Err(e) => tracing::error!("Crawl task failed: {}", e),
            }
        }

        let (results, pages, pending) = self.shared.with_state(|state| {
            state.stats.finish();
            (state.visited.clone(), state.page_count, state.frontier.len())
        });

        tracing::info!(
            "Crawl completed: {} pages recorded, {} URLs left in frontier",
            pages,
            pending
        );

        if let Some(path) = &config.save_to_file {
            save_results(path, &results).await?;
        }

        Ok(results)
    }

    fn notify(&self, url: &str, outcome: &PageOutcome) {
        if let (Some(callback), PageOutcome::Recorded(record)) = (&self.on_page, outcome) {
            callback(url, record);
        }
    }
}

impl<T: Transport> Shared<T> {
    fn with_state<R>(&self, f: impl FnOnce(&mut CrawlState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    async fn process(&self, url: &str) -> PageOutcome {
        if !is_valid_url(url) {
            tracing::debug!(url, "Invalid url to crawl");
            self.with_state(|state| {
                state.stats.invalid_urls += 1;
                state.discard(url);
            });
            return PageOutcome::InvalidUrl;
        }

        if self.already_visited(url) {
            return PageOutcome::AlreadyVisited;
        }

        if let Some(robots) = &self.robots {
            match robots.check(url).await {
                RobotsDecision::Disallowed => {
                    tracing::debug!(url, "Skipped: Url doesn't allow crawling");
                    self.with_state(|state| {
                        state.stats.robots_denied += 1;
                        state.discard(url);
                    });
                    return PageOutcome::RobotsDisallowed;
                }
                RobotsDecision::Allowed {
                    crawl_delay: Some(delay),
                } => {
                    tracing::debug!(url, delay_secs = delay.as_secs_f64(), "Honouring crawl-delay");
                    tokio::time::sleep(delay).await;
                }
                RobotsDecision::Allowed { crawl_delay: None } => {}
            }
        }

        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(url, "Failed to fetch page: {}", e);
                self.with_state(|state| {
                    state.stats.fetch_failures += 1;
                    state.discard(url);
                });
                return PageOutcome::FetchFailed;
            }
        };

        let hrefs = extract_links(&page.body);
        self.with_state(|state| self.record(state, url, &hrefs, page.body))
    }

    fn already_visited(&self, url: &str) -> bool {
        self.with_state(|state| {
            let visited = state.is_visited(url);
            if visited {
                tracing::debug!(url, "URL already crawled");
                state.stats.already_visited += 1;
            }
            visited
        })
    }

    /// Filters the page's links and records it, all under the state lock
    fn record(
        &self,
        state: &mut CrawlState,
        url: &str,
        hrefs: &[String],
        body: String,
    ) -> PageOutcome {
        if state.is_visited(url) {
            tracing::debug!(url, "URL already crawled");
            state.stats.already_visited += 1;
            return PageOutcome::AlreadyVisited;
        }

        if state.page_count >= self.config.max_links {
            tracing::debug!(url, "Page budget exhausted, discarding page");
            return PageOutcome::BudgetExhausted;
        }

        let mut urls = Vec::new();
        let mut seen = HashSet::new();

        for href in hrefs {
            let link = state.canonicalizer.canonicalize(href, url);

            if !is_valid_url(&link) {
                tracing::debug!(href = %href, "Invalid url");
                state.stats.invalid_urls += 1;
                continue;
            }

            if !seen.insert(link.clone()) {
                continue;
            }

            match self.filter.check(&link) {
                LinkVerdict::Keep => {}
                LinkVerdict::PatternMismatch => {
                    tracing::debug!(link = %link, "Skipping: URL didn't match regex");
                    state.stats.links_filtered += 1;
                    continue;
                }
                LinkVerdict::External => {
                    tracing::debug!(link = %link, "Skipping: External link");
                    state.stats.links_filtered += 1;
                    continue;
                }
                LinkVerdict::Internal => {
                    tracing::debug!(link = %link, "Skipping: Internal link");
                    state.stats.links_filtered += 1;
                    continue;
                }
            }

            if link != url && !state.is_known(&link) {
                state.frontier.push(link.clone());
            }
            urls.push(link);
        }

        let record = PageRecord {
            urls,
            body: self.config.include_body.then_some(body),
        };
        state.record(url, record.clone());
        tracing::debug!(url, links = record.urls.len(), "Crawled page");

        PageOutcome::Recorded(record)
    }
}
