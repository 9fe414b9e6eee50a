//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The HTTP transport seam
//! - Fetching with transient-failure retry
//! - HTML link extraction
//! - The pending-URL frontier
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
#[cfg(test)]
pub(crate) mod mock;
mod parser;
mod transport;

pub use coordinator::{Crawler, PageCallback, PageOutcome};
pub use fetcher::{is_transient, Page, RetryPolicy, RetryingFetcher, TRANSIENT_STATUSES};
pub use frontier::Frontier;
pub use parser::extract_links;
pub use transport::{build_http_client, HttpResponse, HttpTransport, Transport, TransportError};

use crate::config::CrawlConfig;
use crate::state::CrawlResult;
use crate::CrawlError;

/// Runs a complete crawl operation over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration
/// 2. Build the HTTP client
/// 3. Fetch pages and follow their links within the page budget
/// 4. Save the results when `save_to_file` is set
///
/// # Returns
///
/// * `Ok(CrawlResult)` - Every recorded page
/// * `Err(CrawlError)` - Configuration, client or output failure
pub async fn crawl(config: CrawlConfig) -> Result<CrawlResult, CrawlError> {
    Crawler::new(config)?.run().await
}

