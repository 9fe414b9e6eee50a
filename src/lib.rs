//! Datacrawl: a small, polite web crawler
//!
//! This crate discovers reachable pages from a root URL by fetching pages,
//! extracting their links and scheduling unseen links for further fetching,
//! bounded by a page budget and a worker limit. Robots.txt rules and
//! crawl-delays are honoured per origin, and transient HTTP failures are
//! retried with linear backoff.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
///
/// Only configuration problems, HTTP client construction and result
/// persistence surface here. Per-page failures are absorbed by the crawler
/// and reported as [`crawler::PageOutcome`] values.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("root_url must be provided")]
    MissingRootUrl,

    #[error("internal_links_only and external_links_only cannot both be enabled")]
    ConflictingScope,

    #[error("Invalid url_regex: {0}")]
    InvalidPattern(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Page-level fetch failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Gave up on {url} after {attempts} attempts (last status {status})")]
    RetriesExhausted {
        url: String,
        status: u16,
        attempts: u32,
    },

    #[error("HTTP status {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connection { url: String, message: String },

    #[error("Request failed for {url}: {message}")]
    Request { url: String, message: String },
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{Crawler, PageOutcome};
pub use state::{CrawlResult, PageRecord};
pub use url::{is_valid_url, Canonicalizer};
