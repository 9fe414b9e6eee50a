//! Output module for crawl results and statistics
//!
//! This module handles:
//! - Persisting crawl results as JSON
//! - Recording and printing crawl statistics

mod json;
pub mod stats;

pub use json::{save_results, to_pretty_json};
pub use stats::{print_statistics, CrawlStats};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Serialized results are not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
