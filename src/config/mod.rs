//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use datacrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.max_links);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::CrawlConfig;

// Re-export parser functions
pub use parser::{
    compute_config_hash, hash_config_content, load_config, parse_config, read_config,
    read_config_with_hash,
};
pub use validation::validate;
