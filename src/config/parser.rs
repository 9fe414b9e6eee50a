use crate::config::types::CrawlConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads and parses a configuration file without validating it
///
/// Useful when command-line overrides are applied before validation.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(CrawlConfig)` - Parsed configuration, defaults filled in
/// * `Err(ConfigError)` - Failed to read or parse the file
pub fn read_config(path: &Path) -> Result<CrawlConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses TOML configuration content without validating it
pub fn parse_config(content: &str) -> Result<CrawlConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(CrawlConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use datacrawl::config::load_config;
///
/// let config = load_config(Path::new("crawl.toml")).unwrap();
/// println!("Crawling {} (max {} pages)", config.root_url, config.max_links);
/// ```
pub fn load_config(path: &Path) -> Result<CrawlConfig, ConfigError> {
    let config = read_config(path)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so that result files can be traced back to the exact
/// configuration that produced them.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(hash_config_content(&content))
}

/// Hex-encoded SHA-256 hash of configuration text
pub fn hash_config_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Reads a configuration (unvalidated) and returns it together with its hash
///
/// The file is read once; the hash always describes the parsed content.
pub fn read_config_with_hash(path: &Path) -> Result<(CrawlConfig, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, hash_config_content(&content)))
}
