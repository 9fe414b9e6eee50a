use crate::config::types::CrawlConfig;
use crate::url::{compile_full_match, Scope};
use crate::ConfigError;
use std::time::Duration;

/// Validates the entire configuration
///
/// Runs before any network activity; a failure here means the crawl never
/// starts.
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_root_url(config)?;
    Scope::from_flags(config.internal_links_only, config.external_links_only)?;
    validate_limits(config)?;
    validate_timing(config)?;
    validate_pattern(config)?;
    validate_user_agent(config)?;
    Ok(())
}

/// The root URL only has to be present; an unusable one is skipped at crawl time
fn validate_root_url(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.root_url.trim().is_empty() {
        return Err(ConfigError::MissingRootUrl);
    }
    Ok(())
}

fn validate_limits(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_workers < 1 {
        return Err(ConfigError::Validation(format!(
            "max_workers must be >= 1, got {}",
            config.max_workers
        )));
    }
    Ok(())
}

fn validate_timing(config: &CrawlConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("delay", config.delay),
        ("retry_backoff", config.retry_backoff),
    ] {
        if Duration::try_from_secs_f64(value).is_err() {
            return Err(ConfigError::Validation(format!(
                "{} must be a non-negative number of seconds that fits a duration, got {}",
                name, value
            )));
        }
    }

    let timeout = Duration::try_from_secs_f64(config.request_timeout);
    if !matches!(timeout, Ok(timeout) if !timeout.is_zero()) {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be a positive number of seconds that fits a duration, got {}",
            config.request_timeout
        )));
    }

    Ok(())
}

fn validate_pattern(config: &CrawlConfig) -> Result<(), ConfigError> {
    if let Some(pattern) = &config.url_regex {
        compile_full_match(pattern)?;
    }
    Ok(())
}

fn validate_user_agent(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.user_agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user_agent must not contain control characters, got {:?}",
            config.user_agent
        )));
    }

    Ok(())
}
