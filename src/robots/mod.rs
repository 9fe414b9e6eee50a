//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.
//! It respects robots.txt directives when crawling websites.

mod cache;
mod parser;

pub use cache::{RobotsCache, RobotsDecision, RobotsEntry};
pub use parser::ParsedRobots;

use url::Url;

/// Warning emitted once per crawl when robots.txt compliance is disabled
pub const IGNORING_ROBOTS_WARNING: &str = "Ignoring robots.txt files! You might be at risk of: \
     Agent/IP bans; Disrupted operation; Increased suspicion from anti-bot services; \
     Potential legal action";

/// Derives the robots.txt URL for the origin of `url`
///
/// Path, query and fragment are discarded.
///
/// # Returns
///
/// * `Some(String)` - `scheme://host/robots.txt`
/// * `None` - If the URL does not parse or has no host
///
/// # Examples
///
/// ```
/// use datacrawl::robots::robots_txt_url;
///
/// assert_eq!(
///     robots_txt_url("https://example.com/docs/page?x=1#top").as_deref(),
///     Some("https://example.com/robots.txt")
/// );
/// assert_eq!(robots_txt_url("/relative"), None);
/// ```
pub fn robots_txt_url(url: &str) -> Option<String> {
    let origin = Url::parse(url).ok()?.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(format!("{}/robots.txt", origin.ascii_serialization()))
}

/// Extracts the robots.txt product token from a User-Agent string
///
/// `"datacrawl/0.1 (+https://example.com)"` becomes `"datacrawl"`.
pub fn robots_agent(user_agent: &str) -> &str {
    let token = user_agent
        .trim()
        .split(|c: char| c == '/' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    if token.is_empty() {
        "*"
    } else {
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robots_txt_url() {
        assert_eq!(
            robots_txt_url("http://example.com").as_deref(),
            Some("http://example.com/robots.txt")
        );
        assert_eq!(
            robots_txt_url("http://127.0.0.1:8080/a/b").as_deref(),
            Some("http://127.0.0.1:8080/robots.txt")
        );
        assert_eq!(
            robots_txt_url("HTTPS://Example.com:443/x").as_deref(),
            Some("https://example.com/robots.txt")
        );
        assert_eq!(
            robots_txt_url("http://user:pw@example.com/private").as_deref(),
            Some("http://example.com/robots.txt")
        );
        assert_eq!(robots_txt_url("mailto:someone@example.com"), None);
        assert_eq!(robots_txt_url("example.com"), None);
        assert_eq!(robots_txt_url(""), None);
    }

    #[test]
    fn test_robots_agent() {
        assert_eq!(robots_agent("datacrawl/0.1"), "datacrawl");
        assert_eq!(robots_agent("MyBot (+https://example.com)"), "MyBot");
        assert_eq!(robots_agent("plainbot"), "plainbot");
        assert_eq!(robots_agent(""), "*");
    }
}
