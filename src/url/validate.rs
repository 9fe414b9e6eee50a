use crate::url::parts::split_url;
use std::net::{Ipv4Addr, Ipv6Addr};
use url::Url;

/// Characters that never appear unescaped in a well-formed URL
const UNSAFE_CHARS: &[char] = &['<', '>', '"', '{', '}', '|', '\\', '^', '`'];

/// Checks whether a string is a well-formed absolute http(s) URL
///
/// The check is syntactic only; no DNS resolution or reachability test is
/// performed.
///
/// # Rules
///
/// - Scheme must be `http` or `https`, followed by `//` and a non-empty host
/// - Host must be `localhost`, an IPv4 address, a bracketed IPv6 address, or
///   a dotted domain name whose top-level label is alphabetic (or punycode)
/// - An explicit port must be numeric and fit in 16 bits
/// - Whitespace and unsafe characters are rejected anywhere in the string
///
/// # Examples
///
/// ```
/// use datacrawl::url::is_valid_url;
///
/// assert!(is_valid_url("https://example.com/page"));
/// assert!(is_valid_url("http://127.0.0.1:8080/"));
/// assert!(!is_valid_url("mailto:someone@example.com"));
/// assert!(!is_valid_url("http://not a url"));
/// ```
pub fn is_valid_url(candidate: &str) -> bool {
    if candidate.is_empty()
        || candidate
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || UNSAFE_CHARS.contains(&c))
    {
        return false;
    }

    let parts = split_url(candidate);
    if !parts.is_web() || parts.netloc.is_empty() {
        return false;
    }

    if !is_valid_netloc(parts.netloc) {
        return false;
    }

    Url::parse(candidate).is_ok()
}

fn is_valid_netloc(netloc: &str) -> bool {
    // Drop userinfo
    let host_port = netloc.rsplit_once('@').map_or(netloc, |(_, hp)| hp);

    if let Some(bracketed) = host_port.strip_prefix('[') {
        let Some((host, rest)) = bracketed.split_once(']') else {
            return false;
        };
        if host.parse::<Ipv6Addr>().is_err() {
            return false;
        }
        return match rest.strip_prefix(':') {
            Some(port) => is_valid_port(port),
            None => rest.is_empty(),
        };
    }

    let (host, port) = match host_port.rsplit_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (host_port, None),
    };

    if let Some(port) = port {
        if !is_valid_port(port) {
            return false;
        }
    }

    is_valid_host(host)
}

fn is_valid_port(port: &str) -> bool {
    !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) && port.parse::<u16>().is_ok()
}

fn is_valid_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();

    if host == "localhost" || host.parse::<Ipv4Addr>().is_ok() {
        return true;
    }

    let host = host.strip_suffix('.').unwrap_or(&host);
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 || host.len() > 253 {
        return false;
    }

    if !labels.iter().all(|label| is_valid_label(label)) {
        return false;
    }

    labels.last().is_some_and(|tld| {
        tld.starts_with("xn--") || (tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
    })
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
