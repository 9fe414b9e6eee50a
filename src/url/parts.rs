/// The pieces of a raw href that matter for crawling
///
/// Query string and fragment are discarded during splitting since they never
/// take part in page identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlParts<'a> {
    /// Scheme as written, if the input carried one
    pub scheme: Option<&'a str>,
    /// Authority section (`host[:port]`, possibly with userinfo); empty when absent
    pub netloc: &'a str,
    /// Everything between the authority and the query/fragment
    pub path: &'a str,
}

/// Splits a raw URL or href into scheme, netloc and path
///
/// Splitting is purely lexical: nothing is percent-decoded or validated.
/// A leading `name:` is only treated as a scheme when the name starts with a
/// letter, contains only scheme characters, and is not followed by a bare
/// port number (so `example.com:8080/page` keeps no scheme).
///
/// # Examples
///
/// ```
/// use datacrawl::url::split_url;
///
/// let parts = split_url("https://example.com/docs?page=2#intro");
/// assert_eq!(parts.scheme, Some("https"));
/// assert_eq!(parts.netloc, "example.com");
/// assert_eq!(parts.path, "/docs");
/// ```
pub fn split_url(raw: &str) -> UrlParts<'_> {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let trimmed = &raw[..end];

    let (scheme, rest) = match split_scheme(trimmed) {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, trimmed),
    };

    let (netloc, path) = match rest.strip_prefix("//") {
        Some(authority) => {
            let boundary = authority.find('/').unwrap_or(authority.len());
            (&authority[..boundary], &authority[boundary..])
        }
        None => ("", rest),
    };

    UrlParts {
        scheme,
        netloc,
        path,
    }
}

fn split_scheme(raw: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = raw.split_once(':')?;

    let mut chars = scheme.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }

    // `host:port` without a scheme
    let port = rest.split('/').next().unwrap_or_default();
    if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    Some((scheme, rest))
}

impl UrlParts<'_> {
    /// Returns true if the scheme is one the crawler can fetch
    pub fn is_web(&self) -> bool {
        self.scheme.is_some_and(|scheme| {
            scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
        })
    }
}
