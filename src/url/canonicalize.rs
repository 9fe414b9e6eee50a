use crate::url::parts::split_url;
use crate::url::validate::is_valid_url;

/// Scheme assumed until a crawl observes one
pub const DEFAULT_SCHEME: &str = "http";

/// Resolves raw hrefs into canonical absolute URLs
///
/// A canonical URL is absolute and carries no query string or fragment.
/// The canonicalizer remembers the last web scheme it observed: once a crawl
/// has seen an `https` link, scheme-less hrefs (`//host/path`, bare domains)
/// resolve against `https` from then on. Each crawl owns exactly one
/// canonicalizer, so this state is never shared between runs.
///
/// # Examples
///
/// ```
/// use datacrawl::url::Canonicalizer;
///
/// let mut canonicalizer = Canonicalizer::new();
/// let base = "http://example.com/docs";
///
/// assert_eq!(canonicalizer.canonicalize("/about?x=1", base), "http://example.com/about");
/// assert_eq!(canonicalizer.canonicalize("intro#top", base), "http://example.com/docs/intro");
/// assert_eq!(canonicalizer.canonicalize("https://other.org/a", base), "https://other.org/a");
/// assert_eq!(canonicalizer.scheme(), "https");
/// ```
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    scheme: String,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Canonicalizer {
    /// Creates a canonicalizer starting from the `http` scheme
    pub fn new() -> Self {
        Self::with_scheme(DEFAULT_SCHEME)
    }

    /// Creates a canonicalizer starting from the given scheme
    pub fn with_scheme(scheme: &str) -> Self {
        Self {
            scheme: scheme.to_ascii_lowercase(),
        }
    }

    /// Returns the scheme currently used for scheme-less hrefs
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Resolves `href` against `base` into a canonical URL
    ///
    /// # Resolution Rules
    ///
    /// 1. Query string and fragment are always dropped
    /// 2. An `http`/`https` scheme on the href is learned for later calls
    /// 3. Href without scheme or host:
    ///    - empty (e.g. `#top`) resolves to the base itself
    ///    - `<scheme>://<href>` is used when that forms a valid URL (bare domains)
    ///    - an absolute path replaces the base path
    ///    - a relative path is appended to the base with a single `/`
    /// 4. Href with a host is re-emitted as `scheme://host/path`, using the
    ///    href's own scheme or the learned one for protocol-relative links
    ///
    /// The result is not guaranteed to be valid; callers check it with
    /// [`is_valid_url`].
    pub fn canonicalize(&mut self, href: &str, base: &str) -> String {
        let parts = split_url(href.trim());

        if parts.is_web() {
            if let Some(scheme) = parts.scheme {
                self.scheme = scheme.to_ascii_lowercase();
            }
        }

        let scheme = match parts.scheme {
            Some(scheme) => scheme.to_ascii_lowercase(),
            None => self.scheme.clone(),
        };

        if !parts.netloc.is_empty() {
            return format!("{}://{}{}", scheme, parts.netloc, parts.path);
        }

        if parts.scheme.is_some() {
            // mailto:, javascript: and friends; left for the validator to reject
            return format!("{}://{}", scheme, parts.path);
        }

        let base = strip_base(base);
        if parts.path.is_empty() {
            return base;
        }

        let standalone = format!("{}://{}", scheme, parts.path);
        if is_valid_url(&standalone) {
            return standalone;
        }

        if parts.path.starts_with('/') {
            let base_parts = split_url(&base);
            match base_parts.scheme {
                Some(base_scheme) => {
                    format!("{}://{}{}", base_scheme, base_parts.netloc, parts.path)
                }
                None => format!("{}{}", base.trim_end_matches('/'), parts.path),
            }
        } else {
            format!("{}/{}", base.trim_end_matches('/'), parts.path)
        }
    }
}

/// Drops query string and fragment from a base URL
fn strip_base(base: &str) -> String {
    let parts = split_url(base.trim());
    match parts.scheme {
        Some(scheme) if !parts.netloc.is_empty() => {
            format!("{}://{}{}", scheme, parts.netloc, parts.path)
        }
        _ => parts.path.to_string(),
    }
}
