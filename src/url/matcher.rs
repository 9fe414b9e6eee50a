use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Which links a crawl keeps, relative to the root URL's host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Keep every link
    #[default]
    Any,
    /// Keep only links on the root URL's host
    InternalOnly,
    /// Keep only links on other hosts
    ExternalOnly,
}

impl Scope {
    /// Builds a scope from the two mutually exclusive config flags
    pub fn from_flags(internal_only: bool, external_only: bool) -> Result<Self, ConfigError> {
        match (internal_only, external_only) {
            (true, true) => Err(ConfigError::ConflictingScope),
            (true, false) => Ok(Self::InternalOnly),
            (false, true) => Ok(Self::ExternalOnly),
            (false, false) => Ok(Self::Any),
        }
    }
}

/// Why a discovered link was kept or dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkVerdict {
    /// Link passes every configured filter
    Keep,
    /// Link does not match the configured pattern
    PatternMismatch,
    /// Link points off-site while only internal links are wanted
    External,
    /// Link points on-site while only external links are wanted
    Internal,
}

/// Applies the URL pattern and scope filters to canonical links
#[derive(Debug, Clone)]
pub struct LinkFilter {
    pattern: Option<Regex>,
    scope: Scope,
    root_host: Option<String>,
}

impl LinkFilter {
    /// Creates a filter for links discovered from `root_url`
    ///
    /// # Arguments
    ///
    /// * `root_url` - The crawl root; its host decides internal vs external
    /// * `pattern` - Optional regex the whole canonical URL must match
    /// * `scope` - Which hosts to keep
    ///
    /// # Returns
    ///
    /// * `Ok(LinkFilter)` - Ready to use
    /// * `Err(ConfigError::InvalidPattern)` - The pattern does not compile
    pub fn new(root_url: &str, pattern: Option<&str>, scope: Scope) -> Result<Self, ConfigError> {
        let pattern = pattern.map(compile_full_match).transpose()?;

        Ok(Self {
            pattern,
            scope,
            root_host: host_of(root_url),
        })
    }

    /// Returns the scope this filter applies
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Checks a canonical link against the pattern, then the scope
    pub fn check(&self, url: &str) -> LinkVerdict {
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(url) {
                return LinkVerdict::PatternMismatch;
            }
        }

        let internal = self.root_host.is_some() && host_of(url) == self.root_host;
        match self.scope {
            Scope::InternalOnly if !internal => LinkVerdict::External,
            Scope::ExternalOnly if internal => LinkVerdict::Internal,
            _ => LinkVerdict::Keep,
        }
    }
}

/// Compiles a user pattern so that it must match the entire URL
pub fn compile_full_match(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(&format!("^(?:{})$", pattern))
        .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))
}

/// Lowercased `host[:port]` of a URL
///
/// The port is only included when it differs from the scheme's default, and
/// userinfo never is.
///
/// # Returns
///
/// * `Some(String)` - The host, with a non-default port appended
/// * `None` - If the URL does not parse or has no host
pub fn host_of(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}
