//! HTTP transport seam
//!
//! The crawler, the fetcher and the robots cache only ever issue plain GET
//! requests. They do so through [`Transport`] so tests can script responses
//! without a network.

use crate::config::CrawlConfig;
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on the time spent establishing a connection
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A completed HTTP exchange; non-2xx statuses are responses, not errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as text
    pub body: String,
}

impl HttpResponse {
    /// Creates a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures below the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}

/// Issues GET requests on behalf of the crawler
pub trait Transport: Send + Sync + 'static {
    /// Fetches `url`, returning the status and body of the response
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).get(url)
    }
}

/// [`Transport`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a transport using the configured user agent and timeout
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed with reqwest's default policy, responses may be
/// gzip or brotli encoded, and every request is bounded by
/// `request_timeout`.
///
/// # Arguments
///
/// * `config` - The crawl configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    let timeout = config.request_timeout_duration();

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout.min(CONNECT_TIMEOUT))
        .gzip(true)
        .brotli(true)
        .build()
}
