use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the crawl recorded for one fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Canonical outbound links that passed filtering, in document order,
    /// without duplicates
    pub urls: Vec<String>,

    /// Raw page body, kept only when body inclusion is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Crawl results keyed by canonical page URL
///
/// Ordered so that persisted output is stable between runs.
pub type CrawlResult = BTreeMap<String, PageRecord>;
