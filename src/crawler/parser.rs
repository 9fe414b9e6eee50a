//! HTML link extraction
//!
//! Pulls raw `href` values out of anchor tags. Resolution against the page
//! URL happens later, in [`crate::url::Canonicalizer`], because it depends on
//! per-crawl state.

use scraper::{Html, Selector};

/// Extracts the `href` of every `<a href>` element, in document order
///
/// Values are whitespace-trimmed but otherwise untouched; duplicates are
/// kept. Anchors without an `href` attribute are ignored.
///
/// # Example
///
/// ```
/// use datacrawl::crawler::extract_links;
///
/// let html = r#"<html><body><a href="/page">Page</a><a name="x">No link</a></body></html>"#;
/// assert_eq!(extract_links(html), vec!["/page".to_string()]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .collect()
}
