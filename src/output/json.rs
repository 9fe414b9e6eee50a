use crate::output::OutputResult;
use crate::state::CrawlResult;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::Path;

/// Renders crawl results as JSON indented with four spaces
///
/// Keys are canonical page URLs; each value holds a `"urls"` array and, when
/// bodies were collected, a `"body"` string.
pub fn to_pretty_json(results: &CrawlResult) -> OutputResult<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    results.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Writes crawl results to `path` as UTF-8 JSON, replacing any existing file
///
/// # Returns
///
/// * `Ok(())` - Results written
/// * `Err(OutputError)` - Serialization or I/O failed
pub async fn save_results(path: &Path, results: &CrawlResult) -> OutputResult<()> {
    let json = to_pretty_json(results)?;
    tokio::fs::write(path, json).await?;
    tracing::info!(path = %path.display(), pages = results.len(), "Saved crawl results");
    Ok(())
}
