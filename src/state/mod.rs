//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageRecord` / `CrawlResult`: what was recorded for each fetched page
//! - `CrawlState`: visited pages, frontier, page count and learned scheme,
//!   shared by all workers under one lock

mod crawl_state;
mod page_record;

// Re-export main types
pub use crawl_state::CrawlState;
pub use page_record::{CrawlResult, PageRecord};
