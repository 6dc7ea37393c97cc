//! Crawler module for the fetch-parse-store pipeline
//!
//! This module contains the core harvesting logic, including:
//! - Record extraction from listing page markup
//! - HTTP fetching with a fixed browser header set and timeout
//! - Bounded-concurrency dispatch of a page range
//! - Overall run coordination

mod coordinator;
mod dispatcher;
mod extractor;
mod fetcher;

pub use coordinator::{run_harvest, Harvester};
pub use dispatcher::Dispatcher;
pub use extractor::{ArticleRecord, Extractor};
pub use fetcher::{
    build_http_client, resolve_list_url, FetchResult, PageFetcher, PageOutcome, BROWSER_USER_AGENT,
};

use crate::config::Config;
use crate::output::RunSummary;
use crate::Result;

/// Runs a complete harvest
///
/// This is the main entry point for starting a run. It will:
/// 1. Open the store and ensure its schema
/// 2. Build the HTTP client and extractor
/// 3. Fetch every page in the range on the worker pool
/// 4. Store records through the single writer
/// 5. Return the run summary
pub async fn harvest(config: Config) -> Result<RunSummary> {
    run_harvest(config).await
}
