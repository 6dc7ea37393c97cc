//! Statistics from an existing article store
//!
//! This module provides functionality for extracting and displaying
//! store statistics without running a harvest.

use crate::storage::{parse_sqlite_timestamp, ArticleStore, StoreStatistics, StoredArticle};
use crate::Result;

/// Store statistics plus a sample of the newest rows
#[derive(Debug, Clone)]
pub struct HarvestStatistics {
    pub store: StoreStatistics,
    pub recent: Vec<StoredArticle>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `store` - The store to query
/// * `recent_limit` - How many of the newest rows to include
pub fn load_statistics(
    store: &dyn ArticleStore,
    recent_limit: usize,
) -> Result<HarvestStatistics> {
    Ok(HarvestStatistics {
        store: store.statistics()?,
        recent: store.recent(recent_limit)?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Store Statistics ===\n");

    println!("Overview:");
    println!("  Distinct URLs: {}", stats.store.distinct_urls);
    println!("  Listing pages: {}", stats.store.list_pages);

    if let (Some(first), Some(last)) = (
        stats.store.first_crawled_at.as_deref(),
        stats.store.last_crawled_at.as_deref(),
    ) {
        println!("  First stored: {}", first);
        println!("  Last stored: {}", last);

        if let (Some(first), Some(last)) = (parse_sqlite_timestamp(first), parse_sqlite_timestamp(last)) {
            let span = last - first;
            println!(
                "  Span: {}d {}h {}m",
                span.num_days(),
                span.num_hours() % 24,
                span.num_minutes() % 60
            );
        }
    }
    println!();

    if !stats.recent.is_empty() {
        println!("Most Recent ({}):", stats.recent.len());
        for article in &stats.recent {
            let title = if article.title.is_empty() {
                "(untitled)"
            } else {
                article.title.as_str()
            };
            let time = if article.publish_time.is_empty() {
                "-"
            } else {
                article.publish_time.as_str()
            };
            println!("  [{}] {} {}", time, title, article.url);
        }
    }
}
