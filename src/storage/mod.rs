//! Storage module for persisting harvested articles
//!
//! This module handles all database operations for the harvester, including:
//! - SQLite database initialization and schema management
//! - Insert-or-ignore writes keyed by article URL
//! - The single-writer actor that serializes all writes
//! - Read-side counts and statistics for reporting

mod schema;
mod sqlite;
mod traits;
mod writer;

pub use schema::SCHEMA_SQL;
pub use sqlite::SqliteStore;
pub use traits::{ArticleStore, StorageError, StorageResult};
pub use writer::{StoreWriter, WriteRequest, WriterReport};

use chrono::{DateTime, NaiveDateTime, Utc};

/// Format SQLite uses for `CURRENT_TIMESTAMP`
const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Represents a stored article row
#[derive(Debug, Clone)]
pub struct StoredArticle {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub publish_time: String,
    pub list_url: String,
    pub crawled_at: String,
}

/// Aggregate view of the article table
#[derive(Debug, Clone, Default)]
pub struct StoreStatistics {
    /// Number of distinct stored URLs
    pub distinct_urls: u64,

    /// Number of distinct listing pages that contributed rows
    pub list_pages: u64,

    /// Oldest `crawled_at` value
    pub first_crawled_at: Option<String>,

    /// Newest `crawled_at` value
    pub last_crawled_at: Option<String>,
}

/// Parses a `CURRENT_TIMESTAMP` value into a UTC datetime
pub fn parse_sqlite_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, SQLITE_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_sqlite_timestamp() {
        let parsed = parse_sqlite_timestamp("2024-05-01 13:45:09").unwrap();
        assert_eq!(parsed.year(), 2024);
        assert_eq!(parsed.month(), 5);
        assert_eq!(parsed.hour(), 13);
    }

    #[test]
    fn test_parse_invalid_timestamp() {
        assert!(parse_sqlite_timestamp("yesterday").is_none());
    }
}
