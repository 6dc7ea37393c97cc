//! Storage traits and error types
//!
//! This module defines the trait interface for the dedup store and its
//! associated error types.

use crate::crawler::ArticleRecord;
use crate::storage::{StoreStatistics, StoredArticle};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Writer is no longer accepting batches")]
    WriterClosed,

    #[error("Writer task failed: {0}")]
    WriterFailed(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for article store backends
///
/// Every stored row is keyed by its URL. Mutating calls take `&mut self` so
/// a single owner (the store writer) is the only code path that writes.
pub trait ArticleStore: Send {
    /// Creates the article table and its id sequence if absent
    ///
    /// Safe to call on an existing database; never drops or rewrites rows.
    fn ensure_schema(&mut self) -> StorageResult<()>;

    /// Inserts each record keyed by URL, silently skipping URLs already stored
    ///
    /// The batch is written in one transaction. Existing rows are never
    /// updated.
    ///
    /// # Arguments
    ///
    /// * `records` - Records extracted from one listing page
    /// * `list_url` - The listing page the records came from
    ///
    /// # Returns
    ///
    /// The number of rows actually inserted
    fn insert_or_ignore(&mut self, records: &[ArticleRecord], list_url: &str)
        -> StorageResult<usize>;

    /// Counts distinct stored URLs
    fn count(&self) -> StorageResult<u64>;

    /// Summarizes the stored rows
    fn statistics(&self) -> StorageResult<StoreStatistics>;

    /// Gets the most recently stored rows, newest first
    fn recent(&self, limit: usize) -> StorageResult<Vec<StoredArticle>>;
}
