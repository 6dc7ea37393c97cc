//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ArticleStore trait.

use crate::crawler::ArticleRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ArticleStore, StorageResult};
use crate::storage::{StoreStatistics, StoredArticle};
use rusqlite::{params, Connection};
use std::path::Path;

const INSERT_OR_IGNORE_SQL: &str =
    "INSERT OR IGNORE INTO article_urls (url, title, publish_time, list_url) VALUES (?1, ?2, ?3, ?4)";

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file at `path`
    ///
    /// The schema is not touched here; call `ensure_schema` before writing.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Ok(Self { conn })
    }

    /// Opens the database and ensures the schema in one step
    pub fn open_with_schema(path: &Path) -> StorageResult<Self> {
        let mut store = Self::open(path)?;
        store.ensure_schema()?;
        Ok(store)
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }
}

impl ArticleStore for SqliteStore {
    fn ensure_schema(&mut self) -> StorageResult<()> {
        initialize_schema(&self.conn)?;
        Ok(())
    }

    fn insert_or_ignore(
        &mut self,
        records: &[ArticleRecord],
        list_url: &str,
    ) -> StorageResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(INSERT_OR_IGNORE_SQL)?;
            for record in records {
                inserted += stmt.execute(params![
                    record.url,
                    record.title,
                    record.publish_time,
                    list_url
                ])?;
            }
        }
        tx.commit()?;

        Ok(inserted)
    }

    fn count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM article_urls", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn statistics(&self) -> StorageResult<StoreStatistics> {
        let stats = self.conn.query_row(
            "SELECT COUNT(*), COUNT(DISTINCT list_url), MIN(crawled_at), MAX(crawled_at)
             FROM article_urls",
            [],
            |row| {
                Ok(StoreStatistics {
                    distinct_urls: row.get::<_, i64>(0)? as u64,
                    list_pages: row.get::<_, i64>(1)? as u64,
                    first_crawled_at: row.get(2)?,
                    last_crawled_at: row.get(3)?,
                })
            },
        )?;
        Ok(stats)
    }

    fn recent(&self, limit: usize) -> StorageResult<Vec<StoredArticle>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, url, title, publish_time, list_url, crawled_at
             FROM article_urls ORDER BY id DESC LIMIT ?1",
        )?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(StoredArticle {
                    id: row.get(0)?,
                    url: row.get(1)?,
                    title: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    publish_time: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    list_url: row.get(4)?,
                    crawled_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}
