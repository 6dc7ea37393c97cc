//! Database schema definitions
//!
//! This module contains the SQL schema for the Page-Harvest database.

/// SQL schema for the database
///
/// `AUTOINCREMENT` makes SQLite track the id sequence in `sqlite_sequence`,
/// so ids are never reused even after rows are removed by hand.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS article_urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    title TEXT,
    publish_time TEXT,
    list_url TEXT NOT NULL,
    crawled_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_article_urls_list_url ON article_urls(list_url);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
