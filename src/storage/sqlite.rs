//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{PageRecord, RunRecord};
use crate::LanternError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite storage backend
///
/// A single connection behind a mutex; every statement is short, so workers
/// contend only for the duration of one insert.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens or creates the database file and its schema
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(LanternError)` - Failed to open database or create the schema
    pub fn new(path: &Path) -> Result<Self, LanternError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            PRAGMA busy_timeout = 5000;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, LanternError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Database("connection mutex poisoned".to_string()))
    }
}

impl Storage for SqliteStorage {
    // ===== Page Records =====

    fn insert_if_absent(&self, record: &PageRecord) -> StorageResult<bool> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn()?.execute(
            "INSERT OR IGNORE INTO pages (url, title, category, discovered_at) VALUES (?1, ?2, ?3, ?4)",
            params![record.url, record.title, record.category, now],
        )?;
        Ok(inserted == 1)
    }

    fn get_page(&self, url: &str) -> StorageResult<Option<PageRecord>> {
        let conn = self.conn()?;
        let page = conn
            .query_row(
                "SELECT url, title, category FROM pages WHERE url = ?1",
                params![url],
                |row| {
                    Ok(PageRecord {
                        url: row.get(0)?,
                        title: row.get(1)?,
                        category: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(page)
    }

    fn count_pages(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_by_category(&self) -> StorageResult<Vec<(String, u64)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT category, COUNT(*) AS n FROM pages GROUP BY category ORDER BY n DESC, category ASC",
        )?;

        let counts = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(counts)
    }

    // ===== Run Management =====

    fn create_run(&self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO runs (started_at, config_hash) VALUES (?1, ?2)",
            params![now, config_hash],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn finish_run(&self, run_id: i64, total: u64, stop_reason: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn()?.execute(
            "UPDATE runs SET finished_at = ?1, total = ?2, stop_reason = ?3 WHERE id = ?4",
            params![now, total as i64, stop_reason, run_id],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let conn = self.conn()?;
        let run = conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, total, stop_reason
                 FROM runs ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    Ok(RunRecord {
                        id: row.get(0)?,
                        started_at: row.get(1)?,
                        finished_at: row.get(2)?,
                        config_hash: row.get(3)?,
                        total: row.get::<_, i64>(4)? as u64,
                        stop_reason: row.get(5)?,
                    })
                },
            )
            .optional()?;

        Ok(run)
    }
}
