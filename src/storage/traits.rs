//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{PageRecord, RunRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Implementations are shared by every worker at once, so all methods take
/// `&self` and must be safe to call concurrently.
pub trait Storage: Send + Sync {
    // ===== Page Records =====

    /// Inserts a record unless one with the same URL already exists
    ///
    /// # Returns
    ///
    /// `true` only when this call created the row; a duplicate URL is a
    /// successful no-op returning `false`.
    fn insert_if_absent(&self, record: &PageRecord) -> StorageResult<bool>;

    /// Gets a record by URL
    fn get_page(&self, url: &str) -> StorageResult<Option<PageRecord>>;

    /// Gets total record count
    fn count_pages(&self) -> StorageResult<u64>;

    /// Gets record counts per category, largest first
    fn count_by_category(&self) -> StorageResult<Vec<(String, u64)>>;

    // ===== Run Management =====

    /// Opens a run record and returns its ID
    fn create_run(&self, config_hash: &str) -> StorageResult<i64>;

    /// Closes a run record with its final total and stop reason
    fn finish_run(&self, run_id: i64, total: u64, stop_reason: &str) -> StorageResult<()>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;
}
