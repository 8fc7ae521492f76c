//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Insert-if-absent persistence of page records keyed by URL
//! - Run tracking

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::LanternError;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(LanternError)` - Failed to open the file or create the schema
pub fn open_storage(path: &Path) -> Result<SqliteStorage, LanternError> {
    SqliteStorage::new(path)
}

/// A discovered page, as persisted
///
/// Built by a worker after a successful fetch and parse, then handed to the
/// sink; never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub category: String,
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub total: u64,
    pub stop_reason: Option<String>,
}
