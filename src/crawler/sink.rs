//! Persistence of page records and the progress counter behind it

use crate::state::Progress;
use crate::storage::{PageRecord, Storage};
use std::sync::Arc;

/// Writes records to storage at most once per URL
///
/// The sink is the only writer of [`Progress`]: the counter moves only after
/// the row is actually in the table.
#[derive(Clone)]
pub struct Sink {
    storage: Arc<dyn Storage>,
    progress: Arc<Progress>,
}

impl Sink {
    pub fn new(storage: Arc<dyn Storage>, progress: Arc<Progress>) -> Self {
        Self { storage, progress }
    }

    /// Persists `record` unless its URL is already stored
    ///
    /// Returns true only when this call inserted the row. A duplicate is a
    /// silent no-op; any other write error is logged and treated the same.
    pub fn persist(&self, record: &PageRecord) -> bool {
        match self.storage.insert_if_absent(record) {
            Ok(true) => {
                let total = self.progress.increment();
                tracing::debug!("Stored {} [{}] (total {})", record.url, record.category, total);
                true
            }
            Ok(false) => {
                tracing::trace!("Already stored: {}", record.url);
                false
            }
            Err(e) => {
                tracing::warn!("Failed to store {}: {}", record.url, e);
                false
            }
        }
    }

    /// Runs [`Sink::persist`] on the blocking thread pool
    ///
    /// Workers call this so a contended connection lock stalls a blocking
    /// thread rather than a runtime worker thread.
    pub async fn persist_blocking(&self, record: PageRecord) -> bool {
        let sink = self.clone();
        let url = record.url.clone();

        match tokio::task::spawn_blocking(move || sink.persist(&record)).await {
            Ok(inserted) => inserted,
            Err(e) => {
                tracing::warn!("Persist task for {} failed: {}", url, e);
                false
            }
        }
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }
}
