//! Crawl worker loop
//!
//! Each worker repeatedly checks the stop conditions, takes the next URL from
//! the frontier, processes it, persists the record and offers the page's
//! links back to the frontier. A worker never aborts its own in-flight fetch;
//! stop conditions are only observed between URLs.

use crate::crawler::extractor::Extractor;
use crate::crawler::frontier::{Frontier, Popped};
use crate::crawler::sink::Sink;
use crate::storage::PageRecord;
use std::sync::Arc;
use tokio::time::Instant;

/// Why a worker left its loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The frontier closed and drained
    Closed,
    /// The record cap was observed before popping
    Capped,
    /// The run deadline passed before popping
    Deadline,
}

/// Per-worker counters reported on exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: usize,
    pub processed: u64,
    pub persisted: u64,
    pub exit: WorkerExit,
}

/// One crawl worker
pub struct Worker {
    id: usize,
    frontier: Arc<Frontier>,
    extractor: Arc<Extractor>,
    sink: Sink,
    deadline: Instant,
}

impl Worker {
    pub fn new(
        id: usize,
        frontier: Arc<Frontier>,
        extractor: Arc<Extractor>,
        sink: Sink,
        deadline: Instant,
    ) -> Self {
        Self {
            id,
            frontier,
            extractor,
            sink,
            deadline,
        }
    }

    fn should_stop(&self) -> Option<WorkerExit> {
        if self.sink.progress().is_capped() {
            Some(WorkerExit::Capped)
        } else if Instant::now() >= self.deadline {
            Some(WorkerExit::Deadline)
        } else {
            None
        }
    }

    /// Runs until the frontier closes or a stop condition is observed
    pub async fn run(self) -> WorkerReport {
        let mut processed = 0;
        let mut persisted = 0;

        let exit = loop {
            if let Some(reason) = self.should_stop() {
                break reason;
            }

            let lease = match self.frontier.pop().await {
                Popped::Url(lease) => lease,
                Popped::Closed => break WorkerExit::Closed,
            };

            let url = lease.url();
            let extracted = self.extractor.process(url).await;
            processed += 1;

            if extracted.has_record() {
                let record = PageRecord {
                    url: url.to_string(),
                    title: extracted.title,
                    category: extracted.category,
                };
                if self.sink.persist_blocking(record).await {
                    persisted += 1;
                }

                for link in &extracted.links {
                    self.frontier.offer(link);
                }
            }

            // Children are queued before the lease is released
            drop(lease);
        };

        tracing::debug!(
            "Worker {} exiting ({:?}): {} processed, {} persisted",
            self.id,
            exit,
            processed,
            persisted
        );

        WorkerReport {
            id: self.id,
            processed,
            persisted,
            exit,
        }
    }
}
