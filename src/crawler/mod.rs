//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The deduplicating, bounded frontier
//! - HTTP fetching, HTML parsing and URL classification
//! - The worker loop and the sink it persists through
//! - Overall run coordination

mod classify;
mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod parser;
mod sink;
mod worker;

pub use classify::Classifier;
pub use coordinator::{run_crawl, Coordinator, CrawlSummary, RunPhase, StopReason};
pub use extractor::{Extracted, Extractor};
pub use fetcher::{build_http_client, fetch_page, FetchError};
pub use frontier::{Frontier, Lease, Popped};
pub use parser::{parse_html, ParsedPage};
pub use sink::Sink;
pub use worker::{Worker, WorkerExit, WorkerReport};

use crate::config::Config;
use crate::LanternError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the database and record a new run
/// 2. Seed the frontier
/// 3. Run the workers until the site is exhausted, the record cap is hit,
///    or the run deadline passes
/// 4. Drain the workers and close the run
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
/// * `config_hash` - Hash of the config file, stored with the run
pub async fn crawl(config: Config, config_hash: String) -> Result<CrawlSummary, LanternError> {
    run_crawl(config, config_hash).await
}
