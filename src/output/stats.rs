//! Statistics generation from crawl database
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the storage layer.

use crate::storage::{RunRecord, Storage};
use crate::LanternError;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Total number of stored records
    pub total_pages: u64,

    /// Record counts per category, largest first
    pub pages_by_category: Vec<(String, u64)>,

    /// The most recent run, if any
    pub last_run: Option<RunRecord>,
}

/// Loads statistics from storage
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully loaded statistics
/// * `Err(LanternError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<CrawlStatistics, LanternError> {
    Ok(CrawlStatistics {
        total_pages: storage.count_pages()?,
        pages_by_category: storage.count_by_category()?,
        last_run: storage.get_latest_run()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Total records: {}", stats.total_pages);
    println!();

    if !stats.pages_by_category.is_empty() {
        println!("Records by Category:");
        for (category, count) in &stats.pages_by_category {
            println!(
                "  {}: {} ({:.1}%)",
                category,
                count,
                percentage(*count, stats.total_pages)
            );
        }
        println!();
    }

    match &stats.last_run {
        Some(run) => {
            println!("Last Run (#{}):", run.id);
            println!("  Started: {}", run.started_at);
            println!(
                "  Finished: {}",
                run.finished_at.as_deref().unwrap_or("(did not finish)")
            );
            println!("  Stop reason: {}", run.stop_reason.as_deref().unwrap_or("-"));
            println!("  Records: {}", run.total);
            println!("  Config hash: {}", run.config_hash);
        }
        None => println!("No runs recorded"),
    }
}

fn percentage(count: u64, total: u64) -> f64 {
    if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
