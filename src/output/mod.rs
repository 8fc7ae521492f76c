//! Output module for run reporting
//!
//! This module handles:
//! - Periodic status lines while a crawl runs
//! - Statistics read back from an existing database

mod monitor;
pub mod stats;

pub use monitor::{spawn_monitor, MonitorHandle};
pub use stats::{load_statistics, print_statistics, CrawlStatistics};
