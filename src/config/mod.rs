//! Configuration module for Lantern Crawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use lantern_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("lantern.toml")).unwrap();
//! println!("Crawling {} with {} workers", config.site.base_url, config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CategoryRule, ClassifierConfig, Config, CrawlerConfig, OutputConfig, SiteConfig,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
