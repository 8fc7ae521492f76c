//! URL handling module for Lantern Crawl
//!
//! This module provides URL normalization and the site scope that decides
//! which discovered links are followed.

mod normalize;
mod scope;

pub use normalize::normalize_url;
pub use scope::SiteScope;
