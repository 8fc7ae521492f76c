//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `Progress`: the process-wide persisted-record counter, the record cap and the run clock

mod progress;

pub use progress::{deadline_after, rate, Progress};
