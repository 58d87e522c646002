// src/pipeline/mod.rs

//! Pipeline stage entry points.
//!
//! - `run_crawl`: capture the site reachable from a seed URL
//! - `run_publish`: export captured pages to the search index

mod crawl;
mod publish;

// Re-export all public types
pub use crawl::run_crawl;
pub use publish::{PublishSummary, run_publish};
