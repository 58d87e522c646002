// src/crawl/mod.rs

//! Site traversal: frontier bookkeeping and the crawl engine.

mod engine;
mod frontier;

// Re-export all public types
pub use engine::{CancelFlag, CrawlEngine, CrawlOutcome, PageFailure, Termination};
pub use frontier::{Frontier, QueuedUrl};
