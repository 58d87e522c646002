// src/models/mod.rs

//! Domain models for the crawl-to-index pipeline.

mod config;
mod page;

// Re-export all public types
pub use config::{Config, CrawlerConfig, IndexConfig};
pub use page::{PageCapture, PageUrl};
