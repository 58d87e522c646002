//! Persistence for crawl snapshots.
//!
//! A crawl run's captures are archived to disk between the crawl and
//! publish stages, so operators can inspect or re-publish them without
//! crawling again.

pub mod local;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::PageCapture;

// Re-export for convenience
pub use local::LocalStore;

/// Envelope for one crawl run's captured pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSnapshot {
    /// ISO 8601 timestamp of the crawl
    pub generated_at: DateTime<Utc>,

    /// Seed URL the crawl started from
    pub seed: String,

    /// Total capture count
    pub count: usize,

    /// The captures, in discovery order
    pub pages: Vec<PageCapture>,
}

impl CaptureSnapshot {
    pub fn new(seed: impl Into<String>, pages: Vec<PageCapture>) -> Self {
        Self {
            generated_at: Utc::now(),
            seed: seed.into(),
            count: pages.len(),
            pages,
        }
    }
}
