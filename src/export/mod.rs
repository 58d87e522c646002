// src/export/mod.rs

//! Bulk export of page captures to the search index.

mod bulk;
mod client;

// Re-export all public types
pub use bulk::{BulkBatch, BulkItem, BulkItemError, BulkItemStatus, BulkResponse};
pub use client::{BulkExportClient, ExportOutcome};
