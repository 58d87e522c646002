// src/export/bulk.rs

//! Bulk-upsert wire format for the index endpoint.
//!
//! One request carries newline-delimited (action, document) pairs. The
//! action line names the target index and uses the page URL as `_id`, so
//! re-exporting a page overwrites its document instead of appending.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::PageCapture;

/// A fixed, non-empty run of captures chosen for one export call.
#[derive(Debug, Clone)]
pub struct BulkBatch {
    pages: Vec<PageCapture>,
}

impl BulkBatch {
    /// Form a batch. Batches are never empty and never change after this.
    pub fn new(pages: Vec<PageCapture>) -> Result<Self> {
        if pages.is_empty() {
            return Err(AppError::validation("bulk batch may not be empty"));
        }
        Ok(Self { pages })
    }

    /// Split captures into batches of at most `max_size` pages each.
    pub fn chunk(pages: Vec<PageCapture>, max_size: usize) -> Result<Vec<Self>> {
        if max_size == 0 {
            return Err(AppError::validation("bulk batch size must be > 0"));
        }
        let mut batches = Vec::new();
        let mut iter = pages.into_iter().peekable();
        while iter.peek().is_some() {
            let pages: Vec<PageCapture> = iter.by_ref().take(max_size).collect();
            batches.push(Self { pages });
        }
        Ok(batches)
    }

    /// Number of captures in the batch.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// The captures in this batch.
    pub fn pages(&self) -> &[PageCapture] {
        &self.pages
    }

    /// Identifiers of every capture, in batch order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|p| p.id())
    }

    /// Render the batch as newline-delimited action/document pairs.
    ///
    /// The body ends with the trailing newline the protocol requires.
    pub fn to_ndjson(&self, index: &str) -> Result<String> {
        let mut body = String::new();
        for page in &self.pages {
            let action = BulkAction {
                index: ActionMeta {
                    index,
                    id: page.id(),
                },
            };
            body.push_str(&serde_json::to_string(&action)?);
            body.push('\n');
            body.push_str(&serde_json::to_string(page)?);
            body.push('\n');
        }
        Ok(body)
    }
}

/// Action line of one bulk operation.
#[derive(Debug, Serialize)]
struct BulkAction<'a> {
    index: ActionMeta<'a>,
}

/// Target coordinates of one bulk operation.
#[derive(Debug, Serialize)]
struct ActionMeta<'a> {
    #[serde(rename = "_index")]
    index: &'a str,
    #[serde(rename = "_id")]
    id: &'a str,
}

/// Response envelope returned by the bulk endpoint.
#[derive(Debug, Deserialize)]
pub struct BulkResponse {
    /// Server-side processing time in milliseconds
    pub took: u64,

    /// Whether any item failed
    pub errors: bool,

    /// Per-item outcomes, in request order
    #[serde(default)]
    pub items: Vec<BulkItem>,
}

impl BulkResponse {
    /// Ids of the items whose outcome indicates failure.
    pub fn failed_ids(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| item.index.failed())
            .map(|item| item.index.id.clone())
            .collect()
    }
}

/// One item of a bulk response.
#[derive(Debug, Deserialize)]
pub struct BulkItem {
    /// Outcome of the index operation
    pub index: BulkItemStatus,
}

/// Outcome of a single indexed document.
#[derive(Debug, Deserialize)]
pub struct BulkItemStatus {
    /// Document id, the page URL
    #[serde(rename = "_id")]
    pub id: String,

    /// HTTP-like status for this item
    pub status: u16,

    /// Failure detail, absent on success
    #[serde(default)]
    pub error: Option<BulkItemError>,
}

impl BulkItemStatus {
    /// Whether this item failed.
    pub fn failed(&self) -> bool {
        self.error.is_some() || self.status >= 300
    }
}

/// Failure detail for one rejected item.
#[derive(Debug, Deserialize)]
pub struct BulkItemError {
    /// Error category reported by the index
    #[serde(rename = "type")]
    pub kind: String,

    /// Human-readable reason
    #[serde(default)]
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageUrl;

    fn capture(path: &str) -> PageCapture {
        PageCapture::new(
            PageUrl::parse(&format!("https://example.com{path}")).unwrap(),
            format!("Title {path}"),
            format!("Text of {path}"),
        )
    }

    #[test]
    fn test_batch_rejects_empty() {
        assert!(BulkBatch::new(Vec::new()).is_err());
    }

    #[test]
    fn test_chunk_respects_max_size() {
        let pages = vec![
            capture("/1"),
            capture("/2"),
            capture("/3"),
            capture("/4"),
            capture("/5"),
        ];
        let batches = BulkBatch::chunk(pages, 2).unwrap();
        let sizes: Vec<usize> = batches.iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[test]
    fn test_chunk_exact_fit_is_one_batch() {
        let pages = vec![capture("/1"), capture("/2"), capture("/3")];
        let batches = BulkBatch::chunk(pages, 3).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 3);
    }

    #[test]
    fn test_chunk_of_nothing_is_no_batches() {
        assert!(BulkBatch::chunk(Vec::new(), 10).unwrap().is_empty());
    }

    #[test]
    fn test_chunk_rejects_zero_size() {
        assert!(BulkBatch::chunk(vec![capture("/1")], 0).is_err());
    }

    #[test]
    fn test_ndjson_shape() {
        let batch = BulkBatch::new(vec![capture("/1"), capture("/2")]).unwrap();
        let body = batch.to_ndjson("pages").unwrap();

        assert!(body.ends_with('\n'));
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 4);

        let action: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(action["index"]["_index"], "pages");
        assert_eq!(action["index"]["_id"], "https://example.com/1");

        let document: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(document["url"], "https://example.com/1");
        assert_eq!(document["title"], "Title /1");
        assert_eq!(document["textContent"], "Text of /1");

        let action: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(action["index"]["_id"], "https://example.com/2");
    }

    #[test]
    fn test_ndjson_is_stable_across_calls() {
        let batch = BulkBatch::new(vec![capture("/1"), capture("/2")]).unwrap();
        let first = batch.to_ndjson("pages").unwrap();
        let second = batch.to_ndjson("pages").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_and_full_batches_serialize_alike() {
        let single = BulkBatch::new(vec![capture("/only")]).unwrap();
        let body = single.to_ndjson("pages").unwrap();
        assert_eq!(body.lines().count(), 2);

        let full = BulkBatch::chunk((1..=50).map(|i| capture(&format!("/{i}"))).collect(), 50)
            .unwrap()
            .remove(0);
        let body = full.to_ndjson("pages").unwrap();
        assert_eq!(body.lines().count(), 100);
    }

    #[test]
    fn test_parse_success_response() {
        let response: BulkResponse = serde_json::from_str(
            r#"{
                "took": 30,
                "errors": false,
                "items": [
                    {"index": {"_index": "pages", "_id": "https://example.com/1", "status": 201}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(response.took, 30);
        assert!(!response.errors);
        assert!(response.failed_ids().is_empty());
    }

    #[test]
    fn test_parse_partial_failure_collects_failed_ids() {
        let response: BulkResponse = serde_json::from_str(
            r#"{
                "took": 44,
                "errors": true,
                "items": [
                    {"index": {"_index": "pages", "_id": "https://example.com/1", "status": 200}},
                    {"index": {"_index": "pages", "_id": "https://example.com/2", "status": 409,
                        "error": {"type": "version_conflict_engine_exception",
                                  "reason": "[https://example.com/2]: version conflict"}}},
                    {"index": {"_index": "pages", "_id": "https://example.com/3", "status": 201}}
                ]
            }"#,
        )
        .unwrap();

        assert!(response.errors);
        assert_eq!(response.failed_ids(), vec!["https://example.com/2"]);
        assert_eq!(
            response.items[1].index.error.as_ref().unwrap().kind,
            "version_conflict_engine_exception"
        );
    }

    #[test]
    fn test_bad_status_without_error_detail_counts_failed() {
        let item: BulkItemStatus = serde_json::from_str(
            r#"{"_id": "https://example.com/x", "status": 429}"#,
        )
        .unwrap();
        assert!(item.failed());
    }
}
