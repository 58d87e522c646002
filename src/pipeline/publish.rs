// src/pipeline/publish.rs

//! Publish stage: chunk captures into batches and drive the export client.

use chrono::Utc;

use crate::error::Result;
use crate::export::{BulkBatch, BulkExportClient, ExportOutcome};
use crate::models::{Config, PageCapture};

/// Aggregate result of one publish run.
#[derive(Debug, Default)]
pub struct PublishSummary {
    /// Batches successfully sent and interpreted
    pub batches_sent: usize,

    /// Documents the index accepted
    pub pages_indexed: usize,

    /// Ids the index rejected, needing retry or operator attention
    pub failed_ids: Vec<String>,

    /// Sum of server-side processing times in milliseconds
    pub total_took_ms: u64,
}

/// Export `pages` to the index in `batch_size`-bounded batches.
///
/// Batches go out sequentially over the shared client. Partial failures are
/// collected into the summary and never retried here; a fatal outcome stops
/// the run and propagates after the progress so far is logged.
pub async fn run_publish(
    config: &Config,
    client: &BulkExportClient,
    pages: Vec<PageCapture>,
) -> Result<PublishSummary> {
    let start_time = Utc::now();
    let total = pages.len();
    let batches = BulkBatch::chunk(pages, config.index.batch_size)?;
    log::info!(
        "publishing {} page(s) in {} batch(es) to {}",
        total,
        batches.len(),
        client.endpoint()
    );

    let mut summary = PublishSummary::default();
    for (number, batch) in batches.iter().enumerate() {
        let outcome = match client.export(batch).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!(
                    "batch {}/{} failed fatally after {} batch(es) landed: {}",
                    number + 1,
                    batches.len(),
                    summary.batches_sent,
                    e
                );
                return Err(e);
            }
        };

        summary.batches_sent += 1;
        summary.total_took_ms += outcome.took_ms();
        match &outcome {
            ExportOutcome::Success { .. } => {
                summary.pages_indexed += batch.len();
            }
            ExportOutcome::PartialFailure { failed_ids, .. } => {
                // A misbehaving index may report more failed items than the
                // batch holds; never count below zero.
                summary.pages_indexed += batch.len().saturating_sub(failed_ids.len());
                summary.failed_ids.extend(failed_ids.iter().cloned());
            }
        }
    }

    let elapsed = Utc::now() - start_time;
    log::info!(
        "publish finished in {}s: {} batch(es), {} page(s) indexed, {} failed",
        elapsed.num_seconds(),
        summary.batches_sent,
        summary.pages_indexed,
        summary.failed_ids.len()
    );
    for id in &summary.failed_ids {
        log::warn!("index rejected {id}");
    }

    Ok(summary)
}
