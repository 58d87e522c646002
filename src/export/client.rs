// src/export/client.rs

//! Client for the index's bulk-upsert endpoint.

use std::time::Duration;

use reqwest::{Client, header};

use crate::error::{AppError, Result};
use crate::export::bulk::{BulkBatch, BulkResponse};
use crate::models::IndexConfig;

/// What became of one export call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Every document in the batch was accepted.
    Success {
        /// Server-side processing time in milliseconds
        took_ms: u64,
    },

    /// The batch was sent and interpreted per item; the listed ids failed.
    PartialFailure {
        /// Server-side processing time in milliseconds
        took_ms: u64,

        /// Ids needing retry or operator attention
        failed_ids: Vec<String>,
    },
}

impl ExportOutcome {
    /// Server-side processing time in milliseconds.
    pub fn took_ms(&self) -> u64 {
        match self {
            Self::Success { took_ms } | Self::PartialFailure { took_ms, .. } => *took_ms,
        }
    }

    /// Ids that failed, empty on full success.
    pub fn failed_ids(&self) -> &[String] {
        match self {
            Self::Success { .. } => &[],
            Self::PartialFailure { failed_ids, .. } => failed_ids,
        }
    }
}

/// HTTP client for the bulk-upsert endpoint.
///
/// Owns one long-lived transport for the whole run. `export` never tears it
/// down, so every batch of a run reuses the same connections.
pub struct BulkExportClient {
    client: Client,
    endpoint: String,
    index: String,
}

impl BulkExportClient {
    /// Create a client against the configured endpoint.
    pub fn new(config: &IndexConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/_bulk", config.endpoint.trim_end_matches('/')),
            index: config.index.clone(),
        })
    }

    /// Full URL of the bulk endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one batch as a single bulk request and classify the response.
    ///
    /// `Err` is the fatal class: nothing in the batch can be assumed
    /// written, and the caller's untouched batch is safe to resubmit in
    /// full.
    pub async fn export(&self, batch: &BulkBatch) -> Result<ExportOutcome> {
        let body = batch.to_ndjson(&self.index)?;
        log::debug!("sending {} document(s) to {}", batch.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(AppError::ExportTransport)?;

        let status = response.status();
        let text = response.text().await.map_err(AppError::ExportTransport)?;

        if status.is_server_error() {
            log::error!("index endpoint unhealthy: HTTP {status}");
            return Err(AppError::ExportServer {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            log::warn!("unexpected HTTP {status} from index endpoint; parsing body anyway");
        }

        let parsed: BulkResponse = serde_json::from_str(&text)
            .map_err(|e| AppError::export_response(status.as_u16(), e))?;

        log::info!(
            "bulk export of {} document(s) took {} ms",
            batch.len(),
            parsed.took
        );

        if parsed.errors {
            let failed_ids = parsed.failed_ids();
            log::warn!(
                "index rejected {} of {} document(s)",
                failed_ids.len(),
                batch.len()
            );
            return Ok(ExportOutcome::PartialFailure {
                took_ms: parsed.took,
                failed_ids,
            });
        }

        Ok(ExportOutcome::Success {
            took_ms: parsed.took,
        })
    }
}
