// src/error.rs

//! Unified error handling for the crawl-to-index pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client construction or request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Crawling error
    #[error("Crawl error for {context}: {message}")]
    Crawl { context: String, message: String },

    /// Bulk request never reached the index (connection refused, timeout).
    /// Nothing in the batch can be assumed written.
    #[error("Export transport error: {0}")]
    ExportTransport(#[source] reqwest::Error),

    /// Index answered with a server-error status; treated as unhealthy.
    #[error("Index endpoint returned HTTP {status}")]
    ExportServer { status: u16 },

    /// Index response body could not be interpreted per item.
    #[error("Unreadable index response (HTTP {status}): {message}")]
    ExportResponse { status: u16, message: String },
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a crawl error with context.
    pub fn crawl(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Crawl {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create an unreadable-response error.
    pub fn export_response(status: u16, message: impl fmt::Display) -> Self {
        Self::ExportResponse {
            status,
            message: message.to_string(),
        }
    }

    /// Whether this error is one of the fatal export classes, meaning the
    /// whole batch must be treated as unsent.
    pub fn is_export_fatal(&self) -> bool {
        matches!(
            self,
            Self::ExportTransport(_) | Self::ExportServer { .. } | Self::ExportResponse { .. }
        )
    }
}
