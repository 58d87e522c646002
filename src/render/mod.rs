// src/render/mod.rs

//! Rendering boundary.
//!
//! A renderer loads one URL and reports the page's title, visible text and
//! outbound links. The crawl engine only ever talks to this trait; the
//! default [`HttpRenderer`] fetches plain HTML over HTTP, and a headless
//! browser session would plug in behind the same interface.

pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::PageUrl;

// Re-export for convenience
pub use http::HttpRenderer;

/// Result of one render call.
pub type RenderResult = std::result::Result<RenderedPage, RenderError>;

/// Rendered contents of a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPage {
    /// Page title, empty if the document had none
    pub title: String,

    /// Visible text content, whitespace-normalized
    pub text_content: String,

    /// Raw outbound hrefs, unresolved
    pub links: Vec<String>,
}

/// Failure to render one page, classified by how the caller should react.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// Worth retrying: timeout, connection trouble, overloaded upstream.
    #[error("transient render failure: {0}")]
    Transient(String),

    /// Will not succeed on retry: client-error status, non-HTML content.
    #[error("permanent render failure: {0}")]
    Permanent(String),

    /// The renderer itself is unusable; the crawl cannot continue.
    #[error("fatal renderer failure: {0}")]
    Fatal(String),
}

impl RenderError {
    /// Whether a retry of the same URL may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Whether the renderer is unusable for any further URL.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

/// A source of rendered pages.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Load `url` and return its rendered content.
    async fn render(&self, url: &PageUrl) -> RenderResult;
}
