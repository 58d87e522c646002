// src/crawl/engine.rs

//! Crawl engine.
//!
//! Breadth-first traversal from a seed URL. Drives a [`Renderer`], absorbs
//! per-page failures, and stops on frontier exhaustion, budget ceilings,
//! cancellation or a fatal renderer failure.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::Instant;

use crate::crawl::Frontier;
use crate::error::Result;
use crate::models::{CrawlerConfig, PageCapture, PageUrl};
use crate::render::{RenderError, RenderedPage, Renderer};

/// Path extensions that are never HTML pages.
const SKIPPED_EXTENSIONS: &[&str] = &[
    ".pdf", ".zip", ".tar", ".gz", ".rar", ".7z",
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".ico",
    ".mp3", ".mp4", ".avi", ".mov", ".webm",
    ".css", ".js", ".json", ".xml", ".rss",
    ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
];

/// Why a crawl run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The frontier drained; every admitted page was visited.
    Exhausted,

    /// The page budget was reached.
    PageLimit,

    /// The wall-clock budget was reached.
    TimeLimit,

    /// An operator abort was requested.
    Cancelled,

    /// The renderer became unusable. Pages captured before the failure
    /// are kept.
    Aborted(String),
}

/// One page that could not be captured.
#[derive(Debug, Clone)]
pub struct PageFailure {
    /// URL of the failed page
    pub url: PageUrl,

    /// Human-readable failure reason
    pub reason: String,

    /// Render attempts made, retries included
    pub attempts: u32,
}

/// Everything one crawl run produced.
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Captured pages in FIFO discovery order
    pub pages: Vec<PageCapture>,

    /// Pages that failed to render
    pub failures: Vec<PageFailure>,

    /// Why the run stopped
    pub termination: Termination,
}

impl CrawlOutcome {
    /// Whether the run ended in a fatal renderer abort.
    pub fn is_aborted(&self) -> bool {
        matches!(self.termination, Termination::Aborted(_))
    }
}

/// Cooperative cancellation flag shared between the engine and the
/// operator surface.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the crawl to stop once the in-flight render finishes.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Breadth-first crawler over a rendered site.
///
/// Single-threaded: one render in flight at a time, frontier mutation only
/// between renders.
pub struct CrawlEngine {
    config: CrawlerConfig,
    renderer: Arc<dyn Renderer>,
    cancel: CancelFlag,
}

impl CrawlEngine {
    /// Create an engine over the given renderer.
    pub fn new(config: CrawlerConfig, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            config,
            renderer,
            cancel: CancelFlag::new(),
        }
    }

    /// Attach a cancellation flag owned by the caller.
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Crawl the site reachable from `seed`.
    ///
    /// Fails only for an unusable seed URL. Per-page failures are recorded
    /// in the outcome and never abort the run; a fatal renderer failure
    /// stops it early with the pages captured so far.
    pub async fn run(&self, seed: &str) -> Result<CrawlOutcome> {
        let seed = PageUrl::parse(seed)?;
        let deadline = match self.config.max_duration_secs {
            0 => None,
            secs => Some(Instant::now() + Duration::from_secs(secs)),
        };
        let delay = Duration::from_millis(self.config.request_delay_ms);

        let mut frontier = Frontier::new();
        frontier.enqueue(seed.clone(), 0);

        let mut pages: Vec<PageCapture> = Vec::new();
        let mut failures: Vec<PageFailure> = Vec::new();

        // Budgets are checked before each pop so every popped URL is fully
        // processed and the partial snapshot stays consistent.
        let termination = loop {
            if self.cancel.is_cancelled() {
                break Termination::Cancelled;
            }
            // A drained frontier means the graph was fully explored, even
            // when a budget ran out on the same iteration.
            if frontier.is_empty() {
                break Termination::Exhausted;
            }
            if pages.len() >= self.config.max_pages {
                break Termination::PageLimit;
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    break Termination::TimeLimit;
                }
            }
            let Some(queued) = frontier.pop() else {
                break Termination::Exhausted;
            };

            log::debug!("rendering {} (depth {})", queued.url, queued.depth);
            match self.render_with_retry(&queued.url).await {
                Ok(rendered) => {
                    if queued.depth < self.config.max_depth {
                        for href in &rendered.links {
                            if let Some(link) = self.admit_link(&seed, &queued.url, href) {
                                frontier.enqueue(link, queued.depth + 1);
                            }
                        }
                    }
                    pages.push(PageCapture::new(
                        queued.url,
                        rendered.title,
                        rendered.text_content,
                    ));
                }
                Err((error, attempts)) => {
                    let fatal = error.is_fatal();
                    log::warn!(
                        "giving up on {} after {} attempt(s): {}",
                        queued.url,
                        attempts,
                        error
                    );
                    failures.push(PageFailure {
                        url: queued.url,
                        reason: error.to_string(),
                        attempts,
                    });
                    if fatal {
                        break Termination::Aborted(error.to_string());
                    }
                }
            }

            if !delay.is_zero() && !frontier.is_empty() {
                tokio::time::sleep(delay).await;
            }
        };

        Ok(CrawlOutcome {
            pages,
            failures,
            termination,
        })
    }

    /// Render one URL, retrying transient failures with linear backoff.
    async fn render_with_retry(
        &self,
        url: &PageUrl,
    ) -> std::result::Result<RenderedPage, (RenderError, u32)> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.renderer.render(url).await {
                Ok(rendered) => return Ok(rendered),
                Err(error) if error.is_transient() && attempt <= self.config.max_retries => {
                    let backoff =
                        Duration::from_millis(self.config.retry_backoff_ms * u64::from(attempt));
                    log::warn!(
                        "render of {} failed (attempt {}): {}; retrying in {:?}",
                        url,
                        attempt,
                        error,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(error) => return Err((error, attempt)),
            }
        }
    }

    /// Decide whether a discovered href joins the frontier.
    fn admit_link(&self, seed: &PageUrl, page: &PageUrl, href: &str) -> Option<PageUrl> {
        let link = page.join(href).ok()?;
        if self.config.same_site_only && !link.same_site(seed) {
            return None;
        }
        if has_skipped_extension(link.path()) {
            return None;
        }
        if self
            .config
            .exclude_patterns
            .iter()
            .any(|pattern| link.as_str().contains(pattern))
        {
            return None;
        }
        Some(link)
    }
}

/// Whether the path points at a known non-HTML asset.
fn has_skipped_extension(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    SKIPPED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
