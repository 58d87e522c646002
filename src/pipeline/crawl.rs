// src/pipeline/crawl.rs

//! Crawl stage: drive the engine and report what it produced.

use std::sync::Arc;

use chrono::Utc;

use crate::crawl::{CancelFlag, CrawlEngine, CrawlOutcome, Termination};
use crate::error::Result;
use crate::models::Config;
use crate::render::Renderer;

/// Run one crawl from `seed` and log the run summary.
pub async fn run_crawl(
    config: &Config,
    renderer: Arc<dyn Renderer>,
    cancel: CancelFlag,
    seed: &str,
) -> Result<CrawlOutcome> {
    let start_time = Utc::now();
    log::info!("starting crawl of {seed}");

    let engine = CrawlEngine::new(config.crawler.clone(), renderer).with_cancel(cancel);
    let outcome = engine.run(seed).await?;

    let elapsed = Utc::now() - start_time;
    log::info!(
        "crawl finished in {}s: {} page(s) captured, {} failed",
        elapsed.num_seconds(),
        outcome.pages.len(),
        outcome.failures.len()
    );
    for failure in &outcome.failures {
        log::warn!(
            "failed page {}: {} ({} attempt(s))",
            failure.url,
            failure.reason,
            failure.attempts
        );
    }
    match &outcome.termination {
        Termination::Exhausted => log::info!("crawl terminated by exhaustion"),
        Termination::PageLimit => log::info!("crawl stopped at the page ceiling"),
        Termination::TimeLimit => log::info!("crawl stopped at the time ceiling"),
        Termination::Cancelled => log::warn!("crawl cancelled by operator"),
        Termination::Aborted(reason) => log::error!("crawl aborted: {reason}"),
    }

    Ok(outcome)
}
