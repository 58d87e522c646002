//! sitedex CLI
//!
//! Local execution entry point: crawl a site, publish the captures, or both.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sitedex::{
    crawl::{CancelFlag, Termination},
    error::{AppError, Result},
    export::BulkExportClient,
    models::Config,
    pipeline,
    render::HttpRenderer,
    storage::{CaptureSnapshot, LocalStore},
};

/// sitedex - Site Crawler and Index Publisher
#[derive(Parser, Debug)]
#[command(
    name = "sitedex",
    version,
    about = "Crawls a web site and publishes captured pages to a search index"
)]
struct Cli {
    /// Path to storage directory for config and snapshots
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Path to config file (default: {storage_dir}/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site and snapshot the captured pages
    Crawl {
        /// Seed URL (overrides crawler.seed from the config)
        seed: Option<String>,
    },

    /// Publish the last crawl snapshot to the index
    Publish,

    /// Run full pipeline: Crawl → Publish
    Run {
        /// Seed URL (overrides crawler.seed from the config)
        seed: Option<String>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Resolve the seed: command line first, config fallback.
fn resolve_seed(arg: Option<String>, config: &Config) -> Result<String> {
    match arg {
        Some(seed) => Ok(seed),
        None if !config.crawler.seed.trim().is_empty() => Ok(config.crawler.seed.clone()),
        None => Err(AppError::config(
            "No seed URL: pass one as an argument or set crawler.seed in the config",
        )),
    }
}

/// Wire Ctrl-C to a cancellation flag the crawl engine polls.
fn spawn_cancel_handler() -> CancelFlag {
    let cancel = CancelFlag::new();
    let flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Ctrl-C received, finishing the in-flight render...");
            flag.cancel();
        }
    });
    cancel
}

/// Crawl from `seed` and write the snapshot.
async fn crawl_to_snapshot(config: &Config, store: &LocalStore, seed: String) -> Result<()> {
    let renderer = Arc::new(HttpRenderer::new(&config.crawler)?);
    let cancel = spawn_cancel_handler();

    let outcome = pipeline::run_crawl(config, renderer, cancel, &seed).await?;
    let termination = outcome.termination.clone();
    let snapshot = CaptureSnapshot::new(seed.clone(), outcome.pages);
    store.save_snapshot(&snapshot).await?;

    if let Termination::Aborted(reason) = termination {
        log::warn!("the snapshot holds the pages captured before the abort");
        return Err(AppError::crawl(seed, reason));
    }
    Ok(())
}

/// Publish the stored snapshot to the index.
async fn publish_snapshot(config: &Config, store: &LocalStore) -> Result<()> {
    let Some(snapshot) = store.load_snapshot().await? else {
        log::error!(
            "No snapshot found at {}. Run 'crawl' first.",
            store.snapshot_path().display()
        );
        return Err(AppError::config("Snapshot not found"));
    };

    if snapshot.pages.is_empty() {
        log::warn!("snapshot is empty, nothing to publish");
        return Ok(());
    }

    let client = BulkExportClient::new(&config.index)?;
    let summary = pipeline::run_publish(config, &client, snapshot.pages).await?;
    if !summary.failed_ids.is_empty() {
        log::warn!(
            "{} page(s) were rejected; re-crawl or re-publish them individually",
            summary.failed_ids.len()
        );
    }
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("sitedex starting...");

    let config_path = cli
        .config
        .unwrap_or_else(|| cli.storage_dir.join("config.toml"));
    let config = Config::load_or_default(&config_path);
    let store = LocalStore::new(&cli.storage_dir);

    match cli.command {
        Command::Crawl { seed } => {
            let seed = resolve_seed(seed, &config)?;
            crawl_to_snapshot(&config, &store, seed).await?;
        }

        Command::Publish => {
            publish_snapshot(&config, &store).await?;
        }

        Command::Run { seed } => {
            let seed = resolve_seed(seed, &config)?;
            log::info!("Step 1/2: Crawling...");
            crawl_to_snapshot(&config, &store, seed).await?;

            log::info!("Step 2/2: Publishing...");
            publish_snapshot(&config, &store).await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (crawler and index sections)");
        }
    }

    log::info!("Done!");

    Ok(())
}
