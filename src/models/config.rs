//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::PageUrl;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Search index export settings
    #[serde(default)]
    pub index: IndexConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_pages == 0 {
            return Err(AppError::validation("crawler.max_pages must be > 0"));
        }
        if !self.crawler.seed.trim().is_empty() {
            if let Err(e) = PageUrl::parse(&self.crawler.seed) {
                return Err(AppError::validation(format!(
                    "crawler.seed is not a valid URL: {e}"
                )));
            }
        }
        if let Err(e) = PageUrl::parse(&self.index.endpoint) {
            return Err(AppError::validation(format!(
                "index.endpoint is not a valid URL: {e}"
            )));
        }
        if self.index.index.trim().is_empty() {
            return Err(AppError::validation("index.index is empty"));
        }
        if self.index.index.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(AppError::validation("index.index must be lowercase"));
        }
        if self.index.batch_size == 0 {
            return Err(AppError::validation("index.batch_size must be > 0"));
        }
        if self.index.timeout_secs == 0 {
            return Err(AppError::validation("index.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

/// Crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Default seed URL; a seed given on the command line takes precedence
    #[serde(default)]
    pub seed: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between page renders in milliseconds (0 disables)
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Retries after the first failed attempt for transient failures
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Base retry delay in milliseconds; grows linearly per attempt
    #[serde(default = "defaults::retry_backoff")]
    pub retry_backoff_ms: u64,

    /// Maximum pages to capture in one run
    #[serde(default = "defaults::max_pages")]
    pub max_pages: usize,

    /// Maximum link depth from the seed
    #[serde(default = "defaults::max_depth")]
    pub max_depth: u32,

    /// Wall-clock budget for one run in seconds (0 disables)
    #[serde(default)]
    pub max_duration_secs: u64,

    /// Only follow links on the seed's host
    #[serde(default = "defaults::same_site_only")]
    pub same_site_only: bool,

    /// URL substrings to exclude from the crawl
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed: String::new(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_retries: defaults::max_retries(),
            retry_backoff_ms: defaults::retry_backoff(),
            max_pages: defaults::max_pages(),
            max_depth: defaults::max_depth(),
            max_duration_secs: 0,
            same_site_only: defaults::same_site_only(),
            exclude_patterns: Vec::new(),
        }
    }
}

/// Search index export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Base URL of the index endpoint
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// Name of the target index
    #[serde(default = "defaults::index_name")]
    pub index: String,

    /// Maximum captures per bulk request
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            index: defaults::index_name(),
            batch_size: defaults::batch_size(),
            timeout_secs: defaults::timeout(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; sitedex/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        100
    }
    pub fn max_retries() -> u32 {
        2
    }
    pub fn retry_backoff() -> u64 {
        500
    }
    pub fn max_pages() -> usize {
        500
    }
    pub fn max_depth() -> u32 {
        10
    }
    pub fn same_site_only() -> bool {
        true
    }

    // Index defaults
    pub fn endpoint() -> String {
        "http://127.0.0.1:9200".into()
    }
    pub fn index_name() -> String {
        "pages".into()
    }
    pub fn batch_size() -> usize {
        50
    }
}
