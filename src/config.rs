//! Crawl configuration loaded from a YAML file.
//!
//! The configuration carries the category-to-URL table plus the knobs of
//! the pipeline: extraction caps, fetch timeout, summary strategy,
//! concurrency mode, and sink mode. Every field except `categories` has a
//! default, so a minimal config file is just the category list:
//!
//! ```yaml
//! categories:
//!   - key: fintech
//!     url: https://startupnews.fyi/category/fintech/
//!   - key: ev
//!     url: https://startupnews.fyi/category/ev/
//! ```
//!
//! Category order is meaningful: the sequential concurrency mode processes
//! categories in the order they appear here.

use crate::error::ConfigError;
use crate::extract::summary::SummaryStrategy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// One named crawl target: a category key and its listing-page URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Category {
    /// Opaque identifier, unique across the configured set (e.g. "fintech").
    pub key: String,
    /// Address of the category's listing page.
    pub url: String,
}

/// Whether per-stub and per-category work runs concurrently or one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyMode {
    /// Bounded fan-out: categories and per-stub summary fetches run
    /// concurrently; output order is preserved via index-addressed slots.
    #[default]
    Concurrent,
    /// Strictly one page at a time, in configuration/document order.
    /// Slower, but gentler on sites that penalize concurrency.
    Sequential,
}

/// How the publish sink treats previously stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkMode {
    /// Full refresh: delete all prior records, then insert the new set.
    #[default]
    Replace,
    /// Incremental: append the new set without deleting anything.
    Append,
}

/// Complete configuration for one crawl invocation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlConfig {
    /// The category table, in processing order for sequential mode.
    pub categories: Vec<Category>,
    /// Maximum accepted stubs per listing page.
    #[serde(default = "default_per_page_cap")]
    pub per_page_cap: usize,
    /// Maximum accepted stubs sharing one publish-date label.
    #[serde(default = "default_per_date_cap")]
    pub per_date_cap: usize,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Summary extraction strategy.
    #[serde(default)]
    pub summary: SummaryStrategy,
    /// Concurrency mode for categories and per-stub fetches.
    #[serde(default)]
    pub concurrency: ConcurrencyMode,
    /// Cap on simultaneous summary fetches within one category. The target
    /// is a single host, so this also bounds per-host connections.
    #[serde(default = "default_per_host_limit")]
    pub per_host_limit: usize,
    /// Sink behavior on publish.
    #[serde(default)]
    pub sink_mode: SinkMode,
}

fn default_per_page_cap() -> usize {
    20
}

fn default_per_date_cap() -> usize {
    3
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_per_host_limit() -> usize {
    8
}

impl CrawlConfig {
    /// Load and validate a configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: CrawlConfig = serde_yaml::from_str(&raw)?;
        config.validate()?;
        info!(
            categories = config.categories.len(),
            per_page_cap = config.per_page_cap,
            per_date_cap = config.per_date_cap,
            "Loaded crawl configuration"
        );
        Ok(config)
    }

    /// Reject empty or malformed category tables before any network activity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }
        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.key.trim().is_empty() || category.url.trim().is_empty() {
                return Err(ConfigError::EmptyEntry);
            }
            if !seen.insert(category.key.as_str()) {
                return Err(ConfigError::DuplicateKey(category.key.clone()));
            }
        }
        Ok(())
    }
}
