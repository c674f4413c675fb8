//! # Startup Insights
//!
//! A crawl-extract-aggregate pipeline for startupnews.fyi category pages.
//! Each run harvests article listings from a configured set of category
//! pages, extracts title, publish-date label, and URL for every article,
//! fetches a short summary from each article's own page, and publishes the
//! per-category result to a downstream sink.
//!
//! ## Architecture
//!
//! The pipeline runs in four stages per category:
//! 1. **Fetch**: download the category listing page ([`fetcher`])
//! 2. **Extract**: parse article cards into capped, deduplicated stubs
//!    ([`extract::listing`])
//! 3. **Summarize**: fetch each article page and derive a short summary
//!    ([`extract::summary`]), concurrently by default
//! 4. **Aggregate & publish**: merge categories into one [`models::CrawlResult`]
//!    and hand it to a [`sink::PublishSink`] ([`pipeline`])
//!
//! A failure anywhere degrades to an empty or sentinel value for the
//! affected page only; one slow or blocked page never aborts the run.

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod models;
pub mod pipeline;
pub mod sink;
pub mod utils;

pub use config::CrawlConfig;
pub use error::{ConfigError, FetchError, SinkError};
pub use fetcher::PageFetcher;
pub use models::{ArticleRecord, ArticleStub, CrawlResult};
