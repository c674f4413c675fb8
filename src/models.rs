//! Data models for the crawl pipeline.
//!
//! This module defines the core data structures flowing through the crawl:
//! - [`ArticleStub`]: minimal reference to an article found on a listing page
//! - [`ArticleRecord`]: the finished, persisted unit with its summary attached
//! - [`CrawlResult`]: the per-category aggregation handed to the publish sink
//!
//! Stubs are transient: they exist only between listing extraction and
//! summary extraction, after which they are folded into records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed placeholder used whenever no real summary can be extracted.
pub const NO_SUMMARY: &str = "No summary available";

/// A minimal reference to an article, as extracted from a category listing page.
///
/// All three fields are guaranteed non-empty by the listing extractor;
/// cards missing any of them are dropped before a stub is ever built.
///
/// # Fields
///
/// * `title` - The article headline text
/// * `published_label` - The site-formatted date label (e.g. "January 5, 2025"),
///   kept verbatim and never normalized to a calendar date
/// * `url` - Absolute URL of the article page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleStub {
    /// The article headline.
    pub title: String,
    /// The site-formatted publish-date label, verbatim.
    pub published_label: String,
    /// Absolute URL of the article page.
    pub url: String,
}

/// A finished article record, the unit persisted downstream.
///
/// Created by the category pipeline once both the stub and its summary are
/// available; never mutated afterwards. Ownership passes to the aggregator
/// and then to the publish sink.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// The category key this record was crawled under.
    pub category: String,
    /// The article headline.
    pub title: String,
    /// The site-formatted publish-date label, verbatim.
    pub published_label: String,
    /// Absolute URL of the article page.
    pub url: String,
    /// Short extracted summary, or [`NO_SUMMARY`] when extraction yielded nothing.
    pub summary: String,
}

impl ArticleRecord {
    /// Fold a stub and its summary into a record for the given category.
    pub fn from_stub(category: &str, stub: ArticleStub, summary: String) -> Self {
        Self {
            category: category.to_string(),
            title: stub.title,
            published_label: stub.published_label,
            url: stub.url,
            summary,
        }
    }
}

/// The aggregated outcome of one crawl invocation.
///
/// Maps each category key to its records in listing-page order. Built once
/// per invocation and discarded after handoff to the publish sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CrawlResult {
    /// Records grouped by category key, each list in extraction order.
    pub categories: BTreeMap<String, Vec<ArticleRecord>>,
}

impl CrawlResult {
    /// Total number of records across all categories.
    pub fn total_records(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Flatten all records into one list, in category key order.
    pub fn all_records(&self) -> Vec<ArticleRecord> {
        self.categories.values().flatten().cloned().collect()
    }
}
