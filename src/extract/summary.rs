//! Article-page summary extraction.
//!
//! The site does not expose a machine-readable excerpt, so the summary is
//! derived from article body paragraphs. Two interchangeable strategies are
//! supported, selected by configuration; both degrade to the
//! [`NO_SUMMARY`] sentinel instead of failing when the page has nothing
//! usable.

use crate::fetcher::RawPage;
use crate::models::NO_SUMMARY;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

static BLOCK_PARAGRAPHS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".tdb-block-inner.td-fix-index p").unwrap());
static ALL_PARAGRAPHS: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// How a summary is derived from an article page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStrategy {
    /// Join the first `n` non-empty paragraphs inside the article body
    /// container, in document order. Fewer than `n` is fine; zero yields
    /// the sentinel.
    FirstParagraphsOfBlock { n: usize },
    /// Take the paragraph at zero-based `index` among all paragraphs in the
    /// document. Out of range yields the sentinel.
    NthParagraphOfDocument { index: usize },
}

impl Default for SummaryStrategy {
    fn default() -> Self {
        SummaryStrategy::FirstParagraphsOfBlock { n: 2 }
    }
}

/// Extract a short summary from an article page.
///
/// Extracted text is whitespace-trimmed. Never fails: a page without any
/// matching paragraph yields [`NO_SUMMARY`].
pub fn extract_summary(page: &RawPage, strategy: &SummaryStrategy) -> String {
    let document = Html::parse_document(&page.html);

    let summary = match strategy {
        SummaryStrategy::FirstParagraphsOfBlock { n } => document
            .select(&BLOCK_PARAGRAPHS)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .take(*n)
            .collect::<Vec<_>>()
            .join(" "),
        SummaryStrategy::NthParagraphOfDocument { index } => document
            .select(&ALL_PARAGRAPHS)
            .nth(*index)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default(),
    };

    if summary.is_empty() {
        NO_SUMMARY.to_string()
    } else {
        summary
    }
}
