//! Listing-page extraction.
//!
//! Category listing pages repeat one "article card" structure per story:
//! a `.td_module_wrap` block holding a titled link (`.entry-title a`) and a
//! date label (`.entry-date`). Extraction walks the cards in document order
//! and applies two caps while scanning:
//!
//! - a per-page cap on total accepted stubs (scanning stops once reached)
//! - a per-date cap limiting how many stubs may share one date label
//!
//! Cards missing a title, date label, or href are dropped silently and do
//! not count toward either cap.

use crate::fetcher::RawPage;
use crate::models::ArticleStub;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashMap;
use tracing::debug;
use url::Url;

static CARD: Lazy<Selector> = Lazy::new(|| Selector::parse(".td_module_wrap").unwrap());
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse(".entry-title a").unwrap());
static DATE_LABEL: Lazy<Selector> = Lazy::new(|| Selector::parse(".entry-date").unwrap());

/// Extract article stubs from a category listing page.
///
/// Returns stubs in the order they were accepted (document order). Never
/// fails: a page with zero matching cards yields an empty vector.
///
/// # Arguments
///
/// * `page` - The fetched listing page
/// * `per_page_cap` - Maximum stubs accepted from this page
/// * `per_date_cap` - Maximum stubs accepted per distinct date label
pub fn extract_listing(
    page: &RawPage,
    per_page_cap: usize,
    per_date_cap: usize,
) -> Vec<ArticleStub> {
    let base = Url::parse(&page.url).ok();
    let document = Html::parse_document(&page.html);

    let mut stubs: Vec<ArticleStub> = Vec::new();
    let mut per_date: HashMap<String, usize> = HashMap::new();
    let mut skipped_invalid = 0usize;
    let mut skipped_date_capped = 0usize;

    for card in document.select(&CARD) {
        if stubs.len() >= per_page_cap {
            break;
        }

        let title_link = card.select(&TITLE_LINK).next();
        let title = title_link
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        let href = title_link
            .and_then(|el| el.value().attr("href"))
            .unwrap_or_default();
        let published_label = card
            .select(&DATE_LABEL)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        if title.is_empty() || published_label.is_empty() || href.is_empty() {
            skipped_invalid += 1;
            continue;
        }

        let accepted_for_date = per_date.entry(published_label.clone()).or_insert(0);
        if *accepted_for_date >= per_date_cap {
            skipped_date_capped += 1;
            continue;
        }
        *accepted_for_date += 1;

        stubs.push(ArticleStub {
            title,
            published_label,
            url: resolve_href(base.as_ref(), href),
        });
    }

    debug!(
        url = %page.url,
        accepted = stubs.len(),
        skipped_invalid,
        skipped_date_capped,
        "Extracted listing page"
    );
    stubs
}

/// Resolve a card href against the listing page URL. Absolute hrefs pass
/// through unchanged; if the base itself is unparseable the raw href is kept.
fn resolve_href(base: Option<&Url>, href: &str) -> String {
    match base.and_then(|b| b.join(href).ok()) {
        Some(resolved) => resolved.to_string(),
        None => href.to_string(),
    }
}
