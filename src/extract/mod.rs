//! HTML extraction for listing and article pages.
//!
//! Two extractors, one per page shape:
//!
//! 1. **Listing** ([`listing`]): turns a category listing page into a capped,
//!    deduplicated sequence of [`crate::models::ArticleStub`]s
//! 2. **Summary** ([`summary`]): derives a short text summary from a single
//!    article page, using a configurable strategy
//!
//! Both extractors are pure functions over already-fetched HTML and never
//! fail: a page with nothing extractable yields an empty sequence or the
//! sentinel summary.

pub mod listing;
pub mod summary;
