//! The crawl-extract-aggregate pipeline.
//!
//! One invocation walks every configured category: fetch the listing page,
//! extract capped article stubs, fetch each article page for a summary, and
//! fold the results into a [`CrawlResult`] keyed by category.
//!
//! Failure containment is the point of this module. A failed listing fetch
//! empties that category only; a failed article fetch gives that one record
//! the sentinel summary; sibling work is never aborted. The only fatal
//! condition in the whole pipeline is an empty configuration, rejected
//! before this module runs.
//!
//! # Ordering under concurrency
//!
//! In the concurrent mode, per-stub summary fetches complete in whatever
//! order the network allows. Each task carries its stub index and writes
//! into a pre-allocated slot, so the assembled records always follow
//! listing-page order regardless of completion order.

use crate::config::{ConcurrencyMode, CrawlConfig};
use crate::extract::listing::extract_listing;
use crate::extract::summary::{SummaryStrategy, extract_summary};
use crate::fetcher::PageFetcher;
use crate::models::{ArticleRecord, ArticleStub, CrawlResult, NO_SUMMARY};
use crate::sink::PublishSink;
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

/// Fetch one article page and extract its summary.
///
/// Any fetch failure degrades to the sentinel summary; extraction itself
/// never fails.
async fn fetch_summary(fetcher: &PageFetcher, url: &str, strategy: &SummaryStrategy) -> String {
    match fetcher.fetch(url).await {
        Ok(page) => {
            let summary = extract_summary(&page, strategy);
            debug!(%url, summary = %truncate_for_log(&summary, 120), "Extracted summary");
            summary
        }
        Err(e) => {
            warn!(%url, error = %e, "Article fetch failed; using sentinel summary");
            NO_SUMMARY.to_string()
        }
    }
}

/// Fetch summaries for every stub, preserving stub order in the output.
async fn fetch_summaries(
    fetcher: &PageFetcher,
    stubs: &[ArticleStub],
    config: &CrawlConfig,
) -> Vec<String> {
    match config.concurrency {
        ConcurrencyMode::Sequential => {
            let mut summaries = Vec::with_capacity(stubs.len());
            for stub in stubs {
                summaries.push(fetch_summary(fetcher, &stub.url, &config.summary).await);
            }
            summaries
        }
        ConcurrencyMode::Concurrent => {
            // Index-addressed slots: completion order must not leak into
            // the output order.
            let mut slots: Vec<Option<String>> = vec![None; stubs.len()];
            let indexed: Vec<(usize, String)> = stream::iter(stubs.iter().enumerate())
                .map(|(i, stub)| async move {
                    (i, fetch_summary(fetcher, &stub.url, &config.summary).await)
                })
                .buffer_unordered(config.per_host_limit.max(1))
                .collect()
                .await;
            for (i, summary) in indexed {
                slots[i] = Some(summary);
            }
            slots
                .into_iter()
                .map(|slot| slot.unwrap_or_else(|| NO_SUMMARY.to_string()))
                .collect()
        }
    }
}

/// Crawl one category: listing page, stubs, summaries, records.
///
/// A listing fetch failure is non-fatal to the overall run and yields an
/// empty record list for this category.
#[instrument(level = "info", skip(fetcher, config), fields(category = %key))]
pub async fn crawl_category(
    fetcher: &PageFetcher,
    key: &str,
    url: &str,
    config: &CrawlConfig,
) -> Vec<ArticleRecord> {
    let listing = match fetcher.fetch(url).await {
        Ok(page) => page,
        Err(e) => {
            warn!(%url, error = %e, "Listing fetch failed; category yields no records");
            return Vec::new();
        }
    };

    let stubs = extract_listing(&listing, config.per_page_cap, config.per_date_cap);
    info!(count = stubs.len(), "Extracted article stubs");

    let summaries = fetch_summaries(fetcher, &stubs, config).await;

    stubs
        .into_iter()
        .zip(summaries)
        .map(|(stub, summary)| ArticleRecord::from_stub(key, stub, summary))
        .collect()
}

/// Crawl every configured category and merge the results.
///
/// In the concurrent mode categories run simultaneously; in the sequential
/// mode they run one at a time in configuration order. Either way a failed
/// category contributes an empty list and never blocks the others.
#[instrument(level = "info", skip_all)]
pub async fn crawl_all(fetcher: &PageFetcher, config: &CrawlConfig) -> CrawlResult {
    let mut result = CrawlResult::default();

    match config.concurrency {
        ConcurrencyMode::Sequential => {
            for category in &config.categories {
                let records = crawl_category(fetcher, &category.key, &category.url, config).await;
                result.categories.insert(category.key.clone(), records);
            }
        }
        ConcurrencyMode::Concurrent => {
            let per_category: Vec<(String, Vec<ArticleRecord>)> =
                stream::iter(config.categories.iter())
                    .map(|category| async move {
                        let records =
                            crawl_category(fetcher, &category.key, &category.url, config).await;
                        (category.key.clone(), records)
                    })
                    .buffer_unordered(config.categories.len().max(1))
                    .collect()
                    .await;
            result.categories.extend(per_category);
        }
    }

    info!(
        categories = result.categories.len(),
        total_records = result.total_records(),
        "Crawl complete"
    );
    result
}

/// Build the success payload the transport layer re-exposes.
///
/// A sink failure downgrades the message and flips `persisted`, but the
/// crawled records are still included: the result outlives the sink.
pub fn run_report(result: &CrawlResult, persisted: bool) -> serde_json::Value {
    let message = if persisted {
        "Articles fetched and saved successfully!"
    } else {
        "Articles fetched but not saved; sink write failed"
    };
    serde_json::json!({
        "message": message,
        "persisted": persisted,
        "crawled_at": chrono::Local::now().to_rfc3339(),
        "categories": result.categories,
    })
}

/// Run the full crawl and hand the result to the publish sink exactly once.
///
/// A sink failure is returned alongside the result rather than erasing it;
/// the caller decides whether partial success is acceptable.
pub async fn crawl_and_publish(
    fetcher: &PageFetcher,
    config: &CrawlConfig,
    sink: &dyn PublishSink,
) -> (CrawlResult, Result<(), crate::error::SinkError>) {
    let result = crawl_all(fetcher, config).await;
    let outcome = crate::sink::publish(sink, &result, config.sink_mode).await;
    if let Err(ref e) = outcome {
        warn!(error = %e, "Publish sink failed; crawl result is still available");
    }
    (result, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Category, SinkMode};
    use crate::sink::MemorySink;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn listing_card(title: &str, date: &str, href: &str) -> String {
        format!(
            r#"<div class="td_module_wrap">
                 <h3 class="entry-title"><a href="{href}">{title}</a></h3>
                 <time class="entry-date">{date}</time>
               </div>"#
        )
    }

    fn article_body(text: &str) -> String {
        format!(r#"<div class="tdb-block-inner td-fix-index"><p>{text}</p></div>"#)
    }

    fn test_config(categories: Vec<Category>) -> CrawlConfig {
        CrawlConfig {
            categories,
            per_page_cap: 20,
            per_date_cap: 3,
            timeout_secs: 5,
            summary: SummaryStrategy::FirstParagraphsOfBlock { n: 2 },
            concurrency: ConcurrencyMode::Concurrent,
            per_host_limit: 8,
            sink_mode: SinkMode::Replace,
        }
    }

    fn fetcher() -> PageFetcher {
        PageFetcher::new(Duration::from_secs(5)).unwrap()
    }

    async fn mount_listing(server: &MockServer, listing_path: &str, cards: &[String]) {
        Mock::given(method("GET"))
            .and(path(listing_path.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("<html><body>{}</body></html>", cards.join("\n"))),
            )
            .mount(server)
            .await;
    }

    async fn mount_article(server: &MockServer, article_path: &str, text: &str, delay_ms: u64) {
        Mock::given(method("GET"))
            .and(path(article_path.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("<html><body>{}</body></html>", article_body(text)))
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_end_to_end_single_category() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            "/ev",
            &[
                listing_card("A", "Jan 1", "/articles/a"),
                listing_card("B", "Jan 1", "/articles/b"),
            ],
        )
        .await;
        mount_article(&server, "/articles/a", "Summary text", 0).await;
        mount_article(&server, "/articles/b", "Summary text", 0).await;

        let config = test_config(vec![Category {
            key: "ev".to_string(),
            url: format!("{}/ev", server.uri()),
        }]);
        let result = crawl_all(&fetcher(), &config).await;

        let records = &result.categories["ev"];
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, "ev");
        assert_eq!(records[0].title, "A");
        assert_eq!(records[0].published_label, "Jan 1");
        assert_eq!(records[0].summary, "Summary text");
        assert_eq!(records[1].title, "B");
        assert_eq!(records[1].summary, "Summary text");
    }

    #[tokio::test]
    async fn test_order_preserved_under_reversed_latency() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            "/tech",
            &[
                listing_card("Slow", "Jan 1", "/articles/slow"),
                listing_card("Medium", "Jan 2", "/articles/medium"),
                listing_card("Fast", "Jan 3", "/articles/fast"),
            ],
        )
        .await;
        // First-listed article completes last.
        mount_article(&server, "/articles/slow", "slow summary", 400).await;
        mount_article(&server, "/articles/medium", "medium summary", 200).await;
        mount_article(&server, "/articles/fast", "fast summary", 0).await;

        let config = test_config(vec![Category {
            key: "tech".to_string(),
            url: format!("{}/tech", server.uri()),
        }]);
        let records = crawl_category(
            &fetcher(),
            "tech",
            &format!("{}/tech", server.uri()),
            &config,
        )
        .await;

        let pairs: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.title.as_str(), r.summary.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Slow", "slow summary"),
                ("Medium", "medium summary"),
                ("Fast", "fast summary"),
            ]
        );
    }

    #[tokio::test]
    async fn test_blocked_category_does_not_affect_others() {
        let server = MockServer::start().await;
        let good_keys = ["agritech", "fintech", "ev", "tech"];
        for key in good_keys {
            mount_listing(
                &server,
                &format!("/{key}"),
                &[listing_card("A", "Jan 1", &format!("/articles/{key}"))],
            )
            .await;
            mount_article(&server, &format!("/articles/{key}"), "Summary text", 0).await;
        }
        Mock::given(method("GET"))
            .and(path("/blocked"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let mut categories: Vec<Category> = good_keys
            .iter()
            .map(|key| Category {
                key: key.to_string(),
                url: format!("{}/{key}", server.uri()),
            })
            .collect();
        categories.insert(
            2,
            Category {
                key: "blocked".to_string(),
                url: format!("{}/blocked", server.uri()),
            },
        );

        let result = crawl_all(&fetcher(), &test_config(categories)).await;

        for key in good_keys {
            assert_eq!(result.categories[key].len(), 1, "category {key}");
        }
        assert!(result.categories["blocked"].is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_yields_empty_category() {
        // Nothing is listening on this address.
        let config = test_config(vec![Category {
            key: "dead".to_string(),
            url: "http://127.0.0.1:1/dead".to_string(),
        }]);
        let result = crawl_all(&fetcher(), &config).await;
        assert!(result.categories["dead"].is_empty());
    }

    #[tokio::test]
    async fn test_failed_article_fetch_gets_sentinel_only() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            "/mix",
            &[
                listing_card("Works", "Jan 1", "/articles/works"),
                listing_card("Broken", "Jan 2", "/articles/broken"),
            ],
        )
        .await;
        mount_article(&server, "/articles/works", "real summary", 0).await;
        Mock::given(method("GET"))
            .and(path("/articles/broken"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let config = test_config(vec![Category {
            key: "mix".to_string(),
            url: format!("{}/mix", server.uri()),
        }]);
        let records =
            crawl_category(&fetcher(), "mix", &format!("{}/mix", server.uri()), &config).await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].summary, "real summary");
        assert_eq!(records[1].title, "Broken");
        assert_eq!(records[1].summary, NO_SUMMARY);
    }

    #[tokio::test]
    async fn test_sequential_mode_matches_concurrent_output() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            "/seq",
            &[
                listing_card("A", "Jan 1", "/articles/a"),
                listing_card("B", "Jan 2", "/articles/b"),
            ],
        )
        .await;
        mount_article(&server, "/articles/a", "summary a", 0).await;
        mount_article(&server, "/articles/b", "summary b", 0).await;

        let url = format!("{}/seq", server.uri());
        let mut config = test_config(vec![Category {
            key: "seq".to_string(),
            url: url.clone(),
        }]);

        let concurrent = crawl_all(&fetcher(), &config).await;
        config.concurrency = ConcurrencyMode::Sequential;
        let sequential = crawl_all(&fetcher(), &config).await;

        assert_eq!(concurrent, sequential);
    }

    #[test]
    fn test_run_report_reflects_sink_outcome() {
        let mut result = CrawlResult::default();
        result.categories.insert("ev".to_string(), Vec::new());

        let ok = run_report(&result, true);
        assert_eq!(ok["persisted"], true);
        assert_eq!(ok["message"], "Articles fetched and saved successfully!");
        assert!(ok["categories"].get("ev").is_some());

        let failed = run_report(&result, false);
        assert_eq!(failed["persisted"], false);
        assert_eq!(
            failed["message"],
            "Articles fetched but not saved; sink write failed"
        );
        // The crawled records survive a sink failure.
        assert!(failed["categories"].get("ev").is_some());
    }

    #[tokio::test]
    async fn test_crawl_and_publish_hands_result_to_sink_once() {
        let server = MockServer::start().await;
        mount_listing(&server, "/ev", &[listing_card("A", "Jan 1", "/articles/a")]).await;
        mount_article(&server, "/articles/a", "Summary text", 0).await;

        let config = test_config(vec![Category {
            key: "ev".to_string(),
            url: format!("{}/ev", server.uri()),
        }]);
        let sink = MemorySink::default();
        let (result, outcome) = crawl_and_publish(&fetcher(), &config, &sink).await;

        assert!(outcome.is_ok());
        assert_eq!(sink.stored().len(), result.total_records());
        assert_eq!(sink.stored()[0].title, "A");
    }
}
