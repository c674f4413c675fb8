//! Binary entry point: load configuration, run the crawl, publish the result.
//!
//! A transport layer (cron job, webhook handler, manual invocation) triggers
//! this binary; the success payload `{message, categories}` is emitted as
//! JSON on stdout for that layer to re-expose.

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use startup_insights::cli::Cli;
use startup_insights::config::{ConcurrencyMode, CrawlConfig, SinkMode};
use startup_insights::fetcher::PageFetcher;
use startup_insights::pipeline::{crawl_and_publish, run_report};
use startup_insights::sink::json_file_sink;
use startup_insights::utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("startup_insights starting up");

    let args = Cli::parse();

    // The only fatal error: a malformed or empty category configuration,
    // rejected before any network activity.
    let mut config = match CrawlConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %args.config, error = %e, "Invalid crawl configuration");
            return Err(e.into());
        }
    };
    if args.sequential {
        config.concurrency = ConcurrencyMode::Sequential;
    }
    if args.append {
        config.sink_mode = SinkMode::Append;
    }

    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let fetcher = PageFetcher::new(Duration::from_secs(config.timeout_secs))?;
    let sink = json_file_sink(&args.output_dir);

    let (result, sink_outcome) = crawl_and_publish(&fetcher, &config, &sink).await;

    info!(
        categories = config.categories.len(),
        total_records = result.total_records(),
        "Ran with {} categories, {} total records",
        config.categories.len(),
        result.total_records()
    );
    let persisted = match sink_outcome {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Records were crawled but not persisted; reporting partial success");
            false
        }
    };

    let payload = run_report(&result, persisted);
    println!("{}", serde_json::to_string(&payload)?);

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
