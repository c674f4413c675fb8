//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.

use clap::Parser;

/// Command-line arguments for the startup_insights crawler.
///
/// The category table and pipeline knobs live in the YAML config file; the
/// CLI only carries per-invocation choices.
///
/// # Examples
///
/// ```sh
/// # Full-refresh crawl with the default concurrent pipeline
/// startup_insights -c config/categories.yaml -o ./data
///
/// # Gentle sequential crawl that appends instead of replacing
/// startup_insights -c config/categories.yaml -o ./data --sequential --append
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML crawl configuration
    #[arg(short, long)]
    pub config: String,

    /// Output directory for the JSON record sink
    #[arg(short, long, default_value = "./data")]
    pub output_dir: String,

    /// Process categories and articles strictly one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Append to previously stored records instead of replacing them
    #[arg(long)]
    pub append: bool,
}
