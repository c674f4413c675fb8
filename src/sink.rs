//! Publish sinks for finished crawl results.
//!
//! The pipeline hands each [`CrawlResult`] to a [`PublishSink`] exactly
//! once. Two persistence modes exist, mirroring the two deployment
//! variants of this crawler:
//!
//! - **Replace** (full refresh): delete everything previously stored, then
//!   insert the new set
//! - **Append** (incremental): insert without deleting
//!
//! Sink failures are never fatal: the caller keeps the in-memory result
//! and reports a partial-success outcome.

use crate::config::SinkMode;
use crate::error::SinkError;
use crate::models::{ArticleRecord, CrawlResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;
use tracing::{info, instrument};

/// Destination for finished article records.
#[async_trait]
pub trait PublishSink: Send + Sync {
    /// Delete all previously stored records, then insert the new set.
    async fn replace_all(&self, records: &[ArticleRecord]) -> Result<(), SinkError>;

    /// Append records without deleting anything.
    async fn insert(&self, records: &[ArticleRecord]) -> Result<(), SinkError>;
}

/// Hand a crawl result to a sink under the configured mode.
pub async fn publish(
    sink: &dyn PublishSink,
    result: &CrawlResult,
    mode: SinkMode,
) -> Result<(), SinkError> {
    let records = result.all_records();
    match mode {
        SinkMode::Replace => sink.replace_all(&records).await,
        SinkMode::Append => sink.insert(&records).await,
    }
}

/// Sink that stores records as one JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// A sink writing to the given file path. Parent directories are
    /// created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn write_records(&self, records: &[ArticleRecord]) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json).await?;
        info!(path = %self.path.display(), count = records.len(), "Wrote records");
        Ok(())
    }

    async fn read_records(&self) -> Result<Vec<ArticleRecord>, SinkError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[async_trait]
impl PublishSink for JsonFileSink {
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    async fn replace_all(&self, records: &[ArticleRecord]) -> Result<(), SinkError> {
        self.write_records(records).await
    }

    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    async fn insert(&self, records: &[ArticleRecord]) -> Result<(), SinkError> {
        let mut stored = self.read_records().await?;
        stored.extend_from_slice(records);
        self.write_records(&stored).await
    }
}

/// In-process sink holding records in memory. Useful in tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<ArticleRecord>>,
}

impl MemorySink {
    /// Snapshot of everything stored so far.
    pub fn stored(&self) -> Vec<ArticleRecord> {
        self.records.lock().expect("sink lock poisoned").clone()
    }
}

#[async_trait]
impl PublishSink for MemorySink {
    async fn replace_all(&self, records: &[ArticleRecord]) -> Result<(), SinkError> {
        let mut stored = self.records.lock().expect("sink lock poisoned");
        stored.clear();
        stored.extend_from_slice(records);
        Ok(())
    }

    async fn insert(&self, records: &[ArticleRecord]) -> Result<(), SinkError> {
        let mut stored = self.records.lock().expect("sink lock poisoned");
        stored.extend_from_slice(records);
        Ok(())
    }
}

/// Build the default on-disk sink under an output directory.
pub fn json_file_sink(output_dir: impl AsRef<Path>) -> JsonFileSink {
    JsonFileSink::new(output_dir.as_ref().join("latest_insights.json"))
}
