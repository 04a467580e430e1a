//! Download stage: fetch every requested combination that is not on disk yet
//!
//! Key behavior:
//! - An existing local file is the only "already done" signal
//! - Bodies are streamed to `<name>.nc.part` and renamed once complete
//! - Failures are logged and counted, never retried, and never stop the batch
//! - Optional in-place crop right after a successful download

use crate::bbox::BoundingBox;
use crate::catalog::{Catalog, Combination};
use crate::crop::crop_in_place;
use crate::errors::{Result, ScraperError};
use crate::parallel::WorkerConfig;
use crate::progress::file_bar;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, instrument, warn};

/// Source of remote files.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Writes the body at `url` to `dest` and returns the number of bytes written.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// [`Fetch`] over HTTP(S) with a per-request timeout
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        file.sync_all().await?;
        Ok(written)
    }
}

/// One validated download request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub combination: Combination,
    pub url: String,
    pub path: PathBuf,
}

/// Validates every combination and resolves its URL and local path.
///
/// Runs before any I/O so a bad parameter aborts the whole batch up front.
pub fn plan(catalog: &Catalog, dest: &Path, combos: &[Combination]) -> Result<Vec<WorkItem>> {
    combos
        .iter()
        .map(|combo| {
            Ok(WorkItem {
                url: catalog.build_url(combo)?,
                path: catalog.local_path(dest, combo)?,
                combination: combo.clone(),
            })
        })
        .collect()
}

/// Result of processing a single work item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Skipped,
    Downloaded { bytes: u64, crop: CropOutcome },
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropOutcome {
    NotRequested,
    Cropped,
    Failed,
}

/// Counts over one download stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cropped: usize,
    pub crop_failed: usize,
    pub bytes: u64,
}

impl DownloadReport {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::Downloaded { bytes, crop } => {
                self.downloaded += 1;
                self.bytes += bytes;
                match crop {
                    CropOutcome::Cropped => self.cropped += 1,
                    CropOutcome::Failed => self.crop_failed += 1,
                    CropOutcome::NotRequested => {}
                }
            }
        }
    }
}

/// Runs work items through a bounded pool of concurrent downloads
pub struct Downloader {
    fetcher: Arc<dyn Fetch>,
    workers: WorkerConfig,
    bbox: Option<BoundingBox>,
}

impl Downloader {
    pub fn new(fetcher: Arc<dyn Fetch>, workers: WorkerConfig, bbox: Option<BoundingBox>) -> Self {
        Self {
            fetcher,
            workers,
            bbox,
        }
    }

    /// Processes all items; per-item failures are folded into the report.
    pub async fn run(&self, items: &[WorkItem]) -> DownloadReport {
        let progress = file_bar(items.len() as u64);

        let outcomes: Vec<Outcome> = stream::iter(items)
            .map(|item| {
                let progress = progress.clone();
                async move {
                    let outcome = self.process(item).await;
                    progress.inc(1);
                    outcome
                }
            })
            .buffer_unordered(self.workers.workers.max(1))
            .collect()
            .await;

        progress.finish_and_clear();

        let mut report = DownloadReport::default();
        for outcome in outcomes {
            report.record(outcome);
        }
        report
    }

    #[instrument(skip_all, fields(file = %item.path.display()))]
    async fn process(&self, item: &WorkItem) -> Outcome {
        if item.path.exists() {
            info!("File already downloaded, skipping");
            return Outcome::Skipped;
        }

        let bytes = match self.fetch_to(item).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(url = %item.url, error = %e, "Error downloading file");
                return Outcome::Failed;
            }
        };
        info!(bytes, "Downloaded file");

        let crop = match self.bbox {
            None => CropOutcome::NotRequested,
            Some(bbox) => {
                let path = item.path.clone();
                let result = tokio::task::spawn_blocking(move || crop_in_place(&path, &bbox))
                    .await
                    .map_err(ScraperError::from)
                    .and_then(|r| r);
                match result {
                    Ok(()) => CropOutcome::Cropped,
                    Err(e) => {
                        warn!(error = %e, "Error cropping file, keeping uncropped download");
                        CropOutcome::Failed
                    }
                }
            }
        };

        Outcome::Downloaded { bytes, crop }
    }

    async fn fetch_to(&self, item: &WorkItem) -> Result<u64> {
        let part = part_path(&item.path);
        let result = async {
            let bytes = self.fetcher.fetch(&item.url, &part).await?;
            tokio::fs::rename(&part, &item.path).await?;
            Ok::<u64, ScraperError>(bytes)
        }
        .await;

        if result.is_err() {
            tokio::fs::remove_file(&part).await.ok();
        }
        result
    }
}

/// `<name>.nc` becomes `<name>.nc.part` while the transfer is in flight.
pub fn part_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
