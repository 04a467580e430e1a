//! Stage orchestration: download, then optionally merge

use crate::bbox::BoundingBox;
use crate::catalog::Catalog;
use crate::download::{plan, DownloadReport, Downloader, Fetch};
use crate::errors::{Result, ScraperError};
use crate::merge::{merge_all, MergeReport, MergeTarget};
use crate::parallel::WorkerConfig;
use crate::period::Period;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Everything one batch run needs besides the catalog and the fetcher
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub dest: PathBuf,
    pub models: Vec<String>,
    pub experiments: Vec<String>,
    pub variables: Vec<String>,
    pub years: RangeInclusive<i32>,
    /// Periods to merge; `None` skips the merge stage
    pub periods: Option<Vec<Period>>,
    /// Crop box; `None` disables cropping
    pub bbox: Option<BoundingBox>,
    pub workers: WorkerConfig,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub download: DownloadReport,
    pub merge: Option<MergeReport>,
}

/// Runs the download stage and, if configured, the merge stage.
///
/// # Errors
///
/// Only validation failures and an uncreatable destination are returned;
/// per-file fetch, crop and merge errors are counted in the report.
pub async fn run(
    catalog: &Catalog,
    config: &RunConfig,
    fetcher: Arc<dyn Fetch>,
) -> Result<RunReport> {
    let combos = Catalog::combinations(
        &config.models,
        &config.experiments,
        &config.variables,
        config.years.clone(),
    );
    let items = plan(catalog, &config.dest, &combos)?;

    let targets = MergeTarget::all(&config.models, &config.experiments, &config.variables);
    if let Some(periods) = &config.periods {
        for period in periods {
            for target in &targets {
                catalog.merged_filename(
                    &target.model,
                    &target.experiment,
                    &target.variable,
                    period,
                )?;
            }
        }
    }

    tokio::fs::create_dir_all(&config.dest).await?;

    info!(
        files = items.len(),
        workers = config.workers.workers,
        dest = %config.dest.display(),
        "Downloading files"
    );
    let downloader = Downloader::new(fetcher, config.workers, config.bbox);
    let download = downloader.run(&items).await;
    info!(
        downloaded = download.downloaded,
        skipped = download.skipped,
        failed = download.failed,
        "Download stage complete"
    );

    let merge = match &config.periods {
        None => None,
        Some(periods) => {
            info!(
                count = periods.len(),
                periods = %periods.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(","),
                "Merging files into periods"
            );
            let dest = config.dest.clone();
            let catalog = catalog.clone();
            let periods = periods.clone();
            let bbox = config.bbox;
            let report = tokio::task::spawn_blocking(move || {
                merge_all(&dest, &catalog, &targets, &periods, bbox.as_ref())
            })
            .await
            .map_err(ScraperError::from)?;
            Some(report)
        }
    };

    Ok(RunReport { download, merge })
}
