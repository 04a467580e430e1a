//! riccar-fetch: download, crop and merge RICCAR climate projections
//!
//! A batch tool for the RICCAR regional climate archive. It downloads one
//! NetCDF file per (model, experiment, variable, year), optionally crops each
//! file to a geographic bounding box, and optionally concatenates yearly files
//! into user-defined multi-year periods.
//!
//! ## Key Features
//!
//! - **Deterministic naming**: URLs and filenames follow the archive template
//! - **Resumable**: files already on disk are skipped, failures never stop a run
//! - **Safe rewrites**: cropping and merging write a temporary file and rename it
//! - **Bounded concurrency**: optional parallel downloads with per-request timeouts
//!
//! ## Module Organization
//!
//! - [`catalog`]: allowed parameters and URL/filename construction
//! - [`download`]: the download stage and the [`download::Fetch`] seam
//! - [`crop`]: bounding-box cropping in place
//! - [`merge`]: per-period file selection and concatenation
//! - [`dataset`]: in-memory NetCDF datasets
//! - [`pipeline`]: runs the stages in order
//! - [`progress`]: progress bars that coexist with log output
//! - [`errors`]: centralized error handling
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use riccar_fetch::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn demo() -> riccar_fetch::Result<()> {
//! let catalog = Catalog::riccar();
//! let config = RunConfig {
//!     dest: "data".into(),
//!     models: vec!["CMCC-CM2-SR5".into()],
//!     experiments: vec!["ssp585".into()],
//!     variables: vec!["prAdjust".into()],
//!     years: 2020..=2021,
//!     periods: None,
//!     bbox: None,
//!     workers: WorkerConfig::sequential(),
//! };
//! let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(600))?);
//! let report = run(&catalog, &config, fetcher).await?;
//! println!("{} downloaded", report.download.downloaded);
//! # Ok(())
//! # }
//! ```

pub mod bbox;
pub mod catalog;
pub mod cli;
pub mod crop;
pub mod dataset;
pub mod download;
pub mod errors;
pub mod merge;
pub mod parallel;
pub mod period;
pub mod pipeline;
pub mod progress;

pub use errors::{Result, ScraperError};

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::bbox::BoundingBox;
    pub use crate::catalog::{Catalog, Combination};
    pub use crate::crop::crop_in_place;
    pub use crate::dataset::Dataset;
    pub use crate::download::{DownloadReport, Fetch, HttpFetcher};
    pub use crate::errors::{Result, ScraperError};
    pub use crate::merge::{get_files_in_range, merge_period, MergeTarget};
    pub use crate::parallel::WorkerConfig;
    pub use crate::period::Period;
    pub use crate::pipeline::{run, RunConfig, RunReport};
}
