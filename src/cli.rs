//! Defines command-line interface options using `clap` for riccar-fetch.

use crate::bbox::BoundingBox;
use crate::catalog::Catalog;
use crate::errors::{Result, ScraperError};
use crate::parallel::WorkerConfig;
use crate::period::Period;
use crate::pipeline::RunConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Download, crop and merge RICCAR climate projections
#[derive(Parser, Debug)]
#[command(
    version,
    name = "riccar-fetch",
    about = "Download RICCAR NetCDF files, optionally crop them to a bounding box and merge them into periods"
)]
pub struct Args {
    /// Output folder, created if absent
    #[arg(long, default_value = ".")]
    pub dest: PathBuf,

    /// Variable (short name), can be a comma-separated list
    #[arg(long, default_value = "prAdjust")]
    pub variable: String,

    /// Experiment (short name), can be a comma-separated list
    #[arg(long, default_value = "ssp585")]
    pub experiment: String,

    /// Global climate model, can be a comma-separated list
    #[arg(long, default_value = "CMCC-CM2-SR5")]
    pub gcm: String,

    /// Minimum year
    #[arg(long, default_value_t = 2023)]
    pub yearmin: i32,

    /// Maximum year
    #[arg(long, default_value_t = 2023)]
    pub yearmax: i32,

    /// Merge yearly files into user-defined periods
    #[arg(long, default_value_t = false)]
    pub mergeperiods: bool,

    /// User-defined periods, comma-separated list of start-end
    #[arg(long, default_value = "1961-2001,2021-2061")]
    pub periods: String,

    /// Crop files to the bounding box
    #[arg(long, default_value_t = false)]
    pub slicebbox: bool,

    /// Bounding box (minx, miny, maxx, maxy)
    #[arg(long, default_value = "(35.4503,33.854127,35.5706,33.922641)", value_parser = parse_bbox_arg)]
    pub bbox: BoundingBox,

    /// Number of concurrent downloads; 0 uses one per CPU core
    #[arg(short = 'w', long, default_value_t = 1)]
    pub workers: usize,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = 600)]
    pub timeout: u64,

    /// JSON catalog replacing the built-in RICCAR catalog
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Log filter, e.g. "info" or "riccar_fetch=debug"
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Catalog selected by `--catalog`, or the built-in one.
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(path) => Catalog::from_json_file(path),
            None => Ok(Catalog::riccar()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Validates the list-valued options and builds the run configuration.
    pub fn run_config(&self) -> Result<RunConfig> {
        if self.yearmin > self.yearmax {
            return Err(ScraperError::InvalidYearRange {
                min: self.yearmin,
                max: self.yearmax,
            });
        }

        let periods = if self.mergeperiods {
            Some(Period::parse_list(&self.periods)?)
        } else {
            None
        };

        Ok(RunConfig {
            dest: self.dest.clone(),
            models: split_list(&self.gcm),
            experiments: split_list(&self.experiment),
            variables: split_list(&self.variable),
            years: self.yearmin..=self.yearmax,
            periods,
            bbox: self.slicebbox.then_some(self.bbox),
            workers: WorkerConfig::new(self.workers),
        })
    }
}

/// Splits a comma-separated option, dropping empty and repeated entries.
pub fn split_list(s: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for part in s.split(',').map(str::trim) {
        if !part.is_empty() && !parts.iter().any(|p| p == part) {
            parts.push(part.to_string());
        }
    }
    parts
}

fn parse_bbox_arg(s: &str) -> std::result::Result<BoundingBox, String> {
    s.parse::<BoundingBox>().map_err(|e| e.to_string())
}
