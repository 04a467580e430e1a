//! Period merge stage: concatenate single-year files into multi-year files

use crate::bbox::BoundingBox;
use crate::catalog::{distinct, parse_year_span, Catalog};
use crate::crop::{crop_in_place, replace_with};
use crate::dataset::ops::concat_along_time;
use crate::dataset::Dataset;
use crate::errors::Result;
use crate::period::Period;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Lists `.nc` files in `dir` whose filename date token starts with a year in
/// `min..=max`, sorted by name.
pub fn get_files_in_range(dir: &Path, min: i32, max: i32) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("nc") {
            continue;
        }
        let Some((start, _)) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_year_span)
        else {
            continue;
        };
        if min <= start && start <= max {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// The (model, experiment, variable) series a merge works on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeTarget {
    pub model: String,
    pub experiment: String,
    pub variable: String,
}

impl MergeTarget {
    pub fn new(model: &str, experiment: &str, variable: &str) -> Self {
        Self {
            model: model.to_string(),
            experiment: experiment.to_string(),
            variable: variable.to_string(),
        }
    }

    /// Every distinct requested triple, in model, experiment, variable order.
    pub fn all(models: &[String], experiments: &[String], variables: &[String]) -> Vec<Self> {
        let mut targets = Vec::new();
        for model in distinct(models) {
            for experiment in distinct(experiments) {
                for variable in distinct(variables) {
                    targets.push(Self::new(model, experiment, variable));
                }
            }
        }
        targets
    }

    /// Whether `filename` is a single-year file of this series.
    fn owns_single_year(&self, filename: &str) -> bool {
        let prefix = Catalog::file_stem_prefix(&self.model, &self.experiment, &self.variable);
        filename.starts_with(&prefix)
            && matches!(parse_year_span(filename), Some((start, end)) if start == end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Written(PathBuf),
    /// The period covers a single year whose file already has the merged name
    Unchanged(PathBuf),
    NoData,
}

/// Counts over one merge stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub written: usize,
    pub unchanged: usize,
    pub empty: usize,
    pub failed: usize,
}

/// Merges the single-year files of `target` that fall in `period`.
///
/// Output goes to the period-named file in `dest` and is cropped in place
/// when `bbox` is given. A period without input files writes nothing.
pub fn merge_period(
    dest: &Path,
    catalog: &Catalog,
    target: &MergeTarget,
    period: &Period,
    bbox: Option<&BoundingBox>,
) -> Result<MergeOutcome> {
    let output = dest.join(catalog.merged_filename(
        &target.model,
        &target.experiment,
        &target.variable,
        period,
    )?);

    let files: Vec<PathBuf> = get_files_in_range(dest, period.start, period.end)?
        .into_iter()
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| target.owns_single_year(n))
        })
        .collect();

    if files.is_empty() {
        warn!(
            period = %period,
            variable = %target.variable,
            model = %target.model,
            experiment = %target.experiment,
            "No data for period, nothing merged"
        );
        return Ok(MergeOutcome::NoData);
    }

    if files.iter().any(|f| f == &output) {
        info!(
            file = %output.display(),
            period = %period,
            "Period covers a single yearly file, leaving it as is"
        );
        return Ok(MergeOutcome::Unchanged(output));
    }

    info!(period = %period, files = files.len(), "Merging files");

    let parts = files
        .iter()
        .map(|p| Dataset::open(p))
        .collect::<Result<Vec<_>>>()?;
    let mut merged = concat_along_time(&parts)?;

    if let (Some(start), Some(end)) = (period.start_date(), period.end_date()) {
        merged.set_attribute("period_start", start.format("%Y-%m-%d").to_string());
        merged.set_attribute("period_end", end.format("%Y-%m-%d").to_string());
    }
    merged.record_history(&format!(
        "{}: merged {} yearly files for {} by riccar-fetch",
        Utc::now().to_rfc3339(),
        files.len(),
        period
    ));

    replace_with(&output, &merged)?;

    if let Some(bbox) = bbox {
        crop_in_place(&output, bbox)?;
    }

    info!(file = %output.display(), "Wrote merged file");
    Ok(MergeOutcome::Written(output))
}

/// Runs [`merge_period`] for every period and target, logging failures.
pub fn merge_all(
    dest: &Path,
    catalog: &Catalog,
    targets: &[MergeTarget],
    periods: &[Period],
    bbox: Option<&BoundingBox>,
) -> MergeReport {
    let mut report = MergeReport::default();
    for period in periods {
        for target in targets {
            match merge_period(dest, catalog, target, period, bbox) {
                Ok(MergeOutcome::Written(_)) => report.written += 1,
                Ok(MergeOutcome::Unchanged(_)) => report.unchanged += 1,
                Ok(MergeOutcome::NoData) => report.empty += 1,
                Err(e) => {
                    error!(
                        period = %period,
                        variable = %target.variable,
                        error = %e,
                        "Error merging period"
                    );
                    report.failed += 1;
                }
            }
        }
    }
    report
}
