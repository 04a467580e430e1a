//! Archive catalog and URL/filename construction
//!
//! The [`Catalog`] holds every allowed model, experiment and variable plus the
//! valid year range. It is an ordinary value passed to whoever needs it, so
//! tests and alternate archives can swap it out freely.

use crate::errors::{Result, ScraperError};
use crate::period::Period;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const RICCAR_BASE_URL: &str = "https://www.riccar.org/sites/default/files/nc-files/Downloads";

/// Allowed parameter space and filename template tokens of an archive
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    pub base_url: String,
    pub models: Vec<String>,
    pub experiments: Vec<String>,
    pub variables: Vec<String>,
    pub year_min: i32,
    pub year_max: i32,
}

/// One (model, experiment, variable, year) request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combination {
    pub model: String,
    pub experiment: String,
    pub variable: String,
    pub year: i32,
}

impl Combination {
    pub fn new(model: &str, experiment: &str, variable: &str, year: i32) -> Self {
        Self {
            model: model.to_string(),
            experiment: experiment.to_string(),
            variable: variable.to_string(),
            year,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::riccar()
    }
}

impl Catalog {
    /// The RICCAR MSH-10 bias-adjusted daily archive.
    pub fn riccar() -> Self {
        Self {
            base_url: RICCAR_BASE_URL.to_string(),
            models: vec!["CMCC-CM2-SR5".to_string()],
            experiments: vec!["Historical".to_string(), "ssp585".to_string()],
            variables: vec![
                "prAdjust".to_string(),
                "tasAdjust".to_string(),
                "tasmaxAdjust".to_string(),
                "tasminAdjust".to_string(),
            ],
            year_min: 1961,
            year_max: 2069,
        }
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Checks every field of `combo` against the catalog.
    pub fn validate(&self, combo: &Combination) -> Result<()> {
        check_member("gcm", &combo.model, &self.models)?;
        check_member("experiment", &combo.experiment, &self.experiments)?;
        check_member("variable", &combo.variable, &self.variables)?;
        if combo.year < self.year_min || combo.year > self.year_max {
            return Err(ScraperError::InvalidParameter {
                name: "year",
                value: combo.year.to_string(),
                allowed: format!("{}-{}", self.year_min, self.year_max),
            });
        }
        Ok(())
    }

    /// Remote URL of a single-year file.
    pub fn build_url(&self, combo: &Combination) -> Result<String> {
        self.validate(combo)?;
        let name = file_name(
            &combo.model,
            &combo.experiment,
            &combo.variable,
            combo.year,
            combo.year,
        );
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), name))
    }

    /// Local path of a single-year file: `dest` joined with the URL basename.
    pub fn local_path(&self, dest: &Path, combo: &Combination) -> Result<PathBuf> {
        let url = self.build_url(combo)?;
        let basename = url.rsplit('/').next().unwrap_or(&url);
        Ok(dest.join(basename))
    }

    /// Filename of a period merge, validated like a single-year request.
    pub fn merged_filename(
        &self,
        model: &str,
        experiment: &str,
        variable: &str,
        period: &Period,
    ) -> Result<String> {
        check_member("gcm", model, &self.models)?;
        check_member("experiment", experiment, &self.experiments)?;
        check_member("variable", variable, &self.variables)?;
        Ok(file_name(model, experiment, variable, period.start, period.end))
    }

    /// Prefix shared by every file of a (model, experiment, variable) triple.
    pub fn file_stem_prefix(model: &str, experiment: &str, variable: &str) -> String {
        format!(
            "{variable}_MSH-10_{model}_{experiment}_r1i1p1f1_SMHI-HCLIM-ALADIN-38_v1_day_regrid_"
        )
    }

    /// Cartesian product in model, experiment, variable, year order.
    ///
    /// Repeated list entries are produced once, at their first position.
    pub fn combinations(
        models: &[String],
        experiments: &[String],
        variables: &[String],
        years: std::ops::RangeInclusive<i32>,
    ) -> Vec<Combination> {
        let mut combos = Vec::new();
        for model in distinct(models) {
            for experiment in distinct(experiments) {
                for variable in distinct(variables) {
                    for year in years.clone() {
                        combos.push(Combination::new(model, experiment, variable, year));
                    }
                }
            }
        }
        combos
    }
}

/// Entries of `items` in order of first appearance, duplicates dropped.
pub(crate) fn distinct(items: &[String]) -> Vec<&str> {
    let mut seen = Vec::with_capacity(items.len());
    for item in items {
        if !seen.contains(&item.as_str()) {
            seen.push(item.as_str());
        }
    }
    seen
}

fn check_member(name: &'static str, value: &str, allowed: &[String]) -> Result<()> {
    if allowed.iter().any(|a| a == value) {
        Ok(())
    } else {
        Err(ScraperError::InvalidParameter {
            name,
            value: value.to_string(),
            allowed: format!("[{}]", allowed.join(", ")),
        })
    }
}

fn file_name(model: &str, experiment: &str, variable: &str, start: i32, end: i32) -> String {
    format!(
        "{}{start}0101-{end}1231_LEV.nc",
        Catalog::file_stem_prefix(model, experiment, variable)
    )
}

/// Parses `(start_year, end_year)` from the date token of an archive filename.
///
/// The token is the second-to-last `_` field of the stem, e.g.
/// `20200101-20201231` in `..._regrid_20200101-20201231_LEV.nc`. Returns
/// `None` for anything that is not a `.nc` file carrying such a token.
pub fn parse_year_span(filename: &str) -> Option<(i32, i32)> {
    let stem = filename.strip_suffix(".nc")?;
    let mut fields = stem.rsplit('_');
    fields.next()?;
    let token = fields.next()?;
    let start = leading_year(token)?;
    let end = token
        .split_once('-')
        .and_then(|(_, rest)| leading_year(rest))
        .unwrap_or(start);
    Some((start, end))
}

fn leading_year(token: &str) -> Option<i32> {
    let digits = token.get(..4)?;
    if digits.bytes().all(|b| b.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}
