//! Label-based selection and time concatenation

use super::{DataVariable, Dataset, Dimension, VarData, TIME_DIM};
use crate::errors::{Result, ScraperError};

impl Dataset {
    /// Keeps the positions along `dim` whose coordinate value lies in the
    /// closed interval spanned by `a` and `b`.
    ///
    /// Works for ascending and descending coordinates alike and keeps the
    /// original ordering. Returns `None` when `dim` has no 1-D coordinate
    /// variable. An empty intersection yields a zero-length dimension.
    pub fn select_range(&self, dim: &str, a: f64, b: f64) -> Option<Dataset> {
        let coords = self.coordinate_values(dim)?;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let indices: Vec<usize> = coords
            .iter()
            .enumerate()
            .filter(|(_, &v)| lo <= v && v <= hi)
            .map(|(i, _)| i)
            .collect();
        Some(self.take(dim, &indices))
    }

    /// Keeps `indices` along `dim` in every variable that uses it.
    pub fn take(&self, dim: &str, indices: &[usize]) -> Dataset {
        let dimensions = self
            .dimensions
            .iter()
            .map(|d| Dimension {
                name: d.name.clone(),
                len: if d.name == dim { indices.len() } else { d.len },
            })
            .collect();

        let variables = self
            .variables
            .iter()
            .map(|var| match var.axis_of(dim) {
                Some(axis) => DataVariable {
                    data: var.data.select(axis, indices),
                    ..var.clone()
                },
                None => var.clone(),
            })
            .collect();

        Dataset {
            dimensions,
            variables,
            attributes: self.attributes.clone(),
        }
    }

    /// First and last value of the time coordinate.
    pub fn time_bounds(&self) -> Option<(f64, f64)> {
        let times = self.coordinate_values(TIME_DIM)?;
        let first = times.iter().copied().fold(f64::INFINITY, f64::min);
        let last = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if times.is_empty() {
            None
        } else {
            Some((first, last))
        }
    }
}

/// Concatenates datasets along `time`.
///
/// Inputs are ordered by their earliest time value. The merge is rejected
/// unless:
/// - every input has a non-empty time coordinate with matching `units` and
///   `calendar`
/// - time ranges do not overlap
/// - all inputs share dimensions (apart from `time`) and variable names
/// - variables without a time dimension are identical everywhere
pub fn concat_along_time(parts: &[Dataset]) -> Result<Dataset> {
    if parts.is_empty() {
        return Err(ScraperError::conflict("no datasets to merge"));
    }

    let mut ordered: Vec<(f64, f64, &Dataset)> = Vec::with_capacity(parts.len());
    for (i, part) in parts.iter().enumerate() {
        let (first, last) = part.time_bounds().ok_or_else(|| {
            ScraperError::conflict(format!("input {i} has no '{TIME_DIM}' coordinate values"))
        })?;
        ordered.push((first, last, part));
    }
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

    for pair in ordered.windows(2) {
        let (_, prev_last, _) = pair[0];
        let (next_first, _, _) = pair[1];
        if next_first <= prev_last {
            return Err(ScraperError::conflict(format!(
                "time coordinates overlap: {next_first} <= {prev_last}"
            )));
        }
    }

    let datasets: Vec<&Dataset> = ordered.iter().map(|(_, _, ds)| *ds).collect();
    let base = datasets[0];
    check_time_encoding(&datasets)?;
    check_dimensions(&datasets)?;

    let mut variables = Vec::with_capacity(base.variables.len());
    for var in &base.variables {
        let same_name = datasets
            .iter()
            .map(|ds| {
                ds.variable(&var.name).ok_or_else(|| {
                    ScraperError::conflict(format!("variable '{}' missing from an input", var.name))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let data = match var.axis_of(TIME_DIM) {
            Some(axis) => {
                if let Some(other) = same_name.iter().find(|v| v.dims != var.dims) {
                    return Err(ScraperError::conflict(format!(
                        "variable '{}' has dimensions {:?} and {:?}",
                        var.name, var.dims, other.dims
                    )));
                }
                let pieces: Vec<&VarData> = same_name.iter().map(|v| &v.data).collect();
                VarData::concatenate(&pieces, axis)?
            }
            None => {
                if same_name.iter().any(|v| v.data != var.data) {
                    return Err(ScraperError::conflict(format!(
                        "time-independent variable '{}' differs between inputs",
                        var.name
                    )));
                }
                var.data.clone()
            }
        };

        variables.push(DataVariable {
            data,
            ..var.clone()
        });
    }

    if let Some(ds) = datasets
        .iter()
        .find(|ds| ds.variables.len() != base.variables.len())
    {
        return Err(ScraperError::conflict(format!(
            "inputs carry {} and {} variables",
            base.variables.len(),
            ds.variables.len()
        )));
    }

    let time_len: usize = datasets
        .iter()
        .map(|ds| ds.dimension(TIME_DIM).map_or(0, |d| d.len))
        .sum();
    let dimensions = base
        .dimensions
        .iter()
        .map(|d| Dimension {
            name: d.name.clone(),
            len: if d.name == TIME_DIM { time_len } else { d.len },
        })
        .collect();

    Ok(Dataset {
        dimensions,
        variables,
        attributes: base.attributes.clone(),
    })
}

fn check_time_encoding(datasets: &[&Dataset]) -> Result<()> {
    for attr in ["units", "calendar"] {
        let expected = datasets[0]
            .variable(TIME_DIM)
            .and_then(|v| v.string_attribute(attr));
        for ds in &datasets[1..] {
            let found = ds.variable(TIME_DIM).and_then(|v| v.string_attribute(attr));
            if found != expected {
                return Err(ScraperError::conflict(format!(
                    "time {attr} differ: {expected:?} vs {found:?}"
                )));
            }
        }
    }
    Ok(())
}

fn check_dimensions(datasets: &[&Dataset]) -> Result<()> {
    let base = datasets[0];
    for ds in &datasets[1..] {
        if ds.dimensions.len() != base.dimensions.len() {
            return Err(ScraperError::conflict("inputs have different dimension sets"));
        }
        for dim in base.dimensions.iter().filter(|d| d.name != TIME_DIM) {
            match ds.dimension(&dim.name) {
                Some(other) if other.len == dim.len => {}
                Some(other) => {
                    return Err(ScraperError::conflict(format!(
                        "dimension '{}' has length {} and {}",
                        dim.name, dim.len, other.len
                    )))
                }
                None => {
                    return Err(ScraperError::conflict(format!(
                        "dimension '{}' missing from an input",
                        dim.name
                    )))
                }
            }
        }
    }
    Ok(())
}
