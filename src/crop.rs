//! Bounding-box cropping of NetCDF files in place
//!
//! The cropped copy is written next to the original, synced to disk and then
//! renamed over it. The original is never removed first, so a failed write
//! leaves the input untouched.

use crate::bbox::BoundingBox;
use crate::dataset::Dataset;
use crate::errors::{Result, ScraperError};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const LAT_DIM: &str = "lat";
pub const LON_DIM: &str = "lon";

/// Selects `lat` and `lon` ranges of `dataset` covered by `bbox`.
///
/// `path` only labels the error when a coordinate is missing.
pub fn crop_dataset(dataset: &Dataset, bbox: &BoundingBox, path: &Path) -> Result<Dataset> {
    let missing = |name: &str| ScraperError::MissingCoordinate {
        name: name.to_string(),
        path: path.to_path_buf(),
    };

    let by_lat = dataset
        .select_range(LAT_DIM, bbox.max_lat, bbox.min_lat)
        .ok_or_else(|| missing(LAT_DIM))?;
    let mut cropped = by_lat
        .select_range(LON_DIM, bbox.min_lon, bbox.max_lon)
        .ok_or_else(|| missing(LON_DIM))?;

    cropped.record_history(&format!(
        "{}: cropped to bbox {} by riccar-fetch",
        Utc::now().to_rfc3339(),
        bbox
    ));
    Ok(cropped)
}

/// Crops the file at `path` to `bbox`, replacing it with the cropped copy.
pub fn crop_in_place(path: &Path, bbox: &BoundingBox) -> Result<()> {
    let dataset = Dataset::open(path)?;
    let cropped = crop_dataset(&dataset, bbox, path)?;

    if cropped.is_empty() {
        warn!(
            file = %path.display(),
            bbox = %bbox,
            "Bounding box does not intersect the dataset, result is empty"
        );
    }

    replace_with(path, &cropped)?;

    info!(
        file = %path.display(),
        lat = cropped.dimension(LAT_DIM).map_or(0, |d| d.len),
        lon = cropped.dimension(LON_DIM).map_or(0, |d| d.len),
        "Cropped file"
    );
    Ok(())
}

/// Writes `dataset` to a temporary sibling of `path`, then renames it over `path`.
pub fn replace_with(path: &Path, dataset: &Dataset) -> Result<()> {
    let temp = temp_path(path);
    if temp.exists() {
        debug!(file = %temp.display(), "Removing stale temporary file");
        fs::remove_file(&temp)?;
    }

    if let Err(e) = dataset.write(&temp).and_then(|_| sync_file(&temp)) {
        fs::remove_file(&temp).ok();
        return Err(e);
    }

    fs::rename(&temp, path)?;
    Ok(())
}

/// `<name>.nc` becomes `<name>.nc.tmp`, which directory scans ignore.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn sync_file(path: &Path) -> Result<()> {
    fs::File::open(path)?.sync_all()?;
    Ok(())
}
