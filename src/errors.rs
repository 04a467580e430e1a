//! Centralized error handling for riccar-fetch
//!
//! Validation errors (bad parameters, periods, bounding boxes) are fatal and
//! surface before any network or file I/O. Fetch, crop and merge errors are
//! reported per item by the pipeline and never abort the batch.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for riccar-fetch operations
#[derive(Debug, Error)]
pub enum ScraperError {
    /// A model, experiment, variable or year outside the catalog
    #[error("Invalid {name} '{value}': must be one of {allowed}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        allowed: String,
    },

    /// Malformed "start-end" period string
    #[error("Invalid period '{input}': {reason}")]
    InvalidPeriod { input: String, reason: String },

    /// Malformed "(minLon,minLat,maxLon,maxLat)" string
    #[error("Invalid bounding box '{input}': {reason}")]
    InvalidBoundingBox { input: String, reason: String },

    /// yearmin greater than yearmax
    #[error("Invalid year range: yearmin {min} is greater than yearmax {max}")]
    InvalidYearRange { min: i32, max: i32 },

    /// Network-level HTTP failure (connect, timeout, body stream)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote answered with a non-success status
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// NetCDF file operation errors
    #[error("NetCDF error: {0}")]
    NetCDF(#[from] netcdf::Error),

    /// I/O operation errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Array shape or dimension error
    #[error("Array error: {0}")]
    Array(#[from] ndarray::ShapeError),

    /// Coordinate variable required for selection is absent
    #[error("Coordinate variable '{name}' not found in {}", .path.display())]
    MissingCoordinate { name: String, path: PathBuf },

    /// Inputs of a period merge cannot be combined deterministically
    #[error("Merge conflict: {message}")]
    MergeConflict { message: String },

    /// Catalog file could not be parsed
    #[error("Catalog error: {0}")]
    Catalog(#[from] serde_json::Error),

    /// A blocking worker task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),
}

impl ScraperError {
    pub(crate) fn conflict<S: Into<String>>(message: S) -> Self {
        ScraperError::MergeConflict {
            message: message.into(),
        }
    }

    /// Validation errors are raised before any I/O and end the run.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ScraperError::InvalidParameter { .. }
                | ScraperError::InvalidPeriod { .. }
                | ScraperError::InvalidBoundingBox { .. }
                | ScraperError::InvalidYearRange { .. }
        )
    }
}

impl From<tokio::task::JoinError> for ScraperError {
    fn from(error: tokio::task::JoinError) -> Self {
        ScraperError::Task(error.to_string())
    }
}

/// Result type alias for riccar-fetch operations
pub type Result<T> = std::result::Result<T, ScraperError>;
