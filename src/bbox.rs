//! Geographic bounding boxes used for cropping

use crate::errors::{Result, ScraperError};
use std::fmt;
use std::str::FromStr;

/// `(min_lon, min_lat, max_lon, max_lat)` in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self> {
        let bbox = Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        };
        bbox.check(&bbox.to_string())?;
        Ok(bbox)
    }

    fn check(&self, input: &str) -> Result<()> {
        let values = [self.min_lon, self.min_lat, self.max_lon, self.max_lat];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ScraperError::InvalidBoundingBox {
                input: input.to_string(),
                reason: "coordinates must be finite".to_string(),
            });
        }
        if self.min_lon > self.max_lon || self.min_lat > self.max_lat {
            return Err(ScraperError::InvalidBoundingBox {
                input: input.to_string(),
                reason: "minimum exceeds maximum".to_string(),
            });
        }
        Ok(())
    }
}

impl FromStr for BoundingBox {
    type Err = ScraperError;

    /// Accepts `(a,b,c,d)` or `a,b,c,d`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: String| ScraperError::InvalidBoundingBox {
            input: s.to_string(),
            reason,
        };

        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);

        let values = inner
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|_| invalid(format!("'{}' is not a number", part.trim())))
            })
            .collect::<Result<Vec<f64>>>()?;

        let [min_lon, min_lat, max_lon, max_lat] = values[..] else {
            return Err(invalid(format!("expected 4 values, got {}", values.len())));
        };

        let bbox = Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        };
        bbox.check(s)?;
        Ok(bbox)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{},{},{})",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}
