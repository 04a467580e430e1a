//! Multi-year merge periods

use crate::errors::{Result, ScraperError};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Closed year range `start..=end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: i32,
    pub end: i32,
}

impl Period {
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(ScraperError::InvalidPeriod {
                input: format!("{start}-{end}"),
                reason: "start year is after end year".to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    /// First day of the period.
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.start, 1, 1)
    }

    /// Last day of the period.
    pub fn end_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.end, 12, 31)
    }

    /// Parses a comma-separated list such as `1961-2001,2021-2061`.
    pub fn parse_list(input: &str) -> Result<Vec<Period>> {
        input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for Period {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| ScraperError::InvalidPeriod {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (start, end) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| invalid("expected 'start-end'"))?;
        let start = start
            .trim()
            .parse::<i32>()
            .map_err(|_| invalid("start is not a year"))?;
        let end = end
            .trim()
            .parse::<i32>()
            .map_err(|_| invalid("end is not a year"))?;

        if start > end {
            return Err(invalid("start year is after end year"));
        }
        Ok(Self { start, end })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
