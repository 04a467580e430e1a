//! Shared fixtures: small RICCAR-shaped NetCDF files and fake fetchers.

#![allow(dead_code)]

use async_trait::async_trait;
use ndarray::{Array1, Array3};
use riccar_fetch::catalog::parse_year_span;
use riccar_fetch::download::Fetch;
use riccar_fetch::errors::{Result, ScraperError};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Time steps written per fixture year.
pub const DAYS: usize = 3;

/// Evenly spaced coordinates from `start` to `end` inclusive (1 degree steps).
pub fn coords(start: i32, end: i32) -> Vec<f32> {
    if start <= end {
        (start..=end).map(|v| v as f32).collect()
    } else {
        (end..=start).rev().map(|v| v as f32).collect()
    }
}

/// Writes a `(time, lat, lon)` precipitation file covering `year`.
pub fn write_year_file(
    path: &Path,
    year: i32,
    lat: &[f32],
    lon: &[f32],
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut file = netcdf::create(path)?;

    file.add_attribute("title", "riccar-fetch test fixture")?;
    file.add_attribute("institution", "Test Institute")?;

    file.add_dimension("time", DAYS)?;
    file.add_dimension("lat", lat.len())?;
    file.add_dimension("lon", lon.len())?;

    {
        let base = (year - 1949) as f64 * 365.25;
        let times: Vec<f64> = (0..DAYS).map(|d| base + d as f64).collect();
        let mut time_var = file.add_variable::<f64>("time", &["time"])?;
        time_var.put_attribute("units", "days since 1949-12-01 00:00:00")?;
        time_var.put_attribute("calendar", "standard")?;
        time_var.put(Array1::from(times).view(), ..)?;
    }

    {
        let mut lat_var = file.add_variable::<f32>("lat", &["lat"])?;
        lat_var.put_attribute("units", "degrees_north")?;
        lat_var.put(Array1::from(lat.to_vec()).view(), ..)?;
    }

    {
        let mut lon_var = file.add_variable::<f32>("lon", &["lon"])?;
        lon_var.put_attribute("units", "degrees_east")?;
        lon_var.put(Array1::from(lon.to_vec()).view(), ..)?;
    }

    {
        let mut pr = file.add_variable::<f32>("prAdjust", &["time", "lat", "lon"])?;
        pr.put_attribute("_FillValue", 1.0e20f32)?;
        pr.put_attribute("units", "kg m-2 s-1")?;
        let data = Array3::from_shape_fn((DAYS, lat.len(), lon.len()), |(t, i, j)| {
            year as f32 + t as f32 * 0.1 + lat[i] * 0.01 + lon[j] * 0.001
        });
        pr.put(data.view(), ..)?;
    }

    Ok(())
}

/// Serves fixture files instead of hitting the network and counts requests.
pub struct FixtureFetcher {
    pub calls: AtomicUsize,
    pub urls: Mutex<Vec<String>>,
    lat: Vec<f32>,
    lon: Vec<f32>,
}

impl FixtureFetcher {
    pub fn new(lat: Vec<f32>, lon: Vec<f32>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            lat,
            lon,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetch for FixtureFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());

        let name = url.rsplit('/').next().unwrap_or(url);
        let (year, _) = parse_year_span(name).ok_or_else(|| ScraperError::HttpStatus {
            url: url.to_string(),
            status: 404,
        })?;
        write_year_file(dest, year, &self.lat, &self.lon)
            .map_err(|e| ScraperError::Task(e.to_string()))?;
        Ok(std::fs::metadata(dest)?.len())
    }
}

/// Writes a few bytes, then fails like a dropped connection or a 404.
pub struct FailingFetcher {
    pub calls: AtomicUsize,
}

impl FailingFetcher {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Fetch for FailingFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::fs::write(dest, b"CDF\x01partial")?;
        Err(ScraperError::HttpStatus {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Serves valid NetCDF files that carry no lat/lon grid, so cropping fails.
pub struct GridlessFetcher {
    pub calls: AtomicUsize,
}

impl GridlessFetcher {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Fetch for GridlessFetcher {
    async fn fetch(&self, _url: &str, dest: &Path) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut file = netcdf::create(dest)?;
            file.add_dimension("time", DAYS)?;
            let mut var = file.add_variable::<f64>("time", &["time"])?;
            var.put(Array1::from_elem(DAYS, 0.0f64).view(), ..)?;
        }
        Ok(std::fs::metadata(dest)?.len())
    }
}
