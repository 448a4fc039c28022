//! CSV file series store
//!
//! One file per code, `<dir>/<CODE>.csv`, with a `DATETIME,PRICE` header.

use super::base::SeriesStore;
use super::codec::decode;
use super::series::PriceSeries;
use crate::error::{FxError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const DATETIME_COLUMN: &str = "DATETIME";
const PRICE_COLUMN: &str = "PRICE";

/// Directory of per-code CSV files
#[derive(Debug, Clone)]
pub struct CsvSeriesStore {
    dir: PathBuf,
}

impl CsvSeriesStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File for `code`; only six-letter pair codes map into the store
    fn path_for(&self, code: &str) -> Result<PathBuf> {
        let pair = decode(code)?;
        Ok(self.dir.join(format!("{}.csv", pair.code())))
    }
}

impl SeriesStore for CsvSeriesStore {
    fn list_codes(&self) -> Result<BTreeSet<String>> {
        let mut codes = BTreeSet::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                codes.insert(stem.to_string());
            }
        }
        Ok(codes)
    }

    fn has_code(&self, code: &str) -> Result<bool> {
        Ok(self.path_for(code)?.is_file())
    }

    fn read(&self, code: &str) -> Result<PriceSeries> {
        let path = self.path_for(code)?;
        if !path.is_file() {
            return Err(FxError::NonexistentEntry(code.to_string()));
        }
        read_series_csv(&path)
    }

    fn write(&mut self, code: &str, series: &PriceSeries) -> Result<()> {
        write_series_csv(&self.path_for(code)?, series)
    }

    fn erase(&mut self, code: &str) -> Result<()> {
        let path = self.path_for(code)?;
        if path.is_file() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Load a series from a `DATETIME,PRICE` CSV file
///
/// Rows must be in ascending time order. Timestamps may be RFC 3339,
/// `YYYY-MM-DD HH:MM:SS` (taken as UTC) or a bare `YYYY-MM-DD`.
pub fn read_series_csv(path: &Path) -> Result<PriceSeries> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let dt_idx = find_column(&headers, DATETIME_COLUMN)?;
    let price_idx = find_column(&headers, PRICE_COLUMN)?;

    let mut observations = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let dt = parse_timestamp(&record[dt_idx]).map_err(|e| {
            FxError::ParseError(format!("{} row {}: {}", path.display(), row + 1, e))
        })?;
        let price: f64 = record[price_idx].trim().parse().map_err(|e| {
            FxError::ParseError(format!(
                "{} row {}: invalid price {:?}: {}",
                path.display(),
                row + 1,
                &record[price_idx],
                e
            ))
        })?;
        observations.push((dt, price));
    }

    PriceSeries::from_observations(observations)
}

/// Write a series as a `DATETIME,PRICE` CSV file
///
/// Rows go to a sibling `.tmp` file that is renamed over `path` once complete,
/// so a failed write leaves any existing file untouched.
pub fn write_series_csv(path: &Path, series: &PriceSeries) -> Result<()> {
    let tmp_path = temp_path_for(path)?;
    if let Err(e) = write_rows(&tmp_path, series) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        FxError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} is not a file path", path.display()),
        ))
    })?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}

fn write_rows(path: &Path, series: &PriceSeries) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([DATETIME_COLUMN, PRICE_COLUMN])?;
    for (dt, rate) in series.iter() {
        writer.write_record([dt.to_rfc3339(), rate.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| FxError::ParseError(format!("Column '{}' not found in CSV", name)))
}

fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    Err(format!("invalid timestamp {:?}", raw))
}
