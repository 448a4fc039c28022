//! In-memory series store
//!
//! Keeps every series in a `BTreeMap` keyed by code. Ideal for tests and for
//! embedding pre-loaded history.

use super::base::SeriesStore;
use super::series::PriceSeries;
use crate::error::{FxError, Result};
use std::collections::{BTreeMap, BTreeSet};

/// In-memory FX series storage
///
/// # Example
/// ```
/// use rusty_fx::fx::{InMemorySeriesStore, PriceSeries, SeriesStore};
/// use chrono::{TimeZone, Utc};
///
/// let dt = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let series = PriceSeries::from_observations(vec![(dt, 1.20)]).unwrap();
///
/// let store = InMemorySeriesStore::new().with_series("EURUSD", series.clone());
/// assert_eq!(store.read("EURUSD").unwrap(), series);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySeriesStore {
    series: BTreeMap<String, PriceSeries>,
}

impl InMemorySeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_series(mut self, code: &str, series: PriceSeries) -> Self {
        self.series.insert(code.to_string(), series);
        self
    }

    /// Get number of stored codes
    pub fn num_codes(&self) -> usize {
        self.series.len()
    }

    /// Get total number of observations across all codes
    pub fn num_entries(&self) -> usize {
        self.series.values().map(PriceSeries::len).sum()
    }

    pub fn clear(&mut self) {
        self.series.clear();
    }
}

impl SeriesStore for InMemorySeriesStore {
    fn list_codes(&self) -> Result<BTreeSet<String>> {
        Ok(self.series.keys().cloned().collect())
    }

    fn has_code(&self, code: &str) -> Result<bool> {
        Ok(self.series.contains_key(code))
    }

    fn read(&self, code: &str) -> Result<PriceSeries> {
        self.series
            .get(code)
            .cloned()
            .ok_or_else(|| FxError::NonexistentEntry(code.to_string()))
    }

    fn write(&mut self, code: &str, series: &PriceSeries) -> Result<()> {
        self.series.insert(code.to_string(), series.clone());
        Ok(())
    }

    fn erase(&mut self, code: &str) -> Result<()> {
        self.series.remove(code);
        Ok(())
    }
}
