//! Price series: time-ordered FX observations

use crate::error::{FxError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered sequence of `(timestamp, rate)` observations
///
/// Timestamps are unique and strictly increasing (a `BTreeMap` key), and every
/// rate is positive and finite. The empty series is a legitimate value meaning
/// "no data", never an error. Serialized as a list of `[timestamp, rate]`
/// pairs; deserializing validates like [`PriceSeries::from_observations`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<(DateTime<Utc>, f64)>",
    into = "Vec<(DateTime<Utc>, f64)>"
)]
pub struct PriceSeries {
    observations: BTreeMap<DateTime<Utc>, f64>,
}

impl PriceSeries {
    /// Create an empty series
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from observations, validating order and rates
    ///
    /// Input must already be sorted with no repeated timestamps.
    pub fn from_observations<I>(observations: I) -> Result<Self>
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        let mut series = Self::new();
        for (dt, rate) in observations {
            Self::validate_rate(dt, rate)?;
            if let Some((last, _)) = series.last() {
                if dt <= last {
                    return Err(FxError::InvalidData(format!(
                        "Timestamps must be strictly increasing: {} follows {}",
                        dt, last
                    )));
                }
            }
            series.observations.insert(dt, rate);
        }
        Ok(series)
    }

    /// Constant series at midnight UTC of each date
    pub fn constant(dates: &[NaiveDate], rate: f64) -> Self {
        let observations = dates
            .iter()
            .map(|date| (date.and_time(chrono::NaiveTime::MIN).and_utc(), rate))
            .collect();
        Self { observations }
    }

    fn validate_rate(dt: DateTime<Utc>, rate: f64) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(FxError::InvalidData(format!(
                "FX rate must be positive, got {} at {}",
                rate, dt
            )));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Rate at an exact timestamp
    pub fn get(&self, dt: DateTime<Utc>) -> Option<f64> {
        self.observations.get(&dt).copied()
    }

    /// Most recent rate at or before `dt`
    pub fn asof(&self, dt: DateTime<Utc>) -> Option<f64> {
        self.observations.range(..=dt).next_back().map(|(_, rate)| *rate)
    }

    pub fn first(&self) -> Option<(DateTime<Utc>, f64)> {
        self.observations.iter().next().map(|(dt, rate)| (*dt, *rate))
    }

    pub fn last(&self) -> Option<(DateTime<Utc>, f64)> {
        self.observations
            .iter()
            .next_back()
            .map(|(dt, rate)| (*dt, *rate))
    }

    /// Latest timestamp, if any
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.observations.keys().next_back().copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.observations.iter().map(|(dt, rate)| (*dt, *rate))
    }

    pub fn timestamps(&self) -> impl DoubleEndedIterator<Item = DateTime<Utc>> + '_ {
        self.observations.keys().copied()
    }

    pub fn rates(&self) -> impl DoubleEndedIterator<Item = f64> + '_ {
        self.observations.values().copied()
    }

    /// Observations strictly after `dt`
    pub fn after(&self, dt: DateTime<Utc>) -> Self {
        use std::ops::Bound::{Excluded, Unbounded};

        let observations = self
            .observations
            .range((Excluded(dt), Unbounded))
            .map(|(dt, rate)| (*dt, *rate))
            .collect();
        Self { observations }
    }

    /// Last `n` observations
    pub fn tail(&self, n: usize) -> Self {
        let skip = self.len().saturating_sub(n);
        Self {
            observations: self.iter().skip(skip).collect(),
        }
    }

    /// Elementwise `1 / rate`
    pub fn reciprocal(&self) -> Self {
        Self {
            observations: self.iter().map(|(dt, rate)| (dt, 1.0 / rate)).collect(),
        }
    }

    /// Append observations that all lie after the current last timestamp
    pub(crate) fn append(&mut self, later: &PriceSeries) {
        debug_assert!(match (self.last_timestamp(), later.first()) {
            (Some(last), Some((first, _))) => first > last,
            _ => true,
        });
        self.observations
            .extend(later.observations.iter().map(|(dt, rate)| (*dt, *rate)));
    }
}

impl TryFrom<Vec<(DateTime<Utc>, f64)>> for PriceSeries {
    type Error = FxError;

    fn try_from(observations: Vec<(DateTime<Utc>, f64)>) -> Result<Self> {
        Self::from_observations(observations)
    }
}

impl From<PriceSeries> for Vec<(DateTime<Utc>, f64)> {
    fn from(series: PriceSeries) -> Self {
        series.observations.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = (&'a DateTime<Utc>, &'a f64);
    type IntoIter = std::collections::btree_map::Iter<'a, DateTime<Utc>, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

impl FromIterator<(DateTime<Utc>, f64)> for PriceSeries {
    /// Collects without validation; later duplicates overwrite earlier ones.
    fn from_iter<T: IntoIterator<Item = (DateTime<Utc>, f64)>>(iter: T) -> Self {
        Self {
            observations: iter.into_iter().collect(),
        }
    }
}
