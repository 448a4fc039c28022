//! Process-wide FX settings passed to the resolver and repository

use super::codec::CurrencyCode;
use super::series::PriceSeries;
use crate::calendar::{TradingCalendar, WeekdayCalendar};
use crate::error::{FxError, Result};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// FX repository configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxConfig {
    /// Currency every stored series is quoted against
    pub reference_currency: CurrencyCode,
    /// First business day of the identity series
    pub identity_start: NaiveDate,
    /// Last day of the identity series; today (UTC) when unset
    pub identity_end: Option<NaiveDate>,
    /// Weekdays left out of the identity series
    pub holidays: Vec<NaiveDate>,
    /// Spike detector thresholds
    pub spike: SpikeConfig,
}

/// Thresholds for [`crate::fx::spike::VolNormalisedSpikeDetector`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpikeConfig {
    /// Largest allowed move, in multiples of the average historic move
    pub max_spike: f64,
    /// Minimum number of historic moves before anything can be flagged
    pub min_history: usize,
}

impl Default for SpikeConfig {
    fn default() -> Self {
        Self {
            max_spike: 8.0,
            min_history: 10,
        }
    }
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            reference_currency: CurrencyCode::USD,
            identity_start: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default(),
            identity_end: None,
            holidays: Vec::new(),
            spike: SpikeConfig::default(),
        }
    }
}

impl FxConfig {
    pub fn with_reference_currency(mut self, currency: CurrencyCode) -> Self {
        self.reference_currency = currency;
        self
    }

    pub fn with_identity_window(mut self, start: NaiveDate, end: Option<NaiveDate>) -> Self {
        self.identity_start = start;
        self.identity_end = end;
        self
    }

    pub fn with_holidays(mut self, holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.holidays.extend(holidays);
        self
    }

    /// Business-day calendar for the identity series
    pub fn calendar(&self) -> WeekdayCalendar {
        let mut calendar = WeekdayCalendar::new();
        for holiday in &self.holidays {
            calendar.add_holiday(*holiday);
        }
        calendar
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        if let Some(end) = self.identity_end {
            if end < self.identity_start {
                return Err(FxError::ConfigError(format!(
                    "identity_end {} is before identity_start {}",
                    end, self.identity_start
                )));
            }
        }
        if !(self.spike.max_spike.is_finite() && self.spike.max_spike > 0.0) {
            return Err(FxError::ConfigError(format!(
                "spike.max_spike must be positive, got {}",
                self.spike.max_spike
            )));
        }
        Ok(())
    }

    /// Series of 1.0 on every business day of the identity window
    pub fn identity_series(&self) -> PriceSeries {
        let end = self
            .identity_end
            .unwrap_or_else(|| Utc::now().date_naive());
        let days = self.calendar().trading_days_between(self.identity_start, end);
        PriceSeries::constant(&days, 1.0)
    }
}
