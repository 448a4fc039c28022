//! Business-day calendar used to lay out the identity rate series

use chrono::{Datelike, NaiveDate, Weekday};

/// Calendar of days on which a rate is expected to be observed
pub trait TradingCalendar: Send + Sync {
    /// Check if a date is a trading day
    fn is_trading_day(&self, date: NaiveDate) -> bool;

    /// Get all trading days between two dates (inclusive)
    fn trading_days_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| self.is_trading_day(*day))
            .collect()
    }
}

/// Monday to Friday calendar, optionally with extra closed dates
#[derive(Debug, Clone, Default)]
pub struct WeekdayCalendar {
    holidays: Vec<NaiveDate>,
}

impl WeekdayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a closed date
    pub fn add_holiday(&mut self, date: NaiveDate) {
        if let Err(pos) = self.holidays.binary_search(&date) {
            self.holidays.insert(pos, date);
        }
    }

    fn is_weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

impl TradingCalendar for WeekdayCalendar {
    fn is_trading_day(&self, date: NaiveDate) -> bool {
        !Self::is_weekend(date) && self.holidays.binary_search(&date).is_err()
    }
}
