//! # rusty_fx
//!
//! Historical spot FX prices for any currency pair, built from a small set of
//! series quoted against one reference currency.
//!
//! Storing `EURUSD`, `GBPUSD` and `JPYUSD` is enough to answer `EURGBP`,
//! `USDJPY` or `GBPJPY`: direct quotes are returned as stored, `USDXXX` is
//! inverted and crosses are divided on a forward-filled common index. New
//! prices are merged append-only, with a spike check guarding the write.
//!
//! ## Example
//!
//! ```rust
//! use rusty_fx::prelude::*;
//! use chrono::{TimeZone, Utc};
//!
//! let dt = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
//! let mut repo = FxPriceRepository::new(InMemorySeriesStore::new());
//!
//! let eurusd = PriceSeries::from_observations(vec![(dt, 1.10)]).unwrap();
//! repo.add("EURUSD", &eurusd, false).unwrap();
//!
//! assert_eq!(repo.get("EURUSD").unwrap(), eurusd);
//! assert!(repo.get("EURGBP").unwrap().is_empty());
//! ```

pub mod calendar;
pub mod error;
pub mod fx;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::error::{FxError, Result};
    pub use crate::fx::{
        AddOutcome, CsvSeriesStore, CurrencyCode, CurrencyPair, DeleteOutcome, FxConfig,
        FxPriceRepository, InMemorySeriesStore, PriceSeries, SeriesStore, SpikeDetector,
        UpdateOutcome,
    };
    #[cfg(feature = "rusqlite-support")]
    pub use crate::fx::SqliteSeriesStore;
}
