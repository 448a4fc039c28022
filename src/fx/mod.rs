//! Spot FX price series
//!
//! Stores one series per currency quoted against a reference currency and
//! derives every other pair on demand.
//!
//! # Components
//!
//! - **codec**: Currency and six-letter pair codes
//! - **series**: `PriceSeries`, the time-ordered observation container
//! - **base**: `SeriesStore`, the storage seam
//! - **in_memory** / **csv_store** / **sqlite**: storage backends
//! - **exploding**: Testing stub that panics on store access
//! - **resolver**: Identity, direct, inverted and cross-rate derivation
//! - **spike** / **merge**: Append-only merge guarded by a spike detector
//! - **repository**: get / add / update / delete front door
//!
//! # Example
//!
//! ```rust
//! use rusty_fx::fx::{FxPriceRepository, InMemorySeriesStore, PriceSeries, UpdateOutcome};
//! use chrono::{TimeZone, Utc};
//!
//! let d1 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
//! let d2 = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap();
//!
//! let store = InMemorySeriesStore::new()
//!     .with_series("EURUSD", PriceSeries::from_observations(vec![(d1, 1.10)]).unwrap())
//!     .with_series("GBPUSD", PriceSeries::from_observations(vec![(d1, 1.30)]).unwrap());
//! let mut repo = FxPriceRepository::new(store);
//!
//! // EURGBP is derived from EURUSD / GBPUSD
//! let eurgbp = repo.get("EURGBP").unwrap();
//! assert!((eurgbp.get(d1).unwrap() - 0.8462).abs() < 1e-4);
//!
//! let batch = PriceSeries::from_observations(vec![(d1, 1.10), (d2, 1.12)]).unwrap();
//! assert_eq!(repo.update("EURUSD", &batch, true).unwrap(), UpdateOutcome::RowsAdded(1));
//! ```

pub mod base;
pub mod codec;
pub mod config;
pub mod csv_store;
pub mod exploding;
pub mod in_memory;
pub mod merge;
pub mod repository;
pub mod resolver;
pub mod series;
pub mod spike;
#[cfg(feature = "rusqlite-support")]
pub mod sqlite;

pub use base::SeriesStore;
pub use codec::{decode, encode, CurrencyCode, CurrencyPair};
pub use config::{FxConfig, SpikeConfig};
pub use csv_store::{read_series_csv, write_series_csv, CsvSeriesStore};
pub use exploding::ExplodingSeriesStore;
pub use in_memory::InMemorySeriesStore;
pub use merge::{MergeOutcome, UpdateMerger};
pub use repository::{AddOutcome, DeleteOutcome, FxPriceRepository, UpdateOutcome};
pub use resolver::{cross_rates, RateResolver};
pub use series::PriceSeries;
pub use spike::{NeverSpike, SpikeDetector, VolNormalisedSpikeDetector};
#[cfg(feature = "rusqlite-support")]
pub use sqlite::SqliteSeriesStore;
