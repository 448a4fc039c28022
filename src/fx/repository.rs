//! FX price repository: get / add / update / delete over a series store

use super::base::SeriesStore;
use super::codec::decode;
use super::config::FxConfig;
use super::merge::{MergeOutcome, UpdateMerger};
use super::resolver::RateResolver;
use super::series::PriceSeries;
use super::spike::{SpikeDetector, VolNormalisedSpikeDetector};
use crate::error::Result;
use std::collections::BTreeSet;

/// Result of [`FxPriceRepository::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// Code already stored and duplication was not allowed; nothing written
    Duplicate,
    /// Code is not a pair quoted against the reference currency; nothing written
    NotReferenceQuoted,
}

/// Result of [`FxPriceRepository::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Rows appended and persisted; zero means nothing was new
    RowsAdded(usize),
    /// Batch flagged as a spike; nothing written
    SpikeRejected,
    /// Code is not a pair quoted against the reference currency; nothing written
    NotReferenceQuoted,
}

impl UpdateOutcome {
    pub fn rows_added(&self) -> Option<usize> {
        match self {
            UpdateOutcome::RowsAdded(n) => Some(*n),
            UpdateOutcome::SpikeRejected | UpdateOutcome::NotReferenceQuoted => None,
        }
    }
}

/// Result of [`FxPriceRepository::delete`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Called without confirmation; nothing erased
    NotConfirmed,
    /// Code was not stored
    NotFound,
}

/// Read and write FX prices for any pair over a pluggable store
///
/// # Example
/// ```
/// use rusty_fx::fx::{AddOutcome, FxPriceRepository, InMemorySeriesStore, PriceSeries};
/// use chrono::{TimeZone, Utc};
///
/// let dt = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
/// let mut repo = FxPriceRepository::new(InMemorySeriesStore::new());
///
/// let eurusd = PriceSeries::from_observations(vec![(dt, 1.25)]).unwrap();
/// assert_eq!(repo.add("EURUSD", &eurusd, false).unwrap(), AddOutcome::Added);
///
/// let usdeur = repo.get("USDEUR").unwrap();
/// assert_eq!(usdeur.get(dt), Some(0.8));
/// ```
pub struct FxPriceRepository<S: SeriesStore> {
    store: S,
    config: FxConfig,
    spike_detector: Box<dyn SpikeDetector>,
}

impl<S: SeriesStore> FxPriceRepository<S> {
    /// Repository with default configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, FxConfig::default())
    }

    /// Repository using the default spike detector tuned by `config.spike`
    pub fn with_config(store: S, config: FxConfig) -> Self {
        let spike_detector = Box::new(VolNormalisedSpikeDetector::new(config.spike));
        Self {
            store,
            config,
            spike_detector,
        }
    }

    /// Replace the spike detector
    pub fn with_spike_detector(mut self, detector: impl SpikeDetector + 'static) -> Self {
        self.spike_detector = Box::new(detector);
        self
    }

    pub fn config(&self) -> &FxConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn resolver(&self) -> RateResolver<'_, S> {
        RateResolver::new(&self.store, &self.config)
    }

    /// Codes with a stored series
    pub fn codes(&self) -> Result<BTreeSet<String>> {
        self.store.list_codes()
    }

    pub fn exists(&self, code: &str) -> Result<bool> {
        Ok(self.codes()?.contains(code))
    }

    /// Historical series for any pair, derived where necessary
    pub fn get(&self, code: &str) -> Result<PriceSeries> {
        self.resolver().resolve(code)
    }

    /// Whether `code` may be stored: `XXXREF` with `XXX` other than the
    /// reference currency. Cross, inverse, identity and malformed codes are
    /// always derived on read.
    fn is_storable(&self, code: &str, method: &str) -> bool {
        let reference = self.config.reference_currency;
        match decode(code) {
            Ok(pair) if pair.quote == reference && !pair.is_identity() => true,
            Ok(_) => {
                log::warn!(
                    fx_code = code, method = method;
                    "Only series quoted against {} can be stored, {} is derived",
                    reference,
                    code
                );
                false
            }
            Err(e) => {
                log::warn!(fx_code = code, method = method; "Refusing to store {}: {}", code, e);
                false
            }
        }
    }

    /// Store a series for `code`
    ///
    /// An existing code is left alone unless `ignore_duplication` is set.
    pub fn add(
        &mut self,
        code: &str,
        series: &PriceSeries,
        ignore_duplication: bool,
    ) -> Result<AddOutcome> {
        if !self.is_storable(code, "add") {
            return Ok(AddOutcome::NotReferenceQuoted);
        }

        if !ignore_duplication && self.exists(code)? {
            log::warn!(
                fx_code = code, method = "add";
                "There is already {} in the data, you have to delete it first, or set \
                 ignore_duplication, or use update",
                code
            );
            return Ok(AddOutcome::Duplicate);
        }

        self.store.write(code, series)?;
        log::info!(fx_code = code, method = "add"; "Added fx data for code {}", code);
        Ok(AddOutcome::Added)
    }

    /// Append observations newer than the current history
    pub fn update(
        &mut self,
        code: &str,
        new_prices: &PriceSeries,
        check_for_spike: bool,
    ) -> Result<UpdateOutcome> {
        if !self.is_storable(code, "update") {
            return Ok(UpdateOutcome::NotReferenceQuoted);
        }

        let old_prices = self.get(code)?;
        let outcome = UpdateMerger::new(self.spike_detector.as_ref()).merge(
            &old_prices,
            new_prices,
            check_for_spike,
        );

        let merged = match outcome {
            MergeOutcome::Merged(merged) => merged,
            MergeOutcome::SpikeDetected => {
                log::warn!(
                    fx_code = code, method = "update";
                    "Spike detected in new prices for {}, nothing written",
                    code
                );
                return Ok(UpdateOutcome::SpikeRejected);
            }
        };

        let rows_added = merged.len() - old_prices.len();
        if rows_added == 0 {
            match old_prices.last_timestamp() {
                None => log::debug!(
                    fx_code = code, method = "update";
                    "No new or old prices for {}",
                    code
                ),
                Some(last) => log::debug!(
                    fx_code = code, method = "update";
                    "No additional data since {} for {}",
                    last,
                    code
                ),
            }
            return Ok(UpdateOutcome::RowsAdded(0));
        }

        self.add(code, &merged, true)?;
        log::debug!(
            fx_code = code, method = "update";
            "Added {} additional rows for {}",
            rows_added,
            code
        );

        Ok(UpdateOutcome::RowsAdded(rows_added))
    }

    /// Erase the stored series for `code`; requires `confirmed`
    pub fn delete(&mut self, code: &str, confirmed: bool) -> Result<DeleteOutcome> {
        if !confirmed {
            log::warn!(
                fx_code = code, method = "delete";
                "You need to call delete with confirmation to remove {}",
                code
            );
            return Ok(DeleteOutcome::NotConfirmed);
        }

        if !self.exists(code)? {
            log::warn!(
                fx_code = code, method = "delete";
                "Tried to delete non existent fx prices for {}",
                code
            );
            return Ok(DeleteOutcome::NotFound);
        }

        self.store.erase(code)?;
        log::info!(fx_code = code, method = "delete"; "Deleted fx price data for {}", code);
        Ok(DeleteOutcome::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::codec::CurrencyCode;
    use crate::fx::in_memory::InMemorySeriesStore;
    use crate::fx::spike::NeverSpike;
    use chrono::{DateTime, TimeZone, Utc};

    struct AlwaysSpike;

    impl SpikeDetector for AlwaysSpike {
        fn check(&self, _old: &PriceSeries, _new: &PriceSeries) -> bool {
            true
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, d, 0, 0, 0).unwrap()
    }

    fn series(points: &[(u32, f64)]) -> PriceSeries {
        PriceSeries::from_observations(points.iter().map(|(d, rate)| (day(*d), *rate))).unwrap()
    }

    fn repo() -> FxPriceRepository<InMemorySeriesStore> {
        let store =
            InMemorySeriesStore::new().with_series("EURUSD", series(&[(1, 1.10), (2, 1.12)]));
        FxPriceRepository::new(store)
    }

    #[test]
    fn test_add_refuses_duplicate() {
        let mut repo = repo();
        let replacement = series(&[(5, 2.0)]);

        assert_eq!(repo.add("EURUSD", &replacement, false).unwrap(), AddOutcome::Duplicate);
        assert_eq!(repo.get("EURUSD").unwrap(), series(&[(1, 1.10), (2, 1.12)]));

        assert_eq!(repo.add("EURUSD", &replacement, true).unwrap(), AddOutcome::Added);
        assert_eq!(repo.get("EURUSD").unwrap(), replacement);
    }

    #[test]
    fn test_update_appends() {
        let mut repo = repo();
        let new = series(&[(2, 1.12), (3, 1.15)]);

        assert_eq!(repo.update("EURUSD", &new, true).unwrap(), UpdateOutcome::RowsAdded(1));
        assert_eq!(repo.get("EURUSD").unwrap().len(), 3);

        assert_eq!(repo.update("EURUSD", &new, true).unwrap(), UpdateOutcome::RowsAdded(0));
    }

    #[test]
    fn test_update_creates_new_code() {
        let mut repo = repo();
        let new = series(&[(1, 1.30)]);

        assert_eq!(repo.update("GBPUSD", &new, true).unwrap(), UpdateOutcome::RowsAdded(1));
        assert!(repo.exists("GBPUSD").unwrap());
    }

    #[test]
    fn test_update_spike_not_persisted() {
        let mut repo = repo().with_spike_detector(AlwaysSpike);
        let new = series(&[(3, 1.15)]);

        assert_eq!(repo.update("EURUSD", &new, true).unwrap(), UpdateOutcome::SpikeRejected);
        assert_eq!(repo.get("EURUSD").unwrap().len(), 2);

        assert_eq!(repo.update("EURUSD", &new, false).unwrap(), UpdateOutcome::RowsAdded(1));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut repo = repo().with_spike_detector(NeverSpike);

        assert_eq!(repo.delete("EURUSD", false).unwrap(), DeleteOutcome::NotConfirmed);
        assert!(repo.exists("EURUSD").unwrap());

        assert_eq!(repo.delete("GBPUSD", true).unwrap(), DeleteOutcome::NotFound);

        assert_eq!(repo.delete("EURUSD", true).unwrap(), DeleteOutcome::Deleted);
        assert!(!repo.exists("EURUSD").unwrap());
        assert!(repo.get("EURUSD").unwrap().is_empty());
    }

    #[test]
    fn test_derived_codes_never_stored() {
        let mut repo = repo().with_spike_detector(NeverSpike);
        let new = series(&[(3, 0.85)]);

        for code in ["EURGBP", "USDEUR", "USDUSD", "GBPGBP", "garbage", "../EURUSD"] {
            assert_eq!(
                repo.add(code, &new, true).unwrap(),
                AddOutcome::NotReferenceQuoted,
                "{}",
                code
            );
            assert_eq!(
                repo.update(code, &new, true).unwrap(),
                UpdateOutcome::NotReferenceQuoted,
                "{}",
                code
            );
        }

        let codes: Vec<String> = repo.codes().unwrap().into_iter().collect();
        assert_eq!(codes, vec!["EURUSD"]);
        assert_eq!(repo.get("EURUSD").unwrap().len(), 2);
    }

    #[test]
    fn test_storable_codes_follow_reference_currency() {
        let config = FxConfig::default().with_reference_currency(CurrencyCode::EUR);
        let mut repo = FxPriceRepository::with_config(InMemorySeriesStore::new(), config);
        let new = series(&[(1, 0.9)]);

        assert_eq!(repo.add("EURUSD", &new, false).unwrap(), AddOutcome::NotReferenceQuoted);
        assert_eq!(repo.add("USDEUR", &new, false).unwrap(), AddOutcome::Added);
    }

    #[test]
    fn test_outcome_helpers() {
        assert_eq!(UpdateOutcome::RowsAdded(0).rows_added(), Some(0));
        assert_eq!(UpdateOutcome::SpikeRejected.rows_added(), None);
        assert_eq!(UpdateOutcome::NotReferenceQuoted.rows_added(), None);
    }
}
