//! Derive a rate series for any pair from reference-quoted series
//!
//! Only `XXX` vs reference series are stored. Everything else is derived:
//!
//! - `XXXXXX`: identity, 1.0 on every business day
//! - `XXXREF`: the stored series
//! - `REFXXX`: reciprocal of the stored `XXXREF`
//! - `XXXYYY`: cross of `XXXREF` and `YYYREF`, forward-filled on the union of
//!   their timestamps

use super::base::SeriesStore;
use super::codec::{decode, encode, CurrencyCode};
use super::config::FxConfig;
use super::series::PriceSeries;
use crate::error::Result;
use std::collections::BTreeSet;

/// Resolves pair codes against a [`SeriesStore`]
pub struct RateResolver<'a, S: SeriesStore + ?Sized> {
    store: &'a S,
    config: &'a FxConfig,
}

impl<'a, S: SeriesStore + ?Sized> RateResolver<'a, S> {
    pub fn new(store: &'a S, config: &'a FxConfig) -> Self {
        Self { store, config }
    }

    /// Historical series for `fx_code`, e.g. `EURGBP`
    ///
    /// Data problems never fail: a malformed code yields the identity series
    /// and a missing leg yields an empty series. Errors come from the store only.
    pub fn resolve(&self, fx_code: &str) -> Result<PriceSeries> {
        let pair = match decode(fx_code) {
            Ok(pair) => pair,
            Err(e) => {
                log::warn!(
                    fx_code = fx_code, method = "get";
                    "Currency can't be located for {} ({}), using identity rates",
                    fx_code,
                    e
                );
                return Ok(self.config.identity_series());
            }
        };

        let reference = self.config.reference_currency;
        if pair.is_identity() {
            Ok(self.config.identity_series())
        } else if pair.quote == reference {
            self.vs_reference(pair.base)
        } else if pair.base == reference {
            self.inverted(pair.quote)
        } else {
            self.cross(pair.base, pair.quote)
        }
    }

    fn inverted(&self, currency: CurrencyCode) -> Result<PriceSeries> {
        let raw = self.vs_reference(currency)?;
        if raw.is_empty() {
            let reference = self.config.reference_currency;
            log::warn!(
                fx_code = encode(reference, currency).as_str(), method = "get";
                "Data for {} is missing, needed to calculate {}",
                encode(currency, reference),
                encode(reference, currency)
            );
            return Ok(raw);
        }
        Ok(raw.reciprocal())
    }

    fn cross(&self, base: CurrencyCode, quote: CurrencyCode) -> Result<PriceSeries> {
        let base_vs_ref = self.vs_reference(base)?;
        let quote_vs_ref = self.vs_reference(quote)?;

        if base_vs_ref.is_empty() || quote_vs_ref.is_empty() {
            return Ok(PriceSeries::new());
        }

        Ok(cross_rates(&base_vs_ref, &quote_vs_ref))
    }

    /// Stored series for `currency` vs the reference currency, or empty
    pub fn vs_reference(&self, currency: CurrencyCode) -> Result<PriceSeries> {
        let code = encode(currency, self.config.reference_currency);
        if !self.store.list_codes()?.contains(&code) {
            log::warn!(
                fx_code = code.as_str(), method = "get";
                "Currency {} is missing from list of FX data",
                code
            );
            return Ok(PriceSeries::new());
        }
        self.store.read(&code)
    }
}

/// `base / quote` on the union of both timestamp sets
///
/// Each leg is forward-filled independently. Timestamps before either leg's
/// first observation have no rate and are left out.
pub fn cross_rates(base: &PriceSeries, quote: &PriceSeries) -> PriceSeries {
    let index: BTreeSet<_> = base.timestamps().chain(quote.timestamps()).collect();

    let mut base_iter = base.iter().peekable();
    let mut quote_iter = quote.iter().peekable();
    let mut base_fill = None;
    let mut quote_fill = None;

    index
        .into_iter()
        .filter_map(|dt| {
            while let Some((_, rate)) = base_iter.next_if(|(t, _)| *t <= dt) {
                base_fill = Some(rate);
            }
            while let Some((_, rate)) = quote_iter.next_if(|(t, _)| *t <= dt) {
                quote_fill = Some(rate);
            }
            Some((dt, base_fill? / quote_fill?))
        })
        .collect()
}
