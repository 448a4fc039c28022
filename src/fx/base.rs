//! Storage seam for directly quoted FX series

use super::series::PriceSeries;
use crate::error::Result;
use std::collections::BTreeSet;

/// Backend holding raw series quoted against the reference currency
///
/// Implementations own no derivation logic: codes are stored and returned
/// verbatim, and `read` does no validation beyond what the backend needs.
/// Serializing concurrent read-merge-write cycles is the backend's concern.
pub trait SeriesStore {
    /// All codes with a stored series
    fn list_codes(&self) -> Result<BTreeSet<String>>;

    /// Check if a code is stored
    fn has_code(&self, code: &str) -> Result<bool> {
        Ok(self.list_codes()?.contains(code))
    }

    /// Raw read; fails with `NonexistentEntry` for an absent code
    fn read(&self, code: &str) -> Result<PriceSeries>;

    /// Create or overwrite the series for `code`
    fn write(&mut self, code: &str, series: &PriceSeries) -> Result<()>;

    /// Remove the series for `code`
    fn erase(&mut self, code: &str) -> Result<()>;
}

impl<S: SeriesStore + ?Sized> SeriesStore for Box<S> {
    fn list_codes(&self) -> Result<BTreeSet<String>> {
        (**self).list_codes()
    }

    fn has_code(&self, code: &str) -> Result<bool> {
        (**self).has_code(code)
    }

    fn read(&self, code: &str) -> Result<PriceSeries> {
        (**self).read(code)
    }

    fn write(&mut self, code: &str, series: &PriceSeries) -> Result<()> {
        (**self).write(code, series)
    }

    fn erase(&mut self, code: &str) -> Result<()> {
        (**self).erase(code)
    }
}
