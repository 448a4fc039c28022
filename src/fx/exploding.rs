//! Exploding series store - testing stub
//!
//! This store panics on any access. Use it to prove that a code path (identity
//! pairs, malformed codes) resolves without touching storage.

use super::base::SeriesStore;
use super::series::PriceSeries;
use crate::error::Result;
use std::collections::BTreeSet;

/// Exploding series store
///
/// # Example
/// ```should_panic
/// use rusty_fx::fx::{ExplodingSeriesStore, SeriesStore};
///
/// let store = ExplodingSeriesStore::new();
///
/// // This will panic!
/// store.read("EURUSD").unwrap();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplodingSeriesStore {
    message: Option<&'static str>,
}

impl ExplodingSeriesStore {
    pub fn new() -> Self {
        Self { message: None }
    }

    /// Create with custom panic message
    pub fn with_message(message: &'static str) -> Self {
        Self {
            message: Some(message),
        }
    }

    fn explode(&self, operation: &str) -> ! {
        panic!(
            "{}\n\nAttempted store operation: {}",
            self.message
                .unwrap_or("FX store access not allowed in this context."),
            operation
        );
    }
}

impl SeriesStore for ExplodingSeriesStore {
    fn list_codes(&self) -> Result<BTreeSet<String>> {
        self.explode("list_codes")
    }

    fn read(&self, code: &str) -> Result<PriceSeries> {
        self.explode(&format!("read {}", code))
    }

    fn write(&mut self, code: &str, _series: &PriceSeries) -> Result<()> {
        self.explode(&format!("write {}", code))
    }

    fn erase(&mut self, code: &str) -> Result<()> {
        self.explode(&format!("erase {}", code))
    }
}
