//! Append-only merge of new observations into an existing series

use super::series::PriceSeries;
use super::spike::SpikeDetector;

/// Result of folding a batch into existing history
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// Merged series; equal to the old one when nothing was new
    Merged(PriceSeries),
    /// The spike detector rejected the batch
    SpikeDetected,
}

impl MergeOutcome {
    pub fn is_spike(&self) -> bool {
        matches!(self, MergeOutcome::SpikeDetected)
    }

    /// Number of rows added relative to `old`, `None` for a spike
    pub fn rows_added(&self, old: &PriceSeries) -> Option<usize> {
        match self {
            MergeOutcome::Merged(merged) => Some(merged.len().saturating_sub(old.len())),
            MergeOutcome::SpikeDetected => None,
        }
    }
}

/// Folds batches into history, never rewriting what is already there
pub struct UpdateMerger<'a> {
    detector: &'a dyn SpikeDetector,
}

impl<'a> UpdateMerger<'a> {
    pub fn new(detector: &'a dyn SpikeDetector) -> Self {
        Self { detector }
    }

    /// Append every row of `new` strictly after `old`'s last timestamp
    ///
    /// Rows at or before that timestamp are dropped, so resubmitting a batch
    /// is a no-op. The detector is only consulted when there is something to
    /// append and `check_for_spike` is set.
    pub fn merge(
        &self,
        old: &PriceSeries,
        new: &PriceSeries,
        check_for_spike: bool,
    ) -> MergeOutcome {
        let newer = match old.last_timestamp() {
            Some(last) => new.after(last),
            None => new.clone(),
        };

        if newer.is_empty() {
            return MergeOutcome::Merged(old.clone());
        }

        if check_for_spike && self.detector.check(old, new) {
            return MergeOutcome::SpikeDetected;
        }

        let mut merged = old.clone();
        merged.append(&newer);
        MergeOutcome::Merged(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn old() -> PriceSeries {
        PriceSeries::from_observations(vec![(day(1), 1.10), (day(2), 1.12)]).unwrap()
    }

    #[test]
    fn test_appends_only_newer_rows() {
        let merger = UpdateMerger::new(&NeverSpike);
        let new = PriceSeries::from_observations(vec![(day(2), 9.99), (day(3), 1.15)]).unwrap();

        let outcome = merger.merge(&old(), &new, true);
        assert_eq!(outcome.rows_added(&old()), Some(1));

        let MergeOutcome::Merged(merged) = outcome else {
            panic!("expected merged series");
        };
        assert_eq!(merged.get(day(2)), Some(1.12));
        assert_eq!(merged.get(day(3)), Some(1.15));
    }

    #[test]
    fn test_stale_batch_is_noop() {
        let merger = UpdateMerger::new(&AlwaysSpike);
        let new = PriceSeries::from_observations(vec![(day(1), 1.0)]).unwrap();

        let outcome = merger.merge(&old(), &new, true);
        assert_eq!(outcome, MergeOutcome::Merged(old()));
        assert_eq!(outcome.rows_added(&old()), Some(0));
    }

    #[test]
    fn test_empty_old_takes_everything() {
        let merger = UpdateMerger::new(&NeverSpike);
        let outcome = merger.merge(&PriceSeries::new(), &old(), true);

        assert_eq!(outcome, MergeOutcome::Merged(old()));
    }

    #[test]
    fn test_idempotent_resubmission() {
        let merger = UpdateMerger::new(&NeverSpike);
        let new = PriceSeries::from_observations(vec![(day(3), 1.15)]).unwrap();

        let MergeOutcome::Merged(once) = merger.merge(&old(), &new, true) else {
            panic!("expected merged series");
        };
        let twice = merger.merge(&once, &new, true);

        assert_eq!(twice.rows_added(&once), Some(0));
        assert_eq!(twice, MergeOutcome::Merged(once));
    }

    #[test]
    fn test_spike_detected() {
        let merger = UpdateMerger::new(&AlwaysSpike);
        let new = PriceSeries::from_observations(vec![(day(3), 1.15)]).unwrap();

        let outcome = merger.merge(&old(), &new, true);
        assert!(outcome.is_spike());
        assert_eq!(outcome.rows_added(&old()), None);
    }

    #[test]
    fn test_spike_check_disabled() {
        let merger = UpdateMerger::new(&AlwaysSpike);
        let new = PriceSeries::from_observations(vec![(day(3), 1.15)]).unwrap();

        assert_eq!(merger.merge(&old(), &new, false).rows_added(&old()), Some(1));
    }
}
