//! Spike detection for incoming price batches

use super::config::SpikeConfig;
use super::series::PriceSeries;
use statrs::statistics::Statistics;

/// Decides whether a batch of new observations is anomalous
pub trait SpikeDetector {
    /// True if `new` contains a spike relative to the history in `old`
    fn check(&self, old: &PriceSeries, new: &PriceSeries) -> bool;
}

/// Detector that accepts every batch
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverSpike;

impl SpikeDetector for NeverSpike {
    fn check(&self, _old: &PriceSeries, _new: &PriceSeries) -> bool {
        false
    }
}

/// Flags a batch when any new move is too large relative to past moves
///
/// The yardstick is the mean absolute day-on-day change of `old`. Each change
/// introduced by the rows of `new` after `old`'s last timestamp, including the
/// jump from the last stored price to the first new one, is divided by that
/// yardstick and compared against `max_spike`.
#[derive(Debug, Clone, Copy)]
pub struct VolNormalisedSpikeDetector {
    config: SpikeConfig,
}

impl VolNormalisedSpikeDetector {
    pub fn new(config: SpikeConfig) -> Self {
        Self { config }
    }

    /// Largest new move in units of the average historic move
    ///
    /// `None` when there is too little history or nothing new to judge.
    pub fn largest_normalised_move(&self, old: &PriceSeries, new: &PriceSeries) -> Option<f64> {
        let (last_dt, last_rate) = old.last()?;

        let historic_moves: Vec<f64> = old
            .rates()
            .collect::<Vec<_>>()
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).abs())
            .collect();
        if historic_moves.len() < self.config.min_history.max(1) {
            return None;
        }

        let average_move = historic_moves.iter().mean();
        if !(average_move.is_finite() && average_move > 0.0) {
            return None;
        }

        let mut previous = last_rate;
        new.after(last_dt)
            .rates()
            .map(|rate| {
                let step = (rate - previous).abs() / average_move;
                previous = rate;
                step
            })
            .reduce(f64::max)
    }
}

impl Default for VolNormalisedSpikeDetector {
    fn default() -> Self {
        Self::new(SpikeConfig::default())
    }
}

impl SpikeDetector for VolNormalisedSpikeDetector {
    fn check(&self, old: &PriceSeries, new: &PriceSeries) -> bool {
        match self.largest_normalised_move(old, new) {
            Some(size) if size > self.config.max_spike => {
                log::warn!(
                    method = "spike_check";
                    "Price move of {:.1} average moves exceeds limit of {}",
                    size,
                    self.config.max_spike
                );
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn series(start_day: i64, rates: &[f64]) -> PriceSeries {
        let origin = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        PriceSeries::from_observations(
            rates
                .iter()
                .enumerate()
                .map(|(i, rate)| (origin + Duration::days(start_day + i as i64), *rate)),
        )
        .unwrap()
    }

    fn zigzag(n: usize) -> Vec<f64> {
        (0..n).map(|i| if i % 2 == 0 { 1.00 } else { 1.01 }).collect()
    }

    #[test]
    fn test_never_spike() {
        assert!(!NeverSpike.check(&series(0, &[1.0]), &series(1, &[100.0])));
    }

    #[test]
    fn test_normal_move_accepted() {
        let detector = VolNormalisedSpikeDetector::default();
        let old = series(0, &zigzag(20));
        let new = series(20, &[1.02, 1.03]);

        assert!(!detector.check(&old, &new));
    }

    #[test]
    fn test_large_jump_flagged() {
        let detector = VolNormalisedSpikeDetector::default();
        let old = series(0, &zigzag(20));
        let new = series(20, &[1.50]);

        let size = detector.largest_normalised_move(&old, &new).unwrap();
        assert!(size > 40.0);
        assert!(detector.check(&old, &new));
    }

    #[test]
    fn test_spike_inside_batch_flagged() {
        let detector = VolNormalisedSpikeDetector::default();
        let old = series(0, &zigzag(20));
        let new = series(20, &[1.00, 1.01, 2.00, 1.01]);

        assert!(detector.check(&old, &new));
    }

    #[test]
    fn test_short_history_never_flags() {
        let detector = VolNormalisedSpikeDetector::default();
        let old = series(0, &zigzag(5));
        let new = series(5, &[10.0]);

        assert_eq!(detector.largest_normalised_move(&old, &new), None);
        assert!(!detector.check(&old, &new));
        assert!(!detector.check(&PriceSeries::new(), &new));
    }

    #[test]
    fn test_stale_rows_ignored() {
        let detector = VolNormalisedSpikeDetector::default();
        let old = series(0, &zigzag(20));
        // Only overlaps existing history
        let new = series(10, &[50.0]);

        assert!(!detector.check(&old, &new));
    }

    #[test]
    fn test_custom_threshold() {
        let detector = VolNormalisedSpikeDetector::new(SpikeConfig {
            max_spike: 1.5,
            min_history: 3,
        });
        let old = series(0, &zigzag(6));
        let new = series(6, &[1.03]);

        assert!(detector.check(&old, &new));
    }
}
