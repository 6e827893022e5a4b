//! Technical indicators over a ticker's closing prices.
//!
//! Every indicator reduces the close series to its most recent value and
//! reports `None` while it lacks enough history. The engine never fails:
//! short or degenerate input degrades individual fields to `None`.

pub mod change;
pub mod rsi;
pub mod sma;

pub use change::DailyChange;
pub use rsi::Rsi;
pub use sma::Sma;

use crate::domain::{HistorySeries, Indicators};

/// Trait for indicators.
///
/// Indicators are pure: closes in (oldest first), latest value out.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of closes needed before the indicator produces a value, minus one.
    fn lookback(&self) -> usize;

    /// Value at the last close, or `None` if undefined for this input.
    fn latest(&self, closes: &[f64]) -> Option<f64>;
}

/// Computes the dashboard's indicator set from a history series.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    sma: Sma,
    rsi: Rsi,
    change: DailyChange,
}

impl IndicatorEngine {
    pub const SMA_PERIOD: usize = 20;
    pub const RSI_PERIOD: usize = 14;

    pub fn new() -> Self {
        Self {
            sma: Sma::new(Self::SMA_PERIOD),
            rsi: Rsi::new(Self::RSI_PERIOD),
            change: DailyChange::new(),
        }
    }

    pub fn compute(&self, series: &HistorySeries) -> Indicators {
        let closes = series.closes();
        Indicators {
            sma20: self.sma.latest(&closes),
            rsi14: self.rsi.latest(&closes),
            change_pct: self.change.latest(&closes),
        }
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceSample;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> HistorySeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        HistorySeries::normalize(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| PriceSample::new(base + chrono::Duration::days(i as i64), c)),
        )
    }

    #[test]
    fn empty_series_all_undefined() {
        let ind = IndicatorEngine::new().compute(&HistorySeries::empty());
        assert_eq!(ind, Indicators::default());
    }

    #[test]
    fn two_samples_only_change_defined() {
        let ind = IndicatorEngine::new().compute(&series(&[100.0, 110.0]));
        assert_eq!(ind.change_pct, Some(10.0));
        assert_eq!(ind.sma20, None);
        assert_eq!(ind.rsi14, None);
    }

    #[test]
    fn fifteen_samples_define_rsi_not_sma() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + (i % 3) as f64).collect();
        let ind = IndicatorEngine::new().compute(&series(&closes));
        assert!(ind.rsi14.is_some());
        assert_eq!(ind.sma20, None);
    }

    #[test]
    fn twenty_samples_define_everything() {
        let closes: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let ind = IndicatorEngine::new().compute(&series(&closes));
        assert_approx(ind.sma20.unwrap(), 10.5, DEFAULT_EPSILON);
        assert_eq!(ind.rsi14, Some(100.0));
        assert_eq!(ind.change_pct, Some(5.26));
    }
}
