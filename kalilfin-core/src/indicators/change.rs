//! Day-over-day change in percent.
//!
//! change = (close[t] - close[t-1]) / close[t-1] * 100, rounded to 2 decimals.
//! Lookback: 1.

use super::Indicator;
use crate::domain::metrics::round2;

#[derive(Debug, Clone, Default)]
pub struct DailyChange;

impl DailyChange {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for DailyChange {
    fn name(&self) -> &str {
        "change_pct"
    }

    fn lookback(&self) -> usize {
        1
    }

    fn latest(&self, closes: &[f64]) -> Option<f64> {
        let [.., prev, last] = closes else {
            return None;
        };
        if *prev == 0.0 || !prev.is_finite() || !last.is_finite() {
            return None;
        }
        Some(round2((last - prev) / prev * 100.0))
    }
}
