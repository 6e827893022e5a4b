//! Simple Moving Average (SMA).
//!
//! Mean of the trailing `period` closes.
//! Lookback: period - 1 (needs `period` closes).

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn latest(&self, closes: &[f64]) -> Option<f64> {
        if closes.len() < self.period {
            return None;
        }
        let window = &closes[closes.len() - self.period..];
        if window.iter().any(|c| !c.is_finite()) {
            return None;
        }
        Some(window.iter().sum::<f64>() / self.period as f64)
    }
}
