//! Relative Strength Index (RSI), single-window form.
//!
//! Takes the trailing `period` deltas (so `period + 1` closes), averages the
//! gains and the absolute losses over that one window, and returns
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! There is no Wilder smoothing: each value depends only on the last window.
//! Edge case: avg_loss == 0 → RSI = 100, including a completely flat window.
//! Lookback: period.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn latest(&self, closes: &[f64]) -> Option<f64> {
        if closes.len() < self.period + 1 {
            return None;
        }
        let window = &closes[closes.len() - (self.period + 1)..];

        let mut gains = 0.0;
        let mut losses = 0.0;
        for pair in window.windows(2) {
            let delta = pair[1] - pair[0];
            if !delta.is_finite() {
                return None;
            }
            if delta > 0.0 {
                gains += delta;
            } else {
                losses -= delta;
            }
        }

        let avg_gain = gains / self.period as f64;
        let avg_loss = losses / self.period as f64;
        Some(compute_rsi(avg_gain, avg_loss))
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
