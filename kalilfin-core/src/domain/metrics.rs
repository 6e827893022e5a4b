//! Assembled per-ticker metrics and the values that feed them.

use super::eco::EcoScore;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trading call derived from price vs SMA20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Buy,
    Sell,
    Hold,
}

impl Decision {
    /// Buy below the moving average, Sell above it, Hold on equality.
    ///
    /// An undefined SMA is treated like the equal case.
    pub fn from_price(price: f64, sma20: Option<f64>) -> Self {
        match sma20 {
            Some(sma) if price < sma => Decision::Buy,
            Some(sma) if price > sma => Decision::Sell,
            _ => Decision::Hold,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Buy => "Buy",
            Decision::Sell => "Sell",
            Decision::Hold => "Hold",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Technical indicators over a history series. `None` means "undefined".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    pub sma20: Option<f64>,
    pub rsi14: Option<f64>,
    pub change_pct: Option<f64>,
}

/// Projected close at a fixed number of calendar days past the last sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub horizon_days: u32,
    pub target_date: NaiveDate,
    pub predicted_close: f64,
}

/// Everything the dashboard shows for one ticker.
///
/// Produced once per cache miss and shared immutably afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMetrics {
    pub ticker: String,
    pub name: String,
    pub price: f64,
    pub sma20: Option<f64>,
    pub rsi14: Option<f64>,
    pub change_pct: Option<f64>,
    pub volume: u64,
    pub decision: Decision,
    /// Last 30 closes, oldest first.
    pub chart_series: Vec<f64>,
    pub forecast: Forecast,
    pub eco_score: EcoScore,
    pub fetched_at: DateTime<Utc>,
}

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
