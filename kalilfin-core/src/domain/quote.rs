//! Quote: latest known values for one ticker.

use serde::{Deserialize, Serialize};

/// Real-time quote as reported by the market-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub name: String,
    pub price: f64,
    pub volume: u64,
}

impl Quote {
    pub fn new(name: impl Into<String>, price: f64, volume: u64) -> Self {
        Self {
            name: name.into(),
            price,
            volume,
        }
    }
}
