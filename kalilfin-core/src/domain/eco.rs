//! Eco score: static sustainability rating per ticker.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sustainability rating and estimated carbon output for a company.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EcoScore {
    /// 0 (worst) to 100 (best).
    pub score: u8,
    /// Estimated carbon output in kilograms.
    pub carbon_kg: f64,
}

impl EcoScore {
    /// Score used for tickers missing from the table.
    pub const DEFAULT: EcoScore = EcoScore {
        score: 50,
        carbon_kg: 5000.0,
    };

    pub fn is_valid(&self) -> bool {
        self.score <= 100 && self.carbon_kg >= 0.0 && self.carbon_kg.is_finite()
    }
}

impl Default for EcoScore {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Read-only lookup table of eco scores keyed by ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct EcoTable {
    entries: BTreeMap<String, EcoScore>,
}

impl EcoTable {
    /// Table with no entries; every lookup yields the default.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The built-in table, with `overrides` replacing or extending it.
    pub fn with_overrides(overrides: &BTreeMap<String, EcoScore>) -> Self {
        let mut table = Self::default();
        for (ticker, score) in overrides {
            table
                .entries
                .insert(ticker.trim().to_ascii_uppercase(), *score);
        }
        table
    }

    /// Score for `ticker`, or [`EcoScore::DEFAULT`] when unknown.
    pub fn lookup(&self, ticker: &str) -> EcoScore {
        self.entries.get(ticker).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EcoTable {
    fn default() -> Self {
        let entries = [
            ("AAPL", 75, 4500.0),
            ("MSFT", 80, 3800.0),
            ("TSLA", 95, 2000.0),
        ]
        .into_iter()
        .map(|(t, score, carbon_kg)| (t.to_string(), EcoScore { score, carbon_kg }))
        .collect();
        Self { entries }
    }
}
