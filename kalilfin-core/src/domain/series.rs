//! Price history: ordered daily closes for one ticker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One daily close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub date: NaiveDate,
    pub close: f64,
}

impl PriceSample {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Daily closes for one ticker, dates strictly increasing.
///
/// The invariant is established by the constructors; there is no way to push
/// an out-of-order sample afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistorySeries {
    samples: Vec<PriceSample>,
}

impl HistorySeries {
    /// Empty series.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sort by date and collapse duplicate dates.
    ///
    /// When a date appears more than once, the sample received last wins.
    /// Applying this to an already-normalized series returns it unchanged.
    pub fn normalize(raw: impl IntoIterator<Item = PriceSample>) -> Self {
        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for sample in raw {
            by_date.insert(sample.date, sample.close);
        }
        Self {
            samples: by_date
                .into_iter()
                .map(|(date, close)| PriceSample { date, close })
                .collect(),
        }
    }

    /// Build from samples that are already strictly increasing by date.
    ///
    /// Returns `None` if any adjacent pair is out of order or shares a date.
    pub fn from_sorted(samples: Vec<PriceSample>) -> Option<Self> {
        if samples.windows(2).all(|w| w[0].date < w[1].date) {
            Some(Self { samples })
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[PriceSample] {
        &self.samples
    }

    /// All closes in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.close).collect()
    }

    /// The trailing `n` closes (fewer if the series is shorter).
    pub fn last_closes(&self, n: usize) -> Vec<f64> {
        let start = self.samples.len().saturating_sub(n);
        self.samples[start..].iter().map(|s| s.close).collect()
    }

    pub fn first(&self) -> Option<&PriceSample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&PriceSample> {
        self.samples.last()
    }
}

impl<'de> Deserialize<'de> for HistorySeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            samples: Vec<PriceSample>,
        }
        let raw = Raw::deserialize(deserializer)?;
        Ok(Self::normalize(raw.samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn normalize_sorts_out_of_order_dates() {
        let series = HistorySeries::normalize(vec![
            PriceSample::new(d(3), 103.0),
            PriceSample::new(d(1), 101.0),
            PriceSample::new(d(2), 102.0),
        ]);
        let dates: Vec<_> = series.samples().iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![d(1), d(2), d(3)]);
        assert_eq!(series.closes(), vec![101.0, 102.0, 103.0]);
    }

    #[test]
    fn normalize_keeps_latest_received_duplicate() {
        let series = HistorySeries::normalize(vec![
            PriceSample::new(d(1), 100.0),
            PriceSample::new(d(2), 50.0),
            PriceSample::new(d(2), 55.0),
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.last().unwrap().close, 55.0);
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = HistorySeries::normalize(vec![
            PriceSample::new(d(5), 1.0),
            PriceSample::new(d(4), 2.0),
            PriceSample::new(d(5), 3.0),
        ]);
        let twice = HistorySeries::normalize(once.samples().to_vec());
        assert_eq!(once, twice);
    }

    #[test]
    fn from_sorted_rejects_duplicates_and_disorder() {
        assert!(HistorySeries::from_sorted(vec![
            PriceSample::new(d(1), 1.0),
            PriceSample::new(d(1), 2.0),
        ])
        .is_none());
        assert!(HistorySeries::from_sorted(vec![
            PriceSample::new(d(2), 1.0),
            PriceSample::new(d(1), 2.0),
        ])
        .is_none());
        assert!(HistorySeries::from_sorted(vec![PriceSample::new(d(1), 1.0)]).is_some());
    }

    #[test]
    fn last_closes_truncates_from_front() {
        let series = HistorySeries::normalize((1..=5).map(|i| PriceSample::new(d(i), i as f64)));
        assert_eq!(series.last_closes(3), vec![3.0, 4.0, 5.0]);
        assert_eq!(series.last_closes(10).len(), 5);
        assert!(HistorySeries::empty().last_closes(3).is_empty());
    }

    #[test]
    fn deserialize_restores_invariant() {
        let json = r#"{"samples":[{"date":"2024-03-02","close":2.0},{"date":"2024-03-01","close":1.0}]}"#;
        let series: HistorySeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.closes(), vec![1.0, 2.0]);
    }
}
