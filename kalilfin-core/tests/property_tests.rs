//! Property tests for indicators, series normalization and the forecaster.

use chrono::{Duration, NaiveDate};
use kalilfin_core::domain::{HistorySeries, PriceSample};
use kalilfin_core::forecast::Forecaster;
use kalilfin_core::indicators::{Indicator, Rsi, Sma};
use proptest::prelude::*;

fn closes_strategy(min: usize, max: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..1000.0, min..max)
}

fn samples_strategy() -> impl Strategy<Value = Vec<PriceSample>> {
    prop::collection::vec((0i64..120, 1.0f64..500.0), 0..60).prop_map(|raw| {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        raw.into_iter()
            .map(|(offset, close)| PriceSample::new(base + Duration::days(offset), close))
            .collect()
    })
}

proptest! {
    #[test]
    fn sma_is_mean_of_last_twenty(closes in closes_strategy(20, 80)) {
        let expected = closes[closes.len() - 20..].iter().sum::<f64>() / 20.0;
        let sma = Sma::new(20).latest(&closes).unwrap();
        prop_assert!((sma - expected).abs() < 1e-9);
    }

    #[test]
    fn sma_undefined_below_period(closes in closes_strategy(0, 20)) {
        prop_assert!(Sma::new(20).latest(&closes).is_none());
    }

    #[test]
    fn rsi_is_bounded(closes in closes_strategy(15, 80)) {
        let rsi = Rsi::new(14).latest(&closes).unwrap();
        prop_assert!((0.0..=100.0).contains(&rsi), "rsi out of range: {}", rsi);
    }

    #[test]
    fn rsi_is_100_without_losses(start in 1.0f64..100.0, steps in prop::collection::vec(0.0f64..5.0, 14..40)) {
        let mut closes = vec![start];
        for step in steps {
            let next = closes[closes.len() - 1] + step;
            closes.push(next);
        }
        prop_assert_eq!(Rsi::new(14).latest(&closes), Some(100.0));
    }

    #[test]
    fn normalize_sorts_and_dedups(raw in samples_strategy()) {
        let series = HistorySeries::normalize(raw.clone());
        let dates: Vec<_> = series.samples().iter().map(|s| s.date).collect();
        prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));

        let mut distinct: Vec<_> = raw.iter().map(|s| s.date).collect();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(series.len(), distinct.len());
    }

    #[test]
    fn normalize_is_idempotent(raw in samples_strategy()) {
        let once = HistorySeries::normalize(raw);
        let twice = HistorySeries::normalize(once.samples().to_vec());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn forecast_is_deterministic(raw in samples_strategy()) {
        let series = HistorySeries::normalize(raw);
        let forecaster = Forecaster::default();
        let a = forecaster.forecast(&series);
        let b = forecaster.forecast(&series);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn forecast_lands_past_last_sample(raw in samples_strategy()) {
        let series = HistorySeries::normalize(raw);
        if let (Some(last), Ok(f)) = (series.last(), Forecaster::default().forecast(&series)) {
            prop_assert_eq!(f.target_date, last.date + Duration::days(7));
            prop_assert!(f.predicted_close.is_finite());
        }
    }
}
