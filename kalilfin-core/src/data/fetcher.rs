//! History fetcher: quote plus normalized daily closes for one ticker.

use super::provider::{DataError, MarketDataProvider};
use super::throttle::Throttle;
use crate::config::ProviderConfig;
use crate::domain::{normalize_ticker, HistorySeries, Quote};
use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, info, warn};

/// Wraps a provider with input validation, the request throttle and series
/// normalization.
pub struct HistoryFetcher<P> {
    provider: P,
    throttle: Throttle,
    lookback_days: u32,
    today: fn() -> NaiveDate,
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

impl<P: MarketDataProvider> HistoryFetcher<P> {
    pub fn new(provider: P, config: &ProviderConfig) -> Self {
        Self {
            provider,
            throttle: Throttle::new(config.request_delay()),
            lookback_days: config.lookback_days,
            today: utc_today,
        }
    }

    /// Replace the throttle (tests use [`Throttle::none`]).
    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    /// Replace the clock that anchors the lookback window.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// Fetch the latest quote and the lookback window of daily closes.
    ///
    /// The returned series is sorted ascending with one sample per date.
    pub fn fetch(&self, ticker: &str) -> Result<(Quote, HistorySeries), DataError> {
        let symbol = normalize_ticker(ticker)?;

        self.throttle.pause();
        info!(ticker = %symbol, provider = self.provider.name(), "fetching quote and history");

        let quote = self.provider.quote(&symbol)?;

        let end = (self.today)();
        let start = end - Duration::days(i64::from(self.lookback_days));
        let raw = self.provider.history(&symbol, start, end)?;

        if raw.is_empty() {
            return Err(DataError::NoHistory {
                symbol,
                reason: "provider returned no historical prices".into(),
            });
        }
        if let Some(bad) = raw.iter().find(|s| !s.close.is_finite()) {
            return Err(DataError::NoHistory {
                symbol,
                reason: format!("close on {} is not a number", bad.date),
            });
        }

        let received = raw.len();
        let series = HistorySeries::normalize(raw);
        if series.len() < received {
            warn!(
                ticker = %symbol,
                received,
                kept = series.len(),
                "dropped duplicate-dated samples from history"
            );
        }
        debug!(ticker = %symbol, samples = series.len(), %start, %end, "history normalized");

        Ok((quote, series))
    }
}
