//! Metrics assembler: fetch, indicators, forecast and eco score in one record.

use super::error::MetricsError;
use crate::config::AppConfig;
use crate::data::{HistoryFetcher, MarketDataProvider};
use crate::domain::metrics::round2;
use crate::domain::{normalize_ticker, Decision, EcoTable, StockMetrics};
use crate::forecast::Forecaster;
use crate::indicators::IndicatorEngine;
use chrono::Utc;
use tracing::{error, info, info_span};

/// Number of trailing closes kept for the price chart.
pub const CHART_POINTS: usize = 30;

/// Anything that can produce a fresh metrics record for a ticker.
///
/// The result cache is generic over this so it can be exercised without a
/// network-backed assembler.
pub trait MetricsSource: Send + Sync {
    fn assemble(&self, ticker: &str) -> Result<StockMetrics, MetricsError>;
}

/// Runs the full pipeline for one ticker on every call. No caching here.
pub struct MetricsAssembler<P> {
    fetcher: HistoryFetcher<P>,
    indicators: IndicatorEngine,
    forecaster: Forecaster,
    eco: EcoTable,
}

impl<P: MarketDataProvider> MetricsAssembler<P> {
    pub fn new(provider: P, config: &AppConfig) -> Self {
        Self::from_parts(
            HistoryFetcher::new(provider, &config.provider),
            Forecaster::new(config.forecast.clone()),
            EcoTable::with_overrides(&config.eco_scores),
        )
    }

    pub fn from_parts(fetcher: HistoryFetcher<P>, forecaster: Forecaster, eco: EcoTable) -> Self {
        Self {
            fetcher,
            indicators: IndicatorEngine::new(),
            forecaster,
            eco,
        }
    }

    pub fn fetcher(&self) -> &HistoryFetcher<P> {
        &self.fetcher
    }

    pub fn eco_table(&self) -> &EcoTable {
        &self.eco
    }

    fn run(&self, ticker: &str) -> Result<StockMetrics, MetricsError> {
        let (quote, series) = self
            .fetcher
            .fetch(ticker)
            .map_err(|e| MetricsError::from_data(ticker, e))?;

        let indicators = self.indicators.compute(&series);
        let forecast = self
            .forecaster
            .forecast(&series)
            .map_err(|e| MetricsError::from_forecast(ticker, e))?;

        Ok(StockMetrics {
            ticker: ticker.to_string(),
            name: quote.name,
            price: round2(quote.price),
            sma20: indicators.sma20.map(round2),
            rsi14: indicators.rsi14.map(round2),
            change_pct: indicators.change_pct,
            volume: quote.volume,
            decision: Decision::from_price(quote.price, indicators.sma20),
            chart_series: series.last_closes(CHART_POINTS),
            forecast,
            eco_score: self.eco.lookup(ticker),
            fetched_at: Utc::now(),
        })
    }
}

impl<P: MarketDataProvider> MetricsSource for MetricsAssembler<P> {
    fn assemble(&self, ticker: &str) -> Result<StockMetrics, MetricsError> {
        let ticker = normalize_ticker(ticker).map_err(|e| MetricsError::NotFound {
            ticker: ticker.trim().to_string(),
            reason: e.to_string(),
        })?;

        let span = info_span!("assemble", ticker = %ticker);
        let _enter = span.enter();

        match self.run(&ticker) {
            Ok(metrics) => {
                info!(
                    decision = %metrics.decision,
                    samples = metrics.chart_series.len(),
                    "metrics assembled"
                );
                Ok(metrics)
            }
            Err(e) => {
                error!(error = %e, "failed to assemble metrics");
                Err(e)
            }
        }
    }
}
