//! Market-data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over data sources so the pipeline
//! can be driven by the live FMP API or by a scripted provider in tests.

use crate::domain::{PriceSample, Quote, TickerError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Structured error types for data operations.
///
/// Each variant belongs to one of two classes: "not found" (the symbol or its
/// history does not exist, fixing it needs different input) and "upstream"
/// (the provider or the network misbehaved, a later retry may succeed).
#[derive(Debug, Error)]
pub enum DataError {
    #[error("invalid ticker: {0}")]
    InvalidTicker(#[from] TickerError),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no historical data for {symbol}: {reason}")]
    NoHistory { symbol: String, reason: String },

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} from provider for {symbol}")]
    HttpStatus { status: u16, symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),
}

impl DataError {
    /// True for errors caused by the symbol itself rather than the transport.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DataError::InvalidTicker(_)
                | DataError::SymbolNotFound { .. }
                | DataError::NoHistory { .. }
        )
    }
}

/// One news headline for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub published: Option<String>,
    pub site: Option<String>,
}

/// Trait for market-data providers.
///
/// Implementations handle the specifics of one source. Throttling, input
/// normalization and series validation live in [`HistoryFetcher`] above this
/// trait, so providers stay thin.
///
/// [`HistoryFetcher`]: super::fetcher::HistoryFetcher
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Latest quote for `symbol`.
    fn quote(&self, symbol: &str) -> Result<Quote, DataError>;

    /// Daily closes between `start` and `end` inclusive, in whatever order the
    /// source returns them.
    fn history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceSample>, DataError>;

    /// Up to `limit` recent news items about `symbol`.
    fn news(&self, symbol: &str, limit: usize) -> Result<Vec<NewsItem>, DataError>;
}

impl<P: MarketDataProvider + ?Sized> MarketDataProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn quote(&self, symbol: &str) -> Result<Quote, DataError> {
        (**self).quote(symbol)
    }

    fn history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceSample>, DataError> {
        (**self).history(symbol, start, end)
    }

    fn news(&self, symbol: &str, limit: usize) -> Result<Vec<NewsItem>, DataError> {
        (**self).news(symbol, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classification() {
        assert!(DataError::SymbolNotFound { symbol: "X".into() }.is_not_found());
        assert!(DataError::NoHistory {
            symbol: "X".into(),
            reason: "empty".into()
        }
        .is_not_found());
        assert!(DataError::InvalidTicker(TickerError::Empty).is_not_found());
        assert!(!DataError::Timeout("10s".into()).is_not_found());
        assert!(!DataError::HttpStatus {
            status: 503,
            symbol: "X".into()
        }
        .is_not_found());
        assert!(!DataError::ResponseFormatChanged("not json".into()).is_not_found());
    }
}
