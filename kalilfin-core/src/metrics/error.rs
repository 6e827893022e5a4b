//! Ticker-tagged pipeline errors.

use crate::data::DataError;
use crate::forecast::ForecastError;
use serde::Serialize;
use thiserror::Error;

/// Why metrics could not be produced for a ticker.
///
/// Every variant names the ticker it concerns. Only [`Upstream`] is worth
/// retrying without changing the input.
///
/// [`Upstream`]: MetricsError::Upstream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    #[error("{ticker}: not found ({reason})")]
    NotFound { ticker: String, reason: String },

    #[error("{ticker}: upstream failure ({reason})")]
    Upstream { ticker: String, reason: String },

    #[error("{ticker}: insufficient data ({reason})")]
    InsufficientData { ticker: String, reason: String },
}

/// Error class without the payload, for callers that branch on cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    NotFound,
    Upstream,
    InsufficientData,
}

impl MetricsError {
    pub fn from_data(ticker: &str, err: DataError) -> Self {
        let ticker = ticker.to_string();
        let reason = err.to_string();
        if err.is_not_found() {
            MetricsError::NotFound { ticker, reason }
        } else {
            MetricsError::Upstream { ticker, reason }
        }
    }

    pub fn from_forecast(ticker: &str, err: ForecastError) -> Self {
        MetricsError::InsufficientData {
            ticker: ticker.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn ticker(&self) -> &str {
        match self {
            MetricsError::NotFound { ticker, .. }
            | MetricsError::Upstream { ticker, .. }
            | MetricsError::InsufficientData { ticker, .. } => ticker,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MetricsError::NotFound { .. } => ErrorKind::NotFound,
            MetricsError::Upstream { .. } => ErrorKind::Upstream,
            MetricsError::InsufficientData { .. } => ErrorKind::InsufficientData,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Upstream
    }
}
