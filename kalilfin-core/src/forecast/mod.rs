//! Short-horizon close forecast.
//!
//! The forecaster fits [`TrendSeasonalModel`] to the whole history and reads
//! the model off at `horizon_days` past the last observed date. Output is
//! deterministic for a given series and configuration.

pub mod linalg;
pub mod model;

pub use model::TrendSeasonalModel;

use crate::config::ForecastConfig;
use crate::domain::metrics::round2;
use crate::domain::{Forecast, HistorySeries};
use chrono::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("need at least {required} distinct dates to forecast, got {samples}")]
    InsufficientData { samples: usize, required: usize },

    #[error("forecast model could not be fitted: {0}")]
    Degenerate(String),
}

/// Fits the trend/seasonality model and projects a close.
#[derive(Debug, Clone)]
pub struct Forecaster {
    config: ForecastConfig,
}

impl Forecaster {
    pub const MIN_SAMPLES: usize = 2;

    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// Configured default horizon.
    pub fn horizon_days(&self) -> u32 {
        self.config.horizon_days
    }

    /// Predicted close `horizon_days` calendar days after the last sample,
    /// rounded to 2 decimals.
    pub fn predict(
        &self,
        series: &HistorySeries,
        horizon_days: u32,
    ) -> Result<Forecast, ForecastError> {
        if series.len() < Self::MIN_SAMPLES {
            return Err(ForecastError::InsufficientData {
                samples: series.len(),
                required: Self::MIN_SAMPLES,
            });
        }
        if series.samples().iter().any(|s| !s.close.is_finite()) {
            return Err(ForecastError::Degenerate("non-finite close in history".into()));
        }

        let model = TrendSeasonalModel::fit(
            series.samples(),
            self.config.fourier_order,
            self.config.seasonality_penalty,
        )
        .ok_or_else(|| ForecastError::Degenerate("normal equations are singular".into()))?;

        let last_date = match series.last() {
            Some(last) => last.date,
            None => {
                return Err(ForecastError::InsufficientData {
                    samples: 0,
                    required: Self::MIN_SAMPLES,
                })
            }
        };
        let target_date = last_date + Duration::days(i64::from(horizon_days));
        let predicted = model.predict(target_date);
        if !predicted.is_finite() {
            return Err(ForecastError::Degenerate(format!(
                "prediction for {target_date} is not finite"
            )));
        }

        Ok(Forecast {
            horizon_days,
            target_date,
            predicted_close: round2(predicted),
        })
    }

    /// [`predict`](Self::predict) at the configured horizon.
    pub fn forecast(&self, series: &HistorySeries) -> Result<Forecast, ForecastError> {
        self.predict(series, self.config.horizon_days)
    }
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new(ForecastConfig::default())
    }
}
