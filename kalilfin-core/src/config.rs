//! Pipeline configuration, loaded from TOML.
//!
//! Every section and field is optional; missing values take the defaults
//! below. The provider API key can also come from the `FMP_API_KEY`
//! environment variable, which wins over the file.

use crate::domain::EcoScore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the Financial Modeling Prep API key.
pub const API_KEY_ENV: &str = "FMP_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
    pub forecast: ForecastConfig,
    /// Entries replacing or extending the built-in eco table.
    pub eco_scores: BTreeMap<String, EcoScore>,
}

/// Market-data provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub news_base_url: String,
    pub api_key: String,
    /// Hard per-request timeout.
    pub timeout_secs: u64,
    /// Fixed pause before each fetch.
    pub request_delay_ms: u64,
    /// Calendar days of history to request, ending today.
    pub lookback_days: u32,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://financialmodelingprep.com/api/v3".into(),
            news_base_url: "https://financialmodelingprep.com/api/v4".into(),
            api_key: String::new(),
            timeout_secs: 10,
            request_delay_ms: 1000,
            lookback_days: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 128 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub horizon_days: u32,
    /// Number of sin/cos pairs in the yearly seasonality term.
    pub fourier_order: usize,
    /// Ridge penalty on the seasonal coefficients.
    pub seasonality_penalty: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: 7,
            fourier_order: 10,
            seasonality_penalty: 1.0,
        }
    }
}

impl AppConfig {
    /// Load from a TOML file, apply the environment override, and validate.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML string. Does not consult the environment.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus the environment override.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Take the API key from `FMP_API_KEY` when it is set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.provider.api_key = key.trim().to_string();
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid("provider.timeout_secs must be > 0".into()));
        }
        if self.provider.lookback_days < 2 {
            return Err(ConfigError::Invalid(
                "provider.lookback_days must be >= 2".into(),
            ));
        }
        if self.cache.capacity == 0 {
            return Err(ConfigError::Invalid("cache.capacity must be > 0".into()));
        }
        if self.forecast.horizon_days == 0 {
            return Err(ConfigError::Invalid("forecast.horizon_days must be > 0".into()));
        }
        if !(self.forecast.seasonality_penalty > 0.0 && self.forecast.seasonality_penalty.is_finite())
        {
            return Err(ConfigError::Invalid(
                "forecast.seasonality_penalty must be a positive number".into(),
            ));
        }
        for (ticker, eco) in &self.eco_scores {
            if !eco.is_valid() {
                return Err(ConfigError::Invalid(format!(
                    "eco_scores.{ticker}: score must be 0-100 and carbon_kg >= 0"
                )));
            }
        }
        Ok(())
    }
}
