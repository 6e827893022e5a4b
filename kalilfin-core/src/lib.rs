//! Kalilfin Core: the stock metrics pipeline behind the dashboard.
//!
//! For a ticker symbol this crate:
//! - fetches the latest quote and a month of daily closes from a market-data
//!   provider (Financial Modeling Prep over HTTPS, or any `MarketDataProvider`)
//! - normalizes the history (ascending dates, one close per date)
//! - computes SMA20, a single-window RSI14 and the day-over-day change
//! - forecasts the close a week out with a trend + yearly seasonality model
//! - looks up a static eco score
//! - assembles an immutable `StockMetrics` record, memoized in a bounded LRU
//!   cache with at most one in-flight computation per ticker
//!
//! ```no_run
//! use kalilfin_core::config::AppConfig;
//! use kalilfin_core::data::FmpProvider;
//! use kalilfin_core::metrics::{MetricsAssembler, MetricsCache};
//!
//! let config = AppConfig::from_env();
//! let provider = FmpProvider::new(&config.provider)?;
//! let cache = MetricsCache::new(MetricsAssembler::new(provider, &config), config.cache.capacity);
//! let aapl = cache.get_or_compute("AAPL")?;
//! println!("{} {} {}", aapl.ticker, aapl.price, aapl.decision);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod data;
pub mod domain;
pub mod forecast;
pub mod indicators;
pub mod metrics;

pub use config::AppConfig;
pub use domain::{Decision, EcoScore, Forecast, HistorySeries, Indicators, PriceSample, Quote, StockMetrics};
pub use metrics::{MetricsAssembler, MetricsCache, MetricsError, MetricsSource};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything shared across request threads is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<StockMetrics>();
        require_sync::<StockMetrics>();
        require_send::<MetricsError>();
        require_sync::<MetricsError>();
        require_send::<data::FmpProvider>();
        require_sync::<data::FmpProvider>();
        require_send::<MetricsCache<MetricsAssembler<data::FmpProvider>>>();
        require_sync::<MetricsCache<MetricsAssembler<data::FmpProvider>>>();
    }
}
