//! Domain types for the Kalilfin metrics pipeline

pub mod eco;
pub mod metrics;
pub mod quote;
pub mod series;
pub mod ticker;

pub use eco::{EcoScore, EcoTable};
pub use metrics::{Decision, Forecast, Indicators, StockMetrics};
pub use quote::Quote;
pub use series::{HistorySeries, PriceSample};
pub use ticker::{normalize_ticker, TickerError};
