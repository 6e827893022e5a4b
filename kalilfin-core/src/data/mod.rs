//! Market data acquisition: provider seam, FMP client, throttle, fetcher.

pub mod fetcher;
pub mod fmp;
pub mod provider;
pub mod throttle;

pub use fetcher::HistoryFetcher;
pub use fmp::FmpProvider;
pub use provider::{DataError, MarketDataProvider, NewsItem};
pub use throttle::Throttle;
