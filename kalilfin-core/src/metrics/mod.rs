//! Per-ticker metrics: assembly and result caching.

pub mod assembler;
pub mod cache;
pub mod error;

pub use assembler::{MetricsAssembler, MetricsSource, CHART_POINTS};
pub use cache::{CacheStats, MetricsCache};
pub use error::{ErrorKind, MetricsError};
