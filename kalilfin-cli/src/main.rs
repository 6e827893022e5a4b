//! Kalilfin CLI: per-ticker stock metrics from the terminal.
//!
//! Commands:
//! - `metrics`: assemble metrics for one or more tickers and print a table or JSON
//! - `export`: write the same metrics for a portfolio of tickers to CSV
//! - `news`: latest headlines for a ticker

mod export;
mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kalilfin_core::config::AppConfig;
use kalilfin_core::data::{FmpProvider, MarketDataProvider};
use kalilfin_core::domain::normalize_ticker;
use kalilfin_core::metrics::{MetricsAssembler, MetricsCache, MetricsError};
use kalilfin_core::StockMetrics;
use logging::LogFormat;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

type Cache = MetricsCache<MetricsAssembler<FmpProvider>>;

#[derive(Parser)]
#[command(
    name = "kalilfin",
    version,
    about = "Kalilfin CLI, stock metrics with indicators, forecast and eco score"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to <config dir>/kalilfin/config.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format (filter with RUST_LOG).
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble and print metrics for each ticker.
    Metrics {
        /// Ticker symbols (e.g., AAPL MSFT TSLA).
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Print JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write portfolio metrics to a CSV file.
    Export {
        /// Ticker symbols in the portfolio.
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Destination CSV file.
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Print the latest news headlines for a ticker.
    News {
        ticker: String,

        /// Number of headlines.
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format)?;

    let config = load_config(cli.config.as_deref())?;

    let all_ok = match cli.command {
        Commands::Metrics { tickers, json } => run_metrics(&config, &tickers, json)?,
        Commands::Export { tickers, output } => run_export(&config, &tickers, &output)?,
        Commands::News { ticker, limit } => run_news(&config, &ticker, limit)?,
    };

    if !all_ok {
        std::process::exit(1);
    }
    Ok(())
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kalilfin").join("config.toml"))
}

fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path().filter(|p| p.is_file()),
    };

    let config = match path {
        Some(p) => {
            info!(path = %p.display(), "loading config");
            AppConfig::from_file(&p)
                .with_context(|| format!("failed to load config from {}", p.display()))?
        }
        None => {
            let config = AppConfig::from_env();
            config.validate().context("invalid configuration")?;
            config
        }
    };

    if config.provider.api_key.is_empty() {
        warn!("no API key configured; set FMP_API_KEY or provider.api_key");
    }
    Ok(config)
}

fn build_provider(config: &AppConfig) -> Result<FmpProvider> {
    FmpProvider::new(&config.provider).context("failed to set up market data provider")
}

fn build_cache(config: &AppConfig) -> Result<Cache> {
    let assembler = MetricsAssembler::new(build_provider(config)?, config);
    Ok(MetricsCache::new(assembler, config.cache.capacity))
}

/// Assemble every ticker through one shared cache. Order follows the input.
fn collect_metrics(
    cache: &Cache,
    tickers: &[String],
) -> Vec<(String, Result<Arc<StockMetrics>, MetricsError>)> {
    tickers
        .par_iter()
        .map(|t| (t.clone(), cache.get_or_compute(t)))
        .collect()
}

/// Split results into successes, reporting each failure on stderr.
fn partition(
    results: Vec<(String, Result<Arc<StockMetrics>, MetricsError>)>,
) -> (Vec<Arc<StockMetrics>>, usize) {
    let mut ok = Vec::with_capacity(results.len());
    let mut failed = 0;
    for (ticker, result) in results {
        match result {
            Ok(m) => ok.push(m),
            Err(e) => {
                failed += 1;
                eprintln!("Invalid ticker: {ticker} ({e})");
            }
        }
    }
    (ok, failed)
}

fn run_metrics(config: &AppConfig, tickers: &[String], json: bool) -> Result<bool> {
    let cache = build_cache(config)?;
    let (rows, failed) = partition(collect_metrics(&cache, tickers));

    if json {
        println!("{}", export::export_json(&rows)?);
    } else if !rows.is_empty() {
        print!("{}", export::render_table(&rows));
    }

    let stats = cache.stats();
    info!(
        hits = stats.hits,
        misses = stats.misses,
        cached = stats.len,
        failed,
        "metrics done"
    );
    Ok(failed == 0)
}

fn run_export(config: &AppConfig, tickers: &[String], output: &Path) -> Result<bool> {
    let cache = build_cache(config)?;
    let (rows, failed) = partition(collect_metrics(&cache, tickers));

    export::save_portfolio_csv(&rows, output)?;
    println!("Exported {} tickers to {}", rows.len(), output.display());
    Ok(failed == 0)
}

fn run_news(config: &AppConfig, ticker: &str, limit: usize) -> Result<bool> {
    let symbol = match normalize_ticker(ticker) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid ticker: {ticker} ({e})");
            return Ok(false);
        }
    };

    let provider = build_provider(config)?;
    let items = provider
        .news(&symbol, limit)
        .with_context(|| format!("failed to fetch news for {symbol}"))?;

    if items.is_empty() {
        println!("No news for {symbol}");
        return Ok(true);
    }
    for item in &items {
        match &item.published {
            Some(when) => println!("{when}  {}", item.title),
            None => println!("{}", item.title),
        }
        println!("    {}", item.link);
    }
    Ok(true)
}
