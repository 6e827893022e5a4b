//! Rendering assembled metrics for the terminal and for files.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use kalilfin_core::StockMetrics;

// ─── Terminal table ─────────────────────────────────────────────────

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// Fixed-width table, one row per ticker.
pub fn render_table(rows: &[Arc<StockMetrics>]) -> String {
    let mut out = format!(
        "{:<7} {:<22} {:>10} {:>10} {:>7} {:>8} {:>12} {:<5} {:>12} {:>4}\n",
        "Ticker", "Name", "Price", "SMA20", "RSI14", "Chg%", "Volume", "Call", "Forecast", "Eco"
    );
    out.push_str(&"-".repeat(107));
    out.push('\n');
    for m in rows {
        out.push_str(&format!(
            "{:<7} {:<22} {:>10.2} {:>10} {:>7} {:>8} {:>12} {:<5} {:>12.2} {:>4}\n",
            m.ticker,
            truncate(&m.name, 22),
            m.price,
            opt(m.sma20),
            opt(m.rsi14),
            opt(m.change_pct),
            m.volume,
            m.decision.as_str(),
            m.forecast.predicted_close,
            m.eco_score.score,
        ));
    }
    out
}

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(rows: &[Arc<StockMetrics>]) -> Result<String> {
    let plain: Vec<&StockMetrics> = rows.iter().map(Arc::as_ref).collect();
    serde_json::to_string_pretty(&plain).context("failed to serialize metrics to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Portfolio as CSV.
///
/// Columns: ticker, name, price, sma20, rsi14, change_pct, volume, decision,
/// forecast_date, forecast_close, eco_score, carbon_kg, chart_series.
/// Undefined indicators are empty cells; the chart series is `;`-joined.
pub fn export_portfolio_csv(rows: &[Arc<StockMetrics>]) -> Result<String> {
    if rows.is_empty() {
        bail!("portfolio is empty, nothing to export");
    }

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "ticker",
        "name",
        "price",
        "sma20",
        "rsi14",
        "change_pct",
        "volume",
        "decision",
        "forecast_date",
        "forecast_close",
        "eco_score",
        "carbon_kg",
        "chart_series",
    ])?;

    let cell = |v: Option<f64>| v.map(|v| format!("{v:.2}")).unwrap_or_default();
    for m in rows {
        let chart = m
            .chart_series
            .iter()
            .map(|c| format!("{c:.2}"))
            .collect::<Vec<_>>()
            .join(";");
        wtr.write_record([
            m.ticker.as_str(),
            m.name.as_str(),
            &format!("{:.2}", m.price),
            &cell(m.sma20),
            &cell(m.rsi14),
            &cell(m.change_pct),
            &m.volume.to_string(),
            m.decision.as_str(),
            &m.forecast.target_date.to_string(),
            &format!("{:.2}", m.forecast.predicted_close),
            &m.eco_score.score.to_string(),
            &format!("{:.1}", m.eco_score.carbon_kg),
            &chart,
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

pub fn save_portfolio_csv(rows: &[Arc<StockMetrics>], path: &Path) -> Result<()> {
    let csv = export_portfolio_csv(rows)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))
}
