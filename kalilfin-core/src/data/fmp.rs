//! Financial Modeling Prep (FMP) data provider.
//!
//! Fetches quotes, daily closes and news from FMP's REST API over a blocking
//! HTTP client with a hard per-request timeout. No retries: a failed request
//! surfaces immediately as a [`DataError`].

use super::provider::{DataError, MarketDataProvider, NewsItem};
use crate::config::ProviderConfig;
use crate::domain::{PriceSample, Quote};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// `/quote/{symbol}` element.
#[derive(Debug, Deserialize)]
struct QuoteData {
    name: Option<String>,
    price: Option<f64>,
    volume: Option<f64>,
}

/// `/historical-price-full/{symbol}` body. Unknown symbols come back as `{}`.
#[derive(Debug, Deserialize)]
struct HistoricalResponse {
    historical: Option<Vec<HistoricalEntry>>,
}

#[derive(Debug, Deserialize)]
struct HistoricalEntry {
    date: Option<String>,
    close: Option<f64>,
}

/// `/stock_news` element.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsData {
    title: Option<String>,
    url: Option<String>,
    published_date: Option<String>,
    site: Option<String>,
}

/// FMP data provider.
pub struct FmpProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    news_base_url: String,
    api_key: String,
}

impl FmpProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("kalilfin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            news_base_url: config.news_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Execute one GET and decode the JSON body.
    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        symbol: &str,
    ) -> Result<T, DataError> {
        let mut params: Vec<(&str, String)> = query.to_vec();
        params.push(("apikey", self.api_key.clone()));

        let resp = self
            .client
            .get(url)
            .query(&params)
            .send()
            .map_err(|e| transport_error(symbol, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                symbol: symbol.to_string(),
            });
        }

        let body = resp.text().map_err(|e| transport_error(symbol, e))?;
        serde_json::from_str(&body).map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })
    }

    fn parse_quote(symbol: &str, quotes: Vec<QuoteData>) -> Result<Quote, DataError> {
        let data = quotes
            .into_iter()
            .next()
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;

        let price = data.price.ok_or_else(|| DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        })?;
        if !price.is_finite() || price < 0.0 {
            return Err(DataError::ResponseFormatChanged(format!(
                "quote price for {symbol} is {price}"
            )));
        }

        let volume = data
            .volume
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u64)
            .unwrap_or(0);

        Ok(Quote {
            name: data
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| symbol.to_string()),
            price,
            volume,
        })
    }

    fn parse_history(
        symbol: &str,
        resp: HistoricalResponse,
    ) -> Result<Vec<PriceSample>, DataError> {
        let entries = resp
            .historical
            .filter(|h| !h.is_empty())
            .ok_or_else(|| DataError::NoHistory {
                symbol: symbol.to_string(),
                reason: "provider returned no historical prices".into(),
            })?;

        let mut samples = Vec::with_capacity(entries.len());
        for entry in entries {
            let close = entry.close.ok_or_else(|| DataError::NoHistory {
                symbol: symbol.to_string(),
                reason: "historical entry is missing the close price".into(),
            })?;
            let raw_date = entry.date.ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("historical entry for {symbol} has no date"))
            })?;
            // Dates are "YYYY-MM-DD", occasionally with a time suffix.
            let date = raw_date
                .get(..10)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!(
                        "invalid historical date for {symbol}: {raw_date}"
                    ))
                })?;
            samples.push(PriceSample { date, close });
        }

        Ok(samples)
    }
}

fn transport_error(symbol: &str, e: reqwest::Error) -> DataError {
    if e.is_timeout() {
        DataError::Timeout(format!("{symbol}: {e}"))
    } else {
        DataError::NetworkUnreachable(format!("{symbol}: {e}"))
    }
}

impl MarketDataProvider for FmpProvider {
    fn name(&self) -> &str {
        "financial_modeling_prep"
    }

    fn quote(&self, symbol: &str) -> Result<Quote, DataError> {
        let url = format!("{}/quote/{symbol}", self.base_url);
        let quotes: Vec<QuoteData> = self.get_json(&url, &[], symbol)?;
        Self::parse_quote(symbol, quotes)
    }

    fn history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceSample>, DataError> {
        let url = format!("{}/historical-price-full/{symbol}", self.base_url);
        let query = [
            ("from", start.format("%Y-%m-%d").to_string()),
            ("to", end.format("%Y-%m-%d").to_string()),
        ];
        let resp: HistoricalResponse = self.get_json(&url, &query, symbol)?;
        Self::parse_history(symbol, resp)
    }

    fn news(&self, symbol: &str, limit: usize) -> Result<Vec<NewsItem>, DataError> {
        let url = format!("{}/stock_news", self.news_base_url);
        let query = [("tickers", symbol.to_string()), ("limit", limit.to_string())];
        let items: Vec<NewsData> = self.get_json(&url, &query, symbol)?;
        Ok(items
            .into_iter()
            .filter_map(|item| {
                Some(NewsItem {
                    title: item.title?,
                    link: item.url?,
                    published: item.published_date,
                    site: item.site,
                })
            })
            .take(limit)
            .collect())
    }
}
