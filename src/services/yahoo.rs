//! Yahoo Finance chart and quote-summary client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderError;
use crate::models::evaluation::SymbolMetadata;
use crate::models::price::{PriceBar, PriceSeries};
use crate::services::market_data::{Interval, MetadataProvider, PriceProvider};

const BASE_URL: &str = "https://query1.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; dipscan/0.1)";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryEnvelope {
    quote_summary: SummaryBody,
}

#[derive(Debug, Deserialize)]
struct SummaryBody {
    #[serde(default)]
    result: Option<Vec<SummaryResult>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(default)]
    asset_profile: Option<AssetProfile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    #[serde(default)]
    market_cap: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AssetProfile {
    #[serde(default)]
    sector: Option<String>,
}

pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    pub fn new() -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        Ok(Self::with_client(BASE_URL, client))
    }

    /// Points the client at another host, e.g. a mock server.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, String)],
        symbol: &str,
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        let status = response.status();
        debug!(symbol, %status, url, "Yahoo response");
        match status {
            StatusCode::NOT_FOUND => return Err(ProviderError::NotFound(symbol.to_string())),
            StatusCode::TOO_MANY_REQUESTS => return Err(ProviderError::RateLimited),
            s if s.is_server_error() => {
                return Err(ProviderError::Unavailable(format!("HTTP {}", s)))
            }
            s if !s.is_success() => {
                return Err(ProviderError::Malformed(format!("unexpected HTTP {}", s)))
            }
            _ => {}
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

fn api_error(error: ApiError, symbol: &str) -> ProviderError {
    if error.code.eq_ignore_ascii_case("Not Found") {
        ProviderError::NotFound(symbol.to_string())
    } else {
        ProviderError::Malformed(format!("{}: {}", error.code, error.description))
    }
}

/// Zips the column arrays into bars, skipping any row with a missing field or
/// a non-positive price. Rows on the same day as the previous bar replace it,
/// so a repeated live row keeps only its latest values.
fn bars_from_chart(result: ChartResult) -> Vec<PriceBar> {
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let column = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

    let mut bars: Vec<PriceBar> = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let row = DateTime::<Utc>::from_timestamp(*ts, 0).and_then(|timestamp| {
            Some(PriceBar::new(
                column(&quote.open, i)?,
                column(&quote.high, i)?,
                column(&quote.low, i)?,
                column(&quote.close, i)?,
                column(&quote.volume, i)?,
                timestamp,
            ))
        });
        let Some(bar) = row.filter(PriceBar::is_valid) else {
            continue;
        };

        match bars.last().map(|last| last.timestamp) {
            Some(previous) if previous.date_naive() == bar.timestamp.date_naive() => {
                bars.pop();
                bars.push(bar);
            }
            Some(previous) if bar.timestamp < previous => {
                debug!(timestamp = %bar.timestamp, "Yahoo: dropping out-of-order row");
            }
            _ => bars.push(bar),
        }
    }
    bars
}

#[async_trait]
impl PriceProvider for YahooFinanceClient {
    async fn fetch(
        &self,
        symbol: &str,
        lookback_days: u32,
        interval: Interval,
    ) -> Result<PriceSeries, ProviderError> {
        let end = Utc::now();
        let start = end - chrono::Duration::days(i64::from(lookback_days));
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let query = [
            ("period1", start.timestamp().to_string()),
            ("period2", end.timestamp().to_string()),
            ("interval", interval.as_str().to_string()),
        ];

        let envelope: ChartEnvelope = self.get_json(&url, &query, symbol).await?;
        if let Some(error) = envelope.chart.error {
            return Err(api_error(error, symbol));
        }
        let result = envelope
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| ProviderError::NotFound(symbol.to_string()))?;

        let bars = bars_from_chart(result);
        if bars.is_empty() {
            return Err(ProviderError::NotFound(symbol.to_string()));
        }
        Ok(PriceSeries::new(symbol, bars)?)
    }
}

#[async_trait]
impl MetadataProvider for YahooFinanceClient {
    async fn lookup(&self, symbol: &str) -> Result<SymbolMetadata, ProviderError> {
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, symbol);
        let query = [("modules", "price,assetProfile".to_string())];

        let envelope: SummaryEnvelope = self.get_json(&url, &query, symbol).await?;
        if let Some(error) = envelope.quote_summary.error {
            return Err(api_error(error, symbol));
        }
        let result = envelope
            .quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| ProviderError::NotFound(symbol.to_string()))?;

        Ok(SymbolMetadata {
            market_cap: result
                .price
                .and_then(|p| p.market_cap)
                .and_then(|m| m.raw),
            sector: result.asset_profile.and_then(|a| a.sector),
        })
    }
}
