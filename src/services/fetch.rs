//! Timeout and retry policy applied to every provider call.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::models::evaluation::SymbolMetadata;
use crate::models::price::PriceSeries;
use crate::services::market_data::{Interval, MetadataProvider, PriceProvider};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchPolicy {
    /// Upper bound for a single price fetch attempt.
    pub timeout: Duration,
    pub metadata_timeout: Duration,
    /// Extra attempts after the first one, for retryable errors only.
    pub retry_attempts: usize,
    pub retry_min_delay: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            metadata_timeout: Duration::from_secs(5),
            retry_attempts: 2,
            retry_min_delay: Duration::from_millis(250),
        }
    }
}

impl FetchPolicy {
    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.retry_min_delay)
            .with_max_times(self.retry_attempts)
    }
}

async fn fetch_once(
    prices: &dyn PriceProvider,
    symbol: &str,
    lookback_days: u32,
    timeout: Duration,
) -> Result<PriceSeries, ProviderError> {
    tokio::time::timeout(timeout, prices.fetch(symbol, lookback_days, Interval::Daily))
        .await
        .map_err(|_| ProviderError::Timeout(timeout.as_millis() as u64))?
}

/// Fetches daily bars with a per-attempt timeout and exponential backoff.
pub async fn fetch_series(
    prices: &dyn PriceProvider,
    symbol: &str,
    lookback_days: u32,
    policy: &FetchPolicy,
) -> Result<PriceSeries, ProviderError> {
    (|| fetch_once(prices, symbol, lookback_days, policy.timeout))
        .retry(policy.backoff())
        .sleep(tokio::time::sleep)
        .when(|e: &ProviderError| e.is_retryable())
        .notify(|e: &ProviderError, delay: Duration| {
            debug!(
                symbol = %symbol,
                error = %e,
                delay_ms = delay.as_millis() as u64,
                "Fetch: retrying {} after error",
                symbol
            );
        })
        .await
}

/// Looks up metadata, degrading to unknown on any failure.
pub async fn lookup_metadata(
    metadata: &dyn MetadataProvider,
    symbol: &str,
    policy: &FetchPolicy,
) -> SymbolMetadata {
    match tokio::time::timeout(policy.metadata_timeout, metadata.lookup(symbol)).await {
        Ok(Ok(info)) => info,
        Ok(Err(e)) => {
            debug!(symbol = %symbol, error = %e, "Metadata lookup failed for {}", symbol);
            SymbolMetadata::unknown()
        }
        Err(_) => {
            warn!(symbol = %symbol, "Metadata lookup timed out for {}", symbol);
            SymbolMetadata::unknown()
        }
    }
}
