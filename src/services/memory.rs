//! In-memory providers over frozen data.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::evaluation::SymbolMetadata;
use crate::models::price::PriceSeries;
use crate::services::market_data::{Interval, MetadataProvider, PriceProvider};

/// Serves pre-built series, trimmed to the requested lookback.
#[derive(Default)]
pub struct InMemoryPriceProvider {
    series: HashMap<String, PriceSeries>,
    failures: HashMap<String, ProviderError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl InMemoryPriceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.series.insert(series.symbol().to_string(), series);
        self
    }

    /// Every fetch of `symbol` fails with `error`.
    pub fn with_failure(mut self, symbol: &str, error: ProviderError) -> Self {
        self.failures.insert(symbol.to_string(), error);
        self
    }

    /// Artificial latency applied to every fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetch calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceProvider for InMemoryPriceProvider {
    async fn fetch(
        &self,
        symbol: &str,
        lookback_days: u32,
        _interval: Interval,
    ) -> Result<PriceSeries, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.failures.get(symbol) {
            return Err(error.clone());
        }

        let series = self
            .series
            .get(symbol)
            .ok_or_else(|| ProviderError::NotFound(symbol.to_string()))?;
        let bars = series.trailing_days(lookback_days).to_vec();
        Ok(PriceSeries::new(symbol, bars)?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticMetadataProvider {
    entries: HashMap<String, SymbolMetadata>,
}

impl StaticMetadataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, symbol: &str, metadata: SymbolMetadata) -> Self {
        self.entries.insert(symbol.to_string(), metadata);
        self
    }
}

#[async_trait]
impl MetadataProvider for StaticMetadataProvider {
    async fn lookup(&self, symbol: &str) -> Result<SymbolMetadata, ProviderError> {
        self.entries
            .get(symbol)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(symbol.to_string()))
    }
}
